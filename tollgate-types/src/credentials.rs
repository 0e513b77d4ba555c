//! The pair of opaque credential strings persisted by the key store.

use serde::{Deserialize, Serialize};

/// An activation key and the computer key the server issued for it.
///
/// Empty strings are normalized to `None` so "absent" has a single
/// representation. The pair is always stored and replaced as a unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    activation_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    computer_key: Option<String>,
}

impl Credentials {
    /// Creates a credential pair, dropping blank keys.
    #[must_use]
    pub fn new(activation_key: Option<&str>, computer_key: Option<&str>) -> Self {
        Self {
            activation_key: normalize(activation_key),
            computer_key: normalize(computer_key),
        }
    }

    /// Returns an empty pair.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the activation key, if any.
    #[must_use]
    pub fn activation_key(&self) -> Option<&str> {
        self.activation_key.as_deref()
    }

    /// Returns the computer key, if any.
    #[must_use]
    pub fn computer_key(&self) -> Option<&str> {
        self.computer_key.as_deref()
    }

    /// Returns true if neither key is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.activation_key.is_none() && self.computer_key.is_none()
    }

    /// Returns true if both keys are present.
    #[must_use]
    pub fn has_both(&self) -> bool {
        self.activation_key.is_some() && self.computer_key.is_some()
    }

    /// Returns the key to validate: the computer key takes precedence.
    #[must_use]
    pub fn authoritative_key(&self) -> Option<&str> {
        self.computer_key().or(self.activation_key())
    }

    /// Returns a copy with the computer key replaced.
    #[must_use]
    pub fn with_computer_key(&self, computer_key: Option<&str>) -> Self {
        Self {
            activation_key: self.activation_key.clone(),
            computer_key: normalize(computer_key),
        }
    }

    /// Returns a copy with the activation key replaced.
    #[must_use]
    pub fn with_activation_key(&self, activation_key: Option<&str>) -> Self {
        Self {
            activation_key: normalize(activation_key),
            computer_key: self.computer_key.clone(),
        }
    }
}

fn normalize(key: Option<&str>) -> Option<String> {
    key.map(str::trim)
        .filter(|k| !k.is_empty())
        .map(String::from)
}
