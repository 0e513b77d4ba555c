//! License kinds, server-issued license info and server verdicts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of license a key encodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseKind {
    /// Single-use key that must be exchanged for a computer key.
    Activation,
    /// Time-limited evaluation key.
    Evaluation,
    /// Non-expiring key.
    Permanent,
    /// Key without activation requirements or expiry semantics.
    Generic,
}

impl LicenseKind {
    /// Returns true if the server holds state for keys of this kind.
    #[must_use]
    pub fn requires_activation(&self) -> bool {
        matches!(self, Self::Activation)
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Activation => "activation",
            Self::Evaluation => "evaluation",
            Self::Permanent => "permanent",
            Self::Generic => "generic",
        }
    }
}

impl fmt::Display for LicenseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LicenseKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "activation" => Ok(Self::Activation),
            "evaluation" => Ok(Self::Evaluation),
            "permanent" => Ok(Self::Permanent),
            "generic" => Ok(Self::Generic),
            other => Err(crate::Error::UnknownKind(other.to_string())),
        }
    }
}

/// License details parsed from a license server response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseInfo {
    /// The activation key the response refers to.
    #[serde(default)]
    pub activation_key: Option<String>,
    /// The computer key issued for this machine.
    #[serde(default)]
    pub computer_key: Option<String>,
    /// End of the licensed period, if any.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    /// Free-form message from the server.
    #[serde(default)]
    pub message: Option<String>,
}

impl LicenseInfo {
    /// Returns the issued computer key, ignoring blanks.
    #[must_use]
    pub fn issued_computer_key(&self) -> Option<&str> {
        self.computer_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

/// The result of one contact with the license server. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ServerVerdict {
    /// Whether the server answered the ping.
    pub reachable: bool,
    /// Server time minus local time, in hours.
    pub clock_skew_hours: f64,
    /// Whether the server reports the activation key as revoked.
    pub revoked: bool,
    /// Whether the server does not recognize this machine's keys.
    pub illegal_computer: bool,
}

impl ServerVerdict {
    /// A verdict for a server that could not be reached.
    #[must_use]
    pub fn unreachable() -> Self {
        Self {
            reachable: false,
            clock_skew_hours: 0.0,
            revoked: false,
            illegal_computer: false,
        }
    }

    /// A verdict for a reachable server with the given clock skew.
    #[must_use]
    pub fn reachable(clock_skew_hours: f64) -> Self {
        Self {
            reachable: true,
            clock_skew_hours,
            revoked: false,
            illegal_computer: false,
        }
    }
}
