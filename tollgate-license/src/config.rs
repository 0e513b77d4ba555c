//! Validator configuration.
//!
//! Everything the validator needs to know about the product and the license
//! server is passed in once, at construction, as a [`ValidatorConfig`].
//! Configs deserialize from JSON with every field optional.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tollgate_keystore::StorageMedium;
use uuid::Uuid;

use crate::error::{LicenseError, LicenseResult};

/// Client version reported to the license server by default.
pub const DEFAULT_CLIENT_VERSION: &str = "5.0.00";

/// Maximum tolerated difference between server and local time, in hours.
pub const DEFAULT_MAX_CLOCK_SKEW_HOURS: f64 = 24.0;

/// Trial key compiled into the binary, if the build provided one.
pub const EMBEDDED_TRIAL_KEY: Option<&str> = option_env!("TOLLGATE_DEFAULT_TRIAL_KEY");

/// Identity of the licensed product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductDefinition {
    /// Numeric product ID.
    pub id: u32,
    /// Product name.
    pub name: String,
    /// Major version the keys must match.
    pub major_version: u32,
    /// Minor version the keys must match.
    pub minor_version: u32,
    /// Product GUID.
    pub guid: Uuid,
}

impl Default for ProductDefinition {
    fn default() -> Self {
        Self {
            id: 1,
            name: "Demo".to_string(),
            major_version: 1,
            minor_version: 0,
            guid: Uuid::nil(),
        }
    }
}

/// Immutable configuration for a [`LicenseValidator`](crate::LicenseValidator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Licensed product.
    pub product: ProductDefinition,
    /// License server URL. `None` disables every server interaction.
    pub server_url: Option<String>,
    /// Medium keys are read from and persisted to.
    pub store_keys_to: StorageMedium,
    /// Trial key used when no keys are stored.
    pub default_trial_key: Option<String>,
    /// Client version reported to the server.
    pub client_version: String,
    /// Host name reported to the server. Detected when unset.
    pub host_name: Option<String>,
    /// Ask the server whether the activation key was revoked.
    pub check_if_license_is_revoked: bool,
    /// Ask the server whether this computer is registered.
    pub check_if_computer_is_registered: bool,
    /// Reactivate expired or wrong-version keys against the server.
    pub reactivate_subscription: bool,
    /// Clock skew beyond which server reconciliation fails.
    pub max_clock_skew_hours: f64,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            product: ProductDefinition::default(),
            server_url: None,
            store_keys_to: StorageMedium::default(),
            default_trial_key: EMBEDDED_TRIAL_KEY.map(String::from),
            client_version: DEFAULT_CLIENT_VERSION.to_string(),
            host_name: None,
            check_if_license_is_revoked: false,
            check_if_computer_is_registered: false,
            reactivate_subscription: false,
            max_clock_skew_hours: DEFAULT_MAX_CLOCK_SKEW_HOURS,
        }
    }
}

impl ValidatorConfig {
    /// Creates a default config for `product`.
    #[must_use]
    pub fn new(product: ProductDefinition) -> Self {
        Self {
            product,
            ..Self::default()
        }
    }

    /// Parses and validates a JSON config.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the config is invalid.
    pub fn from_json_str(json: &str) -> LicenseResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the config is invalid.
    pub fn from_json_file(path: &Path) -> LicenseResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            LicenseError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&json)
    }

    /// Checks the config for values the validator cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::Config`] describing the first problem found.
    pub fn validate(&self) -> LicenseResult<()> {
        if self.product.name.trim().is_empty() {
            return Err(LicenseError::Config("product name is empty".into()));
        }
        if !self.max_clock_skew_hours.is_finite() || self.max_clock_skew_hours <= 0.0 {
            return Err(LicenseError::Config(format!(
                "max_clock_skew_hours must be positive, got {}",
                self.max_clock_skew_hours
            )));
        }
        Ok(())
    }

    /// Returns the clock-skew limit in hours.
    ///
    /// Values that are not finite and positive fall back to
    /// [`DEFAULT_MAX_CLOCK_SKEW_HOURS`].
    #[must_use]
    pub fn clock_skew_limit(&self) -> f64 {
        if self.max_clock_skew_hours.is_finite() && self.max_clock_skew_hours > 0.0 {
            self.max_clock_skew_hours
        } else {
            DEFAULT_MAX_CLOCK_SKEW_HOURS
        }
    }

    /// Returns the server URL, treating blank values as unset.
    #[must_use]
    pub fn server_url(&self) -> Option<&str> {
        non_blank(self.server_url.as_deref())
    }

    /// Returns the trial key, treating blank values as unset.
    #[must_use]
    pub fn trial_key(&self) -> Option<&str> {
        non_blank(self.default_trial_key.as_deref())
    }

    /// Sets the license server URL.
    #[must_use]
    pub fn with_server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    /// Sets the embedded trial key.
    #[must_use]
    pub fn with_trial_key(mut self, key: Option<&str>) -> Self {
        self.default_trial_key = key.map(String::from);
        self
    }

    /// Sets the medium keys are stored in.
    #[must_use]
    pub fn with_store_keys_to(mut self, medium: StorageMedium) -> Self {
        self.store_keys_to = medium;
        self
    }

    /// Sets the host name reported to the server.
    #[must_use]
    pub fn with_host_name(mut self, host_name: impl Into<String>) -> Self {
        self.host_name = Some(host_name.into());
        self
    }

    /// Enables or disables the revocation check.
    #[must_use]
    pub fn with_revocation_check(mut self, enabled: bool) -> Self {
        self.check_if_license_is_revoked = enabled;
        self
    }

    /// Enables or disables the registration check.
    #[must_use]
    pub fn with_registration_check(mut self, enabled: bool) -> Self {
        self.check_if_computer_is_registered = enabled;
        self
    }

    /// Enables or disables subscription reactivation.
    #[must_use]
    pub fn with_reactivation(mut self, enabled: bool) -> Self {
        self.reactivate_subscription = enabled;
        self
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
