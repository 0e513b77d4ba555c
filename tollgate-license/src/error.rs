//! Error types for the licensing module.

use thiserror::Error;
use tollgate_keystore::KeyStoreError;

use crate::engine::EngineError;

/// Licensing-specific errors.
///
/// The `Display` text of each variant is what callers receive as the
/// human-readable message of a failed validation.
#[derive(Debug, Error)]
pub enum LicenseError {
    /// No stored keys and no embedded trial key.
    #[error("no credentials")]
    NoCredentials,

    /// Malformed, tampered, wrong-machine or otherwise unusable key.
    #[error("invalid license key: {0}")]
    InvalidCredential(String),

    /// Key is valid for a different product version.
    #[error("license key is for a different product version")]
    WrongVersion,

    /// Evaluation period has ended.
    #[error("evaluation license has expired")]
    TrialExpired,

    /// Key must be activated on the license server before use.
    #[error("license key requires activation")]
    NeedsActivation,

    /// License server could not be reached.
    #[error("license server unreachable: {0}")]
    ServerUnreachable(String),

    /// Local clock disagrees with the license server.
    #[error(
        "the time on this computer does not match the server time; the difference is {hours:.1} hours"
    )]
    ClockSkew {
        /// Server time minus local time.
        hours: f64,
    },

    /// License revoked on the server.
    #[error("license has been revoked")]
    Revoked,

    /// Server does not recognize this computer for the activation key.
    #[error("this computer is not registered for the license: {0}")]
    NotRegistered(String),

    /// Key storage error.
    #[error("storage error: {0}")]
    Storage(#[from] KeyStoreError),

    /// License engine error.
    #[error("license engine error: {0}")]
    Engine(#[from] EngineError),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LicenseError {
    /// Returns true if the session must stop and cannot degrade to local trust.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ClockSkew { .. } | Self::Revoked | Self::NotRegistered(_)
        )
    }

    /// Returns true if this error is a server-confirmed invalidation that
    /// erases locally stored keys.
    #[must_use]
    pub fn erases_keys(&self) -> bool {
        matches!(self, Self::Revoked | Self::NotRegistered(_))
    }
}

/// Result type for license operations.
pub type LicenseResult<T> = Result<T, LicenseError>;
