//! Core type definitions for Tollgate.
//!
//! This crate defines the plain data exchanged between the license engine,
//! the key store and the validator:
//! - Raw engine status bitmasks and license kinds
//! - The per-call authorization outcome
//! - Credential pairs and server-issued license info
//!
//! Nothing in here performs I/O; behavior lives in `tollgate-license`.

mod credentials;
mod info;
mod outcome;
mod status;

pub use credentials::Credentials;
pub use info::{LicenseInfo, LicenseKind, ServerVerdict};
pub use outcome::AuthorizationOutcome;
pub use status::ValidationStatus;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("unknown status flag: {0}")]
    UnknownFlag(String),

    #[error("unknown license kind: {0}")]
    UnknownKind(String),
}
