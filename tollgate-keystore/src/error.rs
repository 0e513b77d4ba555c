//! Error types for the key store.

use crate::StorageMedium;
use thiserror::Error;

/// Result type for key store operations.
pub type KeyStoreResult<T> = Result<T, KeyStoreError>;

/// Errors that can occur while reading or writing stored keys.
#[derive(Debug, Error)]
pub enum KeyStoreError {
    /// IO error (file system).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored document could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The medium has no usable location on this host.
    #[error("storage medium {0} is unavailable: {1}")]
    Unavailable(StorageMedium, String),

    /// The in-memory store's lock was poisoned by a panicking writer.
    #[error("key store lock poisoned")]
    Poisoned,
}
