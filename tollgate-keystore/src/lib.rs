//! Persistent license key storage for Tollgate.
//!
//! A key store keeps one credential pair (activation key + computer key) per
//! storage medium. Every operation names the medium it targets, so callers
//! can erase keys from all media without touching a shared "current medium"
//! setting.
//!
//! # Media
//!
//! - [`StorageMedium::File`]: a hidden per-user data file
//! - [`StorageMedium::Registry`]: the per-user settings store (emulated as a
//!   config-directory file on hosts without a registry)
//!
//! # Atomicity
//!
//! A pair is written as a single document and replaced with a rename, so a
//! reader never observes only one of the two keys from a write.

mod error;
mod file;
mod medium;
mod memory;

pub use error::{KeyStoreError, KeyStoreResult};
pub use file::FileKeyStore;
pub use medium::StorageMedium;
pub use memory::MemoryKeyStore;

use tollgate_types::Credentials;

/// Storage boundary for persisted license credentials.
pub trait KeyStore: Send + Sync {
    /// Reads the credential pair stored in `medium`.
    ///
    /// A medium with nothing stored yields empty credentials, not an error.
    fn read(&self, medium: StorageMedium) -> KeyStoreResult<Credentials>;

    /// Replaces the credential pair stored in `medium`.
    fn write(&self, medium: StorageMedium, credentials: &Credentials) -> KeyStoreResult<()>;

    /// Removes any credentials stored in `medium`. Deleting nothing succeeds.
    fn delete(&self, medium: StorageMedium) -> KeyStoreResult<()>;
}

impl<T: KeyStore + ?Sized> KeyStore for std::sync::Arc<T> {
    fn read(&self, medium: StorageMedium) -> KeyStoreResult<Credentials> {
        (**self).read(medium)
    }

    fn write(&self, medium: StorageMedium, credentials: &Credentials) -> KeyStoreResult<()> {
        (**self).write(medium, credentials)
    }

    fn delete(&self, medium: StorageMedium) -> KeyStoreResult<()> {
        (**self).delete(medium)
    }
}

impl<T: KeyStore + ?Sized> KeyStore for &T {
    fn read(&self, medium: StorageMedium) -> KeyStoreResult<Credentials> {
        (**self).read(medium)
    }

    fn write(&self, medium: StorageMedium, credentials: &Credentials) -> KeyStoreResult<()> {
        (**self).write(medium, credentials)
    }

    fn delete(&self, medium: StorageMedium) -> KeyStoreResult<()> {
        (**self).delete(medium)
    }
}
