//! In-memory key store.

use crate::{KeyStore, KeyStoreError, KeyStoreResult, StorageMedium};
use std::collections::HashMap;
use std::sync::RwLock;
use tollgate_types::Credentials;

/// Key store that keeps credentials in process memory.
#[derive(Debug, Default)]
pub struct MemoryKeyStore {
    slots: RwLock<HashMap<StorageMedium, Credentials>>,
}

impl MemoryKeyStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with `credentials` already in `medium`.
    #[must_use]
    pub fn with_keys(medium: StorageMedium, credentials: Credentials) -> Self {
        let store = Self::new();
        if let Ok(mut slots) = store.slots.write() {
            slots.insert(medium, credentials);
        }
        store
    }

    /// Returns true if `medium` currently holds any key.
    #[must_use]
    pub fn contains(&self, medium: StorageMedium) -> bool {
        self.slots
            .read()
            .map(|slots| slots.get(&medium).is_some_and(|c| !c.is_empty()))
            .unwrap_or(false)
    }
}

impl KeyStore for MemoryKeyStore {
    fn read(&self, medium: StorageMedium) -> KeyStoreResult<Credentials> {
        let slots = self.slots.read().map_err(|_| KeyStoreError::Poisoned)?;
        Ok(slots.get(&medium).cloned().unwrap_or_default())
    }

    fn write(&self, medium: StorageMedium, credentials: &Credentials) -> KeyStoreResult<()> {
        let mut slots = self.slots.write().map_err(|_| KeyStoreError::Poisoned)?;
        slots.insert(medium, credentials.clone());
        Ok(())
    }

    fn delete(&self, medium: StorageMedium) -> KeyStoreResult<()> {
        let mut slots = self.slots.write().map_err(|_| KeyStoreError::Poisoned)?;
        slots.remove(&medium);
        Ok(())
    }
}
