//! File-backed key store.
//!
//! Each medium maps to one JSON document under its own root directory.
//! Writes go through a temp file in the same directory that is then renamed
//! over the destination, so concurrent writers are last-writer-wins and a
//! pair is never half-written.

use crate::{KeyStore, KeyStoreError, KeyStoreResult, StorageMedium};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tollgate_types::Credentials;
use tracing::debug;

/// On-disk shape of a stored pair.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredKeys {
    #[serde(default)]
    activation_key: Option<String>,
    #[serde(default)]
    computer_key: Option<String>,
}

/// Key store that persists each medium as a JSON file.
#[derive(Debug, Clone)]
pub struct FileKeyStore {
    file_root: PathBuf,
    registry_root: PathBuf,
    file_name: String,
}

impl FileKeyStore {
    /// Creates a store for `product` under the default per-user directories.
    ///
    /// The `File` medium lives in the local data directory, the `Registry`
    /// medium in the config directory.
    ///
    /// # Errors
    ///
    /// Returns [`KeyStoreError::Unavailable`] if the host has no such
    /// directories (e.g. no home directory).
    pub fn for_product(product: &str) -> KeyStoreResult<Self> {
        let file_root = dirs::data_local_dir().ok_or_else(|| {
            KeyStoreError::Unavailable(StorageMedium::File, "no local data directory".into())
        })?;
        let registry_root = dirs::config_dir().ok_or_else(|| {
            KeyStoreError::Unavailable(StorageMedium::Registry, "no config directory".into())
        })?;

        Ok(Self::with_roots(
            file_root.join("tollgate").join(product),
            registry_root.join("tollgate").join(product),
        ))
    }

    /// Creates a store with explicit root directories for each medium.
    #[must_use]
    pub fn with_roots(file_root: impl Into<PathBuf>, registry_root: impl Into<PathBuf>) -> Self {
        Self {
            file_root: file_root.into(),
            registry_root: registry_root.into(),
            file_name: ".license-keys.json".to_string(),
        }
    }

    /// Returns the path of the document backing `medium`.
    #[must_use]
    pub fn path_for(&self, medium: StorageMedium) -> PathBuf {
        self.root_for(medium).join(&self.file_name)
    }

    fn root_for(&self, medium: StorageMedium) -> &Path {
        match medium {
            StorageMedium::File => &self.file_root,
            StorageMedium::Registry => &self.registry_root,
        }
    }
}

impl KeyStore for FileKeyStore {
    fn read(&self, medium: StorageMedium) -> KeyStoreResult<Credentials> {
        let path = self.path_for(medium);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(medium = %medium, "No stored keys");
                return Ok(Credentials::empty());
            }
            Err(e) => return Err(e.into()),
        };

        let stored: StoredKeys = serde_json::from_str(&contents)?;
        Ok(Credentials::new(
            stored.activation_key.as_deref(),
            stored.computer_key.as_deref(),
        ))
    }

    fn write(&self, medium: StorageMedium, credentials: &Credentials) -> KeyStoreResult<()> {
        let root = self.root_for(medium);
        fs::create_dir_all(root)?;

        let stored = StoredKeys {
            activation_key: credentials.activation_key().map(String::from),
            computer_key: credentials.computer_key().map(String::from),
        };
        let bytes = serde_json::to_vec_pretty(&stored)?;

        let mut temp = tempfile::NamedTempFile::new_in(root)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(temp.path(), fs::Permissions::from_mode(0o600))?;
        }

        temp.write_all(&bytes)?;
        temp.as_file().sync_all()?;

        let path = self.path_for(medium);
        temp.persist(&path).map_err(|e| KeyStoreError::Io(e.error))?;

        debug!(medium = %medium, path = %path.display(), "Stored license keys");
        Ok(())
    }

    fn delete(&self, medium: StorageMedium) -> KeyStoreResult<()> {
        let path = self.path_for(medium);
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(medium = %medium, path = %path.display(), "Deleted license keys");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
