//! Storage media a credential pair can live in.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a credential pair is persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageMedium {
    /// Hidden file in the per-user data directory.
    File,
    /// Per-user settings store.
    #[default]
    Registry,
}

impl StorageMedium {
    /// Every medium, in erase order.
    pub const ALL: [StorageMedium; 2] = [StorageMedium::File, StorageMedium::Registry];

    /// Short name used in file names and logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Registry => "registry",
        }
    }
}

impl fmt::Display for StorageMedium {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
