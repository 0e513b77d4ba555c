//! Machine identity reported to the license engine and server.
//!
//! The machine identifier is a stable hash of host facts that survives
//! reboots but changes when the machine does. The host name is sent along
//! with registration and activation requests.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::env;

/// Identity of the machine the application runs on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineIdentity {
    machine_id: String,
    host_name: String,
}

impl MachineIdentity {
    /// Collects the identity of the current machine.
    #[must_use]
    pub fn current() -> Self {
        Self::for_host(get_hostname())
    }

    /// Collects the identity of this machine as known under `host_name`.
    #[must_use]
    pub fn for_host(host_name: impl Into<String>) -> Self {
        let host_name = host_name.into();
        let machine_id = fingerprint(&collect_hardware_ids(&host_name));
        Self {
            machine_id,
            host_name,
        }
    }

    /// Builds an identity from known values.
    #[must_use]
    pub fn new(machine_id: impl Into<String>, host_name: impl Into<String>) -> Self {
        Self {
            machine_id: machine_id.into(),
            host_name: host_name.into(),
        }
    }

    /// Returns the machine identifier to validate keys against.
    #[must_use]
    pub fn machine_id(&self) -> &str {
        &self.machine_id
    }

    /// Returns the host name.
    #[must_use]
    pub fn host_name(&self) -> &str {
        &self.host_name
    }
}

/// Hashes identifier components into a short URL-safe ID.
fn fingerprint(components: &[String]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(components.join("|").as_bytes());
    let hash = hasher.finalize();
    URL_SAFE_NO_PAD.encode(&hash[..16])
}

fn collect_hardware_ids(host_name: &str) -> Vec<String> {
    let mut ids = vec![
        env::consts::OS.to_string(),
        env::consts::ARCH.to_string(),
        host_name.to_string(),
    ];

    if let Some(machine_id) = get_machine_id() {
        ids.push(machine_id);
    }

    if let Ok(user) = env::var("USER").or_else(|_| env::var("USERNAME")) {
        ids.push(user);
    }

    ids
}

/// Gets the machine hostname.
pub(crate) fn get_hostname() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Files holding a per-install machine identifier, in lookup order.
const MACHINE_ID_FILES: &[&str] = &[
    "/etc/machine-id",
    "/var/lib/dbus/machine-id",
    "/etc/hostid",
];

/// Reads the first non-empty machine identifier file.
///
/// Platforms without one rely on the host name and user alone.
fn get_machine_id() -> Option<String> {
    MACHINE_ID_FILES.iter().find_map(|path| {
        std::fs::read_to_string(path)
            .ok()
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
    })
}
