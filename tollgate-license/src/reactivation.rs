//! Subscription renewal for stale local keys.
//!
//! A key that expired or no longer matches the product version may have
//! been renewed on the server. Reactivating the stored activation key asks
//! the server for the current computer key; if it changed, the new one is
//! validated and persisted in place of the old one.

use tollgate_keystore::KeyStore;
use tracing::{debug, info, warn};

use crate::engine::{ClientIdentity, LicenseEngine, LicenseServer};
use crate::validator::{LicenseValidator, redact};

impl<E, S, K> LicenseValidator<E, S, K>
where
    E: LicenseEngine,
    S: LicenseServer,
    K: KeyStore,
{
    /// Reactivates the current activation key against the server.
    ///
    /// Returns true if the license is usable afterwards: either the server
    /// issued the computer key already stored, or it issued a new one that
    /// validated (and was persisted). A new key that does not validate
    /// leaves the session as it was before the call.
    pub fn reactivate(&mut self, machine_id: &str) -> bool {
        let Some(url) = self.config.server_url().map(String::from) else {
            debug!("No server URL, cannot reactivate");
            return false;
        };
        let Some(activation_key) = self.session.credentials.activation_key().map(String::from)
        else {
            debug!("No activation key, cannot reactivate");
            return false;
        };

        let client = ClientIdentity {
            activation_key: &activation_key,
            machine_id,
            host_name: &self.host_name,
            client_version: &self.config.client_version,
        };

        let raw = match self.server.activate(&url, &client) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Reactivation request failed");
                return false;
            }
        };

        let license_info = match self.server.parse_response(&raw) {
            Ok(info) => info,
            Err(e) => {
                warn!(error = %e, "Could not parse reactivation response");
                return false;
            }
        };

        let Some(issued) = license_info.issued_computer_key() else {
            warn!("Reactivation response carried no computer key");
            return false;
        };

        if self.session.credentials.computer_key() == Some(issued) {
            info!("Server issued the stored computer key, license already current");
            return true;
        }

        debug!(computer_key = %redact(issued), "Server issued a new computer key");
        let previous = self.session.clone();
        let renewed = previous.credentials.with_computer_key(Some(issued));
        let report = self.validate_credentials(renewed, machine_id);

        if report.authorized {
            info!("License renewed from server");
            true
        } else {
            warn!(message = %report.message, "Renewed computer key did not validate");
            self.session = previous;
            false
        }
    }
}
