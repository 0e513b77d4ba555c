//! Server-side reconciliation of a locally valid license.
//!
//! Runs after a key classified as authorized. Server checks are opt-in and
//! best-effort: if nothing is enabled, no server is configured, the key has
//! no server-side state, or the server cannot be reached, the local decision
//! stands. A reachable server can still veto it for clock skew, revocation,
//! or an unregistered computer. The last two also erase the stored keys.

use tollgate_keystore::{KeyStore, StorageMedium};
use tollgate_types::{LicenseKind, ServerVerdict};
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::config::ValidatorConfig;
use crate::engine::{ClientIdentity, LicenseEngine, LicenseServer};
use crate::error::{LicenseError, LicenseResult};
use crate::session::ValidationSession;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Reconciles a session against the license server.
pub struct ServerReconciler<'a, E, S, K: ?Sized> {
    config: &'a ValidatorConfig,
    engine: &'a E,
    server: &'a S,
    store: &'a K,
    clock: &'a dyn Clock,
    host_name: &'a str,
}

impl<'a, E, S, K> ServerReconciler<'a, E, S, K>
where
    E: LicenseEngine,
    S: LicenseServer,
    K: KeyStore + ?Sized,
{
    /// Creates a reconciler over borrowed collaborators.
    pub fn new(
        config: &'a ValidatorConfig,
        engine: &'a E,
        server: &'a S,
        store: &'a K,
        clock: &'a dyn Clock,
        host_name: &'a str,
    ) -> Self {
        Self {
            config,
            engine,
            server,
            store,
            clock,
            host_name,
        }
    }

    /// Checks the session's license against the server.
    ///
    /// Returns `Ok(None)` when no server contact was attempted and
    /// `Ok(Some(verdict))` when the server was asked (reachable or not).
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::ClockSkew`], [`LicenseError::Revoked`] or
    /// [`LicenseError::NotRegistered`]. The last two erase all stored keys
    /// before returning.
    pub fn reconcile(
        &self,
        session: &ValidationSession,
        machine_id: &str,
    ) -> LicenseResult<Option<ServerVerdict>> {
        if !session.server_checks_enabled() {
            debug!("Server checks disabled");
            return Ok(None);
        }

        let credentials = &session.credentials;
        let kind = self.resolve_kind(session, machine_id);

        let (Some(url), Some(activation_key)) =
            (self.config.server_url(), credentials.activation_key())
        else {
            debug!("No server URL or activation key, skipping server checks");
            return Ok(None);
        };

        if kind != Some(LicenseKind::Activation) {
            debug!(kind = ?kind, "License kind has no server state, skipping server checks");
            return Ok(None);
        }

        let server_time = match self.server.ping(url) {
            Ok(Some(time)) => time,
            Ok(None) => return Ok(Some(degrade(LicenseError::ServerUnreachable(url.into())))),
            Err(e) => return Ok(Some(degrade(LicenseError::ServerUnreachable(e.to_string())))),
        };

        let skew_hours =
            (server_time - self.clock.now()).num_milliseconds() as f64 / MILLIS_PER_HOUR;
        if skew_hours.abs() > self.config.clock_skew_limit() {
            warn!(skew_hours, "Local clock disagrees with license server");
            return Err(LicenseError::ClockSkew { hours: skew_hours });
        }
        let mut verdict = ServerVerdict::reachable(skew_hours);

        if session.check_revocation {
            verdict.revoked = match self.server.is_revoked(url, activation_key) {
                Ok(revoked) => revoked,
                Err(e) => {
                    warn!(error = %e, "Revocation check failed, assuming not revoked");
                    false
                }
            };

            if verdict.revoked {
                warn!(?verdict, "License revoked by server, erasing stored keys");
                delete_all_keys(self.store);
                return Err(LicenseError::Revoked);
            }
        }

        if session.check_registration {
            let client = ClientIdentity {
                activation_key,
                machine_id,
                host_name: self.host_name,
                client_version: &self.config.client_version,
            };

            match self
                .server
                .is_illegal_computer(url, &client, credentials.computer_key())
            {
                Ok((true, raw)) => {
                    verdict.illegal_computer = true;
                    let message = self.registration_message(&raw);
                    warn!(?verdict, message = %message, "Computer not registered on server, erasing stored keys");
                    delete_all_keys(self.store);
                    return Err(LicenseError::NotRegistered(message));
                }
                Ok((false, _)) => {}
                Err(e) => {
                    warn!(error = %e, "Registration check failed, assuming registered");
                }
            }
        }

        debug!(?verdict, "Server reconciliation passed");
        Ok(Some(verdict))
    }

    /// Finds the kind to check on the server.
    ///
    /// When both keys are present the last validation ran on the computer
    /// key, which hides the activation key's kind, so the activation key is
    /// validated on its own.
    fn resolve_kind(&self, session: &ValidationSession, machine_id: &str) -> Option<LicenseKind> {
        let credentials = &session.credentials;
        match (credentials.activation_key(), credentials.has_both()) {
            (Some(activation_key), true) => {
                match self.engine.validate(activation_key, machine_id) {
                    Ok(report) => Some(report.kind),
                    Err(e) => {
                        warn!(error = %e, "Could not resolve activation key kind");
                        None
                    }
                }
            }
            _ => session.license_kind,
        }
    }

    fn registration_message(&self, raw: &str) -> String {
        self.server
            .parse_response(raw)
            .ok()
            .and_then(|info| info.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| "keys are not registered on the license server".to_string())
    }
}

/// Falls back to the local decision when the server cannot be asked.
fn degrade(reason: LicenseError) -> ServerVerdict {
    info!(reason = %reason, "Trusting local license");
    ServerVerdict::unreachable()
}

/// Erases stored keys from every medium.
///
/// Best-effort: a failure on one medium is logged and the next medium is
/// still attempted.
pub fn delete_all_keys<K: KeyStore + ?Sized>(store: &K) {
    for medium in StorageMedium::ALL {
        match store.delete(medium) {
            Ok(()) => debug!(medium = %medium, "Erased stored keys"),
            Err(e) => warn!(medium = %medium, error = %e, "Failed to erase stored keys"),
        }
    }
}
