//! The validation entry points.
//!
//! [`LicenseValidator::startup_validate`] runs the whole startup sequence:
//! load stored keys, classify, reconcile with the server, and reactivate a
//! stale key if allowed. [`LicenseValidator::validate`] classifies keys a
//! caller supplies directly, e.g. from an activation dialog.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tollgate_keystore::{KeyStore, KeyStoreError};
use tollgate_types::{AuthorizationOutcome, Credentials, ServerVerdict};
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::ValidatorConfig;
use crate::device::get_hostname;
use crate::engine::{KeyReport, LicenseEngine, LicenseServer};
use crate::error::{LicenseError, LicenseResult};
use crate::interpreter::classify_report;
use crate::reconciler::{ServerReconciler, delete_all_keys};
use crate::session::ValidationSession;

/// Result of a validation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// The application may run.
    pub authorized: bool,
    /// The key must be activated before it can be used.
    pub needs_activation: bool,
    /// Human-readable explanation. Empty when there is nothing to report.
    pub message: String,
    /// Local classification of the key. A server veto or a reactivation can
    /// make `authorized` differ from `outcome.is_authorized()`.
    pub outcome: AuthorizationOutcome,
}

impl ValidationReport {
    fn from_outcome(outcome: AuthorizationOutcome, message: String) -> Self {
        Self {
            authorized: outcome.is_authorized(),
            needs_activation: outcome.needs_activation(),
            message,
            outcome,
        }
    }

    fn denied(outcome: AuthorizationOutcome, error: &LicenseError) -> Self {
        Self {
            authorized: false,
            needs_activation: false,
            message: error.to_string(),
            outcome,
        }
    }
}

/// Validates the license of one product installation.
///
/// Owns its [`ValidationSession`]; separate validators never share state
/// beyond the key store they are given.
pub struct LicenseValidator<E, S, K> {
    pub(crate) config: ValidatorConfig,
    pub(crate) engine: E,
    pub(crate) server: S,
    pub(crate) store: K,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) host_name: String,
    pub(crate) session: ValidationSession,
}

impl<E, S, K> LicenseValidator<E, S, K>
where
    E: LicenseEngine,
    S: LicenseServer,
    K: KeyStore,
{
    /// Creates a validator after checking the config.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::Config`] if [`ValidatorConfig::validate`]
    /// rejects the config.
    pub fn try_new(config: ValidatorConfig, engine: E, server: S, store: K) -> LicenseResult<Self> {
        config.validate()?;
        Ok(Self::new(config, engine, server, store))
    }

    /// Creates a validator.
    ///
    /// An unusable clock-skew limit falls back to
    /// [`DEFAULT_MAX_CLOCK_SKEW_HOURS`](crate::DEFAULT_MAX_CLOCK_SKEW_HOURS).
    pub fn new(config: ValidatorConfig, engine: E, server: S, store: K) -> Self {
        let host_name = config
            .host_name
            .clone()
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(get_hostname);
        let session = ValidationSession::new(&config);

        Self {
            config,
            engine,
            server,
            store,
            clock: Arc::new(SystemClock),
            host_name,
            session,
        }
    }

    /// Replaces the clock used for clock-skew detection.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Validates the license at application startup.
    ///
    /// Loads the stored keys (falling back to the embedded trial key),
    /// classifies them, reconciles an authorized key with the server and
    /// reactivates an expired or wrong-version key if allowed.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::Storage`] only if the configured key medium
    /// cannot be read. Every license condition, including a corrupt key
    /// document, is reported in the returned [`ValidationReport`].
    pub fn startup_validate(&mut self, machine_id: &str) -> LicenseResult<ValidationReport> {
        self.session.reset();

        let medium = self.config.store_keys_to;
        let stored = match self.store.read(medium) {
            Ok(stored) => stored,
            Err(KeyStoreError::Serialization(e)) => {
                warn!(medium = %medium, error = %e, "Stored keys are unreadable");
                return Ok(self.deny_unreadable_keys());
            }
            Err(KeyStoreError::Io(e)) if e.kind() == std::io::ErrorKind::InvalidData => {
                warn!(medium = %medium, error = %e, "Stored keys are unreadable");
                return Ok(self.deny_unreadable_keys());
            }
            Err(e) => return Err(e.into()),
        };

        let credentials = if !stored.is_empty() {
            debug!(medium = %medium, "Loaded stored keys");
            stored
        } else if let Some(trial_key) = self.config.trial_key() {
            info!("No stored keys, using embedded trial key");
            Credentials::new(Some(trial_key), None)
        } else {
            info!("No stored keys and no trial key");
            self.session.record_outcome(AuthorizationOutcome::Invalid);
            return Ok(ValidationReport::denied(
                AuthorizationOutcome::Invalid,
                &LicenseError::NoCredentials,
            ));
        };

        let mut report = self.validate_credentials(credentials, machine_id);

        if report.authorized
            && let Err(e) = self.reconcile_with_server(machine_id)
        {
            warn!(error = %e, "Server reconciliation rejected local license");
            return Ok(ValidationReport::denied(report.outcome, &e));
        }

        if report.outcome.is_reactivatable() && self.session.allow_reactivation {
            let renewed = self.reactivate(machine_id);
            report.authorized = renewed;
            if renewed {
                report.outcome = self.session.last_outcome.unwrap_or(report.outcome);
                report.message = String::new();
            }
        }

        info!(
            authorized = report.authorized,
            needs_activation = report.needs_activation,
            outcome = ?report.outcome,
            "Startup license validation finished"
        );
        Ok(report)
    }

    fn deny_unreadable_keys(&mut self) -> ValidationReport {
        self.session.record_outcome(AuthorizationOutcome::Invalid);
        ValidationReport::denied(
            AuthorizationOutcome::Invalid,
            &LicenseError::InvalidCredential("stored keys are unreadable".into()),
        )
    }

    /// Validates keys supplied by the caller.
    ///
    /// The computer key is validated when present, otherwise the activation
    /// key. Authorized keys are persisted to the configured medium.
    pub fn validate(
        &mut self,
        activation_key: Option<&str>,
        computer_key: Option<&str>,
        machine_id: &str,
    ) -> ValidationReport {
        self.session.reset();
        self.validate_credentials(Credentials::new(activation_key, computer_key), machine_id)
    }

    /// Classifies `credentials` and persists them if authorized.
    pub(crate) fn validate_credentials(
        &mut self,
        credentials: Credentials,
        machine_id: &str,
    ) -> ValidationReport {
        self.session.reset_outcome();
        self.session.credentials = credentials;

        let Some(key) = self.session.credentials.authoritative_key() else {
            self.session.record_outcome(AuthorizationOutcome::Invalid);
            return ValidationReport::denied(
                AuthorizationOutcome::Invalid,
                &LicenseError::NoCredentials,
            );
        };

        debug!(key = %redact(key), "Validating license key");
        let engine_report = match self.engine.validate(key, machine_id) {
            Ok(report) => report,
            Err(e) => {
                warn!(error = %e, "License engine failed to validate key");
                self.session.record_outcome(AuthorizationOutcome::Invalid);
                return ValidationReport::denied(
                    AuthorizationOutcome::Invalid,
                    &LicenseError::Engine(e),
                );
            }
        };

        let classification = classify_report(&engine_report);
        self.session.record(classification, engine_report.kind);

        if classification.should_persist() {
            self.persist_credentials();
        }

        let outcome = classification.outcome;
        let message = describe(&engine_report, outcome);
        ValidationReport::from_outcome(outcome, message)
    }

    fn persist_credentials(&self) {
        let medium = self.config.store_keys_to;
        match self.store.write(medium, &self.session.credentials) {
            Ok(()) => info!(medium = %medium, "Persisted license keys"),
            Err(e) => warn!(medium = %medium, error = %e, "Failed to persist license keys"),
        }
    }

    /// Reconciles the current session with the license server.
    ///
    /// # Errors
    ///
    /// See [`ServerReconciler::reconcile`].
    pub fn reconcile_with_server(&self, machine_id: &str) -> LicenseResult<Option<ServerVerdict>> {
        ServerReconciler::new(
            &self.config,
            &self.engine,
            &self.server,
            &self.store,
            self.clock.as_ref(),
            &self.host_name,
        )
        .reconcile(&self.session, machine_id)
    }

    /// Deletes the keys in the configured medium.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::Storage`] if the medium cannot be cleared.
    pub fn delete_keys(&self) -> LicenseResult<()> {
        self.store.delete(self.config.store_keys_to)?;
        Ok(())
    }

    /// Deletes the keys in every medium, logging failures.
    pub fn delete_all_keys(&self) {
        delete_all_keys(&self.store);
    }

    /// Activation key of the last validation.
    #[must_use]
    pub fn activation_key(&self) -> Option<&str> {
        self.session.credentials.activation_key()
    }

    /// Computer key of the last validation.
    #[must_use]
    pub fn computer_key(&self) -> Option<&str> {
        self.session.credentials.computer_key()
    }

    /// The last key was an evaluation key.
    #[must_use]
    pub fn is_evaluation(&self) -> bool {
        self.session.is_evaluation
    }

    /// The last key was an expired evaluation key.
    #[must_use]
    pub fn evaluation_expired(&self) -> bool {
        self.session.evaluation_expired
    }

    /// Days left on the last evaluation key.
    #[must_use]
    pub fn evaluation_remaining_days(&self) -> Option<i32> {
        self.session.evaluation_remaining_days
    }

    /// The last key was for a different product version.
    #[must_use]
    pub fn wrong_product_version(&self) -> bool {
        self.session.wrong_product_version
    }

    /// Outcome of the last validation.
    #[must_use]
    pub fn last_outcome(&self) -> Option<AuthorizationOutcome> {
        self.session.last_outcome
    }

    #[must_use]
    pub fn check_if_license_is_revoked(&self) -> bool {
        self.session.check_revocation
    }

    pub fn set_check_if_license_is_revoked(&mut self, enabled: bool) {
        self.session.check_revocation = enabled;
    }

    #[must_use]
    pub fn check_if_computer_is_registered(&self) -> bool {
        self.session.check_registration
    }

    pub fn set_check_if_computer_is_registered(&mut self, enabled: bool) {
        self.session.check_registration = enabled;
    }

    #[must_use]
    pub fn reactivate_subscription(&self) -> bool {
        self.session.allow_reactivation
    }

    pub fn set_reactivate_subscription(&mut self, enabled: bool) {
        self.session.allow_reactivation = enabled;
    }

    /// Session state of the last validation.
    #[must_use]
    pub fn session(&self) -> &ValidationSession {
        &self.session
    }

    #[must_use]
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    #[must_use]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    #[must_use]
    pub fn server(&self) -> &S {
        &self.server
    }

    #[must_use]
    pub fn store(&self) -> &K {
        &self.store
    }
}

/// Picks the message for a classified report: the engine's own text if it
/// has one, otherwise the outcome's error text for non-authorized outcomes.
fn describe(report: &KeyReport, outcome: AuthorizationOutcome) -> String {
    if !report.message.is_empty() {
        return report.message.clone();
    }

    let error = match outcome {
        AuthorizationOutcome::Valid | AuthorizationOutcome::ValidTrial { .. } => {
            return String::new();
        }
        AuthorizationOutcome::Invalid => LicenseError::InvalidCredential(report.status.to_string()),
        AuthorizationOutcome::WrongVersion => LicenseError::WrongVersion,
        AuthorizationOutcome::TrialExpired => LicenseError::TrialExpired,
        AuthorizationOutcome::NeedsActivation => LicenseError::NeedsActivation,
    };
    error.to_string()
}

/// Shortens a key for logging.
pub(crate) fn redact(key: &str) -> String {
    let prefix: String = key.chars().take(4).collect();
    format!("{prefix}…")
}
