//! Per-validator session state.

use serde::{Deserialize, Serialize};
use tollgate_types::{AuthorizationOutcome, Credentials, LicenseKind};

use crate::config::ValidatorConfig;
use crate::interpreter::Classification;

/// State of the most recent validation, owned by one validator.
///
/// Transient fields are cleared at the start of every validation call. The
/// three server toggles are configuration and survive resets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationSession {
    /// Credentials the last validation ran with.
    pub credentials: Credentials,
    /// Outcome of the last validation.
    pub last_outcome: Option<AuthorizationOutcome>,
    /// License kind the engine reported for the last validated key.
    pub license_kind: Option<LicenseKind>,
    /// The last key was an evaluation key.
    pub is_evaluation: bool,
    /// The last key was an expired evaluation key.
    pub evaluation_expired: bool,
    /// Days left on the last evaluation key.
    pub evaluation_remaining_days: Option<i32>,
    /// The last key was for a different product version.
    pub wrong_product_version: bool,
    /// Check revocation on the server.
    pub check_revocation: bool,
    /// Check registration on the server.
    pub check_registration: bool,
    /// Reactivate expired or wrong-version keys.
    pub allow_reactivation: bool,
}

impl ValidationSession {
    /// Creates a session with toggles taken from `config`.
    #[must_use]
    pub fn new(config: &ValidatorConfig) -> Self {
        Self {
            check_revocation: config.check_if_license_is_revoked,
            check_registration: config.check_if_computer_is_registered,
            allow_reactivation: config.reactivate_subscription,
            ..Self::default()
        }
    }

    /// Clears the per-call outcome fields.
    pub fn reset_outcome(&mut self) {
        self.last_outcome = None;
        self.license_kind = None;
        self.is_evaluation = false;
        self.evaluation_expired = false;
        self.evaluation_remaining_days = None;
        self.wrong_product_version = false;
    }

    /// Clears every transient field, including credentials.
    pub fn reset(&mut self) {
        self.reset_outcome();
        self.credentials = Credentials::empty();
    }

    /// Returns true if either server check is enabled.
    #[must_use]
    pub fn server_checks_enabled(&self) -> bool {
        self.check_revocation || self.check_registration
    }

    /// Records the result of classifying a key of `kind`.
    pub(crate) fn record(&mut self, classification: Classification, kind: LicenseKind) {
        let base = classification.base;
        self.license_kind = Some(kind);
        self.is_evaluation = base.is_trial();
        self.evaluation_expired = base == AuthorizationOutcome::TrialExpired;
        self.evaluation_remaining_days = base.days_remaining();
        self.wrong_product_version = base == AuthorizationOutcome::WrongVersion;
        self.last_outcome = Some(classification.outcome);
    }

    /// Records an outcome reached without an engine report.
    pub(crate) fn record_outcome(&mut self, outcome: AuthorizationOutcome) {
        self.last_outcome = Some(outcome);
    }
}
