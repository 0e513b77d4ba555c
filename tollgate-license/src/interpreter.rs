//! Turns an engine status bitmask into an authorization outcome.
//!
//! Several status bits can be set at once, so the rules are a cascade where
//! the first matching rule wins:
//!
//! 1. any rejecting flag (invalid key/product/machine, too many instances,
//!    tampered) → `Invalid`
//! 2. `VERSION_INVALID` → `WrongVersion`
//! 3. `DEMO` + `EXPIRED` → `TrialExpired`
//! 4. `DEMO` → `ValidTrial`
//! 5. `PERMANENT` → `Valid`
//! 6. otherwise → `Invalid`
//!
//! An authorized outcome for an activation-kind key is then turned into
//! `NeedsActivation`: such keys are only trusted once the server has
//! exchanged them for a computer key.

use tollgate_types::{AuthorizationOutcome, LicenseKind, ValidationStatus};
use tracing::debug;

use crate::engine::KeyReport;

/// Classifies a status without looking at the license kind.
#[must_use]
pub fn classify_status(status: ValidationStatus, days_left: i32) -> AuthorizationOutcome {
    if status.intersects(ValidationStatus::REJECTING) {
        AuthorizationOutcome::Invalid
    } else if status.contains(ValidationStatus::VERSION_INVALID) {
        AuthorizationOutcome::WrongVersion
    } else if status.contains(ValidationStatus::DEMO) {
        if status.contains(ValidationStatus::EXPIRED) {
            AuthorizationOutcome::TrialExpired
        } else {
            AuthorizationOutcome::ValidTrial {
                days_remaining: days_left,
            }
        }
    } else if status.contains(ValidationStatus::PERMANENT) {
        AuthorizationOutcome::Valid
    } else {
        AuthorizationOutcome::Invalid
    }
}

/// Holds back authorized activation-kind keys until they are activated.
#[must_use]
pub fn apply_activation_gate(
    outcome: AuthorizationOutcome,
    kind: LicenseKind,
) -> AuthorizationOutcome {
    if outcome.is_authorized() && kind.requires_activation() {
        AuthorizationOutcome::NeedsActivation
    } else {
        outcome
    }
}

/// Classifies a status for a key of the given kind.
///
/// Callers persist credentials only when the result is authorized.
#[must_use]
pub fn classify(status: ValidationStatus, kind: LicenseKind, days_left: i32) -> AuthorizationOutcome {
    apply_activation_gate(classify_status(status, days_left), kind)
}

/// Both stages of classifying one engine report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Outcome from the status cascade alone.
    pub base: AuthorizationOutcome,
    /// Outcome after the activation gate. This is the decision.
    pub outcome: AuthorizationOutcome,
}

impl Classification {
    /// Returns true if the credentials behind this report may be persisted.
    #[must_use]
    pub fn should_persist(&self) -> bool {
        self.outcome.is_authorized()
    }
}

/// Classifies an engine report.
#[must_use]
pub fn classify_report(report: &KeyReport) -> Classification {
    let base = classify_status(report.status, report.days_left);
    let outcome = apply_activation_gate(base, report.kind);
    debug!(
        status = %report.status,
        kind = %report.kind,
        base = ?base,
        outcome = ?outcome,
        "Classified license status"
    );
    Classification { base, outcome }
}
