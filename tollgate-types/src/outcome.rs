//! The authorization decision produced by a single validation call.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Exactly one outcome results from classifying a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AuthorizationOutcome {
    /// The key is valid and does not expire.
    Valid,
    /// The key is a valid evaluation key.
    ValidTrial {
        /// Days left in the evaluation period.
        days_remaining: i32,
    },
    /// The evaluation period has ended.
    TrialExpired,
    /// The key is unusable on this machine.
    Invalid,
    /// The key is valid for a different product version.
    WrongVersion,
    /// The key is valid but must be exchanged for a computer key first.
    NeedsActivation,
}

impl AuthorizationOutcome {
    /// Returns true if the application may run (`Valid` or `ValidTrial`).
    #[must_use]
    pub fn is_authorized(&self) -> bool {
        matches!(self, Self::Valid | Self::ValidTrial { .. })
    }

    /// Returns true if the key must go through server activation.
    #[must_use]
    pub fn needs_activation(&self) -> bool {
        matches!(self, Self::NeedsActivation)
    }

    /// Returns true if a server reactivation may recover this outcome.
    #[must_use]
    pub fn is_reactivatable(&self) -> bool {
        matches!(self, Self::WrongVersion | Self::TrialExpired)
    }

    /// Returns true for evaluation outcomes, expired or not.
    #[must_use]
    pub fn is_trial(&self) -> bool {
        matches!(self, Self::ValidTrial { .. } | Self::TrialExpired)
    }

    /// Returns the remaining trial days, if this is a running trial.
    #[must_use]
    pub fn days_remaining(&self) -> Option<i32> {
        match self {
            Self::ValidTrial { days_remaining } => Some(*days_remaining),
            _ => None,
        }
    }
}

impl fmt::Display for AuthorizationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid => write!(f, "license is valid"),
            Self::ValidTrial { days_remaining } => {
                write!(f, "evaluation license, {days_remaining} day(s) remaining")
            }
            Self::TrialExpired => write!(f, "evaluation license has expired"),
            Self::Invalid => write!(f, "license key is invalid"),
            Self::WrongVersion => write!(f, "license key is for a different product version"),
            Self::NeedsActivation => write!(f, "license key requires activation"),
        }
    }
}
