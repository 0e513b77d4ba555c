//! Licensing and activation for Tollgate.
//!
//! This crate decides whether a product installation may run:
//! - Classifying the license engine's status bitmask into an outcome
//! - Persisting keys that validated locally
//! - Reconciling a valid key with the license server (clock skew,
//!   revocation, registration)
//! - Reactivating expired or wrong-version keys to pick up renewals
//!
//! # Design Principles
//!
//! - **Opt-in server checks**: No network call unless a check is enabled
//! - **Best-effort connectivity**: An unreachable server never invalidates a
//!   license that is valid locally
//! - **Fail closed locally**: Unknown or contradictory status bits classify
//!   as invalid
//! - **Per-call state**: Every validation starts from a reset session
//!
//! # Boundaries
//!
//! Key decoding and the server protocol are supplied by the caller through
//! [`LicenseEngine`] and [`LicenseServer`]; key persistence through
//! [`tollgate_keystore::KeyStore`].

mod clock;
mod config;
mod device;
mod engine;
mod error;
mod interpreter;
mod reactivation;
mod reconciler;
mod session;
mod validator;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{
    DEFAULT_CLIENT_VERSION, DEFAULT_MAX_CLOCK_SKEW_HOURS, EMBEDDED_TRIAL_KEY, ProductDefinition,
    ValidatorConfig,
};
pub use device::MachineIdentity;
pub use engine::{ClientIdentity, EngineError, EngineResult, KeyReport, LicenseEngine, LicenseServer};
pub use error::{LicenseError, LicenseResult};
pub use interpreter::{Classification, apply_activation_gate, classify, classify_report, classify_status};
pub use reconciler::{ServerReconciler, delete_all_keys};
pub use session::ValidationSession;
pub use validator::{LicenseValidator, ValidationReport};

pub use tollgate_keystore::{KeyStore, StorageMedium};
pub use tollgate_types::{
    AuthorizationOutcome, Credentials, LicenseInfo, LicenseKind, ServerVerdict, ValidationStatus,
};
