//! Boundaries to the license engine and the license server.
//!
//! Key decoding, signature checks and the server wire protocol belong to an
//! external licensing library. The validator only sees the two traits below:
//! [`LicenseEngine`] turns a key into a [`KeyReport`], [`LicenseServer`]
//! performs the raw server round trips. Both are blocking; a caller that
//! needs a timeout runs the validator on a worker thread.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tollgate_types::{LicenseInfo, LicenseKind, ValidationStatus};

/// Errors reported by an engine or server implementation.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The request could not be delivered or the reply never arrived.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with something the engine could not parse.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The server or engine explicitly refused the request.
    #[error("request rejected: {0}")]
    Rejected(String),
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// What the engine derived from validating one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyReport {
    /// Condition flags for the key.
    pub status: ValidationStatus,
    /// Days left for evaluation keys.
    pub days_left: i32,
    /// Kind of license the key encodes.
    pub kind: LicenseKind,
    /// Engine's human-readable summary. Empty when there is nothing to say.
    pub message: String,
}

impl KeyReport {
    /// Creates a report with no message.
    #[must_use]
    pub fn new(status: ValidationStatus, kind: LicenseKind, days_left: i32) -> Self {
        Self {
            status,
            days_left,
            kind,
            message: String::new(),
        }
    }

    /// Attaches the engine's message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

/// Decodes and checks license keys locally.
pub trait LicenseEngine {
    /// Validates `key` for `machine_id` and reports its status, kind and
    /// remaining days.
    fn validate(&self, key: &str, machine_id: &str) -> EngineResult<KeyReport>;
}

/// Identifies this installation to the license server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity<'a> {
    /// Activation key the installation was licensed with.
    pub activation_key: &'a str,
    /// Machine identifier passed to validation.
    pub machine_id: &'a str,
    /// Host name reported to the server.
    pub host_name: &'a str,
    /// Version string of the licensing client.
    pub client_version: &'a str,
}

/// Raw calls against the license server.
pub trait LicenseServer {
    /// Asks the server for its current time. `Ok(None)` means unreachable.
    fn ping(&self, url: &str) -> EngineResult<Option<DateTime<Utc>>>;

    /// Returns true if the server has revoked `activation_key`.
    fn is_revoked(&self, url: &str, activation_key: &str) -> EngineResult<bool>;

    /// Checks whether the server knows this computer for the activation key.
    ///
    /// Returns whether the computer is illegal plus the raw server response.
    fn is_illegal_computer(
        &self,
        url: &str,
        client: &ClientIdentity<'_>,
        computer_key: Option<&str>,
    ) -> EngineResult<(bool, String)>;

    /// Requests (re)activation and returns the raw server response.
    fn activate(&self, url: &str, client: &ClientIdentity<'_>) -> EngineResult<String>;

    /// Parses a raw server response into license info.
    fn parse_response(&self, raw: &str) -> EngineResult<LicenseInfo>;
}

impl<T: LicenseEngine + ?Sized> LicenseEngine for &T {
    fn validate(&self, key: &str, machine_id: &str) -> EngineResult<KeyReport> {
        (**self).validate(key, machine_id)
    }
}

impl<T: LicenseServer + ?Sized> LicenseServer for &T {
    fn ping(&self, url: &str) -> EngineResult<Option<DateTime<Utc>>> {
        (**self).ping(url)
    }

    fn is_revoked(&self, url: &str, activation_key: &str) -> EngineResult<bool> {
        (**self).is_revoked(url, activation_key)
    }

    fn is_illegal_computer(
        &self,
        url: &str,
        client: &ClientIdentity<'_>,
        computer_key: Option<&str>,
    ) -> EngineResult<(bool, String)> {
        (**self).is_illegal_computer(url, client, computer_key)
    }

    fn activate(&self, url: &str, client: &ClientIdentity<'_>) -> EngineResult<String> {
        (**self).activate(url, client)
    }

    fn parse_response(&self, raw: &str) -> EngineResult<LicenseInfo> {
        (**self).parse_response(raw)
    }
}
