//! Shared test doubles for license tests.

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tollgate_license::{
    ClientIdentity, Credentials, EngineError, EngineResult, FixedClock, KeyReport, KeyStore,
    LicenseEngine, LicenseInfo, LicenseKind, LicenseServer, StorageMedium, ValidationStatus,
    ValidatorConfig,
};
use tollgate_keystore::{KeyStoreError, KeyStoreResult, MemoryKeyStore};

pub const MACHINE: &str = "machine-1";
pub const SERVER_URL: &str = "https://licensing.example.com/service";

/// Installs a test subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("tollgate_license=debug")
        .with_test_writer()
        .try_init();
}

/// A fixed instant used as "local now" by the tests.
pub fn local_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0).unwrap()
}

pub fn fixed_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::new(local_now()))
}

/// Config with no server, no trial key and all checks off.
pub fn base_config() -> ValidatorConfig {
    ValidatorConfig::default()
        .with_trial_key(None)
        .with_host_name("test-host")
        .with_store_keys_to(StorageMedium::Registry)
}

/// Config pointing at the test server with both checks on.
pub fn server_config() -> ValidatorConfig {
    base_config()
        .with_server_url(SERVER_URL)
        .with_revocation_check(true)
        .with_registration_check(true)
}

pub fn report(status: ValidationStatus, kind: LicenseKind) -> KeyReport {
    KeyReport::new(status, kind, 0)
}

pub fn permanent(kind: LicenseKind) -> KeyReport {
    report(ValidationStatus::PERMANENT, kind)
}

pub fn trial(days_left: i32) -> KeyReport {
    KeyReport::new(ValidationStatus::DEMO, LicenseKind::Evaluation, days_left)
}

pub fn expired_trial() -> KeyReport {
    KeyReport::new(
        ValidationStatus::DEMO | ValidationStatus::EXPIRED,
        LicenseKind::Evaluation,
        0,
    )
}

// ── Engine ───────────────────────────────────────────────────────

/// Engine that answers from a table of keys and records every call.
#[derive(Default)]
pub struct MockEngine {
    reports: Mutex<HashMap<String, KeyReport>>,
    failing: Mutex<Vec<String>>,
    calls: Mutex<Vec<String>>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(self, key: &str, report: KeyReport) -> Self {
        self.reports.lock().unwrap().insert(key.to_string(), report);
        self
    }

    pub fn with_failing_key(self, key: &str) -> Self {
        self.failing.lock().unwrap().push(key.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl LicenseEngine for MockEngine {
    fn validate(&self, key: &str, _machine_id: &str) -> EngineResult<KeyReport> {
        self.calls.lock().unwrap().push(key.to_string());
        if self.failing.lock().unwrap().iter().any(|k| k == key) {
            return Err(EngineError::Rejected("engine unavailable".into()));
        }
        Ok(self
            .reports
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .unwrap_or_else(|| report(ValidationStatus::KEY_INVALID, LicenseKind::Generic)))
    }
}

// ── Server ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerCall {
    Ping,
    IsRevoked(String),
    IsIllegalComputer {
        activation_key: String,
        computer_key: Option<String>,
        machine_id: String,
        host_name: String,
        client_version: String,
    },
    Activate(String),
}

pub enum Ping {
    Offset(Duration),
    Unreachable,
    Error,
}

/// Scripted license server. Responses are JSON-encoded `LicenseInfo`.
pub struct MockServer {
    ping: Mutex<Ping>,
    revoked: Mutex<bool>,
    illegal: Mutex<Option<String>>,
    activation: Mutex<Option<String>>,
    calls: Mutex<Vec<ServerCall>>,
}

impl Default for MockServer {
    fn default() -> Self {
        Self {
            ping: Mutex::new(Ping::Offset(Duration::zero())),
            revoked: Mutex::new(false),
            illegal: Mutex::new(None),
            activation: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl MockServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Server clock is `offset` ahead of `local_now()`.
    pub fn with_clock_offset(self, offset: Duration) -> Self {
        *self.ping.lock().unwrap() = Ping::Offset(offset);
        self
    }

    pub fn unreachable(self) -> Self {
        *self.ping.lock().unwrap() = Ping::Unreachable;
        self
    }

    pub fn failing_ping(self) -> Self {
        *self.ping.lock().unwrap() = Ping::Error;
        self
    }

    pub fn revoking(self) -> Self {
        *self.revoked.lock().unwrap() = true;
        self
    }

    /// Reports the computer as illegal with the given server message.
    pub fn rejecting_computer(self, message: &str) -> Self {
        let info = LicenseInfo {
            message: Some(message.to_string()),
            ..LicenseInfo::default()
        };
        *self.illegal.lock().unwrap() = Some(serde_json::to_string(&info).unwrap());
        self
    }

    /// Answers activation requests by issuing `computer_key`.
    pub fn issuing(self, computer_key: &str) -> Self {
        let info = LicenseInfo {
            computer_key: Some(computer_key.to_string()),
            ..LicenseInfo::default()
        };
        *self.activation.lock().unwrap() = Some(serde_json::to_string(&info).unwrap());
        self
    }

    /// Answers activation requests with a raw body.
    pub fn answering_activation(self, raw: &str) -> Self {
        *self.activation.lock().unwrap() = Some(raw.to_string());
        self
    }

    pub fn calls(&self) -> Vec<ServerCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn was_contacted(&self) -> bool {
        !self.calls.lock().unwrap().is_empty()
    }

    fn record(&self, call: ServerCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl LicenseServer for MockServer {
    fn ping(&self, _url: &str) -> EngineResult<Option<DateTime<Utc>>> {
        self.record(ServerCall::Ping);
        match &*self.ping.lock().unwrap() {
            Ping::Offset(offset) => Ok(Some(local_now() + *offset)),
            Ping::Unreachable => Ok(None),
            Ping::Error => Err(EngineError::Transport("connection refused".into())),
        }
    }

    fn is_revoked(&self, _url: &str, activation_key: &str) -> EngineResult<bool> {
        self.record(ServerCall::IsRevoked(activation_key.to_string()));
        Ok(*self.revoked.lock().unwrap())
    }

    fn is_illegal_computer(
        &self,
        _url: &str,
        client: &ClientIdentity<'_>,
        computer_key: Option<&str>,
    ) -> EngineResult<(bool, String)> {
        self.record(ServerCall::IsIllegalComputer {
            activation_key: client.activation_key.to_string(),
            computer_key: computer_key.map(String::from),
            machine_id: client.machine_id.to_string(),
            host_name: client.host_name.to_string(),
            client_version: client.client_version.to_string(),
        });
        match &*self.illegal.lock().unwrap() {
            Some(raw) => Ok((true, raw.clone())),
            None => Ok((false, String::new())),
        }
    }

    fn activate(&self, _url: &str, client: &ClientIdentity<'_>) -> EngineResult<String> {
        self.record(ServerCall::Activate(client.activation_key.to_string()));
        self.activation
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| EngineError::Transport("no activation scripted".into()))
    }

    fn parse_response(&self, raw: &str) -> EngineResult<LicenseInfo> {
        serde_json::from_str(raw).map_err(|e| EngineError::MalformedResponse(e.to_string()))
    }
}

// ── Key store ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    Read(StorageMedium),
    Write(StorageMedium, Credentials),
    Delete(StorageMedium),
}

/// In-memory store that records operations and can fail on demand.
#[derive(Default)]
pub struct RecordingStore {
    inner: MemoryKeyStore,
    ops: Mutex<Vec<StoreOp>>,
    failing_delete: Mutex<Option<StorageMedium>>,
    failing_read: Mutex<bool>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keys(medium: StorageMedium, activation: Option<&str>, computer: Option<&str>) -> Self {
        Self {
            inner: MemoryKeyStore::with_keys(medium, Credentials::new(activation, computer)),
            ..Self::default()
        }
    }

    pub fn failing_delete_on(self, medium: StorageMedium) -> Self {
        *self.failing_delete.lock().unwrap() = Some(medium);
        self
    }

    pub fn failing_reads(self) -> Self {
        *self.failing_read.lock().unwrap() = true;
        self
    }

    pub fn ops(&self) -> Vec<StoreOp> {
        self.ops.lock().unwrap().clone()
    }

    pub fn writes(&self) -> Vec<(StorageMedium, Credentials)> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                StoreOp::Write(m, c) => Some((m, c)),
                _ => None,
            })
            .collect()
    }

    pub fn deletes(&self) -> Vec<StorageMedium> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                StoreOp::Delete(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    pub fn stored(&self, medium: StorageMedium) -> Credentials {
        self.inner.read(medium).unwrap()
    }
}

impl KeyStore for RecordingStore {
    fn read(&self, medium: StorageMedium) -> KeyStoreResult<Credentials> {
        self.ops.lock().unwrap().push(StoreOp::Read(medium));
        if *self.failing_read.lock().unwrap() {
            return Err(KeyStoreError::Unavailable(medium, "medium offline".into()));
        }
        self.inner.read(medium)
    }

    fn write(&self, medium: StorageMedium, credentials: &Credentials) -> KeyStoreResult<()> {
        self.ops
            .lock()
            .unwrap()
            .push(StoreOp::Write(medium, credentials.clone()));
        self.inner.write(medium, credentials)
    }

    fn delete(&self, medium: StorageMedium) -> KeyStoreResult<()> {
        self.ops.lock().unwrap().push(StoreOp::Delete(medium));
        if *self.failing_delete.lock().unwrap() == Some(medium) {
            return Err(KeyStoreError::Io(std::io::Error::other("access denied")));
        }
        self.inner.delete(medium)
    }
}
