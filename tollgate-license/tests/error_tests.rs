use tollgate_keystore::{KeyStoreError, StorageMedium};
use tollgate_license::{EngineError, LicenseError};

#[test]
fn error_display_no_credentials() {
    assert_eq!(LicenseError::NoCredentials.to_string(), "no credentials");
}

#[test]
fn error_display_invalid_credential() {
    let err = LicenseError::InvalidCredential("tampered".into());
    let msg = format!("{err}");
    assert!(msg.contains("invalid license key"));
    assert!(msg.contains("tampered"));
}

#[test]
fn error_display_clock_skew() {
    let err = LicenseError::ClockSkew { hours: 30.25 };
    let msg = format!("{err}");
    assert!(msg.contains("does not match the server time"));
    assert!(msg.contains("30.2") || msg.contains("30.3"));
}

#[test]
fn error_display_revoked() {
    assert!(format!("{}", LicenseError::Revoked).contains("revoked"));
}

#[test]
fn error_display_not_registered() {
    let err = LicenseError::NotRegistered("unknown machine".into());
    let msg = format!("{err}");
    assert!(msg.contains("not registered"));
    assert!(msg.contains("unknown machine"));
}

#[test]
fn error_display_unreachable() {
    let err = LicenseError::ServerUnreachable("timeout".into());
    assert!(format!("{err}").contains("unreachable"));
}

#[test]
fn error_from_keystore() {
    let err: LicenseError =
        KeyStoreError::Unavailable(StorageMedium::Registry, "no profile".into()).into();
    assert!(format!("{err}").contains("storage"));
}

#[test]
fn error_from_engine() {
    let err: LicenseError = EngineError::Transport("reset by peer".into()).into();
    let msg = format!("{err}");
    assert!(msg.contains("license engine error"));
    assert!(msg.contains("reset by peer"));
}

#[test]
fn error_from_serde_json() {
    let serde_err: Result<serde_json::Value, _> = serde_json::from_str("not json");
    let license_err: LicenseError = serde_err.unwrap_err().into();
    assert!(format!("{license_err}").contains("serialization"));
}

#[test]
fn fatal_errors() {
    assert!(LicenseError::ClockSkew { hours: 25.0 }.is_fatal());
    assert!(LicenseError::Revoked.is_fatal());
    assert!(LicenseError::NotRegistered(String::new()).is_fatal());
    assert!(!LicenseError::ServerUnreachable(String::new()).is_fatal());
    assert!(!LicenseError::TrialExpired.is_fatal());
}

#[test]
fn only_server_invalidation_erases_keys() {
    assert!(LicenseError::Revoked.erases_keys());
    assert!(LicenseError::NotRegistered(String::new()).erases_keys());
    assert!(!LicenseError::ClockSkew { hours: 30.0 }.erases_keys());
    assert!(!LicenseError::WrongVersion.erases_keys());
}
