use pretty_assertions::assert_eq;
use tollgate_types::AuthorizationOutcome;

#[test]
fn authorized_outcomes() {
    assert!(AuthorizationOutcome::Valid.is_authorized());
    assert!(AuthorizationOutcome::ValidTrial { days_remaining: 0 }.is_authorized());
    assert!(!AuthorizationOutcome::TrialExpired.is_authorized());
    assert!(!AuthorizationOutcome::Invalid.is_authorized());
    assert!(!AuthorizationOutcome::WrongVersion.is_authorized());
    assert!(!AuthorizationOutcome::NeedsActivation.is_authorized());
}

#[test]
fn reactivatable_outcomes() {
    assert!(AuthorizationOutcome::WrongVersion.is_reactivatable());
    assert!(AuthorizationOutcome::TrialExpired.is_reactivatable());
    assert!(!AuthorizationOutcome::Invalid.is_reactivatable());
    assert!(!AuthorizationOutcome::Valid.is_reactivatable());
}

#[test]
fn trial_outcomes() {
    assert!(AuthorizationOutcome::TrialExpired.is_trial());
    assert!(AuthorizationOutcome::ValidTrial { days_remaining: 3 }.is_trial());
    assert!(!AuthorizationOutcome::Valid.is_trial());
}

#[test]
fn days_remaining_only_for_running_trial() {
    assert_eq!(
        AuthorizationOutcome::ValidTrial { days_remaining: 12 }.days_remaining(),
        Some(12)
    );
    assert_eq!(AuthorizationOutcome::TrialExpired.days_remaining(), None);
    assert_eq!(AuthorizationOutcome::Valid.days_remaining(), None);
}

#[test]
fn needs_activation_flag() {
    assert!(AuthorizationOutcome::NeedsActivation.needs_activation());
    assert!(!AuthorizationOutcome::Valid.needs_activation());
}

#[test]
fn display_mentions_days() {
    let msg = AuthorizationOutcome::ValidTrial { days_remaining: 5 }.to_string();
    assert!(msg.contains("5 day"));
}

#[test]
fn serde_tagged() {
    let json = serde_json::to_string(&AuthorizationOutcome::ValidTrial { days_remaining: 7 }).unwrap();
    assert_eq!(json, r#"{"outcome":"valid_trial","days_remaining":7}"#);
    let parsed: AuthorizationOutcome = serde_json::from_str(r#"{"outcome":"wrong_version"}"#).unwrap();
    assert_eq!(parsed, AuthorizationOutcome::WrongVersion);
}
