//! Revocation, ledger cleanup and refresh.

use jwt_core::service::REVOCATION_GRACE_MILLIS;
use jwt_core::{Algorithm, Token, TokenService};
use jwt_test_utils::*;

fn service() -> TokenService<TestPolicy> {
    init_test_tracing();
    TokenService::new(TestPolicy::hmac()).unwrap()
}

fn signed(service: &TokenService<TestPolicy>, lifetime_millis: i64) -> (Token, String) {
    let mut token = service
        .issue(
            Some(Algorithm::HS256),
            TEST_NOW_MILLIS + lifetime_millis,
            None,
            TEST_SUBJECT,
            TEST_ISSUER,
            &[TEST_AUDIENCE],
        )
        .unwrap();
    let wire = service
        .sign_and_encode(Some(TEST_HMAC_SECRET), &mut token)
        .unwrap();
    (token, wire)
}

#[test]
fn test_revoked_token_is_rejected_until_cleaned() {
    let service = service();
    let (token, wire) = signed(&service, 60_000);
    assert!(service.validate(Some(TEST_HMAC_SECRET), &wire, None).is_some());

    service.invalidate(&token);
    assert!(service.is_revoked_token(&token));
    assert!(service.validate(Some(TEST_HMAC_SECRET), &wire, None).is_none());

    // Still listed after the token itself expired.
    service.policy().advance_millis(60_000);
    service.clean_revocations();
    assert!(service.is_revoked_token(&token));

    service.policy().advance_millis(REVOCATION_GRACE_MILLIS);
    service.clean_revocations();
    assert!(!service.is_revoked_token(&token));
    assert!(service.ledger().is_empty());
}

#[test]
fn test_revoking_one_token_leaves_others_valid() {
    let service = service();
    let (first, first_wire) = signed(&service, 60_000);
    let (_, second_wire) = signed(&service, 60_000);

    service.invalidate(&first);

    assert!(service.validate(Some(TEST_HMAC_SECRET), &first_wire, None).is_none());
    assert!(service.validate(Some(TEST_HMAC_SECRET), &second_wire, None).is_some());
}

#[test]
fn test_revoked_signature_cannot_be_replayed_reencoded() {
    let service = service();
    let (token, wire) = signed(&service, 60_000);
    service.invalidate(&token);

    for replay in [wire.clone(), format!("{wire}="), format!("{wire} "), format!("{wire}==")] {
        assert!(
            service.validate(Some(TEST_HMAC_SECRET), &replay, None).is_none(),
            "{replay:?} must stay revoked"
        );
    }
}

#[test]
fn test_invalidate_by_raw_signature() -> Result<(), anyhow::Error> {
    let service = service();
    let (token, wire) = signed(&service, 60_000);
    let signature = wire.rsplit('.').next().unwrap();
    assert_eq!(Some(signature), token.signature());

    service.invalidate_signature(signature, TEST_NOW_MILLIS)?;
    assert!(service.is_revoked(signature));
    assert!(service.validate(Some(TEST_HMAC_SECRET), &wire, None).is_none());

    service.policy().advance_millis(REVOCATION_GRACE_MILLIS);
    service.clean_revocations();
    assert!(!service.is_revoked(signature));
    Ok(())
}

#[test]
fn test_invalidate_rejects_negative_expiration() {
    let service = service();
    let err = service.invalidate_signature("sig", -5).unwrap_err();
    assert_eq!(err.to_string(), "Expiration must be positive number but was -5");
    assert!(!service.is_revoked("sig"));
}

#[test]
fn test_refresh_extends_by_timeout() -> Result<(), anyhow::Error> {
    let service = service();
    let (token, old_wire) = signed(&service, 5_000);
    let old_id = token.token_id().map(str::to_string);
    let issued_at = token.issued_at();

    let mut refreshed = service.refresh(token, 10_000, 1_000)?;
    assert_eq!(refreshed.expiration_millis(), Some(TEST_NOW_MILLIS + 1_000));
    assert_eq!(refreshed.issued_at(), issued_at);
    assert_ne!(refreshed.token_id().map(str::to_string), old_id);

    let new_wire = service.sign_and_encode(Some(TEST_HMAC_SECRET), &mut refreshed)?;
    assert!(service.validate(Some(TEST_HMAC_SECRET), &old_wire, None).is_none());
    assert!(service.validate(Some(TEST_HMAC_SECRET), &new_wire, None).is_some());
    Ok(())
}

#[test]
fn test_refresh_is_capped_at_max_age() -> Result<(), anyhow::Error> {
    let service = service();
    let (token, _) = signed(&service, 5_000);
    let issued_at = token.issued_at().unwrap();

    let refreshed = service.refresh(token, 10_000, 20_000)?;
    assert_eq!(refreshed.expiration_millis(), Some(issued_at * 1000 + 10_000));
    Ok(())
}

#[test]
fn test_refresh_late_in_session_is_capped() -> Result<(), anyhow::Error> {
    let service = service();
    let (token, _) = signed(&service, 60_000);
    let issued_at = token.issued_at().unwrap();

    service.policy().advance_millis(50_000);
    let refreshed = service.refresh(token, 55_000, 30_000)?;
    assert_eq!(refreshed.expiration_millis(), Some(issued_at * 1000 + 55_000));
    Ok(())
}

#[test]
fn test_refreshing_twice_revokes_each_predecessor() -> Result<(), anyhow::Error> {
    let service = service();
    let (token, first_wire) = signed(&service, 60_000);

    let mut second = service.refresh(token, 600_000, 60_000)?;
    let second_wire = service.sign_and_encode(Some(TEST_HMAC_SECRET), &mut second)?;
    let mut third = service.refresh(second, 600_000, 60_000)?;
    let third_wire = service.sign_and_encode(Some(TEST_HMAC_SECRET), &mut third)?;

    assert!(service.validate(Some(TEST_HMAC_SECRET), &first_wire, None).is_none());
    assert!(service.validate(Some(TEST_HMAC_SECRET), &second_wire, None).is_none());
    assert!(service.validate(Some(TEST_HMAC_SECRET), &third_wire, None).is_some());
    Ok(())
}

#[test]
fn test_concurrent_revocation_and_validation() {
    let service = service();
    let tokens: Vec<(Token, String)> = (0..16).map(|_| signed(&service, 60_000)).collect();

    std::thread::scope(|s| {
        for (token, _) in tokens.iter().step_by(2) {
            let service = &service;
            s.spawn(move || service.invalidate(token));
        }
        for (_, wire) in tokens.iter().skip(1).step_by(2) {
            let service = &service;
            s.spawn(move || {
                assert!(service.validate(Some(TEST_HMAC_SECRET), wire, None).is_some());
            });
        }
        let service = &service;
        s.spawn(move || service.clean_revocations());
    });

    assert_eq!(service.ledger().len(), 8);
    for (i, (_, wire)) in tokens.iter().enumerate() {
        let valid = service.validate(Some(TEST_HMAC_SECRET), wire, None).is_some();
        assert_eq!(valid, i % 2 == 1, "token {i}");
    }
}
