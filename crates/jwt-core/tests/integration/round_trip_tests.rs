//! Sign-then-validate across every supported algorithm.

use jwt_core::{Algorithm, Signer, Token, TokenService};
use jwt_test_utils::*;

fn issue<P: jwt_core::TokenPolicy>(service: &TokenService<P>, algorithm: Algorithm) -> Token {
    service
        .issue(
            Some(algorithm),
            TEST_NOW_MILLIS + 300_000,
            None,
            TEST_SUBJECT,
            TEST_ISSUER,
            &[TEST_AUDIENCE],
        )
        .unwrap()
}

#[test]
fn test_hmac_round_trip_all_sizes() -> Result<(), anyhow::Error> {
    let service = TokenService::new(TestPolicy::hmac())?;

    for algorithm in Algorithm::hmac_algorithms() {
        let mut token = issue(&service, algorithm);
        let wire = service.sign_and_encode(Some(TEST_HMAC_SECRET), &mut token)?;

        let decoded = service
            .validate(Some(TEST_HMAC_SECRET), &wire, None)
            .ok_or_else(|| anyhow::anyhow!("{algorithm} token should validate"))?;
        assert_eq!(decoded.token_id(), token.token_id());
        assert_eq!(decoded.signature(), token.signature());
        assert_eq!(decoded.algorithm(), Some(algorithm));

        assert!(
            service
                .validate(Some(TEST_HMAC_SECRET_OTHER), &wire, None)
                .is_none(),
            "{algorithm} token must not validate under another secret"
        );
    }
    Ok(())
}

#[test]
fn test_ecdsa_round_trip() -> Result<(), anyhow::Error> {
    let service = TokenService::new(TestPolicy::key_based())?;

    for (algorithm, keys) in [
        (Algorithm::ES256, test_es256_key()?),
        (Algorithm::ES384, test_es384_key()?),
    ] {
        let mut token = issue(&service, algorithm);
        let wire = service.sign_and_encode(Some(&keys.private_pkcs8), &mut token)?;

        wire.assert_wire_format().assert_header_alg(algorithm.id());
        let decoded = service
            .validate(Some(&keys.public_key), &wire, None)
            .ok_or_else(|| anyhow::anyhow!("{algorithm} token should validate"))?;
        assert_eq!(decoded.token_id(), token.token_id());
    }
    Ok(())
}

#[test]
fn test_ed25519_round_trip_with_key_lookup() -> Result<(), anyhow::Error> {
    let keys = test_ed25519_key(3)?;
    let service = TokenService::new(TestPolicy::key_based().with_key(TEST_KEY_ID_1, &keys.public_key))?;

    let mut token = issue(&service, Algorithm::Ed25519);
    token.header_mut().set_key_id(TEST_KEY_ID_1);
    let wire = service.sign_and_encode(Some(&keys.private_pkcs8), &mut token)?;

    let decoded = service
        .validate(None, &wire, None)
        .ok_or_else(|| anyhow::anyhow!("Ed25519 token should validate via kid lookup"))?;
    assert_eq!(decoded.algorithm(), Some(Algorithm::Ed25519));
    assert_eq!(decoded.subject(), Some(TEST_SUBJECT));

    let other = test_ed25519_key(4)?;
    assert!(service.validate(Some(&other.public_key), &wire, None).is_none());
    Ok(())
}

#[test]
fn test_unknown_key_id_has_no_secret() -> Result<(), anyhow::Error> {
    let keys = test_ed25519_key(3)?;
    let service = TokenService::new(TestPolicy::key_based().with_key(TEST_KEY_ID_1, &keys.public_key))?;

    let mut token = issue(&service, Algorithm::Ed25519);
    token.header_mut().set_key_id(TEST_KEY_ID_2);
    let wire = service.sign_and_encode(Some(&keys.private_pkcs8), &mut token)?;

    assert!(service.validate(None, &wire, None).is_none());
    Ok(())
}

#[test]
fn test_resigning_is_byte_identical() -> Result<(), anyhow::Error> {
    let keys = test_ed25519_key(5)?;
    let hmac = TokenService::new(TestPolicy::hmac())?;
    let edwards = TokenService::new(TestPolicy::key_based())?;

    let mut token = issue(&hmac, Algorithm::HS384);
    let wire = hmac.sign_and_encode(Some(TEST_HMAC_SECRET), &mut token)?;
    let mut decoded = hmac.validate(Some(TEST_HMAC_SECRET), &wire, None).unwrap();
    assert_eq!(hmac.sign_and_encode(Some(TEST_HMAC_SECRET), &mut decoded)?, wire);

    let mut token = issue(&edwards, Algorithm::Ed25519);
    let wire = edwards.sign_and_encode(Some(&keys.private_pkcs8), &mut token)?;
    let mut decoded = edwards.validate(Some(&keys.public_key), &wire, None).unwrap();
    assert_eq!(
        edwards.sign_and_encode(Some(&keys.private_pkcs8), &mut decoded)?,
        wire
    );
    Ok(())
}

#[test]
fn test_untrusted_issuer_and_foreign_audience() -> Result<(), anyhow::Error> {
    let service = TokenService::new(TestPolicy::hmac())?;

    let mut token = service.issue(
        Some(Algorithm::HS256),
        TEST_NOW_MILLIS + 60_000,
        None,
        TEST_SUBJECT,
        TEST_ISSUER_UNTRUSTED,
        &[TEST_AUDIENCE],
    )?;
    let wire = service.sign_and_encode(Some(TEST_HMAC_SECRET), &mut token)?;
    assert!(service.validate(Some(TEST_HMAC_SECRET), &wire, None).is_none());

    let mut token = service.issue(
        Some(Algorithm::HS256),
        TEST_NOW_MILLIS + 60_000,
        None,
        TEST_SUBJECT,
        TEST_ISSUER_OTHER,
        &[TEST_AUDIENCE_OTHER],
    )?;
    let wire = service.sign_and_encode(Some(TEST_HMAC_SECRET), &mut token)?;
    assert!(service.validate(Some(TEST_HMAC_SECRET), &wire, None).is_none());
    assert!(service
        .validate(Some(TEST_HMAC_SECRET), &wire, Some(TEST_AUDIENCE_OTHER))
        .is_some());
    Ok(())
}

#[test]
fn test_concurrent_validation() -> Result<(), anyhow::Error> {
    let service = TokenService::new(TestPolicy::hmac())?;
    let wires: Vec<String> = (0..8)
        .map(|_| {
            let mut token = issue(&service, Algorithm::HS256);
            service.sign_and_encode(Some(TEST_HMAC_SECRET), &mut token).unwrap()
        })
        .collect();

    std::thread::scope(|s| {
        for wire in &wires {
            let service = &service;
            s.spawn(move || {
                for _ in 0..50 {
                    assert!(service.validate(Some(TEST_HMAC_SECRET), wire, None).is_some());
                }
            });
        }
    });
    Ok(())
}
