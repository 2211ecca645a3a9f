//! Cross-checks against the `jsonwebtoken` crate.
//!
//! `jsonwebtoken` validates `exp` against the wall clock, so these tests pin
//! the policy clock to the current time.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use jwt_core::{Algorithm, TokenService};
use jwt_test_utils::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct InteropClaims {
    iss: String,
    sub: String,
    aud: Vec<String>,
    exp: i64,
    nbf: i64,
    iat: i64,
    jti: String,
}

fn validation(alg: jsonwebtoken::Algorithm) -> Validation {
    let mut validation = Validation::new(alg);
    validation.set_audience(&[TEST_AUDIENCE]);
    validation.set_issuer(&[TEST_ISSUER]);
    validation.validate_nbf = true;
    validation
}

#[test]
fn test_hs256_token_is_accepted_by_jsonwebtoken() -> Result<(), anyhow::Error> {
    let service = TokenService::new(TestPolicy::hmac().with_wall_clock())?;
    let now = chrono::Utc::now().timestamp_millis();

    let mut token = service.issue(
        Some(Algorithm::HS256),
        now + 300_000,
        None,
        TEST_SUBJECT,
        TEST_ISSUER,
        &[TEST_AUDIENCE],
    )?;
    let wire = service.sign_and_encode(Some(TEST_HMAC_SECRET), &mut token)?;

    let decoded = decode::<InteropClaims>(
        &wire,
        &DecodingKey::from_secret(TEST_HMAC_SECRET),
        &validation(jsonwebtoken::Algorithm::HS256),
    )?;
    assert_eq!(decoded.claims.sub, TEST_SUBJECT);
    assert_eq!(Some(decoded.claims.jti.as_str()), token.token_id());
    assert_eq!(decoded.header.typ.as_deref(), Some("JWT"));
    Ok(())
}

#[test]
fn test_hs256_token_from_jsonwebtoken_is_accepted() -> Result<(), anyhow::Error> {
    let service = TokenService::new(TestPolicy::hmac().with_wall_clock())?;
    let now = chrono::Utc::now().timestamp();

    let claims = InteropClaims {
        iss: TEST_ISSUER.to_string(),
        sub: TEST_SUBJECT.to_string(),
        aud: vec![TEST_AUDIENCE.to_string()],
        exp: now + 300,
        nbf: now,
        iat: now,
        jti: "interop-token-id".to_string(),
    };
    let wire = encode(
        &Header::new(jsonwebtoken::Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(TEST_HMAC_SECRET),
    )?;

    let token = service
        .validate(Some(TEST_HMAC_SECRET), &wire, None)
        .ok_or_else(|| anyhow::anyhow!("jsonwebtoken HS256 token should validate"))?;
    assert_eq!(token.token_id(), Some("interop-token-id"));
    assert_eq!(token.issued_at(), Some(now));

    assert!(service
        .validate(Some(TEST_HMAC_SECRET_OTHER), &wire, None)
        .is_none());
    Ok(())
}

#[test]
fn test_ed25519_token_is_accepted_by_jsonwebtoken() -> Result<(), anyhow::Error> {
    let keys = test_ed25519_key(11)?;
    let service = TokenService::new(TestPolicy::key_based().with_wall_clock())?;
    let now = chrono::Utc::now().timestamp_millis();

    let mut token = service.issue(
        Some(Algorithm::Ed25519),
        now + 300_000,
        None,
        TEST_SUBJECT,
        TEST_ISSUER,
        &[TEST_AUDIENCE],
    )?;
    let wire = service.sign_and_encode(Some(&keys.private_pkcs8), &mut token)?;

    let decoded = decode::<InteropClaims>(
        &wire,
        &DecodingKey::from_ed_der(&keys.public_key),
        &validation(jsonwebtoken::Algorithm::EdDSA),
    )?;
    assert_eq!(decoded.header.alg, jsonwebtoken::Algorithm::EdDSA);
    assert_eq!(Some(decoded.claims.jti.as_str()), token.token_id());
    Ok(())
}

#[test]
fn test_jsonwebtoken_eddsa_signature_verifies_once_curve_is_named() -> Result<(), anyhow::Error> {
    let keys = test_ed25519_key(12)?;
    let service = TokenService::new(TestPolicy::key_based().with_wall_clock())?;
    let now = chrono::Utc::now().timestamp();

    let claims = InteropClaims {
        iss: TEST_ISSUER.to_string(),
        sub: TEST_SUBJECT.to_string(),
        aud: vec![TEST_AUDIENCE.to_string()],
        exp: now + 300,
        nbf: now,
        iat: now,
        jti: "interop-eddsa".to_string(),
    };

    // Without `crv` the EdDSA marker does not resolve to a concrete curve.
    let bare = encode(
        &Header::new(jsonwebtoken::Algorithm::EdDSA),
        &claims,
        &EncodingKey::from_ed_der(&keys.private_pkcs8),
    )?;
    assert!(service.validate(Some(&keys.public_key), &bare, None).is_none());

    // The signature primitive itself is compatible.
    let (input, signature) = bare.rsplit_once('.').unwrap();
    assert!(jwt_core::Signer::verify(
        &Algorithm::Ed25519,
        &keys.public_key,
        input.as_bytes(),
        signature
    ));
    Ok(())
}
