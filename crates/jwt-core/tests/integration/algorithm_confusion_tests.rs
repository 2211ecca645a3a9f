//! Algorithm confusion and allow-list enforcement.
//!
//! The classic attack takes a verifier that trusts a public key, rewrites
//! `alg` to an HMAC id and signs with the public key bytes as the HMAC secret.

use jwt_core::config::TrustConfig;
use jwt_core::{Algorithm, JwtError, TokenPolicy, TokenService};
use jwt_test_utils::*;
use serde_json::json;
use std::collections::BTreeSet;

#[test]
fn test_mixed_allow_list_aborts_construction() {
    for (hmac, keyed) in [
        (Algorithm::HS256, Algorithm::Ed25519),
        (Algorithm::HS512, Algorithm::ES256),
        (Algorithm::HS384, Algorithm::ES384),
    ] {
        let result = TokenService::new(TestPolicy::allowing(&[hmac, keyed]));
        assert_eq!(
            result.err(),
            Some(JwtError::InsecureConfiguration),
            "{hmac} + {keyed} must be refused"
        );
    }
}

#[test]
fn test_mixed_trust_config_aborts_construction() {
    let config = TrustConfig::new([TEST_ISSUER], TEST_AUDIENCE, &[Algorithm::HS256, Algorithm::Ed25519]);
    let err = TokenService::new(config).unwrap_err();
    assert!(err.to_string().starts_with("Insecure configuration detected."));
}

/// A policy whose predicate accepts anything, including `None`.
struct PermissivePolicy {
    issuers: BTreeSet<String>,
}

impl TokenPolicy for PermissivePolicy {
    fn is_algorithm_allowed(&self, _algorithm: Option<Algorithm>) -> bool {
        true
    }

    fn issuers(&self) -> &BTreeSet<String> {
        &self.issuers
    }

    fn audience(&self) -> &str {
        TEST_AUDIENCE
    }
}

#[test]
fn test_permissive_predicate_is_refused() {
    let policy = PermissivePolicy {
        issuers: BTreeSet::from([TEST_ISSUER.to_string()]),
    };
    assert!(TokenService::new(policy).is_err());
}

#[test]
fn test_hmac_token_signed_with_public_key_is_rejected() -> Result<(), anyhow::Error> {
    let keys = test_ed25519_key(9)?;
    let service = TokenService::new(TestPolicy::key_based().with_key(TEST_KEY_ID_1, &keys.public_key))?;

    let forged = RawTokenBuilder::new()
        .algorithm(Algorithm::HS256)
        .header_claim("kid", json!(TEST_KEY_ID_1))
        .sign_with(Algorithm::HS256, &keys.public_key);

    assert!(service.validate(None, &forged, None).is_none());
    assert!(service.validate(Some(&keys.public_key), &forged, None).is_none());

    let genuine = RawTokenBuilder::new()
        .algorithm(Algorithm::Ed25519)
        .header_claim("kid", json!(TEST_KEY_ID_1))
        .sign_with(Algorithm::Ed25519, &keys.private_pkcs8);
    assert!(service.validate(None, &genuine, None).is_some());
    Ok(())
}

#[test]
fn test_alg_none_and_unknown_ids_are_rejected() {
    let service = TokenService::new(TestPolicy::hmac()).unwrap();

    for alg in ["none", "None", "RS256", "HS1", ""] {
        let wire = RawTokenBuilder::new()
            .header_claim("alg", json!(alg))
            .sign_with(Algorithm::HS256, TEST_HMAC_SECRET);
        assert!(
            service.validate(Some(TEST_HMAC_SECRET), &wire, None).is_none(),
            "alg {alg:?} must be rejected"
        );
    }

    let wire = RawTokenBuilder::new()
        .without_header_claim("alg")
        .sign_with(Algorithm::HS256, TEST_HMAC_SECRET);
    assert!(service.validate(Some(TEST_HMAC_SECRET), &wire, None).is_none());
}

#[test]
fn test_eddsa_marker_requires_known_curve() -> Result<(), anyhow::Error> {
    let keys = test_ed25519_key(2)?;
    let service = TokenService::new(TestPolicy::key_based())?;

    let sign = |builder: RawTokenBuilder| builder.sign_with(Algorithm::Ed25519, &keys.private_pkcs8);

    let without_curve = sign(RawTokenBuilder::new().header_claim("alg", json!("EdDSA")));
    assert!(service.validate(Some(&keys.public_key), &without_curve, None).is_none());

    let ed448 = sign(
        RawTokenBuilder::new()
            .header_claim("alg", json!("EdDSA"))
            .header_claim("crv", json!("Ed448")),
    );
    assert!(service.validate(Some(&keys.public_key), &ed448, None).is_none());

    let good = sign(RawTokenBuilder::new().algorithm(Algorithm::Ed25519));
    assert!(service.validate(Some(&keys.public_key), &good, None).is_some());
    Ok(())
}

#[test]
fn test_allowed_family_but_disallowed_member() -> Result<(), anyhow::Error> {
    let service = TokenService::new(TestPolicy::allowing(&[Algorithm::HS512]))?;

    let hs256 = RawTokenBuilder::new().sign_with(Algorithm::HS256, TEST_HMAC_SECRET);
    assert!(service.validate(Some(TEST_HMAC_SECRET), &hs256, None).is_none());

    let hs512 = RawTokenBuilder::new()
        .algorithm(Algorithm::HS512)
        .sign_with(Algorithm::HS512, TEST_HMAC_SECRET);
    assert!(service.validate(Some(TEST_HMAC_SECRET), &hs512, None).is_some());
    Ok(())
}
