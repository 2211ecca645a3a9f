//! Builders for raw wire strings
//!
//! `TokenService::issue` refuses to build invalid tokens, so adversarial inputs
//! (wrong `typ`, forged `alg`, missing claims, bogus signatures) are assembled
//! here directly from JSON.

use crate::test_ids::{TEST_AUDIENCE, TEST_ISSUER, TEST_NOW_MILLIS, TEST_SUBJECT};
use jwt_core::codec::encode_segment;
use jwt_core::{Algorithm, Signer};
use serde_json::{json, Map, Value};

/// Builder for hand-made wire strings
///
/// Defaults to a well-formed HS256 token valid for one hour from
/// [`TEST_NOW_MILLIS`].
///
/// # Example
/// ```rust,ignore
/// let wire = RawTokenBuilder::new()
///     .header_claim("alg", json!("HS256"))
///     .sign_with(Algorithm::HS256, &public_key);
/// ```
#[derive(Debug, Clone)]
pub struct RawTokenBuilder {
    header: Map<String, Value>,
    payload: Map<String, Value>,
}

impl Default for RawTokenBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RawTokenBuilder {
    /// Create a new builder with defaults
    pub fn new() -> Self {
        Self::valid_at(TEST_NOW_MILLIS)
    }

    /// Well-formed HS256 claims issued at `now_millis`, expiring an hour later.
    pub fn valid_at(now_millis: i64) -> Self {
        let now = now_millis / 1000;
        let mut header = Map::new();
        header.insert("typ".to_string(), json!("JWT"));
        header.insert("alg".to_string(), json!("HS256"));

        let mut payload = Map::new();
        payload.insert("iss".to_string(), json!(TEST_ISSUER));
        payload.insert("sub".to_string(), json!(TEST_SUBJECT));
        payload.insert("aud".to_string(), json!([TEST_AUDIENCE]));
        payload.insert("iat".to_string(), json!(now));
        payload.insert("nbf".to_string(), json!(now));
        payload.insert("exp".to_string(), json!(now + 3600));
        payload.insert("jti".to_string(), json!("raw-token-id"));

        Self { header, payload }
    }

    /// Set `alg` (and `crv` for Edwards curves) the way the service would.
    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.header
            .insert("alg".to_string(), json!(algorithm.header_alg()));
        match algorithm.header_curve() {
            Some(curve) => {
                self.header.insert("crv".to_string(), json!(curve));
            }
            None => {
                self.header.remove("crv");
            }
        }
        self
    }

    pub fn header_claim(mut self, key: &str, value: Value) -> Self {
        self.header.insert(key.to_string(), value);
        self
    }

    pub fn without_header_claim(mut self, key: &str) -> Self {
        self.header.remove(key);
        self
    }

    pub fn claim(mut self, key: &str, value: Value) -> Self {
        self.payload.insert(key.to_string(), value);
        self
    }

    pub fn without_claim(mut self, key: &str) -> Self {
        self.payload.remove(key);
        self
    }

    /// `base64url(header).base64url(payload)`
    pub fn signing_input(&self) -> String {
        let header = serde_json::to_vec(&self.header).unwrap();
        let payload = serde_json::to_vec(&self.payload).unwrap();
        format!("{}.{}", encode_segment(&header), encode_segment(&payload))
    }

    /// Sign with `algorithm`'s primitive, regardless of what the header claims.
    pub fn sign_with(&self, algorithm: Algorithm, secret: &[u8]) -> String {
        let input = self.signing_input();
        let signature = algorithm.sign(secret, input.as_bytes()).unwrap();
        format!("{input}.{signature}")
    }

    /// Attach `signature` verbatim.
    pub fn with_signature(&self, signature: &str) -> String {
        format!("{}.{}", self.signing_input(), signature)
    }
}
