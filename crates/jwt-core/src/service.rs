//! Token service: issuance, signing, decode-and-verify, revocation and refresh.
//!
//! [`TokenService`] owns a [`RevocationLedger`] and delegates every trust
//! decision to a [`TokenPolicy`] supplied by the embedding application.
//!
//! # Failure model
//!
//! Caller mistakes during issuance or revocation return [`JwtError`].
//! Untrusted input handed to [`TokenService::validate`] never produces an
//! error: every rejection collapses to `None`, so a token holder cannot tell a
//! forged token from an expired or revoked one. The rejection reason is only
//! visible in debug logs and in the `error_category` metric label.
//!
//! # Example
//!
//! ```rust
//! use jwt_core::config::TrustConfig;
//! use jwt_core::service::TokenService;
//! use jwt_core::Algorithm;
//! use std::collections::HashMap;
//!
//! let vars = HashMap::from([
//!     ("JWT_TRUSTED_ISSUERS".to_string(), "auth.example.com".to_string()),
//!     ("JWT_AUDIENCE".to_string(), "api".to_string()),
//!     ("JWT_ALLOWED_ALGORITHMS".to_string(), "HS256".to_string()),
//! ]);
//! let service = TokenService::new(TrustConfig::from_vars(&vars).unwrap()).unwrap();
//!
//! let expires = chrono::Utc::now().timestamp_millis() + 60_000;
//! let mut token = service
//!     .issue(Some(Algorithm::HS256), expires, None, "user-1", "auth.example.com", &["api"])
//!     .unwrap();
//! let secret = b"a-shared-secret-of-at-least-thirty-two-bytes";
//! let wire = service.sign_and_encode(Some(secret), &mut token).unwrap();
//!
//! let verified = service.validate(Some(secret), &wire, None).unwrap();
//! assert_eq!(verified.token_id(), token.token_id());
//! ```

use crate::algorithm::{Algorithm, Signer};
use crate::codec;
use crate::errors::{JwtError, Rejection};
use crate::header::{Header, JWT_TOKEN_TYPE};
use crate::ledger::RevocationLedger;
use crate::observability::metrics;
use crate::policy::assert_not_mixed_algorithms;
use crate::secret::{secret_from_bytes, ExposeSecret, SecretSlice};
use crate::token::Token;
use crate::payload::Payload;
use std::collections::BTreeSet;
use tracing::instrument;

/// Wire strings longer than this are rejected before any parsing.
pub const MAX_TOKEN_SIZE_BYTES: usize = 8192;

/// Revocation entries outlive the token's own expiry by this many milliseconds.
pub const REVOCATION_GRACE_MILLIS: i64 = 10_000;

/// Trust decisions supplied by the embedding application.
///
/// # Contract
///
/// `is_algorithm_allowed(None)` must return `false`. Never allow an HMAC
/// algorithm and a key based algorithm at the same time: a verifier that does
/// can be handed a token signed with its own public key used as the HMAC
/// secret. [`TokenService::new`] refuses such policies.
pub trait TokenPolicy: Send + Sync {
    fn is_algorithm_allowed(&self, algorithm: Option<Algorithm>) -> bool;

    /// Issuers whose tokens are accepted.
    fn issuers(&self) -> &BTreeSet<String>;

    /// Audience used when `validate` is called without one.
    fn audience(&self) -> &str;

    /// Current time in Unix milliseconds.
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    /// Secret used to sign a token with `header`. Defaults to the caller's.
    fn sign_secret(&self, _header: &Header, secret: Option<&[u8]>) -> Option<SecretSlice<u8>> {
        secret.map(secret_from_bytes)
    }

    /// Secret used to verify a token with `header`. Defaults to the caller's.
    fn validate_secret(&self, _header: &Header, secret: Option<&[u8]>) -> Option<SecretSlice<u8>> {
        secret.map(secret_from_bytes)
    }
}

/// Token lifecycle engine.
#[derive(Debug)]
pub struct TokenService<P> {
    policy: P,
    ledger: RevocationLedger,
}

impl<P: TokenPolicy> TokenService<P> {
    /// Create a service over `policy`.
    ///
    /// # Errors
    ///
    /// Returns [`JwtError::InsecureConfiguration`] if the policy allows both an
    /// HMAC and a key based algorithm.
    pub fn new(policy: P) -> Result<Self, JwtError> {
        assert_not_mixed_algorithms(|alg| policy.is_algorithm_allowed(alg))?;
        Ok(Self {
            policy,
            ledger: RevocationLedger::new(),
        })
    }

    #[must_use]
    pub fn policy(&self) -> &P {
        &self.policy
    }

    #[must_use]
    pub fn ledger(&self) -> &RevocationLedger {
        &self.ledger
    }

    /// Build an unsigned token.
    ///
    /// Millisecond inputs are truncated to whole seconds. `not_before_millis`
    /// defaults to now. A fresh `jti` is generated on every call.
    ///
    /// # Errors
    ///
    /// [`JwtError::InvalidArgument`] when a required value is missing or blank,
    /// when the expiration is not after now, or when it precedes `nbf`.
    #[instrument(name = "jwt.issue", skip_all, fields(status))]
    pub fn issue<S: AsRef<str>>(
        &self,
        algorithm: Option<Algorithm>,
        expires_at_millis: i64,
        not_before_millis: Option<i64>,
        subject: &str,
        issuer: &str,
        audience: &[S],
    ) -> Result<Token, JwtError> {
        let result = self.build_token(
            algorithm,
            expires_at_millis,
            not_before_millis,
            subject,
            issuer,
            audience,
        );

        let status = if result.is_ok() { "success" } else { "error" };
        tracing::Span::current().record("status", status);
        metrics::record_token_issuance(status);
        result
    }

    fn build_token<S: AsRef<str>>(
        &self,
        algorithm: Option<Algorithm>,
        expires_at_millis: i64,
        not_before_millis: Option<i64>,
        subject: &str,
        issuer: &str,
        audience: &[S],
    ) -> Result<Token, JwtError> {
        let audience: Vec<&str> = audience
            .iter()
            .map(AsRef::as_ref)
            .filter(|a| !a.trim().is_empty())
            .collect();

        let Some(algorithm) = algorithm else {
            return Err(JwtError::invalid_argument("All parameters are required"));
        };
        if subject.trim().is_empty() || issuer.trim().is_empty() || audience.is_empty() {
            return Err(JwtError::invalid_argument("All parameters are required"));
        }

        let now = self.policy.now_millis().div_euclid(1000);
        let expires = expires_at_millis / 1000;
        let not_before = not_before_millis.map_or(now, |nbf| nbf / 1000);

        if expires <= now {
            return Err(JwtError::invalid_argument("Expiration must be in the future"));
        }
        if expires < not_before {
            return Err(JwtError::invalid_argument(
                "'Not Before' cannot come after 'expires'",
            ));
        }

        let mut header = Header::new();
        header.set_token_type(JWT_TOKEN_TYPE);
        header.set_algorithm(algorithm);

        let mut payload = Payload::new();
        payload.set_subject(subject);
        payload.set_issued_at(now);
        payload.set_not_before(not_before);
        payload.set_expiration(expires);
        payload.set_token_id(&uuid::Uuid::new_v4().to_string());
        payload.set_issuer(issuer);
        payload.set_audience(audience);

        Ok(Token::from_parts(header, payload, None))
    }

    /// Sign `token` and return its wire form.
    ///
    /// The signature covers `base64url(header).base64url(payload)` exactly as
    /// it appears on the wire, and is stored on the token.
    ///
    /// # Errors
    ///
    /// - [`JwtError::MissingSecret`] if no signing secret resolves
    /// - [`JwtError::MissingAlgorithm`] if the header names no known algorithm
    /// - [`JwtError::Signing`] if the key material is unusable
    #[instrument(name = "jwt.sign", skip_all)]
    pub fn sign_and_encode(
        &self,
        secret: Option<&[u8]>,
        token: &mut Token,
    ) -> Result<String, JwtError> {
        let secret = self
            .policy
            .sign_secret(token.header(), secret)
            .ok_or(JwtError::MissingSecret)?;
        let algorithm = token.algorithm().ok_or(JwtError::MissingAlgorithm)?;

        let header = codec::encode_claims(token.header().claims())?;
        let payload = codec::encode_claims(token.payload().claims())?;
        let signing_input = format!("{header}.{payload}");

        let signature = algorithm.sign(secret.expose_secret(), signing_input.as_bytes())?;
        let encoded = format!("{signing_input}.{signature}");
        token.set_signature(signature);
        Ok(encoded)
    }

    /// Decode and verify a wire string.
    ///
    /// `audience` falls back to [`TokenPolicy::audience`]. Returns `None` for
    /// any token that is oversized, malformed, revoked, not a JWT, signed with
    /// a disallowed algorithm, unverifiable, or outside its validity window.
    #[instrument(name = "jwt.validate", skip_all, fields(status))]
    pub fn validate(
        &self,
        secret: Option<&[u8]>,
        encoded: &str,
        audience: Option<&str>,
    ) -> Option<Token> {
        match self.verify_wire(secret, encoded, audience) {
            Ok(token) => {
                tracing::Span::current().record("status", "success");
                metrics::record_token_validation("success", None);
                Some(token)
            }
            Err(rejection) => {
                tracing::Span::current().record("status", "error");
                tracing::debug!(
                    target: "jwt_core.service",
                    reason = rejection.label(),
                    "{}",
                    rejection.message()
                );
                metrics::record_token_validation("error", Some(rejection.label()));
                None
            }
        }
    }

    fn verify_wire(
        &self,
        secret: Option<&[u8]>,
        encoded: &str,
        audience: Option<&str>,
    ) -> Result<Token, Rejection> {
        if encoded.len() > MAX_TOKEN_SIZE_BYTES {
            return Err(Rejection::TooLarge);
        }

        let (header_segment, payload_segment, signature) =
            codec::split_wire(encoded).ok_or(Rejection::Malformed)?;

        if self.ledger.is_revoked(signature) {
            return Err(Rejection::Revoked);
        }

        let header = codec::decode_claims(header_segment)
            .map(Header::from_claims)
            .map_err(|_| Rejection::Undecodable)?;
        if !header.is_jwt() {
            return Err(Rejection::NotJwt);
        }

        let algorithm = header.algorithm();
        if !self.policy.is_algorithm_allowed(algorithm) {
            tracing::debug!(
                target: "jwt_core.service",
                algorithm = algorithm.map_or("none", |a| a.id()),
                "Algorithm rejected by policy"
            );
            return Err(Rejection::AlgorithmNotAllowed);
        }
        let algorithm = algorithm.ok_or(Rejection::AlgorithmNotAllowed)?;

        let key = self
            .policy
            .validate_secret(&header, secret)
            .ok_or(Rejection::MissingSecret)?;

        let (signing_input, claimed) = encoded.rsplit_once('.').ok_or(Rejection::Malformed)?;
        if !algorithm.verify(key.expose_secret(), signing_input.as_bytes(), claimed) {
            return Err(Rejection::BadSignature);
        }

        let payload = codec::decode_claims(payload_segment)
            .map(Payload::from_claims)
            .map_err(|_| Rejection::Undecodable)?;
        let token = Token::from_parts(header, payload, Some(signature.to_string()));

        let audience = audience.unwrap_or_else(|| self.policy.audience());
        let now = self.policy.now_millis().div_euclid(1000);
        if !token.validate_at(audience, self.policy.issuers(), now) {
            return Err(Rejection::FailedValidation);
        }

        Ok(token)
    }

    /// Revoke `token` until `exp + 10s`. Unsigned tokens and tokens without an
    /// expiration are ignored.
    pub fn invalidate(&self, token: &Token) {
        let (Some(signature), Some(expires)) = (token.signature(), token.expiration_millis()) else {
            tracing::debug!(
                target: "jwt_core.service",
                "Skipping revocation of token without signature or expiration"
            );
            return;
        };

        self.ledger
            .revoke(signature, expires.saturating_add(REVOCATION_GRACE_MILLIS));
        metrics::record_token_revocation();
    }

    /// Revoke a raw signature until `expiration_millis + 10s`.
    ///
    /// # Errors
    ///
    /// [`JwtError::InvalidArgument`] for a negative expiration.
    pub fn invalidate_signature(
        &self,
        signature: &str,
        expiration_millis: i64,
    ) -> Result<(), JwtError> {
        if expiration_millis < 0 {
            return Err(JwtError::invalid_argument(format!(
                "Expiration must be positive number but was {expiration_millis}"
            )));
        }

        self.ledger.revoke(
            signature,
            expiration_millis.saturating_add(REVOCATION_GRACE_MILLIS),
        );
        metrics::record_token_revocation();
        Ok(())
    }

    #[must_use]
    pub fn is_revoked(&self, signature: &str) -> bool {
        self.ledger.is_revoked(signature)
    }

    #[must_use]
    pub fn is_revoked_token(&self, token: &Token) -> bool {
        token.signature().is_some_and(|s| self.ledger.is_revoked(s))
    }

    /// Drop revocation entries that have expired according to the policy clock.
    pub fn clean_revocations(&self) {
        self.ledger.clean_at(self.policy.now_millis());
    }

    /// Revoke `token` and extend it.
    ///
    /// The new expiration is `min(now + timeout, iat + max_age)` and a new
    /// `jti` is assigned. `iat`, `sub`, `iss` and `aud` are unchanged. The
    /// returned token still carries the old signature and must be re-signed.
    ///
    /// Not idempotent: the old signature is revoked before anything else, so a
    /// second refresh of the same token yields a token whose predecessor is
    /// already dead.
    ///
    /// # Errors
    ///
    /// [`JwtError::InvalidArgument`] if the token has no `iat`.
    #[instrument(name = "jwt.refresh", skip_all)]
    pub fn refresh(
        &self,
        mut token: Token,
        max_age_millis: i64,
        timeout_millis: i64,
    ) -> Result<Token, JwtError> {
        self.invalidate(&token);

        let issued_at = token
            .issued_at()
            .ok_or_else(|| JwtError::invalid_argument("Token has no issued-at"))?;

        let ceiling = issued_at.saturating_mul(1000).saturating_add(max_age_millis);
        let proposed = self.policy.now_millis().saturating_add(timeout_millis);

        token.set_expiration_millis(proposed.min(ceiling));
        token
            .payload_mut()
            .set_token_id(&uuid::Uuid::new_v4().to_string());
        Ok(token)
    }
}
