//! Token model and its structural/temporal validator.

use crate::algorithm::Algorithm;
use crate::header::Header;
use crate::payload::Payload;
use std::collections::BTreeSet;

/// Backward tolerance, in seconds, applied to `nbf` and `iat` to absorb clock
/// skew between issuer and verifier. No tolerance is applied to `exp`.
pub const CLOCK_SKEW_TOLERANCE_SECS: i64 = 5;

/// A token: one header, one payload and a signature once signed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Token {
    header: Header,
    payload: Payload,
    signature: Option<String>,
}

impl Token {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_parts(header: Header, payload: Payload, signature: Option<String>) -> Self {
        Self {
            header,
            payload,
            signature,
        }
    }

    #[must_use]
    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    #[must_use]
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn payload_mut(&mut self) -> &mut Payload {
        &mut self.payload
    }

    #[must_use]
    pub fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    pub fn set_signature(&mut self, signature: impl Into<String>) {
        self.signature = Some(signature.into());
    }

    #[must_use]
    pub fn algorithm(&self) -> Option<Algorithm> {
        self.header.algorithm()
    }

    #[must_use]
    pub fn key_id(&self) -> Option<&str> {
        self.header.key_id()
    }

    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.payload.subject()
    }

    #[must_use]
    pub fn issuer(&self) -> Option<&str> {
        self.payload.issuer()
    }

    #[must_use]
    pub fn audience(&self) -> Option<BTreeSet<String>> {
        self.payload.audience()
    }

    #[must_use]
    pub fn token_id(&self) -> Option<&str> {
        self.payload.token_id()
    }

    #[must_use]
    pub fn issued_at(&self) -> Option<i64> {
        self.payload.issued_at()
    }

    #[must_use]
    pub fn expiration(&self) -> Option<i64> {
        self.payload.expiration()
    }

    #[must_use]
    pub fn expiration_millis(&self) -> Option<i64> {
        self.payload.expiration_millis()
    }

    pub fn set_expiration_millis(&mut self, millis: i64) {
        self.payload.set_expiration_millis(millis);
    }

    /// Check structure and validity window against the current time.
    ///
    /// See [`Token::validate_at`].
    #[must_use]
    pub fn validate(&self, expected_audience: &str, trusted_issuers: &BTreeSet<String>) -> bool {
        self.validate_at(expected_audience, trusted_issuers, chrono::Utc::now().timestamp())
    }

    /// Check structure and validity window at `now` (Unix seconds).
    ///
    /// Fails closed. A token is accepted only when:
    /// - `expected_audience` is not blank and `trusted_issuers` is not empty
    /// - `typ` is exactly `"JWT"` and the algorithm resolves
    /// - `exp`, `nbf` and `iat` are present, `exp > now`, and both
    ///   `nbf - 5 <= now` and `iat - 5 <= now`
    /// - `jti` and `sub` are present and not blank
    /// - `iss` is one of `trusted_issuers`
    /// - `aud` contains `expected_audience`
    #[must_use]
    pub fn validate_at(
        &self,
        expected_audience: &str,
        trusted_issuers: &BTreeSet<String>,
        now: i64,
    ) -> bool {
        if expected_audience.trim().is_empty() || trusted_issuers.is_empty() {
            return false;
        }

        if !self.header.is_jwt() || self.header.algorithm().is_none() {
            return false;
        }

        let (Some(expires), Some(not_before), Some(issued_at)) = (
            self.payload.expiration(),
            self.payload.not_before(),
            self.payload.issued_at(),
        ) else {
            return false;
        };

        if expires <= now
            || not_before.saturating_sub(CLOCK_SKEW_TOLERANCE_SECS) > now
            || issued_at.saturating_sub(CLOCK_SKEW_TOLERANCE_SECS) > now
        {
            return false;
        }

        if self.payload.token_id().is_none() || self.payload.subject().is_none() {
            return false;
        }

        if !self
            .payload
            .issuer()
            .is_some_and(|iss| trusted_issuers.contains(iss))
        {
            return false;
        }

        self.payload
            .audience()
            .is_some_and(|aud| aud.contains(expected_audience))
    }
}
