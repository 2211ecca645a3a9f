//! JOSE header view over a [`ClaimBag`].

use crate::algorithm::{Algorithm, EDDSA_MARKER};
use crate::claims::{ClaimBag, ClaimValue};
use serde::{Deserialize, Serialize};

/// Header claim names.
pub mod keys {
    pub const TOKEN_TYPE: &str = "typ";
    pub const CONTENT_TYPE: &str = "cty";
    pub const CURVE: &str = "crv";
    pub const ALGORITHM: &str = "alg";
    pub const KEY_ID: &str = "kid";
    pub const X509_CERTIFICATE_CHAIN: &str = "x5c";
    pub const X509_CERTIFICATE_CHAIN_URL: &str = "x5u";
    pub const CRITICAL: &str = "crit";
}

/// The only token type this engine issues or accepts.
pub const JWT_TOKEN_TYPE: &str = "JWT";

/// Token header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Header {
    claims: ClaimBag,
}

impl Header {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_claims(claims: ClaimBag) -> Self {
        Self { claims }
    }

    #[must_use]
    pub fn claims(&self) -> &ClaimBag {
        &self.claims
    }

    pub fn claims_mut(&mut self) -> &mut ClaimBag {
        &mut self.claims
    }

    #[must_use]
    pub fn token_type(&self) -> Option<&str> {
        self.claims.string(keys::TOKEN_TYPE)
    }

    pub fn set_token_type(&mut self, token_type: &str) {
        self.claims.insert(keys::TOKEN_TYPE, token_type);
    }

    /// True when `typ` is exactly `"JWT"`.
    #[must_use]
    pub fn is_jwt(&self) -> bool {
        self.token_type() == Some(JWT_TOKEN_TYPE)
    }

    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.claims.string(keys::CONTENT_TYPE)
    }

    pub fn set_content_type(&mut self, content_type: &str) {
        self.claims.insert(keys::CONTENT_TYPE, content_type);
    }

    #[must_use]
    pub fn key_id(&self) -> Option<&str> {
        self.claims.string(keys::KEY_ID)
    }

    pub fn set_key_id(&mut self, key_id: &str) {
        self.claims.insert(keys::KEY_ID, key_id);
    }

    /// `x5c` certificate chain, in order. Non-string entries are skipped.
    #[must_use]
    pub fn certificate_chain(&self) -> Option<Vec<String>> {
        match self.claims.get(keys::X509_CERTIFICATE_CHAIN)? {
            ClaimValue::List(items) => Some(
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(ToString::to_string))
                    .collect(),
            ),
            _ => None,
        }
    }

    pub fn set_certificate_chain(&mut self, chain: Vec<String>) {
        self.claims.insert(keys::X509_CERTIFICATE_CHAIN, chain);
    }

    #[must_use]
    pub fn certificate_chain_url(&self) -> Option<&str> {
        self.claims.string(keys::X509_CERTIFICATE_CHAIN_URL)
    }

    pub fn set_certificate_chain_url(&mut self, url: &str) {
        self.claims.insert(keys::X509_CERTIFICATE_CHAIN_URL, url);
    }

    /// Resolve the signing algorithm.
    ///
    /// Edwards-curve algorithms are stored as `alg: "EdDSA"` plus the concrete
    /// curve in `crv`; everything else is stored directly in `alg`. Missing or
    /// unknown identifiers resolve to `None`.
    #[must_use]
    pub fn algorithm(&self) -> Option<Algorithm> {
        let alg = self.claims.string(keys::ALGORITHM)?;
        if alg == EDDSA_MARKER {
            return Algorithm::from_id(self.claims.string(keys::CURVE)?);
        }
        Algorithm::from_id(alg)
    }

    pub fn set_algorithm(&mut self, algorithm: Algorithm) {
        self.claims.insert(keys::ALGORITHM, algorithm.header_alg());
        match algorithm.header_curve() {
            Some(curve) => self.claims.insert(keys::CURVE, curve),
            None => {
                self.claims.remove(keys::CURVE);
            }
        }
    }
}
