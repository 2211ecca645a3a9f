//! Signature algorithms.
//!
//! The algorithm set is fixed and enumerable so the policy guard can test
//! every member of each family. Primitives are provided by `ring`:
//!
//! | Id        | Family  | Sign secret        | Verify secret              |
//! |-----------|---------|--------------------|----------------------------|
//! | `HS256`   | HMAC    | shared secret      | shared secret              |
//! | `HS384`   | HMAC    | shared secret      | shared secret              |
//! | `HS512`   | HMAC    | shared secret      | shared secret              |
//! | `ES256`   | ECDSA   | PKCS#8 document    | uncompressed P-256 point   |
//! | `ES384`   | ECDSA   | PKCS#8 document    | uncompressed P-384 point   |
//! | `Ed25519` | Edwards | PKCS#8 document    | raw 32-byte public key     |
//!
//! Signatures are rendered as Base64URL without padding.

use crate::codec;
use crate::errors::JwtError;
use ring::hmac;
use ring::rand::SystemRandom;
use ring::signature::{self, EcdsaKeyPair, Ed25519KeyPair, UnparsedPublicKey};
use std::fmt;

/// Wire marker stored in `alg` for every Edwards-curve algorithm.
pub const EDDSA_MARKER: &str = "EdDSA";

/// Algorithm family, used to detect algorithm-confusion prone configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlgorithmFamily {
    /// Shared-secret MACs.
    Hmac,
    /// Elliptic curve DSA over NIST curves.
    Ecdsa,
    /// Edwards-curve DSA.
    Edwards,
}

impl AlgorithmFamily {
    /// True for every family verified with a public key.
    #[must_use]
    pub fn is_key_based(self) -> bool {
        !matches!(self, AlgorithmFamily::Hmac)
    }
}

/// Sign/verify capability of a signature algorithm.
pub trait Signer {
    /// Wire identifier (`HS256`, `Ed25519`, ...).
    fn id(&self) -> &'static str;

    fn family(&self) -> AlgorithmFamily;

    /// Minimum recommended key length in bits. Advisory only.
    fn min_key_bits(&self) -> usize;

    /// Sign `message` with `secret`, returning the wire form of the signature.
    ///
    /// # Errors
    ///
    /// Returns [`JwtError::Signing`] if `secret` is not usable key material.
    fn sign(&self, secret: &[u8], message: &[u8]) -> Result<String, JwtError>;

    /// Check `signature` over `message`. Any malformed input reads as `false`.
    fn verify(&self, secret: &[u8], message: &[u8], signature: &str) -> bool;
}

/// Every supported algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Algorithm {
    HS256,
    HS384,
    HS512,
    ES256,
    ES384,
    Ed25519,
}

impl Algorithm {
    pub const ALL: [Algorithm; 6] = [
        Algorithm::HS256,
        Algorithm::HS384,
        Algorithm::HS512,
        Algorithm::ES256,
        Algorithm::ES384,
        Algorithm::Ed25519,
    ];

    /// Resolve an algorithm by wire identifier. Unknown ids resolve to `None`.
    #[must_use]
    pub fn from_id(id: &str) -> Option<Algorithm> {
        let id = id.trim();
        Self::ALL.into_iter().find(|a| a.id() == id)
    }

    /// The HMAC family.
    pub fn hmac_algorithms() -> impl Iterator<Item = Algorithm> {
        Self::ALL.into_iter().filter(|a| a.family() == AlgorithmFamily::Hmac)
    }

    /// Every public-key family.
    pub fn key_algorithms() -> impl Iterator<Item = Algorithm> {
        Self::ALL.into_iter().filter(|a| a.family().is_key_based())
    }

    /// The value stored in the header `alg` claim.
    #[must_use]
    pub fn header_alg(self) -> &'static str {
        match self.family() {
            AlgorithmFamily::Edwards => EDDSA_MARKER,
            AlgorithmFamily::Hmac | AlgorithmFamily::Ecdsa => self.id(),
        }
    }

    /// The value stored in the header `crv` claim, for Edwards algorithms.
    #[must_use]
    pub fn header_curve(self) -> Option<&'static str> {
        match self.family() {
            AlgorithmFamily::Edwards => Some(self.id()),
            AlgorithmFamily::Hmac | AlgorithmFamily::Ecdsa => None,
        }
    }

    fn hmac_algorithm(self) -> Option<hmac::Algorithm> {
        match self {
            Algorithm::HS256 => Some(hmac::HMAC_SHA256),
            Algorithm::HS384 => Some(hmac::HMAC_SHA384),
            Algorithm::HS512 => Some(hmac::HMAC_SHA512),
            _ => None,
        }
    }

    fn ecdsa_algorithms(
        self,
    ) -> Option<(
        &'static signature::EcdsaSigningAlgorithm,
        &'static signature::EcdsaVerificationAlgorithm,
    )> {
        match self {
            Algorithm::ES256 => Some((
                &signature::ECDSA_P256_SHA256_FIXED_SIGNING,
                &signature::ECDSA_P256_SHA256_FIXED,
            )),
            Algorithm::ES384 => Some((
                &signature::ECDSA_P384_SHA384_FIXED_SIGNING,
                &signature::ECDSA_P384_SHA384_FIXED,
            )),
            _ => None,
        }
    }
}

impl Signer for Algorithm {
    fn id(&self) -> &'static str {
        match self {
            Algorithm::HS256 => "HS256",
            Algorithm::HS384 => "HS384",
            Algorithm::HS512 => "HS512",
            Algorithm::ES256 => "ES256",
            Algorithm::ES384 => "ES384",
            Algorithm::Ed25519 => "Ed25519",
        }
    }

    fn family(&self) -> AlgorithmFamily {
        match self {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => AlgorithmFamily::Hmac,
            Algorithm::ES256 | Algorithm::ES384 => AlgorithmFamily::Ecdsa,
            Algorithm::Ed25519 => AlgorithmFamily::Edwards,
        }
    }

    fn min_key_bits(&self) -> usize {
        match self {
            Algorithm::HS256 | Algorithm::ES256 | Algorithm::Ed25519 => 256,
            Algorithm::HS384 | Algorithm::ES384 => 384,
            Algorithm::HS512 => 512,
        }
    }

    fn sign(&self, secret: &[u8], message: &[u8]) -> Result<String, JwtError> {
        if let Some(alg) = self.hmac_algorithm() {
            let key = hmac::Key::new(alg, secret);
            let tag = hmac::sign(&key, message);
            return Ok(codec::encode_segment(tag.as_ref()));
        }

        if let Some((signing, _)) = self.ecdsa_algorithms() {
            let rng = SystemRandom::new();
            let key_pair = EcdsaKeyPair::from_pkcs8(signing, secret, &rng)
                .map_err(|e| JwtError::Signing(format!("Invalid private key format: {e}")))?;
            let sig = key_pair
                .sign(&rng, message)
                .map_err(|e| JwtError::Signing(format!("Signing operation failed: {e}")))?;
            return Ok(codec::encode_segment(sig.as_ref()));
        }

        // Accepts both v1 and v2 PKCS#8 documents
        let key_pair = Ed25519KeyPair::from_pkcs8_maybe_unchecked(secret)
            .map_err(|e| JwtError::Signing(format!("Invalid private key format: {e}")))?;
        Ok(codec::encode_segment(key_pair.sign(message).as_ref()))
    }

    fn verify(&self, secret: &[u8], message: &[u8], encoded_signature: &str) -> bool {
        let Ok(sig) = codec::decode_signature(encoded_signature) else {
            return false;
        };

        if let Some(alg) = self.hmac_algorithm() {
            let key = hmac::Key::new(alg, secret);
            return hmac::verify(&key, message, &sig).is_ok();
        }

        if let Some((_, verification)) = self.ecdsa_algorithms() {
            return UnparsedPublicKey::new(verification, secret)
                .verify(message, &sig)
                .is_ok();
        }

        UnparsedPublicKey::new(&signature::ED25519, secret)
            .verify(message, &sig)
            .is_ok()
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
