//! Deterministic cryptographic fixtures for testing
//!
//! HMAC secrets are constants. Ed25519 keys are derived from a one byte seed,
//! so the same seed always yields the same key pair. ECDSA keys come from
//! `ring`, which offers no seeded generation, and are random per call.

use base64::engine::general_purpose;
use base64::Engine;
use ring::rand::SystemRandom;
use ring::signature::{
    EcdsaKeyPair, EcdsaSigningAlgorithm, Ed25519KeyPair, KeyPair,
    ECDSA_P256_SHA256_FIXED_SIGNING, ECDSA_P384_SHA384_FIXED_SIGNING,
};
use thiserror::Error;

/// 72 byte shared secret, long enough for HS512.
pub const TEST_HMAC_SECRET: &[u8] =
    b"JWT-Secrets-Must-Be-At-Least-64-Characters-Long-To-Support-512-bit-HMACs";

/// A different secret of the same length.
pub const TEST_HMAC_SECRET_OTHER: &[u8] =
    b"Another-Secret-That-Is-Also-At-Least-64-Characters-Long-For-HS512-Tests";

/// Test fixture error type
#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("Cryptographic operation failed: {0}")]
    Crypto(String),
}

/// Key material for one asymmetric key pair.
#[derive(Debug, Clone)]
pub struct TestKeyPair {
    /// PKCS#8 DER private key, the signing secret.
    pub private_pkcs8: Vec<u8>,
    /// Raw public key, the verification secret.
    pub public_key: Vec<u8>,
}

impl TestKeyPair {
    /// Public key as a PEM-style Base64 block.
    pub fn public_key_pem(&self) -> String {
        format!(
            "-----BEGIN PUBLIC KEY-----\n{}\n-----END PUBLIC KEY-----",
            general_purpose::STANDARD.encode(&self.public_key)
        )
    }
}

/// Generate a deterministic Ed25519 key pair for testing.
///
/// # Example
/// ```rust,ignore
/// let keys = test_ed25519_key(1)?;
/// assert_eq!(keys.public_key, test_ed25519_key(1)?.public_key);
/// ```
pub fn test_ed25519_key(seed: u8) -> Result<TestKeyPair, FixtureError> {
    let mut seed_bytes = [0u8; 32];
    for (i, byte) in seed_bytes.iter_mut().enumerate() {
        let i = i as u8;
        *byte = seed.wrapping_mul(i.wrapping_add(1)).wrapping_add(i);
    }

    let key_pair = Ed25519KeyPair::from_seed_unchecked(&seed_bytes)
        .map_err(|e| FixtureError::Crypto(format!("Failed to generate test keypair: {:?}", e)))?;

    Ok(TestKeyPair {
        private_pkcs8: build_pkcs8_from_seed(&seed_bytes),
        public_key: key_pair.public_key().as_ref().to_vec(),
    })
}

/// Generate a random ECDSA P-256 key pair.
pub fn test_es256_key() -> Result<TestKeyPair, FixtureError> {
    generate_ecdsa(&ECDSA_P256_SHA256_FIXED_SIGNING)
}

/// Generate a random ECDSA P-384 key pair.
pub fn test_es384_key() -> Result<TestKeyPair, FixtureError> {
    generate_ecdsa(&ECDSA_P384_SHA384_FIXED_SIGNING)
}

fn generate_ecdsa(alg: &'static EcdsaSigningAlgorithm) -> Result<TestKeyPair, FixtureError> {
    let rng = SystemRandom::new();
    let pkcs8 = EcdsaKeyPair::generate_pkcs8(alg, &rng)
        .map_err(|e| FixtureError::Crypto(format!("Failed to generate ECDSA key: {:?}", e)))?;
    let key_pair = EcdsaKeyPair::from_pkcs8(alg, pkcs8.as_ref(), &rng)
        .map_err(|e| FixtureError::Crypto(format!("Failed to parse ECDSA key: {:?}", e)))?;

    Ok(TestKeyPair {
        private_pkcs8: pkcs8.as_ref().to_vec(),
        public_key: key_pair.public_key().as_ref().to_vec(),
    })
}

/// Build a PKCS#8 v1 document (RFC 5208) around an Ed25519 seed.
fn build_pkcs8_from_seed(seed: &[u8; 32]) -> Vec<u8> {
    let mut pkcs8 = Vec::with_capacity(48);

    // SEQUENCE, 46 bytes
    pkcs8.extend_from_slice(&[0x30, 0x2e]);
    // version INTEGER 0
    pkcs8.extend_from_slice(&[0x02, 0x01, 0x00]);
    // AlgorithmIdentifier SEQUENCE { OID 1.3.101.112 }
    pkcs8.extend_from_slice(&[0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x70]);
    // privateKey OCTET STRING { OCTET STRING seed }
    pkcs8.extend_from_slice(&[0x04, 0x22, 0x04, 0x20]);
    pkcs8.extend_from_slice(seed);

    pkcs8
}
