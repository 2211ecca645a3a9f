//! Secret types for signing and verification key material.
//!
//! Key bytes travel as [`SecretSlice<u8>`] so that `Debug` output is redacted
//! and the bytes are zeroized on drop. Code that needs the raw bytes must call
//! [`ExposeSecret::expose_secret`] explicitly.
//!
//! ```rust
//! use jwt_core::secret::{secret_from_bytes, ExposeSecret};
//!
//! let secret = secret_from_bytes(b"shared-hmac-secret");
//! assert_eq!(secret.expose_secret(), b"shared-hmac-secret");
//! assert!(!format!("{secret:?}").contains("shared"));
//! ```

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

pub use secrecy::{ExposeSecret, SecretBox, SecretSlice, SecretString};

/// Copy `bytes` into a zeroizing secret.
#[must_use]
pub fn secret_from_bytes(bytes: &[u8]) -> SecretSlice<u8> {
    SecretSlice::from(bytes.to_vec())
}

/// Decode standard Base64 (as used in environment variables) into a secret.
///
/// # Errors
///
/// Returns the underlying `base64::DecodeError` for malformed input.
pub fn secret_from_base64(encoded: &str) -> Result<SecretSlice<u8>, base64::DecodeError> {
    let bytes = STANDARD.decode(encoded.trim())?;
    Ok(SecretSlice::from(bytes))
}
