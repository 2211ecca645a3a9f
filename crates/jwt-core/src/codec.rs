//! Wire codec: Base64URL segments over canonical JSON claim bags.
//!
//! Wire format is `base64url(json(header)).base64url(json(payload)).signature`.
//! Segments are encoded without padding. Header and payload decoding trims
//! surrounding whitespace and accepts padded or unpadded input. Signatures are
//! decoded strictly, so each signature has exactly one accepted encoding and
//! the revocation ledger can key on the wire text.

use crate::claims::ClaimBag;
use crate::errors::JwtError;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, URL_SAFE_NO_PAD};
use base64::engine::DecodePaddingMode;
use base64::{alphabet, Engine};

const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Base64URL-encode without padding.
#[must_use]
pub fn encode_segment(bytes: &[u8]) -> String {
    URL_SAFE_LENIENT.encode(bytes)
}

/// Base64URL-decode, ignoring surrounding whitespace.
///
/// # Errors
///
/// Returns `base64::DecodeError` for characters outside the URL-safe alphabet
/// or an impossible length.
pub fn decode_segment(segment: &str) -> Result<Vec<u8>, base64::DecodeError> {
    URL_SAFE_LENIENT.decode(segment.trim())
}

/// Base64URL-decode a signature segment in its canonical form only.
///
/// Padding, whitespace and non-zero trailing bits are all rejected.
///
/// # Errors
///
/// Returns `base64::DecodeError` for any non-canonical encoding.
pub fn decode_signature(segment: &str) -> Result<Vec<u8>, base64::DecodeError> {
    URL_SAFE_NO_PAD.decode(segment)
}

/// Canonical JSON of a claim bag, Base64URL encoded.
///
/// # Errors
///
/// Returns [`JwtError::Codec`] if serialization fails.
pub fn encode_claims(claims: &ClaimBag) -> Result<String, JwtError> {
    let json = serde_json::to_vec(claims)
        .map_err(|e| JwtError::Codec(format!("Error serializing claims: {e}")))?;
    Ok(encode_segment(&json))
}

/// Decode a Base64URL segment holding a JSON object.
///
/// # Errors
///
/// Returns [`JwtError::Codec`] for bad Base64, bad JSON, or JSON that is not
/// an object. Partial data is never returned.
pub fn decode_claims(segment: &str) -> Result<ClaimBag, JwtError> {
    let bytes = decode_segment(segment)
        .map_err(|e| JwtError::Codec(format!("Error decoding segment: {e}")))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| JwtError::Codec(format!("Error deserializing claims: {e}")))
}

/// Split a wire string into its three segments.
///
/// Returns `None` unless there are exactly three segments and none is blank.
#[must_use]
pub fn split_wire(encoded: &str) -> Option<(&str, &str, &str)> {
    let mut parts = encoded.split('.');
    let header = parts.next()?;
    let payload = parts.next()?;
    let signature = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    if [header, payload, signature].iter().any(|p| p.trim().is_empty()) {
        return None;
    }
    Some((header, payload, signature))
}
