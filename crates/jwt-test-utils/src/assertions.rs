//! Custom test assertions for expressive tests
//!
//! Provides trait-based assertions on encoded wire strings.

use jwt_core::codec::decode_segment;
use serde_json::Value;

fn decode_json(segment: &str, what: &str) -> Value {
    let bytes = decode_segment(segment)
        .unwrap_or_else(|e| panic!("Failed to base64 decode JWT {what}: {e:?}"));
    serde_json::from_slice(&bytes)
        .unwrap_or_else(|e| panic!("Failed to parse JWT {what} JSON: {e:?}"))
}

/// Custom assertions for encoded tokens
///
/// # Example
/// ```rust,ignore
/// wire.assert_wire_format()
///     .assert_header_alg("EdDSA")
///     .assert_claim_str("sub", "user-id");
/// ```
pub trait WireAssertions {
    /// Assert three non-empty, unpadded Base64URL segments.
    fn assert_wire_format(&self) -> &Self;

    /// Assert the header's `alg` claim.
    fn assert_header_alg(&self, alg: &str) -> &Self;

    /// Assert a header claim's string value.
    fn assert_header_str(&self, key: &str, value: &str) -> &Self;

    /// Assert a payload claim's string value.
    fn assert_claim_str(&self, key: &str, value: &str) -> &Self;

    /// Assert a payload claim's integer value.
    fn assert_claim_i64(&self, key: &str, value: i64) -> &Self;

    /// Assert a payload claim is absent.
    fn assert_no_claim(&self, key: &str) -> &Self;

    /// Decoded header JSON.
    fn header_json(&self) -> Value;

    /// Decoded payload JSON.
    fn payload_json(&self) -> Value;
}

impl<T: AsRef<str>> WireAssertions for T {
    fn assert_wire_format(&self) -> &Self {
        let wire = self.as_ref();
        let parts: Vec<_> = wire.split('.').collect();
        assert_eq!(
            parts.len(),
            3,
            "JWT must have 3 parts (header.payload.signature), got {}",
            parts.len()
        );
        for part in &parts {
            assert!(!part.is_empty(), "JWT segment must not be empty: {wire}");
            assert!(!part.contains('='), "JWT segment must be unpadded: {part}");
            assert!(
                !part.contains('+') && !part.contains('/'),
                "JWT segment must use the URL-safe alphabet: {part}"
            );
        }
        self.header_json();
        self.payload_json();
        self
    }

    fn assert_header_alg(&self, alg: &str) -> &Self {
        self.assert_header_str("alg", alg)
    }

    fn assert_header_str(&self, key: &str, value: &str) -> &Self {
        let header = self.header_json();
        assert_eq!(
            header.get(key).and_then(Value::as_str),
            Some(value),
            "Header claim {key} mismatch in {header}"
        );
        self
    }

    fn assert_claim_str(&self, key: &str, value: &str) -> &Self {
        let payload = self.payload_json();
        assert_eq!(
            payload.get(key).and_then(Value::as_str),
            Some(value),
            "Claim {key} mismatch"
        );
        self
    }

    fn assert_claim_i64(&self, key: &str, value: i64) -> &Self {
        let payload = self.payload_json();
        assert_eq!(
            payload.get(key).and_then(Value::as_i64),
            Some(value),
            "Claim {key} mismatch"
        );
        self
    }

    fn assert_no_claim(&self, key: &str) -> &Self {
        let payload = self.payload_json();
        assert!(payload.get(key).is_none(), "Claim {key} should be absent");
        self
    }

    fn header_json(&self) -> Value {
        let segment = self.as_ref().split('.').next().unwrap_or_default();
        decode_json(segment, "header")
    }

    fn payload_json(&self) -> Value {
        let segment = self.as_ref().split('.').nth(1).unwrap_or_default();
        decode_json(segment, "payload")
    }
}
