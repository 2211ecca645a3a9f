//! Revocation ledger: a time-bounded denylist of token signatures.
//!
//! Entries map a raw signature to an absolute expiry in Unix milliseconds.
//! Entries are never evicted on lookup; they are dropped only by
//! [`RevocationLedger::clean`]. The ledger is unbounded, so the owner is
//! responsible for calling `clean` periodically.
//!
//! Keying on the wire text is sound because signatures are only accepted in
//! canonical unpadded Base64URL. ECDSA signatures remain malleable at the
//! signature level: `(r, n - s)` verifies as well as `(r, s)`, so revoking an
//! ES256 or ES384 token by signature does not stop a holder who recomputes
//! the alternate form. HMAC and Ed25519 signatures have no such twin.

use crate::observability::metrics;
use dashmap::DashMap;

/// Concurrent signature denylist.
///
/// Lookups may run concurrently with `revoke` and `clean`.
#[derive(Debug, Default)]
pub struct RevocationLedger {
    entries: DashMap<String, i64>,
}

impl RevocationLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Revoke `signature` until `expires_at_millis`. A repeat revocation
    /// overwrites the earlier expiry.
    pub fn revoke(&self, signature: &str, expires_at_millis: i64) {
        self.entries.insert(signature.to_string(), expires_at_millis);
        tracing::debug!(
            target: "jwt_core.ledger",
            expires_at_millis = expires_at_millis,
            entries = self.entries.len(),
            "Signature revoked"
        );
        metrics::set_ledger_entries(self.entries.len());
    }

    #[must_use]
    pub fn is_revoked(&self, signature: &str) -> bool {
        self.entries.contains_key(signature)
    }

    /// Drop every entry whose expiry has been reached.
    pub fn clean(&self) {
        self.clean_at(chrono::Utc::now().timestamp_millis());
    }

    /// Drop every entry with `now_millis >= expiry`.
    pub fn clean_at(&self, now_millis: i64) {
        let before = self.entries.len();
        self.entries.retain(|_, expires_at| now_millis < *expires_at);
        let after = self.entries.len();

        tracing::debug!(
            target: "jwt_core.ledger",
            removed = before.saturating_sub(after),
            remaining = after,
            "Revocation ledger cleaned"
        );
        metrics::set_ledger_entries(after);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
