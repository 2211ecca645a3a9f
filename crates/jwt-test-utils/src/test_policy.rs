//! Token policy with a controllable clock.

use crate::test_ids::{TEST_AUDIENCE, TEST_ISSUER, TEST_ISSUER_OTHER, TEST_NOW_MILLIS};
use jwt_core::header::Header;
use jwt_core::secret::{secret_from_bytes, SecretSlice};
use jwt_core::{Algorithm, TokenPolicy};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicI64, Ordering};

/// Policy for tests: a fixed allow-list, fixed trust set, a clock that only
/// moves when told to, and optional per-`kid` verification keys.
///
/// # Example
/// ```rust,ignore
/// let service = TokenService::new(TestPolicy::hmac())?;
/// service.policy().advance_millis(60_000);
/// ```
#[derive(Debug)]
pub struct TestPolicy {
    allowed: Vec<Algorithm>,
    issuers: BTreeSet<String>,
    audience: String,
    now_millis: AtomicI64,
    keys_by_id: BTreeMap<String, Vec<u8>>,
}

impl TestPolicy {
    /// Allow exactly `allowed`, trusting [`TEST_ISSUER`] and
    /// [`TEST_ISSUER_OTHER`] for [`TEST_AUDIENCE`].
    pub fn allowing(allowed: &[Algorithm]) -> Self {
        Self {
            allowed: allowed.to_vec(),
            issuers: BTreeSet::from([TEST_ISSUER.to_string(), TEST_ISSUER_OTHER.to_string()]),
            audience: TEST_AUDIENCE.to_string(),
            now_millis: AtomicI64::new(TEST_NOW_MILLIS),
            keys_by_id: BTreeMap::new(),
        }
    }

    /// All HMAC algorithms.
    pub fn hmac() -> Self {
        Self::allowing(&Algorithm::hmac_algorithms().collect::<Vec<_>>())
    }

    /// All key based algorithms.
    pub fn key_based() -> Self {
        Self::allowing(&Algorithm::key_algorithms().collect::<Vec<_>>())
    }

    /// Register a verification key looked up by the token's `kid`.
    pub fn with_key(mut self, key_id: &str, verification_key: &[u8]) -> Self {
        self.keys_by_id
            .insert(key_id.to_string(), verification_key.to_vec());
        self
    }

    /// Pin the clock to the current wall time.
    pub fn with_wall_clock(self) -> Self {
        self.set_now_millis(chrono::Utc::now().timestamp_millis());
        self
    }

    pub fn set_now_millis(&self, now_millis: i64) {
        self.now_millis.store(now_millis, Ordering::SeqCst);
    }

    pub fn advance_millis(&self, millis: i64) {
        self.now_millis.fetch_add(millis, Ordering::SeqCst);
    }
}

impl TokenPolicy for TestPolicy {
    fn is_algorithm_allowed(&self, algorithm: Option<Algorithm>) -> bool {
        algorithm.is_some_and(|a| self.allowed.contains(&a))
    }

    fn issuers(&self) -> &BTreeSet<String> {
        &self.issuers
    }

    fn audience(&self) -> &str {
        &self.audience
    }

    fn now_millis(&self) -> i64 {
        self.now_millis.load(Ordering::SeqCst)
    }

    fn validate_secret(&self, header: &Header, secret: Option<&[u8]>) -> Option<SecretSlice<u8>> {
        secret
            .or_else(|| {
                header
                    .key_id()
                    .and_then(|kid| self.keys_by_id.get(kid))
                    .map(Vec::as_slice)
            })
            .map(secret_from_bytes)
    }
}
