//! Token payload view over a [`ClaimBag`].
//!
//! Timestamps are whole seconds since the Unix epoch. Setters that take
//! milliseconds truncate toward zero; they never round.

use crate::claims::{ClaimBag, ClaimValue};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Payload claim names.
pub mod keys {
    pub const ISSUER: &str = "iss";
    pub const SUBJECT: &str = "sub";
    pub const AUDIENCE: &str = "aud";
    pub const EXPIRATION: &str = "exp";
    pub const NOT_BEFORE: &str = "nbf";
    pub const ISSUED_AT: &str = "iat";
    pub const TOKEN_ID: &str = "jti";

    pub const DISPLAY_NAME: &str = "x-disp";
    pub const PERMISSIONS: &str = "x-perm";
}

/// Audience name to granted permission strings.
pub type PermissionMap = BTreeMap<String, BTreeSet<String>>;

/// Token payload.
///
/// The `sub` claim is redacted in `Debug` output.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload {
    claims: ClaimBag,
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, value) in self.claims.iter() {
            if key == keys::SUBJECT {
                map.entry(key, &"[REDACTED]");
            } else {
                map.entry(key, value);
            }
        }
        map.finish()
    }
}

impl Payload {
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

    // -------------------------------------------------------------------------
    // Registered claims
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn issuer(&self) -> Option<&str> {
        self.claims.string(keys::ISSUER)
    }

    pub fn set_issuer(&mut self, issuer: &str) {
        self.claims.insert(keys::ISSUER, issuer);
    }

    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.claims.string(keys::SUBJECT)
    }

    pub fn set_subject(&mut self, subject: &str) {
        self.claims.insert(keys::SUBJECT, subject);
    }

    /// Audience set. A single string audience is promoted to a one-element set.
    #[must_use]
    pub fn audience(&self) -> Option<BTreeSet<String>> {
        self.claims.set(keys::AUDIENCE)
    }

    pub fn set_audience<I, S>(&mut self, audience: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = audience.into_iter().map(Into::into).collect();
        self.claims.insert(keys::AUDIENCE, set);
    }

    #[must_use]
    pub fn token_id(&self) -> Option<&str> {
        self.claims.string(keys::TOKEN_ID)
    }

    pub fn set_token_id(&mut self, token_id: &str) {
        self.claims.insert(keys::TOKEN_ID, token_id);
    }

    // -------------------------------------------------------------------------
    // Timestamps
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn expiration(&self) -> Option<i64> {
        self.claims.integer(keys::EXPIRATION)
    }

    #[must_use]
    pub fn expiration_millis(&self) -> Option<i64> {
        self.expiration()?.checked_mul(1000)
    }

    pub fn set_expiration(&mut self, seconds: i64) {
        self.claims.insert(keys::EXPIRATION, seconds);
    }

    pub fn set_expiration_millis(&mut self, millis: i64) {
        self.set_expiration(millis / 1000);
    }

    #[must_use]
    pub fn issued_at(&self) -> Option<i64> {
        self.claims.integer(keys::ISSUED_AT)
    }

    pub fn set_issued_at(&mut self, seconds: i64) {
        self.claims.insert(keys::ISSUED_AT, seconds);
    }

    pub fn set_issued_at_millis(&mut self, millis: i64) {
        self.set_issued_at(millis / 1000);
    }

    #[must_use]
    pub fn not_before(&self) -> Option<i64> {
        self.claims.integer(keys::NOT_BEFORE)
    }

    pub fn set_not_before(&mut self, seconds: i64) {
        self.claims.insert(keys::NOT_BEFORE, seconds);
    }

    pub fn set_not_before_millis(&mut self, millis: i64) {
        self.set_not_before(millis / 1000);
    }

    // -------------------------------------------------------------------------
    // Private claims
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.claims.string(keys::DISPLAY_NAME)
    }

    pub fn set_display_name(&mut self, display_name: &str) {
        self.claims.insert(keys::DISPLAY_NAME, display_name);
    }

    /// All fine-grained permissions, keyed by audience.
    #[must_use]
    pub fn permissions(&self) -> Option<PermissionMap> {
        let map = self.claims.map(keys::PERMISSIONS)?;
        Some(
            map.iter()
                .filter_map(|(aud, value)| permission_set(value).map(|set| (aud.clone(), set)))
                .collect(),
        )
    }

    /// Permissions granted for one audience.
    #[must_use]
    pub fn permissions_for(&self, audience: &str) -> Option<BTreeSet<String>> {
        self.claims
            .map(keys::PERMISSIONS)?
            .get(audience)
            .and_then(permission_set)
    }

    #[must_use]
    pub fn has_permission(&self, audience: &str, permission: &str) -> bool {
        self.permissions_for(audience)
            .is_some_and(|set| set.contains(permission))
    }

    /// Grant exactly one permission for `audience`, replacing earlier grants.
    pub fn set_permission(&mut self, audience: &str, permission: &str) {
        self.set_permissions(audience, [permission]);
    }

    /// Replace the permissions granted for `audience`. Other audiences are kept.
    pub fn set_permissions<I, S>(&mut self, audience: &str, permissions: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = permissions.into_iter().map(Into::into).collect();
        self.claims.update_map(keys::PERMISSIONS, |map| {
            map.insert(audience.to_string(), ClaimValue::from(set));
        });
    }
}

fn permission_set(value: &ClaimValue) -> Option<BTreeSet<String>> {
    match value {
        ClaimValue::List(items) => Some(items.iter().filter_map(ClaimValue::to_text).collect()),
        other => other.to_text().map(|s| BTreeSet::from([s])),
    }
}
