//! Untyped claim storage shared by token headers and payloads.
//!
//! A [`ClaimBag`] maps claim names to dynamically typed [`ClaimValue`]s. Typed
//! accessors are lenient: an absent key, a `null` value or a value of the wrong
//! shape all read as `None`, never as an error.
//!
//! The bag is backed by a `BTreeMap`, so serializing an unchanged bag always
//! yields the same bytes. Signature verification relies on that.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A single claim value as it appears in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClaimValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<ClaimValue>),
    Map(BTreeMap<String, ClaimValue>),
}

impl ClaimValue {
    /// String contents, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ClaimValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Owned string contents, if this is a string.
    #[must_use]
    pub fn to_text(&self) -> Option<String> {
        self.as_str().map(str::to_string)
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, ClaimValue::Null)
    }
}

impl From<&str> for ClaimValue {
    fn from(value: &str) -> Self {
        ClaimValue::String(value.to_string())
    }
}

impl From<String> for ClaimValue {
    fn from(value: String) -> Self {
        ClaimValue::String(value)
    }
}

impl From<i64> for ClaimValue {
    fn from(value: i64) -> Self {
        ClaimValue::Integer(value)
    }
}

impl From<bool> for ClaimValue {
    fn from(value: bool) -> Self {
        ClaimValue::Bool(value)
    }
}

impl From<Vec<String>> for ClaimValue {
    fn from(value: Vec<String>) -> Self {
        ClaimValue::List(value.into_iter().map(ClaimValue::String).collect())
    }
}

impl From<BTreeSet<String>> for ClaimValue {
    fn from(value: BTreeSet<String>) -> Self {
        ClaimValue::List(value.into_iter().map(ClaimValue::String).collect())
    }
}

impl From<BTreeMap<String, ClaimValue>> for ClaimValue {
    fn from(value: BTreeMap<String, ClaimValue>) -> Self {
        ClaimValue::Map(value)
    }
}

/// String-keyed claim storage with typed views.
///
/// This is the only storage for header and payload claims. The typed getters
/// on [`crate::header::Header`] and [`crate::payload::Payload`] are views over
/// it, and arbitrary custom claims may be set directly with [`ClaimBag::insert`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimBag {
    claims: BTreeMap<String, ClaimValue>,
}

impl ClaimBag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value for `key`, including explicit `null`s.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ClaimValue> {
        self.claims.get(key)
    }

    /// Set `key`, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ClaimValue>) {
        self.claims.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<ClaimValue> {
        self.claims.remove(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.claims.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.claims.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ClaimValue)> {
        self.claims.iter()
    }

    /// Trimmed string claim; blank strings read as `None`.
    #[must_use]
    pub fn string(&self, key: &str) -> Option<&str> {
        self.string_with(key, true)
    }

    /// String claim. With `trim_to_none`, surrounding whitespace is removed and
    /// a blank result reads as `None`.
    #[must_use]
    pub fn string_with(&self, key: &str, trim_to_none: bool) -> Option<&str> {
        let s = self.get(key)?.as_str()?;
        if !trim_to_none {
            return Some(s);
        }

        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }

    /// Non-negative integer claim; negative numbers read as `None`.
    #[must_use]
    pub fn integer(&self, key: &str) -> Option<i64> {
        self.integer_with(key, true)
    }

    /// Integer claim. Fractional numbers are truncated toward zero. With
    /// `non_negative`, negative values read as `None`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn integer_with(&self, key: &str, non_negative: bool) -> Option<i64> {
        let value = match self.get(key)? {
            ClaimValue::Integer(i) => *i,
            // `as` saturates at the i64 bounds
            ClaimValue::Float(f) if f.is_finite() => *f as i64,
            _ => return None,
        };

        if non_negative && value < 0 {
            return None;
        }
        Some(value)
    }

    /// Set claim, promoting a scalar into a one-element set.
    #[must_use]
    pub fn set(&self, key: &str) -> Option<BTreeSet<String>> {
        self.set_with(key, true)
    }

    /// Set claim. A list is copied into a set (deduplicated, non-string
    /// elements dropped). A single string becomes a one-element set only when
    /// `promote_to_set` is true. Numbers and booleans are never read as text.
    #[must_use]
    pub fn set_with(&self, key: &str, promote_to_set: bool) -> Option<BTreeSet<String>> {
        match self.get(key)? {
            ClaimValue::List(items) => Some(items.iter().filter_map(ClaimValue::to_text).collect()),
            value if promote_to_set => value.to_text().map(|s| BTreeSet::from([s])),
            _ => None,
        }
    }

    /// Nested map claim.
    #[must_use]
    pub fn map(&self, key: &str) -> Option<&BTreeMap<String, ClaimValue>> {
        match self.get(key)? {
            ClaimValue::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Edit a nested map claim in place. A missing or non-map value is
    /// replaced with an empty map before `edit` runs.
    pub fn update_map<F>(&mut self, key: &str, edit: F)
    where
        F: FnOnce(&mut BTreeMap<String, ClaimValue>),
    {
        let mut map = match self.claims.remove(key) {
            Some(ClaimValue::Map(m)) => m,
            _ => BTreeMap::new(),
        };
        edit(&mut map);
        self.claims.insert(key.to_string(), ClaimValue::Map(map));
    }
}
