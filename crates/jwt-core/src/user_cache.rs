//! Short-lived cache of authenticated user identities.
//!
//! Services that resolve a token subject to a user record can park the record
//! here until the token expires instead of reloading it on every request.

use dashmap::DashMap;

/// A user that can live in a [`UserCache`].
pub trait CachedUser {
    fn id(&self) -> &str;

    /// Key used by [`UserCache::add`]. Defaults to [`CachedUser::id`].
    fn cache_id(&self) -> &str {
        self.id()
    }
}

/// Keyed user storage with absolute expiry times in Unix milliseconds.
pub trait UserCache<U> {
    /// Store `user` under its [`CachedUser::cache_id`].
    fn add(&self, user: U, expires_at_millis: i64);

    fn add_with_key(&self, user: U, key: &str, expires_at_millis: i64);

    /// The user stored under `key`, or `None` if absent or expired.
    fn get(&self, key: &str) -> Option<U>;

    /// Drop every expired entry.
    fn clean(&self);

    fn clear(&self);

    fn remove(&self, key: &str);
}

/// [`UserCache`] on a concurrent map. Expired entries are dropped on `get`
/// and by `clean`.
#[derive(Debug)]
pub struct TimedUserCache<U> {
    entries: DashMap<String, (U, i64)>,
}

impl<U> Default for TimedUserCache<U> {
    fn default() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

impl<U: CachedUser + Clone> TimedUserCache<U> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lookup at `now_millis`. An entry is live while `now_millis < expiry`.
    pub fn get_at(&self, key: &str, now_millis: i64) -> Option<U> {
        let live = self.entries.get(key).and_then(|entry| {
            let (user, expires_at) = entry.value();
            (now_millis < *expires_at).then(|| user.clone())
        });

        if live.is_none() {
            self.entries
                .remove_if(key, |_, (_, expires_at)| now_millis >= *expires_at);
        }
        live
    }

    pub fn clean_at(&self, now_millis: i64) {
        self.entries
            .retain(|_, (_, expires_at)| now_millis < *expires_at);
    }
}

impl<U: CachedUser + Clone> UserCache<U> for TimedUserCache<U> {
    fn add(&self, user: U, expires_at_millis: i64) {
        let key = user.cache_id().to_string();
        self.entries.insert(key, (user, expires_at_millis));
    }

    fn add_with_key(&self, user: U, key: &str, expires_at_millis: i64) {
        self.entries
            .insert(key.to_string(), (user, expires_at_millis));
    }

    fn get(&self, key: &str) -> Option<U> {
        self.get_at(key, chrono::Utc::now().timestamp_millis())
    }

    fn clean(&self) {
        self.clean_at(chrono::Utc::now().timestamp_millis());
    }

    fn clear(&self) {
        self.entries.clear();
    }

    fn remove(&self, key: &str) {
        self.entries.remove(key);
    }
}
