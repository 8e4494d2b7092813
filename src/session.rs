//! Token → user session cache.
//!
//! Backed by moka with a per-entry TTL so expiry is enforced by the cache
//! itself rather than by callers comparing timestamps. This is a
//! best-effort cache: losing it logs everyone out, it never corrupts data.

use std::time::{Duration, Instant};

use moka::sync::Cache;
use moka::Expiry;
use uuid::Uuid;

#[derive(Clone, Debug)]
struct SessionEntry {
    user_id: Uuid,
    ttl: Duration,
}

struct PerEntryTtl;

impl Expiry<String, SessionEntry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _token: &String,
        entry: &SessionEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }

    // Without this, an overwriting insert would keep the old entry's
    // remaining TTL instead of rescheduling from the new one.
    fn expire_after_update(
        &self,
        _token: &String,
        entry: &SessionEntry,
        _updated_at: Instant,
        _remaining: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

#[derive(Clone)]
pub struct SessionCache {
    cache: Cache<String, SessionEntry>,
}

impl SessionCache {
    pub fn new(max_sessions: u64) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(max_sessions)
                .expire_after(PerEntryTtl)
                .build(),
        }
    }

    /// Store a fresh token → user mapping, overwriting any existing entry
    /// for the token and scheduling expiry after `ttl`.
    pub fn put(&self, token: &str, user_id: Uuid, ttl: Duration) {
        self.cache
            .insert(token.to_string(), SessionEntry { user_id, ttl });
    }

    pub fn get(&self, token: &str) -> Option<Uuid> {
        self.cache.get(token).map(|entry| entry.user_id)
    }

    /// Revoke a token before its natural expiry.
    pub fn remove(&self, token: &str) {
        self.cache.invalidate(token);
    }
}

impl std::fmt::Debug for SessionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCache")
            .field("entries", &self.cache.entry_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_overwrites_existing_token() {
        let sessions = SessionCache::new(16);
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        sessions.put("tok", first, Duration::from_secs(60));
        sessions.put("tok", second, Duration::from_secs(60));

        assert_eq!(sessions.get("tok"), Some(second));
    }

    #[test]
    fn overwriting_put_reschedules_expiry() {
        let sessions = SessionCache::new(16);
        let user = Uuid::new_v4();

        // Short-lived entry replaced by a long-lived one: the new TTL wins.
        sessions.put("tok", Uuid::new_v4(), Duration::from_millis(50));
        sessions.put("tok", user, Duration::from_secs(60));
        std::thread::sleep(Duration::from_millis(150));
        assert_eq!(sessions.get("tok"), Some(user));

        // And the other way around: shortening the TTL takes effect too.
        sessions.put("tok", user, Duration::from_millis(50));
        std::thread::sleep(Duration::from_millis(120));
        assert_eq!(sessions.get("tok"), None);
    }

    #[test]
    fn remove_revokes_before_expiry() {
        let sessions = SessionCache::new(16);
        sessions.put("tok", Uuid::new_v4(), Duration::from_secs(60));
        sessions.remove("tok");
        assert_eq!(sessions.get("tok"), None);
    }

    #[test]
    fn entries_expire_after_ttl() {
        let sessions = SessionCache::new(16);
        sessions.put("tok", Uuid::new_v4(), Duration::from_millis(50));
        assert!(sessions.get("tok").is_some());

        std::thread::sleep(Duration::from_millis(120));
        assert_eq!(sessions.get("tok"), None);
    }
}
