//! Basic Engine
//!
//! TTL-only storage. There is no capacity eviction: entries leave when
//! they expire, either lazily on read or through a sweep.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

use crate::config::EvictionPolicy;
use crate::engine::{CacheEntry, Engine};

// == Basic Engine ==
/// Expiry-based engine with no ordering structure.
#[derive(Debug)]
pub struct BasicEngine<V> {
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    /// TTL stamped by plain `set`, zero = never expire
    default_ttl: Duration,
}

impl<V> BasicEngine<V> {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            default_ttl,
        }
    }

    // == Purge Expired ==
    /// Removes all expired entries and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired_at(now));
        before - entries.len()
    }

    /// Remaining lifetime of `key`; `None` if absent or never expiring.
    pub fn ttl_remaining(&self, key: &str) -> Option<Duration> {
        self.entries.read().get(key)?.ttl_remaining()
    }

    /// Number of stored entries, expired or not.
    pub fn stored(&self) -> usize {
        self.entries.read().len()
    }
}

impl<V> Engine<V> for BasicEngine<V>
where
    V: Clone + Send + Sync,
{
    fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.write();
        let entry = entries.get(key)?;
        if entry.is_expired() {
            entries.remove(key);
            return None;
        }
        Some(entry.value.clone())
    }

    fn set(&self, key: &str, value: V) {
        let entry = CacheEntry::new(value, self.default_ttl);
        self.entries.write().insert(key.to_string(), entry);
    }

    fn set_with_ttl(&self, key: &str, value: V, expires_at: Instant) {
        let entry = CacheEntry::expiring_at(value, expires_at);
        self.entries.write().insert(key.to_string(), entry);
    }

    fn delete(&self, key: &str) {
        self.entries.write().remove(key);
    }

    fn has(&self, key: &str) -> bool {
        self.entries
            .read()
            .get(key)
            .is_some_and(|entry| !entry.is_expired())
    }

    fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .values()
            .filter(|entry| !entry.is_expired_at(now))
            .count()
    }

    fn is_expirable(&self) -> bool {
        true
    }

    /// An absent key counts as expired.
    fn is_expired(&self, key: &str) -> bool {
        self.entries
            .read()
            .get(key)
            .map_or(true, |entry| entry.is_expired())
    }

    fn evict(&self) -> usize {
        self.purge_expired()
    }

    fn policy(&self) -> EvictionPolicy {
        EvictionPolicy::Basic
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    const SHORT: Duration = Duration::from_millis(40);
    const PAST_SHORT: Duration = Duration::from_millis(80);

    #[test]
    fn test_basic_set_and_get() {
        let engine = BasicEngine::new(Duration::from_secs(60));
        engine.set("key1", "value1".to_string());

        assert_eq!(engine.get("key1"), Some("value1".to_string()));
        assert_eq!(engine.len(), 1);
        assert!(engine.ttl_remaining("key1").is_some());
    }

    #[test]
    fn test_basic_zero_ttl_never_expires() {
        let engine = BasicEngine::new(Duration::ZERO);
        engine.set("key1", 1u32);

        assert!(engine.ttl_remaining("key1").is_none());
        assert!(!engine.is_expired("key1"));
        assert_eq!(engine.evict(), 0);
        assert!(engine.has("key1"));
    }

    #[test]
    fn test_basic_lazy_expiry_on_get() {
        let engine = BasicEngine::new(SHORT);
        engine.set("key1", 1u32);
        assert!(engine.has("key1"));

        sleep(PAST_SHORT);

        assert!(!engine.has("key1"));
        assert_eq!(engine.stored(), 1, "has must not delete");
        assert_eq!(engine.get("key1"), None);
        assert_eq!(engine.stored(), 0, "get removes the expired entry");
    }

    #[test]
    fn test_basic_set_with_explicit_expiry() {
        let engine = BasicEngine::new(Duration::from_secs(60));
        engine.set_with_ttl("soon", 1u32, Instant::now() + SHORT);
        engine.set_with_ttl("later", 2u32, Instant::now() + Duration::from_secs(60));

        sleep(PAST_SHORT);

        assert!(engine.is_expired("soon"));
        assert!(!engine.is_expired("later"));
        assert_eq!(engine.len(), 1);
    }

    #[test]
    fn test_basic_evict_removes_all_expired() {
        let engine = BasicEngine::new(SHORT);
        engine.set("a", 1u32);
        engine.set("b", 2u32);
        engine.set_with_ttl("c", 3u32, Instant::now() + Duration::from_secs(60));

        sleep(PAST_SHORT);

        assert_eq!(engine.evict(), 2);
        assert_eq!(engine.stored(), 1);
        assert!(engine.has("c"));
    }

    #[test]
    fn test_basic_absent_key_is_expired() {
        let engine: BasicEngine<u32> = BasicEngine::new(Duration::from_secs(60));
        assert!(engine.is_expired("missing"));
        assert!(engine.is_expirable());
    }

    #[test]
    fn test_basic_overwrite_resets_expiry() {
        let engine = BasicEngine::new(Duration::from_secs(60));
        engine.set_with_ttl("a", 1u32, Instant::now());
        assert!(!engine.has("a"));

        engine.set("a", 2u32);
        assert_eq!(engine.get("a"), Some(2));
    }
}
