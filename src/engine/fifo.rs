//! FIFO Engine
//!
//! Evicts entries in the order they were first inserted. Reads and
//! overwrites never change an entry's position.

use std::collections::HashMap;
use std::time::Instant;

use parking_lot::RwLock;
use tracing::debug;

use crate::config::EvictionPolicy;
use crate::engine::list::{NodeId, OrderList};
use crate::engine::Engine;

#[derive(Debug)]
struct Item<V> {
    key: String,
    value: V,
}

#[derive(Debug)]
struct FifoState<V> {
    index: HashMap<String, NodeId>,
    /// Front = oldest insertion
    queue: OrderList<Item<V>>,
}

// == FIFO Engine ==
/// First-in, first-out eviction engine.
#[derive(Debug)]
pub struct FifoEngine<V> {
    state: RwLock<FifoState<V>>,
}

impl<V> Default for FifoEngine<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> FifoEngine<V> {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(FifoState {
                index: HashMap::new(),
                queue: OrderList::new(),
            }),
        }
    }

    /// Keys from oldest to newest.
    pub fn keys(&self) -> Vec<String> {
        let state = self.state.read();
        state.queue.iter().map(|item| item.key.clone()).collect()
    }

    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        let state = self.state.read();
        state.index.len() == state.queue.len()
            && state
                .index
                .iter()
                .all(|(key, id)| state.queue.get(*id).is_some_and(|item| &item.key == key))
    }
}

impl<V> Engine<V> for FifoEngine<V>
where
    V: Clone + Send + Sync,
{
    fn get(&self, key: &str) -> Option<V> {
        let state = self.state.read();
        let id = *state.index.get(key)?;
        state.queue.get(id).map(|item| item.value.clone())
    }

    fn set(&self, key: &str, value: V) {
        let mut state = self.state.write();
        if let Some(&id) = state.index.get(key) {
            if let Some(item) = state.queue.get_mut(id) {
                item.value = value;
            }
            return;
        }

        let id = state.queue.push_back(Item {
            key: key.to_string(),
            value,
        });
        state.index.insert(key.to_string(), id);
    }

    fn set_with_ttl(&self, key: &str, value: V, _expires_at: Instant) {
        self.set(key, value);
    }

    fn delete(&self, key: &str) {
        let mut state = self.state.write();
        if let Some(id) = state.index.remove(key) {
            state.queue.remove(id);
        }
    }

    fn has(&self, key: &str) -> bool {
        self.state.read().index.contains_key(key)
    }

    fn len(&self) -> usize {
        self.state.read().index.len()
    }

    fn is_expirable(&self) -> bool {
        false
    }

    fn is_expired(&self, _key: &str) -> bool {
        false
    }

    fn evict(&self) -> usize {
        let mut state = self.state.write();
        match state.queue.pop_front() {
            Some(item) => {
                state.index.remove(&item.key);
                debug!("FIFO evicted key {}", item.key);
                1
            }
            None => 0,
        }
    }

    fn policy(&self) -> EvictionPolicy {
        EvictionPolicy::Fifo
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn filled(keys: &[&str]) -> FifoEngine<String> {
        let engine = FifoEngine::new();
        for key in keys {
            engine.set(key, format!("value_{key}"));
        }
        engine
    }

    #[test]
    fn test_fifo_set_and_get() {
        let engine = filled(&["a"]);
        assert_eq!(engine.get("a"), Some("value_a".to_string()));
        assert_eq!(engine.get("b"), None);
        assert_eq!(engine.len(), 1);
    }

    #[test]
    fn test_fifo_evicts_oldest_insertion() {
        let engine = filled(&["a", "b", "c"]);

        assert_eq!(engine.evict(), 1);
        assert!(!engine.has("a"));
        assert_eq!(engine.keys(), vec!["b", "c"]);
    }

    #[test]
    fn test_fifo_reads_do_not_reorder() {
        let engine = filled(&["a", "b"]);
        engine.get("a");
        engine.get("a");

        engine.evict();
        assert!(!engine.has("a"));
        assert!(engine.has("b"));
    }

    #[test]
    fn test_fifo_overwrite_keeps_position() {
        let engine = filled(&["a", "b"]);
        engine.set("a", "updated".to_string());

        assert_eq!(engine.keys(), vec!["a", "b"]);
        assert_eq!(engine.get("a"), Some("updated".to_string()));

        engine.evict();
        assert!(!engine.has("a"));
    }

    #[test]
    fn test_fifo_delete_unlinks() {
        let engine = filled(&["a", "b", "c"]);
        engine.delete("b");
        engine.delete("missing");

        assert_eq!(engine.keys(), vec!["a", "c"]);
        assert!(engine.is_consistent());
    }

    #[test]
    fn test_fifo_ttl_is_ignored() {
        let engine = FifoEngine::new();
        engine.set_with_ttl("a", 1u32, Instant::now());

        assert!(engine.has("a"));
        assert!(!engine.is_expired("a"));
        assert!(!engine.is_expirable());
    }

    #[test]
    fn test_fifo_evict_empty() {
        let engine: FifoEngine<u32> = FifoEngine::new();
        assert_eq!(engine.evict(), 0);
    }
}
