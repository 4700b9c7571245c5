//! LRU Engine
//!
//! Implements Least Recently Used eviction.
//!
//! Keys are linked in an [`OrderList`] where:
//! - Front = Most recently used
//! - Back = Least recently used

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
struct LruState<V> {
    index: HashMap<String, NodeId>,
    order: OrderList<Item<V>>,
}

// == LRU Engine ==
/// Least recently used eviction engine.
///
/// Both `get` and `set` count as a use, so `get` needs the write lock.
#[derive(Debug)]
pub struct LruEngine<V> {
    state: RwLock<LruState<V>>,
}

impl<V> Default for LruEngine<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> LruEngine<V> {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(LruState {
                index: HashMap::new(),
                order: OrderList::new(),
            }),
        }
    }

    // == Peek Oldest ==
    /// Returns the least recently used key without touching it.
    pub fn peek_oldest(&self) -> Option<String> {
        let state = self.state.read();
        let id = state.order.back()?;
        state.order.get(id).map(|item| item.key.clone())
    }

    /// Keys from most to least recently used.
    pub fn keys(&self) -> Vec<String> {
        let state = self.state.read();
        state.order.iter().map(|item| item.key.clone()).collect()
    }

    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        let state = self.state.read();
        state.index.len() == state.order.len()
            && state
                .index
                .iter()
                .all(|(key, id)| state.order.get(*id).is_some_and(|item| &item.key == key))
    }
}

impl<V> Engine<V> for LruEngine<V>
where
    V: Clone + Send + Sync,
{
    fn get(&self, key: &str) -> Option<V> {
        let mut state = self.state.write();
        let id = *state.index.get(key)?;
        state.order.move_to_front(id);
        state.order.get(id).map(|item| item.value.clone())
    }

    fn set(&self, key: &str, value: V) {
        let mut state = self.state.write();
        if let Some(&id) = state.index.get(key) {
            state.order.move_to_front(id);
            if let Some(item) = state.order.get_mut(id) {
                item.value = value;
            }
            return;
        }

        let id = state.order.push_front(Item {
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
            state.order.remove(id);
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
        match state.order.pop_back() {
            Some(item) => {
                state.index.remove(&item.key);
                debug!("LRU evicted key {}", item.key);
                1
            }
            None => 0,
        }
    }

    fn policy(&self) -> EvictionPolicy {
        EvictionPolicy::Lru
    }
}
