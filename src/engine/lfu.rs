//! LFU Engine
//!
//! Implements Least Frequently Used eviction with an indexed binary
//! min-heap. Every slot knows its heap position through the key map, so a
//! counter bump re-sifts one slot instead of rebuilding the heap.
//!
//! ```text
//!   index: { "a" -> 0, "b" -> 1, "c" -> 2 }
//!
//!   heap:        [0] a (freq 1, seq 0)
//!               /                     \
//!   [1] b (freq 3, seq 1)     [2] c (freq 2, seq 2)
//! ```
//!
//! Ties on frequency go to the slot inserted first. That order is an
//! internal detail, not part of the eviction contract.

use std::collections::HashMap;
use std::time::Instant;

use parking_lot::RwLock;
use tracing::debug;

use crate::config::EvictionPolicy;
use crate::engine::Engine;

#[derive(Debug)]
struct Slot<V> {
    key: String,
    value: V,
    frequency: u64,
    seq: u64,
}

#[derive(Debug)]
struct LfuState<V> {
    /// key -> position in `heap`
    index: HashMap<String, usize>,
    heap: Vec<Slot<V>>,
    next_seq: u64,
}

impl<V> LfuState<V> {
    fn new() -> Self {
        Self {
            index: HashMap::new(),
            heap: Vec::new(),
            next_seq: 0,
        }
    }

    fn less(&self, a: usize, b: usize) -> bool {
        let (x, y) = (&self.heap[a], &self.heap[b]);
        (x.frequency, x.seq) < (y.frequency, y.seq)
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        for pos in [a, b] {
            if let Some(slot) = self.index.get_mut(&self.heap[pos].key) {
                *slot = pos;
            }
        }
    }

    fn sift_up(&mut self, mut pos: usize) -> usize {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if !self.less(pos, parent) {
                break;
            }
            self.swap(pos, parent);
            pos = parent;
        }
        pos
    }

    fn sift_down(&mut self, mut pos: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * pos + 1;
            let right = left + 1;
            let mut smallest = pos;
            if left < len && self.less(left, smallest) {
                smallest = left;
            }
            if right < len && self.less(right, smallest) {
                smallest = right;
            }
            if smallest == pos {
                break;
            }
            self.swap(pos, smallest);
            pos = smallest;
        }
    }

    /// Bumps the counter of the slot at `pos` and restores heap order.
    fn touch(&mut self, pos: usize) {
        self.heap[pos].frequency += 1;
        self.sift_down(pos);
    }

    fn insert(&mut self, key: &str, value: V) {
        let seq = self.next_seq;
        self.next_seq += 1;

        let pos = self.heap.len();
        self.heap.push(Slot {
            key: key.to_string(),
            value,
            frequency: 1,
            seq,
        });
        self.index.insert(key.to_string(), pos);
        self.sift_up(pos);
    }

    fn remove_at(&mut self, pos: usize) -> Option<Slot<V>> {
        let last = self.heap.len().checked_sub(1)?;
        if pos > last {
            return None;
        }
        self.swap(pos, last);
        let slot = self.heap.pop()?;
        self.index.remove(&slot.key);

        if pos < self.heap.len() {
            let moved = self.sift_up(pos);
            self.sift_down(moved);
        }
        Some(slot)
    }
}

// == LFU Engine ==
/// Least frequently used eviction engine.
///
/// New entries start with an access count of 1; every `get` and `set`
/// adds one.
#[derive(Debug)]
pub struct LfuEngine<V> {
    state: RwLock<LfuState<V>>,
}

impl<V> Default for LfuEngine<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> LfuEngine<V> {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(LfuState::new()),
        }
    }

    /// Current access count of `key`.
    pub fn frequency(&self, key: &str) -> Option<u64> {
        let state = self.state.read();
        let pos = *state.index.get(key)?;
        Some(state.heap[pos].frequency)
    }

    /// The key `evict` would remove next.
    pub fn peek_min(&self) -> Option<String> {
        self.state.read().heap.first().map(|slot| slot.key.clone())
    }

    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        let state = self.state.read();
        let positions_match = state.index.len() == state.heap.len()
            && state
                .index
                .iter()
                .all(|(key, &pos)| state.heap.get(pos).is_some_and(|slot| &slot.key == key));
        let heap_ordered = (1..state.heap.len()).all(|pos| !state.less(pos, (pos - 1) / 2));
        positions_match && heap_ordered
    }
}

impl<V> Engine<V> for LfuEngine<V>
where
    V: Clone + Send + Sync,
{
    fn get(&self, key: &str) -> Option<V> {
        let mut state = self.state.write();
        let pos = *state.index.get(key)?;
        let value = state.heap[pos].value.clone();
        state.touch(pos);
        Some(value)
    }

    fn set(&self, key: &str, value: V) {
        let mut state = self.state.write();
        if let Some(&pos) = state.index.get(key) {
            state.heap[pos].value = value;
            state.touch(pos);
            return;
        }
        state.insert(key, value);
    }

    fn set_with_ttl(&self, key: &str, value: V, _expires_at: Instant) {
        self.set(key, value);
    }

    fn delete(&self, key: &str) {
        let mut state = self.state.write();
        if let Some(&pos) = state.index.get(key) {
            state.remove_at(pos);
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
        match state.remove_at(0) {
            Some(slot) => {
                debug!(
                    "LFU evicted key {} (frequency {})",
                    slot.key, slot.frequency
                );
                1
            }
            None => 0,
        }
    }

    fn policy(&self) -> EvictionPolicy {
        EvictionPolicy::Lfu
    }
}
