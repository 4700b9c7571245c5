//! Eviction Engines
//!
//! Every eviction strategy implements [`Engine`], so the cache facade can
//! hold any of them behind one `Arc<dyn Engine<V>>`.
//!
//! | Engine        | Evicts                         | Expiry  |
//! |---------------|--------------------------------|---------|
//! | [`BasicEngine`] | every expired entry          | yes     |
//! | [`FifoEngine`]  | oldest inserted entry        | ignored |
//! | [`LruEngine`]   | least recently used entry    | ignored |
//! | [`LfuEngine`]   | least frequently used entry  | ignored |
//!
//! Each engine guards its key map and its ordering structure with a single
//! lock, so the two can never drift apart.

mod basic;
mod entry;
mod fifo;
mod lfu;
mod list;
mod lru;


use std::time::{Duration, Instant};

pub use basic::BasicEngine;
pub use entry::CacheEntry;
pub use fifo::FifoEngine;
pub use lfu::LfuEngine;
pub use lru::LruEngine;

use crate::config::EvictionPolicy;

// == Engine Trait ==
/// The contract shared by every eviction strategy.
///
/// All methods take `&self`; implementations lock internally. An engine
/// never evicts on its own during `set`: capacity is the caller's concern.
pub trait Engine<V>: Send + Sync {
    /// Returns a clone of the value stored under `key`.
    ///
    /// On expirable engines an expired entry is removed and `None` returned.
    fn get(&self, key: &str) -> Option<V>;

    /// Inserts or overwrites `key`.
    fn set(&self, key: &str, value: V);

    /// Inserts or overwrites `key` with an absolute expiry.
    ///
    /// Engines that are not expirable store the value as a plain `set`.
    fn set_with_ttl(&self, key: &str, value: V, expires_at: Instant);

    /// Removes `key`. Does nothing if it is absent.
    fn delete(&self, key: &str);

    /// Returns true if `key` is present (and not expired).
    fn has(&self, key: &str) -> bool;

    /// Number of live entries.
    fn len(&self) -> usize;

    /// Returns true when no live entries remain.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if entries can expire by time.
    fn is_expirable(&self) -> bool;

    /// Returns true if `key` has expired. Always false when not expirable.
    fn is_expired(&self, key: &str) -> bool;

    /// Removes entries according to the policy and returns how many went.
    ///
    /// Capacity-bounded engines remove exactly one entry; the Basic engine
    /// removes every expired entry. An empty engine removes nothing.
    fn evict(&self) -> usize;

    /// The policy this engine implements.
    fn policy(&self) -> EvictionPolicy;
}

// == Factory ==
/// Builds the engine for `policy`.
///
/// `default_ttl` only matters to the Basic engine.
pub fn build<V>(policy: EvictionPolicy, default_ttl: Duration) -> Box<dyn Engine<V>>
where
    V: Clone + Send + Sync + 'static,
{
    match policy {
        EvictionPolicy::Basic => Box::new(BasicEngine::new(default_ttl)),
        EvictionPolicy::Fifo => Box::new(FifoEngine::new()),
        EvictionPolicy::Lru => Box::new(LruEngine::new()),
        EvictionPolicy::Lfu => Box::new(LfuEngine::new()),
    }
}
