//! Cache Store Module
//!
//! The facade callers use: one eviction engine plus metrics, capacity
//! enforcement and background maintenance.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::Metrics;
use crate::config::{Config, EvictionPolicy};
use crate::engine::{self, Engine};
use crate::error::{CacheError, Result};
use crate::tasks::{spawn_cleanup_task, spawn_memory_task, MemoryProbe, ProcessMemoryProbe};

// == Cache ==
/// Thread-safe in-memory cache with a pluggable eviction policy.
///
/// Share it between threads with `Arc<Cache<V>>`. Background tasks are
/// aborted when the cache is dropped.
pub struct Cache<V> {
    /// Selected eviction strategy
    engine: Arc<dyn Engine<V>>,
    /// Serializes capacity check + evict + insert, and memory evictions
    gate: Arc<Mutex<()>>,
    /// Hit/miss counters
    metrics: Metrics,
    /// Resolved configuration snapshot
    config: Config,
    /// Background maintenance tasks
    tasks: Vec<JoinHandle<()>>,
}

impl<V> Cache<V>
where
    V: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Builds a cache from `config`, watching memory with the process probe.
    ///
    /// Must be called inside a Tokio runtime, which hosts the TTL sweep
    /// (Basic policy only) and the memory watch (when configured).
    pub fn new(config: Config) -> Result<Self> {
        Self::with_probe(config, ProcessMemoryProbe::new())
    }

    /// Builds a cache that samples memory usage through `probe`.
    pub fn with_probe<P>(config: Config, probe: P) -> Result<Self>
    where
        P: MemoryProbe,
    {
        Handle::try_current().map_err(|_| CacheError::NoRuntime)?;

        let config = config.resolved();
        let engine: Arc<dyn Engine<V>> =
            Arc::from(engine::build::<V>(config.eviction_policy, config.ttl));
        let gate = Arc::new(Mutex::new(()));

        let mut tasks = Vec::new();
        if engine.is_expirable() {
            tasks.push(spawn_cleanup_task(engine.clone(), config.cleanup_interval));
        }
        if config.memory_watch_enabled() {
            tasks.push(spawn_memory_task(
                engine.clone(),
                gate.clone(),
                probe,
                config.memory_limit,
                config.memory_check_interval,
            ));
        }

        info!(
            "Cache initialized: policy={}, max_size={}, ttl={:?}, metrics={}",
            config.eviction_policy, config.max_size, config.ttl, config.metrics
        );

        Ok(Self {
            engine,
            gate,
            metrics: Metrics::new(),
            config,
            tasks,
        })
    }

    // == Get ==
    /// Returns a clone of the value under `key`.
    ///
    /// Counts a hit when found and a miss otherwise (if metrics are on).
    pub fn get(&self, key: &str) -> Option<V> {
        let value = match self.engine.get(key) {
            Some(_) if self.engine.is_expirable() && self.engine.is_expired(key) => {
                self.engine.delete(key);
                None
            }
            found => found,
        };

        if self.config.metrics {
            match value {
                Some(_) => self.metrics.increment_hits(),
                None => self.metrics.increment_misses(),
            }
        }
        value
    }

    // == Set ==
    /// Stores `value` under `key`.
    ///
    /// On the Basic policy the entry expires after the configured TTL. On
    /// bounded policies a new key arriving at a full cache first evicts
    /// exactly one entry. Every call counts as a hit when metrics are on.
    pub fn set(&self, key: &str, value: V) {
        if self.engine.is_expirable() {
            if self.config.ttl.is_zero() {
                self.engine.set(key, value);
            } else {
                self.engine
                    .set_with_ttl(key, value, Instant::now() + self.config.ttl);
            }
        } else {
            let _gate = self.gate.lock();
            if let Some(capacity) = self.config.capacity() {
                if !self.engine.has(key) && self.engine.len() >= capacity {
                    let removed = self.engine.evict();
                    debug!("Cache at capacity {}, evicted {} entry", capacity, removed);
                }
            }
            self.engine.set(key, value);
        }

        // Writes are counted as hits too.
        if self.config.metrics {
            self.metrics.increment_hits();
        }
    }

    // == Delete ==
    /// Removes `key`. Does nothing if it is absent.
    pub fn delete(&self, key: &str) {
        self.engine.delete(key);
    }

    /// Returns true if `key` is present and not expired.
    pub fn has(&self, key: &str) -> bool {
        self.engine.has(key)
    }

    // == Length ==
    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.engine.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engine.is_empty()
    }

    // == Evict ==
    /// Runs one policy eviction and returns how many entries were removed.
    pub fn evict(&self) -> usize {
        self.engine.evict()
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn policy(&self) -> EvictionPolicy {
        self.engine.policy()
    }

    /// The configuration in effect, fallbacks applied.
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl<V> fmt::Debug for Cache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("policy", &self.engine.policy())
            .field("len", &self.engine.len())
            .field("config", &self.config)
            .finish()
    }
}

impl<V> Drop for Cache<V> {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}
