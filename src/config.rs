//! Configuration Module
//!
//! Handles cache construction options, loaded from code or from environment
//! variables.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::CacheError;

/// Sweep cadence used when the configured cleanup interval is zero.
pub const FALLBACK_CLEANUP_INTERVAL: Duration = Duration::from_secs(10);

// == Eviction Policy ==
/// Selects the eviction engine a cache is built with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvictionPolicy {
    /// No capacity eviction; entries only leave when their TTL runs out.
    #[default]
    Basic,
    /// First in, first out.
    Fifo,
    /// Least recently used.
    Lru,
    /// Least frequently used.
    Lfu,
}

impl EvictionPolicy {
    /// Returns true for the policies that enforce `max_size`.
    pub fn is_bounded(self) -> bool {
        !matches!(self, EvictionPolicy::Basic)
    }
}

impl fmt::Display for EvictionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EvictionPolicy::Basic => "basic",
            EvictionPolicy::Fifo => "fifo",
            EvictionPolicy::Lru => "lru",
            EvictionPolicy::Lfu => "lfu",
        };
        f.write_str(name)
    }
}

impl FromStr for EvictionPolicy {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" | "ttl" => Ok(EvictionPolicy::Basic),
            "fifo" => Ok(EvictionPolicy::Fifo),
            "lru" => Ok(EvictionPolicy::Lru),
            "lfu" => Ok(EvictionPolicy::Lfu),
            _ => Err(CacheError::UnknownPolicy(s.to_string())),
        }
    }
}

// == Config ==
/// Cache configuration parameters.
///
/// Resolved once when the cache is built. Every value can also be set via
/// environment variables with the defaults below.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Which eviction engine to build
    pub eviction_policy: EvictionPolicy,
    /// Maximum number of entries for FIFO/LRU/LFU, 0 = unbounded.
    /// Ignored by the Basic policy.
    pub max_size: usize,
    /// TTL applied by `set` on the Basic policy, zero = never expire
    pub ttl: Duration,
    /// How often the Basic policy sweeps expired entries
    pub cleanup_interval: Duration,
    /// Process memory ceiling in bytes, 0 = no ceiling
    pub memory_limit: u64,
    /// How often process memory is sampled, zero = never
    pub memory_check_interval: Duration,
    /// Whether hits and misses are counted
    pub metrics: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `EVICTION_POLICY` - basic, fifo, lru or lfu (default: basic)
    /// - `MAX_SIZE` - Maximum entries for bounded policies (default: 0)
    /// - `TTL_SECS` - Default TTL in seconds (default: 60)
    /// - `CLEANUP_INTERVAL_SECS` - Expiry sweep frequency (default: 120)
    /// - `MEMORY_LIMIT_BYTES` - Memory ceiling (default: 0, disabled)
    /// - `MEMORY_CHECK_INTERVAL_SECS` - Memory sampling frequency (default: 0, disabled)
    /// - `METRICS_ENABLED` - true/false (default: false)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let read = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let secs = |name: &str, fallback: Duration| {
            read(name)
                .map(|v| Duration::from_secs(parse_or(name, &v, fallback.as_secs())))
                .unwrap_or(fallback)
        };

        Self {
            eviction_policy: read("EVICTION_POLICY")
                .map(|v| parse_or("EVICTION_POLICY", &v, defaults.eviction_policy))
                .unwrap_or(defaults.eviction_policy),
            max_size: read("MAX_SIZE")
                .map(|v| parse_or("MAX_SIZE", &v, defaults.max_size))
                .unwrap_or(defaults.max_size),
            ttl: secs("TTL_SECS", defaults.ttl),
            cleanup_interval: secs("CLEANUP_INTERVAL_SECS", defaults.cleanup_interval),
            memory_limit: read("MEMORY_LIMIT_BYTES")
                .map(|v| parse_or("MEMORY_LIMIT_BYTES", &v, defaults.memory_limit))
                .unwrap_or(defaults.memory_limit),
            memory_check_interval: secs(
                "MEMORY_CHECK_INTERVAL_SECS",
                defaults.memory_check_interval,
            ),
            metrics: read("METRICS_ENABLED")
                .map(|v| parse_or("METRICS_ENABLED", &v, defaults.metrics))
                .unwrap_or(defaults.metrics),
        }
    }

    // == Resolve ==
    /// Applies fallbacks for unset options.
    ///
    /// A zero cleanup interval becomes [`FALLBACK_CLEANUP_INTERVAL`].
    pub fn resolved(mut self) -> Self {
        if self.cleanup_interval.is_zero() {
            self.cleanup_interval = FALLBACK_CLEANUP_INTERVAL;
        }
        self
    }

    /// Returns true when the memory pressure task should run.
    pub fn memory_watch_enabled(&self) -> bool {
        self.memory_limit > 0 && !self.memory_check_interval.is_zero()
    }

    /// Returns the capacity bound enforced for this policy, if any.
    pub fn capacity(&self) -> Option<usize> {
        (self.eviction_policy.is_bounded() && self.max_size > 0).then_some(self.max_size)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            eviction_policy: EvictionPolicy::Basic,
            max_size: 0,
            ttl: Duration::from_secs(60),
            cleanup_interval: Duration::from_secs(120),
            memory_limit: 0,
            memory_check_interval: Duration::ZERO,
            metrics: false,
        }
    }
}

fn parse_or<T>(name: &str, raw: &str, fallback: T) -> T
where
    T: FromStr + fmt::Debug,
{
    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            warn!("Ignoring unparsable {}={:?}, using {:?}", name, raw, fallback);
            fallback
        }
    }
}
