//! easycache - An in-memory key/value cache
//!
//! Stores values under string keys with one of four interchangeable
//! eviction policies: TTL-only (Basic), FIFO, LRU and LFU.
//!
//! ```no_run
//! use easycache::{Cache, Config, EvictionPolicy};
//!
//! #[tokio::main]
//! async fn main() -> easycache::error::Result<()> {
//!     let cache = Cache::new(Config {
//!         eviction_policy: EvictionPolicy::Lru,
//!         max_size: 2,
//!         metrics: true,
//!         ..Config::default()
//!     })?;
//!
//!     cache.set("a", 1);
//!     cache.set("b", 2);
//!     cache.get("a");
//!     cache.set("c", 3); // evicts "b"
//!
//!     assert!(!cache.has("b"));
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod tasks;

pub use cache::{Cache, Metrics, MetricsSnapshot};
pub use config::{Config, EvictionPolicy};
pub use engine::Engine;
pub use error::CacheError;
