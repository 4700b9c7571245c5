//! Error types for the cache
//!
//! Cache operations never fail: a missing key is reported through `Option`
//! or `bool`. These errors only cover building a cache.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache library.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The cache was built outside of a Tokio runtime, so its background
    /// tasks have nowhere to run.
    #[error("no Tokio runtime available to run background tasks")]
    NoRuntime,

    /// An eviction policy name could not be parsed
    #[error("unknown eviction policy: {0}")]
    UnknownPolicy(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache library.
pub type Result<T> = std::result::Result<T, CacheError>;
