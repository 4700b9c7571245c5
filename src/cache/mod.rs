//! Cache Module
//!
//! The [`Cache`] facade and its metrics.

mod metrics;
mod store;

pub use metrics::{Metrics, MetricsSnapshot};
pub use store::Cache;
