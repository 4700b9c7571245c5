//! easycache demo
//!
//! Builds a cache from environment variables, runs a short mixed workload
//! and prints the resulting metrics as JSON.

use std::time::Duration;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use easycache::{Cache, Config};

const WORKLOAD_KEYS: usize = 64;
const WORKLOAD_ROUNDS: usize = 4;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "easycache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: policy={}, max_size={}, ttl={:?}, cleanup_interval={:?}",
        config.eviction_policy, config.max_size, config.ttl, config.cleanup_interval
    );

    let cache: Cache<String> = Cache::new(config).context("failed to build cache")?;

    for round in 0..WORKLOAD_ROUNDS {
        for i in 0..WORKLOAD_KEYS {
            let key = format!("key{}", i * (round + 1) % (WORKLOAD_KEYS * 2));
            if cache.get(&key).is_none() {
                cache.set(&key, format!("value{i}"));
            }
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    info!("Workload finished with {} live entries", cache.len());

    let snapshot = cache.metrics().snapshot();
    let json = serde_json::to_string_pretty(&snapshot).context("failed to encode metrics")?;
    println!("{json}");

    Ok(())
}
