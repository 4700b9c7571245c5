//! TTL Cleanup Task
//!
//! Background task that periodically removes expired cache entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::engine::Engine;

/// Spawns a background task that periodically sweeps expired entries.
///
/// The task sleeps for `cleanup_interval` between runs and calls
/// [`Engine::evict`], which on the Basic engine drops every expired entry.
/// The engine lock is only held for the sweep itself. The interval is
/// expected to be resolved already (see [`Config::resolved`]).
///
/// [`Config::resolved`]: crate::config::Config::resolved
///
/// Must be called from within a Tokio runtime.
///
/// # Example
/// ```ignore
/// let engine: Arc<dyn Engine<String>> = Arc::new(BasicEngine::new(Duration::from_secs(60)));
/// let cleanup_handle = spawn_cleanup_task(engine.clone(), Duration::from_secs(1));
/// // Later:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task<V>(
    engine: Arc<dyn Engine<V>>,
    cleanup_interval: Duration,
) -> JoinHandle<()>
where
    V: 'static,
{
    tokio::spawn(async move {
        info!(
            "Starting TTL cleanup task with interval of {:?}",
            cleanup_interval
        );

        loop {
            tokio::time::sleep(cleanup_interval).await;

            let removed = engine.evict();

            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::BasicEngine;

    #[tokio::test]
    async fn test_cleanup_task_removes_expired_entries() {
        let engine = Arc::new(BasicEngine::<String>::new(Duration::from_millis(50)));
        engine.set("expire_soon", "value".to_string());

        let handle = spawn_cleanup_task::<String>(engine.clone(), Duration::from_millis(100));

        tokio::time::sleep(Duration::from_millis(400)).await;

        // No reads happened, so only the sweep can have removed it.
        assert_eq!(engine.stored(), 0, "Expired entry should have been swept");

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_preserves_valid_entries() {
        let engine = Arc::new(BasicEngine::<String>::new(Duration::from_secs(3600)));
        engine.set("long_lived", "value".to_string());

        let handle = spawn_cleanup_task::<String>(engine.clone(), Duration::from_millis(50));

        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(engine.get("long_lived"), Some("value".to_string()));

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_can_be_aborted() {
        let engine: Arc<dyn Engine<String>> = Arc::new(BasicEngine::new(Duration::from_secs(1)));

        let handle = spawn_cleanup_task(engine, Duration::from_secs(1));
        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
