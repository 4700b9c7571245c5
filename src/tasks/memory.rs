//! Memory Watch Task
//!
//! Samples process memory on a fixed cadence and evicts one entry from the
//! engine whenever usage is above the configured ceiling.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use sysinfo::{Pid, System};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::engine::Engine;

// == Memory Probe ==
/// Source of memory usage readings.
pub trait MemoryProbe: Send + 'static {
    /// Bytes currently used by this process, or `None` if unavailable.
    fn used_bytes(&mut self) -> Option<u64>;
}

/// Reads the resident memory of the current process through `sysinfo`.
pub struct ProcessMemoryProbe {
    system: System,
    pid: Option<Pid>,
}

impl ProcessMemoryProbe {
    pub fn new() -> Self {
        let pid = sysinfo::get_current_pid()
            .map_err(|err| warn!("Cannot resolve current pid for memory watch: {}", err))
            .ok();
        Self {
            system: System::new(),
            pid,
        }
    }
}

impl Default for ProcessMemoryProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryProbe for ProcessMemoryProbe {
    fn used_bytes(&mut self) -> Option<u64> {
        let pid = self.pid?;
        if !self.system.refresh_process(pid) {
            return None;
        }
        self.system.process(pid).map(|process| process.memory())
    }
}

/// Spawns the memory pressure task.
///
/// Every `check_interval` the probe is sampled; if usage is above
/// `memory_limit` bytes, `engine.evict()` runs once while `gate` is held.
/// With a zero limit or a zero interval the task exits immediately.
///
/// Must be called from within a Tokio runtime.
pub fn spawn_memory_task<V, P>(
    engine: Arc<dyn Engine<V>>,
    gate: Arc<Mutex<()>>,
    mut probe: P,
    memory_limit: u64,
    check_interval: Duration,
) -> JoinHandle<()>
where
    V: 'static,
    P: MemoryProbe,
{
    tokio::spawn(async move {
        if memory_limit == 0 || check_interval.is_zero() {
            debug!("Memory watch disabled");
            return;
        }

        info!(
            "Starting memory watch: limit={} bytes, interval={:?}",
            memory_limit, check_interval
        );

        loop {
            tokio::time::sleep(check_interval).await;

            match probe.used_bytes() {
                Some(used) if used > memory_limit => {
                    let removed = {
                        let _gate = gate.lock();
                        engine.evict()
                    };
                    warn!(
                        "Memory usage {} bytes over limit {} bytes, evicted {} entries",
                        used, memory_limit, removed
                    );
                }
                Some(used) => debug!("Memory usage {} bytes within limit", used),
                None => debug!("Memory usage unavailable, skipping check"),
            }
        }
    })
}
