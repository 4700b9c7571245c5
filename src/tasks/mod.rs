//! Background Tasks Module
//!
//! Periodic maintenance a cache runs for as long as it lives.
//!
//! # Tasks
//! - TTL Cleanup: sweeps expired entries out of the Basic engine
//! - Memory Watch: evicts one entry whenever process memory is over the limit

mod cleanup;
mod memory;

pub use cleanup::spawn_cleanup_task;
pub use memory::{spawn_memory_task, MemoryProbe, ProcessMemoryProbe};
