//! Storage of the latest progress snapshot of each job execution.
//!
//! [`MetricStore`] is the seam between reporters, which publish whole
//! [`crate::types::ReplicationMetric`] snapshots, and whatever reads them for display.
//! [`MemoryMetricStore`] is the bounded, volatile implementation shared by all reporters of
//! a process.

mod base;
mod memory;

pub use base::*;
pub use memory::*;
