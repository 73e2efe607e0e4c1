//! Live progress tracking for replication jobs.
//!
//! A [`reporter::ReplicationMetricReporter`] is created per job execution and records stage
//! starts, counter progress and outcomes. Every update republishes the job's whole
//! [`types::ReplicationMetric`] into a shared, capacity-bounded [`store::MetricStore`], from
//! which monitors read consistent snapshots.

pub mod error;
mod macros;
pub mod metrics;
pub mod reporter;
pub mod store;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod types;
