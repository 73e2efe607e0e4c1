//! Logging and metrics recorder setup shared by services hosting replication progress reporters.

pub mod metrics;
pub mod tracing;
