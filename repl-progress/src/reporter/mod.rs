//! Per-job progress reporting.
//!
//! The replication engine builds one [`ReplicationMetricReporter`] per job execution and
//! calls it as stages start, advance and end. Whether the job is tracked at all is decided
//! once, when the reporter is built.

mod base;
mod job;
mod kind;

pub use base::*;
pub use job::*;
pub use kind::*;
