//! Value model of a replication job's progress.
//!
//! A [`ReplicationMetric`] describes one job execution: its identity, [`Metadata`] and a
//! [`Progress`] made of named [`Stage`]s, each holding named [`Metric`] counters.

mod metadata;
mod metric;
mod progress;
mod replication_metric;
mod stage;
mod status;

pub use metadata::*;
pub use metric::*;
pub use progress::*;
pub use replication_metric::*;
pub use stage::*;
pub use status::*;
