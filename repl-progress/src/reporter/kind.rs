use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::ReplicationType;

/// Direction of a replication job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobOperation {
    /// Exports data from the source into the staging directory.
    Dump,
    /// Applies a dump from the staging directory to the target.
    Load,
}

/// The kind of replication job a reporter tracks.
///
/// Only decides the [`ReplicationType`] stamped into the job's metadata; every kind
/// reports progress the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    BootstrapDump,
    BootstrapLoad,
    IncrementalDump,
    IncrementalLoad,
}

impl JobKind {
    pub fn replication_type(&self) -> ReplicationType {
        match self {
            JobKind::BootstrapDump | JobKind::BootstrapLoad => ReplicationType::Bootstrap,
            JobKind::IncrementalDump | JobKind::IncrementalLoad => ReplicationType::Incremental,
        }
    }

    pub fn operation(&self) -> JobOperation {
        match self {
            JobKind::BootstrapDump | JobKind::IncrementalDump => JobOperation::Dump,
            JobKind::BootstrapLoad | JobKind::IncrementalLoad => JobOperation::Load,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobKind::BootstrapDump => "bootstrap_dump",
            JobKind::BootstrapLoad => "bootstrap_load",
            JobKind::IncrementalDump => "incremental_dump",
            JobKind::IncrementalLoad => "incremental_load",
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_replication_type_and_operation() {
        let cases = [
            (
                JobKind::BootstrapDump,
                ReplicationType::Bootstrap,
                JobOperation::Dump,
            ),
            (
                JobKind::BootstrapLoad,
                ReplicationType::Bootstrap,
                JobOperation::Load,
            ),
            (
                JobKind::IncrementalDump,
                ReplicationType::Incremental,
                JobOperation::Dump,
            ),
            (
                JobKind::IncrementalLoad,
                ReplicationType::Incremental,
                JobOperation::Load,
            ),
        ];

        for (kind, replication_type, operation) in cases {
            assert_eq!(kind.replication_type(), replication_type, "{kind}");
            assert_eq!(kind.operation(), operation, "{kind}");
        }
    }
}
