use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether a job replicates a full copy of the database or the changes since the last run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReplicationType {
    Bootstrap,
    Incremental,
}

impl fmt::Display for ReplicationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplicationType::Bootstrap => f.write_str("BOOTSTRAP"),
            ReplicationType::Incremental => f.write_str("INCREMENTAL"),
        }
    }
}

/// Descriptive information about a job execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Metadata {
    pub db_name: String,
    pub replication_type: ReplicationType,
    pub staging_dir: String,
    /// Last event id replicated, known once a stage reports it on completion.
    pub last_repl_id: Option<u64>,
}

impl Metadata {
    pub fn new(
        db_name: impl Into<String>,
        replication_type: ReplicationType,
        staging_dir: impl Into<String>,
    ) -> Self {
        Self {
            db_name: db_name.into(),
            replication_type,
            staging_dir: staging_dir.into(),
            last_repl_id: None,
        }
    }
}
