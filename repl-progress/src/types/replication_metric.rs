use serde::{Deserialize, Serialize};

use crate::types::{Metadata, Progress};

/// Progress snapshot of one job execution, as held by the metric store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ReplicationMetric {
    /// Identity of the snapshot in the store.
    pub execution_id: u64,
    pub policy: String,
    /// Execution that produced the dump a load job consumes.
    pub dump_execution_id: u64,
    pub metadata: Metadata,
    pub progress: Progress,
}

impl ReplicationMetric {
    /// Creates a snapshot with empty [`Progress`].
    pub fn new(
        execution_id: u64,
        policy: impl Into<String>,
        dump_execution_id: u64,
        metadata: Metadata,
    ) -> Self {
        Self {
            execution_id,
            policy: policy.into(),
            dump_execution_id,
            metadata,
            progress: Progress::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::types::{Metric, ReplicationType, Stage, Status};

    #[test]
    fn snapshot_survives_json_export() {
        let mut metric = ReplicationMetric::new(
            10,
            "p",
            9,
            Metadata::new("sales", ReplicationType::Incremental, "/staging/sales"),
        );
        let mut stage = Stage::new("dump", Utc::now());
        stage.add_metric(Metric::new("tables", 5));
        metric.progress.add_stage(stage);
        metric.progress.set_status(Status::Success);
        metric.metadata.last_repl_id = Some(42);

        let json = serde_json::to_value(&metric).unwrap();
        assert_eq!(json["metadata"]["replication_type"], "INCREMENTAL");
        assert_eq!(json["progress"]["status"], "SUCCESS");
        assert_eq!(
            json["progress"]["stages"]["dump"]["metrics"]["tables"]["total_count"],
            5
        );

        let decoded: ReplicationMetric = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, metric);
    }
}
