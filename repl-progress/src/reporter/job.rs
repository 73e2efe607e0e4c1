/// Identity of a job execution, as handed over by the replication engine.
///
/// Values are passed through to the published snapshot untouched. Only `policy` and
/// `execution_id` are inspected, to decide whether the job is tracked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobIdentity {
    pub db_name: String,
    pub staging_dir: String,
    pub policy: String,
    pub execution_id: u64,
    pub dump_execution_id: u64,
}

impl JobIdentity {
    pub fn new(
        db_name: impl Into<String>,
        staging_dir: impl Into<String>,
        policy: impl Into<String>,
        execution_id: u64,
        dump_execution_id: u64,
    ) -> Self {
        Self {
            db_name: db_name.into(),
            staging_dir: staging_dir.into(),
            policy: policy.into(),
            execution_id,
            dump_execution_id,
        }
    }

    /// Jobs run outside a replication policy, or without an execution id, are not tracked.
    pub fn is_reporting_enabled(&self) -> bool {
        !self.policy.is_empty() && self.execution_id > 0
    }
}
