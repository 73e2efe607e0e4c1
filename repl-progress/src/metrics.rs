use std::sync::Once;

use metrics::{Unit, describe_counter, describe_gauge};

static REGISTER_METRICS: Once = Once::new();

pub const REPL_PROGRESS_UPDATES_TOTAL: &str = "repl_progress_updates_total";
pub const REPL_PROGRESS_STAGE_TRANSITIONS_TOTAL: &str = "repl_progress_stage_transitions_total";
pub const REPL_PROGRESS_STORE_ENTRIES: &str = "repl_progress_store_entries";
pub const REPL_PROGRESS_STORE_EVICTIONS_TOTAL: &str = "repl_progress_store_evictions_total";

pub const OPERATION_LABEL: &str = "operation";
pub const STATUS_LABEL: &str = "status";
pub const REPLICATION_TYPE_LABEL: &str = "replication_type";

pub const STAGE_START: &str = "stage_start";
pub const STAGE_PROGRESS: &str = "stage_progress";
pub const STAGE_END: &str = "stage_end";
pub const JOB_END: &str = "job_end";

/// Describes the metrics emitted while reporting progress. Called whenever an enabled
/// reporter is built; descriptions are only registered the first time.
pub(crate) fn register_metrics() {
    REGISTER_METRICS.call_once(|| {
        describe_counter!(
            REPL_PROGRESS_UPDATES_TOTAL,
            Unit::Count,
            "Number of progress snapshots published to the metric store, by operation"
        );

        describe_counter!(
            REPL_PROGRESS_STAGE_TRANSITIONS_TOTAL,
            Unit::Count,
            "Number of stage or job status changes, by resulting status"
        );

        describe_gauge!(
            REPL_PROGRESS_STORE_ENTRIES,
            Unit::Count,
            "Number of job executions held in the process-wide metric store"
        );

        describe_counter!(
            REPL_PROGRESS_STORE_EVICTIONS_TOTAL,
            Unit::Count,
            "Number of job executions evicted from the metric store to respect its capacity"
        );
    });
}
