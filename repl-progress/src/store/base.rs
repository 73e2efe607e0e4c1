use std::future::Future;
use std::sync::Arc;

use crate::error::MetricsResult;
use crate::types::ReplicationMetric;

/// Holds the most recent [`ReplicationMetric`] of each job execution.
///
/// Implementations are shared between many reporters writing concurrently and readers
/// polling for snapshots, so they are cheap to clone and every method takes `&self`.
/// Snapshots are handed out as [`Arc`]s and never change after being stored: a later
/// [`MetricStore::put`] for the same execution replaces the `Arc` instead of mutating it.
pub trait MetricStore {
    /// Inserts or replaces the snapshot of `metric.execution_id`.
    ///
    /// Making room for a new execution in a full store is not an error.
    fn put(&self, metric: Arc<ReplicationMetric>) -> impl Future<Output = MetricsResult<()>> + Send;

    /// Returns the latest snapshot of `execution_id`, if the store still holds it.
    fn get(
        &self,
        execution_id: u64,
    ) -> impl Future<Output = MetricsResult<Option<Arc<ReplicationMetric>>>> + Send;

    /// Returns every snapshot currently held, oldest execution first.
    fn list(&self) -> impl Future<Output = MetricsResult<Vec<Arc<ReplicationMetric>>>> + Send;

    /// Returns the number of executions currently held.
    fn len(&self) -> impl Future<Output = MetricsResult<usize>> + Send;
}
