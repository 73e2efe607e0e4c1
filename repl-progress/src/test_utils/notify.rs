use std::fmt;
use std::sync::Arc;

use tokio::sync::{Mutex, Notify};

use crate::error::MetricsResult;
use crate::store::{MemoryMetricStore, MetricStore};
use crate::types::{ReplicationMetric, Status};

#[derive(Debug)]
struct StageCondition {
    execution_id: u64,
    stage_name: String,
    status: Status,
    notify: Arc<Notify>,
}

impl StageCondition {
    fn is_met_by(&self, metric: &ReplicationMetric) -> bool {
        metric.execution_id == self.execution_id
            && metric
                .progress
                .stage(&self.stage_name)
                .is_some_and(|stage| stage.status() == self.status)
    }
}

/// A [`MemoryMetricStore`] that wakes tests up once a stage reaches a given status.
#[derive(Clone)]
pub struct NotifyingMetricStore {
    store: MemoryMetricStore,
    conditions: Arc<Mutex<Vec<StageCondition>>>,
}

impl NotifyingMetricStore {
    pub fn new(max_size: usize) -> Self {
        Self {
            store: MemoryMetricStore::new(max_size),
            conditions: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns a [`Notify`] fired once stage `stage_name` of `execution_id` is stored with
    /// `status`.
    pub async fn notify_on_stage_status(
        &self,
        execution_id: u64,
        stage_name: &str,
        status: Status,
    ) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        let condition = StageCondition {
            execution_id,
            stage_name: stage_name.to_owned(),
            status,
            notify: notify.clone(),
        };

        let mut conditions = self.conditions.lock().await;
        // The stage may already be in the expected status, in which case no later put
        // would ever fire the notification.
        let current = self.store.get(execution_id).await.ok().flatten();
        match current {
            Some(metric) if condition.is_met_by(&metric) => notify.notify_one(),
            _ => conditions.push(condition),
        }

        notify
    }
}

impl MetricStore for NotifyingMetricStore {
    async fn put(&self, metric: Arc<ReplicationMetric>) -> MetricsResult<()> {
        let mut conditions = self.conditions.lock().await;
        self.store.put(metric.clone()).await?;

        conditions.retain(|condition| {
            let met = condition.is_met_by(&metric);
            if met {
                condition.notify.notify_one();
            }
            !met
        });

        Ok(())
    }

    async fn get(&self, execution_id: u64) -> MetricsResult<Option<Arc<ReplicationMetric>>> {
        self.store.get(execution_id).await
    }

    async fn list(&self) -> MetricsResult<Vec<Arc<ReplicationMetric>>> {
        self.store.list().await
    }

    async fn len(&self) -> MetricsResult<usize> {
        self.store.len().await
    }
}

impl fmt::Debug for NotifyingMetricStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotifyingMetricStore")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}
