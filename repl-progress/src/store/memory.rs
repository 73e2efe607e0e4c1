use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, OnceLock};

use metrics::{counter, gauge};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::MetricsResult;
use crate::metrics::{REPL_PROGRESS_STORE_ENTRIES, REPL_PROGRESS_STORE_EVICTIONS_TOTAL};
use crate::store::MetricStore;
use crate::types::ReplicationMetric;

/// Store shared by every reporter created through [`MemoryMetricStore::global`].
static GLOBAL_STORE: OnceLock<MemoryMetricStore> = OnceLock::new();

#[derive(Debug)]
struct Inner {
    metrics: HashMap<u64, Arc<ReplicationMetric>>,
    /// Execution ids in the order they were first stored. Front is evicted first.
    insertion_order: VecDeque<u64>,
}

/// In-memory [`MetricStore`] holding at most `max_size` executions.
///
/// When a new execution is stored into a full store, the execution that was stored first
/// is evicted. Replacing the snapshot of an execution already present does not change its
/// position, so a long running job is evicted before jobs that started after it.
///
/// Cloning the store is cheap and every clone refers to the same entries.
///
/// Only the [`MemoryMetricStore::global`] store reports its size through the
/// `repl_progress_store_entries` gauge.
#[derive(Debug, Clone)]
pub struct MemoryMetricStore {
    inner: Arc<RwLock<Inner>>,
    max_size: usize,
    reports_entries: bool,
}

impl MemoryMetricStore {
    /// Creates an empty store. A `max_size` of zero is raised to one so the snapshot of the
    /// latest job stays readable.
    pub fn new(max_size: usize) -> Self {
        let max_size = max_size.max(1);
        let inner = Inner {
            metrics: HashMap::with_capacity(max_size.min(1024)),
            insertion_order: VecDeque::with_capacity(max_size.min(1024)),
        };

        Self {
            inner: Arc::new(RwLock::new(inner)),
            max_size,
            reports_entries: false,
        }
    }

    /// Returns the process-wide store, creating it with `max_size` on first use.
    ///
    /// Only the first call decides the capacity; later calls return the existing store
    /// whatever size they ask for.
    pub fn global(max_size: usize) -> Self {
        let store = GLOBAL_STORE.get_or_init(|| {
            info!(max_size, "initializing the global replication metric store");

            MemoryMetricStore {
                reports_entries: true,
                ..MemoryMetricStore::new(max_size)
            }
        });

        if store.max_size != max_size.max(1) {
            debug!(
                requested_max_size = max_size,
                max_size = store.max_size,
                "global replication metric store already initialized with a different size"
            );
        }

        store.clone()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }
}

impl MetricStore for MemoryMetricStore {
    async fn put(&self, metric: Arc<ReplicationMetric>) -> MetricsResult<()> {
        let execution_id = metric.execution_id;
        let mut inner = self.inner.write().await;

        // Snapshots leaving the store are only dropped once the lock is released.
        let replaced = inner.metrics.insert(execution_id, metric);
        let mut evicted = Vec::new();

        if replaced.is_none() {
            inner.insertion_order.push_back(execution_id);
            while inner.metrics.len() > self.max_size {
                let Some(evicted_id) = inner.insertion_order.pop_front() else {
                    break;
                };
                evicted.extend(inner.metrics.remove(&evicted_id));
            }
        }

        let entries = inner.metrics.len();
        drop(inner);

        for metric in &evicted {
            counter!(REPL_PROGRESS_STORE_EVICTIONS_TOTAL).increment(1);
            info!(
                execution_id = metric.execution_id,
                max_size = self.max_size,
                "evicted replication metric to make room for execution {execution_id}"
            );
        }

        if self.reports_entries {
            gauge!(REPL_PROGRESS_STORE_ENTRIES).set(entries as f64);
        }

        drop(replaced);
        drop(evicted);

        Ok(())
    }

    async fn get(&self, execution_id: u64) -> MetricsResult<Option<Arc<ReplicationMetric>>> {
        let inner = self.inner.read().await;

        Ok(inner.metrics.get(&execution_id).cloned())
    }

    async fn list(&self) -> MetricsResult<Vec<Arc<ReplicationMetric>>> {
        let inner = self.inner.read().await;

        Ok(inner
            .insertion_order
            .iter()
            .filter_map(|execution_id| inner.metrics.get(execution_id).cloned())
            .collect())
    }

    async fn len(&self) -> MetricsResult<usize> {
        let inner = self.inner.read().await;

        Ok(inner.metrics.len())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::{Duration, Instant};

    use chrono::Utc;

    use super::*;
    use crate::types::{Metadata, Metric, ReplicationType, Stage};

    fn snapshot(execution_id: u64) -> Arc<ReplicationMetric> {
        Arc::new(ReplicationMetric::new(
            execution_id,
            "policy",
            0,
            Metadata::new("db", ReplicationType::Bootstrap, "/staging"),
        ))
    }

    async fn stored_ids(store: &MemoryMetricStore) -> Vec<u64> {
        store
            .list()
            .await
            .unwrap()
            .iter()
            .map(|metric| metric.execution_id)
            .collect()
    }

    #[tokio::test]
    async fn evicts_first_inserted_when_full() {
        let store = MemoryMetricStore::new(2);

        for execution_id in [1, 2, 3] {
            store.put(snapshot(execution_id)).await.unwrap();
        }

        assert_eq!(stored_ids(&store).await, [2, 3]);
        assert!(store.get(1).await.unwrap().is_none());
        assert_eq!(store.len().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn updating_an_entry_does_not_refresh_its_position() {
        let store = MemoryMetricStore::new(2);
        store.put(snapshot(1)).await.unwrap();
        store.put(snapshot(2)).await.unwrap();

        let mut updated = ReplicationMetric::clone(&snapshot(1));
        updated.policy = "renamed".to_owned();
        store.put(Arc::new(updated)).await.unwrap();
        store.put(snapshot(3)).await.unwrap();

        assert_eq!(stored_ids(&store).await, [2, 3]);
    }

    #[tokio::test]
    async fn upsert_replaces_the_snapshot_without_growing() {
        let store = MemoryMetricStore::new(4);
        store.put(snapshot(7)).await.unwrap();

        let mut updated = ReplicationMetric::clone(&snapshot(7));
        updated.dump_execution_id = 6;
        store.put(Arc::new(updated)).await.unwrap();

        let stored = store.get(7).await.unwrap().unwrap();
        assert_eq!(stored.dump_execution_id, 6);
        assert_eq!(store.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn listed_snapshots_are_not_affected_by_later_puts() {
        let store = MemoryMetricStore::new(4);
        store.put(snapshot(1)).await.unwrap();
        let listed = store.list().await.unwrap();

        let mut updated = ReplicationMetric::clone(&snapshot(1));
        updated.policy = "changed".to_owned();
        store.put(Arc::new(updated)).await.unwrap();

        assert_eq!(listed[0].policy, "policy");
        assert_eq!(store.get(1).await.unwrap().unwrap().policy, "changed");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn releasing_a_large_snapshot_does_not_block_readers() {
        let store = MemoryMetricStore::new(4);
        store.put(snapshot(2)).await.unwrap();

        let mut large = ReplicationMetric::clone(&snapshot(1));
        let mut stage = Stage::new("dump", Utc::now());
        for i in 0..500_000 {
            stage.add_metric(Metric::new(format!("table_{i}"), 1));
        }
        large.progress.add_stage(stage);
        store.put(Arc::new(large)).await.unwrap();

        let reading = Arc::new(AtomicBool::new(false));
        let done = Arc::new(AtomicBool::new(false));
        let reader = tokio::spawn({
            let store = store.clone();
            let reading = reading.clone();
            let done = done.clone();
            async move {
                let mut slowest = Duration::ZERO;
                while !done.load(Ordering::Acquire) {
                    let started = Instant::now();
                    assert!(store.get(2).await.unwrap().is_some());
                    slowest = slowest.max(started.elapsed());
                    reading.store(true, Ordering::Release);
                    tokio::task::yield_now().await;
                }
                slowest
            }
        });
        while !reading.load(Ordering::Acquire) {
            tokio::task::yield_now().await;
        }

        // The store holds the only reference to the large snapshot.
        let started = Instant::now();
        store.put(snapshot(1)).await.unwrap();
        let put_duration = started.elapsed();
        done.store(true, Ordering::Release);

        let slowest_get = reader.await.unwrap();
        assert!(
            slowest_get < put_duration / 2,
            "get took {slowest_get:?} while put took {put_duration:?}"
        );
        let replacement = store.get(1).await.unwrap().unwrap();
        assert!(replacement.progress.stage("dump").is_none());
    }

    #[tokio::test]
    async fn zero_capacity_still_keeps_latest_entry() {
        let store = MemoryMetricStore::new(0);
        store.put(snapshot(1)).await.unwrap();
        store.put(snapshot(2)).await.unwrap();

        assert_eq!(store.max_size(), 1);
        assert_eq!(stored_ids(&store).await, [2]);
    }

    #[tokio::test]
    async fn global_store_keeps_first_size() {
        let first = MemoryMetricStore::global(3);
        let second = MemoryMetricStore::global(50);

        assert_eq!(first.max_size(), second.max_size());
        assert!(Arc::ptr_eq(&first.inner, &second.inner));
    }
}
