use std::sync::Arc;

use chrono::Utc;
use metrics::counter;
use repl_progress_config::shared::MetricsConfig;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::{ErrorKind, MetricsError, MetricsResult};
use crate::metrics::{
    JOB_END, OPERATION_LABEL, REPL_PROGRESS_STAGE_TRANSITIONS_TOTAL, REPL_PROGRESS_UPDATES_TOTAL,
    REPLICATION_TYPE_LABEL, STAGE_END, STAGE_PROGRESS, STAGE_START, STATUS_LABEL,
    register_metrics,
};
use crate::reporter::{JobIdentity, JobKind};
use crate::store::{MemoryMetricStore, MetricStore};
use crate::types::{Metadata, Metric, ReplicationMetric, Stage, Status};
use crate::{bail, metrics_error};

/// Records the progress of one job execution into a [`MetricStore`].
///
/// A reporter is either [`ReplicationMetricReporter::Enabled`] or
/// [`ReplicationMetricReporter::Disabled`], decided when it is built. Every reporting
/// method of a disabled reporter returns `Ok(())` without doing anything, so the engine
/// can report unconditionally.
///
/// Reporting methods take `&self`: a reporter can be shared behind an [`Arc`] by tasks
/// working on the same job, and their calls are applied one at a time.
#[derive(Debug)]
pub enum ReplicationMetricReporter<S> {
    Enabled(ActiveReporter<S>),
    Disabled,
}

impl<S> ReplicationMetricReporter<S>
where
    S: MetricStore + Sync,
{
    /// Builds a reporter publishing into `store`.
    ///
    /// The reporter is disabled, and `store` dropped unused, when the job has no policy or
    /// no execution id. Nothing is published before the first reported event.
    pub fn new(job: JobIdentity, kind: JobKind, store: S) -> Self {
        if !job.is_reporting_enabled() {
            debug!(
                execution_id = job.execution_id,
                policy = %job.policy,
                "replication progress reporting disabled for job"
            );

            return ReplicationMetricReporter::Disabled;
        }

        ReplicationMetricReporter::Enabled(ActiveReporter::new(job, kind, store))
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, ReplicationMetricReporter::Enabled(_))
    }

    /// Execution id of the tracked job, `None` when disabled.
    pub fn execution_id(&self) -> Option<u64> {
        match self {
            ReplicationMetricReporter::Enabled(reporter) => Some(reporter.execution_id),
            ReplicationMetricReporter::Disabled => None,
        }
    }

    /// Returns a copy of the job's current snapshot, `None` when disabled.
    pub async fn snapshot(&self) -> Option<ReplicationMetric> {
        match self {
            ReplicationMetricReporter::Enabled(reporter) => Some(reporter.snapshot().await),
            ReplicationMetricReporter::Disabled => None,
        }
    }

    /// Starts `stage_name` with one counter per `(metric name, expected total)` pair.
    ///
    /// Counters start at zero. Starting a stage that already exists replaces it.
    pub async fn report_stage_start<I, K>(
        &self,
        stage_name: &str,
        metrics: I,
    ) -> MetricsResult<()>
    where
        I: IntoIterator<Item = (K, u64)>,
        K: Into<String>,
    {
        match self {
            ReplicationMetricReporter::Enabled(reporter) => {
                reporter.report_stage_start(stage_name, metrics).await
            }
            ReplicationMetricReporter::Disabled => Ok(()),
        }
    }

    /// Adds `count` to counter `metric_name` of stage `stage_name`.
    ///
    /// Fails with [`ErrorKind::StageNotFound`] or [`ErrorKind::MetricNotFound`] when the
    /// stage was not started, or was started without that counter.
    pub async fn report_stage_progress(
        &self,
        stage_name: &str,
        metric_name: &str,
        count: u64,
    ) -> MetricsResult<()> {
        match self {
            ReplicationMetricReporter::Enabled(reporter) => {
                reporter
                    .report_stage_progress(stage_name, metric_name, count)
                    .await
            }
            ReplicationMetricReporter::Disabled => Ok(()),
        }
    }

    /// Ends `stage_name` with `status`, stamping the current time as its end time.
    ///
    /// Fails with [`ErrorKind::InvalidState`] when `status` is not terminal.
    pub async fn report_stage_end(&self, stage_name: &str, status: Status) -> MetricsResult<()> {
        match self {
            ReplicationMetricReporter::Enabled(reporter) => {
                reporter.report_stage_end(stage_name, status, None).await
            }
            ReplicationMetricReporter::Disabled => Ok(()),
        }
    }

    /// Same as [`ReplicationMetricReporter::report_stage_end`], also recording the last
    /// replicated event id in the job's metadata.
    pub async fn report_stage_end_with_repl_id(
        &self,
        stage_name: &str,
        status: Status,
        last_repl_id: u64,
    ) -> MetricsResult<()> {
        match self {
            ReplicationMetricReporter::Enabled(reporter) => {
                reporter
                    .report_stage_end(stage_name, status, Some(last_repl_id))
                    .await
            }
            ReplicationMetricReporter::Disabled => Ok(()),
        }
    }

    /// Sets the outcome of the whole job. Stage statuses are left as they are.
    ///
    /// Fails with [`ErrorKind::InvalidState`] when `status` is not terminal.
    pub async fn report_end(&self, status: Status) -> MetricsResult<()> {
        match self {
            ReplicationMetricReporter::Enabled(reporter) => reporter.report_end(status).await,
            ReplicationMetricReporter::Disabled => Ok(()),
        }
    }
}

impl ReplicationMetricReporter<MemoryMetricStore> {
    /// Builds a reporter publishing into the process-wide [`MemoryMetricStore`].
    ///
    /// The global store is only initialized, with `max_cache_size`, when the job is
    /// tracked.
    pub fn with_global_store(job: JobIdentity, kind: JobKind, max_cache_size: usize) -> Self {
        if !job.is_reporting_enabled() {
            return ReplicationMetricReporter::Disabled;
        }

        let store = MemoryMetricStore::global(max_cache_size);

        ReplicationMetricReporter::Enabled(ActiveReporter::new(job, kind, store))
    }

    /// Builds a reporter from the service's metrics settings.
    ///
    /// Every reporter is disabled when `config.enabled` is `false`. Fails with
    /// [`ErrorKind::ConfigError`] when the settings are invalid.
    pub fn from_config(
        job: JobIdentity,
        kind: JobKind,
        config: &MetricsConfig,
    ) -> MetricsResult<Self> {
        config.validate()?;

        if !config.enabled {
            debug!(
                execution_id = job.execution_id,
                "replication progress reporting disabled by configuration"
            );

            return Ok(ReplicationMetricReporter::Disabled);
        }

        Ok(Self::with_global_store(job, kind, config.max_cache_size))
    }
}

/// The tracking half of an enabled [`ReplicationMetricReporter`].
///
/// Owns the job's [`ReplicationMetric`] behind a per-job lock. Each update mutates it in
/// place and publishes a fresh copy while still holding the lock, so the store sees the
/// job's updates in the order they were made.
#[derive(Debug)]
pub struct ActiveReporter<S> {
    execution_id: u64,
    kind: JobKind,
    metric: Mutex<ReplicationMetric>,
    store: S,
}

impl<S> ActiveReporter<S>
where
    S: MetricStore + Sync,
{
    fn new(job: JobIdentity, kind: JobKind, store: S) -> Self {
        register_metrics();

        let metadata = Metadata::new(job.db_name, kind.replication_type(), job.staging_dir);
        let metric =
            ReplicationMetric::new(job.execution_id, job.policy, job.dump_execution_id, metadata);

        debug!(
            execution_id = job.execution_id,
            policy = %metric.policy,
            %kind,
            "replication progress reporting enabled for job"
        );

        Self {
            execution_id: job.execution_id,
            kind,
            metric: Mutex::new(metric),
            store,
        }
    }

    pub fn kind(&self) -> JobKind {
        self.kind
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    async fn snapshot(&self) -> ReplicationMetric {
        self.metric.lock().await.clone()
    }

    async fn report_stage_start<I, K>(&self, stage_name: &str, metrics: I) -> MetricsResult<()>
    where
        I: IntoIterator<Item = (K, u64)>,
        K: Into<String>,
    {
        let mut stage = Stage::new(stage_name, Utc::now());
        for (name, total_count) in metrics {
            stage.add_metric(Metric::new(name, total_count));
        }

        self.publish(STAGE_START, Some(stage_name), move |metric| {
            metric.progress.add_stage(stage);

            Ok(())
        })
        .await
    }

    async fn report_stage_progress(
        &self,
        stage_name: &str,
        metric_name: &str,
        count: u64,
    ) -> MetricsResult<()> {
        self.publish(STAGE_PROGRESS, Some(stage_name), |metric| {
            let stage = metric
                .progress
                .stage_mut(stage_name)
                .ok_or_else(|| stage_not_found(stage_name))?;
            let Some(counter) = stage.metric_mut(metric_name) else {
                bail!(
                    ErrorKind::MetricNotFound,
                    "Metric was not declared when its stage started",
                    format!("metric `{metric_name}` of stage `{stage_name}`")
                );
            };

            counter.advance(count);

            Ok(())
        })
        .await
    }

    async fn report_stage_end(
        &self,
        stage_name: &str,
        status: Status,
        last_repl_id: Option<u64>,
    ) -> MetricsResult<()> {
        let end_time = Utc::now();

        self.publish(STAGE_END, Some(stage_name), |metric| {
            ensure_terminal(status)?;
            let stage = metric
                .progress
                .stage_mut(stage_name)
                .ok_or_else(|| stage_not_found(stage_name))?;
            stage.finish(status, end_time);

            if let Some(last_repl_id) = last_repl_id {
                metric.metadata.last_repl_id = Some(last_repl_id);
            }

            Ok(())
        })
        .await?;

        self.record_transition(status);

        Ok(())
    }

    async fn report_end(&self, status: Status) -> MetricsResult<()> {
        self.publish(JOB_END, None, |metric| {
            ensure_terminal(status)?;
            metric.progress.set_status(status);

            Ok(())
        })
        .await?;

        self.record_transition(status);

        Ok(())
    }

    /// Applies `update` to the job's snapshot and republishes the whole snapshot.
    ///
    /// `update` must check its preconditions before changing anything: when it fails
    /// the snapshot is left as it was and nothing is published.
    async fn publish<F>(
        &self,
        operation: &'static str,
        stage_name: Option<&str>,
        update: F,
    ) -> MetricsResult<()>
    where
        F: FnOnce(&mut ReplicationMetric) -> MetricsResult<()> + Send,
    {
        let mut metric = self.metric.lock().await;

        if let Err(err) = update(&mut *metric) {
            warn!(
                execution_id = self.execution_id,
                policy = %metric.policy,
                stage = stage_name,
                operation,
                error = %err,
                "rejected replication progress update"
            );

            return Err(err);
        }

        self.store
            .put(Arc::new(ReplicationMetric::clone(&metric)))
            .await?;

        counter!(
            REPL_PROGRESS_UPDATES_TOTAL,
            OPERATION_LABEL => operation,
            REPLICATION_TYPE_LABEL => self.kind.replication_type().to_string()
        )
        .increment(1);

        debug!(
            execution_id = self.execution_id,
            policy = %metric.policy,
            stage = stage_name,
            operation,
            "published replication progress"
        );

        Ok(())
    }

    fn record_transition(&self, status: Status) {
        counter!(REPL_PROGRESS_STAGE_TRANSITIONS_TOTAL, STATUS_LABEL => status.as_str())
            .increment(1);
    }
}

fn ensure_terminal(status: Status) -> MetricsResult<()> {
    if !status.is_terminal() {
        bail!(
            ErrorKind::InvalidState,
            "Stages and jobs can only end with a terminal status",
            format!("status `{status}`")
        );
    }

    Ok(())
}

fn stage_not_found(stage_name: &str) -> MetricsError {
    metrics_error!(
        ErrorKind::StageNotFound,
        "Stage was not started before being updated",
        stage_name
    )
}
