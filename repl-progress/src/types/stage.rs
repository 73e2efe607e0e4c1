use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::types::{Metric, Status};

/// A named phase of a replication job, such as dumping tables or loading functions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Stage {
    name: String,
    status: Status,
    start_time: DateTime<Utc>,
    /// Unset until the stage reports its end.
    end_time: Option<DateTime<Utc>>,
    metrics: IndexMap<String, Metric>,
}

impl Stage {
    /// Creates a stage in [`Status::InProgress`] without metrics.
    pub fn new(name: impl Into<String>, start_time: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            status: Status::InProgress,
            start_time,
            end_time: None,
            metrics: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    /// Adds `metric`, replacing any metric with the same name in place.
    pub fn add_metric(&mut self, metric: Metric) {
        self.metrics.insert(metric.name().to_owned(), metric);
    }

    pub fn metric(&self, name: &str) -> Option<&Metric> {
        self.metrics.get(name)
    }

    pub fn metric_mut(&mut self, name: &str) -> Option<&mut Metric> {
        self.metrics.get_mut(name)
    }

    /// Iterates over metrics in the order they were declared.
    pub fn metrics(&self) -> impl Iterator<Item = &Metric> {
        self.metrics.values()
    }

    /// Records the outcome of the stage. Calling it again overwrites both values.
    pub fn finish(&mut self, status: Status, end_time: DateTime<Utc>) {
        self.status = status;
        self.end_time = Some(end_time);
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn new_stage_is_in_progress_without_end_time() {
        let now = Utc::now();
        let stage = Stage::new("dump", now);

        assert_eq!(stage.status(), Status::InProgress);
        assert_eq!(stage.start_time(), now);
        assert_eq!(stage.end_time(), None);
        assert_eq!(stage.metrics().count(), 0);
    }

    #[test]
    fn metrics_keep_declaration_order_and_replace_by_name() {
        let mut stage = Stage::new("dump", Utc::now());
        stage.add_metric(Metric::new("tables", 5));
        stage.add_metric(Metric::new("functions", 2));
        stage.add_metric(Metric::new("tables", 9));

        let names: Vec<_> = stage.metrics().map(Metric::name).collect();
        assert_eq!(names, ["tables", "functions"]);
        assert_eq!(stage.metric("tables").map(Metric::total_count), Some(9));
    }

    #[test]
    fn finishing_twice_keeps_the_latest_outcome() {
        let start = Utc::now();
        let mut stage = Stage::new("load", start);

        stage.finish(Status::Failed, start + Duration::seconds(1));
        stage.finish(Status::Failed, start + Duration::seconds(2));

        assert_eq!(stage.status(), Status::Failed);
        assert_eq!(stage.end_time(), Some(start + Duration::seconds(2)));
    }
}
