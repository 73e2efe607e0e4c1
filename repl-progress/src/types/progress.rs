use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::types::{Stage, Status};

/// Stages of a job keyed by name, in the order they were first reported, plus the
/// job-level outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Progress {
    status: Status,
    stages: IndexMap<String, Stage>,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Job-level status, independent from the status of any single stage.
    pub fn status(&self) -> Status {
        self.status
    }

    pub fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    /// Adds `stage`. A stage with the same name is replaced but keeps its position.
    pub fn add_stage(&mut self, stage: Stage) {
        self.stages.insert(stage.name().to_owned(), stage);
    }

    pub fn stage(&self, name: &str) -> Option<&Stage> {
        self.stages.get(name)
    }

    pub fn stage_mut(&mut self, name: &str) -> Option<&mut Stage> {
        self.stages.get_mut(name)
    }

    pub fn stages(&self) -> impl Iterator<Item = &Stage> {
        self.stages.values()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn restarted_stage_keeps_its_position() {
        let mut progress = Progress::new();
        progress.add_stage(Stage::new("dump", Utc::now()));
        progress.add_stage(Stage::new("load", Utc::now()));
        progress.add_stage(Stage::new("dump", Utc::now()));

        let names: Vec<_> = progress.stages().map(Stage::name).collect();
        assert_eq!(names, ["dump", "load"]);
        assert_eq!(progress.status(), Status::InProgress);
    }
}
