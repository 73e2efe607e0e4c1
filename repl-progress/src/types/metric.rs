use serde::{Deserialize, Serialize};

/// A named progress counter within a stage.
///
/// `total_count` starts as the expected amount of work declared when the stage starts. It
/// is a high-water mark: once `current_count` goes past it, it follows `current_count`, so
/// `total_count >= current_count` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Metric {
    name: String,
    current_count: u64,
    total_count: u64,
}

impl Metric {
    pub fn new(name: impl Into<String>, total_count: u64) -> Self {
        Self {
            name: name.into(),
            current_count: 0,
            total_count,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn current_count(&self) -> u64 {
        self.current_count
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Adds `count` units of completed work.
    pub fn advance(&mut self, count: u64) {
        self.current_count = self.current_count.saturating_add(count);
        if self.current_count > self.total_count {
            self.total_count = self.current_count;
        }
    }
}
