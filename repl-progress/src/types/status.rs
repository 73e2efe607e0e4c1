use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of a stage or of a whole job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// Set when a stage starts and on a job that has not reported its end yet.
    #[default]
    InProgress,
    Success,
    Failed,
    /// Failed in a way that needs an operator before the policy can run again.
    FailedAdmin,
    /// Not executed, for example because there was nothing to replicate.
    Skipped,
}

impl Status {
    /// Returns `true` for every status a stage or job can end with.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Status::InProgress)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Status::Failed | Status::FailedAdmin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::InProgress => "IN_PROGRESS",
            Status::Success => "SUCCESS",
            Status::Failed => "FAILED",
            Status::FailedAdmin => "FAILED_ADMIN",
            Status::Skipped => "SKIPPED",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
