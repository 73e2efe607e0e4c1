use serde::{Deserialize, Serialize};

use crate::load::Config;
use crate::shared::{MetricsConfig, ValidationError};

/// Top level settings of a service hosting replication progress reporters.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProgressSettings {
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl ProgressSettings {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.metrics.validate()
    }
}

impl Config for ProgressSettings {
    const LIST_PARSE_KEYS: &'static [&'static str] = &[];
}
