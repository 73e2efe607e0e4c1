use serde::{Deserialize, Serialize};

use crate::shared::ValidationError;

/// Settings for replication progress tracking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MetricsConfig {
    /// Master switch. When `false` every reporter is built disabled and never
    /// touches the metric store.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Maximum number of job executions kept in the in-memory metric store.
    #[serde(default = "default_max_cache_size")]
    pub max_cache_size: usize,
}

impl MetricsConfig {
    pub const DEFAULT_MAX_CACHE_SIZE: usize = 10_000;

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_cache_size == 0 {
            return Err(ValidationError::ZeroCacheSize);
        }

        Ok(())
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            max_cache_size: default_max_cache_size(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_max_cache_size() -> usize {
    MetricsConfig::DEFAULT_MAX_CACHE_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: MetricsConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, MetricsConfig::default());
        assert!(config.enabled);
        assert_eq!(config.max_cache_size, 10_000);
    }

    #[test]
    fn zero_cache_size_is_rejected() {
        let config = MetricsConfig {
            enabled: true,
            max_cache_size: 0,
        };
        assert_eq!(config.validate(), Err(ValidationError::ZeroCacheSize));
    }
}
