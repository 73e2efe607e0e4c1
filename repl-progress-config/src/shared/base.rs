use thiserror::Error;

/// Errors raised while validating loaded configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The metric store must be able to hold at least one job.
    #[error("Invalid metrics config: `max_cache_size` must be greater than zero")]
    ZeroCacheSize,
}
