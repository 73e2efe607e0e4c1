mod base;
mod metrics;
mod settings;

pub use base::*;
pub use metrics::*;
pub use settings::*;
