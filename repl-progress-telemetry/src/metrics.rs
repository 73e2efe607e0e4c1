use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::trace;

/// How often histogram buckets and idle series are cleaned up.
const UPKEEP_INTERVAL: Duration = Duration::from_secs(5);

// A mutex instead of `OnceLock` because installation is fallible and
// `OnceLock::get_or_try_init` is not stable. Installing a recorder is global and
// can only succeed once per process, but tests call this repeatedly.
static PROMETHEUS_HANDLE: Mutex<Option<PrometheusHandle>> = Mutex::new(None);

/// Installs the global Prometheus recorder and returns a handle to render it.
///
/// The first call installs the recorder and spawns a background upkeep task on the
/// current tokio runtime; later calls return clones of the same handle. An exporter
/// owned by the surrounding service renders the handle, this crate never opens a socket.
pub fn init_metrics_handle() -> Result<PrometheusHandle, BuildError> {
    let mut prometheus_handle = PROMETHEUS_HANDLE
        .lock()
        .unwrap_or_else(PoisonError::into_inner);

    if let Some(handle) = &*prometheus_handle {
        return Ok(handle.clone());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    *prometheus_handle = Some(handle.clone());

    let upkeep_handle = handle.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(UPKEEP_INTERVAL).await;
            trace!("running metrics upkeep");
            upkeep_handle.run_upkeep();
        }
    });

    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn repeated_initialization_returns_the_same_recorder() {
        let first = init_metrics_handle().unwrap();
        let second = init_metrics_handle().unwrap();

        assert_eq!(first.render(), second.render());
    }
}
