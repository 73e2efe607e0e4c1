/// Creates a [`crate::error::MetricsError`] from a kind, a static description and an
/// optional detail.
#[macro_export]
macro_rules! metrics_error {
    ($kind:expr, $desc:expr) => {
        $crate::error::MetricsError::from(($kind, $desc))
    };
    ($kind:expr, $desc:expr, $detail:expr) => {
        $crate::error::MetricsError::from(($kind, $desc, $detail.to_string()))
    };
}

/// Returns early with a [`crate::error::MetricsError`].
#[macro_export]
macro_rules! bail {
    ($kind:expr, $desc:expr) => {
        return Err($crate::metrics_error!($kind, $desc))
    };
    ($kind:expr, $desc:expr, $detail:expr) => {
        return Err($crate::metrics_error!($kind, $desc, $detail))
    };
}
