use std::error;
use std::fmt;

/// Result type for progress reporting operations.
pub type MetricsResult<T> = Result<T, MetricsError>;

/// Error returned by the reporter and the metric store.
///
/// A [`MetricsError`] carries an [`ErrorKind`], a static description and optionally a
/// dynamic detail, such as the name of a stage that was never started. Several errors can
/// be aggregated into one.
#[derive(Debug, Clone)]
pub struct MetricsError {
    repr: ErrorRepr,
}

#[derive(Debug, Clone)]
enum ErrorRepr {
    WithDescription(ErrorKind, &'static str),
    WithDescriptionAndDetail(ErrorKind, &'static str, String),
    Many(Vec<MetricsError>),
}

/// Categories of failures.
///
/// Stage and metric lookups fail when the replication engine reports progress for
/// something it never started, which is a sequencing bug on the caller's side.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
#[non_exhaustive]
pub enum ErrorKind {
    // Usage errors
    StageNotFound,
    MetricNotFound,
    InvalidState,

    // Configuration errors
    ConfigError,

    Unknown,
}

impl MetricsError {
    /// Aggregates multiple errors into one.
    pub fn many(errors: Vec<MetricsError>) -> MetricsError {
        MetricsError {
            repr: ErrorRepr::Many(errors),
        }
    }

    /// Returns the kind of this error, or of the first aggregated error.
    pub fn kind(&self) -> ErrorKind {
        match self.repr {
            ErrorRepr::WithDescription(kind, _)
            | ErrorRepr::WithDescriptionAndDetail(kind, _, _) => kind,
            ErrorRepr::Many(ref errors) => errors
                .first()
                .map(|err| err.kind())
                .unwrap_or(ErrorKind::Unknown),
        }
    }

    /// Returns every kind contained in this error, flattening aggregates.
    pub fn kinds(&self) -> Vec<ErrorKind> {
        match self.repr {
            ErrorRepr::WithDescription(kind, _)
            | ErrorRepr::WithDescriptionAndDetail(kind, _, _) => vec![kind],
            ErrorRepr::Many(ref errors) => errors.iter().flat_map(|err| err.kinds()).collect(),
        }
    }

    /// Returns the dynamic detail, or the first one found in an aggregate.
    pub fn detail(&self) -> Option<&str> {
        match self.repr {
            ErrorRepr::WithDescriptionAndDetail(_, _, ref detail) => Some(detail.as_str()),
            ErrorRepr::Many(ref errors) => errors.iter().find_map(|e| e.detail()),
            ErrorRepr::WithDescription(_, _) => None,
        }
    }
}

impl PartialEq for MetricsError {
    fn eq(&self, other: &MetricsError) -> bool {
        match (&self.repr, &other.repr) {
            (ErrorRepr::WithDescription(kind_a, _), ErrorRepr::WithDescription(kind_b, _)) => {
                kind_a == kind_b
            }
            (
                ErrorRepr::WithDescriptionAndDetail(kind_a, _, _),
                ErrorRepr::WithDescriptionAndDetail(kind_b, _, _),
            ) => kind_a == kind_b,
            (ErrorRepr::Many(errors_a), ErrorRepr::Many(errors_b)) => errors_a == errors_b,
            _ => false,
        }
    }
}

impl fmt::Display for MetricsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.repr {
            ErrorRepr::WithDescription(kind, desc) => write!(f, "{kind:?}: {desc}"),
            ErrorRepr::WithDescriptionAndDetail(kind, desc, ref detail) => {
                write!(f, "{kind:?}: {desc} -> {detail}")
            }
            ErrorRepr::Many(ref errors) => match errors.as_slice() {
                [] => f.write_str("Multiple errors occurred (empty)"),
                [error] => error.fmt(f),
                errors => {
                    write!(f, "Multiple errors occurred ({} total):", errors.len())?;
                    for (i, error) in errors.iter().enumerate() {
                        write!(f, "\n  {}: {}", i + 1, error)?;
                    }
                    Ok(())
                }
            },
        }
    }
}

impl error::Error for MetricsError {}

impl From<(ErrorKind, &'static str)> for MetricsError {
    fn from((kind, desc): (ErrorKind, &'static str)) -> MetricsError {
        MetricsError {
            repr: ErrorRepr::WithDescription(kind, desc),
        }
    }
}

impl From<(ErrorKind, &'static str, String)> for MetricsError {
    fn from((kind, desc, detail): (ErrorKind, &'static str, String)) -> MetricsError {
        MetricsError {
            repr: ErrorRepr::WithDescriptionAndDetail(kind, desc, detail),
        }
    }
}

impl<E> From<Vec<E>> for MetricsError
where
    E: Into<MetricsError>,
{
    fn from(errors: Vec<E>) -> MetricsError {
        MetricsError {
            repr: ErrorRepr::Many(errors.into_iter().map(Into::into).collect()),
        }
    }
}

/// Maps configuration validation failures to [`ErrorKind::ConfigError`].
impl From<repl_progress_config::shared::ValidationError> for MetricsError {
    fn from(err: repl_progress_config::shared::ValidationError) -> MetricsError {
        MetricsError {
            repr: ErrorRepr::WithDescriptionAndDetail(
                ErrorKind::ConfigError,
                "Invalid metrics configuration",
                err.to_string(),
            ),
        }
    }
}
