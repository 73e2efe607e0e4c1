use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Environment variable holding the name of the environment the process runs in.
const APP_ENVIRONMENT_ENV_NAME: &str = "APP_ENVIRONMENT";

const PROD_ENV_NAME: &str = "prod";
const STAGING_ENV_NAME: &str = "staging";
const DEV_ENV_NAME: &str = "dev";

/// Returned when `APP_ENVIRONMENT` holds a name we do not know about.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("`{0}` is not a supported environment, use one of `prod`, `staging` or `dev`")]
pub struct UnknownEnvironment(pub String);

/// Runtime environment of the process hosting the progress reporters.
///
/// The environment decides which configuration file is layered on top of
/// `base.yaml` and whether logs go to the terminal or to rolling JSON files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Prod,
    Staging,
    Dev,
}

impl Environment {
    /// Reads the environment from `APP_ENVIRONMENT`, defaulting to [`Environment::Prod`].
    pub fn load() -> Result<Environment, UnknownEnvironment> {
        match std::env::var(APP_ENVIRONMENT_ENV_NAME) {
            Ok(name) => name.parse(),
            Err(_) => Ok(Environment::Prod),
        }
    }

    /// Exports this environment into `APP_ENVIRONMENT` for the current process.
    pub fn set(&self) {
        // Only called during single-threaded setup (tests and process start).
        unsafe { std::env::set_var(APP_ENVIRONMENT_ENV_NAME, self.as_str()) }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Prod => PROD_ENV_NAME,
            Environment::Staging => STAGING_ENV_NAME,
            Environment::Dev => DEV_ENV_NAME,
        }
    }

    /// Staging counts as production for logging and defaults.
    pub fn is_prod(&self) -> bool {
        matches!(self, Environment::Prod | Environment::Staging)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = UnknownEnvironment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            PROD_ENV_NAME => Ok(Environment::Prod),
            STAGING_ENV_NAME => Ok(Environment::Staging),
            DEV_ENV_NAME => Ok(Environment::Dev),
            _ => Err(UnknownEnvironment(s.to_owned())),
        }
    }
}
