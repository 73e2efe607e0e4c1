use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::environment::{Environment, UnknownEnvironment};

/// Directory, relative to the working directory, holding the YAML configuration files.
const CONFIGURATION_DIR: &str = "configuration";

/// File loaded first, for every environment.
const BASE_CONFIG_FILE: &str = "base.yaml";

/// Prefix of the environment variables overriding file values.
const ENV_PREFIX: &str = "APP";

const ENV_PREFIX_SEPARATOR: &str = "_";

/// Separator for nested keys, e.g. `APP_METRICS__MAX_CACHE_SIZE` sets `metrics.max_cache_size`.
const ENV_SEPARATOR: &str = "__";

const LIST_SEPARATOR: &str = ",";

#[derive(Debug, Error)]
pub enum LoadConfigError {
    #[error("failed to determine the current directory: {0}")]
    CurrentDir(#[source] std::io::Error),

    #[error(transparent)]
    Environment(#[from] UnknownEnvironment),

    #[error("failed to build configuration: {0}")]
    Config(#[from] config::ConfigError),
}

/// Implemented by every top level settings struct that can be loaded with [`load_config`].
pub trait Config {
    /// Keys whose environment variable values are split on `,` into lists.
    const LIST_PARSE_KEYS: &'static [&'static str];
}

/// Loads `T` from `./configuration` for the environment named by `APP_ENVIRONMENT`.
///
/// Sources are layered in this order, later ones winning:
/// 1. `configuration/base.yaml`
/// 2. `configuration/{environment}.yaml`, if present
/// 3. `APP_` prefixed environment variables
pub fn load_config<T>() -> Result<T, LoadConfigError>
where
    T: Config + DeserializeOwned,
{
    let base_path = std::env::current_dir().map_err(LoadConfigError::CurrentDir)?;
    let environment = Environment::load()?;

    load_config_from(base_path.join(CONFIGURATION_DIR), environment)
}

/// Same as [`load_config`] with an explicit configuration directory and environment.
pub fn load_config_from<T>(
    configuration_dir: impl AsRef<Path>,
    environment: Environment,
) -> Result<T, LoadConfigError>
where
    T: Config + DeserializeOwned,
{
    let configuration_dir = configuration_dir.as_ref();

    let mut environment_source = config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator(ENV_PREFIX_SEPARATOR)
        .separator(ENV_SEPARATOR);

    if !T::LIST_PARSE_KEYS.is_empty() {
        environment_source = environment_source
            .try_parsing(true)
            .list_separator(LIST_SEPARATOR);

        for key in T::LIST_PARSE_KEYS {
            environment_source = environment_source.with_list_parse_key(key);
        }
    }

    let settings = config::Config::builder()
        .add_source(config::File::from(file_path(
            configuration_dir,
            BASE_CONFIG_FILE,
        )))
        .add_source(
            config::File::from(file_path(
                configuration_dir,
                &format!("{environment}.yaml"),
            ))
            .required(false),
        )
        .add_source(environment_source)
        .build()?;

    Ok(settings.try_deserialize::<T>()?)
}

fn file_path(dir: &Path, file_name: &str) -> PathBuf {
    dir.join(file_name)
}
