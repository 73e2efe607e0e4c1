use std::fs;
use std::path::PathBuf;

use repl_progress_config::shared::{MetricsConfig, ProgressSettings};
use repl_progress_config::{Environment, LoadConfigError, load_config_from};

fn configuration_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "repl-progress-config-{name}-{}",
        std::process::id()
    ));
    fs::create_dir_all(&dir).unwrap();

    dir
}

#[test]
fn environment_file_overrides_base_file() {
    let dir = configuration_dir("override");
    fs::write(
        dir.join("base.yaml"),
        "metrics:\n  enabled: true\n  max_cache_size: 500\n",
    )
    .unwrap();
    fs::write(dir.join("dev.yaml"), "metrics:\n  max_cache_size: 2\n").unwrap();

    let settings: ProgressSettings = load_config_from(&dir, Environment::Dev).unwrap();

    assert_eq!(
        settings.metrics,
        MetricsConfig {
            enabled: true,
            max_cache_size: 2,
        }
    );
    assert!(settings.validate().is_ok());

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn environment_file_is_optional() {
    let dir = configuration_dir("optional");
    fs::write(dir.join("base.yaml"), "metrics:\n  enabled: false\n").unwrap();

    let settings: ProgressSettings = load_config_from(&dir, Environment::Staging).unwrap();

    assert!(!settings.metrics.enabled);
    assert_eq!(
        settings.metrics.max_cache_size,
        MetricsConfig::DEFAULT_MAX_CACHE_SIZE
    );

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn missing_base_file_is_an_error() {
    let dir = configuration_dir("missing");

    let result = load_config_from::<ProgressSettings>(&dir, Environment::Prod);

    assert!(matches!(result, Err(LoadConfigError::Config(_))));

    fs::remove_dir_all(dir).unwrap();
}
