use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod navigation;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use navigation::{Navigation, PageEntry, PageId, Section};
pub use settings::{
    Config, DatasetParams, DatasetSettings, LoggingSettings, ServerSettings, TrainingSettings,
};

/// Default settings file, looked up in the working directory.
pub const CONFIG_FILE: &str = "dashboard.toml";
/// Default page list, looked up in the working directory.
pub const NAVIGATION_FILE: &str = "navigation.toml";

/// Loads the application configuration from `dashboard.toml` and the environment.
///
/// The file is optional. Environment variables prefixed with `DEALING` override it,
/// with `__` separating nested keys (e.g. `DEALING__SERVER__PORT=8080`).
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(Path::new(CONFIG_FILE))
}

/// Like [`load_config`] but reads the given file.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix("DEALING")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;
    tracing::debug!(file = %path.display(), "Configuration loaded.");

    Ok(config)
}

/// Loads the sidebar page list, falling back to the built-in layout when the file
/// does not exist.
pub fn load_navigation(path: &Path) -> Result<Navigation, ConfigError> {
    if !path.exists() {
        tracing::info!(file = %path.display(), "Navigation file not found, using the built-in page list.");
        return Ok(Navigation::default());
    }

    let navigation = config::Config::builder()
        .add_source(config::File::from(path))
        .build()?
        .try_deserialize::<Navigation>()?;
    navigation.validate()?;

    Ok(navigation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_config_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.datasets.broker_flow.seed, 42);
        assert_eq!(config.datasets.best_brokers.rows, 1000);
    }

    #[test]
    fn test_config_file_overrides_sections() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 8081

[datasets.best_brokers]
seed = 9
rows = 50
start = "2024-02-01"
end = "2024-02-29"
"#
        )
        .unwrap();

        let config = load_config_from(file.path()).unwrap();
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.datasets.best_brokers.rows, 50);
        // Untouched datasets keep their defaults.
        assert_eq!(config.datasets.full_report.seed, 123);
    }

    #[test]
    fn test_reversed_dataset_range_fails_validation() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[datasets.broker_flow]
seed = 1
rows = 0
start = "2024-12-31"
end = "2024-01-01"
"#
        )
        .unwrap();

        assert!(matches!(
            load_config_from(file.path()),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_navigation_file_is_parsed() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
title = "Desk"

[[sections]]
title = "CDS"

[[sections.pages]]
page = "best-brokers"
title = "Best Brokers"
path = "best"
"#
        )
        .unwrap();

        let nav = load_navigation(file.path()).unwrap();
        assert_eq!(nav.title, "Desk");
        assert_eq!(nav.find_by_path("best").unwrap().page, PageId::BestBrokers);
    }

    #[test]
    fn test_missing_navigation_file_uses_builtin_layout() {
        let dir = tempfile::tempdir().unwrap();
        let nav = load_navigation(&dir.path().join("navigation.toml")).unwrap();
        assert_eq!(nav, Navigation::default());
    }

    #[test]
    fn test_shipped_files_match_the_builtin_defaults() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../..");
        let nav = load_navigation(&root.join(NAVIGATION_FILE)).unwrap();
        assert_eq!(nav, Navigation::default());

        let config = load_config_from(&root.join(CONFIG_FILE)).unwrap();
        assert_eq!(config.datasets, settings::DatasetSettings::default());
        assert_eq!(config.training.sample_path, Path::new("data/sample.csv"));
    }
}
