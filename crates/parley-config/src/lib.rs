//! parley configuration system.
//!
//! TOML file config with serde defaults, `PARLEY_*` environment overrides,
//! command-line overrides, and validation.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use parley_config::{load_config, ConfigOverrides};
//!
//! let config = load_config(None, ConfigOverrides::default()).expect("failed to load config");
//! println!("{}", config.session.api_url);
//! ```

pub mod overrides;
pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use overrides::ConfigOverrides;
pub use schema::{
    ChatSection, LoggingConfig, ParleyConfig, SessionSection, CONFIG_SCHEMA_VERSION,
    DEFAULT_API_URL, DEFAULT_MODEL,
};

use parley_common::ConfigError;
use std::path::Path;

/// Load, override and validate the config.
///
/// Reads `path` (or the platform default, creating it if missing), then
/// applies environment overrides followed by `cli` overrides, and finally
/// validates the merged result.
pub fn load_config(path: Option<&Path>, cli: ConfigOverrides) -> Result<ParleyConfig, ConfigError> {
    let mut config = match path {
        Some(path) => toml_loader::load_from_path(path)?,
        None => toml_loader::load_default()?,
    };

    ConfigOverrides::from_env()?.merge(cli).apply(&mut config);

    validation::validate(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_schema_version_is_1() {
        assert_eq!(CONFIG_SCHEMA_VERSION, 1);
    }

    #[test]
    fn load_config_applies_cli_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[session]\ntoken = \"file-token\"\ntimeout = 20\n").unwrap();

        let cli = ConfigOverrides {
            timeout: Some(45),
            ..Default::default()
        };
        let config = load_config(Some(&path), cli).unwrap();
        assert_eq!(config.session.timeout, 45);
    }

    #[test]
    fn load_config_rejects_invalid_result() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[session]\ntoken = \"t\"\napi_url = \"nope\"\n").unwrap();

        let err = load_config(Some(&path), ConfigOverrides::default()).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn load_config_missing_explicit_path_is_not_found() {
        let err = load_config(
            Some(Path::new("/tmp/parley-does-not-exist/config.toml")),
            ConfigOverrides::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }
}
