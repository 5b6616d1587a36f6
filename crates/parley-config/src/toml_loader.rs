//! TOML config file loading and creation.

use crate::schema::ParleyConfig;
use parley_common::ConfigError;
use std::path::{Path, PathBuf};
use tracing::info;

/// Load config from a specific TOML file path.
///
/// Missing fields fall back to serde defaults. No validation happens here
/// because the session token is commonly supplied later by an override.
pub fn load_from_path(path: &Path) -> Result<ParleyConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        ConfigError::ParseError(format!("failed to read {}: {e}", path.display()))
    })?;

    let config: ParleyConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load config from the platform-specific default path.
///
/// On macOS: `~/Library/Application Support/parley/config.toml`
/// On Linux: `~/.config/parley/config.toml`
///
/// If the file does not exist, creates a commented default file and returns defaults.
pub fn load_default() -> Result<ParleyConfig, ConfigError> {
    let path = default_config_path()?;
    load_or_create(&path)
}

/// Load `path`, writing the default template there first if it is missing.
pub fn load_or_create(path: &Path) -> Result<ParleyConfig, ConfigError> {
    if !path.exists() {
        info!("no config found at {}, creating default", path.display());
        create_default_config(path)?;
        return Ok(ParleyConfig::default());
    }

    load_from_path(path)
}

/// Get the platform-specific default config file path.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir().ok_or_else(|| {
        ConfigError::ParseError("could not determine config directory".into())
    })?;
    Ok(config_dir.join("parley").join("config.toml"))
}

/// Create a default TOML config file with documentation comments.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ConfigError::ParseError(format!(
                "failed to create config directory {}: {e}",
                parent.display()
            ))
        })?;
    }

    std::fs::write(path, default_config_toml()).map_err(|e| {
        ConfigError::ParseError(format!(
            "failed to write default config to {}: {e}",
            path.display()
        ))
    })?;

    info!("created default config at {}", path.display());
    Ok(())
}

/// Generate the default TOML config content with comments.
fn default_config_toml() -> &'static str {
    r##"# parley configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[session]
# Value of the __Secure-next-auth.session-token cookie from a logged-in browser.
# Can also be supplied via PARLEY_SESSION_TOKEN.
token = ""
# api_url = "https://chat.openai.com/"
# proxy = "http://127.0.0.1:7890"   # http, https, socks5 or socks5h
# timeout = 10                      # seconds, 1-300

[chat]
# model = "text-davinci-002-render"
# parse_error_bodies = false        # keep parsing non-429 error responses
# reauth_on_unauthorized = true     # refresh the access token once on HTTP 401

[logging]
# level = "info"                    # trace, debug, info, warn, error
"##
}
