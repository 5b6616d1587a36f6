//! Configuration validation.
//!
//! Checks credentials, URLs, ranges and the logging level, collecting
//! every problem into a single `ConfigError`.

mod helpers;


use crate::schema::ParleyConfig;
use parley_common::ConfigError;

use helpers::{validate_non_empty, validate_range, validate_scheme};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
const PROXY_SCHEMES: &[&str] = &["http://", "https://", "socks5://", "socks5h://"];

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &ParleyConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_non_empty(&mut errors, "session.token", &config.session.token);
    validate_scheme(
        &mut errors,
        "session.api_url",
        &config.session.api_url,
        &["http://", "https://"],
    );
    if let Some(ref proxy) = config.session.proxy {
        validate_scheme(&mut errors, "session.proxy", proxy, PROXY_SCHEMES);
    }
    validate_range(&mut errors, "session.timeout", config.session.timeout, 1, 300);

    validate_non_empty(&mut errors, "chat.model", &config.chat.model);

    let level = config.logging.level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(format!(
            "logging.level = {:?} must be one of: {}",
            config.logging.level,
            LOG_LEVELS.join(", ")
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
