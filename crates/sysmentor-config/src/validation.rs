// SPDX-FileCopyrightText: 2026 SysMentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, collecting every failure rather than stopping at the first.

use crate::diagnostic::ConfigError;
use crate::model::SysmentorConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &SysmentorConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let base_url = config.api.base_url.trim();
    if base_url.is_empty() {
        errors.push(ConfigError::Validation {
            message: "api.base_url must not be empty".to_string(),
        });
    } else if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        errors.push(ConfigError::Validation {
            message: format!("api.base_url `{base_url}` must start with http:// or https://"),
        });
    } else if base_url.ends_with('/') {
        errors.push(ConfigError::Validation {
            message: "api.base_url must not end with `/` (endpoint paths are appended)"
                .to_string(),
        });
    }

    if config.api.max_retries < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "api.max_retries must be at least 1, got {}",
                config.api.max_retries
            ),
        });
    }

    if config.api.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "api.timeout_secs must be greater than 0".to_string(),
        });
    }

    // The animation reveals at least 2 characters per step, so a smaller
    // speed would make the configured bound meaningless.
    if config.typing.speed < 2 {
        errors.push(ConfigError::Validation {
            message: format!("typing.speed must be at least 2, got {}", config.typing.speed),
        });
    }

    if config.storage.data_dir.as_os_str().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.data_dir must not be empty".to_string(),
        });
    }

    const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
    if !LOG_LEVELS.contains(&config.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "log_level must be one of trace, debug, info, warn, error; got `{}`",
                config.log_level
            ),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&SysmentorConfig::default()).is_ok());
    }

    #[test]
    fn all_failures_are_collected() {
        let mut config = SysmentorConfig::default();
        config.api.base_url = "api-sysmentor.onrender.com".to_string();
        config.api.max_retries = 0;
        config.typing.speed = 1;
        config.log_level = "verbose".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn trailing_slash_in_base_url_is_rejected() {
        let mut config = SysmentorConfig::default();
        config.api.base_url = "https://api-sysmentor.onrender.com/".to_string();
        assert!(validate_config(&config).is_err());
    }
}
