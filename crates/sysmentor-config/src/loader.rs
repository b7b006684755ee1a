// SPDX-FileCopyrightText: 2026 SysMentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./sysmentor.toml` > `~/.config/sysmentor/sysmentor.toml`
//! > `/etc/sysmentor/sysmentor.toml` with environment variable overrides via
//! the `SYSMENTOR_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::SysmentorConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/sysmentor/sysmentor.toml` (system-wide)
/// 3. `~/.config/sysmentor/sysmentor.toml` (user XDG config)
/// 4. `./sysmentor.toml` (local directory)
/// 5. `SYSMENTOR_*` environment variables
pub fn load_config() -> Result<SysmentorConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SysmentorConfig::default()))
        .merge(Toml::file("/etc/sysmentor/sysmentor.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("sysmentor/sysmentor.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("sysmentor.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit config injection.
pub fn load_config_from_str(toml_content: &str) -> Result<SysmentorConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SysmentorConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<SysmentorConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SysmentorConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `SYSMENTOR_API_RETRY_DELAY_MS` must map
/// to `api.retry_delay_ms`, not `api.retry.delay.ms`. `log_level` lives at
/// the top level and needs no mapping.
fn env_provider() -> Env {
    Env::prefixed("SYSMENTOR_").map(|key| {
        // Keys arrive with the prefix stripped but in their original upper
        // case; lowercase first so the section prefixes match.
        let key_str = key.as_str().to_lowercase();
        let mapped = key_str
            .replacen("api_", "api.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("typing_", "typing.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.api.base_url, "https://api-sysmentor.onrender.com");
        assert_eq!(config.typing.speed, 5);
    }

    #[test]
    fn toml_sections_override_defaults() {
        let config = load_config_from_str(
            r#"
            log_level = "debug"

            [api]
            base_url = "http://localhost:8000"
            max_retries = 5

            [typing]
            speed = 8
            enabled = false
            "#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.api.max_retries, 5);
        // Untouched keys keep their defaults.
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.typing.speed, 8);
        assert!(!config.typing.enabled);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = load_config_from_str(
            r#"
            [api]
            base_uri = "http://localhost:8000"
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("base_uri"));
    }

    #[test]
    fn env_vars_override_files() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "sysmentor.toml",
                r#"
                [api]
                max_retries = 2
                "#,
            )?;
            jail.set_env("SYSMENTOR_API_MAX_RETRIES", "7");
            jail.set_env("SYSMENTOR_API_RETRY_DELAY_MS", "250");
            jail.set_env("SYSMENTOR_LOG_LEVEL", "trace");

            let config = load_config().expect("config should load");
            assert_eq!(config.api.max_retries, 7);
            assert_eq!(config.api.retry_delay_ms, 250);
            assert_eq!(config.log_level, "trace");
            Ok(())
        });
    }
}
