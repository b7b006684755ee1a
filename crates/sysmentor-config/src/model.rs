// SPDX-FileCopyrightText: 2026 SysMentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the SysMentor client.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level SysMentor configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SysmentorConfig {
    /// Chat backend API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Durable storage settings (message queue, response cache).
    #[serde(default)]
    pub storage: StorageConfig,

    /// Typing-animation settings.
    #[serde(default)]
    pub typing: TypingConfig,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for SysmentorConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            storage: StorageConfig::default(),
            typing: TypingConfig::default(),
            log_level: default_log_level(),
        }
    }
}

/// Chat backend API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Base URL of the SysMentor backend.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request deadline in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Total delivery attempts per send (first try included).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Fixed pause between delivery attempts, in milliseconds.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Bearer token attached to backend requests. Issued by the backend;
    /// the client only stores and attaches it.
    #[serde(default)]
    pub token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            token: None,
        }
    }
}

/// Durable storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Directory holding the queue/cache store file.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Typing-animation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TypingConfig {
    /// Upper bound of characters revealed per animation step.
    #[serde(default = "default_typing_speed")]
    pub speed: usize,

    /// Disables the animation entirely (replies appear at once).
    #[serde(default = "default_typing_enabled")]
    pub enabled: bool,
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            speed: default_typing_speed(),
            enabled: default_typing_enabled(),
        }
    }
}

fn default_base_url() -> String {
    "https://api-sysmentor.onrender.com".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("sysmentor"))
        .unwrap_or_else(|| PathBuf::from(".sysmentor"))
}

fn default_typing_speed() -> usize {
    5
}

fn default_typing_enabled() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_policy() {
        let config = SysmentorConfig::default();
        assert_eq!(config.api.base_url, "https://api-sysmentor.onrender.com");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.api.max_retries, 3);
        assert_eq!(config.api.retry_delay_ms, 1000);
        assert_eq!(config.api.token, None);
        assert_eq!(config.typing.speed, 5);
        assert!(config.typing.enabled);
        assert_eq!(config.log_level, "info");
    }
}
