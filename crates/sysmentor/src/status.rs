// SPDX-FileCopyrightText: 2026 SysMentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `sysmentor status` command implementation.
//!
//! Shows the effective configuration and the state of the durable message
//! queue, without touching the network.

use colored::Colorize;
use serde::Serialize;

use sysmentor_config::SysmentorConfig;
use sysmentor_core::SysmentorError;

use crate::app::App;

/// Structured status output for `--json` mode.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub backend_url: String,
    pub data_dir: String,
    pub pending_messages: usize,
    pub max_retries: u32,
    pub typing_enabled: bool,
    pub typing_speed: usize,
}

/// Run the `sysmentor status` command.
pub async fn run_status(config: SysmentorConfig, json: bool) -> Result<(), SysmentorError> {
    let app = App::build(config, None)?;
    let status = StatusResponse {
        backend_url: app.config.api.base_url.clone(),
        data_dir: app.config.storage.data_dir.display().to_string(),
        pending_messages: app.queue.len(),
        max_retries: app.config.api.max_retries,
        typing_enabled: app.config.typing.enabled,
        typing_speed: app.config.typing.speed,
    };

    if json {
        let rendered = serde_json::to_string_pretty(&status)
            .map_err(|e| SysmentorError::Internal(format!("failed to render status: {e}")))?;
        println!("{rendered}");
        return Ok(());
    }

    println!("{}", "sysmentor status".bold());
    println!("  backend:  {}", status.backend_url);
    println!("  data dir: {}", status.data_dir);
    if status.pending_messages > 0 {
        println!(
            "  pending:  {}",
            format!("{} message(s) awaiting delivery", status.pending_messages).yellow()
        );
    } else {
        println!("  pending:  {}", "none".dimmed());
    }
    println!(
        "  typing:   {} (speed {})",
        if status.typing_enabled { "enabled" } else { "disabled" },
        status.typing_speed
    );
    Ok(())
}
