// SPDX-FileCopyrightText: 2026 SysMentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `sysmentor queue` command implementation.
//!
//! Inspects the durable outbound queue and runs manual drain passes, for the
//! times a user does not want to wait for the next successful send to
//! piggyback a drain.

use clap::Subcommand;
use colored::Colorize;

use sysmentor_client::QueueProcessor;
use sysmentor_config::SysmentorConfig;
use sysmentor_core::SysmentorError;

use crate::app::App;

#[derive(Subcommand, Debug)]
pub enum QueueCommands {
    /// List messages awaiting delivery.
    List,
    /// Run one bounded drain pass against the backend.
    Drain,
}

/// Run the `sysmentor queue` subcommands.
pub async fn run_queue(
    config: SysmentorConfig,
    command: QueueCommands,
) -> Result<(), SysmentorError> {
    let app = App::build(config, None)?;

    match command {
        QueueCommands::List => {
            let entries = app.queue.list_all();
            if entries.is_empty() {
                println!("{}", "queue is empty".dimmed());
                return Ok(());
            }
            println!("{} message(s) pending delivery:", entries.len());
            for entry in entries {
                println!(
                    "  {}  attempts={}  {}",
                    entry.id.0.dimmed(),
                    entry.attempts,
                    truncate(&entry.message, 60)
                );
            }
        }
        QueueCommands::Drain => {
            let processor = QueueProcessor::new(app.queue.clone());
            let report = processor.drain(app.client.as_ref()).await;
            println!(
                "drain: {} delivered, {} failed, {} remaining",
                report.success.to_string().green(),
                report.failed.to_string().red(),
                report.remaining
            );
        }
    }
    Ok(())
}

fn truncate(text: &str, max_chars: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_chars {
        text.to_string()
    } else {
        format!("{}…", chars[..max_chars].iter().collect::<String>())
    }
}
