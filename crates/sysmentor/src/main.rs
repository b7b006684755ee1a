// SPDX-FileCopyrightText: 2026 SysMentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SysMentor - offline-tolerant terminal client for the academic assistant.
//!
//! This is the binary entry point for the SysMentor CLI.

mod app;
mod queue;
mod shell;
mod status;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

/// SysMentor - offline-tolerant terminal client for the academic assistant.
#[derive(Parser, Debug)]
#[command(name = "sysmentor", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Launch an interactive chat session.
    Shell {
        /// Student matricula attached to outbound messages.
        #[arg(long)]
        matricula: Option<String>,
    },
    /// Show configuration and pending-queue state.
    Status {
        /// Output structured JSON for scripting.
        #[arg(long)]
        json: bool,
    },
    /// Inspect and drain the pending message queue.
    Queue {
        #[command(subcommand)]
        command: queue::QueueCommands,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match sysmentor_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            sysmentor_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Some(Commands::Shell { matricula }) => shell::run_shell(config, matricula).await,
        Some(Commands::Status { json }) => status::run_status(config, json).await,
        Some(Commands::Queue { command }) => queue::run_queue(config, command).await,
        None => {
            println!("sysmentor: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {e}", "error".red());
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn binary_loads_config_defaults() {
        // Verify config loads with defaults (no config file needed).
        let config = sysmentor_config::load_config_from_str("").expect("defaults should parse");
        assert_eq!(config.api.max_retries, 3);
    }
}
