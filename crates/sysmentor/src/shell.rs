// SPDX-FileCopyrightText: 2026 SysMentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `sysmentor shell` command implementation.
//!
//! Launches an interactive REPL with a colored prompt and readline history.
//! Assistant replies animate into the terminal through the typewriter while
//! the prompt stays responsive, so `/pause`, `/resume` and `/cancel` act on
//! the reply currently being typed out.

use std::io::Write;
use std::sync::{Arc, Mutex};

use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::task::JoinHandle;
use tracing::debug;

use sysmentor_config::SysmentorConfig;
use sysmentor_core::{MessageId, SysmentorError};
use sysmentor_render::RenderSink;

use crate::app::App;

/// Prints each newly revealed suffix of the active reply to stdout.
struct TerminalPrinter {
    printed: Mutex<(Option<MessageId>, usize)>,
}

impl TerminalPrinter {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            printed: Mutex::new((None, 0)),
        })
    }
}

impl RenderSink for TerminalPrinter {
    fn publish(&self, message_id: &MessageId, prefix: &str) {
        let mut printed = self.printed.lock().unwrap_or_else(|e| e.into_inner());
        if printed.0.as_ref() != Some(message_id) {
            *printed = (Some(message_id.clone()), 0);
        }
        let chars: Vec<char> = prefix.chars().collect();
        if chars.len() > printed.1 {
            let suffix: String = chars[printed.1..].iter().collect();
            print!("{suffix}");
            let _ = std::io::stdout().flush();
            printed.1 = chars.len();
        }
    }
}

/// Runs the `sysmentor shell` interactive REPL.
pub async fn run_shell(
    config: SysmentorConfig,
    matricula: Option<String>,
) -> Result<(), SysmentorError> {
    let typing_enabled = config.typing.enabled;
    let app = App::build(config, matricula)?;
    app.service.set_render_observer(TerminalPrinter::new());

    let mut rl = DefaultEditor::new()
        .map_err(|e| SysmentorError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", "sysmentor shell".bold().green());
    println!(
        "Type a message, or {} {} {} {} {} — {} to exit.\n",
        "/pause".yellow(),
        "/resume".yellow(),
        "/cancel".yellow(),
        "/pending".yellow(),
        "/clear".yellow(),
        "/quit".yellow()
    );
    let pending = app.service.pending_count();
    if pending > 0 {
        println!(
            "{}",
            format!("{pending} message(s) pending delivery from earlier sessions").dimmed()
        );
    }

    let prompt = format!("{}> ", "sysmentor".green());
    let mut render_task: Option<JoinHandle<()>> = None;

    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                match trimmed {
                    "/quit" | "/exit" => break,
                    "/pause" => {
                        app.service.pause_rendering();
                        continue;
                    }
                    "/resume" => {
                        app.service.resume_rendering();
                        continue;
                    }
                    "/cancel" => {
                        app.service.cancel_rendering();
                        continue;
                    }
                    "/pending" => {
                        println!("{} message(s) pending delivery", app.service.pending_count());
                        continue;
                    }
                    "/clear" => {
                        app.service.clear_conversation();
                        println!("{}", "conversation cleared".dimmed());
                        continue;
                    }
                    _ => {}
                }

                // Finish (or force-finish) the previous reply before starting
                // a new turn, so two animations never share the terminal.
                if let Some(task) = render_task.take() {
                    app.service.cancel_rendering();
                    let _ = task.await;
                    println!();
                }

                let turn = app.service.send_message(trimmed).await;
                if !turn.outcome.delivered {
                    debug!("message stored for later delivery");
                }
                if let Some(report) = turn.drain
                    && report.success > 0
                {
                    println!(
                        "{}",
                        format!("delivered {} queued message(s)", report.success).dimmed()
                    );
                }

                if typing_enabled {
                    let typewriter = turn.typewriter.clone();
                    render_task = Some(tokio::spawn(async move {
                        typewriter.run().await;
                        println!();
                    }));
                } else {
                    // Animation disabled: reveal everything at once.
                    turn.typewriter.cancel();
                    println!();
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    if let Some(task) = render_task.take() {
        app.service.cancel_rendering();
        let _ = task.await;
    }

    let pending = app.service.pending_count();
    if pending > 0 {
        println!(
            "{}",
            format!("{pending} message(s) will be delivered on the next connected session")
                .dimmed()
        );
    }
    println!("{}", "goodbye".dimmed());
    Ok(())
}
