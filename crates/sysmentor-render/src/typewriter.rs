// SPDX-FileCopyrightText: 2026 SysMentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Async driver for a [`RenderSession`].
//!
//! [`Typewriter::run`] advances the session one step at a time, publishing
//! each revealed prefix to a [`RenderSink`] and sleeping through an injected
//! [`Scheduler`] between steps. Each step schedules the next only after
//! completing, so reveals within one message are strictly sequential.
//! `pause`, `resume` and `cancel` are callable from other tasks and take
//! effect before the next step fires, never mid-step.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::Notify;
use tracing::debug;

use sysmentor_core::MessageId;

use crate::scheduler::Scheduler;
use crate::session::{RenderSession, RenderState};

/// Receives revealed prefixes. Implemented by whatever owns the conversation
/// view (the chat service, a terminal printer).
///
/// `publish` is invoked while the typewriter's internal session lock is held,
/// so implementations must not call back into the same typewriter.
pub trait RenderSink: Send + Sync {
    fn publish(&self, message_id: &MessageId, prefix: &str);
}

/// Drives one message's typing animation.
pub struct Typewriter {
    session: Mutex<RenderSession>,
    sink: Arc<dyn RenderSink>,
    scheduler: Arc<dyn Scheduler>,
    resumed: Notify,
}

impl Typewriter {
    pub fn new(
        session: RenderSession,
        sink: Arc<dyn RenderSink>,
        scheduler: Arc<dyn Scheduler>,
    ) -> Self {
        Self {
            session: Mutex::new(session),
            sink,
            scheduler,
            resumed: Notify::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RenderSession> {
        self.session.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn state(&self) -> RenderState {
        self.lock().state()
    }

    /// The prefix revealed so far.
    pub fn prefix(&self) -> String {
        self.lock().prefix()
    }

    /// Runs the animation to completion. Returns immediately when the session
    /// already completed (re-triggering a finished message is a no-op).
    pub async fn run(&self) {
        if !self.lock().start() {
            return;
        }

        loop {
            // Park while paused. The notified future is created before the
            // state check so a resume between check and await is never lost.
            loop {
                let resumed = self.resumed.notified();
                // Copy the state out so the session lock is released before
                // awaiting; `resume` and `cancel` need it to wake us.
                let state = self.lock().state();
                match state {
                    RenderState::Paused => resumed.await,
                    RenderState::Completed => return,
                    _ => break,
                }
            }

            // Step and publish under one lock so a concurrent cancel (which
            // publishes the full content) can never be overwritten by a
            // stale shorter prefix.
            let delay = {
                let mut session = self.lock();
                if session.state() == RenderState::Completed {
                    return;
                }
                let outcome = session.step(&mut rand::thread_rng());
                self.sink.publish(session.message_id(), &outcome.prefix);
                outcome.delay
            };

            match delay {
                Some(delay) => self.scheduler.sleep(delay).await,
                None => {
                    debug!("typing animation completed");
                    return;
                }
            }
        }
    }

    /// Suspends the animation before its next step.
    pub fn pause(&self) {
        self.lock().pause();
    }

    /// Continues a paused animation from the exact prior cursor.
    pub fn resume(&self) {
        self.lock().resume();
        self.resumed.notify_waiters();
    }

    /// Force-reveals the full content synchronously and completes the
    /// session. Any scheduled reveal step observes completion and is
    /// suppressed. Idempotent.
    pub fn cancel(&self) {
        {
            let mut session = self.lock();
            if session.is_completed() {
                return;
            }
            session.cancel();
            self.sink.publish(session.message_id(), &session.prefix());
        }
        // Wake a run() parked on pause so it can observe completion and exit.
        self.resumed.notify_waiters();
    }
}
