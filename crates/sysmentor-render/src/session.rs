// SPDX-FileCopyrightText: 2026 SysMentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-message render state machine.
//!
//! A [`RenderSession`] owns the immutable full content of one assistant
//! message and a cursor into it. Each [`step`](RenderSession::step) reveals a
//! pseudo-random run of characters and picks a randomized inter-step delay,
//! with a longer pause after sentence or clause punctuation. The content is
//! held as `Vec<char>` so accented Spanish text never splits mid-codepoint.

use std::time::Duration;

use rand::Rng;

use sysmentor_core::MessageId;

/// Characters that earn a longer pause before the next reveal step.
const PAUSE_PUNCTUATION: &[char] = &['.', ',', '!', '?', ';', ':'];

/// Inter-step delay after an ordinary character, in milliseconds.
const BASE_DELAY_MS: std::ops::RangeInclusive<u64> = 20..=40;

/// Inter-step delay after pause punctuation, in milliseconds.
const PUNCTUATION_DELAY_MS: std::ops::RangeInclusive<u64> = 20..=120;

/// Lifecycle of one message's render session.
///
/// `Completed` is terminal; a new message gets a fresh session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    Idle,
    Running,
    Paused,
    Completed,
}

/// Result of one reveal step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    /// The revealed prefix after this step.
    pub prefix: String,
    /// Delay before the next step, or `None` when the session completed.
    pub delay: Option<Duration>,
}

/// Animation state for a single assistant message.
#[derive(Debug)]
pub struct RenderSession {
    message_id: MessageId,
    content: Vec<char>,
    cursor: usize,
    state: RenderState,
    typing_speed: usize,
}

impl RenderSession {
    pub fn new(message_id: MessageId, content: &str, typing_speed: usize) -> Self {
        Self {
            message_id,
            content: content.chars().collect(),
            cursor: 0,
            state: RenderState::Idle,
            typing_speed: typing_speed.max(1),
        }
    }

    pub fn message_id(&self) -> &MessageId {
        &self.message_id
    }

    pub fn state(&self) -> RenderState {
        self.state
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The currently revealed prefix.
    pub fn prefix(&self) -> String {
        self.content[..self.cursor].iter().collect()
    }

    pub fn is_completed(&self) -> bool {
        self.state == RenderState::Completed
    }

    /// Begins the animation. Returns `false` (and stays put) when the session
    /// already completed, so re-triggering a finished message never
    /// re-animates it.
    pub fn start(&mut self) -> bool {
        match self.state {
            RenderState::Idle => {
                self.state = RenderState::Running;
                true
            }
            RenderState::Completed => false,
            // Already started; nothing to do.
            RenderState::Running | RenderState::Paused => true,
        }
    }

    /// Reveals the next run of characters and picks the delay before the
    /// following step.
    ///
    /// Only advances while `Running`; in any other state this returns the
    /// current prefix with no delay. The cursor is clamped to the content
    /// length, and reaching the end transitions to `Completed`.
    pub fn step<R: Rng>(&mut self, rng: &mut R) -> StepOutcome {
        if self.state != RenderState::Running {
            return StepOutcome {
                prefix: self.prefix(),
                delay: None,
            };
        }

        let chunk = rng.gen_range(0..self.typing_speed).max(2);
        self.cursor = (self.cursor + chunk).min(self.content.len());

        if self.cursor == self.content.len() {
            self.state = RenderState::Completed;
            return StepOutcome {
                prefix: self.prefix(),
                delay: None,
            };
        }

        let after_punctuation = self
            .cursor
            .checked_sub(1)
            .map(|i| PAUSE_PUNCTUATION.contains(&self.content[i]))
            .unwrap_or(false);
        let delay_ms = if after_punctuation {
            rng.gen_range(PUNCTUATION_DELAY_MS)
        } else {
            rng.gen_range(BASE_DELAY_MS)
        };

        StepOutcome {
            prefix: self.prefix(),
            delay: Some(Duration::from_millis(delay_ms)),
        }
    }

    /// Suspends the animation. Takes effect before the next step; a step
    /// already produced is never rolled back.
    pub fn pause(&mut self) {
        if self.state == RenderState::Running {
            self.state = RenderState::Paused;
        }
    }

    /// Continues a paused animation from the exact prior cursor.
    pub fn resume(&mut self) {
        if self.state == RenderState::Paused {
            self.state = RenderState::Running;
        }
    }

    /// Force-reveals the full content and completes the session. Idempotent.
    pub fn cancel(&mut self) {
        if self.state == RenderState::Completed {
            return;
        }
        self.cursor = self.content.len();
        self.state = RenderState::Completed;
    }
}
