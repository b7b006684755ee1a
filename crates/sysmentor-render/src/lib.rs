// SPDX-FileCopyrightText: 2026 SysMentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Incremental typing renderer.
//!
//! Simulates live generation of a completed assistant response: characters
//! are revealed in pseudo-random runs with randomized inter-step delays, and
//! the animation can be paused, resumed, or cancelled (cancel reveals
//! everything at once). [`RenderSession`] is the synchronous state machine;
//! [`Typewriter`] drives it on the tokio runtime.

pub mod scheduler;
pub mod session;
pub mod typewriter;

pub use scheduler::{ManualScheduler, Scheduler, TokioScheduler};
pub use session::{RenderSession, RenderState, StepOutcome};
pub use typewriter::{RenderSink, Typewriter};
