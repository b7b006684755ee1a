// SPDX-FileCopyrightText: 2026 SysMentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery seam between the queue processor and the network client.

use async_trait::async_trait;

use crate::error::SysmentorError;
use crate::types::{ChatbotResponse, QueuedMessage};

/// Raw delivery of a single queued message to the chat backend.
///
/// Implementations perform the network call (with whatever retry policy they
/// own) and report failure; they never enqueue or synthesize fallbacks. The
/// queue processor drains through this trait so drains stay testable without
/// a network.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Attempts to deliver one queued message.
    async fn deliver(&self, msg: &QueuedMessage) -> Result<ChatbotResponse, SysmentorError>;
}
