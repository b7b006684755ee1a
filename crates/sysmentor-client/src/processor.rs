// SPDX-FileCopyrightText: 2026 SysMentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded FIFO drain of the persistent message queue.
//!
//! A drain pass processes at most [`MAX_MESSAGES_PER_DRAIN`] of the oldest
//! entries and writes the remainder back in one store operation. Passes are
//! serialized by an internal mutex so two piggybacked drains can never
//! interleave their read-modify-write cycles (which would double-send
//! messages or lose attempt increments).

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use sysmentor_core::{QueuedMessage, Transport};
use sysmentor_store::MessageQueue;

/// Upper bound of messages processed per drain pass.
pub const MAX_MESSAGES_PER_DRAIN: usize = 5;

/// Attempt ceiling; a message incremented past this is discarded.
pub const MAX_DELIVERY_ATTEMPTS: u32 = 5;

/// Outcome of one drain pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrainReport {
    /// Messages delivered and removed from the queue.
    pub success: usize,
    /// Messages that failed this pass (re-queued) or were discarded for
    /// exceeding the attempt ceiling.
    pub failed: usize,
    /// Messages still queued after the pass.
    pub remaining: usize,
}

/// Drains the persistent queue through an injected [`Transport`].
pub struct QueueProcessor {
    queue: Arc<MessageQueue>,
    drain_lock: Mutex<()>,
}

impl QueueProcessor {
    pub fn new(queue: Arc<MessageQueue>) -> Self {
        Self {
            queue,
            drain_lock: Mutex::new(()),
        }
    }

    /// Runs one bounded drain pass.
    ///
    /// Reads the whole queue, takes the oldest `MAX_MESSAGES_PER_DRAIN`
    /// entries as the working slice, and leaves the rest untouched. Each
    /// working entry has its attempt counter incremented before delivery;
    /// entries past the ceiling are discarded, failed deliveries are
    /// re-appended for the next pass. The resulting queue state is persisted
    /// once at the end of the pass.
    ///
    /// The internal lock serializes drain passes only. An enqueue issued
    /// between the read and the final write-back would be overwritten by it,
    /// so callers must not enqueue onto the same queue while a pass is in
    /// flight (the chat service awaits each drain inside the send path, which
    /// keeps the two naturally ordered).
    pub async fn drain(&self, transport: &dyn Transport) -> DrainReport {
        let _guard = self.drain_lock.lock().await;

        let queue = self.queue.list_all();
        if queue.is_empty() {
            return DrainReport::default();
        }

        let split = queue.len().min(MAX_MESSAGES_PER_DRAIN);
        let (working, untouched) = queue.split_at(split);
        let mut remainder: Vec<QueuedMessage> = untouched.to_vec();

        let mut success = 0;
        let mut failed = 0;

        for entry in working {
            let mut entry = entry.clone();
            entry.attempts += 1;

            if entry.attempts > MAX_DELIVERY_ATTEMPTS {
                warn!(id = %entry.id.0, attempts = entry.attempts, "message exceeded attempt ceiling, discarding");
                failed += 1;
                continue;
            }

            match transport.deliver(&entry).await {
                Ok(_) => {
                    debug!(id = %entry.id.0, "queued message delivered");
                    success += 1;
                }
                Err(e) => {
                    warn!(id = %entry.id.0, error = %e, "queued message delivery failed, re-queueing");
                    remainder.push(entry);
                    failed += 1;
                }
            }
        }

        self.queue.replace_all(&remainder);

        let report = DrainReport {
            success,
            failed,
            remaining: remainder.len(),
        };
        if report.success > 0 {
            info!(
                success = report.success,
                failed = report.failed,
                remaining = report.remaining,
                "drain pass delivered pending messages"
            );
        }
        report
    }
}
