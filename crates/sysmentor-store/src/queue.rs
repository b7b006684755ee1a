// SPDX-FileCopyrightText: 2026 SysMentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistent outbound message queue.
//!
//! Messages that could not be delivered are parked here until a later drain
//! succeeds. The queue is the reason a reload does not lose pending messages,
//! so it persists on every mutation. All operations are best-effort and never
//! surface storage problems to the caller: a corrupt or missing backing value
//! reads as an empty queue, and a failed enqueue write yields the
//! empty-string sentinel id.

use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use sysmentor_core::{
    Clock, KeyValueStore, Matricula, MessageId, QueuedMessage, SessionId, SysmentorError,
};

/// Key under which the queue is persisted as a JSON array.
pub const QUEUE_STORAGE_KEY: &str = "sysmentor.message_queue";

/// Durable FIFO queue of outbound messages awaiting delivery.
pub struct MessageQueue {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl MessageQueue {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Appends a message and returns its generated id.
    ///
    /// Always succeeds from the caller's perspective: if the backing write
    /// fails the sentinel [`MessageId::empty`] is returned instead of an
    /// error, and the failure is logged.
    pub fn enqueue(
        &self,
        session_id: &SessionId,
        message: &str,
        matricula: Option<&Matricula>,
    ) -> MessageId {
        let id = MessageId(format!("queued-{}", Uuid::new_v4()));
        let entry = QueuedMessage {
            id: id.clone(),
            session_id: session_id.clone(),
            message: message.to_string(),
            matricula: matricula.cloned(),
            enqueued_at: self.clock.now_millis(),
            attempts: 0,
        };

        let mut queue = self.load();
        queue.push(entry);

        match self.persist(&queue) {
            Ok(()) => id,
            Err(e) => {
                warn!(error = %e, "failed to persist enqueued message, returning sentinel id");
                MessageId::empty()
            }
        }
    }

    /// Removes the message with the given id, if present.
    pub fn dequeue(&self, id: &MessageId) {
        let mut queue = self.load();
        queue.retain(|m| &m.id != id);
        if let Err(e) = self.persist(&queue) {
            warn!(error = %e, id = %id.0, "failed to persist queue after dequeue");
        }
    }

    /// Increments the attempt counter of the message with the given id.
    pub fn update_attempts(&self, id: &MessageId) {
        let mut queue = self.load();
        for entry in queue.iter_mut() {
            if &entry.id == id {
                entry.attempts += 1;
            }
        }
        if let Err(e) = self.persist(&queue) {
            warn!(error = %e, id = %id.0, "failed to persist queue after attempt update");
        }
    }

    /// Returns all queued messages in insertion order.
    pub fn list_all(&self) -> Vec<QueuedMessage> {
        self.load()
    }

    /// Number of messages currently queued.
    pub fn len(&self) -> usize {
        self.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.load().is_empty()
    }

    /// Drops every queued message.
    pub fn clear(&self) {
        if let Err(e) = self.store.remove(QUEUE_STORAGE_KEY) {
            warn!(error = %e, "failed to clear message queue");
        }
    }

    /// Replaces the whole persisted queue with `entries`.
    ///
    /// Used by the queue processor to write back the remainder of a drain
    /// pass in one store operation.
    pub fn replace_all(&self, entries: &[QueuedMessage]) {
        if let Err(e) = self.persist(entries) {
            warn!(error = %e, "failed to persist queue after drain");
        }
    }

    /// Loads the persisted queue, treating missing or corrupt data as empty.
    fn load(&self) -> Vec<QueuedMessage> {
        match self.store.get(QUEUE_STORAGE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<QueuedMessage>>(&raw) {
                Ok(queue) => queue,
                Err(e) => {
                    warn!(error = %e, "corrupt message queue in store, treating as empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "failed to read message queue, treating as empty");
                Vec::new()
            }
        }
    }

    fn persist(&self, queue: &[QueuedMessage]) -> Result<(), SysmentorError> {
        let raw = serde_json::to_string(queue).map_err(SysmentorError::storage)?;
        self.store.set(QUEUE_STORAGE_KEY, &raw)
    }
}
