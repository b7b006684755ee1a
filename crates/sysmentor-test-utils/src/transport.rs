// SPDX-FileCopyrightText: 2026 SysMentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted transport for queue-drain tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use sysmentor_core::{ChatbotResponse, QueuedMessage, SysmentorError, Transport};

/// A [`Transport`] that pops pre-scripted outcomes from a FIFO queue.
///
/// When the script is exhausted, the configured default outcome applies.
/// Every delivered message is recorded for assertions.
pub struct MockTransport {
    script: Mutex<VecDeque<Result<(), String>>>,
    default_ok: bool,
    delivered: Mutex<Vec<QueuedMessage>>,
}

impl MockTransport {
    /// Transport that succeeds for every delivery.
    pub fn always_ok() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            default_ok: true,
            delivered: Mutex::new(Vec::new()),
        }
    }

    /// Transport that fails every delivery.
    pub fn always_err() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            default_ok: false,
            delivered: Mutex::new(Vec::new()),
        }
    }

    /// Transport that plays the given outcomes in order, then succeeds.
    pub fn with_script(outcomes: Vec<Result<(), String>>) -> Self {
        Self {
            script: Mutex::new(VecDeque::from(outcomes)),
            default_ok: true,
            delivered: Mutex::new(Vec::new()),
        }
    }

    /// Messages that reached the transport, in order.
    pub fn delivered(&self) -> Vec<QueuedMessage> {
        self.delivered
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn next_outcome(&self) -> Result<(), String> {
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or(if self.default_ok {
                Ok(())
            } else {
                Err("scripted failure".to_string())
            })
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn deliver(&self, msg: &QueuedMessage) -> Result<ChatbotResponse, SysmentorError> {
        self.delivered
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(msg.clone());

        match self.next_outcome() {
            Ok(()) => Ok(ChatbotResponse {
                respuesta: format!("eco: {}", msg.message),
                session_id: msg.session_id.0.clone(),
                fecha: "2026-01-15T12:00:00Z".to_string(),
            }),
            Err(reason) => Err(SysmentorError::transport(reason)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sysmentor_core::{Matricula, MessageId, SessionId};

    fn msg(n: u32) -> QueuedMessage {
        QueuedMessage {
            id: MessageId(format!("queued-{n}")),
            session_id: SessionId("s1".into()),
            message: format!("mensaje {n}"),
            matricula: Some(Matricula("20230001".into())),
            enqueued_at: 0,
            attempts: 0,
        }
    }

    #[tokio::test]
    async fn script_plays_in_order_then_defaults() {
        let transport =
            MockTransport::with_script(vec![Err("down".into()), Ok(())]);

        assert!(transport.deliver(&msg(1)).await.is_err());
        assert!(transport.deliver(&msg(2)).await.is_ok());
        // Script exhausted, defaults to success.
        assert!(transport.deliver(&msg(3)).await.is_ok());
        assert_eq!(transport.delivered().len(), 3);
    }

    #[tokio::test]
    async fn always_err_never_delivers() {
        let transport = MockTransport::always_err();
        assert!(transport.deliver(&msg(1)).await.is_err());
        assert!(transport.deliver(&msg(2)).await.is_err());
    }
}
