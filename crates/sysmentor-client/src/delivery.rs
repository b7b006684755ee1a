// SPDX-FileCopyrightText: 2026 SysMentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the SysMentor chat endpoint.
//!
//! Provides [`DeliveryClient`] which handles request construction, bearer
//! authentication, and transient error retry. `send` additionally owns the
//! offline path: connectivity pre-check, enqueue on exhaustion, and fallback
//! synthesis, so callers always get a usable [`ChatbotResponse`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use sysmentor_core::{
    ChatRequest, ChatbotResponse, Clock, ConnectivityProbe, Matricula, QueuedMessage, RequestKind,
    SessionId, SysmentorError, TokenProvider, Transport,
};
use sysmentor_store::MessageQueue;

use crate::fallback;

/// Path of the chat endpoint, relative to the API base URL.
pub const CHAT_ENDPOINT: &str = "/api/mensajes/mensajes-chatbot/conversar";

/// Retry and timeout policy for the delivery client.
#[derive(Debug, Clone)]
pub struct DeliveryPolicy {
    /// Total attempts per delivery (first try included).
    pub max_attempts: u32,
    /// Fixed pause between attempts (no exponential backoff).
    pub retry_delay: Duration,
    /// Per-request deadline.
    pub request_timeout: Duration,
}

impl Default for DeliveryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay: Duration::from_secs(1),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Result of a `send` call: the response shown to the user plus whether it
/// came from the backend (true) or a synthesized fallback (false).
///
/// Queue drains piggyback only on delivered sends.
#[derive(Debug, Clone)]
pub struct SendOutcome {
    pub response: ChatbotResponse,
    pub delivered: bool,
}

/// HTTP client for chat backend communication.
pub struct DeliveryClient {
    http: reqwest::Client,
    base_url: String,
    policy: DeliveryPolicy,
    queue: Arc<MessageQueue>,
    connectivity: Arc<dyn ConnectivityProbe>,
    tokens: Arc<dyn TokenProvider>,
    clock: Arc<dyn Clock>,
}

impl DeliveryClient {
    pub fn new(
        base_url: impl Into<String>,
        policy: DeliveryPolicy,
        queue: Arc<MessageQueue>,
        connectivity: Arc<dyn ConnectivityProbe>,
        tokens: Arc<dyn TokenProvider>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, SysmentorError> {
        let http = reqwest::Client::builder()
            .timeout(policy.request_timeout)
            .build()
            .map_err(|e| SysmentorError::Transport {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            policy,
            queue,
            connectivity,
            tokens,
            clock,
        })
    }

    /// Sends a chat message, never failing the caller.
    ///
    /// Offline (per the connectivity probe): the message is enqueued without
    /// a network attempt and the offline-saved fallback is returned. After
    /// exhausted retries: the message is enqueued, the exhausted round is
    /// recorded as one attempt, and the connection-trouble fallback is
    /// returned.
    pub async fn send(
        &self,
        session_id: &SessionId,
        message: &str,
        matricula: Option<&Matricula>,
        kind: RequestKind,
    ) -> SendOutcome {
        if !self.connectivity.is_online() {
            let id = self.queue.enqueue(session_id, message, matricula);
            info!(id = %id.0, "offline, message queued without a network attempt");
            return SendOutcome {
                response: fallback::offline_saved(kind, message, session_id, self.clock.now()),
                delivered: false,
            };
        }

        match self.attempt_delivery(session_id, message, matricula).await {
            Ok(response) => SendOutcome {
                response,
                delivered: true,
            },
            Err(e) => {
                warn!(error = %e, "all delivery attempts failed, queueing message");
                let id = self.queue.enqueue(session_id, message, matricula);
                if !id.is_empty() {
                    // The exhausted delivery round counts as one attempt.
                    self.queue.update_attempts(&id);
                }
                SendOutcome {
                    response: fallback::connection_trouble(
                        kind,
                        message,
                        session_id,
                        self.clock.now(),
                    ),
                    delivered: false,
                }
            }
        }
    }

    /// Runs the retry loop: up to `max_attempts` tries with a fixed pause in
    /// between. Connection failures, timeouts, 5xx responses, and
    /// non-conforming bodies are retryable; 4xx bodies are surfaced as
    /// completed responses.
    async fn attempt_delivery(
        &self,
        session_id: &SessionId,
        message: &str,
        matricula: Option<&Matricula>,
    ) -> Result<ChatbotResponse, SysmentorError> {
        let request = ChatRequest {
            mensaje: message.to_string(),
            session_id: session_id.0.clone(),
            matricula: matricula.map(|m| m.0.clone()),
        };
        let url = format!("{}{CHAT_ENDPOINT}", self.base_url);

        let mut last_error = SysmentorError::transport("no delivery attempt was made");

        for attempt in 1..=self.policy.max_attempts {
            if attempt > 1 {
                warn!(attempt, "retrying chat delivery after transient error");
                tokio::time::sleep(self.policy.retry_delay).await;
            }

            let mut req = self.http.post(&url).json(&request);
            if let Some(token) = self.tokens.bearer_token() {
                req = req.bearer_auth(token);
            }

            let response = match req.send().await {
                Ok(response) => response,
                Err(e) => {
                    last_error = if e.is_timeout() {
                        SysmentorError::Timeout {
                            duration: self.policy.request_timeout,
                        }
                    } else {
                        SysmentorError::Transport {
                            message: format!("HTTP request failed: {e}"),
                            source: Some(Box::new(e)),
                        }
                    };
                    continue;
                }
            };

            let status = response.status();
            debug!(status = %status, attempt, "chat response received");

            if status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                last_error =
                    SysmentorError::transport(format!("backend returned {status}: {body}"));
                continue;
            }

            // 2xx and 4xx both count as completed requests; only the body
            // shape decides whether we can hand something to the caller.
            match response.json::<ChatbotResponse>().await {
                Ok(parsed) => return Ok(parsed),
                Err(e) => {
                    last_error = SysmentorError::Transport {
                        message: format!("backend body did not match the chat shape: {e}"),
                        source: Some(Box::new(e)),
                    };
                    continue;
                }
            }
        }

        Err(last_error)
    }
}

#[async_trait]
impl Transport for DeliveryClient {
    async fn deliver(&self, msg: &QueuedMessage) -> Result<ChatbotResponse, SysmentorError> {
        self.attempt_delivery(&msg.session_id, &msg.message, msg.matricula.as_ref())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sysmentor_core::traits::auth::Anonymous;
    use sysmentor_test_utils::{ManualClock, MemoryStore, StaticConnectivity, StaticToken};
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fast_policy() -> DeliveryPolicy {
        DeliveryPolicy {
            max_attempts: 3,
            retry_delay: Duration::from_millis(10),
            request_timeout: Duration::from_secs(5),
        }
    }

    struct Harness {
        client: DeliveryClient,
        queue: Arc<MessageQueue>,
    }

    fn harness(base_url: &str, online: bool, token: Option<&str>) -> Harness {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new());
        let queue = Arc::new(MessageQueue::new(store, clock.clone()));

        let connectivity: Arc<dyn ConnectivityProbe> = if online {
            Arc::new(StaticConnectivity::online())
        } else {
            Arc::new(StaticConnectivity::offline())
        };
        let tokens: Arc<dyn TokenProvider> = match token {
            Some(t) => Arc::new(StaticToken(t.to_string())),
            None => Arc::new(Anonymous),
        };

        let client = DeliveryClient::new(
            base_url.to_string(),
            fast_policy(),
            queue.clone(),
            connectivity,
            tokens,
            clock,
        )
        .unwrap();

        Harness { client, queue }
    }

    fn backend_reply() -> serde_json::Value {
        json!({
            "respuesta": "Hola, ¿en qué puedo ayudarte?",
            "session_id": "s1",
            "fecha": "2026-01-15T12:00:00Z"
        })
    }

    #[tokio::test]
    async fn send_success_returns_backend_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(CHAT_ENDPOINT))
            .and(body_partial_json(json!({"mensaje": "hola", "session_id": "s1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(backend_reply()))
            .mount(&server)
            .await;

        let h = harness(&server.uri(), true, None);
        let outcome = h
            .client
            .send(&SessionId("s1".into()), "hola", None, RequestKind::Chat)
            .await;

        assert!(outcome.delivered);
        assert_eq!(outcome.response.respuesta, "Hola, ¿en qué puedo ayudarte?");
        assert!(h.queue.is_empty());
    }

    #[tokio::test]
    async fn bearer_token_is_attached_when_present() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(CHAT_ENDPOINT))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(backend_reply()))
            .mount(&server)
            .await;

        let h = harness(&server.uri(), true, Some("test-token"));
        let outcome = h
            .client
            .send(&SessionId("s1".into()), "hola", None, RequestKind::Chat)
            .await;
        assert!(outcome.delivered, "token header should have matched");
    }

    #[tokio::test]
    async fn retries_on_500_then_succeeds() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(CHAT_ENDPOINT))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(CHAT_ENDPOINT))
            .respond_with(ResponseTemplate::new(200).set_body_json(backend_reply()))
            .mount(&server)
            .await;

        let h = harness(&server.uri(), true, None);
        let outcome = h
            .client
            .send(&SessionId("s1".into()), "hola", None, RequestKind::Chat)
            .await;

        assert!(outcome.delivered);
        assert!(h.queue.is_empty());
    }

    #[tokio::test]
    async fn client_error_body_is_surfaced_as_completed() {
        let server = MockServer::start().await;
        let body = json!({
            "respuesta": "No tengo información sobre eso.",
            "session_id": "s1",
            "fecha": "2026-01-15T12:00:00Z"
        });
        Mock::given(method("POST"))
            .and(path(CHAT_ENDPOINT))
            .respond_with(ResponseTemplate::new(422).set_body_json(body))
            .expect(1)
            .mount(&server)
            .await;

        let h = harness(&server.uri(), true, None);
        let outcome = h
            .client
            .send(&SessionId("s1".into()), "hola", None, RequestKind::Chat)
            .await;

        // 4xx completed the request, so no retry and no queueing.
        assert!(outcome.delivered);
        assert_eq!(outcome.response.respuesta, "No tengo información sobre eso.");
        assert!(h.queue.is_empty());
    }

    #[tokio::test]
    async fn exhausted_retries_queue_once_with_one_attempt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(CHAT_ENDPOINT))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&server)
            .await;

        let h = harness(&server.uri(), true, None);
        let outcome = h
            .client
            .send(&SessionId("s1".into()), "hola", None, RequestKind::Chat)
            .await;

        assert!(!outcome.delivered);
        // Generic chat fallback, not the generation placeholder.
        assert!(outcome.response.respuesta.starts_with("Lo siento"));
        assert!(!outcome.response.respuesta.contains("Modo Offline Activado"));

        let queued = h.queue.list_all();
        assert_eq!(queued.len(), 1, "enqueue happens once, at exhaustion");
        assert_eq!(queued[0].attempts, 1);
        assert_eq!(queued[0].message, "hola");
    }

    #[tokio::test]
    async fn offline_generation_request_gets_offline_mode_placeholder() {
        // No server: the offline pre-check must skip the network entirely.
        let h = harness("http://127.0.0.1:9", false, None);
        let message = "Genera un ejercicio práctico sobre recursión";
        let outcome = h
            .client
            .send(
                &SessionId("s1".into()),
                message,
                None,
                RequestKind::classify(message),
            )
            .await;

        assert!(!outcome.delivered);
        assert!(outcome.response.respuesta.contains("Modo Offline Activado"));

        let queued = h.queue.list_all();
        assert_eq!(queued.len(), 1);
        assert_eq!(queued[0].attempts, 0, "no network attempt was made");
    }

    #[tokio::test]
    async fn malformed_success_body_is_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(CHAT_ENDPOINT))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(CHAT_ENDPOINT))
            .respond_with(ResponseTemplate::new(200).set_body_json(backend_reply()))
            .mount(&server)
            .await;

        let h = harness(&server.uri(), true, None);
        let outcome = h
            .client
            .send(&SessionId("s1".into()), "hola", None, RequestKind::Chat)
            .await;
        assert!(outcome.delivered);
    }

    #[tokio::test]
    async fn transport_deliver_propagates_failure_without_queueing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(CHAT_ENDPOINT))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let h = harness(&server.uri(), true, None);
        let msg = QueuedMessage {
            id: sysmentor_core::MessageId("queued-1".into()),
            session_id: SessionId("s1".into()),
            message: "pendiente".into(),
            matricula: None,
            enqueued_at: 0,
            attempts: 1,
        };

        let result = h.client.deliver(&msg).await;
        assert!(result.is_err());
        // Raw delivery must not re-enqueue; the processor owns queue state.
        assert!(h.queue.is_empty());
    }
}
