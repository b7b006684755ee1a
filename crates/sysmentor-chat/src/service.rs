// SPDX-FileCopyrightText: 2026 SysMentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info};
use uuid::Uuid;

use sysmentor_client::{DeliveryClient, DrainReport, QueueProcessor, SendOutcome};
use sysmentor_core::{ChatMessage, Clock, Matricula, MessageId, RequestKind, SessionId};
use sysmentor_render::{RenderSession, RenderSink, RenderState, Scheduler, Typewriter};
use sysmentor_store::MessageQueue;

/// One completed send: the delivery outcome, the typewriter animating the
/// assistant reply, and the piggybacked drain report when the send was
/// delivered over the network.
///
/// The caller drives the animation by awaiting [`Typewriter::run`]; pause,
/// resume and cancel stay available through the service in the meantime.
pub struct ChatTurn {
    pub outcome: SendOutcome,
    pub typewriter: Arc<Typewriter>,
    pub drain: Option<DrainReport>,
}

/// Conversation state and pipeline orchestration for one chat session.
pub struct ChatService {
    session_id: SessionId,
    matricula: Option<Matricula>,
    client: Arc<DeliveryClient>,
    processor: QueueProcessor,
    queue: Arc<MessageQueue>,
    clock: Arc<dyn Clock>,
    scheduler: Arc<dyn Scheduler>,
    typing_speed: usize,
    conversation: Mutex<Vec<ChatMessage>>,
    active: Mutex<Option<Arc<Typewriter>>>,
    observer: Mutex<Option<Arc<dyn RenderSink>>>,
}

impl ChatService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        session_id: SessionId,
        matricula: Option<Matricula>,
        client: Arc<DeliveryClient>,
        queue: Arc<MessageQueue>,
        clock: Arc<dyn Clock>,
        scheduler: Arc<dyn Scheduler>,
        typing_speed: usize,
    ) -> Self {
        Self {
            session_id,
            matricula,
            processor: QueueProcessor::new(queue.clone()),
            client,
            queue,
            clock,
            scheduler,
            typing_speed,
            conversation: Mutex::new(Vec::new()),
            active: Mutex::new(None),
            observer: Mutex::new(None),
        }
    }

    /// Registers a secondary sink that sees every revealed prefix after the
    /// conversation has been updated (e.g. a terminal printer).
    pub fn set_render_observer(&self, sink: Arc<dyn RenderSink>) {
        *lock(&self.observer) = Some(sink);
    }

    /// Sends a message, classifying its request kind from the text.
    pub async fn send_message(self: &Arc<Self>, text: &str) -> ChatTurn {
        self.send_message_as(text, RequestKind::classify(text)).await
    }

    /// Sends a message with an explicitly tagged request kind (callers that
    /// know the kind, like a generator form, skip classification).
    pub async fn send_message_as(self: &Arc<Self>, text: &str, kind: RequestKind) -> ChatTurn {
        let user = ChatMessage::user(
            MessageId(format!("user-{}", Uuid::new_v4())),
            text,
            self.clock.now_millis(),
        );
        lock(&self.conversation).push(user);

        let outcome = self
            .client
            .send(&self.session_id, text, self.matricula.as_ref(), kind)
            .await;

        // Queue draining piggybacks on successful network activity; there is
        // no dedicated background scheduler.
        let drain = if outcome.delivered && !self.queue.is_empty() {
            let report = self.processor.drain(self.client.as_ref()).await;
            info!(
                success = report.success,
                failed = report.failed,
                remaining = report.remaining,
                "drained pending messages after successful send"
            );
            Some(report)
        } else if outcome.delivered {
            Some(DrainReport::default())
        } else {
            None
        };

        let assistant_id = MessageId(format!("assistant-{}", Uuid::new_v4()));
        let reply = ChatMessage::assistant(
            assistant_id.clone(),
            outcome.response.respuesta.clone(),
            self.clock.now_millis(),
        );
        lock(&self.conversation).push(reply);

        let session = RenderSession::new(
            assistant_id,
            &outcome.response.respuesta,
            self.typing_speed,
        );
        let typewriter = Arc::new(Typewriter::new(
            session,
            self.clone() as Arc<dyn RenderSink>,
            self.scheduler.clone(),
        ));
        *lock(&self.active) = Some(typewriter.clone());

        ChatTurn {
            outcome,
            typewriter,
            drain,
        }
    }

    /// Pauses the animation of the latest assistant reply.
    pub fn pause_rendering(&self) {
        if let Some(tw) = lock(&self.active).clone() {
            tw.pause();
        }
    }

    /// Resumes a paused animation from its exact prior position.
    pub fn resume_rendering(&self) {
        if let Some(tw) = lock(&self.active).clone() {
            tw.resume();
        }
    }

    /// Cancels the active animation, revealing the full reply immediately.
    pub fn cancel_rendering(&self) {
        if let Some(tw) = lock(&self.active).clone() {
            tw.cancel();
        }
    }

    /// State of the latest reply's animation, if any was started.
    pub fn render_state(&self) -> Option<RenderState> {
        lock(&self.active).as_ref().map(|tw| tw.state())
    }

    /// Snapshot of the conversation, oldest first.
    pub fn conversation(&self) -> Vec<ChatMessage> {
        lock(&self.conversation).clone()
    }

    /// Messages still waiting for delivery (the UI pending indicator).
    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// Drops all conversation entries. The session (and the pending queue)
    /// survive; only the visible history is reset.
    pub fn clear_conversation(&self) {
        if let Some(tw) = lock(&self.active).take() {
            tw.cancel();
        }
        lock(&self.conversation).clear();
        debug!("conversation cleared");
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }
}

impl RenderSink for ChatService {
    fn publish(&self, message_id: &MessageId, prefix: &str) {
        {
            let mut conversation = lock(&self.conversation);
            if let Some(msg) = conversation.iter_mut().find(|m| &m.id == message_id) {
                msg.apply_prefix(prefix);
            }
        }
        if let Some(observer) = lock(&self.observer).clone() {
            observer.publish(message_id, prefix);
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sysmentor_client::{DeliveryPolicy, delivery::CHAT_ENDPOINT};
    use sysmentor_core::traits::auth::Anonymous;
    use sysmentor_core::{ConnectivityProbe, Role, TokenProvider};
    use sysmentor_render::ManualScheduler;
    use sysmentor_test_utils::{ManualClock, MemoryStore, StaticConnectivity};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service(base_url: &str, online: bool) -> (Arc<ChatService>, Arc<MessageQueue>) {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new());
        let queue = Arc::new(MessageQueue::new(store, clock.clone()));

        let connectivity: Arc<dyn ConnectivityProbe> = if online {
            Arc::new(StaticConnectivity::online())
        } else {
            Arc::new(StaticConnectivity::offline())
        };
        let tokens: Arc<dyn TokenProvider> = Arc::new(Anonymous);
        let policy = DeliveryPolicy {
            max_attempts: 2,
            retry_delay: std::time::Duration::from_millis(10),
            request_timeout: std::time::Duration::from_secs(5),
        };
        let client = Arc::new(
            DeliveryClient::new(
                base_url.to_string(),
                policy,
                queue.clone(),
                connectivity,
                tokens,
                clock.clone(),
            )
            .unwrap(),
        );

        let service = Arc::new(ChatService::new(
            SessionId("s1".into()),
            Some(Matricula("20230001".into())),
            client,
            queue.clone(),
            clock,
            Arc::new(ManualScheduler::new()),
            4,
        ));
        (service, queue)
    }

    async fn mount_reply(server: &MockServer, respuesta: &str) {
        Mock::given(method("POST"))
            .and(path(CHAT_ENDPOINT))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "respuesta": respuesta,
                "session_id": "s1",
                "fecha": "2026-01-15T12:00:00Z"
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn delivered_turn_animates_reply_into_conversation() {
        let server = MockServer::start().await;
        mount_reply(&server, "Hola, ¿en qué puedo ayudarte?").await;

        let (service, _queue) = service(&server.uri(), true);
        let turn = service.send_message("hola").await;
        assert!(turn.outcome.delivered);

        // User message is fully revealed on push; assistant starts empty.
        let conversation = service.conversation();
        assert_eq!(conversation.len(), 2);
        assert_eq!(conversation[0].role, Role::User);
        assert!(conversation[0].is_fully_revealed());
        assert_eq!(conversation[1].role, Role::Assistant);
        assert!(conversation[1].displayed_prefix.is_empty());

        turn.typewriter.run().await;

        let conversation = service.conversation();
        assert!(conversation[1].is_fully_revealed());
        assert_eq!(conversation[1].full_content, "Hola, ¿en qué puedo ayudarte?");
        assert_eq!(service.render_state(), Some(RenderState::Completed));
    }

    #[tokio::test]
    async fn offline_turn_queues_and_shows_fallback_without_drain() {
        let (service, queue) = service("http://127.0.0.1:9", false);
        let turn = service.send_message("hola").await;

        assert!(!turn.outcome.delivered);
        assert!(turn.drain.is_none(), "no drain piggybacks on a failed send");
        assert_eq!(queue.len(), 1);
        assert_eq!(service.pending_count(), 1);
        assert!(turn.outcome.response.respuesta.contains("guardado"));
    }

    #[tokio::test]
    async fn successful_send_drains_the_backlog() {
        let server = MockServer::start().await;
        mount_reply(&server, "listo").await;

        let (service, queue) = service(&server.uri(), true);
        queue.enqueue(&SessionId("s1".into()), "pendiente uno", None);
        queue.enqueue(&SessionId("s1".into()), "pendiente dos", None);

        let turn = service.send_message("hola").await;

        assert!(turn.outcome.delivered);
        let report = turn.drain.unwrap();
        assert_eq!(report.success, 2);
        assert_eq!(report.remaining, 0);
        assert!(queue.is_empty());
        assert_eq!(service.pending_count(), 0);
    }

    #[tokio::test]
    async fn generation_request_offline_gets_rich_placeholder() {
        let (service, _queue) = service("http://127.0.0.1:9", false);
        let turn = service
            .send_message("Genera un ejercicio práctico sobre recursión")
            .await;

        assert!(turn.outcome.response.respuesta.contains("Modo Offline Activado"));
        // The fallback still flows through the normal animation path.
        turn.typewriter.run().await;
        let conversation = service.conversation();
        assert!(conversation[1].is_fully_revealed());
    }

    #[tokio::test]
    async fn cancel_rendering_reveals_reply_immediately() {
        let server = MockServer::start().await;
        mount_reply(&server, "una respuesta larga que se cancela antes de terminar").await;

        let (service, _queue) = service(&server.uri(), true);
        let turn = service.send_message("hola").await;

        let runner = {
            let tw = turn.typewriter.clone();
            tokio::spawn(async move { tw.run().await })
        };
        for _ in 0..3 {
            tokio::task::yield_now().await;
        }
        service.cancel_rendering();
        runner.await.unwrap();

        let conversation = service.conversation();
        assert!(conversation[1].is_fully_revealed());
        assert_eq!(service.render_state(), Some(RenderState::Completed));
    }

    #[tokio::test]
    async fn pause_and_resume_proxy_to_the_active_animation() {
        let server = MockServer::start().await;
        mount_reply(&server, "texto suficientemente largo para pausar a mitad de camino").await;

        let (service, _queue) = service(&server.uri(), true);
        let turn = service.send_message("hola").await;

        let runner = {
            let tw = turn.typewriter.clone();
            tokio::spawn(async move { tw.run().await })
        };
        for _ in 0..3 {
            tokio::task::yield_now().await;
        }
        service.pause_rendering();
        tokio::task::yield_now().await;
        assert_eq!(service.render_state(), Some(RenderState::Paused));
        let frozen = service.conversation()[1].displayed_prefix.clone();
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
        assert_eq!(service.conversation()[1].displayed_prefix, frozen);

        service.resume_rendering();
        runner.await.unwrap();
        assert!(service.conversation()[1].is_fully_revealed());
    }

    #[tokio::test]
    async fn clear_conversation_keeps_session_and_queue() {
        let (service, queue) = service("http://127.0.0.1:9", false);
        service.send_message("hola").await;
        assert_eq!(service.conversation().len(), 2);
        assert_eq!(queue.len(), 1);

        service.clear_conversation();
        assert!(service.conversation().is_empty());
        assert_eq!(service.session_id().0, "s1");
        assert_eq!(queue.len(), 1, "pending messages survive a history reset");
    }

    #[tokio::test]
    async fn observer_sees_prefixes_after_conversation_update() {
        struct CountingSink(Mutex<usize>);
        impl RenderSink for CountingSink {
            fn publish(&self, _id: &MessageId, _prefix: &str) {
                *self.0.lock().unwrap() += 1;
            }
        }

        let server = MockServer::start().await;
        mount_reply(&server, "respuesta observable").await;

        let (service, _queue) = service(&server.uri(), true);
        let observer = Arc::new(CountingSink(Mutex::new(0)));
        service.set_render_observer(observer.clone());

        let turn = service.send_message("hola").await;
        turn.typewriter.run().await;

        assert!(*observer.0.lock().unwrap() > 0);
        assert!(service.conversation()[1].is_fully_revealed());
    }
}
