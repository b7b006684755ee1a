// SPDX-FileCopyrightText: 2026 SysMentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across the SysMentor client crates.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Unique identifier for a chat session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

/// Unique identifier for a message (conversation entry or queued entry).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl MessageId {
    /// Sentinel id returned when a best-effort enqueue could not be persisted.
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// Returns true for the best-effort enqueue sentinel.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Student identifier associating queued and cached data with a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Matricula(pub String);

/// Request body for the chat backend endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub mensaje: String,
    pub session_id: String,
    pub matricula: Option<String>,
}

/// Response body from the chat backend endpoint.
///
/// Offline fallbacks are synthesized into this same shape so callers never
/// need to distinguish a real reply from a placeholder structurally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatbotResponse {
    pub respuesta: String,
    pub session_id: String,
    pub fecha: String,
}

/// An outbound message persisted while the backend is unreachable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedMessage {
    pub id: MessageId,
    pub session_id: SessionId,
    pub message: String,
    pub matricula: Option<Matricula>,
    /// Unix milliseconds at enqueue time.
    pub enqueued_at: i64,
    pub attempts: u32,
}

/// The kind of request a message represents, chosen at the call site.
///
/// Generation requests (exercise, quiz, concept, project) get a richer
/// offline placeholder than ordinary chat messages, because the generator
/// UI keys its regenerate/pause/cancel affordances off the content shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
pub enum RequestKind {
    Chat,
    Generation,
}

/// Trigger phrases the generator front-end prepends to its prompts.
const GENERATION_TRIGGERS: &[&str] = &[
    "genera un ejercicio",
    "crea un cuestionario",
    "explica detalladamente el concepto",
    "genera una idea de proyecto",
];

impl RequestKind {
    /// Classifies a raw outbound message.
    ///
    /// Callers that know the kind (the generator form) should tag requests
    /// directly; this helper exists for raw entry points like the CLI shell.
    pub fn classify(message: &str) -> Self {
        let lowered = message.to_lowercase();
        if GENERATION_TRIGGERS.iter().any(|t| lowered.contains(t)) {
            Self::Generation
        } else {
            Self::Chat
        }
    }
}

/// Extracts the topic from a generation-shaped message, when recognizable.
///
/// The generator composes prompts as `<trigger phrase> sobre <topic>. ...`,
/// so the text after the trigger phrase up to the first sentence break is a
/// good topic approximation for offline placeholders.
pub fn generation_topic(message: &str) -> Option<String> {
    const CANONICAL_TRIGGERS: &[&str] = &[
        "Genera un ejercicio práctico sobre",
        "Crea un cuestionario con preguntas y respuestas sobre",
        "Explica detalladamente el concepto de",
        "Genera una idea de proyecto sobre",
    ];

    for trigger in CANONICAL_TRIGGERS {
        if let Some(pos) = message.find(trigger) {
            let rest = &message[pos + trigger.len()..];
            let topic = rest.split(['.', '\n']).next().unwrap_or("").trim();
            if !topic.is_empty() {
                return Some(topic.to_string());
            }
        }
    }
    None
}

/// Author of a conversation entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A conversation entry as the UI sees it.
///
/// `displayed_prefix` is always a prefix of `full_content`. User messages are
/// fully revealed on construction; assistant messages start empty and are
/// revealed progressively by the typewriter.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub role: Role,
    pub full_content: String,
    pub displayed_prefix: String,
    /// Unix milliseconds at creation time.
    pub timestamp: i64,
}

impl ChatMessage {
    /// Creates a user message, revealed immediately (no animation).
    pub fn user(id: MessageId, content: impl Into<String>, timestamp: i64) -> Self {
        let full_content = content.into();
        Self {
            id,
            role: Role::User,
            displayed_prefix: full_content.clone(),
            full_content,
            timestamp,
        }
    }

    /// Creates an assistant message with nothing revealed yet.
    pub fn assistant(id: MessageId, content: impl Into<String>, timestamp: i64) -> Self {
        Self {
            id,
            role: Role::Assistant,
            full_content: content.into(),
            displayed_prefix: String::new(),
            timestamp,
        }
    }

    /// Applies a new revealed prefix, rejecting anything that is not a prefix
    /// of the full content.
    pub fn apply_prefix(&mut self, prefix: &str) {
        if self.full_content.starts_with(prefix) {
            self.displayed_prefix = prefix.to_string();
        } else {
            tracing::warn!(
                id = %self.id.0,
                "ignored displayed-prefix update that is not a prefix of the content"
            );
        }
    }

    /// Returns true once the whole content is revealed.
    pub fn is_fully_revealed(&self) -> bool {
        self.displayed_prefix == self.full_content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_detects_generation_triggers() {
        assert_eq!(
            RequestKind::classify("Genera un ejercicio práctico sobre recursión"),
            RequestKind::Generation
        );
        assert_eq!(
            RequestKind::classify("crea un cuestionario sobre redes"),
            RequestKind::Generation
        );
        assert_eq!(
            RequestKind::classify("Explica detalladamente el concepto de virtualización"),
            RequestKind::Generation
        );
        assert_eq!(RequestKind::classify("hola"), RequestKind::Chat);
        assert_eq!(
            RequestKind::classify("¿qué temas tiene el semestre?"),
            RequestKind::Chat
        );
    }

    #[test]
    fn generation_topic_extracted_from_canonical_prompt() {
        let topic = generation_topic(
            "Genera un ejercicio práctico sobre recursión. Nivel de dificultad: Intermedio.",
        );
        assert_eq!(topic.as_deref(), Some("recursión"));

        assert_eq!(generation_topic("hola"), None);
    }

    #[test]
    fn user_message_is_revealed_immediately() {
        let msg = ChatMessage::user(MessageId("m1".into()), "hola", 0);
        assert!(msg.is_fully_revealed());
        assert_eq!(msg.displayed_prefix, "hola");
    }

    #[test]
    fn assistant_message_starts_unrevealed() {
        let msg = ChatMessage::assistant(MessageId("m2".into()), "respuesta", 0);
        assert!(!msg.is_fully_revealed());
        assert!(msg.displayed_prefix.is_empty());
    }

    #[test]
    fn apply_prefix_rejects_non_prefix() {
        let mut msg = ChatMessage::assistant(MessageId("m3".into()), "abcdef", 0);
        msg.apply_prefix("abc");
        assert_eq!(msg.displayed_prefix, "abc");

        msg.apply_prefix("xyz");
        assert_eq!(msg.displayed_prefix, "abc", "non-prefix update must be ignored");
    }

    #[test]
    fn chatbot_response_wire_shape_round_trips() {
        let json = r#"{"respuesta":"hola","session_id":"s1","fecha":"2026-01-01T00:00:00Z"}"#;
        let resp: ChatbotResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.respuesta, "hola");
        let back = serde_json::to_string(&resp).unwrap();
        assert_eq!(serde_json::from_str::<ChatbotResponse>(&back).unwrap(), resp);
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), r#""user""#);
        assert_eq!(Role::Assistant.to_string(), "assistant");
    }
}
