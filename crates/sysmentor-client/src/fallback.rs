// SPDX-FileCopyrightText: 2026 SysMentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Locally synthesized responses for when the backend is unreachable.
//!
//! Two template families, keyed by [`RequestKind`]: ordinary chat messages
//! get a short saved-for-later notice, generation requests get a richer
//! markdown placeholder explaining reduced functionality. The generator UI
//! keys its affordances off the content shape, so both templates must keep
//! their structure.

use chrono::{DateTime, Utc};

use sysmentor_core::types::generation_topic;
use sysmentor_core::{ChatbotResponse, RequestKind, SessionId};

/// Heading that marks a generation-request placeholder.
pub const OFFLINE_MODE_HEADING: &str = "# Modo Offline Activado";

const CHAT_OFFLINE_SAVED: &str = "Tu mensaje ha sido guardado y se enviará cuando se \
     restablezca la conexión a internet. Por ahora, puedo ayudarte con información básica \
     que no requiera conexión.";

const CHAT_CONNECTION_TROUBLE: &str = "Lo siento, parece que estoy teniendo problemas para \
     conectarme al servidor. Tu mensaje ha sido guardado y se enviará cuando se restablezca \
     la conexión.";

/// Placeholder returned when the connectivity probe reports offline and no
/// network attempt was made.
pub fn offline_saved(
    kind: RequestKind,
    message: &str,
    session_id: &SessionId,
    now: DateTime<Utc>,
) -> ChatbotResponse {
    match kind {
        RequestKind::Chat => respond(CHAT_OFFLINE_SAVED.to_string(), session_id, now),
        RequestKind::Generation => respond(generation_placeholder(message), session_id, now),
    }
}

/// Placeholder returned after every delivery attempt failed.
pub fn connection_trouble(
    kind: RequestKind,
    message: &str,
    session_id: &SessionId,
    now: DateTime<Utc>,
) -> ChatbotResponse {
    match kind {
        RequestKind::Chat => respond(CHAT_CONNECTION_TROUBLE.to_string(), session_id, now),
        RequestKind::Generation => respond(generation_placeholder(message), session_id, now),
    }
}

fn respond(respuesta: String, session_id: &SessionId, now: DateTime<Utc>) -> ChatbotResponse {
    ChatbotResponse {
        respuesta,
        session_id: session_id.0.clone(),
        fecha: now.to_rfc3339(),
    }
}

/// Builds the markdown placeholder for a generation request.
fn generation_placeholder(message: &str) -> String {
    let topic_heading = match generation_topic(message) {
        Some(topic) => format!("## Concepto sobre {topic}"),
        None => "## Contenido solicitado".to_string(),
    };

    format!(
        "{OFFLINE_MODE_HEADING}\n\n\
         No se pudo conectar con el servidor. Estoy funcionando en modo offline.\n\n\
         {topic_heading}\n\n\
         Para obtener contenido personalizado completo, por favor intenta nuevamente cuando \
         la conexión al servidor se restablezca.\n\n\
         ### Mientras tanto, puedes:\n\n\
         - Revisar otros temas\n\
         - Intentar con un tema más específico\n\
         - Verificar tu conexión a internet"
    )
}
