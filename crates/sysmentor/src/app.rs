// SPDX-FileCopyrightText: 2026 SysMentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wiring of the client pipeline from a loaded configuration.

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use sysmentor_chat::ChatService;
use sysmentor_client::{DeliveryClient, DeliveryPolicy};
use sysmentor_config::SysmentorConfig;
use sysmentor_core::traits::connectivity::AssumeOnline;
use sysmentor_core::{
    Clock, ConnectivityProbe, Matricula, SessionId, SysmentorError, SystemClock, TokenProvider,
};
use sysmentor_render::{Scheduler, TokioScheduler};
use sysmentor_store::{JsonFileStore, MessageQueue};

/// Attaches the configured bearer token, when one is set.
struct ConfigToken(Option<String>);

impl TokenProvider for ConfigToken {
    fn bearer_token(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Fully wired client pipeline shared by the CLI commands.
pub struct App {
    pub config: SysmentorConfig,
    pub queue: Arc<MessageQueue>,
    pub client: Arc<DeliveryClient>,
    pub service: Arc<ChatService>,
}

impl App {
    /// Builds the pipeline on the durable JSON store with the system clock.
    /// Each invocation gets a fresh session id; the queue and cache persist
    /// across sessions in `storage.data_dir`.
    pub fn build(
        config: SysmentorConfig,
        matricula: Option<String>,
    ) -> Result<Self, SysmentorError> {
        let store = Arc::new(JsonFileStore::open(&config.storage.data_dir)?);
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let queue = Arc::new(MessageQueue::new(store, clock.clone()));

        let policy = DeliveryPolicy {
            max_attempts: config.api.max_retries,
            retry_delay: Duration::from_millis(config.api.retry_delay_ms),
            request_timeout: Duration::from_secs(config.api.timeout_secs),
        };
        let connectivity: Arc<dyn ConnectivityProbe> = Arc::new(AssumeOnline);
        let tokens: Arc<dyn TokenProvider> = Arc::new(ConfigToken(config.api.token.clone()));
        let client = Arc::new(DeliveryClient::new(
            config.api.base_url.clone(),
            policy,
            queue.clone(),
            connectivity,
            tokens,
            clock.clone(),
        )?);

        let scheduler: Arc<dyn Scheduler> = Arc::new(TokioScheduler);
        let service = Arc::new(ChatService::new(
            SessionId(format!("cli-{}", Uuid::new_v4())),
            matricula.map(Matricula),
            client.clone(),
            queue.clone(),
            clock,
            scheduler,
            config.typing.speed,
        ));

        Ok(Self {
            config,
            queue,
            client,
            service,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_builds_from_defaults_in_a_temp_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = SysmentorConfig::default();
        config.storage.data_dir = dir.path().to_path_buf();

        let app = App::build(config, Some("20230001".to_string())).unwrap();
        assert!(app.queue.is_empty());
        assert!(app.service.session_id().0.starts_with("cli-"));
    }
}
