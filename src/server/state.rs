use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;

use crate::attachment::AttachmentResolver;
use crate::config::Settings;
use crate::email::EmailDispatcher;
use crate::error::Result;
use crate::provider::{AcsEmailClient, EmailSender, UnconfiguredSender};
use crate::template::TemplateRegistry;
use crate::variables::AliasTable;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub dispatcher: EmailDispatcher,
    /// Root token; cancelled on shutdown, parent of every request token
    pub shutdown: CancellationToken,
    pub start_time: Instant,
}

impl AppState {
    /// Wire the ACS client when an endpoint is configured, otherwise a sender
    /// that rejects every message.
    pub fn new(settings: Settings, shutdown: CancellationToken) -> Result<Self> {
        let sender: Arc<dyn EmailSender> = match settings.acs_client_config() {
            Some(config) => {
                let client = AcsEmailClient::new(config)?;
                tracing::info!(endpoint = %client.endpoint(), "ACS email client configured");
                Arc::new(client)
            }
            None => {
                tracing::warn!("ACS_ENDPOINT is not set; sends will fail until it is configured");
                Arc::new(UnconfiguredSender)
            }
        };

        Ok(Self::with_sender(settings, sender, shutdown))
    }

    pub fn with_sender(
        settings: Settings,
        sender: Arc<dyn EmailSender>,
        shutdown: CancellationToken,
    ) -> Self {
        let dispatcher = EmailDispatcher::new(
            sender,
            Arc::new(TemplateRegistry::builtin()),
            Arc::new(AliasTable::incident()),
            AttachmentResolver::new(settings.attachment_limits()),
            settings.default_sender(),
        );

        Self {
            settings: Arc::new(settings),
            dispatcher,
            shutdown,
            start_time: Instant::now(),
        }
    }

    /// Token for one request; cancelled together with the root token.
    pub fn request_token(&self) -> CancellationToken {
        self.shutdown.child_token()
    }
}
