//! Outbound messaging with paired audit logging and text overrides.
//!
//! Every send is logged 1:1 in the interaction log. A failed transport send is
//! logged and swallowed (never retried, never rolls back session state), and a
//! failed audit write never blocks the reply.

use capy_core::{Gateway, MessageDirection};
use std::sync::Arc;
use storage::{BotTextRepository, InteractionRecord, InteractionRepository};
use tracing::{error, warn};

pub struct Messenger {
    gateway: Arc<dyn Gateway>,
    interactions: Arc<InteractionRepository>,
    texts: Arc<BotTextRepository>,
}

impl Messenger {
    pub fn new(
        gateway: Arc<dyn Gateway>,
        interactions: Arc<InteractionRepository>,
        texts: Arc<BotTextRepository>,
    ) -> Self {
        Self {
            gateway,
            interactions,
            texts,
        }
    }

    /// Sends `text` to the chat and records the outbound interaction.
    pub async fn send(&self, chat_id: &str, text: &str) {
        if let Err(e) = self.gateway.send_message(chat_id, text).await {
            error!(chat_id = %chat_id, error = %e, "Failed to send message");
        }
        self.log(chat_id, text, MessageDirection::Sent).await;
    }

    /// Records an inbound message. Called by the router before any branching.
    pub async fn log_received(&self, chat_id: &str, text: &str) {
        self.log(chat_id, text, MessageDirection::Received).await;
    }

    /// Returns the configured override for `key`, or `default`.
    /// Lookup failures fall back silently so a broken table never breaks a flow.
    pub async fn text_for(&self, key: &str, default: &str) -> String {
        match self.texts.find(key).await {
            Ok(Some(text)) => text,
            Ok(None) => default.to_string(),
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to fetch configured text");
                default.to_string()
            }
        }
    }

    async fn log(&self, chat_id: &str, text: &str, direction: MessageDirection) {
        let record =
            InteractionRecord::new(chat_id, text, direction, self.gateway.session_name());
        if let Err(e) = self.interactions.save(&record).await {
            error!(chat_id = %chat_id, error = %e, "Failed to log interaction");
        }
    }
}
