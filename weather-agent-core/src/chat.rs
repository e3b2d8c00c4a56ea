use async_trait::async_trait;
use reqwest::Client;
use std::{fmt::Debug, sync::Arc};

use crate::{Config, error::ClientError};

pub mod insight;
pub mod model;
pub mod store;
pub mod webhook;

pub use insight::{ReplyCondition, detect_condition, extract_temperatures, has_temperature};
pub use model::{ChatMessage, ChatSessionState, FALLBACK_MESSAGE};
pub use store::ChatStore;
pub use webhook::{WebhookAgentClient, clean_reply};

/// Remote agent answering free-text questions.
#[async_trait]
pub trait AgentClient: Send + Sync + Debug {
    /// Send one question and return the cleaned reply text.
    async fn ask(&self, message: &str) -> Result<String, ClientError>;
}

/// Build a chat store for the configured webhook.
pub fn chat_store_from_config(config: &Config, http: Client) -> anyhow::Result<ChatStore> {
    let url = config.webhook_url()?;
    let client = WebhookAgentClient::new(http, url);
    Ok(ChatStore::new(Arc::new(client)))
}
