use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::error::ClientError;

use super::AgentClient;

const QUERY_PARAM: &str = "future";
const REPLY_FIELD: &str = "myField";

/// Agent reachable through a single GET webhook.
#[derive(Debug, Clone)]
pub struct WebhookAgentClient {
    http: Client,
    webhook_url: String,
}

impl WebhookAgentClient {
    pub fn new(http: Client, webhook_url: impl Into<String>) -> Self {
        Self {
            http,
            webhook_url: webhook_url.into(),
        }
    }

    pub fn webhook_url(&self) -> &str {
        &self.webhook_url
    }
}

#[async_trait]
impl AgentClient for WebhookAgentClient {
    async fn ask(&self, message: &str) -> Result<String, ClientError> {
        tracing::debug!(chars = message.chars().count(), "calling agent webhook");

        let res = self
            .http
            .get(&self.webhook_url)
            .query(&[(QUERY_PARAM, message)])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(ClientError::http_status(status, &body));
        }

        let parsed: Value = serde_json::from_str(&body)?;
        let reply = parsed
            .get(REPLY_FIELD)
            .and_then(Value::as_str)
            .ok_or(ClientError::MissingField(REPLY_FIELD))?;

        Ok(clean_reply(reply))
    }
}

/// Drop literal `\n` escape pairs the agent leaves in its text, then trim.
pub fn clean_reply(raw: &str) -> String {
    raw.replace("\\n", "").trim().to_string()
}
