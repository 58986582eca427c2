use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;

use bosun_contract::{MessageRef, PlatformTransport, TransportError};

#[derive(Debug, Clone)]
/// Public configuration for the REST transport adapter.
pub struct RestTransportConfig {
    pub api_base: String,
    pub bot_token: String,
    pub http_timeout_ms: u64,
}

impl Default for RestTransportConfig {
    fn default() -> Self {
        Self {
            api_base: "https://discord.com/api/v10".to_string(),
            bot_token: String::new(),
            http_timeout_ms: 5_000,
        }
    }
}

#[derive(Debug, Clone)]
/// reqwest-backed `PlatformTransport` against a Discord-compatible REST API.
///
/// One attempt per operation; rate limiting and retry policy stay with the
/// platform and the caller's tolerance for classified failures.
pub struct RestTransport {
    config: RestTransportConfig,
    client: reqwest::Client,
}

impl RestTransport {
    pub fn new(config: RestTransportConfig) -> Result<Self> {
        if config.bot_token.trim().is_empty() {
            bail!("rest transport requires a non-empty bot token");
        }
        if config.http_timeout_ms == 0 {
            bail!("rest transport requires http timeout > 0");
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.http_timeout_ms))
            .build()
            .context("failed to build rest transport http client")?;
        Ok(Self { config, client })
    }

    fn auth_header(&self) -> String {
        format!("Bot {}", self.config.bot_token.trim())
    }

    fn messages_endpoint(&self, channel_id: &str) -> String {
        format!(
            "{}/channels/{}/messages",
            self.config.api_base.trim_end_matches('/'),
            channel_id
        )
    }
}

fn classify_status(status: StatusCode, body: String) -> TransportError {
    match status.as_u16() {
        403 => TransportError::PermissionDenied,
        404 => TransportError::NotFound,
        429 => TransportError::RateLimited,
        code => TransportError::Api { status: code, body },
    }
}

fn carrier_failure(error: reqwest::Error) -> TransportError {
    TransportError::Transport(error.to_string())
}

#[async_trait]
impl PlatformTransport for RestTransport {
    async fn send_message(
        &self,
        channel_id: &str,
        content: &str,
    ) -> Result<MessageRef, TransportError> {
        let response = self
            .client
            .post(self.messages_endpoint(channel_id))
            .header("Authorization", self.auth_header())
            .json(&serde_json::json!({ "content": content }))
            .send()
            .await
            .map_err(carrier_failure)?;

        let status = response.status();
        let body = response.text().await.map_err(carrier_failure)?;
        if !status.is_success() {
            return Err(classify_status(status, body));
        }

        let payload = serde_json::from_str::<serde_json::Value>(&body).map_err(|error| {
            TransportError::Transport(format!("malformed create-message response: {error}"))
        })?;
        let message_id = payload
            .get("id")
            .and_then(|value| value.as_str())
            .ok_or_else(|| {
                TransportError::Transport("create-message response missing id".to_string())
            })?;
        Ok(MessageRef::new(channel_id, message_id))
    }

    async fn delete_message(&self, message: &MessageRef) -> Result<(), TransportError> {
        let endpoint = format!(
            "{}/{}",
            self.messages_endpoint(&message.channel_id),
            message.message_id
        );
        let response = self
            .client
            .delete(endpoint)
            .header("Authorization", self.auth_header())
            .send()
            .await
            .map_err(carrier_failure)?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(classify_status(status, body))
    }
}
