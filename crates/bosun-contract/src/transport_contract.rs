//! Trait boundaries for the chat platform transport and command dispatcher.
//!
//! The correlation runtime only ever talks to the platform through these
//! traits; concrete adapters live in `bosun-gateway` and in test doubles.

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

use crate::message_contract::{InboundMessage, MessageRef};

#[derive(Debug, Error)]
/// Enumerates supported `TransportError` values.
pub enum TransportError {
    #[error("permission denied")]
    PermissionDenied,
    #[error("message not found")]
    NotFound,
    #[error("rate limited by platform")]
    RateLimited,
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("platform returned non-success status {status}: {body}")]
    Api { status: u16, body: String },
}

impl TransportError {
    /// Stable reason code used in structured log records.
    pub fn reason_code(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "permission_denied",
            Self::NotFound => "not_found",
            Self::RateLimited => "rate_limited",
            Self::Transport(_) => "transport_failure",
            Self::Api { .. } => "api_error",
        }
    }
}

#[async_trait]
/// Outbound surface of the chat platform: send a reply, delete a message.
///
/// Timeout and retry policy belong to the implementation; callers make one
/// attempt per operation and classify failures via [`TransportError`].
pub trait PlatformTransport: Send + Sync {
    async fn send_message(
        &self,
        channel_id: &str,
        content: &str,
    ) -> Result<MessageRef, TransportError>;

    async fn delete_message(&self, message: &MessageRef) -> Result<(), TransportError>;
}

#[async_trait]
/// Re-invocation entry point into the hosting command-dispatch framework.
///
/// Dispatch-level errors propagate unmodified; the correlation engine does not
/// intercept them.
pub trait CommandDispatcher: Send + Sync {
    async fn invoke(&self, message: InboundMessage) -> Result<()>;
}
