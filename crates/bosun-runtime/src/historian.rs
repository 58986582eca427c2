use std::sync::Arc;

use anyhow::{Context, Result};

use bosun_audit::AuditSink;
use bosun_contract::{
    validate_inbound_event, CommandDispatcher, InboundEvent, InboundMessage, MessageRef,
    PlatformTransport,
};
use bosun_history::{CorrelationEngine, HistoryStore, DEFAULT_HISTORY_MAX_SIZE};

#[derive(Debug, Clone)]
/// Public configuration for the historian runtime.
pub struct HistorianConfig {
    pub history_max_size: usize,
    pub command_prefix: String,
    pub audit_enabled: bool,
}

impl Default for HistorianConfig {
    fn default() -> Self {
        Self {
            history_max_size: DEFAULT_HISTORY_MAX_SIZE,
            command_prefix: "!".to_string(),
            audit_enabled: false,
        }
    }
}

/// Owns the correlation engine and routes inbound platform events into it.
///
/// The hosting framework delivers events; this type is registered once at
/// startup and never owns the event loop itself.
pub struct Historian {
    engine: CorrelationEngine,
    command_prefix: String,
}

impl Historian {
    pub fn new(
        config: HistorianConfig,
        transport: Arc<dyn PlatformTransport>,
        dispatcher: Arc<dyn CommandDispatcher>,
        audit: Option<Arc<dyn AuditSink>>,
    ) -> Result<Self> {
        let store = HistoryStore::new(config.history_max_size)
            .context("invalid historian configuration")?;
        let engine = CorrelationEngine::new(store, transport, dispatcher, audit);
        engine.set_audit_enabled(config.audit_enabled);
        Ok(Self {
            engine,
            command_prefix: config.command_prefix,
        })
    }

    pub fn engine(&self) -> &CorrelationEngine {
        &self.engine
    }

    pub fn store(&self) -> &HistoryStore {
        self.engine.store()
    }

    /// Called by every reply-producing command handler so its output is
    /// tracked for later correlation. Tolerant no-op on unknown invocations.
    pub fn register_output(&self, invocation_id: &str, output: MessageRef) -> bool {
        self.engine.register_output(invocation_id, output)
    }

    /// Direct invocation entry point for the dispatch layer, carrying the
    /// handler's failure status for the audit trail.
    pub fn note_invocation(&self, message: InboundMessage, failed: bool) {
        self.engine.on_command_invoked(message, failed);
    }

    /// Fans one inbound platform event into the correlation engine.
    ///
    /// Creates only count as invocations when the content carries the
    /// configured command prefix; the platform's delete/edit streams are
    /// forwarded as-is since untracked ids no-op inside the engine.
    pub async fn route_event(&self, event: InboundEvent) -> Result<()> {
        validate_inbound_event(&event)?;
        match event {
            InboundEvent::MessageCreated { message } => {
                if message.content.starts_with(&self.command_prefix) {
                    self.engine.on_command_invoked(message, false);
                } else {
                    tracing::trace!(
                        message_id = %message.message_id,
                        "ignoring non-command message"
                    );
                }
                Ok(())
            }
            InboundEvent::MessageEdited { before, after } => {
                self.engine.on_message_edited(before, after).await
            }
            InboundEvent::MessageDeleted {
                channel_id,
                message_id,
            } => {
                self.engine.on_message_deleted(&channel_id, &message_id).await;
                Ok(())
            }
        }
    }
}
