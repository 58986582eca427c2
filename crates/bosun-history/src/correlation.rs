use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Result;

use bosun_audit::{AuditRecord, AuditSink};
use bosun_contract::{CommandDispatcher, InboundMessage, MessageRef, PlatformTransport};
use bosun_core::current_unix_timestamp_ms;

use crate::history_store::{HistoryEntry, HistoryStore};

/// Reacts to platform events and drives the history store.
///
/// Entry lifecycle: created on invocation, accumulates reply references while
/// the invocation is handled, then reaches exactly one terminal state —
/// evicted by the bound, deleted after its invoking message was deleted, or
/// re-invoked after a genuine content edit. The platform delivers at most one
/// edit/delete resolution per message id; a concurrent second event finds the
/// store empty and no-ops.
pub struct CorrelationEngine {
    store: HistoryStore,
    transport: Arc<dyn PlatformTransport>,
    dispatcher: Arc<dyn CommandDispatcher>,
    audit: Option<Arc<dyn AuditSink>>,
    audit_enabled: AtomicBool,
}

impl CorrelationEngine {
    pub fn new(
        store: HistoryStore,
        transport: Arc<dyn PlatformTransport>,
        dispatcher: Arc<dyn CommandDispatcher>,
        audit: Option<Arc<dyn AuditSink>>,
    ) -> Self {
        Self {
            store,
            transport,
            dispatcher,
            audit,
            audit_enabled: AtomicBool::new(false),
        }
    }

    pub fn store(&self) -> &HistoryStore {
        &self.store
    }

    pub fn audit_enabled(&self) -> bool {
        self.audit_enabled.load(Ordering::Relaxed)
    }

    pub fn set_audit_enabled(&self, enabled: bool) {
        self.audit_enabled.store(enabled, Ordering::Relaxed);
    }

    /// Tracks a fresh command invocation. The audit append is submitted
    /// fire-and-forget; the reply path never waits on it.
    pub fn on_command_invoked(&self, message: InboundMessage, failed: bool) {
        if let Some(evicted) = self.store.insert(HistoryEntry::new(message.clone())) {
            tracing::debug!(
                message_id = %evicted.invocation.message_id,
                outputs = evicted.outputs.len(),
                "history bound exceeded, dropped oldest invocation"
            );
        }

        if self.audit_enabled() {
            if let Some(audit) = &self.audit {
                audit.submit(AuditRecord {
                    user_id: message.author_id,
                    timestamp_ms: current_unix_timestamp_ms(),
                    command_text: message.content,
                    failed,
                });
            }
        }
    }

    /// Side-channel used by reply-producing command handlers. Returns false
    /// when the invocation is unknown; a miss is tolerated, never an error.
    pub fn register_output(&self, invocation_id: &str, output: MessageRef) -> bool {
        let tracked = self.store.append_output(invocation_id, output);
        if !tracked {
            tracing::debug!(
                invocation_id = %invocation_id,
                "reply not tracked, invocation unknown or already correlated"
            );
        }
        tracked
    }

    /// Deletes the recorded replies of a deleted invoking message. Absent
    /// entries are a no-op; per-reply deletion failures are logged and the
    /// entry is removed regardless.
    pub async fn on_message_deleted(&self, channel_id: &str, message_id: &str) {
        let Some(entry) = self.store.get(message_id) else {
            return;
        };

        tracing::info!(
            channel_id = %channel_id,
            message_id = %message_id,
            outputs = entry.outputs.len(),
            "deleting previous command output"
        );
        self.delete_outputs(&entry).await;
        self.store.remove(message_id);
    }

    /// Re-invokes an edited command after deleting its previous output.
    ///
    /// Non-content edits (embed refreshes and the like) are a strict no-op.
    /// Dispatch errors from the re-invocation propagate unmodified, in which
    /// case the original entry stays tracked.
    pub async fn on_message_edited(
        &self,
        before: InboundMessage,
        after: InboundMessage,
    ) -> Result<()> {
        if before.content == after.content {
            return Ok(());
        }
        let Some(entry) = self.store.get(&before.message_id) else {
            return Ok(());
        };

        tracing::info!(
            message_id = %before.message_id,
            before = %before.content,
            after = %after.content,
            "reinvoking edited command"
        );
        self.delete_outputs(&entry).await;
        self.dispatcher.invoke(after).await?;
        self.store.remove(&before.message_id);
        Ok(())
    }

    async fn delete_outputs(&self, entry: &HistoryEntry) {
        let mut deleted = 0usize;
        for output in &entry.outputs {
            match self.transport.delete_message(output).await {
                Ok(()) => deleted = deleted.saturating_add(1),
                Err(error) => {
                    tracing::warn!(
                        channel_id = %output.channel_id,
                        message_id = %output.message_id,
                        reason_code = error.reason_code(),
                        "failed to delete tracked reply"
                    );
                }
            }
        }
        tracing::debug!(
            deleted,
            skipped = entry.outputs.len().saturating_sub(deleted),
            "output deletion pass complete"
        );
    }
}
