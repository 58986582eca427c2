use std::{
    collections::HashSet,
    sync::{
        atomic::{AtomicU64, Ordering},
        Mutex, MutexGuard,
    },
};

use async_trait::async_trait;

use bosun_contract::{MessageRef, PlatformTransport, TransportError};

#[derive(Default)]
/// In-memory transport double. Records sends and deletes, hands out
/// sequential message ids, and lets tests script per-message delete failures.
/// Also backs dry-run operation where no platform credentials exist.
pub struct RecordingTransport {
    next_id: AtomicU64,
    sent: Mutex<Vec<(String, String)>>,
    deleted: Mutex<Vec<MessageRef>>,
    not_found_ids: Mutex<HashSet<String>>,
    forbidden_ids: Mutex<HashSet<String>>,
}

// The guarded collections stay consistent across any single push/insert, so a
// poisoned lock is recoverable.
fn recover<T>(lock: &Mutex<T>) -> MutexGuard<'_, T> {
    lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts `delete_message` for this id to fail with `NotFound`.
    pub fn fail_delete_with_not_found(&self, message_id: &str) {
        recover(&self.not_found_ids).insert(message_id.to_string());
    }

    /// Scripts `delete_message` for this id to fail with `PermissionDenied`.
    pub fn fail_delete_with_permission_denied(&self, message_id: &str) {
        recover(&self.forbidden_ids).insert(message_id.to_string());
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        recover(&self.sent).clone()
    }

    pub fn deleted_ids(&self) -> Vec<String> {
        recover(&self.deleted)
            .iter()
            .map(|message| message.message_id.clone())
            .collect()
    }
}

#[async_trait]
impl PlatformTransport for RecordingTransport {
    async fn send_message(
        &self,
        channel_id: &str,
        content: &str,
    ) -> Result<MessageRef, TransportError> {
        let sequence = self.next_id.fetch_add(1, Ordering::Relaxed).saturating_add(1);
        recover(&self.sent).push((channel_id.to_string(), content.to_string()));
        Ok(MessageRef::new(channel_id, format!("sent-{sequence}")))
    }

    async fn delete_message(&self, message: &MessageRef) -> Result<(), TransportError> {
        if recover(&self.not_found_ids).contains(&message.message_id) {
            return Err(TransportError::NotFound);
        }
        if recover(&self.forbidden_ids).contains(&message.message_id) {
            return Err(TransportError::PermissionDenied);
        }
        recover(&self.deleted).push(message.clone());
        Ok(())
    }
}
