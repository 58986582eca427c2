use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::audit_file::{AuditLog, AuditRecord};

/// Fire-and-forget sink for audit records. Submission never blocks and never
/// reports failure to the caller.
pub trait AuditSink: Send + Sync {
    fn submit(&self, record: AuditRecord);
}

#[derive(Clone)]
/// Cheap handle feeding the background audit writer through a bounded queue.
pub struct AuditLogHandle {
    sender: mpsc::Sender<AuditRecord>,
}

impl AuditSink for AuditLogHandle {
    fn submit(&self, record: AuditRecord) {
        match self.sender.try_send(record) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(record)) => {
                tracing::warn!(
                    user_id = %record.user_id,
                    "audit queue full, dropping record"
                );
            }
            Err(mpsc::error::TrySendError::Closed(record)) => {
                tracing::warn!(
                    user_id = %record.user_id,
                    "audit writer stopped, dropping record"
                );
            }
        }
    }
}

/// Spawns the background writer task draining submitted records into per-user
/// files. The task ends once every handle is dropped and the queue drains.
pub fn spawn_audit_writer(
    log: Arc<AuditLog>,
    queue_capacity: usize,
) -> (AuditLogHandle, JoinHandle<()>) {
    let (sender, mut receiver) = mpsc::channel::<AuditRecord>(queue_capacity.max(1));
    let task = tokio::spawn(async move {
        while let Some(record) = receiver.recv().await {
            if let Err(error) = log.append(&record) {
                tracing::warn!(
                    user_id = %record.user_id,
                    error = %error,
                    "audit append failed"
                );
            }
        }
    });
    (AuditLogHandle { sender }, task)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record(command_text: &str) -> AuditRecord {
        AuditRecord {
            user_id: "user-1".to_string(),
            timestamp_ms: 1,
            command_text: command_text.to_string(),
            failed: false,
        }
    }

    #[tokio::test]
    async fn functional_writer_drains_submitted_records() {
        let tempdir = tempfile::tempdir().expect("tempdir");
        let log = Arc::new(AuditLog::new(tempdir.path().to_path_buf()));
        let (handle, task) = spawn_audit_writer(log, 8);

        handle.submit(sample_record("!status vanilla"));
        handle.submit(sample_record("!stop vanilla"));
        drop(handle);
        task.await.expect("writer task");

        let contents =
            std::fs::read_to_string(tempdir.path().join("user-1.log")).expect("read log");
        assert_eq!(contents.lines().count(), 2);
        assert!(contents.contains("msg: \"!status vanilla\""));
    }

    #[tokio::test]
    async fn regression_submit_on_full_queue_drops_without_blocking() {
        let tempdir = tempfile::tempdir().expect("tempdir");
        let log = Arc::new(AuditLog::new(tempdir.path().to_path_buf()));
        // Capacity one and no yields: the writer task has no chance to drain,
        // so the second submit must take the drop path immediately.
        let (handle, task) = spawn_audit_writer(log, 1);

        handle.submit(sample_record("kept"));
        handle.submit(sample_record("dropped"));
        drop(handle);
        task.await.expect("writer task");

        let contents =
            std::fs::read_to_string(tempdir.path().join("user-1.log")).expect("read log");
        assert_eq!(contents.lines().count(), 1);
        assert!(contents.contains("kept"));
    }
}
