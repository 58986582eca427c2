//! End-to-end correlation scenarios across the historian, the recording
//! transport, and the audit writer.

use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;

use bosun_audit::{spawn_audit_writer, AuditLog, AuditSink};
use bosun_contract::{CommandDispatcher, InboundEvent, InboundMessage, MessageRef};
use bosun_gateway::RecordingTransport;
use bosun_runtime::{Historian, HistorianConfig};

struct RecordingDispatcher {
    invoked: Mutex<Vec<String>>,
}

impl RecordingDispatcher {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            invoked: Mutex::new(Vec::new()),
        })
    }

    fn invoked_contents(&self) -> Vec<String> {
        self.invoked.lock().expect("invoked lock").clone()
    }
}

#[async_trait]
impl CommandDispatcher for RecordingDispatcher {
    async fn invoke(&self, message: InboundMessage) -> Result<()> {
        self.invoked
            .lock()
            .expect("invoked lock")
            .push(message.content);
        Ok(())
    }
}

fn sample_message(message_id: &str, content: &str) -> InboundMessage {
    InboundMessage {
        message_id: message_id.to_string(),
        channel_id: "chan-1".to_string(),
        author_id: "user-1".to_string(),
        author_display: "Operator".to_string(),
        content: content.to_string(),
        timestamp_ms: 7,
    }
}

async fn invoke(historian: &Historian, message_id: &str, content: &str) {
    historian
        .route_event(InboundEvent::MessageCreated {
            message: sample_message(message_id, content),
        })
        .await
        .expect("create event");
}

#[tokio::test]
async fn integration_delete_correlation_cleans_replies_and_audits() {
    let tempdir = tempfile::tempdir().expect("tempdir");
    let audit_log = Arc::new(AuditLog::new(tempdir.path().join("commandlogs")));
    let (audit_handle, audit_task) = spawn_audit_writer(audit_log, 16);

    let transport = Arc::new(RecordingTransport::new());
    let dispatcher = RecordingDispatcher::new();
    let historian = Historian::new(
        HistorianConfig {
            history_max_size: 10,
            command_prefix: "!".to_string(),
            audit_enabled: true,
        },
        transport.clone(),
        dispatcher,
        Some(Arc::new(audit_handle) as Arc<dyn AuditSink>),
    )
    .expect("historian");

    invoke(&historian, "msg-1", "!stop vanilla").await;
    historian.register_output("msg-1", MessageRef::new("chan-1", "reply-1"));
    historian.register_output("msg-1", MessageRef::new("chan-1", "reply-2"));

    historian
        .route_event(InboundEvent::MessageDeleted {
            channel_id: "chan-1".to_string(),
            message_id: "msg-1".to_string(),
        })
        .await
        .expect("delete event");

    assert_eq!(transport.deleted_ids(), vec!["reply-1", "reply-2"]);
    assert!(historian.store().is_empty());

    // Dropping the historian releases the last audit sender so the writer
    // drains and exits.
    drop(historian);
    audit_task.await.expect("audit writer");

    let contents = std::fs::read_to_string(tempdir.path().join("commandlogs/user-1.log"))
        .expect("audit file");
    assert_eq!(
        contents.trim_end(),
        "cmd failed: false; msg: \"!stop vanilla\""
    );
}

#[tokio::test]
async fn integration_edit_correlation_reinvokes_edited_content() {
    let transport = Arc::new(RecordingTransport::new());
    let dispatcher = RecordingDispatcher::new();
    let historian = Historian::new(
        HistorianConfig::default(),
        transport.clone(),
        dispatcher.clone(),
        None,
    )
    .expect("historian");

    invoke(&historian, "msg-1", "!status vanilla").await;
    historian.register_output("msg-1", MessageRef::new("chan-1", "reply-1"));

    historian
        .route_event(InboundEvent::MessageEdited {
            before: sample_message("msg-1", "!status vanilla"),
            after: sample_message("msg-1", "!status modded"),
        })
        .await
        .expect("edit event");

    assert_eq!(transport.deleted_ids(), vec!["reply-1"]);
    assert_eq!(dispatcher.invoked_contents(), vec!["!status modded"]);
    assert!(historian.store().is_empty());

    // A second edit for the same id finds nothing tracked and must not
    // re-invoke again.
    historian
        .route_event(InboundEvent::MessageEdited {
            before: sample_message("msg-1", "!status vanilla"),
            after: sample_message("msg-1", "!status hardcore"),
        })
        .await
        .expect("stale edit event");
    assert_eq!(dispatcher.invoked_contents(), vec!["!status modded"]);
}

#[tokio::test]
async fn integration_eviction_leaves_platform_replies_in_place() {
    let transport = Arc::new(RecordingTransport::new());
    let historian = Historian::new(
        HistorianConfig {
            history_max_size: 2,
            ..HistorianConfig::default()
        },
        transport.clone(),
        RecordingDispatcher::new(),
        None,
    )
    .expect("historian");

    invoke(&historian, "msg-a", "!status one").await;
    historian.register_output("msg-a", MessageRef::new("chan-1", "reply-a"));
    invoke(&historian, "msg-b", "!status two").await;
    invoke(&historian, "msg-c", "!status three").await;

    // msg-a aged out; its recorded reply stays on the platform untouched.
    assert!(!historian.store().contains("msg-a"));
    assert!(historian.store().contains("msg-b"));
    assert!(historian.store().contains("msg-c"));
    assert!(transport.deleted_ids().is_empty());

    // Deleting the evicted invocation later is a quiet miss.
    historian
        .route_event(InboundEvent::MessageDeleted {
            channel_id: "chan-1".to_string(),
            message_id: "msg-a".to_string(),
        })
        .await
        .expect("stale delete event");
    assert!(transport.deleted_ids().is_empty());
}

#[tokio::test]
async fn integration_partial_delete_failure_still_clears_entry() {
    let transport = Arc::new(RecordingTransport::new());
    transport.fail_delete_with_not_found("reply-2");
    let historian = Historian::new(
        HistorianConfig::default(),
        transport.clone(),
        RecordingDispatcher::new(),
        None,
    )
    .expect("historian");

    invoke(&historian, "msg-1", "!backup all").await;
    for reply in ["reply-1", "reply-2", "reply-3"] {
        historian.register_output("msg-1", MessageRef::new("chan-1", reply));
    }

    historian
        .route_event(InboundEvent::MessageDeleted {
            channel_id: "chan-1".to_string(),
            message_id: "msg-1".to_string(),
        })
        .await
        .expect("delete event");

    assert_eq!(transport.deleted_ids(), vec!["reply-1", "reply-3"]);
    assert!(historian.store().is_empty());
}
