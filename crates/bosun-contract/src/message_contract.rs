//! Inbound message and event shapes delivered by the hosting platform.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
/// Reference to a single platform message: channel plus message identifier.
pub struct MessageRef {
    pub channel_id: String,
    pub message_id: String,
}

impl MessageRef {
    pub fn new(channel_id: impl Into<String>, message_id: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            message_id: message_id.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// A command-invocation message as delivered by the platform. Immutable once
/// constructed; edits arrive as a fresh `InboundMessage` value.
pub struct InboundMessage {
    pub message_id: String,
    pub channel_id: String,
    pub author_id: String,
    #[serde(default)]
    pub author_display: String,
    #[serde(default)]
    pub content: String,
    pub timestamp_ms: u64,
}

impl InboundMessage {
    pub fn message_ref(&self) -> MessageRef {
        MessageRef::new(self.channel_id.clone(), self.message_id.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
/// Enumerates supported `InboundEvent` values.
pub enum InboundEvent {
    MessageCreated {
        message: InboundMessage,
    },
    MessageEdited {
        before: InboundMessage,
        after: InboundMessage,
    },
    MessageDeleted {
        channel_id: String,
        message_id: String,
    },
}

pub fn validate_inbound_message(message: &InboundMessage) -> Result<()> {
    validate_inbound_message_with_label(message, "inbound message")
}

fn validate_inbound_message_with_label(message: &InboundMessage, label: &str) -> Result<()> {
    if message.message_id.trim().is_empty() {
        bail!("{label} has empty message_id");
    }
    if message.channel_id.trim().is_empty() {
        bail!("{label} has empty channel_id");
    }
    if message.author_id.trim().is_empty() {
        bail!("{label} has empty author_id");
    }
    Ok(())
}

pub fn validate_inbound_event(event: &InboundEvent) -> Result<()> {
    match event {
        InboundEvent::MessageCreated { message } => {
            validate_inbound_message_with_label(message, "message_created event")
        }
        InboundEvent::MessageEdited { before, after } => {
            validate_inbound_message_with_label(before, "message_edited before")?;
            validate_inbound_message_with_label(after, "message_edited after")?;
            if before.message_id != after.message_id {
                bail!(
                    "message_edited identifiers disagree: before='{}' after='{}'",
                    before.message_id,
                    after.message_id
                );
            }
            Ok(())
        }
        InboundEvent::MessageDeleted {
            channel_id,
            message_id,
        } => {
            if message_id.trim().is_empty() {
                bail!("message_deleted event has empty message_id");
            }
            if channel_id.trim().is_empty() {
                bail!("message_deleted event has empty channel_id");
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_message(message_id: &str) -> InboundMessage {
        InboundMessage {
            message_id: message_id.to_string(),
            channel_id: "chan-1".to_string(),
            author_id: "user-1".to_string(),
            author_display: "Operator".to_string(),
            content: "!status vanilla".to_string(),
            timestamp_ms: 1,
        }
    }

    #[test]
    fn unit_validate_inbound_message_rejects_blank_identifier() {
        let mut message = sample_message(" ");
        let error = validate_inbound_message(&message).expect_err("blank id should fail");
        assert!(error.to_string().contains("empty message_id"));

        message = sample_message("msg-1");
        message.author_id = String::new();
        let error = validate_inbound_message(&message).expect_err("blank author should fail");
        assert!(error.to_string().contains("empty author_id"));
    }

    #[test]
    fn unit_validate_edit_event_rejects_identifier_mismatch() {
        let event = InboundEvent::MessageEdited {
            before: sample_message("msg-1"),
            after: sample_message("msg-2"),
        };
        let error = validate_inbound_event(&event).expect_err("mismatch should fail");
        assert!(error.to_string().contains("identifiers disagree"));
    }

    #[test]
    fn unit_message_ref_carries_channel_and_message_ids() {
        let message = sample_message("msg-9");
        let reference = message.message_ref();
        assert_eq!(reference.channel_id, "chan-1");
        assert_eq!(reference.message_id, "msg-9");
    }

    #[test]
    fn functional_inbound_event_serde_round_trip() {
        let event = InboundEvent::MessageDeleted {
            channel_id: "chan-1".to_string(),
            message_id: "msg-1".to_string(),
        };
        let serialized = serde_json::to_string(&event).expect("serialize");
        assert!(serialized.contains("\"kind\":\"message_deleted\""));
        let decoded = serde_json::from_str::<InboundEvent>(&serialized).expect("deserialize");
        assert_eq!(decoded, event);
    }
}
