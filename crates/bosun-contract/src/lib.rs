//! Chat contract types and collaborator interfaces for bosun.
//!
//! Defines the message/event shapes exchanged with the hosting chat platform
//! plus the transport and dispatcher trait boundaries consumed by the
//! correlation runtime. Validation helpers enforce identifier hygiene so
//! downstream code only sees well-formed messages.

pub mod message_contract;
pub mod transport_contract;

pub use message_contract::{
    validate_inbound_event, validate_inbound_message, InboundEvent, InboundMessage, MessageRef,
};
pub use transport_contract::{CommandDispatcher, PlatformTransport, TransportError};
