//! Platform transport adapters for bosun.
//!
//! `RestTransport` delivers against a Discord-compatible REST surface and
//! classifies response statuses into the shared `TransportError` taxonomy.
//! `RecordingTransport` is the in-memory double used by tests and dry-run
//! operation.

pub mod recording_transport;
pub mod rest_transport;

pub use recording_transport::RecordingTransport;
pub use rest_transport::{RestTransport, RestTransportConfig};
