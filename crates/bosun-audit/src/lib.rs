//! Best-effort persistent audit log of command invocations.
//!
//! One append-only plain-text file per user. Writes happen on a background
//! task fed by a bounded queue so the reply path never waits on file I/O;
//! queue overflow and write failures are logged and dropped, never surfaced.

mod audit_file;
mod audit_writer;

pub use audit_file::{render_audit_line, AuditLog, AuditRecord};
pub use audit_writer::{spawn_audit_writer, AuditLogHandle, AuditSink};
