//! Historian runtime wiring for bosun.
//!
//! Owns the history store, correlation engine, and audit toggle; routes
//! inbound platform events into the engine and exposes the owner-only
//! administrative surface (diagnostic dump, clear/resize, audit toggle).

pub mod historian;
pub mod history_admin;

pub use historian::{Historian, HistorianConfig};
pub use history_admin::{render_history_report, HistoryReport};
