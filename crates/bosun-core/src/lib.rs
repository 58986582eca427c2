//! Foundational low-level utilities shared across bosun crates.
//!
//! Provides atomic file-write helpers, time utilities, and text truncation
//! used by persisted command libraries, audit records, and diagnostic dumps.

pub mod atomic_io;
pub mod text_utils;
pub mod time_utils;

pub use atomic_io::write_text_atomic;
pub use text_utils::preview_text;
pub use time_utils::{current_unix_timestamp, current_unix_timestamp_ms};
