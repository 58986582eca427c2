//! Custom console-command library and game-server command relay.
//!
//! Operators define named sequences of console commands, persisted as a JSON
//! document, and run them against one or all configured game servers through
//! the `ServerBridge` boundary. Offline servers are skipped with a report row;
//! process supervision itself lives outside this crate.

pub mod command_library;
pub mod command_runner;
pub mod server_bridge;

pub use command_library::CommandLibrary;
pub use command_runner::{
    render_custom_command_report, run_custom_command, CustomCommandRunReport,
};
pub use server_bridge::ServerBridge;
