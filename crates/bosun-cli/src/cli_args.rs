use std::path::PathBuf;

use clap::Parser;

fn parse_history_bound(value: &str) -> Result<usize, String> {
    let parsed = value
        .parse::<usize>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if parsed <= 1 {
        return Err("history bound must be greater than 1".to_string());
    }
    Ok(parsed)
}

fn parse_positive_usize(value: &str) -> Result<usize, String> {
    let parsed = value
        .parse::<usize>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if parsed == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(parsed)
}

#[derive(Debug, Parser)]
#[command(name = "bosun", about = "Chat-ops historian for game-server admin commands")]
/// Command-line surface of the bosun binary.
pub struct Cli {
    /// Root directory for persisted state (audit logs, command library).
    #[arg(long, env = "BOSUN_DATA_DIR", default_value = ".bosun")]
    pub data_dir: PathBuf,

    /// Maximum tracked invocations before the oldest entry is dropped.
    #[arg(long, env = "BOSUN_HISTORY_MAX_SIZE", default_value_t = 100, value_parser = parse_history_bound)]
    pub history_max_size: usize,

    /// Prefix that marks a message as a command invocation.
    #[arg(long, env = "BOSUN_COMMAND_PREFIX", default_value = "!")]
    pub command_prefix: String,

    /// Enables per-user audit logging of command invocations.
    #[arg(long, env = "BOSUN_AUDIT_ENABLED", default_value_t = false)]
    pub audit_enabled: bool,

    /// Bounded queue depth between the reply path and the audit writer.
    #[arg(long, env = "BOSUN_AUDIT_QUEUE_CAPACITY", default_value_t = 64, value_parser = parse_positive_usize)]
    pub audit_queue_capacity: usize,

    /// Base URL of the Discord-compatible REST API.
    #[arg(long, env = "BOSUN_API_BASE", default_value = "https://discord.com/api/v10")]
    pub api_base: String,

    /// Bot token for the REST transport; required unless --dry-run is set.
    #[arg(long, env = "BOSUN_BOT_TOKEN")]
    pub bot_token: Option<String>,

    /// HTTP timeout for platform calls, in milliseconds.
    #[arg(long, env = "BOSUN_HTTP_TIMEOUT_MS", default_value_t = 5_000)]
    pub http_timeout_ms: u64,

    /// Uses the in-memory recording transport instead of the REST API.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Replays inbound events (one JSON object per line) through the
    /// historian, then prints the resulting history report.
    #[arg(long, env = "BOSUN_EVENTS_FILE")]
    pub events_file: Option<PathBuf>,
}
