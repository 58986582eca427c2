//! bosun binary: wires the transport, audit writer, and historian, then
//! optionally replays an inbound event stream through the correlation engine.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use bosun_audit::{spawn_audit_writer, AuditLog, AuditSink};
use bosun_contract::{CommandDispatcher, InboundEvent, InboundMessage, PlatformTransport};
use bosun_gateway::{RecordingTransport, RestTransport, RestTransportConfig};
use bosun_runtime::{render_history_report, Historian, HistorianConfig};

mod cli_args;

use cli_args::Cli;

fn init_tracing() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

/// Stand-in for the hosting command-dispatch framework: re-invocations are
/// logged rather than parsed, since command dispatch lives outside this core.
struct LoggingDispatcher;

#[async_trait]
impl CommandDispatcher for LoggingDispatcher {
    async fn invoke(&self, message: InboundMessage) -> Result<()> {
        tracing::info!(
            message_id = %message.message_id,
            content = %message.content,
            "re-invocation handed to dispatch layer"
        );
        Ok(())
    }
}

#[derive(Debug, Default)]
struct ReplaySummary {
    routed_events: usize,
    malformed_lines: usize,
    dispatch_failures: usize,
}

async fn replay_events(historian: &Historian, events_file: &Path) -> Result<ReplaySummary> {
    let raw = std::fs::read_to_string(events_file)
        .with_context(|| format!("failed to read {}", events_file.display()))?;

    let mut summary = ReplaySummary::default();
    for (index, line) in raw.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let event = match serde_json::from_str::<InboundEvent>(trimmed) {
            Ok(event) => event,
            Err(error) => {
                summary.malformed_lines = summary.malformed_lines.saturating_add(1);
                eprintln!(
                    "event replay parse failure: file={} line={} detail={error}",
                    events_file.display(),
                    index + 1
                );
                continue;
            }
        };
        match historian.route_event(event).await {
            Ok(()) => summary.routed_events = summary.routed_events.saturating_add(1),
            Err(error) => {
                summary.dispatch_failures = summary.dispatch_failures.saturating_add(1);
                eprintln!(
                    "event replay dispatch failure: file={} line={} detail={error:#}",
                    events_file.display(),
                    index + 1
                );
            }
        }
    }
    Ok(summary)
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let transport: Arc<dyn PlatformTransport> = if cli.dry_run {
        Arc::new(RecordingTransport::new())
    } else {
        let Some(bot_token) = cli.bot_token.clone().filter(|token| !token.trim().is_empty())
        else {
            bail!("--bot-token (or BOSUN_BOT_TOKEN) is required unless --dry-run is set");
        };
        Arc::new(RestTransport::new(RestTransportConfig {
            api_base: cli.api_base.clone(),
            bot_token,
            http_timeout_ms: cli.http_timeout_ms,
        })?)
    };

    let audit_log = Arc::new(AuditLog::new(cli.data_dir.join("commandlogs")));
    let (audit_handle, audit_task) = spawn_audit_writer(audit_log, cli.audit_queue_capacity);

    let historian = Historian::new(
        HistorianConfig {
            history_max_size: cli.history_max_size,
            command_prefix: cli.command_prefix.clone(),
            audit_enabled: cli.audit_enabled,
        },
        transport,
        Arc::new(LoggingDispatcher),
        Some(Arc::new(audit_handle) as Arc<dyn AuditSink>),
    )?;

    println!(
        "bosun startup: data_dir={} history_max_size={} command_prefix={} audit_enabled={} transport={}",
        cli.data_dir.display(),
        cli.history_max_size,
        cli.command_prefix,
        cli.audit_enabled,
        if cli.dry_run { "recording" } else { "rest" },
    );

    if let Some(events_file) = &cli.events_file {
        let summary = replay_events(&historian, events_file).await?;
        println!(
            "event replay summary: routed={} malformed={} dispatch_failures={}",
            summary.routed_events, summary.malformed_lines, summary.dispatch_failures
        );
        println!("{}", render_history_report(&historian.history_report()));
    }

    // The historian holds the last audit sender; dropping it lets the writer
    // drain and exit before we leave.
    drop(historian);
    audit_task.await.context("audit writer task failed")?;
    Ok(())
}
