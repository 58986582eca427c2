use anyhow::Result;

use crate::command_library::CommandLibrary;
use crate::server_bridge::ServerBridge;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Outcome of one custom-command run across its selected servers.
pub struct CustomCommandRunReport {
    pub command: String,
    pub target: String,
    pub rows: Vec<String>,
    pub executed_servers: usize,
    pub skipped_offline: usize,
    pub failed_sends: usize,
    pub undefined: bool,
}

/// Runs a library command against `target` (a configured server name, or
/// `all` for every configured server). Offline servers are skipped with an
/// error row; a send failure ends that server's sequence and the run moves on
/// to the next server. An undefined command name yields a report, not an
/// error.
pub async fn run_custom_command(
    library: &CommandLibrary,
    bridge: &dyn ServerBridge,
    configured_servers: &[String],
    name: &str,
    target: &str,
    args: &[String],
) -> Result<CustomCommandRunReport> {
    let mut report = CustomCommandRunReport {
        command: name.to_string(),
        target: target.to_string(),
        ..CustomCommandRunReport::default()
    };

    let Some(steps) = library.get(name) else {
        tracing::warn!(command = %name, "custom command is undefined");
        report.undefined = true;
        report.rows.push(format!("[Error]: \"{name}\" is undefined!"));
        return Ok(report);
    };

    let selected = if target.eq_ignore_ascii_case("all") {
        configured_servers.to_vec()
    } else if configured_servers.iter().any(|server| server == target) {
        vec![target.to_string()]
    } else {
        tracing::warn!(server = %target, "custom command target is not a configured server");
        report
            .rows
            .push(format!("[Error]: \"{target}\" is not a configured server!"));
        return Ok(report);
    };

    for server in &selected {
        if !bridge.is_up(server).await {
            tracing::warn!(command = %name, server = %server, "server offline, skipping");
            report.skipped_offline = report.skipped_offline.saturating_add(1);
            report.rows.push(format!(
                "[Error]: Unable to execute \"{name}\", {server} is offline!"
            ));
            continue;
        }

        tracing::info!(command = %name, server = %server, "executing custom command");
        let mut sequence_failed = false;
        for step in steps {
            let line = substitute_args(step, args);
            if let Err(error) = bridge.send_command(server, &line).await {
                tracing::warn!(
                    command = %name,
                    server = %server,
                    error = %error,
                    "console command relay failed"
                );
                sequence_failed = true;
                break;
            }
        }

        if sequence_failed {
            report.failed_sends = report.failed_sends.saturating_add(1);
            report.rows.push(format!(
                "[Error]: Execution of \"{name}\" failed on {server}!"
            ));
        } else {
            report.executed_servers = report.executed_servers.saturating_add(1);
            report
                .rows
                .push(format!("[Info] Executed \"{name}\" on {server}."));
        }
    }

    Ok(report)
}

/// Replaces successive `{}` placeholders with positional arguments; leftover
/// placeholders stay as-is when fewer arguments were given.
fn substitute_args(step: &str, args: &[String]) -> String {
    let mut result = String::with_capacity(step.len());
    let mut remainder = step;
    let mut next_arg = 0usize;
    while let Some(position) = remainder.find("{}") {
        result.push_str(&remainder[..position]);
        match args.get(next_arg) {
            Some(arg) => {
                result.push_str(arg);
                next_arg = next_arg.saturating_add(1);
            }
            None => result.push_str("{}"),
        }
        remainder = &remainder[position + 2..];
    }
    result.push_str(remainder);
    result
}

/// Renders the run report as the code-block body shown to the operator.
pub fn render_custom_command_report(report: &CustomCommandRunReport) -> String {
    let mut lines = vec!["Command Log".to_string(), "===========".to_string()];
    lines.extend(report.rows.iter().cloned());
    lines.join("\n")
}
