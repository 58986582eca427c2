//! Custom console-command relay scenario against a scripted server bridge.

use std::collections::HashSet;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;

use bosun_console::{
    render_custom_command_report, run_custom_command, CommandLibrary, ServerBridge,
};

struct ScriptedBridge {
    up: HashSet<String>,
    sent: Mutex<Vec<(String, String)>>,
}

impl ScriptedBridge {
    fn new(up: &[&str]) -> Self {
        Self {
            up: up.iter().map(|server| server.to_string()).collect(),
            sent: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ServerBridge for ScriptedBridge {
    async fn is_up(&self, server: &str) -> bool {
        self.up.contains(server)
    }

    async fn send_command(&self, server: &str, command: &str) -> Result<()> {
        self.sent
            .lock()
            .expect("sent lock")
            .push((server.to_string(), command.to_string()));
        Ok(())
    }
}

#[tokio::test]
async fn integration_library_persists_and_relays_with_args() {
    let tempdir = tempfile::tempdir().expect("tempdir");
    let path = tempdir.path().join("customCmds.json");

    let mut library = CommandLibrary::load(path.clone()).expect("load");
    library
        .upsert(
            "announce-restart",
            vec!["say restarting in {} minutes".to_string(), "save-all".to_string()],
        )
        .expect("upsert");

    // Reload from disk the way a fresh process would.
    let library = CommandLibrary::load(path).expect("reload");
    let bridge = ScriptedBridge::new(&["vanilla"]);
    let configured = vec!["vanilla".to_string(), "modded".to_string()];

    let report = run_custom_command(
        &library,
        &bridge,
        &configured,
        "announce-restart",
        "all",
        &["ten".to_string()],
    )
    .await
    .expect("run");

    assert_eq!(report.executed_servers, 1);
    assert_eq!(report.skipped_offline, 1);
    assert_eq!(
        bridge.sent.lock().expect("sent lock").clone(),
        vec![
            (
                "vanilla".to_string(),
                "say restarting in ten minutes".to_string()
            ),
            ("vanilla".to_string(), "save-all".to_string()),
        ]
    );

    let rendered = render_custom_command_report(&report);
    assert!(rendered.starts_with("Command Log\n===========\n"));
    assert!(rendered.contains("[Info] Executed \"announce-restart\" on vanilla."));
    assert!(rendered.contains("[Error]: Unable to execute \"announce-restart\", modded is offline!"));
}
