use std::{
    collections::HashMap,
    io::Write,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use anyhow::{anyhow, Context, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
/// One audited command invocation. Append-only; never mutated after write.
pub struct AuditRecord {
    pub user_id: String,
    pub timestamp_ms: u64,
    pub command_text: String,
    pub failed: bool,
}

/// Renders the single-line serialization appended to a user's log file.
pub fn render_audit_line(record: &AuditRecord) -> String {
    format!(
        "cmd failed: {}; msg: \"{}\"",
        record.failed, record.command_text
    )
}

/// Per-user append-only log files rooted at one directory.
///
/// Writers to the same user's file are serialized behind that file's mutex;
/// different users only contend on the brief handle-map lookup.
pub struct AuditLog {
    root: PathBuf,
    files: Mutex<HashMap<String, Arc<Mutex<std::fs::File>>>>,
}

impl AuditLog {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            files: Mutex::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    pub fn append(&self, record: &AuditRecord) -> Result<()> {
        let handle = self.file_handle(&record.user_id)?;
        let mut file = handle
            .lock()
            .map_err(|_| anyhow!("audit file mutex is poisoned"))?;
        writeln!(file, "{}", render_audit_line(record)).with_context(|| {
            format!("failed to append audit record for user {}", record.user_id)
        })?;
        file.flush()
            .with_context(|| format!("failed to flush audit log for user {}", record.user_id))?;
        Ok(())
    }

    fn file_handle(&self, user_id: &str) -> Result<Arc<Mutex<std::fs::File>>> {
        let file_name = format!("{}.log", sanitize_for_path(user_id));
        let mut files = self
            .files
            .lock()
            .map_err(|_| anyhow!("audit handle map mutex is poisoned"))?;
        if let Some(handle) = files.get(&file_name) {
            return Ok(handle.clone());
        }

        std::fs::create_dir_all(&self.root)
            .with_context(|| format!("failed to create {}", self.root.display()))?;
        let path = self.root.join(&file_name);
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        let handle = Arc::new(Mutex::new(file));
        files.insert(file_name, handle.clone());
        Ok(handle)
    }
}

fn sanitize_for_path(raw: &str) -> String {
    let sanitized = raw
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || ch == '.' {
                ch
            } else {
                '_'
            }
        })
        .collect::<String>();
    let trimmed = sanitized.trim_matches('_');
    if trimmed.is_empty() {
        "user".to_string()
    } else {
        trimmed.to_string()
    }
}
