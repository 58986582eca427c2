use bosun_history::{HistorySnapshotRow, HistoryStoreError};

use crate::historian::Historian;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Read-only diagnostic view of the historian, rendered for the owner.
pub struct HistoryReport {
    pub size: usize,
    pub max_size: usize,
    pub audit_enabled: bool,
    pub rows: Vec<HistorySnapshotRow>,
}

impl Historian {
    pub fn history_report(&self) -> HistoryReport {
        HistoryReport {
            size: self.store().len(),
            max_size: self.store().max_size(),
            audit_enabled: self.engine().audit_enabled(),
            rows: self.store().snapshot(),
        }
    }

    /// Clears tracked history; with `new_max_size` also rebounds the store.
    /// An insufficient bound is rejected before anything is cleared, so the
    /// store is left untouched on failure.
    pub fn clear_history(&self, new_max_size: Option<usize>) -> Result<(), HistoryStoreError> {
        if let Some(requested) = new_max_size {
            if requested <= 1 {
                return Err(HistoryStoreError::InvalidConfig { requested });
            }
        }
        self.store().clear();
        if let Some(requested) = new_max_size {
            self.store().set_max_size(requested)?;
            tracing::info!(max_size = requested, "history cleared and rebounded");
        } else {
            tracing::info!("history cleared");
        }
        Ok(())
    }

    pub fn set_audit_enabled(&self, enabled: bool) {
        tracing::info!(enabled, "audit logging toggled");
        self.engine().set_audit_enabled(enabled);
    }

    pub fn audit_enabled(&self) -> bool {
        self.engine().audit_enabled()
    }
}

/// Renders the diagnostic dump as `key=value` summary plus one row per entry.
pub fn render_history_report(report: &HistoryReport) -> String {
    let mut lines = vec![format!(
        "history report: size={} max_size={} audit_enabled={}",
        report.size, report.max_size, report.audit_enabled
    )];
    for row in &report.rows {
        lines.push(format!(
            "history row: message_id={} author_id={} author_display={} outputs={} timestamp_ms={} content={}",
            row.message_id,
            row.author_id,
            row.author_display,
            row.output_count,
            row.timestamp_ms,
            row.content_preview,
        ));
    }
    lines.join("\n")
}
