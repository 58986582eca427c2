//! Command-history cache and message correlation for bosun.
//!
//! `HistoryStore` keeps a bounded, insertion-ordered map from invocation
//! message id to the replies that invocation produced. `CorrelationEngine`
//! reacts to invoked/edited/deleted platform events: it tracks fresh
//! invocations, deletes recorded replies when their invoking message goes
//! away, and re-dispatches edited invocations.

pub mod correlation;
pub mod history_store;

pub use correlation::CorrelationEngine;
pub use history_store::{
    HistoryEntry, HistorySnapshotRow, HistoryStore, HistoryStoreError, DEFAULT_HISTORY_MAX_SIZE,
};
