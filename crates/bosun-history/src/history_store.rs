use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex, MutexGuard},
};

use thiserror::Error;

use bosun_contract::{InboundMessage, MessageRef};
use bosun_core::preview_text;

pub const DEFAULT_HISTORY_MAX_SIZE: usize = 100;

const SNAPSHOT_PREVIEW_CHARS: usize = 48;

#[derive(Debug, Error, PartialEq, Eq)]
/// Enumerates supported `HistoryStoreError` values.
pub enum HistoryStoreError {
    #[error("history bound must be greater than 1, requested {requested}")]
    InvalidConfig { requested: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One tracked invocation: the invoking message plus every reply the bot sent
/// while handling it. Outputs are appended in send order and never reordered.
pub struct HistoryEntry {
    pub invocation: InboundMessage,
    pub outputs: Vec<MessageRef>,
}

impl HistoryEntry {
    pub fn new(invocation: InboundMessage) -> Self {
        Self {
            invocation,
            outputs: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Read-only diagnostic row describing one tracked entry.
pub struct HistorySnapshotRow {
    pub message_id: String,
    pub author_id: String,
    pub author_display: String,
    pub content_preview: String,
    pub output_count: usize,
    pub timestamp_ms: u64,
}

#[derive(Debug)]
struct HistoryStoreInner {
    max_size: usize,
    entries: HashMap<String, HistoryEntry>,
    insertion_order: VecDeque<String>,
}

#[derive(Debug, Clone)]
/// Bounded, insertion-ordered map from invocation message id to its
/// `HistoryEntry`. One coarse lock covers every operation; no I/O ever runs
/// under the lock. Clones share the same underlying store.
pub struct HistoryStore {
    inner: Arc<Mutex<HistoryStoreInner>>,
}

impl HistoryStore {
    pub fn new(max_size: usize) -> Result<Self, HistoryStoreError> {
        if max_size <= 1 {
            return Err(HistoryStoreError::InvalidConfig {
                requested: max_size,
            });
        }
        Ok(Self {
            inner: Arc::new(Mutex::new(HistoryStoreInner {
                max_size,
                entries: HashMap::new(),
                insertion_order: VecDeque::new(),
            })),
        })
    }

    fn lock(&self) -> MutexGuard<'_, HistoryStoreInner> {
        // A poisoning panic can only happen between pure map mutations, which
        // leave the map and order queue consistent; recover the guard.
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Inserts `entry` keyed by its invocation message id. Returns the evicted
    /// oldest entry when the bound was exceeded. Re-insert under an existing
    /// key overwrites in place without touching insertion order; each
    /// invocation carries a fresh platform message id, so that path is a
    /// collision safety net rather than a supported flow.
    pub fn insert(&self, entry: HistoryEntry) -> Option<HistoryEntry> {
        let key = entry.invocation.message_id.clone();
        let mut inner = self.lock();
        if inner.entries.insert(key.clone(), entry).is_some() {
            return None;
        }
        inner.insertion_order.push_back(key);
        evict_to_bound(&mut inner).pop()
    }

    pub fn get(&self, message_id: &str) -> Option<HistoryEntry> {
        self.lock().entries.get(message_id).cloned()
    }

    pub fn contains(&self, message_id: &str) -> bool {
        self.lock().entries.contains_key(message_id)
    }

    /// Appends a reply reference to the tracked entry. Returns false when the
    /// invocation is unknown (already evicted or correlated away); a miss is
    /// an expected outcome, not an error.
    pub fn append_output(&self, message_id: &str, output: MessageRef) -> bool {
        let mut inner = self.lock();
        match inner.entries.get_mut(message_id) {
            Some(entry) => {
                entry.outputs.push(output);
                true
            }
            None => false,
        }
    }

    pub fn remove(&self, message_id: &str) -> Option<HistoryEntry> {
        let mut inner = self.lock();
        let entry = inner.entries.remove(message_id)?;
        inner.insertion_order.retain(|key| key.as_str() != message_id);
        Some(entry)
    }

    /// Rebounds the store. Shrinking below current occupancy evicts oldest
    /// entries until the new bound holds; returns how many were evicted.
    pub fn set_max_size(&self, max_size: usize) -> Result<usize, HistoryStoreError> {
        if max_size <= 1 {
            return Err(HistoryStoreError::InvalidConfig {
                requested: max_size,
            });
        }
        let mut inner = self.lock();
        inner.max_size = max_size;
        Ok(evict_to_bound(&mut inner).len())
    }

    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.insertion_order.clear();
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.lock().max_size
    }

    /// Insertion-ordered diagnostic dump of the current contents.
    pub fn snapshot(&self) -> Vec<HistorySnapshotRow> {
        let inner = self.lock();
        inner
            .insertion_order
            .iter()
            .filter_map(|key| inner.entries.get(key))
            .map(|entry| HistorySnapshotRow {
                message_id: entry.invocation.message_id.clone(),
                author_id: entry.invocation.author_id.clone(),
                author_display: entry.invocation.author_display.clone(),
                content_preview: preview_text(&entry.invocation.content, SNAPSHOT_PREVIEW_CHARS),
                output_count: entry.outputs.len(),
                timestamp_ms: entry.invocation.timestamp_ms,
            })
            .collect()
    }
}

fn evict_to_bound(inner: &mut HistoryStoreInner) -> Vec<HistoryEntry> {
    let mut evicted = Vec::new();
    while inner.entries.len() > inner.max_size {
        let Some(oldest) = inner.insertion_order.pop_front() else {
            break;
        };
        if let Some(entry) = inner.entries.remove(&oldest) {
            evicted.push(entry);
        }
    }
    evicted
}
