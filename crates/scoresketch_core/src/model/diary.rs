//! Diary (audit log) domain model.
//!
//! # Invariants
//! - Entries are append-only; never mutated or reordered after logging.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Stable identifier for one diary entry.
pub type DiaryEntryId = Uuid;

/// One append-only audit record of an engine mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiaryEntry {
    /// Stable entry id.
    pub id: DiaryEntryId,
    /// Free-form tag, e.g. `event-created` or `level`.
    pub kind: String,
    /// Media-clock time the mutation happened at, in milliseconds.
    pub timestamp_ms: f64,
    /// Untyped payload snapshot of the mutation.
    pub payload: Value,
}

impl DiaryEntry {
    /// Creates an entry with a generated id.
    pub fn new(kind: impl Into<String>, timestamp_ms: f64, payload: Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: kind.into(),
            timestamp_ms,
            payload,
        }
    }
}
