//! Append-only diary of engine mutations.
//!
//! # Responsibility
//! - Record every creation/update/level-change for history and debugging.
//!
//! # Invariants
//! - Entries are appended, never mutated or reordered.
//! - `entries` returns insertion order; `entries_by_time` sorts by
//!   timestamp. The source left this ambiguous per call site, so both
//!   contracts are explicit methods here.
//! - `clear` empties the log without emitting.

use crate::model::diary::{DiaryEntry, DiaryEntryId};
use crate::signal::{Signal, SubscriberId};
use serde_json::Value;

/// Notifications emitted by [`Diary`].
#[derive(Debug, Clone, PartialEq)]
pub enum DiaryNotification {
    Logged(DiaryEntry),
}

/// Append-only audit log.
#[derive(Default)]
pub struct Diary {
    entries: Vec<DiaryEntry>,
    signal: Signal<DiaryNotification>,
}

impl Diary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to appended entries.
    pub fn on_change(
        &mut self,
        handler: impl FnMut(&DiaryNotification) + 'static,
    ) -> SubscriberId {
        self.signal.connect(handler)
    }

    /// Removes one subscriber.
    pub fn off(&mut self, id: SubscriberId) -> bool {
        self.signal.disconnect(id)
    }

    /// Appends one entry and emits it.
    pub fn log(
        &mut self,
        kind: impl Into<String>,
        timestamp_ms: f64,
        payload: Value,
    ) -> DiaryEntryId {
        let entry = DiaryEntry::new(kind, timestamp_ms, payload);
        let id = entry.id;
        self.signal.emit(&DiaryNotification::Logged(entry.clone()));
        self.entries.push(entry);
        id
    }

    /// Defensive copy in insertion order.
    pub fn entries(&self) -> Vec<DiaryEntry> {
        self.entries.clone()
    }

    /// Defensive copy sorted by timestamp (stable for equal times).
    pub fn entries_by_time(&self) -> Vec<DiaryEntry> {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|a, b| {
            a.timestamp_ms
                .partial_cmp(&b.timestamp_ms)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        sorted
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Empties the log. Does not emit.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::{Diary, DiaryNotification};
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn log_appends_and_emits() {
        let kinds = Rc::new(RefCell::new(Vec::new()));
        let mut diary = Diary::new();
        let sink = Rc::clone(&kinds);
        diary.on_change(move |notification| {
            let DiaryNotification::Logged(entry) = notification;
            sink.borrow_mut().push(entry.kind.clone());
        });

        diary.log("event-created", 10.0, json!({"event": "a"}));
        diary.log("level", 20.0, json!({"level": 3}));

        assert_eq!(diary.len(), 2);
        assert_eq!(*kinds.borrow(), vec!["event-created", "level"]);
    }

    #[test]
    fn insertion_and_time_order_reads_differ() {
        let mut diary = Diary::new();
        diary.log("late", 900.0, json!({}));
        diary.log("early", 100.0, json!({}));

        let inserted = diary.entries();
        assert_eq!(inserted[0].kind, "late");

        let by_time = diary.entries_by_time();
        assert_eq!(by_time[0].kind, "early");
    }

    #[test]
    fn clear_empties_without_emitting() {
        let emissions = Rc::new(RefCell::new(0u32));
        let mut diary = Diary::new();
        diary.log("seed", 0.0, json!({}));

        let sink = Rc::clone(&emissions);
        diary.on_change(move |_| *sink.borrow_mut() += 1);
        diary.clear();

        assert!(diary.is_empty());
        assert_eq!(*emissions.borrow(), 0);
    }
}
