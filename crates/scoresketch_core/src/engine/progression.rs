//! Bounded progression level and named session settings.
//!
//! # Invariants
//! - The level is an integer 0..=10, monotonically non-decreasing; there
//!   is no decrease operation.
//! - Settings are an untyped key-value escape hatch with no validation.

use crate::signal::{Signal, SubscriberId};
use serde_json::Value;
use std::collections::BTreeMap;

/// Progression level ceiling.
pub const MAX_PROGRESSION_LEVEL: u8 = 10;

/// Notifications emitted by [`Progression`].
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressionNotification {
    /// New level and the caller-supplied reason.
    LevelChanged { level: u8, reason: String },
}

/// Tracks the bounded session level and arbitrary named settings.
#[derive(Default)]
pub struct Progression {
    level: u8,
    settings: BTreeMap<String, Value>,
    signal: Signal<ProgressionNotification>,
}

impl Progression {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to level changes.
    pub fn on_change(
        &mut self,
        handler: impl FnMut(&ProgressionNotification) + 'static,
    ) -> SubscriberId {
        self.signal.connect(handler)
    }

    /// Removes one subscriber.
    pub fn off(&mut self, id: SubscriberId) -> bool {
        self.signal.disconnect(id)
    }

    /// Current level.
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Increments the level by exactly 1, clamped at the ceiling, and
    /// emits the result with the supplied reason.
    pub fn request_level_increase(&mut self, reason: impl Into<String>) -> u8 {
        self.level = (self.level + 1).min(MAX_PROGRESSION_LEVEL);
        self.signal.emit(&ProgressionNotification::LevelChanged {
            level: self.level,
            reason: reason.into(),
        });
        self.level
    }

    /// Stores one named setting. No validation.
    pub fn set_setting(&mut self, key: impl Into<String>, value: Value) {
        self.settings.insert(key.into(), value);
    }

    /// Reads one named setting.
    pub fn get_setting(&self, key: &str) -> Option<Value> {
        self.settings.get(key).cloned()
    }
}
