//! Ordered lane registry and frequency-to-lane mapping.
//!
//! # Responsibility
//! - Maintain the named, z-ordered tracks events are grouped under.
//! - Map a continuous value (e.g. pitch in a MIDI-like range) to a lane
//!   through fixed band thresholds.
//!
//! # Invariants
//! - Structural changes and visibility toggles both emit a full-list
//!   snapshot (the source was asymmetric here; see DESIGN.md).
//! - A default lane is synthesized when none exists; the registry never
//!   hands out an id it cannot account for.

use crate::model::lane::{Lane, LaneId};
use crate::signal::{Signal, SubscriberId};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Lane id synthesized when an event is marked before any lane exists.
pub const DEFAULT_LANE_ID: &str = "lane-default";

/// Frequency band boundaries; exclusive lower bounds.
const HIGH_BAND_MIN: f64 = 72.0;
const MID_BAND_MIN: f64 = 48.0;
const LOW_BAND_MIN: f64 = 24.0;

/// Pitch-register band a continuous value falls into.
///
/// Bands are mutually exclusive and exhaustive over the real line:
/// `>72 -> High`, `>48 -> Mid`, `>24 -> Low`, else `Bass`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Band {
    High,
    Mid,
    Low,
    Bass,
}

impl Band {
    /// Classifies a continuous value into its band.
    pub fn for_frequency(freq: f64) -> Self {
        if freq > HIGH_BAND_MIN {
            Self::High
        } else if freq > MID_BAND_MIN {
            Self::Mid
        } else if freq > LOW_BAND_MIN {
            Self::Low
        } else {
            Self::Bass
        }
    }

    /// Fallback lane id used when no explicit mapping was configured.
    pub fn fallback_lane_id(self) -> &'static str {
        match self {
            Self::High => "lane-high",
            Self::Mid => "lane-mid",
            Self::Low => "lane-low",
            Self::Bass => "lane-bass",
        }
    }
}

/// Notifications emitted by [`LaneRegistry`].
#[derive(Debug, Clone, PartialEq)]
pub enum LaneNotification {
    /// Full lane-list snapshot after any lane change.
    LanesChanged(Vec<Lane>),
}

/// Ordered, named horizontal tracks.
#[derive(Default)]
pub struct LaneRegistry {
    lanes: Vec<Lane>,
    band_lanes: BTreeMap<Band, LaneId>,
    signal: Signal<LaneNotification>,
}

impl LaneRegistry {
    /// Creates an empty registry; the default lane is synthesized lazily.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry pre-seeded with one lane per band, stacked
    /// bass-to-high, and the band mapping wired to them.
    pub fn with_band_lanes() -> Self {
        let mut registry = Self::new();
        for (z, band) in [Band::Bass, Band::Low, Band::Mid, Band::High]
            .into_iter()
            .enumerate()
        {
            let id: LaneId = band.fallback_lane_id().to_string();
            registry.lanes.push(Lane::new(id.clone(), z as i32));
            registry.band_lanes.insert(band, id);
        }
        registry
    }

    /// Subscribes to lane-change snapshots.
    pub fn on_change(
        &mut self,
        handler: impl FnMut(&LaneNotification) + 'static,
    ) -> SubscriberId {
        self.signal.connect(handler)
    }

    /// Removes one subscriber.
    pub fn off(&mut self, id: SubscriberId) -> bool {
        self.signal.disconnect(id)
    }

    /// Adds a lane stacked above every existing lane and returns its id.
    pub fn add_lane_above(&mut self) -> LaneId {
        let z_order = self
            .lanes
            .iter()
            .map(|lane| lane.z_order)
            .max()
            .map_or(0, |max| max + 1);
        self.insert_lane(z_order)
    }

    /// Adds a lane stacked below every existing lane and returns its id.
    pub fn add_lane_below(&mut self) -> LaneId {
        let z_order = self
            .lanes
            .iter()
            .map(|lane| lane.z_order)
            .min()
            .map_or(0, |min| min - 1);
        self.insert_lane(z_order)
    }

    fn insert_lane(&mut self, z_order: i32) -> LaneId {
        let id: LaneId = format!("lane-{}", Uuid::new_v4());
        self.lanes.push(Lane::new(id.clone(), z_order));
        self.emit_snapshot();
        id
    }

    /// Shows or hides one lane. Unknown ids are silent no-ops.
    pub fn set_lane_visible(&mut self, id: &str, visible: bool) {
        let Some(lane) = self.lanes.iter_mut().find(|lane| lane.id == id) else {
            return;
        };
        if lane.visible == visible {
            return;
        }
        lane.visible = visible;
        self.emit_snapshot();
    }

    /// Returns whether a lane id is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.lanes.iter().any(|lane| lane.id == id)
    }

    /// Returns a defensive copy of all lanes in registration order.
    pub fn lanes(&self) -> Vec<Lane> {
        self.lanes.clone()
    }

    /// Returns the lane new events land on, synthesizing the default
    /// lane when the registry is empty.
    pub fn resolve_default_lane(&mut self) -> LaneId {
        if self.lanes.is_empty() {
            self.lanes.push(Lane::new(DEFAULT_LANE_ID, 0));
            self.emit_snapshot();
        }
        self.lanes[0].id.clone()
    }

    /// Routes a band to an explicit lane for frequency mapping.
    pub fn set_band_lane(&mut self, band: Band, lane_id: impl Into<LaneId>) {
        self.band_lanes.insert(band, lane_id.into());
    }

    /// Maps a continuous value to a lane id by fixed band thresholds,
    /// falling back to the per-band default id when unconfigured.
    pub fn lane_for_frequency(&self, freq: f64) -> LaneId {
        let band = Band::for_frequency(freq);
        self.band_lanes
            .get(&band)
            .cloned()
            .unwrap_or_else(|| band.fallback_lane_id().to_string())
    }

    fn emit_snapshot(&mut self) {
        let snapshot = LaneNotification::LanesChanged(self.lanes.clone());
        self.signal.emit(&snapshot);
    }
}
