//! Performance event domain model.
//!
//! # Responsibility
//! - Define the canonical record for one captured performance gesture.
//! - Provide the pitch-contour vocabulary shared with symbols.
//!
//! # Invariants
//! - `id` is stable and never reused for another event.
//! - `timestamp_ms` reflects capture time on the media clock and is not
//!   monotonic across events; chronological views must sort explicitly.

use crate::model::lane::LaneId;
use crate::model::symbol::SymbolId;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a captured performance event.
pub type EventId = Uuid;

/// Coarse direction label derived from a freehand stroke.
///
/// The sign convention is screen-space: an increasing y coordinate (the
/// pen moving down the canvas) classifies as `Down`. This matches the
/// capture surface, not necessarily musical pitch direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PitchContour {
    /// Ending y is meaningfully above the starting y.
    Up,
    /// Ending y is meaningfully below the starting y.
    Down,
    /// Start and end y are within the flatness epsilon.
    Flat,
    /// Strict classification only: direction reverses mid-stroke.
    Mixed,
}

impl PitchContour {
    /// Stable lowercase label used in fingerprints and stored payloads.
    pub fn label(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Flat => "flat",
            Self::Mixed => "mixed",
        }
    }
}

impl Display for PitchContour {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One captured performance gesture with optional derived profiles.
///
/// Owned exclusively by the event store; mutated only through its update
/// operations. Profiles start empty and are attached by the profiling
/// engines after capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Stable global id used for linking, propagation and auditing.
    pub id: EventId,
    /// Capture time in milliseconds on the media clock.
    pub timestamp_ms: f64,
    /// Lane this event is currently assigned to.
    pub lane_id: LaneId,
    /// Normalized tap-interval profile, anchored to the first gap.
    pub rhythm_profile: Option<Vec<f64>>,
    /// Coarse stroke-direction label.
    pub pitch_profile: Option<PitchContour>,
    /// Free-form texture tag supplied by external capture sources.
    pub texture_profile: Option<String>,
    /// Matched user-authored symbol, when one exists.
    pub symbol_id: Option<SymbolId>,
    /// Last computed pattern fingerprint, when one was derived.
    pub fingerprint: Option<String>,
}

impl Event {
    /// Creates a bare event with a generated stable id and no profiles.
    pub fn new(timestamp_ms: f64, lane_id: LaneId) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp_ms,
            lane_id,
            rhythm_profile: None,
            pitch_profile: None,
            texture_profile: None,
            symbol_id: None,
            fingerprint: None,
        }
    }
}

/// Joins interval values with `-` using trimmed float formatting.
///
/// `[1.0, 0.5, 2.5]` renders as `"1-0.5-2.5"`; whole values drop the
/// fractional part entirely. Shared by the rhythm fingerprint and the
/// pattern fingerprint so both stay byte-identical for equal profiles.
pub fn join_intervals(intervals: &[f64]) -> String {
    intervals
        .iter()
        .map(|value| format!("{value}"))
        .collect::<Vec<_>>()
        .join("-")
}
