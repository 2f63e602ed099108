//! Adaptive render settings and frame projection models.
//!
//! # Responsibility
//! - Derive boolean rendering capabilities from one abstraction scalar.
//! - Define the render-ready frame shape consumed by presentation layers.
//!
//! # Invariants
//! - `level` is clamped to 0..=100, never rejected.
//! - Capability booleans are recomputed from `level`; callers can only
//!   override them through a bulk merge, never individually.
//!
//! The source system carried two unreconciled level mappings (continuous
//! thresholds and a discrete stage counter). The continuous-threshold
//! model is canonical here; see DESIGN.md.

use crate::model::event::{EventId, PitchContour};
use crate::model::lane::LaneId;
use crate::model::symbol::SymbolId;
use serde::{Deserialize, Serialize};

/// Abstraction level ceiling.
pub const MAX_LEVEL: u8 = 100;

/// Non-overlapping ascending unlock thresholds for the capability flags.
pub const LINES_THRESHOLD: u8 = 10;
pub const SNAP_RHYTHM_THRESHOLD: u8 = 30;
pub const SNAP_PITCH_THRESHOLD: u8 = 45;
pub const STAFF_THRESHOLD: u8 = 60;
pub const NOTEHEADS_THRESHOLD: u8 = 80;

/// Rendering capabilities derived from the abstraction level.
///
/// `level` is the only externally driven field; everything else is a
/// deterministic function of it unless overridden in a bulk merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderSettings {
    /// Abstraction scalar, 0 (ad-hoc user symbols) to 100 (staff).
    pub level: u8,
    /// Draw faint guide lines under the gesture trail.
    pub show_lines: bool,
    /// Draw a conventional five-line staff.
    pub show_staff: bool,
    /// Replace user glyphs with conventional noteheads.
    pub show_noteheads: bool,
    /// Quantize vertical placement to lane centers.
    pub snap_pitch: bool,
    /// Quantize horizontal placement to the rhythm grid.
    pub snap_rhythm: bool,
}

impl RenderSettings {
    /// Derives the full settings record from one abstraction level.
    pub fn from_level(level: u8) -> Self {
        let level = level.min(MAX_LEVEL);
        Self {
            level,
            show_lines: level >= LINES_THRESHOLD,
            show_staff: level >= STAFF_THRESHOLD,
            show_noteheads: level >= NOTEHEADS_THRESHOLD,
            snap_pitch: level >= SNAP_PITCH_THRESHOLD,
            snap_rhythm: level >= SNAP_RHYTHM_THRESHOLD,
        }
    }

    /// Applies a bulk merge: a present `level` recomputes every flag
    /// first, then explicit boolean overrides are layered on top.
    pub fn merged(self, update: &RenderSettingsUpdate) -> Self {
        let mut next = match update.level {
            Some(level) => Self::from_level(level),
            None => self,
        };
        if let Some(value) = update.show_lines {
            next.show_lines = value;
        }
        if let Some(value) = update.show_staff {
            next.show_staff = value;
        }
        if let Some(value) = update.show_noteheads {
            next.show_noteheads = value;
        }
        if let Some(value) = update.snap_pitch {
            next.snap_pitch = value;
        }
        if let Some(value) = update.snap_rhythm {
            next.snap_rhythm = value;
        }
        next
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self::from_level(0)
    }
}

/// Bulk-merge update for [`RenderSettings`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderSettingsUpdate {
    pub level: Option<u8>,
    pub show_lines: Option<bool>,
    pub show_staff: Option<bool>,
    pub show_noteheads: Option<bool>,
    pub snap_pitch: Option<bool>,
    pub snap_rhythm: Option<bool>,
}

impl RenderSettingsUpdate {
    /// Convenience update that only moves the abstraction level.
    pub fn level(level: u8) -> Self {
        Self {
            level: Some(level),
            ..Self::default()
        }
    }
}

/// One render-ready glyph in a projected frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameGlyph {
    /// Source event id, for hit-testing in the presentation layer.
    pub event_id: EventId,
    /// Horizontal placement: the event timestamp in milliseconds.
    pub x: f64,
    /// Vertical placement: the lane z-order.
    pub y: i32,
    /// Matched symbol to draw, when one exists.
    pub symbol_id: Option<SymbolId>,
    /// Contour hint for glyph orientation.
    pub pitch_path: Option<PitchContour>,
}

/// One projected lane with its glyphs, already filtered and ordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameLane {
    pub lane_id: LaneId,
    pub z_order: i32,
    pub glyphs: Vec<FrameGlyph>,
}

/// One coherent frame of notation at a point on the media clock.
///
/// Pure projection: producing a frame never mutates engine state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotationFrame {
    /// Media-clock time this frame was projected at.
    pub time_ms: f64,
    /// Settings snapshot the frame was projected under.
    pub settings: RenderSettings,
    /// Visible lanes sorted by descending z-order.
    pub lanes: Vec<FrameLane>,
}

#[cfg(test)]
mod tests {
    use super::{RenderSettings, RenderSettingsUpdate};

    #[test]
    fn level_five_unlocks_nothing() {
        let settings = RenderSettings::from_level(5);
        assert!(!settings.show_lines);
        assert!(!settings.show_staff);
        assert!(!settings.show_noteheads);
        assert!(!settings.snap_pitch);
        assert!(!settings.snap_rhythm);
    }

    #[test]
    fn level_sixty_five_unlocks_lines_and_staff_but_not_noteheads() {
        let settings = RenderSettings::from_level(65);
        assert!(settings.show_lines);
        assert!(settings.show_staff);
        assert!(!settings.show_noteheads);
        assert!(settings.snap_pitch);
        assert!(settings.snap_rhythm);
    }

    #[test]
    fn level_is_clamped_to_ceiling() {
        let settings = RenderSettings::from_level(250);
        assert_eq!(settings.level, 100);
        assert!(settings.show_noteheads);
    }

    #[test]
    fn merge_applies_level_before_boolean_overrides() {
        let base = RenderSettings::from_level(0);
        let update = RenderSettingsUpdate {
            level: Some(90),
            show_noteheads: Some(false),
            ..RenderSettingsUpdate::default()
        };
        let merged = base.merged(&update);
        assert_eq!(merged.level, 90);
        assert!(merged.show_staff);
        assert!(!merged.show_noteheads, "explicit override wins over level");
    }
}
