//! User-authored symbol domain model.
//!
//! # Responsibility
//! - Define the stroke geometry and metadata for one drawn symbol.
//! - Provide the partial-update shape used by replace-on-id merges.
//!
//! # Invariants
//! - Symbols are immutable except through full replace-on-id updates;
//!   last write wins.

use crate::model::event::PitchContour;
use crate::model::lane::LaneId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a user-authored symbol.
pub type SymbolId = Uuid;

/// One 2-D point on the capture surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One continuous freehand stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// Ordered points in capture order.
    pub points: Vec<Point>,
    /// Optional averaged pen pressure for the stroke.
    pub pressure: Option<f32>,
}

impl Stroke {
    pub fn new(points: Vec<Point>) -> Self {
        Self {
            points,
            pressure: None,
        }
    }
}

/// One user-authored symbol definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    /// Stable global id referenced by events.
    pub id: SymbolId,
    /// Drawn geometry, in authoring order.
    pub strokes: Vec<Stroke>,
    /// Lane this symbol prefers when assigned automatically.
    pub lane_preferred: Option<LaneId>,
    /// Rhythm profile linked from a captured event.
    pub rhythm_profile: Option<Vec<f64>>,
    /// Pitch contour linked from a captured event.
    pub pitch_profile: Option<PitchContour>,
    /// Free-form texture tag.
    pub texture_profile: Option<String>,
    /// Free-form grouping category.
    pub category: Option<String>,
    /// Exact-match key used by library lookups.
    pub fingerprint: Option<String>,
}

impl Symbol {
    /// Creates a symbol with a generated stable id and no linked profiles.
    pub fn new(strokes: Vec<Stroke>, fingerprint: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            strokes,
            lane_preferred: None,
            rhythm_profile: None,
            pitch_profile: None,
            texture_profile: None,
            category: None,
            fingerprint,
        }
    }
}

/// Partial update applied to an existing symbol as a replace-on-id merge.
///
/// Fields left as `None` keep the stored value; present fields overwrite
/// it. There is no way to clear a stored field back to `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolUpdate {
    pub strokes: Option<Vec<Stroke>>,
    pub lane_preferred: Option<LaneId>,
    pub rhythm_profile: Option<Vec<f64>>,
    pub pitch_profile: Option<PitchContour>,
    pub texture_profile: Option<String>,
    pub category: Option<String>,
    pub fingerprint: Option<String>,
}
