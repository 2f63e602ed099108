//! Lane domain model.
//!
//! # Invariants
//! - `z_order` values are never required to be contiguous.
//! - Higher `z_order` renders visually higher/forward.

use serde::{Deserialize, Serialize};

/// Stable identifier for a lane.
///
/// Kept as a string alias so synthesized default ids (`lane-default`,
/// per-band fallbacks) and generated uuid-derived ids share one type.
pub type LaneId = String;

/// One named, z-ordered horizontal track grouping events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lane {
    /// Stable lane id referenced by events.
    pub id: LaneId,
    /// Stacking order; higher draws above. Used for lane-selection
    /// tie-breaks as well as rendering.
    pub z_order: i32,
    /// Hidden lanes are skipped by the frame renderer.
    pub visible: bool,
}

impl Lane {
    /// Creates a visible lane at the given stacking position.
    pub fn new(id: impl Into<LaneId>, z_order: i32) -> Self {
        Self {
            id: id.into(),
            z_order,
            visible: true,
        }
    }
}
