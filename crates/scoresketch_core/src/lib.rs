//! Adaptive performance-notation engine core.
//! This crate is the single source of truth for capture, derivation and
//! rendering invariants; UI and media layers consume it over the
//! subscription and persistence contracts only.

pub mod db;
pub mod engine;
pub mod logging;
pub mod model;
pub mod repo;
pub mod signal;

pub use engine::contour::{classify, classify_strict, ContourClassifier};
pub use engine::diary::{Diary, DiaryNotification};
pub use engine::event_store::{EventNotification, EventStore};
pub use engine::lane_registry::{Band, LaneNotification, LaneRegistry, DEFAULT_LANE_ID};
pub use engine::progression::{Progression, ProgressionNotification, MAX_PROGRESSION_LEVEL};
pub use engine::propagator::{
    generate_fingerprint, PatternPropagator, PropagatorNotification, PROPAGATION_OFFSET_MS,
};
pub use engine::render::{render_frame, RenderNotification, RenderSettingsEngine};
pub use engine::rhythm::{RhythmProfile, RhythmProfiler};
pub use engine::session::CaptureSession;
pub use engine::symbol_library::{SymbolLibrary, SymbolNotification};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::diary::{DiaryEntry, DiaryEntryId};
pub use model::event::{Event, EventId, PitchContour};
pub use model::lane::{Lane, LaneId};
pub use model::render::{
    FrameGlyph, FrameLane, NotationFrame, RenderSettings, RenderSettingsUpdate,
};
pub use model::symbol::{Point, Stroke, Symbol, SymbolId, SymbolUpdate};
pub use repo::snapshot_repo::{
    RepoError, RepoResult, SnapshotRepository, SqliteSnapshotRepository, EVENTS_KEY, SYMBOLS_KEY,
};
pub use signal::{Signal, SubscriberId};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
