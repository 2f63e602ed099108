//! Capture session: explicit wiring of every engine.
//!
//! # Responsibility
//! - Own one instance of each engine and coordinate cross-engine flows
//!   (capture, profile attachment, matching, propagation, persistence).
//! - Append a diary record for every mutation that flows through it.
//!
//! # Invariants
//! - Engines are constructed and injected explicitly; there are no
//!   global singletons.
//! - External triggers supply media-clock times; the session never reads
//!   the wall clock.
//! - Snapshot load replaces events and symbols wholesale, and only after
//!   both collections loaded successfully.

use crate::engine::contour::{classify, ContourClassifier};
use crate::engine::diary::Diary;
use crate::engine::event_store::EventStore;
use crate::engine::lane_registry::LaneRegistry;
use crate::engine::progression::Progression;
use crate::engine::propagator::{generate_fingerprint, PatternPropagator};
use crate::engine::render::{self, RenderSettingsEngine};
use crate::engine::rhythm::{RhythmProfile, RhythmProfiler};
use crate::engine::symbol_library::SymbolLibrary;
use crate::model::event::{Event, EventId, PitchContour};
use crate::model::render::{NotationFrame, RenderSettings, RenderSettingsUpdate};
use crate::model::symbol::{Point, Stroke, SymbolId};
use crate::repo::snapshot_repo::{RepoResult, SnapshotRepository};
use log::info;
use serde_json::json;

/// One live capture session over a media timeline.
pub struct CaptureSession {
    lanes: LaneRegistry,
    events: EventStore,
    symbols: SymbolLibrary,
    rhythm: RhythmProfiler,
    contour: ContourClassifier,
    propagator: PatternPropagator,
    render: RenderSettingsEngine,
    diary: Diary,
    progression: Progression,
}

impl CaptureSession {
    /// Creates a session with a band-seeded lane registry.
    pub fn new() -> Self {
        Self::with_lanes(LaneRegistry::with_band_lanes())
    }

    /// Creates a session around an injected lane registry.
    pub fn with_lanes(lanes: LaneRegistry) -> Self {
        Self {
            lanes,
            events: EventStore::new(),
            symbols: SymbolLibrary::new(),
            rhythm: RhythmProfiler::new(),
            contour: ContourClassifier::new(),
            propagator: PatternPropagator::new(),
            render: RenderSettingsEngine::new(),
            diary: Diary::new(),
            progression: Progression::new(),
        }
    }

    // Engine access for subscription wiring and direct queries.

    pub fn lanes(&self) -> &LaneRegistry {
        &self.lanes
    }

    pub fn lanes_mut(&mut self) -> &mut LaneRegistry {
        &mut self.lanes
    }

    pub fn events(&self) -> &EventStore {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventStore {
        &mut self.events
    }

    pub fn symbols(&self) -> &SymbolLibrary {
        &self.symbols
    }

    pub fn symbols_mut(&mut self) -> &mut SymbolLibrary {
        &mut self.symbols
    }

    pub fn propagator_mut(&mut self) -> &mut PatternPropagator {
        &mut self.propagator
    }

    pub fn render_settings(&self) -> RenderSettings {
        self.render.settings()
    }

    pub fn render_mut(&mut self) -> &mut RenderSettingsEngine {
        &mut self.render
    }

    pub fn diary(&self) -> &Diary {
        &self.diary
    }

    pub fn diary_mut(&mut self) -> &mut Diary {
        &mut self.diary
    }

    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    pub fn progression_mut(&mut self) -> &mut Progression {
        &mut self.progression
    }

    // Capture flows.

    /// Captures an event at `time_ms` on the default lane.
    pub fn mark_event(&mut self, time_ms: f64) -> EventId {
        let lane_id = self.lanes.resolve_default_lane();
        self.mark_event_on(time_ms, lane_id)
    }

    /// Captures an event at `time_ms`, routed by a continuous value
    /// (e.g. detected pitch) through the band thresholds.
    pub fn mark_event_for_frequency(&mut self, time_ms: f64, freq: f64) -> EventId {
        let lane_id = self.lanes.lane_for_frequency(freq);
        self.mark_event_on(time_ms, lane_id)
    }

    fn mark_event_on(&mut self, time_ms: f64, lane_id: String) -> EventId {
        let id = self.events.mark_event(time_ms, lane_id.clone());
        self.diary.log(
            "event-created",
            time_ms,
            json!({ "event_id": id, "lane_id": lane_id }),
        );
        id
    }

    /// Moves an event to another lane. A no-op when the lane id is
    /// unknown to the registry; never an error.
    pub fn assign_event_to_lane(&mut self, event_id: &EventId, lane_id: &str) {
        if !self.lanes.contains(lane_id) {
            return;
        }
        let Some(event) = self.events.get_event(event_id) else {
            return;
        };
        self.events
            .update_event_lane(event_id, lane_id.to_string());
        self.diary.log(
            "event-updated",
            event.timestamp_ms,
            json!({ "event_id": event_id, "lane_id": lane_id }),
        );
    }

    // Rhythm capture bracket.

    /// Begins a tap capture, clearing any stale buffer.
    pub fn start_tap_capture(&mut self, base_time_ms: Option<f64>) {
        self.rhythm.start_capture(base_time_ms);
    }

    /// Records one tap at `at_ms`.
    pub fn tap(&mut self, at_ms: f64) {
        self.rhythm.tap(at_ms);
    }

    /// Ends the tap capture and attaches the derived profile to the
    /// event. Unknown event ids still derive (and return) the profile.
    pub fn attach_rhythm(&mut self, event_id: &EventId) -> RhythmProfile {
        let profile = self.rhythm.stop_capture();
        if let Some(event) = self.events.get_event(event_id) {
            self.events
                .update_event_rhythm(event_id, profile.intervals.clone());
            self.diary.log(
                "event-updated",
                event.timestamp_ms,
                json!({ "event_id": event_id, "rhythm": profile.fingerprint }),
            );
        }
        profile
    }

    /// Classifies a finished stroke and attaches the contour label.
    pub fn attach_contour(&mut self, event_id: &EventId, points: &[Point]) -> PitchContour {
        let label = classify(points);
        self.attach_pitch(event_id, label);
        label
    }

    /// Starts an incremental stroke on the live drawing surface.
    pub fn begin_drawing(&mut self) {
        self.contour.begin_drawing();
    }

    /// Appends one point to the in-flight stroke.
    pub fn add_drawing_point(&mut self, x: f64, y: f64) {
        self.contour.add_point(x, y);
    }

    /// Ends the in-flight stroke and attaches its label to the event.
    pub fn finish_drawing(&mut self, event_id: &EventId) -> PitchContour {
        let label = self.contour.end_drawing();
        self.attach_pitch(event_id, label);
        label
    }

    fn attach_pitch(&mut self, event_id: &EventId, label: PitchContour) {
        let Some(event) = self.events.get_event(event_id) else {
            return;
        };
        self.events.update_event_pitch(event_id, label);
        self.diary.log(
            "event-updated",
            event.timestamp_ms,
            json!({ "event_id": event_id, "pitch": label.label() }),
        );
    }

    /// Attaches a texture tag supplied by an external capture source.
    pub fn attach_texture(&mut self, event_id: &EventId, texture: &str) {
        let Some(event) = self.events.get_event(event_id) else {
            return;
        };
        self.events.update_event_texture(event_id, texture);
        self.diary.log(
            "event-updated",
            event.timestamp_ms,
            json!({ "event_id": event_id, "texture": texture }),
        );
    }

    // Symbols.

    /// Stores a drawn symbol and logs its creation at `at_ms`.
    pub fn create_symbol(&mut self, strokes: Vec<Stroke>, at_ms: f64) -> SymbolId {
        let id = self.symbols.create_symbol(strokes, None);
        self.diary
            .log("symbol-created", at_ms, json!({ "symbol_id": id }));
        id
    }

    /// Computes and stores the event's fingerprint, then exact-matches
    /// it against the symbol library, assigning the first hit.
    pub fn match_symbol(&mut self, event_id: &EventId) -> Option<SymbolId> {
        let event = self.events.get_event(event_id)?;
        let fingerprint = generate_fingerprint(&event);
        self.events.set_fingerprint(event_id, fingerprint.clone());

        let matched = self.symbols.find_matching_symbol(&fingerprint)?;
        self.events.assign_symbol(event_id, matched);
        self.diary.log(
            "symbol-matched",
            event.timestamp_ms,
            json!({ "event_id": event_id, "symbol_id": matched, "fingerprint": fingerprint }),
        );
        Some(matched)
    }

    // Propagation.

    /// Emits fingerprint-annotated copies of the whole track.
    pub fn scan_track(&mut self) -> Vec<Event> {
        self.propagator.scan_track(&self.events)
    }

    /// Clones a recognized pattern one fixed offset later. Unknown ids
    /// yield an empty list.
    pub fn propagate(&mut self, event_id: &EventId) -> Vec<EventId> {
        let created = self.propagator.propagate(&mut self.events, event_id);
        for clone_id in &created {
            if let Some(clone) = self.events.get_event(clone_id) {
                self.diary.log(
                    "event-propagated",
                    clone.timestamp_ms,
                    json!({ "source_id": event_id, "event_id": clone_id }),
                );
            }
        }
        created
    }

    // Rendering and progression.

    /// Moves the abstraction level; logged at `at_ms`.
    pub fn set_render_level(&mut self, level: u8, at_ms: f64) -> RenderSettings {
        let settings = self.render.set_level(level);
        self.diary
            .log("level", at_ms, json!({ "render_level": settings.level }));
        settings
    }

    /// Bulk-merges render settings; logged at `at_ms`.
    pub fn update_render_settings(
        &mut self,
        update: &RenderSettingsUpdate,
        at_ms: f64,
    ) -> RenderSettings {
        let settings = self.render.apply(update);
        self.diary
            .log("settings", at_ms, json!({ "render_level": settings.level }));
        settings
    }

    /// Raises the progression level by one; logged at `at_ms`.
    pub fn request_level_increase(&mut self, reason: &str, at_ms: f64) -> u8 {
        let level = self.progression.request_level_increase(reason);
        self.diary.log(
            "level",
            at_ms,
            json!({ "progression_level": level, "reason": reason }),
        );
        level
    }

    /// Projects one frame at `time_ms`. Pure; never mutates state.
    pub fn render_frame(&self, time_ms: f64) -> NotationFrame {
        render::render_frame(time_ms, &self.lanes, &self.events, &self.render.settings())
    }

    // Persistence.

    /// Saves both collections wholesale under their fixed keys.
    pub fn save_snapshot(&self, repo: &dyn SnapshotRepository) -> RepoResult<()> {
        repo.save_events(&self.events.get_all_events())?;
        repo.save_symbols(&self.symbols.get_all_symbols())?;
        info!(
            "event=snapshot_save module=session status=ok events={} symbols={}",
            self.events.len(),
            self.symbols.len()
        );
        Ok(())
    }

    /// Replaces both collections from the repository. State is only
    /// touched after both loads succeed; a corrupt payload leaves the
    /// session unchanged and surfaces to the caller.
    pub fn load_snapshot(&mut self, repo: &dyn SnapshotRepository) -> RepoResult<()> {
        let events = repo.load_events()?;
        let symbols = repo.load_symbols()?;
        info!(
            "event=snapshot_load module=session status=ok events={} symbols={}",
            events.len(),
            symbols.len()
        );
        self.events.replace_all(events);
        self.symbols.replace_all(symbols);
        Ok(())
    }
}

impl Default for CaptureSession {
    fn default() -> Self {
        Self::new()
    }
}
