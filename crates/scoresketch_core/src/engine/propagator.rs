//! Pattern fingerprinting and cross-time propagation.
//!
//! # Responsibility
//! - Derive a deterministic fingerprint per event from lane, rhythm and
//!   pitch profiles.
//! - Clone a recognized pattern to a new point on the timeline.
//!
//! # Invariants
//! - `generate_fingerprint` is pure: equal events yield identical
//!   strings, with no hidden state.
//! - `scan_track` never mutates the store; it annotates copies.
//! - Propagation offsets by a fixed 1000 ms, not tempo-relative. A
//!   deliberate simplification carried over from the source behavior.
//! - Propagating an unknown id returns an empty list and leaves the
//!   store untouched.

use crate::engine::event_store::EventStore;
use crate::model::event::{join_intervals, Event, EventId};
use crate::signal::{Signal, SubscriberId};
use log::debug;

/// Fixed clone offset on the media clock.
pub const PROPAGATION_OFFSET_MS: f64 = 1000.0;

/// Placeholder used in fingerprints when a profile is absent.
const MISSING_PROFILE: &str = "none";

/// Derives the pattern fingerprint for one event.
///
/// Shape: `lane_id:rhythm:pitch`, where rhythm is the `-`-joined
/// normalized interval list and either part falls back to `none`.
pub fn generate_fingerprint(event: &Event) -> String {
    let rhythm = event
        .rhythm_profile
        .as_deref()
        .map(join_intervals)
        .unwrap_or_else(|| MISSING_PROFILE.to_string());
    let pitch = event
        .pitch_profile
        .map(|contour| contour.label().to_string())
        .unwrap_or_else(|| MISSING_PROFILE.to_string());
    format!("{}:{}:{}", event.lane_id, rhythm, pitch)
}

/// Notifications emitted by [`PatternPropagator`].
#[derive(Debug, Clone, PartialEq)]
pub enum PropagatorNotification {
    /// Fingerprint-annotated copy of the whole track.
    Scanned(Vec<Event>),
    /// Clones created from one source event.
    Propagated {
        source_id: EventId,
        created: Vec<Event>,
    },
}

/// Scans the event ledger for patterns and clones them across time.
#[derive(Default)]
pub struct PatternPropagator {
    signal: Signal<PropagatorNotification>,
}

impl PatternPropagator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to propagation notifications.
    pub fn on_change(
        &mut self,
        handler: impl FnMut(&PropagatorNotification) + 'static,
    ) -> SubscriberId {
        self.signal.connect(handler)
    }

    /// Removes one subscriber.
    pub fn off(&mut self, id: SubscriberId) -> bool {
        self.signal.disconnect(id)
    }

    /// Recomputes fingerprints for every event and emits annotated
    /// copies. The store itself is not mutated.
    pub fn scan_track(&mut self, store: &EventStore) -> Vec<Event> {
        let annotated: Vec<Event> = store
            .get_all_events()
            .into_iter()
            .map(|mut event| {
                event.fingerprint = Some(generate_fingerprint(&event));
                event
            })
            .collect();
        self.signal
            .emit(&PropagatorNotification::Scanned(annotated.clone()));
        annotated
    }

    /// Clones the source event one fixed offset later on the timeline.
    ///
    /// The clone gets a fresh id through the store's own `mark_event`,
    /// copies of the source profiles, and a freshly computed
    /// fingerprint. Returns the new id list; unknown source ids return
    /// an empty list without touching the store.
    pub fn propagate(&mut self, store: &mut EventStore, source_id: &EventId) -> Vec<EventId> {
        let Some(source) = store.get_event(source_id) else {
            return Vec::new();
        };

        let clone_time = source.timestamp_ms + PROPAGATION_OFFSET_MS;
        let clone_id = store.mark_event(clone_time, source.lane_id.clone());
        if let Some(rhythm) = source.rhythm_profile.clone() {
            store.update_event_rhythm(&clone_id, rhythm);
        }
        if let Some(pitch) = source.pitch_profile {
            store.update_event_pitch(&clone_id, pitch);
        }
        if let Some(texture) = source.texture_profile.clone() {
            store.update_event_texture(&clone_id, texture);
        }
        if let Some(symbol_id) = source.symbol_id {
            store.assign_symbol(&clone_id, symbol_id);
        }

        // Fingerprint the materialized clone, not the source, so lane
        // reassignments between now and then cannot go stale.
        if let Some(clone) = store.get_event(&clone_id) {
            store.set_fingerprint(&clone_id, generate_fingerprint(&clone));
        }

        debug!(
            "event=propagate module=propagator status=ok source_id={source_id} clone_id={clone_id} time_ms={clone_time}"
        );

        let created: Vec<Event> = store.get_event(&clone_id).into_iter().collect();
        self.signal.emit(&PropagatorNotification::Propagated {
            source_id: *source_id,
            created,
        });

        vec![clone_id]
    }
}
