//! Central mutable ledger of performance events.
//!
//! # Responsibility
//! - Own every captured event for the session.
//! - Funnel all mutation through one merge-and-replace routine.
//!
//! # Invariants
//! - Events are stored in call order, not timestamp order; chronological
//!   views must sort at read time.
//! - Events are never deleted in normal operation; snapshot load is the
//!   only wholesale replacement.
//! - Updates against unknown ids are silent no-ops and emit nothing.

use crate::model::event::{Event, EventId, PitchContour};
use crate::model::lane::LaneId;
use crate::model::symbol::SymbolId;
use crate::signal::{Signal, SubscriberId};
use log::debug;

/// Notifications emitted by [`EventStore`].
#[derive(Debug, Clone, PartialEq)]
pub enum EventNotification {
    /// A new event entered the ledger.
    Created(Event),
    /// Post-merge snapshot of an updated event.
    Updated(Event),
}

/// The session's event ledger.
#[derive(Default)]
pub struct EventStore {
    events: Vec<Event>,
    signal: Signal<EventNotification>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to ledger notifications.
    pub fn on_change(
        &mut self,
        handler: impl FnMut(&EventNotification) + 'static,
    ) -> SubscriberId {
        self.signal.connect(handler)
    }

    /// Removes one subscriber.
    pub fn off(&mut self, id: SubscriberId) -> bool {
        self.signal.disconnect(id)
    }

    /// Creates an event at the supplied media-clock time on the given
    /// lane and returns its id. The time is taken as-is, never replaced
    /// by wall-clock time.
    pub fn mark_event(&mut self, timestamp_ms: f64, lane_id: LaneId) -> EventId {
        let event = Event::new(timestamp_ms, lane_id);
        let id = event.id;
        debug!(
            "event=mark module=event_store status=ok event_id={id} time_ms={timestamp_ms}"
        );
        self.signal.emit(&EventNotification::Created(event.clone()));
        self.events.push(event);
        id
    }

    /// Moves an event to another lane.
    pub fn update_event_lane(&mut self, id: &EventId, lane_id: LaneId) {
        self.merge(id, |event| event.lane_id = lane_id);
    }

    /// Attaches a normalized rhythm profile.
    pub fn update_event_rhythm(&mut self, id: &EventId, profile: Vec<f64>) {
        self.merge(id, |event| event.rhythm_profile = Some(profile));
    }

    /// Attaches a pitch-contour label.
    pub fn update_event_pitch(&mut self, id: &EventId, contour: PitchContour) {
        self.merge(id, |event| event.pitch_profile = Some(contour));
    }

    /// Attaches a free-form texture tag.
    pub fn update_event_texture(&mut self, id: &EventId, texture: impl Into<String>) {
        let texture = texture.into();
        self.merge(id, |event| event.texture_profile = Some(texture));
    }

    /// Links a matched symbol.
    pub fn assign_symbol(&mut self, id: &EventId, symbol_id: SymbolId) {
        self.merge(id, |event| event.symbol_id = Some(symbol_id));
    }

    /// Stores a computed pattern fingerprint.
    pub fn set_fingerprint(&mut self, id: &EventId, fingerprint: impl Into<String>) {
        let fingerprint = fingerprint.into();
        self.merge(id, |event| event.fingerprint = Some(fingerprint));
    }

    /// Looks up one event by id.
    pub fn get_event(&self, id: &EventId) -> Option<Event> {
        self.events.iter().find(|event| event.id == *id).cloned()
    }

    /// Returns a defensive copy of the ledger in insertion order.
    pub fn get_all_events(&self) -> Vec<Event> {
        self.events.clone()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Replaces the whole ledger; used by snapshot load. Never merges.
    pub fn replace_all(&mut self, events: Vec<Event>) {
        self.events = events;
    }

    /// Single internal merge-and-replace routine behind every update.
    /// Unknown ids fall through without mutation or emission.
    fn merge(&mut self, id: &EventId, apply: impl FnOnce(&mut Event)) {
        let Some(event) = self.events.iter_mut().find(|event| event.id == *id) else {
            return;
        };
        apply(event);
        let snapshot = event.clone();
        self.signal.emit(&EventNotification::Updated(snapshot));
    }
}
