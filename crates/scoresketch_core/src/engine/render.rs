//! Render settings engine and pure frame projection.
//!
//! # Responsibility
//! - Hold the current abstraction level and derived capability flags.
//! - Project one render-ready notation frame from engine state.
//!
//! # Invariants
//! - `render_frame` is a pure function of its inputs: no mutation,
//!   idempotent for a fixed event/lane snapshot, safe at arbitrary and
//!   repeated times.
//! - A frame only contains events with `timestamp_ms <= time`, on
//!   visible lanes, sorted by descending z-order.

use crate::engine::event_store::EventStore;
use crate::engine::lane_registry::LaneRegistry;
use crate::model::render::{
    FrameGlyph, FrameLane, NotationFrame, RenderSettings, RenderSettingsUpdate,
};
use crate::signal::{Signal, SubscriberId};

/// Notifications emitted by [`RenderSettingsEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderNotification {
    /// Post-merge settings snapshot.
    SettingsChanged(RenderSettings),
}

/// Holds the adaptive render settings for the session.
#[derive(Default)]
pub struct RenderSettingsEngine {
    settings: RenderSettings,
    signal: Signal<RenderNotification>,
}

impl RenderSettingsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to settings changes.
    pub fn on_change(
        &mut self,
        handler: impl FnMut(&RenderNotification) + 'static,
    ) -> SubscriberId {
        self.signal.connect(handler)
    }

    /// Removes one subscriber.
    pub fn off(&mut self, id: SubscriberId) -> bool {
        self.signal.disconnect(id)
    }

    /// Current settings snapshot.
    pub fn settings(&self) -> RenderSettings {
        self.settings
    }

    /// Moves the abstraction level and recomputes every capability flag.
    pub fn set_level(&mut self, level: u8) -> RenderSettings {
        self.apply(&RenderSettingsUpdate::level(level))
    }

    /// Bulk-merges a partial update and emits the merged snapshot.
    pub fn apply(&mut self, update: &RenderSettingsUpdate) -> RenderSettings {
        self.settings = self.settings.merged(update);
        self.signal
            .emit(&RenderNotification::SettingsChanged(self.settings));
        self.settings
    }
}

/// Projects one coherent frame of notation at `time_ms`.
pub fn render_frame(
    time_ms: f64,
    registry: &LaneRegistry,
    store: &EventStore,
    settings: &RenderSettings,
) -> NotationFrame {
    let mut lanes = registry.lanes();
    lanes.retain(|lane| lane.visible);
    lanes.sort_by(|a, b| b.z_order.cmp(&a.z_order));

    let events = store.get_all_events();
    let frame_lanes = lanes
        .into_iter()
        .map(|lane| {
            let glyphs = events
                .iter()
                .filter(|event| event.lane_id == lane.id && event.timestamp_ms <= time_ms)
                .map(|event| FrameGlyph {
                    event_id: event.id,
                    x: event.timestamp_ms,
                    y: lane.z_order,
                    symbol_id: event.symbol_id,
                    pitch_path: event.pitch_profile,
                })
                .collect();
            FrameLane {
                lane_id: lane.id,
                z_order: lane.z_order,
                glyphs,
            }
        })
        .collect();

    NotationFrame {
        time_ms,
        settings: *settings,
        lanes: frame_lanes,
    }
}

#[cfg(test)]
mod tests {
    use super::{render_frame, RenderNotification, RenderSettingsEngine};
    use crate::engine::event_store::EventStore;
    use crate::engine::lane_registry::LaneRegistry;
    use crate::model::render::RenderSettingsUpdate;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn settings_engine_emits_merged_snapshots() {
        let levels = Rc::new(RefCell::new(Vec::new()));
        let mut engine = RenderSettingsEngine::new();
        let sink = Rc::clone(&levels);
        engine.on_change(move |notification| {
            let RenderNotification::SettingsChanged(settings) = notification;
            sink.borrow_mut().push(settings.level);
        });

        engine.set_level(65);
        engine.apply(&RenderSettingsUpdate {
            snap_pitch: Some(false),
            ..RenderSettingsUpdate::default()
        });

        assert_eq!(*levels.borrow(), vec![65, 65]);
        assert!(!engine.settings().snap_pitch);
        assert!(engine.settings().show_staff);
    }

    #[test]
    fn frame_excludes_future_events_and_hidden_lanes() {
        let mut registry = LaneRegistry::new();
        let visible = registry.add_lane_above();
        let hidden = registry.add_lane_above();
        registry.set_lane_visible(&hidden, false);

        let mut store = EventStore::new();
        store.mark_event(100.0, visible.clone());
        store.mark_event(900.0, visible.clone());
        store.mark_event(100.0, hidden);

        let engine = RenderSettingsEngine::new();
        let frame = render_frame(500.0, &registry, &store, &engine.settings());

        assert_eq!(frame.lanes.len(), 1);
        assert_eq!(frame.lanes[0].lane_id, visible);
        assert_eq!(frame.lanes[0].glyphs.len(), 1);
        assert_eq!(frame.lanes[0].glyphs[0].x, 100.0);
    }

    #[test]
    fn frame_orders_lanes_by_descending_z() {
        let mut registry = LaneRegistry::new();
        let low = registry.add_lane_above();
        let high = registry.add_lane_above();

        let store = EventStore::new();
        let engine = RenderSettingsEngine::new();
        let frame = render_frame(0.0, &registry, &store, &engine.settings());

        assert_eq!(frame.lanes[0].lane_id, high);
        assert_eq!(frame.lanes[1].lane_id, low);
    }

    #[test]
    fn frame_projection_is_idempotent() {
        let mut registry = LaneRegistry::new();
        let lane = registry.add_lane_above();
        let mut store = EventStore::new();
        store.mark_event(10.0, lane);

        let engine = RenderSettingsEngine::new();
        let first = render_frame(50.0, &registry, &store, &engine.settings());
        let second = render_frame(50.0, &registry, &store, &engine.settings());
        assert_eq!(first, second);
    }
}
