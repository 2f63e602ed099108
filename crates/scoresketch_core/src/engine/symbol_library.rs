//! User-authored symbol library and exact fingerprint matching.
//!
//! # Responsibility
//! - Store symbol definitions keyed by id.
//! - Answer exact-fingerprint lookups in insertion order.
//!
//! # Invariants
//! - Updates replace the whole stored record (last write wins); there is
//!   no patch-in-place path.
//! - Matching is exact string equality only; no fuzzy scoring.
//! - The backing store is a `Vec`, which makes first-match-in-insertion-
//!   order an explicit contract rather than map-iteration luck.

use crate::model::event::PitchContour;
use crate::model::symbol::{Stroke, Symbol, SymbolId, SymbolUpdate};
use crate::signal::{Signal, SubscriberId};

/// Notifications emitted by [`SymbolLibrary`].
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolNotification {
    Created(Symbol),
    Updated(Symbol),
}

/// Session store of user-authored symbols.
#[derive(Default)]
pub struct SymbolLibrary {
    symbols: Vec<Symbol>,
    signal: Signal<SymbolNotification>,
}

impl SymbolLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to library notifications.
    pub fn on_change(
        &mut self,
        handler: impl FnMut(&SymbolNotification) + 'static,
    ) -> SubscriberId {
        self.signal.connect(handler)
    }

    /// Removes one subscriber.
    pub fn off(&mut self, id: SubscriberId) -> bool {
        self.signal.disconnect(id)
    }

    /// Stores a new symbol and returns its fresh id.
    pub fn create_symbol(
        &mut self,
        strokes: Vec<Stroke>,
        fingerprint: Option<String>,
    ) -> SymbolId {
        let symbol = Symbol::new(strokes, fingerprint);
        let id = symbol.id;
        self.signal.emit(&SymbolNotification::Created(symbol.clone()));
        self.symbols.push(symbol);
        id
    }

    /// Merges an update into the stored record and re-stores it whole.
    /// Unknown ids are silent no-ops.
    pub fn update_symbol(&mut self, id: &SymbolId, update: SymbolUpdate) {
        let Some(position) = self.symbols.iter().position(|symbol| symbol.id == *id) else {
            return;
        };

        let mut replacement = self.symbols[position].clone();
        if let Some(strokes) = update.strokes {
            replacement.strokes = strokes;
        }
        if let Some(lane) = update.lane_preferred {
            replacement.lane_preferred = Some(lane);
        }
        if let Some(rhythm) = update.rhythm_profile {
            replacement.rhythm_profile = Some(rhythm);
        }
        if let Some(pitch) = update.pitch_profile {
            replacement.pitch_profile = Some(pitch);
        }
        if let Some(texture) = update.texture_profile {
            replacement.texture_profile = Some(texture);
        }
        if let Some(category) = update.category {
            replacement.category = Some(category);
        }
        if let Some(fingerprint) = update.fingerprint {
            replacement.fingerprint = Some(fingerprint);
        }

        self.symbols[position] = replacement.clone();
        self.signal.emit(&SymbolNotification::Updated(replacement));
    }

    /// Links derived profiles onto an existing symbol. Thin wrapper over
    /// the replace-on-id merge.
    pub fn link_profiles(
        &mut self,
        id: &SymbolId,
        rhythm_profile: Option<Vec<f64>>,
        pitch_profile: Option<PitchContour>,
        fingerprint: Option<String>,
    ) {
        self.update_symbol(
            id,
            SymbolUpdate {
                rhythm_profile,
                pitch_profile,
                fingerprint,
                ..SymbolUpdate::default()
            },
        );
    }

    /// Finds the first symbol whose fingerprint equals `fingerprint`
    /// exactly, scanning in insertion order.
    pub fn find_matching_symbol(&self, fingerprint: &str) -> Option<SymbolId> {
        self.symbols
            .iter()
            .find(|symbol| symbol.fingerprint.as_deref() == Some(fingerprint))
            .map(|symbol| symbol.id)
    }

    /// Looks up one symbol by id.
    pub fn get_symbol(&self, id: &SymbolId) -> Option<Symbol> {
        self.symbols.iter().find(|symbol| symbol.id == *id).cloned()
    }

    /// Returns a defensive copy of the library in insertion order.
    pub fn get_all_symbols(&self) -> Vec<Symbol> {
        self.symbols.clone()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Replaces the whole library; used by snapshot load. Never merges.
    pub fn replace_all(&mut self, symbols: Vec<Symbol>) {
        self.symbols = symbols;
    }
}

#[cfg(test)]
mod tests {
    use super::{SymbolLibrary, SymbolNotification};
    use crate::model::event::PitchContour;
    use crate::model::symbol::{Point, Stroke, SymbolUpdate};
    use std::cell::RefCell;
    use std::rc::Rc;
    use uuid::Uuid;

    fn stroke() -> Stroke {
        Stroke::new(vec![Point::new(0.0, 0.0), Point::new(10.0, 4.0)])
    }

    #[test]
    fn create_assigns_fresh_ids_and_emits_created() {
        let created = Rc::new(RefCell::new(0u32));
        let mut library = SymbolLibrary::new();
        let sink = Rc::clone(&created);
        library.on_change(move |notification| {
            if matches!(notification, SymbolNotification::Created(_)) {
                *sink.borrow_mut() += 1;
            }
        });

        let a = library.create_symbol(vec![stroke()], None);
        let b = library.create_symbol(vec![stroke()], None);
        assert_ne!(a, b);
        assert_eq!(*created.borrow(), 2);
    }

    #[test]
    fn first_match_wins_in_insertion_order() {
        let mut library = SymbolLibrary::new();
        let first = library.create_symbol(vec![stroke()], Some("lane-a:1-0.5:up".into()));
        let _second = library.create_symbol(vec![stroke()], Some("lane-a:1-0.5:up".into()));

        assert_eq!(
            library.find_matching_symbol("lane-a:1-0.5:up"),
            Some(first)
        );
        assert_eq!(library.find_matching_symbol("lane-a:1-0.5:down"), None);
    }

    #[test]
    fn update_replaces_record_and_keeps_unset_fields() {
        let mut library = SymbolLibrary::new();
        let id = library.create_symbol(vec![stroke()], Some("old".into()));

        library.update_symbol(
            &id,
            SymbolUpdate {
                category: Some("accent".into()),
                ..SymbolUpdate::default()
            },
        );

        let symbol = library.get_symbol(&id).expect("symbol should exist");
        assert_eq!(symbol.category.as_deref(), Some("accent"));
        assert_eq!(symbol.fingerprint.as_deref(), Some("old"));
    }

    #[test]
    fn link_profiles_merges_derived_data() {
        let mut library = SymbolLibrary::new();
        let id = library.create_symbol(vec![stroke()], None);

        library.link_profiles(
            &id,
            Some(vec![1.0, 0.5]),
            Some(PitchContour::Up),
            Some("lane-a:1-0.5:up".into()),
        );

        let symbol = library.get_symbol(&id).expect("symbol should exist");
        assert_eq!(symbol.rhythm_profile, Some(vec![1.0, 0.5]));
        assert_eq!(symbol.pitch_profile, Some(PitchContour::Up));
    }

    #[test]
    fn unknown_id_update_is_a_silent_no_op() {
        let emissions = Rc::new(RefCell::new(0u32));
        let mut library = SymbolLibrary::new();
        library.create_symbol(vec![stroke()], None);

        let sink = Rc::clone(&emissions);
        library.on_change(move |_| *sink.borrow_mut() += 1);

        let before = library.get_all_symbols();
        library.update_symbol(
            &Uuid::new_v4(),
            SymbolUpdate {
                category: Some("ghost".into()),
                ..SymbolUpdate::default()
            },
        );

        assert_eq!(library.get_all_symbols(), before);
        assert_eq!(*emissions.borrow(), 0);
    }
}
