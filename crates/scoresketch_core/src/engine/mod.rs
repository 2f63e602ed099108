//! Capture, derivation and rendering engines.
//!
//! # Responsibility
//! - Own the mutable session state (events, lanes, symbols, diary).
//! - Derive symbolic profiles from raw gesture data.
//! - Project render-ready frames without mutating state.
//!
//! # Invariants
//! - All mutation is synchronous and single-threaded; ordering is call
//!   order, never timestamp order.
//! - Operations against unknown ids are silent no-ops and emit nothing.

pub mod contour;
pub mod diary;
pub mod event_store;
pub mod lane_registry;
pub mod progression;
pub mod propagator;
pub mod render;
pub mod rhythm;
pub mod session;
pub mod symbol_library;
