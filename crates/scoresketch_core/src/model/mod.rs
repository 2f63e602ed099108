//! Unified domain model for the performance-notation engine.
//!
//! # Responsibility
//! - Define canonical data structures shared by every engine.
//! - Keep one event-centric shape for capture, propagation and rendering.
//!
//! # Invariants
//! - Every domain object is identified by a stable id.
//! - Events and symbols are never hard-deleted during a session; snapshot
//!   load replaces collections wholesale.

pub mod diary;
pub mod event;
pub mod lane;
pub mod render;
pub mod symbol;
