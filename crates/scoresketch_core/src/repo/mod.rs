//! Persistence contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define the whole-collection snapshot save/load contract.
//! - Isolate SQL details from the engines.
//!
//! # Invariants
//! - Loading always replaces in-memory state wholesale; there is no
//!   partial or merge semantics anywhere in this layer.
//! - Corrupt persisted JSON surfaces as a typed error; it is never
//!   masked or defaulted.

pub mod snapshot_repo;
