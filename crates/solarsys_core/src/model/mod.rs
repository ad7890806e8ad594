//! Domain model for stored celestial bodies.
//!
//! # Responsibility
//! - Define the canonical record persisted by every store backend.
//! - Own the field constraints that gate admission into a store.
//!
//! # Invariants
//! - A stored body is identified by exactly one `BodyId`.
//! - Identifiers are never reused, even after hard deletion.

pub mod celestial_body;
pub mod validation;
