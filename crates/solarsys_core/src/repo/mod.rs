//! Record store contracts and backends.
//!
//! # Responsibility
//! - Define the storage-agnostic CRUD contract for celestial bodies.
//! - Provide in-memory and SQLite backends that honor the same contract.
//! - Allocate identifiers through a swappable `IdentityAllocator`.
//!
//! # Invariants
//! - Write paths run `CelestialBody::validate()` before mutating state.
//! - A failed operation leaves the store unchanged.
//! - Missing identifiers surface as `RepoError::NotFound`, never as `None`.

pub mod body_repo;
pub mod identity;
pub mod memory_repo;
pub mod sqlite_repo;
