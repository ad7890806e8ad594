//! Data-access core for the solar system catalog.
//! This crate is the single source of truth for celestial body invariants.

pub mod catalog;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::celestial_body::{BodyId, CelestialBody};
pub use model::validation::{validate_body, FieldViolation, ValidationError};
pub use repo::body_repo::{BodyCursor, CelestialBodyRepository, RepoError, RepoResult};
pub use repo::identity::{IdentityAllocator, MonotonicAllocator, SqliteSequenceAllocator};
pub use repo::memory_repo::InMemoryBodyRepository;
pub use repo::sqlite_repo::SqliteBodyRepository;
pub use service::body_service::BodyService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
