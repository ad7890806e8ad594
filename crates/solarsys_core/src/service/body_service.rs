//! Celestial body use-case service.
//!
//! # Responsibility
//! - Provide stable CRUD entry points for controller-layer callers.
//! - Emit one metadata-only log event per mutating use case.
//!
//! # Invariants
//! - Service APIs never bypass repository validation.
//! - Repository errors are returned unchanged.
//! - Log events never include body names or texture references.

use crate::catalog::solar_system;
use crate::model::celestial_body::{BodyId, CelestialBody};
use crate::repo::body_repo::{BodyCursor, CelestialBodyRepository, RepoResult};
use log::{debug, info, warn};

/// Use-case service over any body repository.
pub struct BodyService<R: CelestialBodyRepository> {
    repo: R,
}

impl<R: CelestialBodyRepository> BodyService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Borrows the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Validates and stores a new body, returning it with its assigned id.
    pub fn create_body(&self, body: &CelestialBody) -> RepoResult<CelestialBody> {
        let result = self.repo.create_body(body);
        log_outcome("body_create", result.as_ref().ok().and_then(|b| b.id), &result);
        result
    }

    /// Loads one body or fails with `NotFound`.
    pub fn get_body(&self, id: BodyId) -> RepoResult<CelestialBody> {
        self.repo.get_body(id)
    }

    /// Replaces all mutable fields of body `id`.
    pub fn update_body(&self, id: BodyId, body: &CelestialBody) -> RepoResult<CelestialBody> {
        let result = self.repo.update_body(id, body);
        log_outcome("body_update", Some(id), &result);
        result
    }

    /// Deletes body `id`; deleting an absent id is an error.
    pub fn delete_body(&self, id: BodyId) -> RepoResult<()> {
        let result = self.repo.delete_body(id);
        log_outcome("body_delete", Some(id), &result);
        result
    }

    /// Lazily iterates all bodies in insertion order.
    pub fn list_bodies(&self) -> BodyCursor<'_, R> {
        self.repo.list_bodies()
    }

    /// Collects every body, failing on the first read error.
    pub fn list_all(&self) -> RepoResult<Vec<CelestialBody>> {
        self.repo.list_bodies().collect()
    }

    /// Number of stored bodies.
    pub fn count_bodies(&self) -> RepoResult<u64> {
        self.repo.count_bodies()
    }

    /// Inserts the built-in solar system catalog into an empty store.
    ///
    /// Returns the number of bodies inserted; `0` when the store already
    /// holds data. The catalog is stored completely or not at all.
    pub fn seed_solar_system(&self) -> RepoResult<usize> {
        let inserted = match self.repo.create_bodies_if_empty(&solar_system()) {
            Ok(stored) => stored.len(),
            Err(err) => {
                warn!(
                    "event=catalog_seed module=service status=error error_code={}",
                    err.code()
                );
                return Err(err);
            }
        };

        if inserted == 0 {
            debug!("event=catalog_seed module=service status=skipped reason=store_not_empty");
        } else {
            info!("event=catalog_seed module=service status=ok inserted={inserted}");
        }
        Ok(inserted)
    }

    /// Stores all `bodies` as one step; nothing is stored on failure.
    pub fn create_bodies(&self, bodies: &[CelestialBody]) -> RepoResult<Vec<CelestialBody>> {
        let result = self.repo.create_bodies(bodies);
        match &result {
            Ok(stored) => info!(
                "event=body_create_batch module=service status=ok count={}",
                stored.len()
            ),
            Err(err) => warn!(
                "event=body_create_batch module=service status=error error_code={}",
                err.code()
            ),
        }
        result
    }
}

fn log_outcome<T>(event: &str, id: Option<BodyId>, result: &RepoResult<T>) {
    let id = id.map_or_else(|| "none".to_string(), |value| value.to_string());
    match result {
        Ok(_) => info!("event={event} module=service status=ok id={id}"),
        Err(err) => warn!(
            "event={event} module=service status=error id={id} error_code={}",
            err.code()
        ),
    }
}
