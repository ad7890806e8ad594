//! In-memory body store.
//!
//! # Invariants
//! - Mutations hold the write lock for their whole duration, so at most one
//!   is in flight; reads share the read lock and never see partial writes.
//! - Ids are allocated while the write lock is held, keeping map order equal
//!   to insertion order.
//! - Batch inserts apply completely or not at all.

use crate::model::celestial_body::{BodyId, CelestialBody};
use crate::repo::body_repo::{CelestialBodyRepository, RepoError, RepoResult};
use crate::repo::identity::{IdentityAllocator, MonotonicAllocator};
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread-safe body store backed by an ordered map.
pub struct InMemoryBodyRepository<A: IdentityAllocator = MonotonicAllocator> {
    bodies: RwLock<BTreeMap<BodyId, CelestialBody>>,
    ids: A,
}

impl InMemoryBodyRepository {
    /// Creates an empty store allocating ids from 1.
    pub fn new() -> Self {
        Self::with_allocator(MonotonicAllocator::new())
    }
}

impl Default for InMemoryBodyRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: IdentityAllocator> InMemoryBodyRepository<A> {
    /// Creates an empty store using a caller-provided allocator.
    pub fn with_allocator(ids: A) -> Self {
        Self {
            bodies: RwLock::new(BTreeMap::new()),
            ids,
        }
    }

    fn read(&self) -> RepoResult<RwLockReadGuard<'_, BTreeMap<BodyId, CelestialBody>>> {
        self.bodies.read().map_err(|_| RepoError::LockPoisoned)
    }

    fn write(&self) -> RepoResult<RwLockWriteGuard<'_, BTreeMap<BodyId, CelestialBody>>> {
        self.bodies.write().map_err(|_| RepoError::LockPoisoned)
    }

    /// Validates all candidates, then allocates and inserts under one write
    /// guard. Nothing is inserted unless every id was allocated.
    fn insert_batch(
        &self,
        candidates: &[CelestialBody],
        only_if_empty: bool,
    ) -> RepoResult<Vec<CelestialBody>> {
        for candidate in candidates {
            candidate.validate()?;
        }

        let mut bodies = self.write()?;
        if only_if_empty && !bodies.is_empty() {
            return Ok(Vec::new());
        }

        let mut stored: Vec<CelestialBody> = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let id = self.ids.next_id()?;
            if bodies.contains_key(&id) || stored.iter().any(|body| body.id == Some(id)) {
                return Err(RepoError::InvalidData(format!(
                    "allocator returned id {id} which is already in use"
                )));
            }
            stored.push(candidate.stored_as(id));
        }
        for body in &stored {
            if let Some(id) = body.id {
                bodies.insert(id, body.clone());
            }
        }
        Ok(stored)
    }
}

impl<A: IdentityAllocator> CelestialBodyRepository for InMemoryBodyRepository<A> {
    fn create_body(&self, body: &CelestialBody) -> RepoResult<CelestialBody> {
        let mut stored = self.insert_batch(std::slice::from_ref(body), false)?;
        stored
            .pop()
            .ok_or_else(|| RepoError::InvalidData("single create stored nothing".to_string()))
    }

    fn create_bodies(&self, bodies: &[CelestialBody]) -> RepoResult<Vec<CelestialBody>> {
        self.insert_batch(bodies, false)
    }

    fn create_bodies_if_empty(&self, bodies: &[CelestialBody]) -> RepoResult<Vec<CelestialBody>> {
        self.insert_batch(bodies, true)
    }

    fn get_body(&self, id: BodyId) -> RepoResult<CelestialBody> {
        self.read()?
            .get(&id)
            .cloned()
            .ok_or(RepoError::NotFound(id))
    }

    fn update_body(&self, id: BodyId, body: &CelestialBody) -> RepoResult<CelestialBody> {
        let mut bodies = self.write()?;
        let slot = bodies.get_mut(&id).ok_or(RepoError::NotFound(id))?;
        body.validate()?;

        *slot = body.stored_as(id);
        Ok(slot.clone())
    }

    fn delete_body(&self, id: BodyId) -> RepoResult<()> {
        self.write()?
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound(id))
    }

    fn count_bodies(&self) -> RepoResult<u64> {
        Ok(self.read()?.len() as u64)
    }

    fn list_page(&self, after: Option<BodyId>, limit: usize) -> RepoResult<Vec<CelestialBody>> {
        let lower = after.map_or(Bound::Unbounded, Bound::Excluded);
        Ok(self
            .read()?
            .range((lower, Bound::Unbounded))
            .take(limit)
            .map(|(_, body)| body.clone())
            .collect())
    }
}
