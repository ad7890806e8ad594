//! Identifier allocation for stored bodies.
//!
//! # Responsibility
//! - Hand out identifiers that are unique for the lifetime of a store.
//! - Keep allocation swappable so backends can change without contract
//!   changes.
//!
//! # Invariants
//! - `next_id` is strictly increasing across calls and starts at 1.
//! - Identifiers of deleted bodies are never handed out again.

use crate::model::celestial_body::BodyId;
use crate::repo::body_repo::{RepoError, RepoResult};
use rusqlite::{Connection, OptionalExtension};
use std::sync::atomic::{AtomicI64, Ordering};

/// Name of the sequence row used for celestial body ids.
pub const BODY_SEQUENCE: &str = "celestial_bodies";

/// Source of unique body identifiers.
pub trait IdentityAllocator {
    /// Returns the next identifier.
    ///
    /// # Errors
    /// - `RepoError::IdentityExhausted` once `BodyId::MAX` was handed out.
    fn next_id(&self) -> RepoResult<BodyId>;
}

/// Process-local monotonic counter.
#[derive(Debug)]
pub struct MonotonicAllocator {
    last: AtomicI64,
}

impl MonotonicAllocator {
    /// Creates a counter whose first id is 1.
    pub fn new() -> Self {
        Self::starting_after(0)
    }

    /// Creates a counter whose first id is `last + 1`.
    ///
    /// Used when resuming allocation over pre-existing records.
    pub fn starting_after(last: BodyId) -> Self {
        Self {
            last: AtomicI64::new(last.max(0)),
        }
    }
}

impl Default for MonotonicAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityAllocator for MonotonicAllocator {
    fn next_id(&self) -> RepoResult<BodyId> {
        self.last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                last.checked_add(1)
            })
            .map(|previous| previous + 1)
            .map_err(|_| RepoError::IdentityExhausted)
    }
}

/// Backend sequence persisted in the `id_sequences` table.
///
/// Calls made inside an open transaction on the same connection are rolled
/// back together with that transaction.
pub struct SqliteSequenceAllocator<'conn> {
    conn: &'conn Connection,
    sequence: &'static str,
}

impl<'conn> SqliteSequenceAllocator<'conn> {
    /// Allocator over the celestial body sequence.
    pub fn new(conn: &'conn Connection) -> Self {
        Self::for_sequence(conn, BODY_SEQUENCE)
    }

    /// Allocator over an arbitrary named sequence row.
    pub fn for_sequence(conn: &'conn Connection, sequence: &'static str) -> Self {
        Self { conn, sequence }
    }

    /// Returns the last identifier handed out, `0` when none was.
    pub fn current(&self) -> RepoResult<BodyId> {
        self.conn
            .query_row(
                "SELECT last_value FROM id_sequences WHERE name = ?1;",
                [self.sequence],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| self.missing_sequence())
    }

    fn missing_sequence(&self) -> RepoError {
        RepoError::InvalidData(format!("id sequence `{}` does not exist", self.sequence))
    }
}

impl IdentityAllocator for SqliteSequenceAllocator<'_> {
    fn next_id(&self) -> RepoResult<BodyId> {
        let next: Option<BodyId> = self
            .conn
            .query_row(
                "UPDATE id_sequences
                 SET last_value = last_value + 1
                 WHERE name = ?1
                   AND last_value < ?2
                 RETURNING last_value;",
                rusqlite::params![self.sequence, BodyId::MAX],
                |row| row.get(0),
            )
            .optional()?;

        match next {
            Some(id) => Ok(id),
            None => {
                // Distinguish a saturated sequence from a missing row.
                self.current()?;
                Err(RepoError::IdentityExhausted)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{IdentityAllocator, MonotonicAllocator, SqliteSequenceAllocator};
    use crate::db::open_db_in_memory;
    use crate::repo::body_repo::RepoError;

    #[test]
    fn monotonic_starts_at_one_and_increases() {
        let ids = MonotonicAllocator::new();
        assert_eq!(ids.next_id().unwrap(), 1);
        assert_eq!(ids.next_id().unwrap(), 2);
        assert_eq!(ids.next_id().unwrap(), 3);
    }

    #[test]
    fn monotonic_reports_exhaustion() {
        let ids = MonotonicAllocator::starting_after(i64::MAX - 1);
        assert_eq!(ids.next_id().unwrap(), i64::MAX);
        assert!(matches!(ids.next_id(), Err(RepoError::IdentityExhausted)));
    }

    #[test]
    fn sqlite_sequence_persists_last_value() {
        let conn = open_db_in_memory().unwrap();
        let ids = SqliteSequenceAllocator::new(&conn);

        assert_eq!(ids.current().unwrap(), 0);
        assert_eq!(ids.next_id().unwrap(), 1);
        assert_eq!(ids.next_id().unwrap(), 2);
        assert_eq!(SqliteSequenceAllocator::new(&conn).current().unwrap(), 2);
    }

    #[test]
    fn sqlite_sequence_reports_exhaustion_and_missing_rows() {
        let conn = open_db_in_memory().unwrap();
        conn.execute(
            "UPDATE id_sequences SET last_value = ?1 WHERE name = 'celestial_bodies';",
            [i64::MAX],
        )
        .unwrap();

        let ids = SqliteSequenceAllocator::new(&conn);
        assert!(matches!(ids.next_id(), Err(RepoError::IdentityExhausted)));

        let missing = SqliteSequenceAllocator::for_sequence(&conn, "moons");
        assert!(matches!(missing.next_id(), Err(RepoError::InvalidData(_))));
    }
}
