//! Body repository contract, error taxonomy and lazy listing cursor.
//!
//! # Invariants
//! - `list_bodies` yields bodies in ascending id order, which is also
//!   insertion order because ids are allocated monotonically.
//! - The cursor holds no lock or statement between `next()` calls.

use crate::db::DbError;
use crate::model::celestial_body::{BodyId, CelestialBody};
use crate::model::validation::ValidationError;
use std::collections::VecDeque;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Default number of rows fetched per cursor page.
pub const LIST_PAGE_SIZE: usize = 64;

/// Result type used by body repository operations.
pub type RepoResult<T> = Result<T, RepoError>;

/// Error taxonomy for body store operations.
#[derive(Debug)]
pub enum RepoError {
    /// Candidate body violates one or more field constraints.
    Validation(ValidationError),
    /// No body is stored under the given id.
    NotFound(BodyId),
    /// Backend storage failure.
    Db(DbError),
    /// Persisted state cannot be converted into a valid body.
    InvalidData(String),
    /// Identifier space is used up.
    IdentityExhausted,
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// In-memory store lock was poisoned by a panicking writer.
    LockPoisoned,
}

impl RepoError {
    /// Stable short code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound(_) => "not_found",
            Self::Db(_) => "db",
            Self::InvalidData(_) => "invalid_data",
            Self::IdentityExhausted => "identity_exhausted",
            Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. } => "schema",
            Self::LockPoisoned => "lock_poisoned",
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "celestial body not found: {id}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted body data: {message}"),
            Self::IdentityExhausted => write!(f, "celestial body id sequence exhausted"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "body repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "body repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "body repository requires column `{column}` in table `{table}`"
            ),
            Self::LockPoisoned => write!(f, "body store lock poisoned"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage contract for celestial bodies.
///
/// Every operation is one indivisible step: callers never observe a
/// partially applied write.
pub trait CelestialBodyRepository {
    /// Validates `body`, assigns a fresh id and stores it.
    ///
    /// Any `id` already set on `body` is ignored.
    fn create_body(&self, body: &CelestialBody) -> RepoResult<CelestialBody>;
    /// Stores every body of `bodies`, in order, as one step.
    ///
    /// Either all bodies are stored or none is.
    fn create_bodies(&self, bodies: &[CelestialBody]) -> RepoResult<Vec<CelestialBody>>;
    /// Like `create_bodies`, but only when the store holds no body.
    ///
    /// Returns an empty list and stores nothing otherwise. The emptiness
    /// check runs in the same step as the inserts.
    fn create_bodies_if_empty(&self, bodies: &[CelestialBody]) -> RepoResult<Vec<CelestialBody>>;
    /// Loads one body.
    fn get_body(&self, id: BodyId) -> RepoResult<CelestialBody>;
    /// Replaces every mutable field of body `id`; the id itself is kept.
    ///
    /// Existence is checked before validation.
    fn update_body(&self, id: BodyId, body: &CelestialBody) -> RepoResult<CelestialBody>;
    /// Removes body `id`. Deleting an absent id is `NotFound`.
    fn delete_body(&self, id: BodyId) -> RepoResult<()>;
    /// Number of stored bodies.
    fn count_bodies(&self) -> RepoResult<u64>;
    /// Returns up to `limit` bodies with id greater than `after`, ascending.
    fn list_page(&self, after: Option<BodyId>, limit: usize) -> RepoResult<Vec<CelestialBody>>;

    /// Lazily iterates all stored bodies in ascending id order.
    fn list_bodies(&self) -> BodyCursor<'_, Self>
    where
        Self: Sized,
    {
        BodyCursor::new(self, LIST_PAGE_SIZE)
    }
}

/// Lazy keyset-paged iterator over a repository.
///
/// Bodies created while the cursor is still paging are yielded when their
/// id is larger than the last one returned. The cursor ends after a short
/// page or after the first error.
pub struct BodyCursor<'r, R: CelestialBodyRepository> {
    repo: &'r R,
    page_size: usize,
    after: Option<BodyId>,
    buffer: VecDeque<CelestialBody>,
    finished: bool,
}

impl<'r, R: CelestialBodyRepository> BodyCursor<'r, R> {
    /// Creates a cursor fetching `page_size` bodies per round trip.
    ///
    /// A zero page size is treated as 1.
    pub fn new(repo: &'r R, page_size: usize) -> Self {
        Self {
            repo,
            page_size: page_size.max(1),
            after: None,
            buffer: VecDeque::new(),
            finished: false,
        }
    }

    fn fill(&mut self) -> RepoResult<()> {
        let page = self.repo.list_page(self.after, self.page_size)?;
        if page.len() < self.page_size {
            self.finished = true;
        }
        match page.last().map(|last| last.id) {
            Some(Some(id)) => self.after = Some(id),
            Some(None) => {
                return Err(RepoError::InvalidData(
                    "listed body is missing its id".to_string(),
                ))
            }
            None => {}
        }
        self.buffer.extend(page);
        Ok(())
    }
}

impl<R: CelestialBodyRepository> Iterator for BodyCursor<'_, R> {
    type Item = RepoResult<CelestialBody>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.buffer.is_empty() && !self.finished {
            if let Err(err) = self.fill() {
                self.finished = true;
                return Some(Err(err));
            }
        }
        self.buffer.pop_front().map(Ok)
    }
}
