//! SQLite-backed body store.
//!
//! # Responsibility
//! - Keep SQL details inside the persistence boundary.
//! - Refuse connections whose schema is not fully migrated.
//!
//! # Invariants
//! - Multi-statement mutations run in IMMEDIATE transactions, so one writer
//!   at a time holds the database and failures roll back completely.
//! - Read paths reject invalid persisted rows instead of masking them.

use crate::db::migrations::{latest_version, schema_version};
use crate::model::celestial_body::{BodyId, CelestialBody};
use crate::repo::body_repo::{CelestialBodyRepository, RepoError, RepoResult};
use crate::repo::identity::{IdentityAllocator, SqliteSequenceAllocator};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const BODY_SELECT_SQL: &str = "SELECT
    id,
    name,
    radius,
    orbit_radius,
    rotation_period,
    orbit_period,
    texture_url
FROM celestial_bodies";

const BODY_COLUMNS: &[&str] = &[
    "id",
    "name",
    "radius",
    "orbit_radius",
    "rotation_period",
    "orbit_period",
    "texture_url",
    "created_at",
    "updated_at",
];

/// Body store over a migrated SQLite connection.
pub struct SqliteBodyRepository<'conn, A: IdentityAllocator = SqliteSequenceAllocator<'conn>> {
    conn: &'conn Connection,
    ids: A,
}

impl<'conn> SqliteBodyRepository<'conn> {
    /// Creates a repository allocating ids from the persisted sequence.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` on schema drift.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        Self::with_allocator(conn, SqliteSequenceAllocator::new(conn))
    }
}

impl<'conn, A: IdentityAllocator> SqliteBodyRepository<'conn, A> {
    /// Creates a repository with a caller-provided allocator.
    ///
    /// The allocator must never return an id already present in the table;
    /// a collision fails the create with a database error.
    pub fn with_allocator(conn: &'conn Connection, ids: A) -> RepoResult<Self> {
        ensure_body_connection_ready(conn)?;
        Ok(Self { conn, ids })
    }

    /// Validates all candidates, then allocates and inserts them in one
    /// IMMEDIATE transaction. Sequence bumps roll back with the inserts.
    fn insert_batch(
        &self,
        candidates: &[CelestialBody],
        only_if_empty: bool,
    ) -> RepoResult<Vec<CelestialBody>> {
        for candidate in candidates {
            candidate.validate()?;
        }

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if only_if_empty && has_any_body(&tx)? {
            return Ok(Vec::new());
        }

        let mut stored = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let body = candidate.stored_as(self.ids.next_id()?);
            insert_body(&tx, &body)?;
            stored.push(body);
        }
        tx.commit()?;

        Ok(stored)
    }
}

impl<A: IdentityAllocator> CelestialBodyRepository for SqliteBodyRepository<'_, A> {
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
        let mut stmt = self
            .conn
            .prepare_cached(&format!("{BODY_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return parse_body_row(row);
        }

        Err(RepoError::NotFound(id))
    }

    fn update_body(&self, id: BodyId, body: &CelestialBody) -> RepoResult<CelestialBody> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if !body_exists(&tx, id)? {
            return Err(RepoError::NotFound(id));
        }
        body.validate()?;
        let stored = body.stored_as(id);

        tx.execute(
            "UPDATE celestial_bodies
             SET
                name = ?2,
                radius = ?3,
                orbit_radius = ?4,
                rotation_period = ?5,
                orbit_period = ?6,
                texture_url = ?7,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![
                id,
                stored.name.as_str(),
                stored.radius,
                stored.orbit_radius,
                stored.rotation_period,
                stored.orbit_period,
                stored.texture_url.as_deref(),
            ],
        )?;
        tx.commit()?;

        Ok(stored)
    }

    fn delete_body(&self, id: BodyId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM celestial_bodies WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn count_bodies(&self) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM celestial_bodies;",
            [],
            |row| row.get(0),
        )?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative body count {count}")))
    }

    fn list_page(&self, after: Option<BodyId>, limit: usize) -> RepoResult<Vec<CelestialBody>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let mut stmt = self.conn.prepare_cached(&format!(
            "{BODY_SELECT_SQL}
             WHERE id > ?1
             ORDER BY id ASC
             LIMIT ?2;"
        ))?;
        let mut rows = stmt.query(params![after.unwrap_or(0), limit])?;
        let mut bodies = Vec::new();
        while let Some(row) = rows.next()? {
            bodies.push(parse_body_row(row)?);
        }
        Ok(bodies)
    }
}

fn insert_body(tx: &Transaction<'_>, body: &CelestialBody) -> RepoResult<()> {
    tx.execute(
        "INSERT INTO celestial_bodies (
            id,
            name,
            radius,
            orbit_radius,
            rotation_period,
            orbit_period,
            texture_url
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
        params![
            body.id,
            body.name.as_str(),
            body.radius,
            body.orbit_radius,
            body.rotation_period,
            body.orbit_period,
            body.texture_url.as_deref(),
        ],
    )?;
    Ok(())
}

fn has_any_body(tx: &Transaction<'_>) -> RepoResult<bool> {
    let found = tx
        .query_row("SELECT 1 FROM celestial_bodies LIMIT 1;", [], |row| {
            row.get::<_, i64>(0)
        })
        .optional()?;
    Ok(found.is_some())
}

fn body_exists(tx: &Transaction<'_>, id: BodyId) -> RepoResult<bool> {
    let found = tx
        .query_row(
            "SELECT 1 FROM celestial_bodies WHERE id = ?1;",
            [id],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    Ok(found.is_some())
}

fn parse_body_row(row: &Row<'_>) -> RepoResult<CelestialBody> {
    let id: BodyId = row.get("id")?;
    let body = CelestialBody {
        id: Some(id),
        name: row.get("name")?,
        radius: row.get("radius")?,
        orbit_radius: row.get("orbit_radius")?,
        rotation_period: row.get("rotation_period")?,
        orbit_period: row.get("orbit_period")?,
        texture_url: row.get("texture_url")?,
    };
    body.validate()
        .map_err(|err| RepoError::InvalidData(format!("row id={id}: {err}")))?;
    Ok(body)
}

fn ensure_body_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = schema_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "id_sequences")? {
        return Err(RepoError::MissingRequiredTable("id_sequences"));
    }
    if !table_exists(conn, "celestial_bodies")? {
        return Err(RepoError::MissingRequiredTable("celestial_bodies"));
    }
    for column in BODY_COLUMNS {
        if !table_has_column(conn, "celestial_bodies", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "celestial_bodies",
                column: *column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
