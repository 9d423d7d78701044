//! Parameterized statement primitives over the process-wide connection.

use super::{DbError, DbResult};
use rusqlite::{Connection, OptionalExtension, Params, Row};
use std::sync::{Mutex, MutexGuard};

/// Owned SQLite handle shared by every request.
///
/// The connection sits behind a mutex so concurrent callers take turns;
/// SQLite's own locking covers anything outside this process.
pub struct Storage {
    conn: Mutex<Connection>,
}

impl Storage {
    /// Wraps an already migrated connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Runs one insert/update/delete statement and returns the affected row count.
    pub fn execute<P: Params>(&self, sql: &str, params: P) -> DbResult<usize> {
        let conn = self.lock()?;
        Ok(conn.execute(sql, params)?)
    }

    /// Runs one insert statement and returns the rowid it produced.
    ///
    /// The insert and the rowid read happen under the same lock, so the
    /// returned id always belongs to this insert.
    pub fn insert<P: Params>(&self, sql: &str, params: P) -> DbResult<i64> {
        let conn = self.lock()?;
        conn.execute(sql, params)?;
        Ok(conn.last_insert_rowid())
    }

    /// Returns the rowid of the most recent successful insert on this connection.
    ///
    /// Only meaningful right after an insert; prefer [`Storage::insert`].
    pub fn last_inserted_id(&self) -> DbResult<i64> {
        Ok(self.lock()?.last_insert_rowid())
    }

    /// Runs one read statement and maps every row.
    pub fn query<T, P, F>(&self, sql: &str, params: P, map_row: F) -> DbResult<Vec<T>>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params, map_row)?;
        let mut items = Vec::new();
        for row in rows {
            items.push(row?);
        }
        Ok(items)
    }

    /// Runs one read statement expected to match zero or one row.
    pub fn query_optional<T, P, F>(&self, sql: &str, params: P, map_row: F) -> DbResult<Option<T>>
    where
        P: Params,
        F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
    {
        let conn = self.lock()?;
        Ok(conn.query_row(sql, params, map_row).optional()?)
    }

    /// Gives direct access to the connection for schema-level checks.
    pub fn with_connection<T, E>(&self, f: impl FnOnce(&Connection) -> Result<T, E>) -> Result<T, E>
    where
        E: From<DbError>,
    {
        let conn = self.lock()?;
        f(&conn)
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| DbError::ConnectionPoisoned)
    }
}
