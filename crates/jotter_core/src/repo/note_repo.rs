//! Note repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Translate note use-cases into parameterized statements on `notes`.
//! - Assign timestamps; storage assigns ids.
//! - Turn "zero rows affected" on update into a semantic `NotFound`.
//!
//! # Invariants
//! - Listing is ordered by `updated_at DESC, id DESC` and never loads content.
//! - Every write stamps `max(now, newest updated_at + 1)`, so listing order
//!   follows write order even when writes share a clock tick or the clock
//!   steps backwards. Updates never touch `created_at`.
//! - Delete is idempotent.

use crate::db::{DbError, Storage};
use crate::model::note::{Note, NoteId, NoteSummary};
use chrono::Utc;
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    title,
    content,
    updated_at,
    created_at
FROM notes";

const NOTE_COLUMNS: [&str; 5] = ["id", "title", "content", "updated_at", "created_at"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for note persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(NoteId),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
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

/// Source of "now" for note timestamps.
pub trait Clock: Send + Sync {
    /// Current time in Unix epoch milliseconds.
    fn now_millis(&self) -> i64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Repository interface for note CRUD operations.
pub trait NoteRepository {
    /// Lists `(id, title)` pairs, most recently updated first.
    fn list_summaries(&self) -> RepoResult<Vec<NoteSummary>>;
    /// Gets one full note or `NotFound`.
    fn get(&self, id: NoteId) -> RepoResult<Note>;
    /// Inserts a note and returns the id storage assigned to it.
    fn create(&self, title: &str, content: &str) -> RepoResult<NoteId>;
    /// Replaces title and content of an existing note.
    fn update(&self, id: NoteId, title: &str, content: &str) -> RepoResult<()>;
    /// Removes a note. Returns whether a row was actually removed.
    fn delete(&self, id: NoteId) -> RepoResult<bool>;
}

/// SQLite-backed note repository owning the process-wide storage handle.
pub struct SqliteNoteRepository<C: Clock = SystemClock> {
    storage: Storage,
    clock: C,
}

impl SqliteNoteRepository<SystemClock> {
    /// Constructs a repository from migrated storage, using the wall clock.
    pub fn try_new(storage: Storage) -> RepoResult<Self> {
        Self::with_clock(storage, SystemClock)
    }
}

impl<C: Clock> SqliteNoteRepository<C> {
    /// Constructs a repository with a caller-provided clock.
    pub fn with_clock(storage: Storage, clock: C) -> RepoResult<Self> {
        storage.with_connection(ensure_notes_table_ready)?;
        Ok(Self { storage, clock })
    }

    /// Underlying storage handle.
    pub fn storage(&self) -> &Storage {
        &self.storage
    }
}

impl<C: Clock> NoteRepository for SqliteNoteRepository<C> {
    fn list_summaries(&self) -> RepoResult<Vec<NoteSummary>> {
        let summaries = self.storage.query(
            "SELECT id, title
             FROM notes
             ORDER BY updated_at DESC, id DESC;",
            [],
            |row| {
                Ok(NoteSummary {
                    id: row.get("id")?,
                    title: row.get("title")?,
                })
            },
        )?;
        Ok(summaries)
    }

    fn get(&self, id: NoteId) -> RepoResult<Note> {
        self.storage
            .query_optional(
                &format!("{NOTE_SELECT_SQL} WHERE id = ?1;"),
                params![id],
                parse_note_row,
            )?
            .ok_or(RepoError::NotFound(id))
    }

    fn create(&self, title: &str, content: &str) -> RepoResult<NoteId> {
        let now = self.clock.now_millis();
        let id = self.storage.insert(
            "INSERT INTO notes (title, content, updated_at, created_at)
             SELECT ?1, ?2, stamp, stamp
             FROM (
                SELECT MAX(?3, COALESCE(MAX(updated_at), 0) + 1) AS stamp
                FROM notes
             );",
            params![title, content, now],
        )?;
        Ok(id)
    }

    fn update(&self, id: NoteId, title: &str, content: &str) -> RepoResult<()> {
        let now = self.clock.now_millis();
        let changed = self.storage.execute(
            "UPDATE notes
             SET
                title = ?2,
                content = ?3,
                updated_at = (
                    SELECT MAX(?4, MAX(updated_at) + 1)
                    FROM notes
                )
             WHERE id = ?1;",
            params![id, title, content, now],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn delete(&self, id: NoteId) -> RepoResult<bool> {
        let changed = self
            .storage
            .execute("DELETE FROM notes WHERE id = ?1;", params![id])?;
        Ok(changed > 0)
    }
}

fn parse_note_row(row: &Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: row.get("id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        updated_at: row.get("updated_at")?,
        created_at: row.get("created_at")?,
    })
}

fn ensure_notes_table_ready(conn: &Connection) -> RepoResult<()> {
    if !table_exists(conn, "notes")? {
        return Err(RepoError::MissingRequiredTable("notes"));
    }

    for column in NOTE_COLUMNS {
        if !table_has_column(conn, "notes", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "notes",
                column,
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
