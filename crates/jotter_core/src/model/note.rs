//! Note domain model.
//!
//! # Responsibility
//! - Define the persisted note record and its list projection.
//! - Convert externally supplied identifiers into [`NoteId`] values.
//!
//! # Invariants
//! - `id` is assigned by storage and never changes.
//! - `updated_at >= created_at`, both in Unix epoch milliseconds.
//! - Rendered markup is never part of the persisted record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Storage-assigned note identifier (SQLite rowid).
pub type NoteId = i64;

/// Full persisted note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    /// Markdown source text.
    pub content: String,
    /// Unix epoch milliseconds of the latest successful write.
    pub updated_at: i64,
    /// Unix epoch milliseconds of creation.
    pub created_at: i64,
}

impl Note {
    /// Reduced projection used by listings.
    pub fn summary(&self) -> NoteSummary {
        NoteSummary {
            id: self.id,
            title: self.title.clone(),
        }
    }

    /// Whether the note has been updated since it was created.
    pub fn was_edited(&self) -> bool {
        self.updated_at > self.created_at
    }

    pub fn updated_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.updated_at)
    }

    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.created_at)
    }
}

/// `(id, title)` projection returned by listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteSummary {
    pub id: NoteId,
    pub title: String,
}

/// Parses an identifier taken from a route segment or form.
///
/// Returns `None` for anything that can never name a stored note
/// (non-numeric, zero or negative), which callers treat as "not found".
pub fn parse_note_id(raw: &str) -> Option<NoteId> {
    raw.trim()
        .parse::<NoteId>()
        .ok()
        .filter(|id| *id > 0)
}
