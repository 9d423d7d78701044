//! Core domain logic for Jotter.
//! This crate owns the note persistence and rendering pipeline.

pub mod db;
pub mod logging;
pub mod model;
pub mod render;
pub mod repo;
pub mod service;

pub use db::{open_db, open_db_in_memory, DbError, DbResult, Storage};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{parse_note_id, Note, NoteId, NoteSummary};
pub use render::{MarkdownRenderer, MarkupRenderer};
pub use repo::note_repo::{
    Clock, NoteRepository, RepoError, RepoResult, SqliteNoteRepository, SystemClock,
};
pub use service::note_service::{
    NoteService, NoteServiceError, NoteServiceResult, RenderedNote,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
