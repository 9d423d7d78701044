//! Application state shared with every request handler.

use crate::templates::Templates;
use jotter_core::{MarkdownRenderer, NoteService, SqliteNoteRepository};
use std::sync::Arc;

/// Note use-cases as wired for the web shell.
pub type Notes = NoteService<SqliteNoteRepository, MarkdownRenderer>;

/// Explicitly constructed dependencies, managed by Rocket and injected into
/// handlers through `&State<AppState>`. The service is shared with blocking
/// worker threads, hence the `Arc`.
pub struct AppState {
    pub notes: Arc<Notes>,
    pub templates: Templates,
}

impl AppState {
    pub fn new(notes: Notes, templates: Templates) -> Self {
        Self {
            notes: Arc::new(notes),
            templates,
        }
    }
}
