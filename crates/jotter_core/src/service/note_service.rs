//! Note use-case service.
//!
//! # Responsibility
//! - Provide the list/create/view/edit/update/delete use-cases handlers call.
//! - Render note content for display at read time.
//! - Emit metadata-only diagnostic events for every use-case.
//!
//! # Invariants
//! - `view_note` renders from the freshly read content on every call.
//! - Rendering never happens on the write path.
//! - Storage errors are returned, never swallowed.

use crate::model::note::{Note, NoteId, NoteSummary};
use crate::render::MarkupRenderer;
use crate::repo::note_repo::{NoteRepository, RepoError};
use log::{debug, error, info};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Target note does not exist.
    NoteNotFound(NoteId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl NoteServiceError {
    /// Whether this error means "no such note" rather than a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NoteNotFound(_))
    }
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::NoteNotFound(_) => None,
        }
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NoteNotFound(id),
            other => Self::Repo(other),
        }
    }
}

pub type NoteServiceResult<T> = Result<T, NoteServiceError>;

/// A note together with its display markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedNote {
    pub note: Note,
    /// Transient; recomputed on every view.
    pub rendered_body: String,
}

/// Note service facade over a repository and a markup renderer.
pub struct NoteService<R: NoteRepository, M: MarkupRenderer> {
    repo: R,
    renderer: M,
}

impl<R: NoteRepository, M: MarkupRenderer> NoteService<R, M> {
    pub fn new(repo: R, renderer: M) -> Self {
        Self { repo, renderer }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Lists `(id, title)` pairs, most recently updated first.
    pub fn list_notes(&self) -> NoteServiceResult<Vec<NoteSummary>> {
        let started_at = Instant::now();
        let result = self.repo.list_summaries();
        match &result {
            Ok(items) => debug!(
                "event=note_list module=service status=ok count={} duration_ms={}",
                items.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("note_list", None, err),
        }
        result.map_err(NoteServiceError::from)
    }

    /// Creates one note and returns its storage-assigned id.
    pub fn create_note(&self, title: &str, content: &str) -> NoteServiceResult<NoteId> {
        let started_at = Instant::now();
        let result = self.repo.create(title, content);
        match &result {
            Ok(id) => info!(
                "event=note_create module=service status=ok note_id={} content_len={} duration_ms={}",
                id,
                content.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("note_create", None, err),
        }
        result.map_err(NoteServiceError::from)
    }

    /// Fetches one note with its raw content, e.g. to prefill an edit form.
    pub fn note_for_edit(&self, id: NoteId) -> NoteServiceResult<Note> {
        let result = self.repo.get(id);
        if let Err(err) = &result {
            log_failure("note_get", Some(id), err);
        }
        result.map_err(NoteServiceError::from)
    }

    /// Fetches one note and renders its content for display.
    pub fn view_note(&self, id: NoteId) -> NoteServiceResult<RenderedNote> {
        let started_at = Instant::now();
        let note = self.note_for_edit(id)?;
        let rendered_body = self.renderer.render(&note.content);
        debug!(
            "event=note_view module=service status=ok note_id={} rendered_len={} duration_ms={}",
            id,
            rendered_body.len(),
            started_at.elapsed().as_millis()
        );
        Ok(RenderedNote {
            note,
            rendered_body,
        })
    }

    /// Replaces title and content of an existing note.
    pub fn update_note(&self, id: NoteId, title: &str, content: &str) -> NoteServiceResult<()> {
        let started_at = Instant::now();
        let result = self.repo.update(id, title, content);
        match &result {
            Ok(()) => info!(
                "event=note_update module=service status=ok note_id={} content_len={} duration_ms={}",
                id,
                content.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("note_update", Some(id), err),
        }
        result.map_err(NoteServiceError::from)
    }

    /// Deletes a note; deleting a missing note succeeds.
    pub fn delete_note(&self, id: NoteId) -> NoteServiceResult<()> {
        let started_at = Instant::now();
        match self.repo.delete(id) {
            Ok(removed) => {
                info!(
                    "event=note_delete module=service status=ok note_id={} removed={} duration_ms={}",
                    id,
                    removed,
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                log_failure("note_delete", Some(id), &err);
                Err(err.into())
            }
        }
    }
}

fn log_failure(event: &str, id: Option<NoteId>, err: &RepoError) {
    let note_id = id.map_or_else(|| "-".to_string(), |id| id.to_string());
    match err {
        RepoError::NotFound(_) => info!(
            "event={} module=service status=not_found note_id={}",
            event, note_id
        ),
        other => error!(
            "event={} module=service status=error note_id={} error_code=storage_failed error={}",
            event, note_id, other
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::{NoteService, NoteServiceError};
    use crate::model::note::{Note, NoteId, NoteSummary};
    use crate::render::MarkupRenderer;
    use crate::repo::note_repo::{NoteRepository, RepoError, RepoResult};
    use std::cell::RefCell;

    struct UppercaseRenderer;

    impl MarkupRenderer for UppercaseRenderer {
        fn render(&self, source: &str) -> String {
            source.to_uppercase()
        }
    }

    #[derive(Default)]
    struct MemoryRepo {
        notes: RefCell<Vec<Note>>,
    }

    impl NoteRepository for MemoryRepo {
        fn list_summaries(&self) -> RepoResult<Vec<NoteSummary>> {
            Ok(self.notes.borrow().iter().rev().map(Note::summary).collect())
        }

        fn get(&self, id: NoteId) -> RepoResult<Note> {
            self.notes
                .borrow()
                .iter()
                .find(|note| note.id == id)
                .cloned()
                .ok_or(RepoError::NotFound(id))
        }

        fn create(&self, title: &str, content: &str) -> RepoResult<NoteId> {
            let mut notes = self.notes.borrow_mut();
            let id = notes.len() as NoteId + 1;
            notes.push(Note {
                id,
                title: title.to_string(),
                content: content.to_string(),
                updated_at: 0,
                created_at: 0,
            });
            Ok(id)
        }

        fn update(&self, id: NoteId, title: &str, content: &str) -> RepoResult<()> {
            let mut notes = self.notes.borrow_mut();
            let note = notes
                .iter_mut()
                .find(|note| note.id == id)
                .ok_or(RepoError::NotFound(id))?;
            note.title = title.to_string();
            note.content = content.to_string();
            Ok(())
        }

        fn delete(&self, id: NoteId) -> RepoResult<bool> {
            let mut notes = self.notes.borrow_mut();
            let before = notes.len();
            notes.retain(|note| note.id != id);
            Ok(notes.len() != before)
        }
    }

    fn service() -> NoteService<MemoryRepo, UppercaseRenderer> {
        NoteService::new(MemoryRepo::default(), UppercaseRenderer)
    }

    #[test]
    fn view_renders_current_content_without_touching_it() {
        let service = service();
        let id = service.create_note("t", "hello").unwrap();

        let viewed = service.view_note(id).unwrap();
        assert_eq!(viewed.rendered_body, "HELLO");
        assert_eq!(viewed.note.content, "hello");

        service.update_note(id, "t", "changed").unwrap();
        assert_eq!(service.view_note(id).unwrap().rendered_body, "CHANGED");
    }

    #[test]
    fn repo_not_found_maps_to_note_not_found() {
        let service = service();
        let err = service.view_note(5).unwrap_err();
        assert!(matches!(err, NoteServiceError::NoteNotFound(5)));
        assert!(err.is_not_found());

        let err = service.update_note(5, "x", "y").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn delete_missing_note_is_ok() {
        let service = service();
        service.delete_note(42).unwrap();
    }
}
