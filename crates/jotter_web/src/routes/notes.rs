//! Note CRUD handlers.
//!
//! Successful writes answer with `302 Found` pointing at the resulting page
//! so a browser refresh never resubmits the form. Service calls take the
//! storage lock and do SQLite I/O, so they run on the blocking pool and the
//! async workers stay free.

use super::pages::{self, Failure, Html};
use crate::state::{AppState, Notes};
use jotter_core::{parse_note_id, NoteServiceResult};
use log::error;
use rocket::form::Form;
use rocket::http::Status;
use rocket::response::Redirect;
use rocket::tokio::task::spawn_blocking;
use rocket::{get, post, FromForm, State};
use std::sync::Arc;

type PageResult = Result<Html, Failure>;
type WriteResult = Result<Redirect, Failure>;

#[derive(Debug, FromForm)]
pub struct NoteForm {
    #[field(default = String::new())]
    title: String,
    #[field(default = String::new())]
    content: String,
}

#[get("/")]
pub async fn index(state: &State<AppState>) -> PageResult {
    let summaries = with_notes(state, |notes| notes.list_notes()).await?;
    Ok(pages::index(&state.templates, &summaries))
}

#[get("/new")]
pub fn new_form(state: &State<AppState>) -> Html {
    pages::new_form(&state.templates)
}

#[post("/new", data = "<form>")]
pub async fn create(state: &State<AppState>, form: Form<NoteForm>) -> WriteResult {
    let NoteForm { title, content } = form.into_inner();
    let id = with_notes(state, move |notes| notes.create_note(&title, &content)).await?;
    Ok(Redirect::found(view_path(id)))
}

#[get("/view/<id>")]
pub async fn view(state: &State<AppState>, id: &str) -> PageResult {
    let id = parse_note_id(id).ok_or_else(|| pages::not_found(&state.templates))?;
    let rendered = with_notes(state, move |notes| notes.view_note(id)).await?;
    Ok(pages::view(&state.templates, &rendered))
}

#[get("/edit/<id>")]
pub async fn edit_form(state: &State<AppState>, id: &str) -> PageResult {
    let id = parse_note_id(id).ok_or_else(|| pages::not_found(&state.templates))?;
    let note = with_notes(state, move |notes| notes.note_for_edit(id)).await?;
    Ok(pages::edit_form(&state.templates, &note))
}

#[post("/edit/<id>", data = "<form>")]
pub async fn update(state: &State<AppState>, id: &str, form: Form<NoteForm>) -> WriteResult {
    let id = parse_note_id(id).ok_or_else(|| pages::not_found(&state.templates))?;
    let NoteForm { title, content } = form.into_inner();
    with_notes(state, move |notes| notes.update_note(id, &title, &content)).await?;
    Ok(Redirect::found(view_path(id)))
}

/// Deleting something that is not there (or could never be) still lands on
/// the index.
#[post("/delete/<id>")]
pub async fn delete(state: &State<AppState>, id: &str) -> WriteResult {
    if let Some(id) = parse_note_id(id) {
        with_notes(state, move |notes| notes.delete_note(id)).await?;
    }
    Ok(Redirect::found("/"))
}

/// Runs one service call on the blocking pool and maps its error to a page.
async fn with_notes<T, F>(state: &AppState, call: F) -> Result<T, Failure>
where
    T: Send + 'static,
    F: FnOnce(&Notes) -> NoteServiceResult<T> + Send + 'static,
{
    let notes = Arc::clone(&state.notes);
    match spawn_blocking(move || call(&notes)).await {
        Ok(result) => result.map_err(|err| pages::failure(&state.templates, &err)),
        Err(err) => {
            error!("event=note_call module=routes status=error error={}", err);
            Err(pages::error(
                &state.templates,
                Status::InternalServerError,
                "note operation did not complete",
            ))
        }
    }
}

fn view_path(id: i64) -> String {
    format!("/view/{id}")
}
