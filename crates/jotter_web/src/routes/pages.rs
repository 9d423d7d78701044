//! Page builders: turn note data into filled templates.

use crate::templates::{Page, TemplateContext, Templates};
use chrono::{DateTime, Utc};
use jotter_core::{Note, NoteServiceError, NoteSummary, RenderedNote};
use rocket::http::Status;
use rocket::response::content::RawHtml;

pub type Html = RawHtml<String>;
pub type Failure = (Status, Html);

const UNTITLED: &str = "(untitled)";

pub fn index(templates: &Templates, summaries: &[NoteSummary]) -> Html {
    let notes = if summaries.is_empty() {
        templates.render(Page::NoNotes, &TemplateContext::new())
    } else {
        summaries
            .iter()
            .map(|summary| {
                templates.render(
                    Page::NoteItem,
                    &TemplateContext::new()
                        .set("id", summary.id.to_string())
                        .set("title", display_title(&summary.title)),
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    RawHtml(templates.render(
        Page::Index,
        &TemplateContext::new()
            .set("notes", notes)
            .set("note_count", summaries.len().to_string()),
    ))
}

pub fn new_form(templates: &Templates) -> Html {
    RawHtml(templates.render(Page::New, &TemplateContext::new()))
}

pub fn view(templates: &Templates, rendered: &RenderedNote) -> Html {
    let note = &rendered.note;
    RawHtml(templates.render(
        Page::View,
        &note_context(note)
            .set("title", display_title(&note.title))
            .set("body", rendered.rendered_body.as_str()),
    ))
}

pub fn edit_form(templates: &Templates, note: &Note) -> Html {
    RawHtml(templates.render(
        Page::Edit,
        &note_context(note)
            .set("title", note.title.as_str())
            .set("content", note.content.as_str()),
    ))
}

pub fn not_found(templates: &Templates) -> Failure {
    (
        Status::NotFound,
        RawHtml(templates.render(Page::NotFound, &TemplateContext::new())),
    )
}

pub fn error(templates: &Templates, status: Status, message: &str) -> Failure {
    (
        status,
        RawHtml(templates.render(
            Page::Error,
            &TemplateContext::new()
                .set("status", status.code.to_string())
                .set("message", message),
        )),
    )
}

/// Maps a use-case error to the page the caller sees.
pub fn failure(templates: &Templates, err: &NoteServiceError) -> Failure {
    match err {
        NoteServiceError::NoteNotFound(_) => not_found(templates),
        NoteServiceError::Repo(repo_err) => error(
            templates,
            Status::InternalServerError,
            &repo_err.to_string(),
        ),
    }
}

fn note_context(note: &Note) -> TemplateContext {
    TemplateContext::new()
        .set("id", note.id.to_string())
        .set("created_at", format_timestamp(note.created_at_utc()))
        .set("updated_at", format_timestamp(note.updated_at_utc()))
}

fn display_title(title: &str) -> &str {
    if title.trim().is_empty() {
        UNTITLED
    } else {
        title
    }
}

fn format_timestamp(value: Option<DateTime<Utc>>) -> String {
    value.map_or_else(String::new, |value| {
        value.format("%Y-%m-%d %H:%M UTC").to_string()
    })
}
