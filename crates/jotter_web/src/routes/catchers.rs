//! Error pages for requests no handler answered.

use super::pages::{self, Html};
use crate::state::AppState;
use rocket::http::Status;
use rocket::response::content::RawHtml;
use rocket::{catch, Request};

#[catch(404)]
pub fn not_found(req: &Request<'_>) -> Html {
    match req.rocket().state::<AppState>() {
        Some(state) => pages::not_found(&state.templates).1,
        None => RawHtml("<h1>Not Found</h1>".to_string()),
    }
}

#[catch(422)]
pub fn unprocessable(req: &Request<'_>) -> Html {
    error_page(req, Status::UnprocessableEntity, "the submitted form could not be read")
}

#[catch(500)]
pub fn internal(req: &Request<'_>) -> Html {
    error_page(req, Status::InternalServerError, "internal server error")
}

fn error_page(req: &Request<'_>, status: Status, message: &str) -> Html {
    match req.rocket().state::<AppState>() {
        Some(state) => pages::error(&state.templates, status, message).1,
        None => RawHtml(format!("<h1>{}</h1>", status.code)),
    }
}
