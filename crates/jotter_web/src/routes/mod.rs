//! HTTP surface: note pages, static assets and error catchers.

mod catchers;
mod notes;
mod pages;

use crate::state::AppState;
use rocket::fs::FileServer;
use rocket::{catchers, routes, Build, Rocket};
use std::path::Path;

pub const STATIC_PREFIX: &str = "/static";

pub trait JotterRocketBuildExt {
    /// Manages `state` and mounts note pages, static files and catchers.
    fn install_jotter(self, state: AppState, static_dir: &Path) -> Self;
}

impl JotterRocketBuildExt for Rocket<Build> {
    fn install_jotter(self, state: AppState, static_dir: &Path) -> Self {
        self.manage(state)
            .mount(
                "/",
                routes![
                    notes::index,
                    notes::new_form,
                    notes::create,
                    notes::view,
                    notes::edit_form,
                    notes::update,
                    notes::delete,
                ],
            )
            .mount(STATIC_PREFIX, FileServer::from(static_dir))
            .register(
                "/",
                catchers![
                    catchers::not_found,
                    catchers::unprocessable,
                    catchers::internal,
                ],
            )
    }
}
