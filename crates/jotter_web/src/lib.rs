//! Web shell for Jotter: configuration, templates, routes and startup.

pub mod cli;
pub mod config;
pub mod routes;
pub mod startup;
pub mod state;
pub mod templates;

pub use config::AppConfig;
pub use startup::{build_rocket, build_state, figment_for, init_logging_from, StartupError};
pub use state::{AppState, Notes};
pub use templates::{Page, TemplateContext, Templates};
