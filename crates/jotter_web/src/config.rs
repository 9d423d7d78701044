//! Application configuration.
//!
//! Values come from built-in defaults, then `Rocket.toml`, then an optional
//! TOML file, then `JOTTER_`- and `ROCKET_`-prefixed environment variables.
//! Rocket reads its own keys (`address`, `port`, `limits`, ...) from the
//! same figment.

use jotter_core::default_log_level;
use rocket::data::{Limits, ToByteUnit};
use rocket::figment::providers::{Env, Format, Serialized, Toml};
use rocket::figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const APP_CONFIG_ENV_PREFIX: &str = "JOTTER_";
pub const DEFAULT_DATABASE_PATH: &str = "notes.sqlite3";
pub const DEFAULT_TEMPLATE_DIR: &str = "templates";
pub const DEFAULT_STATIC_DIR: &str = "templates/static";
pub const DEFAULT_PORT: u16 = 8000;
/// Upper bound for a submitted note form.
pub const MAX_FORM_MEBIBYTES: u64 = 2;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub template_dir: PathBuf,
    pub static_dir: PathBuf,
    pub log_level: String,
    /// Absolute directory for rotating log files; stderr when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            template_dir: PathBuf::from(DEFAULT_TEMPLATE_DIR),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

pub const ROCKET_ENV_PREFIX: &str = "ROCKET_";
const ROCKET_CONFIG_FILE: &str = "Rocket.toml";

pub trait FigmentExt {
    fn setup_app_config(self, config_file: Option<&Path>) -> Figment;
}

impl FigmentExt for Figment {
    /// Layers, lowest first: built-in defaults, `Rocket.toml`, the optional
    /// config file, `JOTTER_` env, `ROCKET_` env.
    ///
    /// Defaults live in the default profile so that every later source,
    /// profiled or global, overrides them.
    fn setup_app_config(self, config_file: Option<&Path>) -> Figment {
        let figment = self
            .merge(Serialized::default("port", DEFAULT_PORT))
            .merge(Serialized::default(
                "limits",
                Limits::default().limit("form", MAX_FORM_MEBIBYTES.mebibytes()),
            ))
            .merge(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(Env::var_or("ROCKET_CONFIG", ROCKET_CONFIG_FILE)).nested());
        let figment = match config_file {
            Some(path) => figment.merge(Toml::file_exact(path)),
            None => figment,
        };
        figment
            .merge(Env::prefixed(APP_CONFIG_ENV_PREFIX).global())
            .merge(Env::prefixed(ROCKET_ENV_PREFIX).ignore(&["PROFILE"]).global())
    }
}
