//! Process startup: configuration, logging, storage and templates.
//!
//! Any failure here is fatal; the binary logs it and exits non-zero.

use crate::cli::CliConfig;
use crate::config::{AppConfig, FigmentExt};
use crate::routes::JotterRocketBuildExt;
use crate::state::AppState;
use crate::templates::{TemplateError, Templates};
use jotter_core::{
    init_logging, open_db, DbError, MarkdownRenderer, NoteService, RepoError,
    SqliteNoteRepository,
};
use log::info;
use rocket::figment::{Figment, Profile};
use rocket::{Build, Rocket};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

#[derive(Debug)]
pub enum StartupError {
    Config(rocket::figment::Error),
    Logging(String),
    Storage(DbError),
    Repository(RepoError),
    Templates(TemplateError),
    MissingStaticDir(PathBuf),
}

impl Display for StartupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "invalid configuration: {err}"),
            Self::Logging(message) => write!(f, "logging setup failed: {message}"),
            Self::Storage(err) => write!(f, "note storage unavailable: {err}"),
            Self::Repository(err) => write!(f, "note repository setup failed: {err}"),
            Self::Templates(err) => write!(f, "template loading failed: {err}"),
            Self::MissingStaticDir(path) => {
                write!(f, "static directory `{}` does not exist", path.display())
            }
        }
    }
}

impl Error for StartupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::Repository(err) => Some(err),
            Self::Templates(err) => Some(err),
            Self::Logging(_) | Self::MissingStaticDir(_) => None,
        }
    }
}

impl From<rocket::figment::Error> for StartupError {
    fn from(value: rocket::figment::Error) -> Self {
        Self::Config(value)
    }
}

impl From<DbError> for StartupError {
    fn from(value: DbError) -> Self {
        Self::Storage(value)
    }
}

impl From<RepoError> for StartupError {
    fn from(value: RepoError) -> Self {
        Self::Repository(value)
    }
}

impl From<TemplateError> for StartupError {
    fn from(value: TemplateError) -> Self {
        Self::Templates(value)
    }
}

/// Builds the full figment for a CLI invocation.
///
/// `--database` is merged globally and wins over every file and env source.
pub fn figment_for(cli: &CliConfig) -> Figment {
    let figment = Figment::from(rocket::Config::default())
        .setup_app_config(cli.config_file.as_deref())
        .select(Profile::from_env_or("ROCKET_PROFILE", rocket::Config::DEFAULT_PROFILE));
    match &cli.database {
        Some(path) => figment.merge(("database_path", path)),
        None => figment,
    }
}

/// Opens storage and loads templates described by `config`.
///
/// Schema migrations run here, once, before any request is served.
pub fn build_state(config: &AppConfig) -> Result<AppState, StartupError> {
    let storage = open_db(&config.database_path)?;
    let repo = SqliteNoteRepository::try_new(storage)?;
    let templates = Templates::load(&config.template_dir)?;
    Ok(AppState::new(
        NoteService::new(repo, MarkdownRenderer::new()),
        templates,
    ))
}

/// Assembles a ready-to-launch Rocket from an already built figment.
///
/// Logging must be initialized by the caller.
pub fn build_rocket(figment: Figment) -> Result<Rocket<Build>, StartupError> {
    let config: AppConfig = figment.extract()?;
    if !config.static_dir.is_dir() {
        return Err(StartupError::MissingStaticDir(config.static_dir));
    }
    let state = build_state(&config)?;
    info!(
        "event=app_ready module=startup status=ok database={} templates={}",
        config.database_path.display(),
        config.template_dir.display()
    );
    Ok(rocket::custom(figment).install_jotter(state, &config.static_dir))
}

/// Initializes logging from the configuration carried by `figment`.
pub fn init_logging_from(figment: &Figment) -> Result<(), StartupError> {
    let config: AppConfig = figment.extract()?;
    let log_dir = config
        .log_dir
        .as_deref()
        .map(|dir| dir.to_string_lossy().into_owned());
    init_logging(&config.log_level, log_dir.as_deref()).map_err(StartupError::Logging)
}

#[cfg(test)]
mod tests {
    use super::figment_for;
    use crate::cli::CliConfig;
    use crate::config::{AppConfig, DEFAULT_PORT};
    use clap::Parser;
    use figment::Jail;
    use std::path::PathBuf;

    #[test]
    fn default_port_without_overrides() {
        Jail::expect_with(|_| {
            let figment = figment_for(&CliConfig::parse_from(["jotter"]));
            assert_eq!(figment.extract_inner::<u16>("port")?, DEFAULT_PORT);
            Ok(())
        });
    }

    #[test]
    fn rocket_port_env_is_honored() {
        Jail::expect_with(|jail| {
            jail.set_env("ROCKET_PORT", 9123);
            let figment = figment_for(&CliConfig::parse_from(["jotter"]));
            assert_eq!(figment.extract_inner::<u16>("port")?, 9123);
            Ok(())
        });
    }

    #[test]
    fn database_flag_wins_over_env_and_file() {
        Jail::expect_with(|jail| {
            jail.create_file("jotter.toml", "database_path = \"from-file.db\"\nport = 9000\n")?;
            jail.set_env("JOTTER_DATABASE_PATH", "from-env.db");

            let cli = CliConfig::parse_from([
                "jotter",
                "--config-file",
                "jotter.toml",
                "--database",
                "from-flag.db",
            ]);
            let figment = figment_for(&cli);
            let config: AppConfig = figment.extract()?;
            assert_eq!(config.database_path, PathBuf::from("from-flag.db"));
            assert_eq!(figment.extract_inner::<u16>("port")?, 9000);
            Ok(())
        });
    }
}
