use clap::Parser;
use std::path::PathBuf;

#[derive(Clone, Debug, Eq, Parser, PartialEq)]
#[command(version, about = "Minimal Markdown note-taking web application")]
pub struct CliConfig {
    /// TOML configuration file.
    #[arg(long)]
    pub config_file: Option<PathBuf>,

    /// SQLite database file; overrides `database_path` from the configuration.
    #[arg(long)]
    pub database: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::CliConfig;
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn parses_optional_paths() {
        let cli = CliConfig::parse_from(["jotter", "--database", "/tmp/n.db"]);
        assert_eq!(cli.database, Some(PathBuf::from("/tmp/n.db")));
        assert_eq!(cli.config_file, None);
    }
}
