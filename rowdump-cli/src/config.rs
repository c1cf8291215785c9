//! Configuration file support.
//!
//! Settings can be kept in a TOML file so credentials don't have to be passed
//! on the command line:
//!
//! ```toml
//! [connection]
//! user = "root"
//! pass = "secret"
//! prot = "tcp"
//! addr = "localhost:3306"
//! db = "gotest"
//! timeout = 30
//!
//! [export]
//! table = "test"
//! pretty = true
//! ```
//!
//! ## Precedence (highest to lowest)
//!
//! 1. CLI arguments
//! 2. Environment variables (`ROWDUMP_PASSWORD`)
//! 3. Config file
//! 4. Hardcoded defaults

use crate::cli::Cli;
use crate::error::{CliError, CliResult};
use rowdump_export::{MySqlSettings, Protocol};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

const LOCAL_CONFIG: &str = "rowdump.toml";
const GLOBAL_CONFIG: &str = ".rowdump.toml";

// ---------------------------------------------------------------------------
// File config serde types (all Option, absence means "not set in file")
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// `[connection]`
    #[serde(default)]
    pub connection: Option<ConnectionFileConfig>,
    /// `[export]`
    #[serde(default)]
    pub export: Option<ExportFileConfig>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectionFileConfig {
    pub user: Option<String>,
    pub pass: Option<String>,
    pub prot: Option<String>,
    pub addr: Option<String>,
    pub db: Option<String>,
    /// Seconds
    pub timeout: Option<u64>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportFileConfig {
    pub table: Option<String>,
    pub query: Option<String>,
    pub pretty: Option<bool>,
    pub output: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Loading and discovery
// ---------------------------------------------------------------------------

/// Load a TOML config file. An empty file is an empty config.
pub fn load_config(path: &Path) -> CliResult<FileConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        CliError::Config(format!("failed to read config file {}: {e}", path.display()))
    })?;

    if content.trim().is_empty() {
        return Ok(FileConfig::default());
    }

    toml::from_str(&content).map_err(|e| {
        CliError::Config(format!("failed to parse config file {}: {e}", path.display()))
    })
}

/// Resolve the config file path.
///
/// 1. Explicit `--config` path, which must exist
/// 2. `./rowdump.toml`
/// 3. `~/.rowdump.toml`
///
/// Returns `None` when no file is found and none was requested.
pub fn resolve_config_path(explicit: Option<&Path>) -> CliResult<Option<PathBuf>> {
    if let Some(p) = explicit {
        if p.is_file() {
            return Ok(Some(p.to_path_buf()));
        }
        return Err(CliError::Config(format!(
            "config file not found: {}",
            p.display()
        )));
    }

    let local = PathBuf::from(LOCAL_CONFIG);
    if local.is_file() {
        return Ok(Some(local));
    }

    Ok(dirs::home_dir()
        .map(|home| home.join(GLOBAL_CONFIG))
        .filter(|p| p.is_file()))
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

/// Everything one run needs, after merging flags, file and defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    pub connection: MySqlSettings,
    pub table: String,
    pub query: Option<String>,
    pub pretty: bool,
    pub output: Option<PathBuf>,
}

/// Merge CLI flags over the file config and check that the required values
/// are present.
pub fn resolve_settings(cli: &Cli, file: &FileConfig) -> CliResult<Settings> {
    let conn = file.connection.clone().unwrap_or_default();
    let export = file.export.clone().unwrap_or_default();

    let user = cli.user.clone().or(conn.user).filter(|s| !s.is_empty());
    let database = cli.db.clone().or(conn.db).filter(|s| !s.is_empty());
    let (Some(user), Some(database)) = (user, database) else {
        return Err(CliError::Usage(
            "you must supply a user, password and dbname".into(),
        ));
    };

    let Some(table) = cli.table.clone().or(export.table).filter(|s| !s.is_empty()) else {
        return Err(CliError::Usage("which table should I use?".into()));
    };

    let protocol = match (cli.prot, conn.prot) {
        (Some(p), _) => p,
        (None, Some(p)) => p
            .parse::<Protocol>()
            .map_err(|e| CliError::Config(format!("[connection] prot: {e}")))?,
        (None, None) => Protocol::default(),
    };

    let mut connection = MySqlSettings::new(user, database);
    connection.protocol = protocol;
    if let Some(password) = cli.pass.clone().or(conn.pass) {
        connection.password = password;
    }
    if let Some(addr) = cli.addr.clone().or(conn.addr) {
        connection.addr = addr;
    }
    if let Some(secs) = cli.timeout.or(conn.timeout) {
        connection.timeout = Duration::from_secs(secs);
    }

    let settings = Settings {
        connection,
        table,
        query: cli.query.clone().or(export.query).filter(|q| !q.trim().is_empty()),
        pretty: cli.pretty || export.pretty.unwrap_or(false),
        output: cli.output.clone().or(export.output),
    };
    debug!(
        dsn = %settings.connection.redacted_dsn(),
        table = %settings.table,
        custom_query = settings.query.is_some(),
        "resolved settings"
    );
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["rowdump"];
        argv.extend_from_slice(args);
        let mut cli = Cli::try_parse_from(argv).unwrap();
        // ROWDUMP_PASSWORD may be set in the environment running the tests
        if !args.contains(&"--pass") {
            cli.pass = None;
        }
        cli
    }

    #[test]
    fn test_load_toml() {
        let toml = r#"
[connection]
user = "root"
pass = "secret"
prot = "unix"
addr = "/var/run/mysqld/mysqld.sock"
db = "gotest"
timeout = 5

[export]
table = "test"
pretty = true
"#;
        let config: FileConfig = toml::from_str(toml).unwrap();
        let conn = config.connection.unwrap();
        assert_eq!(conn.user.as_deref(), Some("root"));
        assert_eq!(conn.prot.as_deref(), Some("unix"));
        assert_eq!(conn.timeout, Some(5));

        let export = config.export.unwrap();
        assert_eq!(export.table.as_deref(), Some("test"));
        assert_eq!(export.pretty, Some(true));
        assert!(export.query.is_none());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = toml::from_str::<FileConfig>("[connection]\nusername = \"root\"\n");
        assert!(err.is_err());
    }

    #[test]
    fn test_empty_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rowdump.toml");
        std::fs::write(&path, "  \n").unwrap();

        let config = load_config(&path).unwrap();
        assert!(config.connection.is_none());
        assert!(config.export.is_none());
    }

    #[test]
    fn test_missing_explicit_config_is_error() {
        let err = resolve_config_path(Some(Path::new("/nonexistent/rowdump.toml"))).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_defaults() {
        let settings =
            resolve_settings(&cli(&["--user", "root", "--db", "gotest", "--table", "test"]), &FileConfig::default())
                .unwrap();

        assert_eq!(settings.table, "test");
        assert_eq!(
            settings.connection.dsn(),
            "root:@tcp(localhost:3306)/gotest?timeout=30s"
        );
        assert!(!settings.pretty);
        assert!(settings.output.is_none());
        assert!(settings.query.is_none());
    }

    #[test]
    fn test_cli_overrides_file() {
        let file: FileConfig = toml::from_str(
            r#"
[connection]
user = "file_user"
pass = "file_pass"
addr = "db.internal:3307"
db = "file_db"

[export]
table = "file_table"
query = "SELECT id FROM file_table"
"#,
        )
        .unwrap();

        let settings = resolve_settings(&cli(&["--user", "cli_user", "--table", "cli_table"]), &file).unwrap();

        assert_eq!(settings.connection.user, "cli_user");
        assert_eq!(settings.connection.password, "file_pass");
        assert_eq!(settings.connection.addr, "db.internal:3307");
        assert_eq!(settings.connection.database, "file_db");
        assert_eq!(settings.table, "cli_table");
        assert_eq!(settings.query.as_deref(), Some("SELECT id FROM file_table"));
    }

    #[test]
    fn test_missing_user_is_usage_error() {
        let err = resolve_settings(&cli(&["--db", "gotest", "--table", "t"]), &FileConfig::default())
            .unwrap_err();
        assert!(matches!(err, CliError::Usage(ref m) if m == "you must supply a user, password and dbname"));
    }

    #[test]
    fn test_missing_table_is_usage_error() {
        let err = resolve_settings(&cli(&["--user", "root", "--db", "gotest"]), &FileConfig::default())
            .unwrap_err();
        assert!(matches!(err, CliError::Usage(ref m) if m == "which table should I use?"));
    }

    #[test]
    fn test_bad_protocol_in_file() {
        let file: FileConfig = toml::from_str("[connection]\nprot = \"udp\"\n").unwrap();
        let err = resolve_settings(&cli(&["--user", "root", "--db", "gotest", "--table", "t"]), &file)
            .unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }
}
