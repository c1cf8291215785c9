use colored::Colorize;
use rowdump_export::ExportError;
use std::fmt;
use std::process;

/// Exit codes for the CLI.
pub const EXIT_ERROR: i32 = 1;
pub const EXIT_USAGE: i32 = 2;

/// Unified error type for CLI operations.
pub enum CliError {
    /// Missing or invalid arguments.
    Usage(String),
    /// Config file could not be read or parsed.
    Config(String),
    /// Server unreachable or login refused.
    Connect(String),
    /// Schema inspection or data query failed.
    Export(String),
    /// Result could not be serialized or written.
    Output(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => EXIT_USAGE,
            _ => EXIT_ERROR,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Usage(msg) => write!(
                f,
                "{} {msg}\n  {} run 'rowdump --help' for the list of options",
                "error:".red().bold(),
                "help:".cyan().bold(),
            ),
            CliError::Config(msg) => write!(f, "{} {msg}", "error:".red().bold()),
            CliError::Connect(msg) => write!(f, "{} {msg}", "error:".red().bold()),
            CliError::Export(msg) => write!(f, "{} {msg}", "error:".red().bold()),
            CliError::Output(msg) => write!(f, "{} {msg}", "error:".red().bold()),
        }
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl From<ExportError> for CliError {
    fn from(e: ExportError) -> Self {
        match e {
            ExportError::Schema { .. } => CliError::Export(format!("can't get col descriptions: {e}")),
            ExportError::Query { .. } => CliError::Export(format!("can't get data from table: {e}")),
            ExportError::Connect(_) => {
                CliError::Connect(format!("unable to connect to db, incorrect user/password? ({e})"))
            }
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Output(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Output(format!("JSON encoding error: {e}"))
    }
}

/// Print error and exit with the appropriate code.
pub fn exit_with_error(err: CliError) -> ! {
    eprintln!("{err}");
    process::exit(err.exit_code())
}

pub type CliResult<T> = std::result::Result<T, CliError>;
