use clap::Parser;
use rowdump_export::Protocol;
use std::path::PathBuf;

// Connection and selection flags have no clap defaults so that unset flags
// can fall back to the config file.
#[derive(Parser, Debug)]
#[command(
    name = "rowdump",
    about = "Dump a MySQL table as JSON, typed by the table's schema",
    version
)]
pub struct Cli {
    /// MySQL user name
    #[arg(long)]
    pub user: Option<String>,

    /// MySQL password
    #[arg(long, env = "ROWDUMP_PASSWORD", hide_env_values = true)]
    pub pass: Option<String>,

    /// Connection protocol [default: tcp]
    #[arg(long, value_parser = parse_protocol)]
    pub prot: Option<Protocol>,

    /// Server address (host:port), or socket path with --prot unix [default: localhost:3306]
    #[arg(long)]
    pub addr: Option<String>,

    /// Database name
    #[arg(long)]
    pub db: Option<String>,

    /// Table to dump
    #[arg(long)]
    pub table: Option<String>,

    /// Custom query to run instead of SELECT * (the table still provides column types)
    #[arg(long)]
    pub query: Option<String>,

    /// Connection timeout in seconds [default: 30]
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Write JSON to a file instead of stdout
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Path to config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output (also respects NO_COLOR env var)
    #[arg(long, global = true)]
    pub no_color: bool,
}

fn parse_protocol(s: &str) -> Result<Protocol, String> {
    s.parse()
}
