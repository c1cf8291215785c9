//! rowdump CLI library.
//!
//! Argument parsing, config file handling and the export driver behind the
//! `rowdump` binary. The binary parses [`cli::Cli`], installs tracing and
//! calls [`run`].

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod probe;

use cli::Cli;
use config::FileConfig;
use error::CliResult;
use rowdump_export::{export_table, ExportRequest, MySqlSource};
use tracing::{debug, info};

/// Resolve settings, export the table and write the JSON.
///
/// Usage errors are reported before any network access. The server is probed
/// before the pool is opened so an unreachable address and a refused login
/// produce different messages.
pub async fn run(cli: Cli) -> CliResult<()> {
    let file = match config::resolve_config_path(cli.config.as_deref())? {
        Some(path) => {
            debug!(path = %path.display(), "loading config file");
            config::load_config(&path)?
        }
        None => FileConfig::default(),
    };
    let settings = config::resolve_settings(&cli, &file)?;

    probe::probe(&settings.connection).await?;
    let source = MySqlSource::connect(&settings.connection).await?;

    let mut request = ExportRequest::table(settings.table.clone());
    if let Some(query) = &settings.query {
        request = request.with_query(query.clone());
    }
    let result = export_table(&source, &request).await;
    source.close().await;
    let exported = result?;

    if exported.conversion_failures > 0 {
        info!(
            cells = exported.conversion_failures,
            "some cells could not be converted and were kept as text"
        );
    }

    let json = output::render(&exported.rows, settings.pretty)?;
    output::write_output(&json, settings.output.as_deref())
}
