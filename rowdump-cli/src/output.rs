use crate::error::{CliError, CliResult};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Encode rows as a JSON array, compact unless `pretty`.
pub fn render<T: Serialize + ?Sized>(rows: &T, pretty: bool) -> CliResult<String> {
    let json = if pretty {
        serde_json::to_string_pretty(rows)?
    } else {
        serde_json::to_string(rows)?
    };
    Ok(json)
}

/// Write `json` plus a trailing newline to `path`, or to stdout when `None`.
pub fn write_output(json: &str, path: Option<&Path>) -> CliResult<()> {
    match path {
        Some(path) => std::fs::write(path, format!("{json}\n"))
            .map_err(|e| CliError::Output(format!("failed to write {}: {e}", path.display()))),
        None => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            writeln!(out, "{json}")?;
            out.flush()?;
            Ok(())
        }
    }
}
