//! Reachability check run before opening the connection pool.
//!
//! A closed port or missing socket is reported as "unable to connect to db"
//! instead of surfacing as a login failure from the driver.

use crate::error::{CliError, CliResult};
use rowdump_export::{MySqlSettings, Protocol};
use std::io;
use tokio::time::timeout;
use tracing::debug;

/// Open and drop a raw connection to the server address.
pub async fn probe(settings: &MySqlSettings) -> CliResult<()> {
    let addr = settings.addr.as_str();
    let result = match settings.protocol {
        Protocol::Tcp => {
            let (host, port) = settings
                .host_port()
                .map_err(|e| CliError::Connect(format!("unable to connect to db: {e}")))?;
            let connect = tokio::net::TcpStream::connect((host.as_str(), port));
            timeout(settings.timeout, connect).await.map(|r| r.map(drop))
        }
        Protocol::Unix => timeout(settings.timeout, connect_unix(addr)).await,
    };

    match result {
        Ok(Ok(())) => {
            debug!(protocol = %settings.protocol, addr, "server reachable");
            Ok(())
        }
        Ok(Err(e)) => Err(CliError::Connect(format!(
            "unable to connect to db: {}({addr}): {e}",
            settings.protocol
        ))),
        Err(_) => Err(CliError::Connect(format!(
            "unable to connect to db: {}({addr}): timed out after {}s",
            settings.protocol,
            settings.timeout.as_secs()
        ))),
    }
}

#[cfg(unix)]
async fn connect_unix(path: &str) -> io::Result<()> {
    tokio::net::UnixStream::connect(path).await.map(drop)
}

#[cfg(not(unix))]
async fn connect_unix(_path: &str) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "unix sockets are not supported on this platform",
    ))
}
