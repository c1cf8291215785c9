//! MySQL tabular source (sqlx).
//!
//! Queries run over the text protocol, so every cell arrives as the text the
//! server would print for it. That is the raw form the converter expects.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::{Column, Row};
use tracing::debug;

use crate::error::{ExportError, Result};
use crate::source::{quote_identifier, ColumnDescription, QueryRows, RawRow, TabularSource};

const DEFAULT_PORT: u16 = 3306;

/// How to reach the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Protocol {
    /// `host:port`
    #[default]
    Tcp,
    /// Path to a unix domain socket
    Unix,
}

impl Protocol {
    pub fn as_str(self) -> &'static str {
        match self {
            Protocol::Tcp => "tcp",
            Protocol::Unix => "unix",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tcp" => Ok(Protocol::Tcp),
            "unix" => Ok(Protocol::Unix),
            other => Err(format!("unknown protocol '{other}'; valid protocols: tcp, unix")),
        }
    }
}

/// Connection parameters for a MySQL server.
#[derive(Clone, PartialEq, Eq)]
pub struct MySqlSettings {
    pub user: String,
    pub password: String,
    pub protocol: Protocol,
    /// `host:port` for TCP, a socket path for unix
    pub addr: String,
    pub database: String,
    /// Bound on acquiring the connection
    pub timeout: Duration,
}

impl MySqlSettings {
    pub const DEFAULT_ADDR: &'static str = "localhost:3306";
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(user: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: String::new(),
            protocol: Protocol::Tcp,
            addr: Self::DEFAULT_ADDR.to_string(),
            database: database.into(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Connection string in `user:pass@proto(addr)/db?timeout=Ns` form.
    pub fn dsn(&self) -> String {
        self.format_dsn(&self.password)
    }

    /// [`dsn`](Self::dsn) with the password masked, for logs.
    pub fn redacted_dsn(&self) -> String {
        let mask = if self.password.is_empty() { "" } else { "***" };
        self.format_dsn(mask)
    }

    fn format_dsn(&self, password: &str) -> String {
        format!(
            "{}:{}@{}({})/{}?timeout={}s",
            self.user,
            password,
            self.protocol,
            self.addr,
            self.database,
            self.timeout.as_secs()
        )
    }

    /// Split a TCP address into host and port. `[v6]:port` is accepted.
    pub fn host_port(&self) -> Result<(String, u16)> {
        let addr = self.addr.trim();
        let (host, port) = match addr.rsplit_once(':') {
            Some((host, port)) if !host.is_empty() && !port.contains(']') => {
                let port = port
                    .parse::<u16>()
                    .map_err(|_| ExportError::connect(format!("invalid port in address '{addr}'")))?;
                (host, port)
            }
            _ => (addr, DEFAULT_PORT),
        };
        let host = host.trim_start_matches('[').trim_end_matches(']');
        if host.is_empty() {
            return Err(ExportError::connect(format!("missing host in address '{addr}'")));
        }
        Ok((host.to_string(), port))
    }

    /// sqlx connect options for these settings.
    pub fn connect_options(&self) -> Result<MySqlConnectOptions> {
        let options = MySqlConnectOptions::new()
            .username(&self.user)
            .database(&self.database);
        let options = if self.password.is_empty() {
            options
        } else {
            options.password(&self.password)
        };

        match self.protocol {
            Protocol::Tcp => {
                let (host, port) = self.host_port()?;
                Ok(options.host(&host).port(port))
            }
            Protocol::Unix => Ok(options.socket(&self.addr)),
        }
    }
}

impl fmt::Debug for MySqlSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MySqlSettings")
            .field("user", &self.user)
            .field("password", &"***")
            .field("protocol", &self.protocol)
            .field("addr", &self.addr)
            .field("database", &self.database)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// [`TabularSource`] over a MySQL connection pool.
#[derive(Debug, Clone)]
pub struct MySqlSource {
    pool: MySqlPool,
}

impl MySqlSource {
    /// Open a single-connection pool.
    pub async fn connect(settings: &MySqlSettings) -> Result<Self> {
        let options = settings.connect_options()?;
        debug!(dsn = %settings.redacted_dsn(), "connecting");

        let pool = MySqlPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(settings.timeout)
            .connect_with(options)
            .await
            .map_err(|e| ExportError::connect(e.to_string()))?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn text_column(row: &MySqlRow, column: &str) -> std::result::Result<Option<String>, sqlx::Error> {
    let bytes: Option<Vec<u8>> = row.try_get_unchecked(column)?;
    Ok(bytes.map(|b| String::from_utf8_lossy(&b).into_owned()))
}

fn describe_row(row: &MySqlRow) -> std::result::Result<ColumnDescription, sqlx::Error> {
    Ok(ColumnDescription {
        name: text_column(row, "Field")?.unwrap_or_default(),
        source_type: text_column(row, "Type")?.unwrap_or_default(),
        nullable: text_column(row, "Null")?.is_some_and(|n| n.eq_ignore_ascii_case("YES")),
        key: text_column(row, "Key")?.filter(|k| !k.is_empty()),
        default: text_column(row, "Default")?,
        extra: text_column(row, "Extra")?.filter(|e| !e.is_empty()),
    })
}

fn raw_cells(row: &MySqlRow) -> std::result::Result<RawRow, sqlx::Error> {
    (0..row.len())
        .map(|i| row.try_get_unchecked::<Option<Vec<u8>>, _>(i))
        .collect()
}

#[async_trait]
impl TabularSource for MySqlSource {
    async fn describe_columns(&self, table: &str) -> Result<Vec<ColumnDescription>> {
        let sql = format!("DESCRIBE {}", quote_identifier(table));
        let rows = sqlx::raw_sql(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ExportError::schema(table, e.to_string()))?;

        rows.iter()
            .map(describe_row)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| ExportError::schema(table, e.to_string()))
    }

    async fn execute_query<'a>(&'a self, query: &'a str) -> Result<QueryRows<'a>> {
        let mut rows = sqlx::raw_sql(query).fetch(&self.pool);

        // column names come with the first row
        let first = match rows.next().await {
            None => {
                return Ok(QueryRows {
                    columns: Vec::new(),
                    rows: stream::empty().boxed(),
                })
            }
            Some(Err(e)) => return Err(ExportError::query(query, e.to_string())),
            Some(Ok(row)) => row,
        };
        let columns = first
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();

        let rows = stream::once(async move { Ok(first) })
            .chain(rows)
            .map(move |row| {
                row.and_then(|row| raw_cells(&row))
                    .map_err(|e| ExportError::query(query, e.to_string()))
            })
            .boxed();

        Ok(QueryRows { columns, rows })
    }
}
