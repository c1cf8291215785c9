//! Tests against a live MySQL server.
//!
//! Ignored by default. Point them at a scratch database with:
//!
//! ```text
//! ROWDUMP_TEST_USER=root ROWDUMP_TEST_PASS= ROWDUMP_TEST_ADDR=localhost:3306 \
//! ROWDUMP_TEST_DBNAME=gotest cargo test -p rowdump-export -- --ignored
//! ```
//!
//! Each test drops and recreates the `test` table.

#![cfg(feature = "mysql")]

use chrono::NaiveDate;
use rowdump_export::{
    export_table, inspect, ExportRequest, MySqlSettings, MySqlSource, Protocol,
};
use rowdump_tabular::{SemanticKind, Value};

const CREATE_TABLE: &str = "CREATE TABLE test (
  id int(11) NOT NULL AUTO_INCREMENT,
  nombre varchar(50) NOT NULL,
  codigo int(11) DEFAULT NULL,
  unidades decimal(3,2) NOT NULL,
  tiny tinyint(1) NOT NULL,
  texto longtext NOT NULL,
  fecha date NOT NULL,
  PRIMARY KEY (id)
) ENGINE=MyISAM AUTO_INCREMENT=1 DEFAULT CHARSET=utf8";

const INSERT_ROW: &str = "INSERT INTO `test` (`nombre`, `codigo`, `unidades`, `tiny`, `texto`, `fecha`) \
     VALUES ('xxxx', 1, 1.50, 1, 'asdaasdfasdfasdfasdf', '2012-01-01')";

fn env(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn settings() -> MySqlSettings {
    let mut settings = MySqlSettings::new(
        env("ROWDUMP_TEST_USER", "root"),
        env("ROWDUMP_TEST_DBNAME", "gotest"),
    );
    settings.password = env("ROWDUMP_TEST_PASS", "");
    settings.protocol = env("ROWDUMP_TEST_PROT", "tcp").parse().unwrap_or(Protocol::Tcp);
    settings.addr = env("ROWDUMP_TEST_ADDR", MySqlSettings::DEFAULT_ADDR);
    settings
}

async fn fresh_table(source: &MySqlSource, insert: bool) {
    sqlx::raw_sql("DROP TABLE IF EXISTS test")
        .execute(source.pool())
        .await
        .unwrap();
    sqlx::raw_sql(CREATE_TABLE)
        .execute(source.pool())
        .await
        .unwrap();
    if insert {
        sqlx::raw_sql(INSERT_ROW)
            .execute(source.pool())
            .await
            .unwrap();
    }
}

#[tokio::test]
#[ignore = "Requires a MySQL server"]
async fn test_inspect_live_table() {
    let source = MySqlSource::connect(&settings()).await.unwrap();
    fresh_table(&source, false).await;

    let map = inspect(&source, "test").await.unwrap();

    assert_eq!(map.len(), 7);
    assert_eq!(map.get("id"), Some(SemanticKind::Int64));
    assert_eq!(map.get("tiny"), Some(SemanticKind::Int32));
    assert_eq!(map.get("unidades"), Some(SemanticKind::Float64));
    assert_eq!(map.get("fecha"), Some(SemanticKind::Date));

    source.close().await;
}

#[tokio::test]
#[ignore = "Requires a MySQL server"]
async fn test_export_live_table() {
    let source = MySqlSource::connect(&settings()).await.unwrap();
    fresh_table(&source, true).await;

    let out = export_table(&source, &ExportRequest::table("test"))
        .await
        .unwrap();

    assert_eq!(out.conversion_failures, 0);
    assert_eq!(out.rows.len(), 1);
    let row = &out.rows[0];
    assert_eq!(row.get("id"), Some(&Value::Int64(1)));
    assert_eq!(row.get("nombre"), Some(&Value::Str("xxxx".into())));
    assert_eq!(row.get("unidades"), Some(&Value::Float64(1.5)));
    assert_eq!(row.get("tiny"), Some(&Value::Int32(1)));
    assert_eq!(
        row.get("fecha"),
        Some(&Value::Date(NaiveDate::from_ymd_opt(2012, 1, 1).unwrap()))
    );

    source.close().await;
}

#[tokio::test]
#[ignore = "Requires a MySQL server"]
async fn test_export_empty_table() {
    let source = MySqlSource::connect(&settings()).await.unwrap();
    fresh_table(&source, false).await;

    let out = export_table(&source, &ExportRequest::table("test"))
        .await
        .unwrap();
    assert!(out.rows.is_empty());

    source.close().await;
}

#[tokio::test]
#[ignore = "Requires a MySQL server"]
async fn test_missing_table_is_schema_error() {
    let source = MySqlSource::connect(&settings()).await.unwrap();

    let err = export_table(&source, &ExportRequest::table("rowdump_no_such_table"))
        .await
        .unwrap_err();
    assert!(err.is_schema(), "{err}");

    source.close().await;
}
