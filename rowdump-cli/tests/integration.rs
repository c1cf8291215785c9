use assert_cmd::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper to create a `rowdump` command that runs in an isolated temp directory.
/// Sets HOME to the temp dir so `~/.rowdump.toml` never leaks between tests.
fn rowdump_cmd(work_dir: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("rowdump");
    cmd.current_dir(work_dir.path());
    cmd.env("HOME", work_dir.path());
    cmd.env("NO_COLOR", "1");
    cmd.env_remove("ROWDUMP_PASSWORD");
    cmd
}

/// An address nothing listens on.
fn closed_addr() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("127.0.0.1:{port}")
}

// ============================================================================
// Flags
// ============================================================================

#[test]
fn version_flag() {
    cargo_bin_cmd!("rowdump")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("rowdump"));
}

#[test]
fn help_flag() {
    cargo_bin_cmd!("rowdump")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Dump a MySQL table as JSON"))
        .stdout(predicate::str::contains("--table"))
        .stdout(predicate::str::contains("--query"))
        .stdout(predicate::str::contains("--pretty"));
}

#[test]
fn verbose_quiet_conflict() {
    cargo_bin_cmd!("rowdump")
        .args(["--verbose", "--quiet"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn unknown_protocol_rejected() {
    let tmp = TempDir::new().unwrap();
    rowdump_cmd(&tmp)
        .args(["--user", "root", "--db", "gotest", "--table", "test", "--prot", "udp"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown protocol"));
}

// ============================================================================
// Usage errors
// ============================================================================

#[test]
fn missing_user_is_usage_error() {
    let tmp = TempDir::new().unwrap();
    rowdump_cmd(&tmp)
        .args(["--db", "gotest", "--table", "test"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "error: you must supply a user, password and dbname",
        ));
}

#[test]
fn missing_db_is_usage_error() {
    let tmp = TempDir::new().unwrap();
    rowdump_cmd(&tmp)
        .args(["--user", "root", "--table", "test"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("you must supply a user"));
}

#[test]
fn missing_table_is_usage_error() {
    let tmp = TempDir::new().unwrap();
    rowdump_cmd(&tmp)
        .args(["--user", "root", "--db", "gotest"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("which table should I use?"));
}

#[test]
fn usage_error_checked_before_connecting() {
    // the address is unreachable, but the missing table is reported first
    let tmp = TempDir::new().unwrap();
    rowdump_cmd(&tmp)
        .args(["--user", "root", "--db", "gotest", "--addr", closed_addr().as_str()])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("which table should I use?"));
}

// ============================================================================
// Connection errors
// ============================================================================

#[test]
fn unreachable_server() {
    let tmp = TempDir::new().unwrap();
    rowdump_cmd(&tmp)
        .args(["--user", "root", "--db", "gotest", "--table", "test", "--timeout", "2"])
        .args(["--addr", closed_addr().as_str()])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("error: unable to connect to db"));
}

#[test]
fn missing_unix_socket() {
    let tmp = TempDir::new().unwrap();
    let socket = tmp.path().join("mysqld.sock");
    rowdump_cmd(&tmp)
        .args(["--user", "root", "--db", "gotest", "--table", "test", "--prot", "unix"])
        .arg("--addr")
        .arg(&socket)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unable to connect to db"));
}

// ============================================================================
// Config file
// ============================================================================

#[test]
fn local_config_supplies_settings() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("rowdump.toml"),
        format!(
            "[connection]\nuser = \"root\"\ndb = \"gotest\"\naddr = \"{}\"\ntimeout = 2\n\n[export]\ntable = \"test\"\n",
            closed_addr()
        ),
    )
    .unwrap();

    // no usage error: everything came from the file, so the run gets as far
    // as the connection probe
    rowdump_cmd(&tmp)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unable to connect to db"));
}

#[test]
fn global_config_in_home() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join(".rowdump.toml"),
        "[connection]\nuser = \"root\"\ndb = \"gotest\"\n",
    )
    .unwrap();

    rowdump_cmd(&tmp)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("which table should I use?"));
}

#[test]
fn cli_flag_overrides_config() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("rowdump.toml"),
        "[connection]\nuser = \"root\"\ndb = \"gotest\"\n\n[export]\ntable = \"test\"\n",
    )
    .unwrap();

    rowdump_cmd(&tmp)
        .args(["--table", ""])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("which table should I use?"));
}

#[test]
fn explicit_config_not_found() {
    let tmp = TempDir::new().unwrap();
    rowdump_cmd(&tmp)
        .args(["--config", "missing.toml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn malformed_config() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("bad.toml");
    std::fs::write(&path, "[connection\nuser = root\n").unwrap();

    rowdump_cmd(&tmp)
        .arg("--config")
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to parse config file"));
}

#[test]
fn unknown_config_key() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("rowdump.toml");
    std::fs::write(&path, "[connection]\npassword = \"x\"\n").unwrap();

    rowdump_cmd(&tmp)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to parse config file"));
}
