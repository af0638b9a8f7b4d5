use std::io::Write as _;
use std::process::Command;

use tempfile::NamedTempFile;

fn schema_file(sql: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    write!(file, "{sql}").expect("write schema");
    file
}

fn ddlsync(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_ddlsync"))
        .args(args)
        .output()
        .expect("binary should run")
}

#[test]
fn version_flag_exits_zero() {
    let output = ddlsync(&["--version"]);
    assert!(output.status.success());
}

#[test]
fn missing_database_and_current_file_is_a_usage_error() {
    let desired = schema_file("CREATE TABLE t (id int);");
    let output = ddlsync(&["mysql", "--file", desired.path().to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[usage]"), "stderr was: {stderr}");
}

#[test]
fn dry_run_against_a_schema_file_prints_the_plan() {
    let desired = schema_file(
        "CREATE TABLE t (id int NOT NULL, name varchar(100) NOT NULL, PRIMARY KEY (id));",
    );
    let current = schema_file("CREATE TABLE t (id int NOT NULL, PRIMARY KEY (id));");

    let output = ddlsync(&[
        "mysql",
        "--dry-run",
        "--file",
        desired.path().to_str().unwrap(),
        "--file",
        current.path().to_str().unwrap(),
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("ALTER TABLE t ADD COLUMN name varchar(100) NOT NULL AFTER id;"),
        "stdout was: {stdout}"
    );
}

#[test]
fn identical_schemas_report_nothing_modified() {
    let desired = schema_file("CREATE TABLE t (id int NOT NULL, PRIMARY KEY (id));");
    let current = schema_file("CREATE TABLE t (id int NOT NULL, PRIMARY KEY (id));");

    let output = ddlsync(&[
        "mysql",
        "--dry-run",
        "--file",
        desired.path().to_str().unwrap(),
        "--file",
        current.path().to_str().unwrap(),
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Nothing is modified"), "stdout was: {stdout}");
}

#[test]
fn export_prints_the_current_schema() {
    let desired = schema_file("");
    let current = schema_file("CREATE TABLE t (id int(11) NOT NULL, PRIMARY KEY (id));");

    let output = ddlsync(&[
        "mysql",
        "--export",
        "--file",
        desired.path().to_str().unwrap(),
        "--file",
        current.path().to_str().unwrap(),
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("CREATE TABLE t ("), "stdout was: {stdout}");
    assert!(stdout.contains("id int NOT NULL"), "stdout was: {stdout}");
}

#[test]
fn parse_errors_exit_one_with_a_tagged_message() {
    let desired = schema_file("CREATE TABLE broken (id int");
    let current = schema_file("CREATE TABLE t (id int);");

    let output = ddlsync(&[
        "mysql",
        "--dry-run",
        "--file",
        desired.path().to_str().unwrap(),
        "--file",
        current.path().to_str().unwrap(),
    ]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[parse]"), "stderr was: {stderr}");
}

#[test]
fn skip_drop_withholds_destructive_statements() {
    let desired = schema_file("CREATE TABLE t (id int NOT NULL, PRIMARY KEY (id));");
    let current =
        schema_file("CREATE TABLE t (id int NOT NULL, legacy int, PRIMARY KEY (id));");

    let output = ddlsync(&[
        "mysql",
        "--dry-run",
        "--skip-drop",
        "--file",
        desired.path().to_str().unwrap(),
        "--file",
        current.path().to_str().unwrap(),
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("-- skipped: DROP COLUMN t.legacy"), "stdout was: {stdout}");
}
