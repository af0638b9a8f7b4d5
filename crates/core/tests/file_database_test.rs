use std::io::Write as _;
use std::path::PathBuf;

use ddlsync_core::{Database, FileDatabase, split_sql_statements};

#[test]
fn splitting_honors_quotes_comments_and_dollar_bodies() {
    let sql = "CREATE TABLE a (note varchar(20) DEFAULT 'semi;colon');\n\
               -- CREATE TABLE commented_out (x int);\n\
               CREATE FUNCTION f() RETURNS trigger AS $fn$ BEGIN x; END $fn$ LANGUAGE plpgsql;\n\
               CREATE TABLE b (id int);\n";
    let fragments = split_sql_statements(sql);

    assert_eq!(fragments.len(), 3);
    assert!(fragments[0].text.contains("semi;colon"));
    assert!(fragments[1].text.contains("$fn$ BEGIN x; END $fn$"));
    assert_eq!(fragments[2].line, 4);
}

#[test]
fn go_lines_separate_batches() {
    let sql = "CREATE TABLE a (id int)\nGO\nCREATE TABLE b (id int)\n";
    let fragments = split_sql_statements(sql);
    assert_eq!(fragments.len(), 2);
    assert_eq!(fragments[1].line, 3);
}

#[test]
fn file_database_serves_schema_sections() {
    let mut database = FileDatabase::from_sql(
        "CREATE TABLE users (id int);
         CREATE TABLE posts (id int);
         ALTER TABLE posts ADD CONSTRAINT fk FOREIGN KEY (id) REFERENCES users (id);
         CREATE VIEW v AS SELECT id FROM users;
         CREATE TRIGGER trg AFTER INSERT ON users FOR EACH ROW EXECUTE FUNCTION f();",
    );

    assert_eq!(database.table_names().unwrap(), ["users", "posts"]);
    assert_eq!(database.views().unwrap().len(), 1);
    assert_eq!(database.triggers().unwrap().len(), 1);
    assert!(database.types().unwrap().is_empty());

    let posts = database.dump_table_ddl("posts").unwrap();
    assert!(posts.contains("CREATE TABLE posts"));
    assert!(posts.contains("ADD CONSTRAINT fk"));
}

#[test]
fn execute_is_a_no_op_and_close_is_idempotent() {
    let mut database = FileDatabase::from_sql("CREATE TABLE t (id int);");
    database.execute("DROP TABLE t;").unwrap();
    database.close().unwrap();
    database.close().unwrap();
    assert_eq!(database.table_names().unwrap(), ["t"]);
}

#[test]
fn open_reads_files_and_reports_missing_ones() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "CREATE TABLE t (id int);").expect("write");

    let mut database = FileDatabase::open(&[file.path().to_path_buf()]).expect("open");
    assert_eq!(database.table_names().unwrap(), ["t"]);

    let missing = FileDatabase::open(&[PathBuf::from("/nonexistent/schema.sql")]);
    assert!(matches!(
        missing,
        Err(ddlsync_core::Error::Connection(_))
    ));
}
