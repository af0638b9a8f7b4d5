#[path = "support/schema_fixtures.rs"]
mod schema_fixtures;

use ddlsync_core::{Engine, Error, Mode};
use schema_fixtures::load;

#[test]
fn duplicate_table_is_a_schema_error() {
    let result = Engine::new(Mode::Mysql)
        .load_schema("CREATE TABLE t (id int); CREATE TABLE t (id int);");
    assert!(matches!(result, Err(Error::Schema(_))));
}

#[test]
fn duplicate_column_is_a_schema_error() {
    let result =
        Engine::new(Mode::Mysql).load_schema("CREATE TABLE t (id int, ID varchar(10));");
    assert!(matches!(result, Err(Error::Schema(_))), "column names are case-insensitive");
}

#[test]
fn orphan_index_is_a_schema_error() {
    let result =
        Engine::new(Mode::Postgres).load_schema("CREATE INDEX idx ON missing_table (a);");
    assert!(matches!(result, Err(Error::Schema(_))));
}

#[test]
fn orphan_trigger_is_a_schema_error() {
    let result = Engine::new(Mode::Postgres)
        .load_schema("CREATE TRIGGER trg AFTER INSERT ON nope FOR EACH ROW EXECUTE FUNCTION f();");
    assert!(matches!(result, Err(Error::Schema(_))));
}

#[test]
fn index_on_missing_column_is_a_schema_error() {
    let result = Engine::new(Mode::Postgres)
        .load_schema("CREATE TABLE t (a int); CREATE INDEX idx ON t (b);");
    assert!(matches!(result, Err(Error::Schema(_))));
}

#[test]
fn alter_table_add_column_respects_position() {
    let objects = load(
        Mode::Mysql,
        "CREATE TABLE t (a int, c int);
         ALTER TABLE t ADD COLUMN b int AFTER a;",
    );
    let table = objects
        .iter()
        .find_map(|o| match o {
            ddlsync_core::SchemaObject::Table(t) => Some(t.clone()),
            _ => None,
        })
        .unwrap();
    let names: Vec<&str> = table.columns.iter().map(|c| c.name.value.as_str()).collect();
    assert_eq!(names, ["a", "b", "c"]);
}

#[test]
fn dump_style_alter_statements_replay_onto_tables() {
    let objects = load(
        Mode::Mysql,
        "CREATE TABLE t (id int NOT NULL);
         ALTER TABLE t ADD PRIMARY KEY (id);
         ALTER TABLE t ADD CONSTRAINT chk CHECK (id > 0);",
    );
    let table = objects
        .iter()
        .find_map(|o| match o {
            ddlsync_core::SchemaObject::Table(t) => Some(t.clone()),
            _ => None,
        })
        .unwrap();
    assert!(table.primary_key.is_some());
    assert_eq!(table.checks.len(), 1);
}
