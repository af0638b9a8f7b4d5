#[path = "support/schema_fixtures.rs"]
mod schema_fixtures;

use ddlsync_core::Mode;
use schema_fixtures::migration_sql;

#[test]
fn change_column_renders_minimal_alter_statements() {
    let current = "CREATE TABLE users (id bigint NOT NULL, email varchar(255));";
    let desired = "CREATE TABLE users (id bigint NOT NULL, email varchar(320) NOT NULL DEFAULT '');";
    let sql = migration_sql(Mode::Postgres, current, desired);

    assert_eq!(
        sql,
        [
            "ALTER TABLE users ALTER COLUMN email TYPE varchar(320);",
            "ALTER TABLE users ALTER COLUMN email SET NOT NULL;",
            "ALTER TABLE users ALTER COLUMN email SET DEFAULT '';",
        ]
    );
}

#[test]
fn dropping_a_default_renders_drop_default() {
    let current = "CREATE TABLE t (n int DEFAULT 0);";
    let desired = "CREATE TABLE t (n int);";
    let sql = migration_sql(Mode::Postgres, current, desired);
    assert_eq!(sql, ["ALTER TABLE t ALTER COLUMN n DROP DEFAULT;"]);
}

#[test]
fn added_column_ignores_position() {
    let current = "CREATE TABLE t (id int NOT NULL);";
    let desired = "CREATE TABLE t (tenant int NOT NULL, id int NOT NULL);";
    let sql = migration_sql(Mode::Postgres, current, desired);
    assert_eq!(sql, ["ALTER TABLE t ADD COLUMN tenant int NOT NULL;"]);
}

#[test]
fn unique_constraint_drops_via_drop_constraint() {
    let current = "CREATE TABLE t (a int, CONSTRAINT t_a_key UNIQUE (a));";
    let desired = "CREATE TABLE t (a int);";
    let sql = migration_sql(Mode::Postgres, current, desired);
    assert_eq!(sql, ["ALTER TABLE t DROP CONSTRAINT t_a_key;"]);
}

#[test]
fn plain_index_drops_via_drop_index() {
    let current = "CREATE TABLE t (a int); CREATE INDEX idx_a ON t (a);";
    let desired = "CREATE TABLE t (a int);";
    let sql = migration_sql(Mode::Postgres, current, desired);
    assert_eq!(sql, ["DROP INDEX idx_a;"]);
}

#[test]
fn enum_value_addition_renders_alter_type() {
    let current = "CREATE TYPE mood AS ENUM ('sad', 'ok');";
    let desired = "CREATE TYPE mood AS ENUM ('sad', 'ok', 'happy');";
    let sql = migration_sql(Mode::Postgres, current, desired);
    assert_eq!(sql, ["ALTER TYPE mood ADD VALUE 'happy';"]);
}

#[test]
fn incompatible_enum_change_recreates_the_type() {
    let current = "CREATE TYPE mood AS ENUM ('sad', 'ok');";
    let desired = "CREATE TYPE mood AS ENUM ('ok', 'sad');";
    let sql = migration_sql(Mode::Postgres, current, desired);
    assert_eq!(
        sql,
        [
            "DROP TYPE mood;",
            "CREATE TYPE mood AS ENUM ('ok', 'sad');"
        ]
    );
}

#[test]
fn comment_changes_render_comment_on() {
    let current = "CREATE TABLE t (id int);";
    let desired = "CREATE TABLE t (id int); COMMENT ON COLUMN t.id IS 'surrogate key';";
    let sql = migration_sql(Mode::Postgres, current, desired);
    assert_eq!(
        sql,
        ["COMMENT ON COLUMN t.id IS 'surrogate key';"]
    );
}

#[test]
fn policies_render_create_and_drop() {
    let current = "CREATE TABLE docs (owner text);";
    let desired = "CREATE TABLE docs (owner text);
        CREATE POLICY p_owner ON docs FOR SELECT USING (owner = current_user);";
    let sql = migration_sql(Mode::Postgres, current, desired).join("\n");
    assert!(sql.contains("CREATE POLICY p_owner ON docs FOR SELECT USING"));
}
