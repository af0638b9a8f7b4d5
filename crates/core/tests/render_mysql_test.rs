#[path = "support/schema_fixtures.rs"]
mod schema_fixtures;

use ddlsync_core::Mode;
use schema_fixtures::migration_sql;

#[test]
fn added_column_renders_with_after_clause() {
    let current = "CREATE TABLE t (id int NOT NULL, PRIMARY KEY (id));";
    let desired =
        "CREATE TABLE t (id int NOT NULL, name varchar(100) NOT NULL, PRIMARY KEY (id));";
    let sql = migration_sql(Mode::Mysql, current, desired);
    assert_eq!(
        sql,
        ["ALTER TABLE t ADD COLUMN name varchar(100) NOT NULL AFTER id;"]
    );
}

#[test]
fn change_column_uses_modify_column() {
    let current = "CREATE TABLE t (id int NOT NULL, PRIMARY KEY (id));";
    let desired = "CREATE TABLE t (id bigint NOT NULL, PRIMARY KEY (id));";
    let sql = migration_sql(Mode::Mysql, current, desired);
    assert_eq!(sql, ["ALTER TABLE t MODIFY COLUMN id bigint NOT NULL;"]);
}

#[test]
fn index_change_renders_drop_then_create() {
    let current = "CREATE TABLE t (a int, b int, INDEX idx_x (a));";
    let desired = "CREATE TABLE t (a int, b int, INDEX idx_x (a, b));";
    let sql = migration_sql(Mode::Mysql, current, desired);
    assert_eq!(
        sql,
        ["DROP INDEX idx_x ON t;", "CREATE INDEX idx_x ON t (a, b);"]
    );
}

#[test]
fn reserved_identifiers_are_backtick_quoted() {
    let desired = "CREATE TABLE `order` (`key` int NOT NULL, PRIMARY KEY (`key`));";
    let sql = migration_sql(Mode::Mysql, "", desired).join("\n");
    assert!(sql.contains("CREATE TABLE `order`"));
    assert!(sql.contains("`key` int NOT NULL"));
}

#[test]
fn foreign_key_cycle_renders_add_constraint_statements_last() {
    let desired = "CREATE TABLE a (id int NOT NULL, b_id int, PRIMARY KEY (id),
            CONSTRAINT fk_a_b FOREIGN KEY (b_id) REFERENCES b (id));
        CREATE TABLE b (id int NOT NULL, a_id int, PRIMARY KEY (id),
            CONSTRAINT fk_b_a FOREIGN KEY (a_id) REFERENCES a (id));";
    let sql = migration_sql(Mode::Mysql, "", desired);

    let adds: Vec<&String> = sql.iter().filter(|s| s.contains("ADD CONSTRAINT")).collect();
    assert_eq!(adds.len(), 2);
    assert!(sql[sql.len() - 2].contains("fk_a_b"));
    assert!(sql[sql.len() - 1].contains("fk_b_a"));
}

#[test]
fn drop_column_renders_alter_table() {
    let current = "CREATE TABLE t (id int NOT NULL, legacy int, PRIMARY KEY (id));";
    let desired = "CREATE TABLE t (id int NOT NULL, PRIMARY KEY (id));";
    let sql = migration_sql(Mode::Mysql, current, desired);
    assert_eq!(sql, ["ALTER TABLE t DROP COLUMN legacy;"]);
}

#[test]
fn replace_view_renders_create_or_replace() {
    let current = "CREATE TABLE t (id int, n int);
        CREATE VIEW v AS SELECT id FROM t;";
    let desired = "CREATE TABLE t (id int, n int);
        CREATE VIEW v AS SELECT id, n FROM t;";
    let sql = migration_sql(Mode::Mysql, current, desired);
    assert_eq!(sql, ["CREATE OR REPLACE VIEW v AS SELECT id, n FROM t;"]);
}
