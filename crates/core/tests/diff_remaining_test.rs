#[path = "support/schema_fixtures.rs"]
mod schema_fixtures;

use ddlsync_core::{ChangeOp, Engine, Error, Mode};
use schema_fixtures::plan;

#[test]
fn view_body_change_replaces_where_supported() {
    let current = "CREATE TABLE t (a int, b int); CREATE VIEW v AS SELECT a FROM t;";
    let desired = "CREATE TABLE t (a int, b int); CREATE VIEW v AS SELECT a, b FROM t;";

    let mysql = plan(Mode::Mysql, current, desired);
    assert!(matches!(mysql.ops(), [ChangeOp::ReplaceView(_)]));

    let mssql = plan(Mode::Mssql, current, desired);
    let tags: Vec<&str> = mssql.ops().iter().map(ChangeOp::tag).collect();
    assert_eq!(tags, ["DROP VIEW", "CREATE VIEW"]);
}

#[test]
fn removed_view_is_dropped() {
    let current = "CREATE TABLE t (a int); CREATE VIEW v AS SELECT a FROM t;";
    let desired = "CREATE TABLE t (a int);";
    let plan = plan(Mode::Postgres, current, desired);
    assert!(matches!(plan.ops(), [ChangeOp::DropView(_)]));
}

#[test]
fn trigger_change_recreates_the_trigger() {
    let current = "CREATE TABLE t (id int);
        CREATE TRIGGER trg BEFORE INSERT ON t FOR EACH ROW EXECUTE FUNCTION f();";
    let desired = "CREATE TABLE t (id int);
        CREATE TRIGGER trg AFTER INSERT ON t FOR EACH ROW EXECUTE FUNCTION f();";
    let plan = plan(Mode::Postgres, current, desired);

    let tags: Vec<&str> = plan.ops().iter().map(ChangeOp::tag).collect();
    assert_eq!(tags, ["DROP TRIGGER", "CREATE TRIGGER"]);
}

#[test]
fn sequences_are_recreated_on_change() {
    let current = "CREATE SEQUENCE seq INCREMENT BY 1;";
    let desired = "CREATE SEQUENCE seq INCREMENT BY 10;";
    let plan = plan(Mode::Postgres, current, desired);

    let tags: Vec<&str> = plan.ops().iter().map(ChangeOp::tag).collect();
    assert_eq!(tags, ["DROP SEQUENCE", "CREATE SEQUENCE"]);
}

#[test]
fn extension_addition_and_removal() {
    let current = "CREATE EXTENSION pgcrypto;";
    let desired = "CREATE EXTENSION citext;";
    let plan = plan(Mode::Postgres, current, desired);

    let tags: Vec<&str> = plan.ops().iter().map(ChangeOp::tag).collect();
    assert_eq!(tags, ["DROP EXTENSION", "CREATE EXTENSION"]);
}

#[test]
fn policy_change_recreates_the_policy() {
    let current = "CREATE TABLE docs (owner text);
        CREATE POLICY p ON docs USING (owner = 'a');";
    let desired = "CREATE TABLE docs (owner text);
        CREATE POLICY p ON docs USING (owner = 'b');";
    let plan = plan(Mode::Postgres, current, desired);

    let tags: Vec<&str> = plan.ops().iter().map(ChangeOp::tag).collect();
    assert_eq!(tags, ["DROP POLICY", "CREATE POLICY"]);
}

#[test]
fn conflicting_table_options_are_an_unsupported_operation() {
    let current = "CREATE TABLE t (id int) ENGINE=InnoDB;";
    let desired = "CREATE TABLE t (id int) ENGINE=MyISAM;";
    let result = Engine::new(Mode::Mysql).plan(current, desired, false);
    assert!(matches!(result, Err(Error::Unsupported(_))));
}

#[test]
fn omitted_table_options_are_not_a_change() {
    let current = "CREATE TABLE t (id int) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4;";
    let desired = "CREATE TABLE t (id int);";
    assert!(plan(Mode::Mysql, current, desired).is_empty());
}
