#[path = "support/schema_fixtures.rs"]
mod schema_fixtures;

use ddlsync_core::{ChangeOp, Mode};
use schema_fixtures::plan;

#[test]
fn index_column_change_is_drop_then_add() {
    let current = "CREATE TABLE t (a int, b int, INDEX idx_x (a));";
    let desired = "CREATE TABLE t (a int, b int, INDEX idx_x (a, b));";
    let plan = plan(Mode::Mysql, current, desired);

    let tags: Vec<&str> = plan.ops().iter().map(ChangeOp::tag).collect();
    assert_eq!(tags, ["DROP INDEX", "ADD INDEX"]);
}

#[test]
fn index_uniqueness_change_recreates_the_index() {
    let current = "CREATE TABLE t (a int, INDEX idx_x (a));";
    let desired = "CREATE TABLE t (a int, UNIQUE KEY idx_x (a));";
    let plan = plan(Mode::Mysql, current, desired);

    let tags: Vec<&str> = plan.ops().iter().map(ChangeOp::tag).collect();
    assert_eq!(tags, ["DROP INDEX", "ADD INDEX"]);
}

#[test]
fn foreign_key_definition_change_is_drop_then_add() {
    let current = "CREATE TABLE p (id int NOT NULL, PRIMARY KEY (id));
        CREATE TABLE c (p_id int, CONSTRAINT fk_c FOREIGN KEY (p_id) REFERENCES p (id));";
    let desired = "CREATE TABLE p (id int NOT NULL, PRIMARY KEY (id));
        CREATE TABLE c (p_id int, CONSTRAINT fk_c FOREIGN KEY (p_id) REFERENCES p (id) ON DELETE CASCADE);";
    let plan = plan(Mode::Mysql, current, desired);

    let tags: Vec<&str> = plan.ops().iter().map(ChangeOp::tag).collect();
    assert_eq!(tags, ["DROP FOREIGN KEY", "ADD FOREIGN KEY"]);
}

#[test]
fn primary_key_change_is_drop_then_add() {
    let current = "CREATE TABLE t (a int NOT NULL, b int NOT NULL, PRIMARY KEY (a));";
    let desired = "CREATE TABLE t (a int NOT NULL, b int NOT NULL, PRIMARY KEY (a, b));";
    let plan = plan(Mode::Mysql, current, desired);

    let tags: Vec<&str> = plan.ops().iter().map(ChangeOp::tag).collect();
    assert_eq!(tags, ["DROP PRIMARY KEY", "ADD PRIMARY KEY"]);
}

#[test]
fn check_expression_change_recreates_the_constraint() {
    let current = "CREATE TABLE t (n int, CONSTRAINT chk CHECK (n > 0));";
    let desired = "CREATE TABLE t (n int, CONSTRAINT chk CHECK (n >= 0));";
    let plan = plan(Mode::Mysql, current, desired);

    let tags: Vec<&str> = plan.ops().iter().map(ChangeOp::tag).collect();
    assert_eq!(tags, ["DROP CHECK", "ADD CHECK"]);
}

#[test]
fn unchanged_constraints_produce_no_ops() {
    let schema = "CREATE TABLE p (id int NOT NULL, PRIMARY KEY (id));
        CREATE TABLE c (
            p_id int,
            n int,
            CONSTRAINT fk_c FOREIGN KEY (p_id) REFERENCES p (id),
            CONSTRAINT chk CHECK (n > 0),
            INDEX idx_n (n)
        );";
    let plan = plan(Mode::Mysql, schema, schema);
    assert!(plan.is_empty());
}

#[test]
fn type_change_on_referenced_column_brackets_the_foreign_key() {
    let current = "CREATE TABLE t (id int NOT NULL, PRIMARY KEY (id));
        CREATE TABLE u (t_id int, CONSTRAINT fk_u_t FOREIGN KEY (t_id) REFERENCES t (id));";
    let desired = "CREATE TABLE t (id bigint NOT NULL, PRIMARY KEY (id));
        CREATE TABLE u (t_id bigint, CONSTRAINT fk_u_t FOREIGN KEY (t_id) REFERENCES t (id));";
    let plan = plan(Mode::Mysql, current, desired);

    let tags: Vec<&str> = plan.ops().iter().map(ChangeOp::tag).collect();
    assert_eq!(
        tags,
        ["DROP FOREIGN KEY", "CHANGE COLUMN", "CHANGE COLUMN", "ADD FOREIGN KEY"]
    );

    assert!(matches!(
        &plan.ops()[0],
        ChangeOp::DropForeignKey { name, .. } if name.value == "fk_u_t"
    ));
    assert!(matches!(
        &plan.ops()[3],
        ChangeOp::AddForeignKey { fk, .. }
            if fk.name.as_ref().is_some_and(|n| n.value == "fk_u_t")
    ));
}
