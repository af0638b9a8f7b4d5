#[path = "support/schema_fixtures.rs"]
mod schema_fixtures;

use ddlsync_core::{ChangeOp, Mode};
use schema_fixtures::plan;

#[test]
fn drops_of_dependents_precede_table_changes_and_adds_come_last() {
    let current = "CREATE TABLE t (id int NOT NULL, old int, PRIMARY KEY (id));
        CREATE TABLE u (t_id int, CONSTRAINT fk_u FOREIGN KEY (t_id) REFERENCES t (id));";
    let desired = "CREATE TABLE t (id int NOT NULL, fresh int, PRIMARY KEY (id));
        CREATE TABLE u (t_id int);";
    let plan = plan(Mode::Mysql, current, desired);

    let tags: Vec<&str> = plan.ops().iter().map(ChangeOp::tag).collect();
    let position = |tag: &str| {
        tags.iter()
            .position(|t| *t == tag)
            .unwrap_or_else(|| panic!("{tag} should be planned in {tags:?}"))
    };

    assert!(position("DROP FOREIGN KEY") < position("ADD COLUMN"));
    assert!(position("ADD COLUMN") < position("DROP COLUMN"));
}

#[test]
fn create_tables_follow_foreign_key_dependencies() {
    let desired = "CREATE TABLE child (parent_id int, CONSTRAINT fk FOREIGN KEY (parent_id) REFERENCES parent (id));
        CREATE TABLE parent (id int NOT NULL, PRIMARY KEY (id));";
    let plan = plan(Mode::Mysql, "", desired);

    let created: Vec<String> = plan
        .ops()
        .iter()
        .filter_map(|op| match op {
            ChangeOp::CreateTable(table) => Some(table.name.name.value.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(created, ["parent", "child"]);
}

#[test]
fn views_are_created_after_tables_and_in_dependency_order() {
    let desired = "CREATE TABLE t (id int NOT NULL, PRIMARY KEY (id));
        CREATE VIEW v_outer AS SELECT id FROM v_inner;
        CREATE VIEW v_inner AS SELECT id FROM t;";
    let plan = plan(Mode::Postgres, "", desired);

    let names: Vec<String> = plan
        .ops()
        .iter()
        .map(|op| match op {
            ChangeOp::CreateTable(table) => table.name.name.value.clone(),
            ChangeOp::CreateView(view) => view.name.name.value.clone(),
            other => other.tag().to_string(),
        })
        .collect();
    assert_eq!(names, ["t", "v_inner", "v_outer"]);
}

#[test]
fn within_a_group_order_is_deterministic_by_name() {
    let desired = "CREATE TABLE zebra (id int NOT NULL, PRIMARY KEY (id));
        CREATE TABLE aardvark (id int NOT NULL, PRIMARY KEY (id));";
    let plan = plan(Mode::Mysql, "", desired);

    let created: Vec<String> = plan
        .ops()
        .iter()
        .filter_map(|op| match op {
            ChangeOp::CreateTable(table) => Some(table.name.name.value.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(created, ["aardvark", "zebra"]);
}

#[test]
fn trigger_drop_precedes_table_change() {
    let current = "CREATE TABLE t (id int NOT NULL, PRIMARY KEY (id));
        CREATE TRIGGER trg BEFORE INSERT ON t FOR EACH ROW SET @x = 1;";
    let desired = "CREATE TABLE t (id bigint NOT NULL, PRIMARY KEY (id));";
    let plan = plan(Mode::Mysql, current, desired);

    let tags: Vec<&str> = plan.ops().iter().map(ChangeOp::tag).collect();
    assert_eq!(tags, ["DROP TRIGGER", "CHANGE COLUMN"]);
}
