#[path = "support/schema_fixtures.rs"]
mod schema_fixtures;

use ddlsync_core::{ChangeOp, Mode};
use schema_fixtures::plan;

const CYCLIC: &str = "CREATE TABLE a (
        id int NOT NULL,
        b_id int,
        PRIMARY KEY (id),
        CONSTRAINT fk_a_b FOREIGN KEY (b_id) REFERENCES b (id)
    );
    CREATE TABLE b (
        id int NOT NULL,
        a_id int,
        PRIMARY KEY (id),
        CONSTRAINT fk_b_a FOREIGN KEY (a_id) REFERENCES a (id)
    );";

#[test]
fn cyclic_tables_are_created_without_keys_then_keys_added_last() {
    let plan = plan(Mode::Mysql, "", CYCLIC);
    let tags: Vec<&str> = plan.ops().iter().map(ChangeOp::tag).collect();
    assert_eq!(
        tags,
        ["CREATE TABLE", "CREATE TABLE", "ADD FOREIGN KEY", "ADD FOREIGN KEY"]
    );

    for op in &plan.ops()[..2] {
        let ChangeOp::CreateTable(table) = op else {
            panic!("expected CreateTable");
        };
        assert!(
            table.foreign_keys.is_empty(),
            "cyclic keys must be split out of CREATE TABLE"
        );
    }

    // Deferred keys are ordered by constraint name.
    let names: Vec<String> = plan.ops()[2..]
        .iter()
        .map(|op| match op {
            ChangeOp::AddForeignKey { fk, .. } => fk.name.as_ref().unwrap().value.clone(),
            other => panic!("expected AddForeignKey, got {}", other.tag()),
        })
        .collect();
    assert_eq!(names, ["fk_a_b", "fk_b_a"]);
}

#[test]
fn dropping_cyclic_tables_drops_their_keys_first() {
    let plan = plan(Mode::Mysql, CYCLIC, "");
    let tags: Vec<&str> = plan.ops().iter().map(ChangeOp::tag).collect();
    assert_eq!(
        tags,
        ["DROP FOREIGN KEY", "DROP FOREIGN KEY", "DROP TABLE", "DROP TABLE"]
    );
}

#[test]
fn acyclic_references_stay_inline() {
    let desired = "CREATE TABLE parent (id int NOT NULL, PRIMARY KEY (id));
        CREATE TABLE child (p int, CONSTRAINT fk FOREIGN KEY (p) REFERENCES parent (id));";
    let plan = plan(Mode::Mysql, "", desired);

    let child = plan
        .ops()
        .iter()
        .find_map(|op| match op {
            ChangeOp::CreateTable(table) if table.name.name.value == "child" => Some(table),
            _ => None,
        })
        .expect("child table planned");
    assert_eq!(child.foreign_keys.len(), 1, "acyclic keys stay inline");
}
