#[path = "support/schema_fixtures.rs"]
mod schema_fixtures;

use ddlsync_core::{ChangeOp, Mode, is_destructive};
use schema_fixtures::{plan_skip_drop, plan};

#[test]
fn dropped_column_is_withheld_and_reported() {
    let current = "CREATE TABLE t (id int NOT NULL, legacy int, PRIMARY KEY (id));";
    let desired = "CREATE TABLE t (id int NOT NULL, PRIMARY KEY (id));";

    let without = plan(Mode::Mysql, current, desired);
    assert_eq!(without.ops().len(), 1);
    assert!(matches!(without.ops()[0], ChangeOp::DropColumn { .. }));

    let with = plan_skip_drop(Mode::Mysql, current, desired);
    assert!(with.ops().is_empty());
    assert_eq!(with.skipped().len(), 1);
    assert_eq!(with.skipped()[0].describe(), "DROP COLUMN t.legacy");
}

#[test]
fn widening_changes_survive_skip_drop() {
    let current = "CREATE TABLE t (id int NOT NULL, PRIMARY KEY (id));";
    let desired = "CREATE TABLE t (id bigint NOT NULL, PRIMARY KEY (id));";

    let plan = plan_skip_drop(Mode::Mysql, current, desired);
    assert_eq!(plan.ops().len(), 1);
    assert!(plan.skipped().is_empty());
}

#[test]
fn narrowing_changes_count_as_destructive() {
    let current = "CREATE TABLE t (id bigint NOT NULL, name varchar(200), PRIMARY KEY (id));";
    let desired = "CREATE TABLE t (id int NOT NULL, name varchar(100), PRIMARY KEY (id));";

    let plan = plan_skip_drop(Mode::Mysql, current, desired);
    assert!(plan.ops().is_empty());
    assert_eq!(plan.skipped().len(), 2);
}

#[test]
fn non_destructive_part_of_a_mixed_plan_survives() {
    let current = "CREATE TABLE t (id int NOT NULL, legacy int, PRIMARY KEY (id));";
    let desired = "CREATE TABLE t (id int NOT NULL, fresh varchar(20), PRIMARY KEY (id));";

    let plan = plan_skip_drop(Mode::Mysql, current, desired);
    let tags: Vec<&str> = plan.ops().iter().map(ChangeOp::tag).collect();
    assert_eq!(tags, ["ADD COLUMN"]);
    assert_eq!(plan.skipped().len(), 1);
}

#[test]
fn destructive_set_matches_the_drop_family() {
    let current = "CREATE TABLE t (id int NOT NULL, PRIMARY KEY (id));";
    let plan = plan(Mode::Mysql, current, "");
    assert!(plan.ops().iter().all(is_destructive));
}
