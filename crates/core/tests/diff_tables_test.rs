#[path = "support/schema_fixtures.rs"]
mod schema_fixtures;

use ddlsync_core::{ChangeOp, ColumnPosition, Mode};
use schema_fixtures::plan;

const CURRENT: &str = "CREATE TABLE t (id int NOT NULL, PRIMARY KEY (id));";

#[test]
fn added_column_carries_its_position() {
    let desired = "CREATE TABLE t (id int NOT NULL, name varchar(100) NOT NULL, PRIMARY KEY (id));";
    let plan = plan(Mode::Mysql, CURRENT, desired);

    assert_eq!(plan.ops().len(), 1);
    match &plan.ops()[0] {
        ChangeOp::AddColumn {
            column, position, ..
        } => {
            assert_eq!(column.name.value, "name");
            assert_eq!(*position, Some(ColumnPosition::After(ddlsync_core::Ident::new("id"))));
        }
        other => panic!("expected AddColumn, got {}", other.tag()),
    }
}

#[test]
fn leading_column_is_added_first() {
    let desired = "CREATE TABLE t (tenant int NOT NULL, id int NOT NULL, PRIMARY KEY (id));";
    let plan = plan(Mode::Mysql, CURRENT, desired);

    assert_eq!(plan.ops().len(), 1);
    assert!(matches!(
        &plan.ops()[0],
        ChangeOp::AddColumn { position: Some(ColumnPosition::First), .. }
    ));
}

#[test]
fn removed_column_is_dropped() {
    let current = "CREATE TABLE t (id int NOT NULL, legacy int, PRIMARY KEY (id));";
    let plan = plan(Mode::Mysql, current, CURRENT);

    assert_eq!(plan.ops().len(), 1);
    assert!(matches!(
        &plan.ops()[0],
        ChangeOp::DropColumn { column, .. } if column.value == "legacy"
    ));
}

#[test]
fn type_change_produces_change_column_with_both_sides() {
    let desired = "CREATE TABLE t (id bigint NOT NULL, PRIMARY KEY (id));";
    let plan = plan(Mode::Mysql, CURRENT, desired);

    assert_eq!(plan.ops().len(), 1);
    match &plan.ops()[0] {
        ChangeOp::ChangeColumn { from, to, .. } => {
            assert_eq!(from.data_type, ddlsync_core::DataType::Int { unsigned: false });
            assert_eq!(to.data_type, ddlsync_core::DataType::BigInt { unsigned: false });
        }
        other => panic!("expected ChangeColumn, got {}", other.tag()),
    }
}

#[test]
fn display_width_differences_are_not_changes() {
    let current = "CREATE TABLE t (id int(11) NOT NULL, PRIMARY KEY (id));";
    let plan = plan(Mode::Mysql, current, CURRENT);
    assert!(plan.is_empty());
}

#[test]
fn quoted_numeric_defaults_match_bare_ones() {
    let current = "CREATE TABLE t (id int NOT NULL, n int DEFAULT '0', PRIMARY KEY (id));";
    let desired = "CREATE TABLE t (id int NOT NULL, n int DEFAULT 0, PRIMARY KEY (id));";
    let plan = plan(Mode::Mysql, current, desired);
    assert!(plan.is_empty());
}

#[test]
fn new_table_is_created_and_old_table_dropped() {
    let desired = "CREATE TABLE u (id int NOT NULL, PRIMARY KEY (id));";
    let plan = plan(Mode::Mysql, CURRENT, desired);

    let tags: Vec<&str> = plan.ops().iter().map(ChangeOp::tag).collect();
    assert_eq!(tags, ["DROP TABLE", "CREATE TABLE"]);
}

#[test]
fn renamed_table_annotation_avoids_drop_and_create() {
    let desired = "CREATE TABLE t2 (id int NOT NULL, PRIMARY KEY (id)); -- @renamed from=t";
    let plan = plan(Mode::Mysql, CURRENT, desired);

    assert_eq!(plan.ops().len(), 1);
    assert!(matches!(
        &plan.ops()[0],
        ChangeOp::RenameTable { from, to }
            if from.name.value == "t" && to.name.value == "t2"
    ));
}

#[test]
fn renamed_column_annotation_produces_rename() {
    let current = "CREATE TABLE t (id int NOT NULL, name varchar(50), PRIMARY KEY (id));";
    let desired =
        "CREATE TABLE t (id int NOT NULL, full_name varchar(50), -- @renamed from=name\n PRIMARY KEY (id));";
    let plan = plan(Mode::Mysql, current, desired);

    assert_eq!(plan.ops().len(), 1);
    assert!(matches!(
        &plan.ops()[0],
        ChangeOp::RenameColumn { from, to, .. }
            if from.value == "name" && to.value == "full_name"
    ));
}
