#[path = "support/schema_fixtures.rs"]
mod schema_fixtures;

use ddlsync_core::{DataType, Length, Mode, SchemaObject};
use schema_fixtures::load;

fn table(objects: &[SchemaObject], name: &str) -> ddlsync_core::Table {
    objects
        .iter()
        .find_map(|o| match o {
            SchemaObject::Table(t) if t.name.name.value == name => Some(t.clone()),
            _ => None,
        })
        .unwrap_or_else(|| panic!("table {name} should exist"))
}

#[test]
fn bracketed_identifiers_and_schema_are_parsed() {
    let objects = load(
        Mode::Mssql,
        "CREATE TABLE [dbo].[users] (
            [id] int NOT NULL,
            [name] nvarchar(50) NOT NULL
        );",
    );
    let users = table(&objects, "users");
    assert_eq!(users.name.schema.as_ref().unwrap().value, "dbo");
    assert!(users.name.name.quoted);
    assert_eq!(
        users.columns[1].data_type,
        DataType::NVarchar {
            length: Some(Length::Fixed(50))
        }
    );
}

#[test]
fn identity_with_not_for_replication() {
    let objects = load(
        Mode::Mssql,
        "CREATE TABLE t (
            id int IDENTITY(10,5) NOT FOR REPLICATION NOT NULL,
            x int
        );",
    );
    let t = table(&objects, "t");
    let id = &t.columns[0];
    let identity = id.identity.as_ref().expect("identity expected");
    assert_eq!(identity.seed, 10);
    assert_eq!(identity.increment, 5);
    assert!(id.not_for_replication);
    assert!(!t.columns[1].not_for_replication);
}

#[test]
fn varchar_max_is_preserved() {
    let objects = load(Mode::Mssql, "CREATE TABLE t (body nvarchar(max));");
    let t = table(&objects, "t");
    assert_eq!(
        t.columns[0].data_type,
        DataType::NVarchar {
            length: Some(Length::Max)
        }
    );
}

#[test]
fn named_default_constraints_keep_their_name() {
    let objects = load(
        Mode::Mssql,
        "CREATE TABLE t (
            flag int NOT NULL CONSTRAINT DF_t_flag DEFAULT 0
        );",
    );
    let t = table(&objects, "t");
    let flag = &t.columns[0];
    assert_eq!(
        flag.default_constraint.as_ref().map(|n| n.value.as_str()),
        Some("DF_t_flag")
    );
    assert_eq!(
        flag.default,
        Some(ddlsync_core::Expr::Literal(ddlsync_core::Literal::Number(
            "0".to_string()
        )))
    );
}

#[test]
fn clustered_primary_key_is_recorded() {
    let objects = load(
        Mode::Mssql,
        "CREATE TABLE t (
            id int NOT NULL,
            CONSTRAINT PK_t PRIMARY KEY CLUSTERED (id)
        );",
    );
    let t = table(&objects, "t");
    let pk = t.primary_key.expect("primary key expected");
    assert_eq!(pk.name.as_ref().unwrap().value, "PK_t");
    assert_eq!(pk.clustered, Some(true));
}

#[test]
fn tsql_trigger_header_is_parsed() {
    let objects = load(
        Mode::Mssql,
        "CREATE TABLE t (id int);
         CREATE TRIGGER trg_t ON t AFTER INSERT, UPDATE AS UPDATE t SET id = id;",
    );
    let trigger = objects
        .iter()
        .find_map(|o| match o {
            SchemaObject::Trigger(t) => Some(t.clone()),
            _ => None,
        })
        .expect("trigger should exist");

    assert_eq!(trigger.table.name.value, "t");
    assert_eq!(trigger.timing, ddlsync_core::TriggerTiming::After);
    assert_eq!(
        trigger.events,
        vec![
            ddlsync_core::TriggerEvent::Insert,
            ddlsync_core::TriggerEvent::Update
        ]
    );
    assert!(!trigger.for_each_row);
    assert_eq!(trigger.body, "UPDATE t SET id = id");
}

#[test]
fn go_separates_batches() {
    let objects = load(
        Mode::Mssql,
        "CREATE TABLE a (id int)\nGO\nCREATE TABLE b (id int)\nGO\n",
    );
    assert_eq!(objects.len(), 2);
}
