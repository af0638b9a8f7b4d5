#[path = "support/schema_fixtures.rs"]
mod schema_fixtures;

use ddlsync_core::{DataType, Mode, SchemaObject, TypeKind};
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
fn character_varying_normalizes_to_varchar() {
    let objects = load(
        Mode::Postgres,
        "CREATE TABLE public.users (
            id bigint NOT NULL,
            email character varying(255) NOT NULL,
            created_at timestamp with time zone DEFAULT now()
        );",
    );
    let users = table(&objects, "users");

    assert_eq!(
        users.columns[1].data_type,
        DataType::Varchar {
            length: Some(ddlsync_core::Length::Fixed(255))
        }
    );
    assert_eq!(
        users.columns[2].data_type,
        DataType::Timestamp {
            precision: None,
            with_timezone: true
        }
    );
    // now() is canonicalized to CURRENT_TIMESTAMP.
    assert_eq!(
        users.columns[2].default,
        Some(ddlsync_core::Expr::CurrentTimestamp { precision: None })
    );
}

#[test]
fn identity_columns_are_parsed() {
    let objects = load(
        Mode::Postgres,
        "CREATE TABLE t (id bigint GENERATED ALWAYS AS IDENTITY, x int);",
    );
    let t = table(&objects, "t");
    let identity = t.columns[0].identity.as_ref().expect("identity expected");
    assert!(identity.always);
    assert_eq!(identity.seed, 1);
    assert_eq!(identity.increment, 1);
    // Identity implies NOT NULL after normalization.
    assert!(!t.columns[0].nullable);
}

#[test]
fn create_index_statements_attach_to_their_table() {
    let objects = load(
        Mode::Postgres,
        "CREATE TABLE t (a int, b int);
         CREATE UNIQUE INDEX idx_t_a ON t (a);
         CREATE INDEX idx_t_ab ON t (a, b DESC);",
    );
    let t = table(&objects, "t");
    assert_eq!(t.indexes.len(), 2);

    let ab = t.indexes.iter().find(|i| i.name.value == "idx_t_ab").unwrap();
    assert!(!ab.columns[0].descending);
    assert!(ab.columns[1].descending);
}

#[test]
fn alter_table_add_constraint_is_replayed() {
    let objects = load(
        Mode::Postgres,
        "CREATE TABLE a (id int NOT NULL);
         CREATE TABLE b (a_id int NOT NULL);
         ALTER TABLE ONLY b ADD CONSTRAINT b_a_id_fkey FOREIGN KEY (a_id) REFERENCES a (id);",
    );
    let b = table(&objects, "b");
    assert_eq!(b.foreign_keys.len(), 1);
    assert_eq!(b.foreign_keys[0].name.as_ref().unwrap().value, "b_a_id_fkey");
}

#[test]
fn enum_types_and_extensions_are_objects() {
    let objects = load(
        Mode::Postgres,
        "CREATE TYPE mood AS ENUM ('sad', 'ok', 'happy');
         CREATE EXTENSION pgcrypto;",
    );

    let mood = objects
        .iter()
        .find_map(|o| match o {
            SchemaObject::Type(t) => Some(t.clone()),
            _ => None,
        })
        .expect("type should exist");
    assert_eq!(
        mood.kind,
        TypeKind::Enum(vec!["sad".into(), "ok".into(), "happy".into()])
    );

    assert!(objects.iter().any(|o| matches!(
        o,
        SchemaObject::Extension(e) if e.name.value == "pgcrypto"
    )));
}

#[test]
fn triggers_parse_textually_with_raw_body() {
    let objects = load(
        Mode::Postgres,
        "CREATE TABLE t (id int);
         CREATE TRIGGER trg AFTER INSERT OR UPDATE ON t FOR EACH ROW EXECUTE FUNCTION audit();",
    );
    let trigger = objects
        .iter()
        .find_map(|o| match o {
            SchemaObject::Trigger(t) => Some(t.clone()),
            _ => None,
        })
        .expect("trigger should exist");

    assert_eq!(trigger.timing, ddlsync_core::TriggerTiming::After);
    assert_eq!(
        trigger.events,
        vec![
            ddlsync_core::TriggerEvent::Insert,
            ddlsync_core::TriggerEvent::Update
        ]
    );
    assert!(trigger.for_each_row);
    assert_eq!(trigger.body, "EXECUTE FUNCTION audit()");
}

#[test]
fn comment_on_column_folds_into_the_column() {
    let objects = load(
        Mode::Postgres,
        "CREATE TABLE t (id int);
         COMMENT ON COLUMN t.id IS 'surrogate key';",
    );
    let t = table(&objects, "t");
    assert_eq!(t.columns[0].comment.as_deref(), Some("surrogate key"));
}
