#[path = "support/schema_fixtures.rs"]
mod schema_fixtures;

use ddlsync_core::{DataType, Expr, Length, Mode, SchemaObject};
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
fn create_table_canonicalizes_types() {
    let objects = load(
        Mode::Mysql,
        "CREATE TABLE users (
            id bigint(20) unsigned NOT NULL AUTO_INCREMENT,
            age int(11),
            name varchar(100) NOT NULL,
            bio text,
            PRIMARY KEY (id)
        );",
    );

    let users = table(&objects, "users");
    assert_eq!(users.columns.len(), 4);

    let id = &users.columns[0];
    assert_eq!(id.data_type, DataType::BigInt { unsigned: true });
    assert!(id.auto_increment);
    assert!(!id.nullable);

    let age = &users.columns[1];
    assert_eq!(age.data_type, DataType::Int { unsigned: false });
    assert!(age.nullable);

    let name = &users.columns[2];
    assert_eq!(
        name.data_type,
        DataType::Varchar {
            length: Some(Length::Fixed(100))
        }
    );

    let pk = users.primary_key.expect("primary key should be parsed");
    assert_eq!(pk.columns.len(), 1);
    assert_eq!(pk.columns[0].column.value, "id");
}

#[test]
fn backtick_identifiers_stay_quoted() {
    let objects = load(
        Mode::Mysql,
        "CREATE TABLE `order` (`key` int NOT NULL, PRIMARY KEY (`key`));",
    );
    let order = table(&objects, "order");
    assert!(order.name.name.quoted);
    assert!(order.columns[0].name.quoted);
}

#[test]
fn inline_index_and_unique_key_are_attached() {
    let objects = load(
        Mode::Mysql,
        "CREATE TABLE t (
            a int NOT NULL,
            b int NOT NULL,
            INDEX idx_a (a),
            UNIQUE KEY uq_b (b)
        );",
    );
    let t = table(&objects, "t");
    assert_eq!(t.indexes.len(), 2);

    let idx_a = t.indexes.iter().find(|i| i.name.value == "idx_a").unwrap();
    assert!(!idx_a.unique);
    assert_eq!(idx_a.columns[0].column.value, "a");

    let uq_b = t.indexes.iter().find(|i| i.name.value == "uq_b").unwrap();
    assert!(uq_b.unique);
}

#[test]
fn current_timestamp_default_and_on_update() {
    let objects = load(
        Mode::Mysql,
        "CREATE TABLE t (
            updated_at timestamp NOT NULL DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP
        );",
    );
    let t = table(&objects, "t");
    let updated = &t.columns[0];
    assert_eq!(
        updated.default,
        Some(Expr::CurrentTimestamp { precision: None })
    );
    assert_eq!(
        updated.on_update,
        Some(Expr::CurrentTimestamp { precision: None })
    );
}

#[test]
fn foreign_key_and_check_constraints_are_collected() {
    let objects = load(
        Mode::Mysql,
        "CREATE TABLE orders (
            id int NOT NULL,
            user_id int NOT NULL,
            amount int NOT NULL,
            PRIMARY KEY (id),
            CONSTRAINT fk_orders_user FOREIGN KEY (user_id) REFERENCES users (id) ON DELETE CASCADE,
            CONSTRAINT chk_amount CHECK (amount > 0)
        );",
    );
    let orders = table(&objects, "orders");

    assert_eq!(orders.foreign_keys.len(), 1);
    let fk = &orders.foreign_keys[0];
    assert_eq!(fk.name.as_ref().unwrap().value, "fk_orders_user");
    assert_eq!(fk.referenced_table.name.value, "users");
    assert_eq!(fk.on_delete, Some(ddlsync_core::RefAction::Cascade));

    assert_eq!(orders.checks.len(), 1);
    assert_eq!(orders.checks[0].name.as_ref().unwrap().value, "chk_amount");
}

#[test]
fn unknown_statement_is_a_parse_error() {
    let result = ddlsync_core::parse(Mode::Mysql, "GRANT ALL ON db.* TO 'u'@'%';");
    assert!(matches!(result, Err(ddlsync_core::Error::Parse(_))));
}

#[test]
fn syntax_error_reports_the_statement_line() {
    let sql = "CREATE TABLE ok (id int);\nCREATE TABLE broken (id int;\n";
    let error = ddlsync_core::parse(Mode::Mysql, sql).unwrap_err();
    match error {
        ddlsync_core::Error::Parse(parse_error) => {
            assert_eq!(parse_error.span.line, 2);
        }
        other => panic!("expected a parse error, got {other}"),
    }
}
