#![allow(dead_code)]

use ddlsync_core::{Engine, Mode, Plan, SchemaObject, statements_to_text};

pub fn load(mode: Mode, sql: &str) -> Vec<SchemaObject> {
    Engine::new(mode)
        .load_schema(sql)
        .unwrap_or_else(|e| panic!("schema should load: {e}"))
}

pub fn plan(mode: Mode, current: &str, desired: &str) -> Plan {
    Engine::new(mode)
        .plan(current, desired, false)
        .unwrap_or_else(|e| panic!("diff should succeed: {e}"))
}

pub fn plan_skip_drop(mode: Mode, current: &str, desired: &str) -> Plan {
    Engine::new(mode)
        .plan(current, desired, true)
        .unwrap_or_else(|e| panic!("diff should succeed: {e}"))
}

/// Plan then render, returning the statement text line by line.
pub fn migration_sql(mode: Mode, current: &str, desired: &str) -> Vec<String> {
    let engine = Engine::new(mode);
    let plan = engine
        .plan(current, desired, false)
        .unwrap_or_else(|e| panic!("diff should succeed: {e}"));
    let statements = engine
        .statements(&plan)
        .unwrap_or_else(|e| panic!("render should succeed: {e}"));
    statements_to_text(mode, &statements)
        .lines()
        .map(str::to_string)
        .collect()
}
