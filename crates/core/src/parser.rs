//! DDL parsing: dialect-aware conversion of SQL text into the statement
//! list consumed by the assembler.
//!
//! Lexing and grammar are delegated to `sqlparser` with the dialect picked
//! by [`Mode`] (backtick identifiers for MySQL, bracketed identifiers and
//! `max` lengths for MSSQL, dollar-quoted strings for PostgreSQL). This
//! module owns statement splitting (so every statement keeps a source line
//! for error reporting), rename-annotation extraction, and the textual
//! `CREATE TRIGGER` path that bypasses `sqlparser` because trigger bodies
//! are dialect procedural code, not parseable SQL.

mod convert;
mod prepass;
mod trigger;

use sqlparser::dialect::{MsSqlDialect, MySqlDialect, PostgreSqlDialect};
use sqlparser::parser::Parser;

use crate::annotation::extract_annotations;
use crate::error::{ParseError, Result, SourceSpan};
use crate::ir::{
    CheckConstraint, Column, ColumnPosition, CommentDef, Extension, ForeignKey, Index, Policy,
    PrimaryKey, QualifiedName, Sequence, Table, Trigger, TypeDef, View,
};
use crate::Mode;

/// One parsed top-level DDL statement, in source order.
#[derive(Debug, Clone, PartialEq)]
pub enum DdlStatement {
    CreateTable(Table),
    CreateIndex { table: QualifiedName, index: Index },
    CreateView(View),
    CreateTrigger(Trigger),
    CreateType(TypeDef),
    CreateSequence(Sequence),
    CreateExtension(Extension),
    CreatePolicy(Policy),
    AlterTable { table: QualifiedName, actions: Vec<AlterAction> },
    Comment(CommentDef),
}

/// Supported `ALTER TABLE` actions, as they appear in schema dumps.
#[derive(Debug, Clone, PartialEq)]
pub enum AlterAction {
    AddColumn {
        column: Box<Column>,
        position: Option<ColumnPosition>,
    },
    AddPrimaryKey(PrimaryKey),
    AddForeignKey(ForeignKey),
    AddCheck(CheckConstraint),
    AddIndex(Index),
}

/// Parses a complete DDL text into the ordered statement list.
///
/// A single syntax or conversion error halts parsing; the error carries the
/// line of the offending statement.
pub fn parse(mode: Mode, sql: &str) -> Result<Vec<DdlStatement>> {
    let (clean_sql, annotations) = extract_annotations(sql);
    let mut statements = Vec::new();

    for fragment in split_sql_statements(&clean_sql) {
        if is_blank(&fragment.text) {
            continue;
        }

        if trigger::is_create_trigger(&fragment.text) {
            statements.push(DdlStatement::CreateTrigger(trigger::parse_create_trigger(
                &fragment,
            )?));
            continue;
        }

        let prepared = prepass::prepare(mode, &fragment);
        let ast = parse_fragment(mode, &prepared.text, fragment.line)?;
        for statement in &ast {
            statements.push(convert::statement(
                mode,
                statement,
                &fragment,
                &prepared,
                &annotations,
            )?);
        }
    }

    Ok(statements)
}

fn parse_fragment(
    mode: Mode,
    text: &str,
    line: usize,
) -> Result<Vec<sqlparser::ast::Statement>> {
    let parsed = match mode {
        Mode::Mysql => Parser::parse_sql(&MySqlDialect {}, text),
        Mode::Postgres => Parser::parse_sql(&PostgreSqlDialect {}, text),
        Mode::Mssql => Parser::parse_sql(&MsSqlDialect {}, text),
    };

    parsed.map_err(|source| {
        ParseError::with_source(
            SourceSpan::line(line),
            format!("syntax error in `{}`", first_words(text, 6)),
            Box::new(source),
        )
        .into()
    })
}

/// A top-level statement fragment with its 1-based starting line.
#[derive(Debug, Clone)]
pub struct SqlFragment {
    pub text: String,
    pub line: usize,
}

/// Splits SQL text on top-level `;` boundaries, honoring quoted strings,
/// delimited identifiers, line and block comments, PostgreSQL dollar
/// quoting, and MSSQL `GO` batch-separator lines.
pub fn split_sql_statements(sql: &str) -> Vec<SqlFragment> {
    let bytes = sql.as_bytes();
    let mut fragments = Vec::new();
    let mut start = 0usize;
    let mut i = 0usize;
    let mut line = 1usize;
    let mut fragment_line = 1usize;

    #[derive(PartialEq)]
    enum State {
        Plain,
        Single,
        Double,
        Backtick,
        Bracket,
        LineComment,
        BlockComment,
        Dollar(String),
    }
    let mut state = State::Plain;

    let push = |start: usize, end: usize, fragment_line: usize, out: &mut Vec<SqlFragment>| {
        let text = &sql[start..end];
        if !is_blank(text) {
            let leading_lines = text
                .bytes()
                .take(text.len() - text.trim_start().len())
                .filter(|b| *b == b'\n')
                .count();
            out.push(SqlFragment {
                text: text.trim().to_string(),
                line: fragment_line + leading_lines,
            });
        }
    };

    while i < bytes.len() {
        let b = bytes[i];
        if b == b'\n' {
            line += 1;
        }

        match &state {
            State::Single => {
                if b == b'\\' && bytes.get(i + 1).is_some() {
                    i += 2;
                    continue;
                }
                if b == b'\'' {
                    if bytes.get(i + 1) == Some(&b'\'') {
                        i += 2;
                        continue;
                    }
                    state = State::Plain;
                }
                i += 1;
            }
            State::Double | State::Backtick | State::Bracket => {
                let close = match state {
                    State::Double => b'"',
                    State::Backtick => b'`',
                    _ => b']',
                };
                if b == close {
                    if bytes.get(i + 1) == Some(&close) {
                        i += 2;
                        continue;
                    }
                    state = State::Plain;
                }
                i += 1;
            }
            State::LineComment => {
                if b == b'\n' {
                    state = State::Plain;
                }
                i += 1;
            }
            State::BlockComment => {
                if b == b'*' && bytes.get(i + 1) == Some(&b'/') {
                    state = State::Plain;
                    i += 2;
                } else {
                    i += 1;
                }
            }
            State::Dollar(tag) => {
                if b == b'$' && sql[i..].starts_with(tag.as_str()) {
                    let len = tag.len();
                    state = State::Plain;
                    i += len;
                } else {
                    i += 1;
                }
            }
            State::Plain => match b {
                b'\'' => {
                    state = State::Single;
                    i += 1;
                }
                b'"' => {
                    state = State::Double;
                    i += 1;
                }
                b'`' => {
                    state = State::Backtick;
                    i += 1;
                }
                b'[' => {
                    state = State::Bracket;
                    i += 1;
                }
                b'-' if bytes.get(i + 1) == Some(&b'-') => {
                    state = State::LineComment;
                    i += 2;
                }
                b'/' if bytes.get(i + 1) == Some(&b'*') => {
                    state = State::BlockComment;
                    i += 2;
                }
                b'$' => match dollar_tag(&sql[i..]) {
                    Some(tag) => {
                        i += tag.len();
                        state = State::Dollar(tag);
                    }
                    None => i += 1,
                },
                b';' => {
                    push(start, i, fragment_line, &mut fragments);
                    start = i + 1;
                    fragment_line = line;
                    i += 1;
                }
                b'\n' => {
                    // A bare GO line separates MSSQL batches like a `;`.
                    if let Some(end) = go_line_end(sql, i + 1) {
                        push(start, i + 1, fragment_line, &mut fragments);
                        start = end;
                        line += sql[i + 1..end].bytes().filter(|b| *b == b'\n').count();
                        fragment_line = line;
                        i = end;
                    } else {
                        i += 1;
                    }
                }
                _ => i += 1,
            },
        }
    }

    push(start, bytes.len(), fragment_line, &mut fragments);
    fragments
}

/// Matches `$tag$` at the start of `s` and returns the full opening tag.
fn dollar_tag(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    let mut i = 1;
    while i < bytes.len() {
        match bytes[i] {
            b'$' => return Some(s[..=i].to_string()),
            b if b.is_ascii_alphanumeric() || b == b'_' => i += 1,
            _ => return None,
        }
    }
    None
}

/// If the line starting at `at` is exactly `GO`, returns the offset just
/// past its line ending.
fn go_line_end(sql: &str, at: usize) -> Option<usize> {
    let rest = &sql[at..];
    let line_end = rest.find('\n').map_or(rest.len(), |p| p + 1);
    let line = rest[..line_end].trim();
    if line.eq_ignore_ascii_case("go") {
        Some(at + line_end)
    } else {
        None
    }
}

fn is_blank(text: &str) -> bool {
    text.lines().all(|line| {
        let trimmed = line.trim();
        trimmed.is_empty() || trimmed.starts_with("--")
    })
}

fn first_words(text: &str, n: usize) -> String {
    text.split_whitespace().take(n).collect::<Vec<_>>().join(" ")
}
