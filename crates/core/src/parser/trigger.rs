//! Textual `CREATE TRIGGER` parsing.
//!
//! Trigger bodies are procedural code in each vendor's language, so the SQL
//! grammar cannot parse them. The header carries everything the differ
//! compares structurally (timing, events, target table, granularity); the
//! body is kept verbatim and compared as collapsed text.

use super::SqlFragment;
use crate::error::{ParseError, Result, SourceSpan};
use crate::ir::{Ident, QualifiedName, Trigger, TriggerEvent, TriggerTiming};

pub(super) fn is_create_trigger(text: &str) -> bool {
    let mut words = text.split_whitespace();
    if !words.next().is_some_and(|w| w.eq_ignore_ascii_case("create")) {
        return false;
    }
    match words.next() {
        Some(w) if w.eq_ignore_ascii_case("trigger") => true,
        Some(w) if w.eq_ignore_ascii_case("or") => {
            words.next().is_some_and(|w| w.eq_ignore_ascii_case("replace"))
                && words.next().is_some_and(|w| w.eq_ignore_ascii_case("trigger"))
        }
        _ => false,
    }
}

/// Two header shapes:
///
/// ```sql
/// CREATE TRIGGER t {BEFORE|AFTER|INSTEAD OF} INSERT [OR UPDATE] ON tbl [FOR EACH ROW] <body>
/// CREATE TRIGGER t ON tbl {AFTER|INSTEAD OF} INSERT [, UPDATE] AS <body>   -- T-SQL
/// ```
pub(super) fn parse_create_trigger(fragment: &SqlFragment) -> Result<Trigger> {
    let mut cursor = Cursor::new(&fragment.text, fragment.line);

    cursor.expect_keyword("create")?;
    if cursor.peek_keyword("or") {
        cursor.expect_keyword("or")?;
        cursor.expect_keyword("replace")?;
    }
    cursor.expect_keyword("trigger")?;
    let name = cursor.qualified_name()?;

    if cursor.peek_keyword("on") {
        // T-SQL shape.
        cursor.expect_keyword("on")?;
        let table = cursor.qualified_name()?;
        let timing = cursor.timing()?;
        let mut events = vec![cursor.event()?];
        while cursor.consume_punct(',') {
            events.push(cursor.event()?);
        }
        cursor.expect_keyword("as")?;
        return Ok(Trigger {
            name,
            table,
            timing,
            events,
            for_each_row: false,
            body: cursor.rest(),
        });
    }

    let timing = cursor.timing()?;
    let mut events = vec![cursor.event()?];
    while cursor.peek_keyword("or") {
        cursor.expect_keyword("or")?;
        events.push(cursor.event()?);
    }
    cursor.expect_keyword("on")?;
    let table = cursor.qualified_name()?;

    let mut for_each_row = false;
    if cursor.peek_keyword("for") {
        cursor.expect_keyword("for")?;
        cursor.expect_keyword("each")?;
        if cursor.peek_keyword("row") {
            cursor.expect_keyword("row")?;
            for_each_row = true;
        } else {
            cursor.expect_keyword("statement")?;
        }
    }

    Ok(Trigger {
        name,
        table,
        timing,
        events,
        for_each_row,
        body: cursor.rest(),
    })
}

struct Cursor<'a> {
    text: &'a str,
    pos: usize,
    start_line: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str, start_line: usize) -> Self {
        Self {
            text,
            pos: 0,
            start_line,
        }
    }

    fn error(&self, message: impl Into<String>) -> crate::Error {
        let line = self.start_line
            + self.text[..self.pos].bytes().filter(|b| *b == b'\n').count();
        ParseError::new(SourceSpan::line(line), message).into()
    }

    fn skip_spaces(&mut self) {
        while let Some(b) = self.text.as_bytes().get(self.pos) {
            if b.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn peek_word(&mut self) -> Option<&'a str> {
        self.skip_spaces();
        let rest = &self.text[self.pos..];
        let end = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        (end > 0).then(|| &rest[..end])
    }

    fn peek_keyword(&mut self, keyword: &str) -> bool {
        self.peek_word()
            .is_some_and(|w| w.eq_ignore_ascii_case(keyword))
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<()> {
        match self.peek_word() {
            Some(word) if word.eq_ignore_ascii_case(keyword) => {
                self.pos += word.len();
                Ok(())
            }
            other => Err(self.error(format!(
                "expected `{}` in CREATE TRIGGER, found `{}`",
                keyword.to_ascii_uppercase(),
                other.unwrap_or("end of statement"),
            ))),
        }
    }

    fn consume_punct(&mut self, punct: char) -> bool {
        self.skip_spaces();
        if self.text[self.pos..].starts_with(punct) {
            self.pos += punct.len_utf8();
            true
        } else {
            false
        }
    }

    fn ident(&mut self) -> Result<Ident> {
        self.skip_spaces();
        let rest = &self.text[self.pos..];
        let bytes = rest.as_bytes();

        let (open, close) = match bytes.first() {
            Some(b'"') => ('"', '"'),
            Some(b'`') => ('`', '`'),
            Some(b'[') => ('[', ']'),
            _ => {
                let word = self
                    .peek_word()
                    .ok_or_else(|| self.error("expected identifier in CREATE TRIGGER"))?;
                self.pos += word.len();
                return Ok(Ident::new(word));
            }
        };

        let inner = &rest[open.len_utf8()..];
        let end = inner
            .find(close)
            .ok_or_else(|| self.error("unterminated quoted identifier"))?;
        self.pos += open.len_utf8() + end + close.len_utf8();
        Ok(Ident::quoted(&inner[..end]))
    }

    fn qualified_name(&mut self) -> Result<QualifiedName> {
        let first = self.ident()?;
        if self.consume_punct('.') {
            let name = self.ident()?;
            Ok(QualifiedName {
                schema: Some(first),
                name,
            })
        } else {
            Ok(QualifiedName {
                schema: None,
                name: first,
            })
        }
    }

    fn timing(&mut self) -> Result<TriggerTiming> {
        if self.peek_keyword("before") {
            self.expect_keyword("before")?;
            return Ok(TriggerTiming::Before);
        }
        if self.peek_keyword("after") {
            self.expect_keyword("after")?;
            return Ok(TriggerTiming::After);
        }
        if self.peek_keyword("instead") {
            self.expect_keyword("instead")?;
            self.expect_keyword("of")?;
            return Ok(TriggerTiming::InsteadOf);
        }
        Err(self.error("expected BEFORE, AFTER, or INSTEAD OF"))
    }

    fn event(&mut self) -> Result<TriggerEvent> {
        let word = self
            .peek_word()
            .ok_or_else(|| self.error("expected trigger event"))?;
        let event = match word.to_ascii_lowercase().as_str() {
            "insert" => TriggerEvent::Insert,
            "update" => TriggerEvent::Update,
            "delete" => TriggerEvent::Delete,
            "truncate" => TriggerEvent::Truncate,
            other => {
                return Err(self.error(format!("unknown trigger event `{other}`")));
            }
        };
        self.pos += word.len();
        // `UPDATE OF col, ...` column lists are not modeled; skip them.
        if event == TriggerEvent::Update && self.peek_keyword("of") {
            self.expect_keyword("of")?;
            loop {
                self.ident()?;
                if !self.consume_punct(',') {
                    break;
                }
            }
        }
        Ok(event)
    }

    fn rest(&mut self) -> String {
        self.text[self.pos..].trim().trim_end_matches(';').trim().to_string()
    }
}
