//! MSSQL-specific preparation applied before handing a fragment to the SQL
//! grammar.
//!
//! T-SQL decorations the grammar does not accept are blanked out of the text
//! (spaces keep byte offsets and line numbers stable) and recorded by source
//! line so conversion can reattach them to the right column or constraint.

use std::collections::{BTreeMap, BTreeSet};

use super::SqlFragment;
use crate::Mode;

#[derive(Debug, Default)]
pub(super) struct Prepared {
    pub text: String,
    /// Absolute source lines carrying `NOT FOR REPLICATION`.
    pub not_for_replication: BTreeSet<usize>,
    /// Absolute source lines carrying `CLUSTERED` (true) or `NONCLUSTERED`
    /// (false) on a key definition.
    pub clustered: BTreeMap<usize, bool>,
}

pub(super) fn prepare(mode: Mode, fragment: &SqlFragment) -> Prepared {
    if mode != Mode::Mssql {
        return Prepared {
            text: fragment.text.clone(),
            ..Prepared::default()
        };
    }

    let mut text = fragment.text.clone();
    let mut not_for_replication = BTreeSet::new();
    let mut clustered = BTreeMap::new();

    blank_phrase(&mut text, "not for replication", |line| {
        not_for_replication.insert(fragment.line + line);
    });
    blank_phrase(&mut text, "nonclustered", |line| {
        clustered.insert(fragment.line + line, false);
    });
    blank_phrase(&mut text, "clustered", |line| {
        clustered.entry(fragment.line + line).or_insert(true);
    });

    Prepared {
        text,
        not_for_replication,
        clustered,
    }
}

/// Replaces every occurrence of `phrase` (case-insensitive, outside quoted
/// runs, on word boundaries) with spaces, reporting the 0-based line of each
/// hit.
fn blank_phrase(text: &mut String, phrase: &str, mut on_hit: impl FnMut(usize)) {
    let lower = text.to_ascii_lowercase();
    let bytes = lower.as_bytes();
    let mut replacements = Vec::new();
    let mut quote: Option<u8> = None;
    let mut line = 0usize;
    let mut i = 0usize;

    while i < bytes.len() {
        let b = bytes[i];
        if b == b'\n' {
            line += 1;
        }

        match quote {
            Some(q) => {
                if b == q {
                    quote = None;
                }
                i += 1;
            }
            None => match b {
                b'\'' => {
                    quote = Some(b'\'');
                    i += 1;
                }
                b'[' => {
                    quote = Some(b']');
                    i += 1;
                }
                b'"' => {
                    quote = Some(b'"');
                    i += 1;
                }
                _ => {
                    if lower[i..].starts_with(phrase)
                        && boundary_before(bytes, i)
                        && boundary_after(bytes, i + phrase.len())
                    {
                        replacements.push((i, phrase.len()));
                        on_hit(line);
                        i += phrase.len();
                    } else {
                        i += 1;
                    }
                }
            },
        }
    }

    let mut replaced = text.clone().into_bytes();
    for (at, len) in replacements {
        for b in &mut replaced[at..at + len] {
            *b = b' ';
        }
    }
    *text = String::from_utf8(replaced).expect("blanking ASCII keeps UTF-8 valid");
}

fn boundary_before(bytes: &[u8], at: usize) -> bool {
    at == 0 || !is_word_byte(bytes[at - 1])
}

fn boundary_after(bytes: &[u8], at: usize) -> bool {
    at >= bytes.len() || !is_word_byte(bytes[at])
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}
