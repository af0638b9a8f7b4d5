//! `-- @renamed from=old_name` comment extraction.
//!
//! Renames are never inferred; they must be written next to the renamed
//! table or column in the desired DDL. The extractor pulls the annotations
//! out (recording their source line) and returns the SQL with the annotation
//! text blanked so the parser never sees it. Line boundaries are preserved,
//! keeping every other statement's reported location stable.

use crate::Ident;

const RENAMED_MARKER: &str = "@renamed";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameAnnotation {
    /// 1-based line the annotation appeared on.
    pub line: usize,
    pub from: Ident,
}

pub fn extract_annotations(sql: &str) -> (String, Vec<RenameAnnotation>) {
    let mut cleaned = String::with_capacity(sql.len());
    let mut annotations = Vec::new();

    for (index, raw_line) in sql.split_inclusive('\n').enumerate() {
        let (line, ending) = match raw_line.strip_suffix('\n') {
            Some(line) => (line, "\n"),
            None => (raw_line, ""),
        };

        match comment_start(line).and_then(|at| parse_renamed(&line[at + 2..])) {
            Some((from, comment_span)) => {
                let at = comment_start(line).unwrap_or(0);
                annotations.push(RenameAnnotation {
                    line: index + 1,
                    from,
                });
                cleaned.push_str(&line[..at + 2]);
                cleaned.push_str(&line[at + 2..][..comment_span.0]);
                cleaned.push_str(&line[at + 2..][comment_span.1..]);
            }
            None => cleaned.push_str(line),
        }
        cleaned.push_str(ending);
    }

    (cleaned, annotations)
}

/// Byte offset of `--` on this line, skipping occurrences inside single- or
/// double-quoted runs.
fn comment_start(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    let mut quote: Option<u8> = None;
    let mut i = 0;

    while i < bytes.len() {
        match quote {
            Some(q) => {
                if bytes[i] == q {
                    if bytes.get(i + 1) == Some(&q) {
                        i += 2;
                        continue;
                    }
                    quote = None;
                }
                i += 1;
            }
            None => match bytes[i] {
                b'\'' | b'"' | b'`' => {
                    quote = Some(bytes[i]);
                    i += 1;
                }
                b'-' if bytes.get(i + 1) == Some(&b'-') => return Some(i),
                _ => i += 1,
            },
        }
    }

    None
}

/// Parses `@renamed from=<ident>` out of a comment body. Returns the source
/// identifier and the byte span of the annotation within the comment.
fn parse_renamed(comment: &str) -> Option<(Ident, (usize, usize))> {
    let start = comment.find(RENAMED_MARKER)?;
    let mut cursor = start + RENAMED_MARKER.len();

    cursor = skip_spaces(comment, cursor);
    if !comment[cursor..].starts_with("from") {
        return None;
    }
    cursor += "from".len();
    cursor = skip_spaces(comment, cursor);
    if !comment[cursor..].starts_with('=') {
        return None;
    }
    cursor = skip_spaces(comment, cursor + 1);

    let (from, end) = parse_ident(comment, cursor)?;
    Some((from, (start, end)))
}

fn skip_spaces(s: &str, mut i: usize) -> usize {
    let bytes = s.as_bytes();
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

fn parse_ident(s: &str, start: usize) -> Option<(Ident, usize)> {
    let bytes = s.as_bytes();
    if start >= bytes.len() {
        return None;
    }

    if bytes[start] == b'"' {
        let mut value = String::new();
        let mut i = start + 1;
        while i < bytes.len() {
            if bytes[i] == b'"' {
                if bytes.get(i + 1) == Some(&b'"') {
                    value.push('"');
                    i += 2;
                    continue;
                }
                return Some((Ident::quoted(value), i + 1));
            }
            value.push(bytes[i] as char);
            i += 1;
        }
        return None;
    }

    let mut end = start;
    while end < bytes.len() && !bytes[end].is_ascii_whitespace() {
        end += 1;
    }
    if end == start {
        return None;
    }
    Some((Ident::new(&s[start..end]), end))
}
