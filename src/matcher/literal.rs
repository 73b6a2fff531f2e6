//! Literal and regex matching over the virtual text.
//!
//! Both modes compile down to one `regex::Regex`. Literal queries are
//! escaped and their whitespace runs relaxed to `\s+` so a query copied
//! from a wrapped line still matches. User regexes get every unescaped
//! `.` rewritten to a class that excludes newline and the block boundary
//! marker, so `.` cannot silently cross a block edge.

use crate::model::QueryError;
use crate::vtl::{Span, VirtualText, BLOCK_BOUNDARY_MARKER};
use regex::{Regex, RegexBuilder};
use tracing::debug;

/// Sentinel standing in for `\.` while unescaped dots are rewritten.
/// Private-use, adjacent to the boundary marker, never present in input.
const ESCAPED_DOT_PLACEHOLDER: char = '\u{E001}';

/// Compile the search regex for a query.
///
/// Compilation failure is a user error (`QueryError::Regex`), not a bug;
/// the caller surfaces it in the error envelope.
pub fn build_search_regex(
    query: &str,
    use_regex: bool,
    case_sensitive: bool,
) -> Result<Regex, QueryError> {
    let pattern = if use_regex {
        substitute_unescaped_dots(query)
    } else {
        escape_literal(query)
    };
    RegexBuilder::new(&pattern)
        .case_insensitive(!case_sensitive)
        .build()
        .map_err(|err| QueryError::Regex {
            reason: err.to_string(),
        })
}

/// Escape a literal query, relaxing whitespace runs to `\s+`.
fn escape_literal(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() * 2);
    let mut in_whitespace = false;
    for c in query.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                pattern.push_str("\\s+");
                in_whitespace = true;
            }
        } else {
            in_whitespace = false;
            let mut buf = [0u8; 4];
            pattern.push_str(&regex::escape(c.encode_utf8(&mut buf)));
        }
    }
    pattern
}

/// Rewrite every unescaped `.` to a class excluding the boundary marker
/// and newline, leaving `\.` intact.
fn substitute_unescaped_dots(pattern: &str) -> String {
    pattern
        .replace("\\.", &ESCAPED_DOT_PLACEHOLDER.to_string())
        .replace('.', "[^\\x{E000}\\n]")
        .replace(ESCAPED_DOT_PLACEHOLDER, "\\.")
}

/// All non-overlapping, non-empty matches of `re` in `text`, as byte spans.
///
/// The regex engine advances past empty matches on its own; they are
/// dropped here because an empty span highlights nothing.
pub fn scan_bytes(re: &Regex, text: &str) -> Vec<(usize, usize)> {
    re.find_iter(text)
        .filter(|m| m.start() < m.end())
        .map(|m| (m.start(), m.end()))
        .collect()
}

/// Literal/regex search over the virtual text: scalar spans, boundary
/// matches discarded.
pub fn find_matches(
    query: &str,
    vtl: &VirtualText,
    use_regex: bool,
    case_sensitive: bool,
) -> Result<Vec<Span>, QueryError> {
    let re = build_search_regex(query, use_regex, case_sensitive)?;
    let spans = scan_bytes(&re, vtl.as_str())
        .into_iter()
        .map(|(start, end)| Span::new(vtl.byte_to_char(start), vtl.byte_to_char(end)))
        .filter(|span| !vtl.slice(*span).contains(BLOCK_BOUNDARY_MARKER))
        .collect::<Vec<Span>>();
    debug!(query, count = spans.len(), "literal/regex scan complete");
    Ok(spans)
}

// ===== Tests =====
