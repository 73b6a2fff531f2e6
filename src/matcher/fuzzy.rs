//! Single-keyword fuzzy matching over normalised text.
//!
//! The virtual text is normalised once; every expansion of the query is
//! normalised and searched literally in the folded universe; surviving
//! matches are lifted back to virtual-text spans through the position
//! mapping. Queries that spell an accented letter explicitly are verified
//! against the original scalars so `ä` only matches a real `ä`.

use crate::matcher::{expansion, literal};
use crate::normalize::{has_substitution_expansion, normalize, NormalizedText};
use crate::vtl::{Span, VirtualText, BLOCK_BOUNDARY_MARKER};

/// All matches of one keyword, as spans over the normalised text.
///
/// Matches are extended rightward across positions sharing one mapping
/// entry (so a hit on the `a` of an `ae` expansion covers the whole
/// umlaut), then merged where they touch inside a shared entry.
pub(crate) fn keyword_matches(keyword: &str, norm: &NormalizedText) -> Vec<Span> {
    let explicit_accents = keyword.chars().any(has_substitution_expansion);
    let mut collected: Vec<Span> = Vec::new();

    for variant in expansion::expand_query(keyword) {
        let folded_query = normalize(&variant);
        if folded_query.as_str().is_empty() {
            continue;
        }
        let Ok(re) = literal::build_search_regex(folded_query.as_str(), false, false) else {
            continue;
        };
        for (byte_start, byte_end) in literal::scan_bytes(&re, norm.as_str()) {
            let mut span = Span::new(norm.byte_to_char(byte_start), norm.byte_to_char(byte_end));
            if explicit_accents && !accent_positions_agree(keyword, &folded_query, span, norm) {
                continue;
            }
            // Extend while successive positions come from the same source
            // range, so partial hits on an expansion cover all of it.
            while span.end < norm.char_len()
                && norm.source_of(span.end) == norm.source_of(span.end - 1)
            {
                span.end += 1;
            }
            collected.push(span);
        }
    }

    collected.sort();
    collected.dedup();
    merge_touching(collected, norm)
}

/// Explicit-accent filter: the match must be exactly the normalised query,
/// and every accented query position must map back to that same letter in
/// the original text.
fn accent_positions_agree(
    keyword: &str,
    folded_query: &NormalizedText,
    span: Span,
    norm: &NormalizedText,
) -> bool {
    if span.len() != folded_query.char_len() {
        return false;
    }
    let original_chars: Vec<char> = norm.original().chars().collect();

    for (query_index, query_char) in keyword.chars().enumerate() {
        if !has_substitution_expansion(query_char) {
            continue;
        }
        // First output position of this query scalar.
        let Some(folded_index) = folded_query
            .map()
            .iter()
            .position(|source| source.start == query_index)
        else {
            return false;
        };
        let Some(source) = norm.source_of(span.start + folded_index) else {
            return false;
        };
        let Some(&original) = original_chars.get(source.start) else {
            return false;
        };
        let matches = original
            .to_lowercase()
            .eq(query_char.to_lowercase());
        if !matches {
            return false;
        }
    }
    true
}

/// Merge overlapping spans, and adjacent spans whose junction lies inside
/// one source range.
fn merge_touching(spans: Vec<Span>, norm: &NormalizedText) -> Vec<Span> {
    let mut merged: Vec<Span> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last_mut() {
            Some(last) if span.start < last.end => {
                last.end = last.end.max(span.end);
            }
            Some(last)
                if span.start == last.end
                    && norm.source_of(span.start) == norm.source_of(last.end - 1) =>
            {
                last.end = last.end.max(span.end);
            }
            _ => merged.push(span),
        }
    }
    merged
}

/// Single-keyword fuzzy search: spans over the virtual text.
pub fn find_single(query: &str, vtl: &VirtualText) -> Vec<Span> {
    let norm = normalize(vtl.as_str());
    find_single_in(query, vtl, &norm)
}

/// As `find_single`, against an already-normalised virtual text.
pub(crate) fn find_single_in(query: &str, vtl: &VirtualText, norm: &NormalizedText) -> Vec<Span> {
    let mut out: Vec<Span> = keyword_matches(query, norm)
        .into_iter()
        .filter_map(|span| norm.to_original(span))
        .filter(|span| !vtl.slice(*span).contains(BLOCK_BOUNDARY_MARKER))
        .collect();
    out.sort();
    out.dedup();
    out
}

// ===== Tests =====
