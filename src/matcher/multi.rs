//! Multi-keyword fuzzy matching.
//!
//! The query splits on whitespace; every keyword must occur somewhere in
//! the normalised text, and a reported match is the minimal span covering
//! one occurrence of each keyword, within a distance budget derived from
//! the total keyword length. Combinations are walked with an odometer and
//! filtered as they are produced; nothing is materialised up front.

use crate::matcher::fuzzy::keyword_matches;
use crate::matcher::FuzzyDistance;
use crate::normalize::{normalize, NormalizedText};
use crate::vtl::{Span, VirtualText, BLOCK_BOUNDARY_MARKER};
use tracing::{debug, warn};

/// Ceiling on examined keyword combinations per search.
const MAX_COMBINATIONS: usize = 100_000;

/// A multi-keyword match: the minimal covering span plus the individual
/// keyword spans, all over the virtual text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiMatch {
    pub span: Span,
    pub keyword_spans: Vec<Span>,
}

/// Multi-keyword fuzzy search over the virtual text.
pub fn find_multi(query: &str, vtl: &VirtualText, distance: &FuzzyDistance) -> Vec<MultiMatch> {
    let norm = normalize(vtl.as_str());
    find_multi_in(query, vtl, &norm, distance)
}

/// As `find_multi`, against an already-normalised virtual text.
pub(crate) fn find_multi_in(
    query: &str,
    vtl: &VirtualText,
    norm: &NormalizedText,
    distance: &FuzzyDistance,
) -> Vec<MultiMatch> {
    let keywords: Vec<&str> = query.split_whitespace().collect();
    debug_assert!(keywords.len() >= 2, "single keywords use find_single");

    let mut per_keyword: Vec<Vec<Span>> = Vec::with_capacity(keywords.len());
    let mut total_len = 0usize;
    for keyword in &keywords {
        let spans = keyword_matches(keyword, norm);
        if spans.is_empty() {
            // All keywords are required.
            return Vec::new();
        }
        total_len += normalize(keyword).char_len();
        per_keyword.push(spans);
    }

    let max_distance = distance.for_total_length(total_len);
    debug!(
        keywords = keywords.len(),
        max_distance, "multi-keyword walk starting"
    );

    let mut results: Vec<MultiMatch> = Vec::new();
    let mut odometer = vec![0usize; per_keyword.len()];
    let mut examined = 0usize;

    'walk: loop {
        examined += 1;
        if examined > MAX_COMBINATIONS {
            warn!(cap = MAX_COMBINATIONS, "multi-keyword combination cap hit");
            break;
        }

        let combination: Vec<Span> = odometer
            .iter()
            .enumerate()
            .map(|(k, &i)| per_keyword[k][i])
            .collect();
        if let Some(found) = evaluate(&combination, vtl, norm, max_distance) {
            results.push(found);
        }

        // Advance the odometer.
        for position in (0..odometer.len()).rev() {
            odometer[position] += 1;
            if odometer[position] < per_keyword[position].len() {
                continue 'walk;
            }
            odometer[position] = 0;
        }
        break;
    }

    results.sort_by_key(|m| m.span);
    results.dedup_by_key(|m| m.span);
    results
}

/// Filter one combination and lift it to the virtual text.
fn evaluate(
    combination: &[Span],
    vtl: &VirtualText,
    norm: &NormalizedText,
    max_distance: usize,
) -> Option<MultiMatch> {
    let min_start = combination.iter().map(|s| s.start).min()?;
    let max_end = combination.iter().map(|s| s.end).max()?;
    if max_end - min_start > max_distance {
        return None;
    }

    // A keyword landing inside another keyword's match is the same text
    // counted twice, not two keywords.
    for (i, a) in combination.iter().enumerate() {
        for (j, b) in combination.iter().enumerate() {
            if i != j && a.start <= b.start && b.end <= a.end {
                return None;
            }
        }
    }

    let covering = Span::new(min_start, max_end);
    if norm.slice(covering).contains(BLOCK_BOUNDARY_MARKER) {
        return None;
    }

    let span = norm.to_original(covering)?;
    if vtl.slice(span).contains(BLOCK_BOUNDARY_MARKER) {
        return None;
    }
    let keyword_spans = combination
        .iter()
        .map(|s| norm.to_original(*s))
        .collect::<Option<Vec<Span>>>()?;

    Some(MultiMatch {
        span,
        keyword_spans,
    })
}

// ===== Tests =====
