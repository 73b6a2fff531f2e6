//! The matcher: literal, regex and fuzzy search over the virtual text.
//!
//! All paths produce scalar spans over the virtual text, ordered by
//! ascending `(start, end)` with exact duplicates removed, and never
//! containing the block boundary marker. The state machine converts
//! surviving spans to document ranges.

pub mod expansion;
pub mod fuzzy;
pub mod literal;
pub mod multi;

use crate::model::QueryError;
use crate::normalize::normalize;
use crate::vtl::{Span, VirtualText};

pub use multi::MultiMatch;

// ===== FuzzyDistance =====

/// Distance budget for multi-keyword search.
///
/// The budget scales with total keyword length and clamps into
/// `[min, max]`, so short queries still tolerate some separation and long
/// queries cannot span half the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyDistance {
    pub multiplier: f64,
    pub min: usize,
    pub max: usize,
}

impl Default for FuzzyDistance {
    fn default() -> Self {
        Self {
            multiplier: 2.0,
            min: 8,
            max: 64,
        }
    }
}

impl FuzzyDistance {
    /// Maximum allowed span for keywords totalling `total` scalars.
    pub fn for_total_length(&self, total: usize) -> usize {
        ((total as f64 * self.multiplier) as usize).clamp(self.min, self.max)
    }
}

// ===== TextMatch =====

/// One match over the virtual text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMatch {
    pub span: Span,
    /// Individual keyword spans for multi-keyword fuzzy matches.
    pub keyword_spans: Option<Vec<Span>>,
}

impl TextMatch {
    fn plain(span: Span) -> Self {
        Self {
            span,
            keyword_spans: None,
        }
    }
}

// ===== Entry point =====

/// Mode flags for a text search.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchOptions {
    pub use_regex: bool,
    pub case_sensitive: bool,
    pub use_fuzzy: bool,
}

/// Find all matches of `query` in the virtual text.
///
/// A whitespace-only query matches nothing and is not an error. Fuzzy
/// queries with several whitespace-separated keywords take the
/// multi-keyword path; other fuzzy queries the single-keyword path;
/// everything else compiles to a regex.
pub fn find_matches(
    query: &str,
    vtl: &VirtualText,
    options: MatchOptions,
    distance: &FuzzyDistance,
) -> Result<Vec<TextMatch>, QueryError> {
    if query.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut matches = if options.use_fuzzy {
        let norm = normalize(vtl.as_str());
        if query.split_whitespace().nth(1).is_some() {
            multi::find_multi_in(query, vtl, &norm, distance)
                .into_iter()
                .map(|m| TextMatch {
                    span: m.span,
                    keyword_spans: Some(m.keyword_spans),
                })
                .collect()
        } else {
            fuzzy::find_single_in(query.trim(), vtl, &norm)
                .into_iter()
                .map(TextMatch::plain)
                .collect()
        }
    } else {
        literal::find_matches(query, vtl, options.use_regex, options.case_sensitive)?
            .into_iter()
            .map(TextMatch::plain)
            .collect::<Vec<TextMatch>>()
    };

    matches.sort_by_key(|m| m.span);
    matches.dedup_by_key(|m| m.span);
    Ok(matches)
}

// ===== Tests =====
