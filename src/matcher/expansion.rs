//! Query expansion for substitution spellings.
//!
//! A plain-ASCII query should find text the normaliser rewrote with
//! substitution spellings: `muller` and `mueller` must both find `müller`.
//! Each `a`/`o`/`u`/`s` in the query therefore doubles into the bare
//! letter and its substitution spelling, and the Cartesian product is
//! searched. A query that itself contains a letter with a substitution
//! spelling (`ä`, `ß`, ...) is the user being precise; it passes through
//! unexpanded so explicit accents restrict matches.

use crate::normalize::has_substitution_expansion;
use tracing::warn;

/// Upper bound on generated variants; queries packed with expandable
/// letters would otherwise grow 2^n.
const MAX_EXPANSIONS: usize = 256;

/// Expansion alternatives for one query scalar.
fn alternatives(c: char) -> Option<[&'static str; 2]> {
    match c.to_ascii_lowercase() {
        'a' => Some(["a", "ae"]),
        'o' => Some(["o", "oe"]),
        'u' => Some(["u", "ue"]),
        's' => Some(["s", "ss"]),
        _ => None,
    }
}

/// All spellings to search for a fuzzy keyword.
///
/// The first entry is always the query itself (its own normalisation
/// happens later, with everything else).
pub fn expand_query(query: &str) -> Vec<String> {
    if query.chars().any(has_substitution_expansion) {
        return vec![query.to_string()];
    }

    let mut variants = vec![String::new()];
    for c in query.chars() {
        match alternatives(c) {
            Some([plain, substituted]) if variants.len() * 2 <= MAX_EXPANSIONS => {
                let mut doubled = Vec::with_capacity(variants.len() * 2);
                for prefix in &variants {
                    doubled.push(format!("{prefix}{plain}"));
                    doubled.push(format!("{prefix}{substituted}"));
                }
                variants = doubled;
            }
            Some([plain, _]) => {
                // Cap reached: keep the plain letter for the rest.
                warn!(query, cap = MAX_EXPANSIONS, "query expansion capped");
                for prefix in &mut variants {
                    prefix.push_str(plain);
                }
            }
            None => {
                for prefix in &mut variants {
                    prefix.push(c);
                }
            }
        }
    }
    variants
}

// ===== Tests =====
