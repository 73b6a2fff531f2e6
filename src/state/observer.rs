//! Observer-driven re-search contract.
//!
//! The core does no DOM observation itself. A host-side mutation observer
//! (debounced and rate-limited on its side, typically around 500 ms)
//! calls `SearchEngine::re_search` while the engine is observing. The
//! navigation hint lives here: re-search never steals the user's place in
//! the results when it can be kept.

use crate::model::Rect;

/// Cursor preservation across a re-search.
///
/// - a still-valid previous cursor is kept;
/// - a cursor past the shrunk result list clamps to the last result;
/// - with no previous cursor, the match nearest the viewport's vertical
///   centre becomes current (`match_centers` supplies one vertical centre
///   per match, `None` where geometry is unavailable).
pub fn preserved_cursor(
    previous: Option<usize>,
    new_total: usize,
    viewport: &Rect,
    match_centers: impl Fn(usize) -> Option<f64>,
) -> Option<usize> {
    if new_total == 0 {
        return None;
    }
    if let Some(cursor) = previous {
        return Some(if cursor < new_total {
            cursor
        } else {
            new_total - 1
        });
    }

    let viewport_center = viewport.top + viewport.height / 2.0;
    let mut best: Option<(usize, f64)> = None;
    for index in 0..new_total {
        let Some(center) = match_centers(index) else {
            continue;
        };
        let distance = (center - viewport_center).abs();
        if best.is_none_or(|(_, d)| distance < d) {
            best = Some((index, distance));
        }
    }
    Some(best.map(|(index, _)| index).unwrap_or(0))
}

// ===== Tests =====
