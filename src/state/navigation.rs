//! Cursor arithmetic for match navigation.
//!
//! Pure functions over `(cursor, result count)`; the engine applies them
//! and regenerates overlays. Next/previous wrap around; jumping to an
//! out-of-range index is a no-op.

/// Next cursor position with wrap-around.
///
/// Returns `None` only when there are no results.
pub fn next_index(cursor: Option<usize>, total: usize) -> Option<usize> {
    if total == 0 {
        return None;
    }
    match cursor {
        Some(current) => Some((current + 1) % total),
        None => Some(0),
    }
}

/// Previous cursor position with wrap-around.
pub fn prev_index(cursor: Option<usize>, total: usize) -> Option<usize> {
    if total == 0 {
        return None;
    }
    match cursor {
        Some(current) => Some((current + total - 1) % total),
        None => Some(total.saturating_sub(1)),
    }
}

/// Explicit jump: in-range indices move the cursor, everything else is a
/// no-op that keeps the existing cursor.
pub fn jump_index(cursor: Option<usize>, total: usize, target: usize) -> Option<usize> {
    if target < total {
        Some(target)
    } else {
        cursor
    }
}

// ===== Tests =====
