//! Overlay geometry: from range rectangles to renderable overlay specs.
//!
//! The renderer owns pixels; this module owns placement. Given the line
//! rectangles a range occupies, it merges fragments that sit on one line,
//! drops anything outside the viewport or clipped away by a scrollable
//! ancestor, and emits flat `OverlaySpec` values. Geometry comes in
//! through the `Layout` trait; the browser host implements it with client
//! rects, tests with a deterministic grid.

pub mod grid;

use crate::model::{DocRange, NodeId, Rect};
use serde::Serialize;

/// Fragments closer than this (in px) merge into one rectangle.
pub const MERGE_TOLERANCE: f64 = 1.0;

// ===== Layout seam =====

/// Geometry supplied by the host environment.
///
/// Implementations must not mutate the document; the core calls these
/// queries during search and again on every scroll or resize.
pub trait Layout {
    /// Line rectangles occupied by a document range, in layout order.
    /// An empty vector means geometry was unavailable; the match stays
    /// navigable without an overlay.
    fn range_line_rects(&self, range: &DocRange) -> Vec<Rect>;

    /// Bounding rectangle of an element, for element-search overlays.
    fn element_rect(&self, element: NodeId) -> Option<Rect>;

    /// Current viewport rectangle in document coordinates.
    fn viewport(&self) -> Rect;

    /// Clip rectangles of every scrollable ancestor of `node`.
    fn clip_chain(&self, node: NodeId) -> Vec<Rect>;
}

// ===== OverlaySpec =====

/// One absolutely positioned highlight rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OverlaySpec {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    /// Marks the first overlay of the active match.
    pub current: bool,
}

impl OverlaySpec {
    fn from_rect(rect: Rect, current: bool) -> Self {
        Self {
            left: rect.left,
            top: rect.top,
            width: rect.width,
            height: rect.height,
            current,
        }
    }
}

// ===== Merging =====

/// Merge per-line fragments: group by rounded top, order left to right,
/// and fuse neighbours separated by at most `tolerance`.
pub fn merge_line_rects(rects: &[Rect], tolerance: f64) -> Vec<Rect> {
    let mut lines: Vec<(i64, Vec<Rect>)> = Vec::new();
    for &rect in rects {
        if rect.is_empty() {
            continue;
        }
        let key = rect.top.round() as i64;
        match lines.iter_mut().find(|(k, _)| *k == key) {
            Some((_, line)) => line.push(rect),
            None => lines.push((key, vec![rect])),
        }
    }
    lines.sort_by_key(|(key, _)| *key);

    let mut merged: Vec<Rect> = Vec::new();
    for (_, mut line) in lines {
        line.sort_by(|a, b| a.left.total_cmp(&b.left));
        let mut current = line[0];
        for &next in &line[1..] {
            if next.left - current.right() <= tolerance {
                let left = current.left.min(next.left);
                let top = current.top.min(next.top);
                let right = current.right().max(next.right());
                let bottom = current.bottom().max(next.bottom());
                current = Rect::new(left, top, right - left, bottom - top);
            } else {
                merged.push(current);
                current = next;
            }
        }
        merged.push(current);
    }
    merged
}

// ===== Visibility =====

/// A rectangle is renderable when it intersects the viewport and every
/// scrollable ancestor's clip rectangle.
fn renderable(rect: &Rect, viewport: &Rect, clips: &[Rect]) -> bool {
    rect.intersects(viewport) && clips.iter().all(|clip| rect.intersects(clip))
}

// ===== Spec emission =====

/// Overlay specs for a text match.
///
/// `is_active` marks this as the current match; only its first emitted
/// rectangle carries the `current` flag.
pub fn overlays_for_range(layout: &dyn Layout, range: &DocRange, is_active: bool) -> Vec<OverlaySpec> {
    let rects = layout.range_line_rects(range);
    let merged = merge_line_rects(&rects, MERGE_TOLERANCE);
    let viewport = layout.viewport();
    let clips = layout.clip_chain(range.start_node);

    merged
        .into_iter()
        .filter(|rect| renderable(rect, &viewport, &clips))
        .enumerate()
        .map(|(index, rect)| OverlaySpec::from_rect(rect, is_active && index == 0))
        .collect()
}

/// Overlay specs for an element match (element-search mode).
pub fn overlays_for_element(layout: &dyn Layout, element: NodeId, is_active: bool) -> Vec<OverlaySpec> {
    let Some(rect) = layout.element_rect(element) else {
        return Vec::new();
    };
    let viewport = layout.viewport();
    let clips = layout.clip_chain(element);
    if !renderable(&rect, &viewport, &clips) {
        return Vec::new();
    }
    vec![OverlaySpec::from_rect(rect, is_active)]
}

// ===== Tests =====

#[cfg(test)]
#[path = "overlay_tests.rs"]
mod tests;
