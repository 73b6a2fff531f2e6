//! Tests for overlay geometry.

use super::*;
use crate::parser::parse_html;
use crate::test_harness::{first_text_node, GridLayout, CHAR_W, LINE_H};
use crate::vtl::{build, range::to_document_range, Span, VtlLimits};
use std::collections::HashSet;

fn doc_and_range(html: &str, span: Span) -> (crate::model::Document, DocRange) {
    let doc = parse_html(html).expect("parses");
    let vtl = build(&doc, &HashSet::new(), VtlLimits::default());
    let range = to_document_range(&vtl, span).expect("span reconstructs");
    (doc, range)
}

// ===== merge_line_rects =====

#[test]
fn adjacent_fragments_on_one_line_merge() {
    let rects = vec![
        Rect::new(0.0, 0.0, 8.0, 16.0),
        Rect::new(8.0, 0.0, 8.0, 16.0),
        Rect::new(16.5, 0.0, 8.0, 16.0),
    ];
    let merged = merge_line_rects(&rects, 1.0);
    assert_eq!(merged, vec![Rect::new(0.0, 0.0, 24.5, 16.0)]);
}

#[test]
fn distant_fragments_stay_separate() {
    let rects = vec![
        Rect::new(0.0, 0.0, 8.0, 16.0),
        Rect::new(20.0, 0.0, 8.0, 16.0),
    ];
    let merged = merge_line_rects(&rects, 1.0);
    assert_eq!(merged.len(), 2);
}

#[test]
fn different_lines_never_merge() {
    let rects = vec![
        Rect::new(0.0, 0.0, 8.0, 16.0),
        Rect::new(0.0, 16.0, 8.0, 16.0),
    ];
    let merged = merge_line_rects(&rects, 1.0);
    assert_eq!(merged.len(), 2);
}

#[test]
fn unsorted_input_is_ordered_left_to_right() {
    let rects = vec![
        Rect::new(16.0, 0.0, 8.0, 16.0),
        Rect::new(0.0, 0.0, 8.0, 16.0),
        Rect::new(8.0, 0.0, 8.0, 16.0),
    ];
    let merged = merge_line_rects(&rects, 1.0);
    assert_eq!(merged, vec![Rect::new(0.0, 0.0, 24.0, 16.0)]);
}

#[test]
fn empty_rects_are_dropped() {
    let rects = vec![Rect::new(0.0, 0.0, 0.0, 16.0)];
    assert!(merge_line_rects(&rects, 1.0).is_empty());
}

#[test]
fn slightly_jittered_tops_group_by_rounding() {
    let rects = vec![
        Rect::new(0.0, 10.2, 8.0, 16.0),
        Rect::new(8.0, 9.8, 8.0, 16.0),
    ];
    let merged = merge_line_rects(&rects, 1.0);
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].top, 9.8);
    assert_eq!(merged[0].bottom(), 26.2);
}

// ===== overlays_for_range =====

#[test]
fn single_line_match_emits_one_overlay() {
    let (doc, range) = doc_and_range("<div>hello world</div>", Span::new(0, 5));
    let layout = GridLayout::new(&doc, 80);

    let specs = overlays_for_range(&layout, &range, true);
    assert_eq!(specs.len(), 1);
    assert_eq!(specs[0].left, 0.0);
    assert_eq!(specs[0].width, 5.0 * CHAR_W);
    assert!(specs[0].current);
}

#[test]
fn wrapped_match_emits_one_overlay_per_line() {
    // Four columns: "abcdef" wraps after "abcd".
    let (doc, range) = doc_and_range("<div>abcdef</div>", Span::new(0, 6));
    let layout = GridLayout::new(&doc, 4);

    let specs = overlays_for_range(&layout, &range, true);
    assert_eq!(specs.len(), 2);
    assert!(specs[0].current, "first overlay of active match is current");
    assert!(!specs[1].current, "later overlays are not current");
    assert_eq!(specs[0].top, 0.0);
    assert_eq!(specs[1].top, LINE_H);
    assert_eq!(specs[0].width, 4.0 * CHAR_W);
    assert_eq!(specs[1].width, 2.0 * CHAR_W);
}

#[test]
fn inactive_match_has_no_current_overlay() {
    let (doc, range) = doc_and_range("<div>hello</div>", Span::new(0, 5));
    let layout = GridLayout::new(&doc, 80);
    let specs = overlays_for_range(&layout, &range, false);
    assert!(specs.iter().all(|s| !s.current));
}

#[test]
fn outside_viewport_is_filtered() {
    let (doc, range) = doc_and_range("<div>hello</div>", Span::new(0, 5));
    let layout =
        GridLayout::new(&doc, 80).with_viewport(Rect::new(0.0, 500.0, 640.0, 480.0));
    let specs = overlays_for_range(&layout, &range, true);
    assert!(specs.is_empty());
}

#[test]
fn clipped_by_scrollable_ancestor_is_filtered() {
    let (doc, range) = doc_and_range("<div>hello</div>", Span::new(0, 5));
    let clip_away = vec![Rect::new(1000.0, 1000.0, 10.0, 10.0)];
    let layout = GridLayout::new(&doc, 80).with_clip(range.start_node, clip_away);
    let specs = overlays_for_range(&layout, &range, true);
    assert!(specs.is_empty());

    let clip_over = vec![Rect::new(0.0, 0.0, 100.0, 100.0)];
    let layout = GridLayout::new(&doc, 80).with_clip(range.start_node, clip_over);
    let specs = overlays_for_range(&layout, &range, true);
    assert_eq!(specs.len(), 1);
}

#[test]
fn missing_geometry_emits_no_overlay() {
    let doc = parse_html("<div>hello</div>").expect("parses");
    let node = first_text_node(&doc);
    // Offsets past the laid-out text have no cells; the match simply gets
    // no overlay.
    let range = DocRange {
        start_node: node,
        start_offset: 50,
        end_node: node,
        end_offset: 55,
    };
    let layout = GridLayout::new(&doc, 80);
    assert!(overlays_for_range(&layout, &range, true).is_empty());
}

// ===== overlays_for_element =====

#[test]
fn element_overlay_uses_bounding_rect() {
    let doc = parse_html("<div>abc</div>").expect("parses");
    let div = doc
        .document_order()
        .find(|&id| doc.node(id).as_element().is_some_and(|e| e.tag == "div"))
        .expect("div exists");
    let layout = GridLayout::new(&doc, 80);

    let specs = overlays_for_element(&layout, div, true);
    assert_eq!(specs.len(), 1);
    assert_eq!(specs[0].width, 3.0 * CHAR_W);
    assert!(specs[0].current);
}

#[test]
fn element_without_geometry_emits_nothing() {
    let doc = parse_html("<div></div>").expect("parses");
    let div = doc
        .document_order()
        .find(|&id| doc.node(id).as_element().is_some_and(|e| e.tag == "div"))
        .expect("div exists");
    let layout = GridLayout::new(&doc, 80);
    assert!(overlays_for_element(&layout, div, true).is_empty());
}
