//! Reconstruction of document ranges from virtual-text spans.
//!
//! The char map makes this a pair of lookups: the span's first scalar
//! gives the start node and offset, the last scalar gives the end node and
//! an exclusive end offset. Spans that touch a boundary marker at either
//! endpoint reconstruct to nothing; the matcher already refuses matches
//! containing markers, so hitting one here means the span was bad input.

use crate::model::DocRange;
use crate::vtl::{MapEntry, Span, VirtualText};
use tracing::debug;

/// Convert a span over the virtual text into a document range.
///
/// Returns `None` for empty or out-of-range spans and for spans whose
/// first or last scalar is a block boundary marker.
pub fn to_document_range(vtl: &VirtualText, span: Span) -> Option<DocRange> {
    if span.is_empty() || span.end > vtl.char_len() {
        debug!(?span, len = vtl.char_len(), "span not reconstructible");
        return None;
    }
    let start = vtl.entry(span.start)?;
    let end = vtl.entry(span.end - 1)?;

    match (start, end) {
        (
            MapEntry::TextRef {
                node: start_node,
                offset: start_offset,
            },
            MapEntry::TextRef {
                node: end_node,
                offset: end_offset,
            },
        ) => Some(DocRange {
            start_node: *start_node,
            start_offset: *start_offset,
            end_node: *end_node,
            end_offset: end_offset + 1,
        }),
        _ => {
            debug!(?span, "span endpoint is a block boundary");
            None
        }
    }
}

// ===== Tests =====

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_html;
    use crate::vtl::{build, VtlLimits};
    use std::collections::HashSet;

    fn text_nodes(doc: &crate::model::Document) -> Vec<crate::model::NodeId> {
        doc.document_order()
            .filter(|&id| doc.node(id).as_text().is_some())
            .collect()
    }

    #[test]
    fn span_within_one_text_node() {
        let doc = parse_html("<div>hello</div>").expect("parses");
        let vtl = build(&doc, &HashSet::new(), VtlLimits::default());
        let nodes = text_nodes(&doc);

        let range = to_document_range(&vtl, Span::new(1, 4)).expect("reconstructs");
        assert_eq!(range.start_node, nodes[0]);
        assert_eq!(range.start_offset, 1);
        assert_eq!(range.end_node, nodes[0]);
        assert_eq!(range.end_offset, 4);
    }

    #[test]
    fn span_crossing_inline_nodes() {
        let doc = parse_html("<span>mkdir</span><span>-p</span>").expect("parses");
        let vtl = build(&doc, &HashSet::new(), VtlLimits::default());
        let nodes = text_nodes(&doc);
        assert_eq!(vtl.as_str(), "mkdir-p");

        // "mkdir-p" spans both text nodes.
        let range = to_document_range(&vtl, Span::new(0, 7)).expect("reconstructs");
        assert_eq!(range.start_node, nodes[0]);
        assert_eq!(range.start_offset, 0);
        assert_eq!(range.end_node, nodes[1]);
        assert_eq!(range.end_offset, 2);
    }

    #[test]
    fn boundary_endpoint_yields_none() {
        let doc = parse_html("<div>ab</div><p>cd</p>").expect("parses");
        let vtl = build(&doc, &HashSet::new(), VtlLimits::default());
        assert_eq!(vtl.as_str(), "ab\u{E000}cd");

        // Index 2 is the marker.
        assert!(to_document_range(&vtl, Span::new(2, 4)).is_none());
        assert!(to_document_range(&vtl, Span::new(0, 3)).is_none());
        // Interior markers are the matcher's job to reject; endpoints are
        // checked here.
        assert!(to_document_range(&vtl, Span::new(1, 4)).is_some());
    }

    #[test]
    fn empty_and_out_of_range_spans_yield_none() {
        let doc = parse_html("<div>ab</div>").expect("parses");
        let vtl = build(&doc, &HashSet::new(), VtlLimits::default());

        assert!(to_document_range(&vtl, Span::new(1, 1)).is_none());
        assert!(to_document_range(&vtl, Span::new(0, 99)).is_none());
    }
}
