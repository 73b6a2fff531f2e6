//! Test harness: shared helpers for the test suites.
//!
//! The deterministic grid layout lives in `overlay::grid`; this module
//! re-exports it alongside small document helpers so tests read the same
//! everywhere.

pub use crate::overlay::grid::{GridLayout, CHAR_W, LINE_H};

use crate::model::{Document, NodeId};

/// First text node of a document, for range assertions.
pub fn first_text_node(doc: &Document) -> NodeId {
    doc.document_order()
        .find(|&id| doc.node(id).as_text().is_some())
        .expect("document has a text node")
}
