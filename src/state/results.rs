//! Results-list collection: match text plus surrounding context.
//!
//! Context extends through the match's own text node first and continues
//! into neighbouring text nodes when that is not enough. External callers
//! get their requested context length clamped into `[MIN, MAX]`; internal
//! callers may pass zero for no context.

use crate::model::{DocRange, Document, NodeId, ResultItem};
use crate::selector::describe_element;

/// Context window defaults and clamp bounds, in scalars per side.
pub const DEFAULT_CONTEXT_LENGTH: usize = 30;
pub const MIN_CONTEXT_LENGTH: usize = 10;
pub const MAX_CONTEXT_LENGTH: usize = 100;

/// Resolve a caller-supplied context length.
pub fn clamp_context_length(requested: Option<usize>) -> usize {
    match requested {
        None => DEFAULT_CONTEXT_LENGTH,
        Some(value) => value.clamp(MIN_CONTEXT_LENGTH, MAX_CONTEXT_LENGTH),
    }
}

/// Text-node walker shared by all rows of one listing.
pub struct ContextSource<'a> {
    doc: &'a Document,
    text_nodes: Vec<NodeId>,
}

impl<'a> ContextSource<'a> {
    pub fn new(doc: &'a Document) -> Self {
        let text_nodes = doc
            .document_order()
            .filter(|&id| doc.node(id).as_text().is_some())
            .collect();
        Self { doc, text_nodes }
    }

    fn position(&self, node: NodeId) -> Option<usize> {
        self.text_nodes.iter().position(|&n| n == node)
    }

    fn text_of(&self, index: usize) -> Vec<char> {
        self.doc
            .node(self.text_nodes[index])
            .as_text()
            .unwrap_or_default()
            .chars()
            .collect()
    }

    /// The exact text a range covers.
    pub fn range_text(&self, range: &DocRange) -> String {
        let (Some(start), Some(end)) = (self.position(range.start_node), self.position(range.end_node))
        else {
            return String::new();
        };
        let mut out = String::new();
        for index in start..=end {
            let chars = self.text_of(index);
            let from = if index == start { range.start_offset } else { 0 };
            let to = if index == end {
                range.end_offset.min(chars.len())
            } else {
                chars.len()
            };
            out.extend(chars.get(from..to).unwrap_or(&[]).iter());
        }
        out
    }

    /// Up to `length` scalars preceding the range, nearest last.
    pub fn context_before(&self, range: &DocRange, length: usize) -> String {
        let Some(mut node_index) = self.position(range.start_node) else {
            return String::new();
        };
        let mut collected: Vec<char> = Vec::with_capacity(length);
        let mut offset = range.start_offset;

        loop {
            let chars = self.text_of(node_index);
            let take = offset.min(chars.len());
            for &c in chars[..take].iter().rev() {
                if collected.len() == length {
                    break;
                }
                collected.push(c);
            }
            if collected.len() == length || node_index == 0 {
                break;
            }
            node_index -= 1;
            offset = usize::MAX;
        }
        collected.reverse();
        collected.into_iter().collect()
    }

    /// Up to `length` scalars following the range.
    pub fn context_after(&self, range: &DocRange, length: usize) -> String {
        let Some(mut node_index) = self.position(range.end_node) else {
            return String::new();
        };
        let mut collected = String::new();
        let mut taken = 0usize;
        let mut offset = range.end_offset;

        while taken < length && node_index < self.text_nodes.len() {
            let chars = self.text_of(node_index);
            for &c in chars.iter().skip(offset) {
                if taken == length {
                    break;
                }
                collected.push(c);
                taken += 1;
            }
            node_index += 1;
            offset = 0;
        }
        collected
    }

    /// One results-list row for a text match.
    pub fn text_result(&self, index: usize, range: &DocRange, context_length: usize) -> ResultItem {
        let matched_text = self.range_text(range);
        let context_before = self.context_before(range, context_length);
        let context_after = self.context_after(range, context_length);
        let full_text = format!("{context_before}{matched_text}{context_after}");
        ResultItem {
            index,
            matched_text,
            context_before,
            context_after,
            full_text,
        }
    }

    /// One results-list row for an element match: tag identity plus the
    /// element's own text, truncated.
    pub fn element_result(&self, index: usize, element: NodeId, context_length: usize) -> ResultItem {
        let description = describe_element(self.doc, element);
        let content = self.doc.text_content(element);
        let truncated: String = content.trim().chars().take(context_length).collect();
        ResultItem {
            index,
            matched_text: description.clone(),
            context_before: String::new(),
            context_after: String::new(),
            full_text: format!("{description} {truncated}…"),
        }
    }
}

// ===== Tests =====

#[cfg(test)]
#[path = "results_tests.rs"]
mod tests;
