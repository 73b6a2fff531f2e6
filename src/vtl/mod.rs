//! Virtual Text Layer: a linear projection of the document's visible text.
//!
//! The builder walks the tree in document order, keeps only text under
//! visible elements, and joins the pieces into one string. A reserved
//! private-use scalar separates text whose nearest block-level ancestors
//! differ, so the matcher can refuse matches that would cross a visual
//! block boundary. Alongside the string, a char map records for every
//! scalar which source text node and offset it came from.
//!
//! Invariants maintained here and relied on everywhere downstream:
//!
//! - no two adjacent boundary markers, none leading or trailing;
//! - `map[i]` is `BlockBoundary` exactly when `text[i]` is the marker;
//! - `map.len()` equals the scalar length of `text`.
//!
//! Traversal is defensive: an explicit stack instead of recursion, a node
//! ceiling that truncates pathological documents, and a depth ceiling on
//! ancestor walks. A node that fails mid-extraction is skipped; the rest
//! of the document still contributes.

use crate::model::{Display, Document, NodeId, NodeKind, Visibility};
use std::collections::{HashMap, HashSet};
use tracing::warn;

pub mod range;

/// Reserved scalar inserted between text from distinct block ancestors.
/// Private-use, so page text never contains it legitimately.
pub const BLOCK_BOUNDARY_MARKER: char = '\u{E000}';

/// Tags treated as inline regardless of computed display.
const INLINE_TAGS: &[&str] = &[
    "span", "strong", "em", "b", "i", "code", "kbd", "samp", "var", "a", "abbr", "cite", "q",
    "mark", "small", "sub", "sup",
];

/// Tags whose subtrees never contribute text.
const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "template"];

// ===== Span =====

/// Half-open `[start, end)` range of scalar indices, in whichever string
/// universe the context dictates (virtual text or normalised text).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// True when `other` lies strictly inside `self` (containment with at
    /// least one strict edge, and not equality).
    pub fn contains_span(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end && *self != *other
    }
}

// ===== CharMap =====

/// Back-reference for one scalar of the virtual text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapEntry {
    /// The scalar came from `node` at scalar offset `offset`.
    TextRef { node: NodeId, offset: usize },
    /// Synthetic block boundary; never part of any reconstructed range.
    BlockBoundary,
}

impl MapEntry {
    pub fn is_boundary(&self) -> bool {
        matches!(self, MapEntry::BlockBoundary)
    }
}

// ===== VirtualText =====

/// The linearised text plus its per-scalar char map.
///
/// Scalar indexing: all spans over virtual text count Unicode scalars, not
/// bytes. `char_starts` holds each scalar's byte offset (plus a trailing
/// sentinel) so regex byte offsets convert in O(log n).
#[derive(Debug, Clone, Default)]
pub struct VirtualText {
    text: String,
    map: Vec<MapEntry>,
    char_starts: Vec<usize>,
}

impl VirtualText {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Number of scalars (equals the char map length).
    pub fn char_len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn map(&self) -> &[MapEntry] {
        &self.map
    }

    pub fn entry(&self, index: usize) -> Option<&MapEntry> {
        self.map.get(index)
    }

    /// Byte offset of scalar `index`; `char_len()` maps to `text.len()`.
    pub fn char_to_byte(&self, index: usize) -> usize {
        self.char_starts[index]
    }

    /// Scalar index containing byte offset `byte` (which must lie on a
    /// scalar boundary produced by the regex engine).
    pub fn byte_to_char(&self, byte: usize) -> usize {
        match self.char_starts.binary_search(&byte) {
            Ok(index) => index,
            Err(insert) => insert - 1,
        }
    }

    /// The substring covered by a scalar span.
    pub fn slice(&self, span: Span) -> &str {
        &self.text[self.char_to_byte(span.start)..self.char_to_byte(span.end)]
    }

    fn push(&mut self, c: char, entry: MapEntry) {
        self.char_starts.push(self.text.len());
        self.text.push(c);
        self.map.push(entry);
    }

    fn ends_with_boundary(&self) -> bool {
        self.map.last().is_some_and(MapEntry::is_boundary)
    }

    fn seal(&mut self) {
        self.char_starts.push(self.text.len());
    }

    /// Assemble a virtual text directly from (char, entry) pairs.
    ///
    /// For tests and for normalised-universe scanning; the builder is the
    /// production path.
    pub fn from_parts(parts: impl IntoIterator<Item = (char, MapEntry)>) -> Self {
        let mut vtl = VirtualText::default();
        for (c, entry) in parts {
            vtl.push(c, entry);
        }
        vtl.seal();
        vtl
    }
}

// ===== Builder =====

/// Traversal ceilings guarding against pathological documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VtlLimits {
    /// Stop after visiting this many nodes; the layer built so far is kept.
    pub max_nodes: usize,
    /// Ancestor-walk ceiling; a walk this deep abandons the whole build.
    pub max_depth: usize,
}

impl Default for VtlLimits {
    fn default() -> Self {
        Self {
            max_nodes: 100_000,
            max_depth: 1_000,
        }
    }
}

/// Build the virtual text layer for a document.
///
/// `ignore_ids` names element ids whose subtrees are excluded (the overlay
/// container, so highlights never match themselves).
pub fn build(doc: &Document, ignore_ids: &HashSet<String>, limits: VtlLimits) -> VirtualText {
    let mut builder = Builder {
        doc,
        ignore_ids,
        limits,
        block_cache: HashMap::new(),
        nearest_block_cache: HashMap::new(),
        out: VirtualText::default(),
        prev_block: None,
        visited: 0,
    };
    match builder.run() {
        Ok(()) => {
            builder.out.seal();
            builder.out
        }
        Err(depth) => {
            warn!(depth, "virtual text build abandoned: ancestor walk exceeded depth ceiling");
            VirtualText::from_parts([])
        }
    }
}

struct Builder<'a> {
    doc: &'a Document,
    ignore_ids: &'a HashSet<String>,
    limits: VtlLimits,
    block_cache: HashMap<NodeId, bool>,
    nearest_block_cache: HashMap<NodeId, NodeId>,
    out: VirtualText,
    prev_block: Option<NodeId>,
    visited: usize,
}

impl Builder<'_> {
    fn run(&mut self) -> Result<(), usize> {
        // (node, subtree visible). Visibility flows down the stack, so no
        // per-text-node ancestor re-walk is needed.
        let mut stack: Vec<(NodeId, bool)> = vec![(self.doc.root(), true)];

        while let Some((id, visible)) = stack.pop() {
            self.visited += 1;
            if self.visited > self.limits.max_nodes {
                warn!(
                    max_nodes = self.limits.max_nodes,
                    "virtual text build truncated at node ceiling"
                );
                return Ok(());
            }

            let node = self.doc.node(id);
            match &node.kind {
                NodeKind::Element(data) => {
                    let child_visible = visible && !self.excluded(data);
                    for &child in node.children.iter().rev() {
                        stack.push((child, child_visible));
                    }
                }
                NodeKind::Text(text) => {
                    if visible && !text.is_empty() {
                        self.emit_text_node(id, text)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn excluded(&self, data: &crate::model::ElementData) -> bool {
        if SKIPPED_TAGS.contains(&data.tag.as_str()) {
            return true;
        }
        if data.id.as_ref().is_some_and(|id| self.ignore_ids.contains(id)) {
            return true;
        }
        data.style.display == Display::None || data.style.visibility == Visibility::Hidden
    }

    fn emit_text_node(&mut self, id: NodeId, text: &str) -> Result<(), usize> {
        let block = self.nearest_block(id)?;
        if let Some(prev) = self.prev_block {
            if prev != block && !self.out.ends_with_boundary() {
                self.out.push(BLOCK_BOUNDARY_MARKER, MapEntry::BlockBoundary);
            }
        }
        for (offset, c) in text.chars().enumerate() {
            self.out.push(c, MapEntry::TextRef { node: id, offset });
        }
        self.prev_block = Some(block);
        Ok(())
    }

    /// Is this element block-level? Cached per invocation.
    fn is_block_level(&mut self, id: NodeId) -> bool {
        if let Some(&cached) = self.block_cache.get(&id) {
            return cached;
        }
        let verdict = match self.doc.node(id).as_element() {
            Some(data) => {
                !INLINE_TAGS.contains(&data.tag.as_str())
                    && matches!(
                        data.style.display,
                        Display::Block
                            | Display::Flex
                            | Display::Grid
                            | Display::ListItem
                            | Display::Table
                            | Display::TableRow
                            | Display::TableCell
                            | Display::FlowRoot
                    )
            }
            None => false,
        };
        self.block_cache.insert(id, verdict);
        verdict
    }

    /// Nearest block-level ancestor of a text node (the root if none).
    ///
    /// Errs with the walk depth when the ceiling is hit, which aborts the
    /// whole build: a parent chain that deep means a broken tree.
    fn nearest_block(&mut self, text_node: NodeId) -> Result<NodeId, usize> {
        let mut current = self.doc.parent(text_node);
        let mut walked: Vec<NodeId> = Vec::new();
        let mut depth = 0usize;

        let found = loop {
            let Some(id) = current else {
                break self.doc.root();
            };
            if let Some(&cached) = self.nearest_block_cache.get(&id) {
                break cached;
            }
            depth += 1;
            if depth > self.limits.max_depth {
                return Err(depth);
            }
            if self.is_block_level(id) {
                break id;
            }
            walked.push(id);
            current = self.doc.parent(id);
        };

        for id in walked {
            self.nearest_block_cache.insert(id, found);
        }
        Ok(found)
    }
}

// ===== Tests =====

#[cfg(test)]
#[path = "vtl_tests.rs"]
mod tests;
