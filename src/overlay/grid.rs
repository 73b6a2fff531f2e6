//! Deterministic monospace layout.
//!
//! A reference `Layout` implementation for environments without a real
//! layout engine (the CLI driver, tests, benches): every text scalar
//! occupies one fixed-size cell, block-level elements start a new row,
//! and long rows wrap at a configurable column count. Viewport and
//! per-node clip chains are configured directly.

use crate::model::{Display, DocRange, Document, NodeId, NodeKind, Rect};
use crate::overlay::Layout;
use std::collections::HashMap;

/// Cell width in px for the grid layout.
pub const CHAR_W: f64 = 8.0;
/// Row height in px for the grid layout.
pub const LINE_H: f64 = 16.0;

/// Monospace grid layout over a document.
pub struct GridLayout {
    char_rects: HashMap<(NodeId, usize), Rect>,
    element_rects: HashMap<NodeId, Rect>,
    text_nodes: Vec<NodeId>,
    viewport: Rect,
    clips: HashMap<NodeId, Vec<Rect>>,
}

impl GridLayout {
    /// Lay out `doc` with `cols` columns per row.
    pub fn new(doc: &Document, cols: usize) -> Self {
        let mut layout = Self {
            char_rects: HashMap::new(),
            element_rects: HashMap::new(),
            text_nodes: Vec::new(),
            viewport: Rect::new(0.0, 0.0, cols as f64 * CHAR_W, 10_000.0),
            clips: HashMap::new(),
        };

        let mut col = 0usize;
        let mut row = 0usize;
        let mut stack = vec![doc.root()];
        while let Some(id) = stack.pop() {
            let node = doc.node(id);
            match &node.kind {
                NodeKind::Element(data) => {
                    let block = !matches!(data.style.display, Display::Inline | Display::InlineBlock);
                    if block && col > 0 {
                        col = 0;
                        row += 1;
                    }
                    for &child in doc.children(id).iter().rev() {
                        stack.push(child);
                    }
                }
                NodeKind::Text(text) => {
                    layout.text_nodes.push(id);
                    for (offset, _) in text.chars().enumerate() {
                        if col >= cols {
                            col = 0;
                            row += 1;
                        }
                        let rect = Rect::new(
                            col as f64 * CHAR_W,
                            row as f64 * LINE_H,
                            CHAR_W,
                            LINE_H,
                        );
                        layout.char_rects.insert((id, offset), rect);
                        col += 1;
                    }
                }
            }
        }

        // Element bounds are the union of their subtree's cells.
        for id in doc.document_order() {
            if doc.node(id).as_element().is_none() {
                continue;
            }
            let mut bounds: Option<Rect> = None;
            let mut subtree = vec![id];
            while let Some(current) = subtree.pop() {
                if let NodeKind::Text(text) = &doc.node(current).kind {
                    for offset in 0..text.chars().count() {
                        if let Some(&rect) = layout.char_rects.get(&(current, offset)) {
                            bounds = Some(match bounds {
                                None => rect,
                                Some(b) => union(b, rect),
                            });
                        }
                    }
                }
                subtree.extend(doc.children(current).iter().copied());
            }
            if let Some(bounds) = bounds {
                layout.element_rects.insert(id, bounds);
            }
        }
        layout
    }

    pub fn with_viewport(mut self, viewport: Rect) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn with_clip(mut self, node: NodeId, clips: Vec<Rect>) -> Self {
        self.clips.insert(node, clips);
        self
    }

    /// Rect of one scalar, for assertions.
    pub fn char_rect(&self, node: NodeId, offset: usize) -> Option<Rect> {
        self.char_rects.get(&(node, offset)).copied()
    }
}

fn union(a: Rect, b: Rect) -> Rect {
    let left = a.left.min(b.left);
    let top = a.top.min(b.top);
    let right = a.right().max(b.right());
    let bottom = a.bottom().max(b.bottom());
    Rect::new(left, top, right - left, bottom - top)
}

impl Layout for GridLayout {
    fn range_line_rects(&self, range: &DocRange) -> Vec<Rect> {
        let Some(start_index) = self.text_nodes.iter().position(|&n| n == range.start_node)
        else {
            return Vec::new();
        };
        let Some(end_index) = self.text_nodes.iter().position(|&n| n == range.end_node) else {
            return Vec::new();
        };

        let mut rects = Vec::new();
        for (index, &node) in self.text_nodes[start_index..=end_index]
            .iter()
            .enumerate()
            .map(|(i, n)| (i + start_index, n))
        {
            let mut offset = if index == start_index {
                range.start_offset
            } else {
                0
            };
            loop {
                if index == end_index && offset >= range.end_offset {
                    break;
                }
                let Some(&rect) = self.char_rects.get(&(node, offset)) else {
                    break;
                };
                rects.push(rect);
                offset += 1;
            }
        }
        rects
    }

    fn element_rect(&self, element: NodeId) -> Option<Rect> {
        self.element_rects.get(&element).copied()
    }

    fn viewport(&self) -> Rect {
        self.viewport
    }

    fn clip_chain(&self, node: NodeId) -> Vec<Rect> {
        self.clips.get(&node).cloned().unwrap_or_default()
    }
}
