//! Read-only document tree consumed by the search core.
//!
//! The host environment owns the real DOM; the core works against this
//! arena projection of it: element and text nodes in document order, with
//! computed style carried as plain data. Nothing in the core mutates a
//! `Document` after construction.

use std::fmt;

// ===== NodeId =====

/// Index of a node within a `Document` arena.
///
/// Only valid for the document that produced it. Stable for the lifetime
/// of that document (the core never removes nodes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Raw arena index, for cache keys and diagnostics.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ===== Computed style =====

/// Computed `display` value, reduced to the cases the core distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    #[default]
    Block,
    Inline,
    InlineBlock,
    Flex,
    Grid,
    ListItem,
    Table,
    TableRow,
    TableCell,
    FlowRoot,
    /// `display: none` — the subtree is invisible.
    None,
}

impl Display {
    /// Parse a CSS `display` keyword. Unknown keywords map to `Inline`,
    /// which keeps them out of the block-level set without hiding them.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "block" => Display::Block,
            "inline" => Display::Inline,
            "inline-block" => Display::InlineBlock,
            "flex" => Display::Flex,
            "grid" => Display::Grid,
            "list-item" => Display::ListItem,
            "table" => Display::Table,
            "table-row" => Display::TableRow,
            "table-cell" => Display::TableCell,
            "flow-root" => Display::FlowRoot,
            "none" => Display::None,
            _ => Display::Inline,
        }
    }
}

/// Computed `visibility` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
}

/// The slice of computed style the core consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ComputedStyle {
    pub display: Display,
    pub visibility: Visibility,
}

// ===== Nodes =====

/// Element payload: tag name, identity attributes, computed style.
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Tag name, always lowercase.
    pub tag: String,
    /// Value of the `id` attribute, if present and non-empty.
    pub id: Option<String>,
    /// Class list from the `class` attribute, in source order.
    pub classes: Vec<String>,
    /// Remaining attributes as (name, value) pairs, names lowercase.
    pub attributes: Vec<(String, String)>,
    pub style: ComputedStyle,
}

impl ElementData {
    /// Look up an attribute value by (lowercase) name.
    ///
    /// `id` and `class` are resolved from their dedicated fields.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        match name {
            "id" => self.id.as_deref(),
            _ => self
                .attributes
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str()),
        }
    }
}

/// Node payload: element or text.
#[derive(Debug, Clone)]
pub enum NodeKind {
    Element(ElementData),
    Text(String),
}

/// One node in the arena: payload plus tree links.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub kind: NodeKind,
}

impl Node {
    /// Element payload, or `None` for text nodes.
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.kind {
            NodeKind::Element(data) => Some(data),
            NodeKind::Text(_) => None,
        }
    }

    /// Text payload, or `None` for element nodes.
    pub fn as_text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text(text) => Some(text.as_str()),
            NodeKind::Element(_) => None,
        }
    }
}

// ===== Document =====

/// Arena of nodes rooted at a synthetic root element.
///
/// Built once (by the HTML parser or a test builder) and then only read.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Document {
    /// Create a document holding only a root element with the given tag.
    pub fn new(root_tag: &str) -> Self {
        let root = Node {
            parent: None,
            children: Vec::new(),
            kind: NodeKind::Element(ElementData {
                tag: root_tag.to_ascii_lowercase(),
                id: None,
                classes: Vec::new(),
                attributes: Vec::new(),
                style: ComputedStyle::default(),
            }),
        };
        Self {
            nodes: vec![root],
            root: NodeId::new(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append a new element under `parent` and return its id.
    pub fn append_element(&mut self, parent: NodeId, data: ElementData) -> NodeId {
        self.append_node(parent, NodeKind::Element(data))
    }

    /// Append a new text node under `parent` and return its id.
    pub fn append_text(&mut self, parent: NodeId, text: impl Into<String>) -> NodeId {
        self.append_node(parent, NodeKind::Text(text.into()))
    }

    fn append_node(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(Node {
            parent: Some(parent),
            children: Vec::new(),
            kind,
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// All node ids in document (pre-) order, root included.
    pub fn document_order(&self) -> DocumentOrder<'_> {
        DocumentOrder {
            doc: self,
            stack: vec![self.root],
        }
    }

    /// Concatenated text of the subtree rooted at `id`, in document order.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let node = self.node(current);
            if let NodeKind::Text(text) = &node.kind {
                out.push_str(text);
            }
            for &child in node.children.iter().rev() {
                stack.push(child);
            }
        }
        out
    }
}

/// Iterator over node ids in document order (explicit stack, no recursion).
pub struct DocumentOrder<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for DocumentOrder<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        for &child in self.doc.node(id).children.iter().rev() {
            self.stack.push(child);
        }
        Some(id)
    }
}

// ===== DocRange =====

/// A contiguous range over the document's text nodes.
///
/// Offsets count Unicode scalars within the node's text. The end offset is
/// exclusive. Start and end may sit in different text nodes (a match that
/// crosses inline element boundaries).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocRange {
    pub start_node: NodeId,
    pub start_offset: usize,
    pub end_node: NodeId,
    pub end_offset: usize,
}

// ===== Tests =====
