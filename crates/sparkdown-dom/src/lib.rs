//! Element tree for the Sparkdown converter.
//!
//! The tree builder in `sparkdown-parser` produces a [`DomTree`]; serializers
//! walk it depth-first to emit HTML or JSON.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all relationships.
//! Parents own their children through index lists; the `parent` index on each
//! node is a non-owning back-reference used only for ascent while closing
//! elements.

use serde::Serialize;
use strum_macros::Display;

/// A type-safe index into the element tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root document node is always at index 0.
    pub const ROOT: NodeId = NodeId(0);
}

/// The closed set of node kinds a Sparkdown document can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// The root. Emits no tag of its own.
    Document,
    /// `<h1>`
    Heading1,
    /// `<h2>`
    Heading2,
    /// `<h3>`
    Heading3,
    /// `<h4>`
    Heading4,
    /// `<h5>`
    Heading5,
    /// `<p>`, opened implicitly by inline content at document level.
    Paragraph,
    /// `<strong>`
    Strong,
    /// `<em>`
    Emphasis,
    /// `<hr/>`
    Rule,
    /// `<br/>`
    LineBreak,
    /// A run of literal text.
    PlainText,
}

/// Whether a kind participates in block or inline layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Category {
    /// Documents, headings and paragraphs.
    Block,
    /// Strong, emphasis, rules, line breaks and text.
    Inline,
}

impl ElementKind {
    /// Deepest heading level the grammar knows about.
    pub const MAX_HEADING_LEVEL: usize = 5;

    /// The heading kind for a `#` run of `level` characters.
    #[must_use]
    pub const fn heading(level: usize) -> Option<Self> {
        match level {
            1 => Some(Self::Heading1),
            2 => Some(Self::Heading2),
            3 => Some(Self::Heading3),
            4 => Some(Self::Heading4),
            5 => Some(Self::Heading5),
            _ => None,
        }
    }

    /// HTML tag name, or `None` for the document root and text.
    #[must_use]
    pub const fn tag_name(self) -> Option<&'static str> {
        match self {
            Self::Heading1 => Some("h1"),
            Self::Heading2 => Some("h2"),
            Self::Heading3 => Some("h3"),
            Self::Heading4 => Some("h4"),
            Self::Heading5 => Some("h5"),
            Self::Paragraph => Some("p"),
            Self::Strong => Some("strong"),
            Self::Emphasis => Some("em"),
            Self::Rule => Some("hr"),
            Self::LineBreak => Some("br"),
            Self::Document | Self::PlainText => None,
        }
    }

    /// Derived layout category.
    #[must_use]
    pub const fn category(self) -> Category {
        match self {
            Self::Strong | Self::Emphasis | Self::Rule | Self::LineBreak | Self::PlainText => {
                Category::Inline
            }
            Self::Document
            | Self::Heading1
            | Self::Heading2
            | Self::Heading3
            | Self::Heading4
            | Self::Heading5
            | Self::Paragraph => Category::Block,
        }
    }

    /// Void kinds are self-closing and never hold children.
    #[must_use]
    pub const fn is_void(self) -> bool {
        matches!(self, Self::Rule | Self::LineBreak)
    }
}

/// The token that closes an open element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Terminator {
    /// Only the end of input closes this element, and that is never matched
    /// by content.
    EndOfInput,
    /// Closed by a run of at least this many newlines.
    Newlines(usize),
    /// Closed by exactly this markup run (e.g. `"**"`).
    Run(String),
    /// Void elements are sealed as soon as they are inserted.
    SelfClosing,
}

impl Terminator {
    /// Whether a token with this lexeme closes an element carrying `self`.
    #[must_use]
    pub fn is_satisfied_by(&self, lexeme: &str) -> bool {
        match self {
            Self::Newlines(min) => {
                !lexeme.is_empty() && lexeme.len() >= *min && lexeme.chars().all(|c| c == '\n')
            }
            Self::Run(run) => run == lexeme,
            Self::EndOfInput | Self::SelfClosing => false,
        }
    }
}

impl std::fmt::Display for Terminator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EndOfInput => write!(f, "end of input"),
            Self::Newlines(1) => write!(f, "\\n"),
            Self::Newlines(n) => write!(f, "{}", "\\n".repeat(*n)),
            Self::Run(run) => write!(f, "{run}"),
            Self::SelfClosing => write!(f, "self-closing"),
        }
    }
}

/// How many enclosing elements treat the closing token as already consumed.
///
/// When an element closes on its own terminator the token is retried at the
/// parent; the parent absorbs that many units of input before resuming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Propagation(pub usize);

impl Propagation {
    /// The closing token is re-offered to the parent unchanged.
    pub const NONE: Propagation = Propagation(0);
    /// The parent absorbs the closing token.
    pub const ABSORB: Propagation = Propagation(1);
}

/// Element-specific data. Fixed once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    kind: ElementKind,
    terminator: Terminator,
    propagation: Propagation,
}

impl ElementData {
    /// Build the data for an element opened by `lexeme`.
    ///
    /// Strong and emphasis close on the exact run that opened them; headings
    /// close on a line end and paragraphs on a blank line.
    #[must_use]
    pub fn new(kind: ElementKind, lexeme: &str) -> Self {
        let (terminator, propagation) = match kind {
            ElementKind::Heading1
            | ElementKind::Heading2
            | ElementKind::Heading3
            | ElementKind::Heading4
            | ElementKind::Heading5 => (Terminator::Newlines(1), Propagation::NONE),
            ElementKind::Paragraph => (Terminator::Newlines(2), Propagation::NONE),
            ElementKind::Strong | ElementKind::Emphasis => {
                (Terminator::Run(lexeme.to_string()), Propagation::ABSORB)
            }
            ElementKind::Rule | ElementKind::LineBreak => {
                (Terminator::SelfClosing, Propagation::NONE)
            }
            ElementKind::Document | ElementKind::PlainText => {
                (Terminator::EndOfInput, Propagation::NONE)
            }
        };
        Self {
            kind,
            terminator,
            propagation,
        }
    }

    /// The element's kind.
    #[must_use]
    pub const fn kind(&self) -> ElementKind {
        self.kind
    }

    /// The token that closes this element.
    #[must_use]
    pub const fn terminator(&self) -> &Terminator {
        &self.terminator
    }

    /// Terminator propagation applied to the parent when this element closes
    /// on its own terminator.
    #[must_use]
    pub const fn propagation(&self) -> Propagation {
        self.propagation
    }
}

/// What a node holds.
#[derive(Debug, Clone)]
pub enum NodeType {
    /// The single root.
    Document,
    /// A markup element.
    Element(ElementData),
    /// Literal text; adjacent runs are merged into one node.
    Text(String),
}

/// A node in the arena.
#[derive(Debug, Clone)]
pub struct Node {
    /// What the node holds.
    pub node_type: NodeType,
    /// Non-owning back-reference, `None` only for the root.
    pub parent: Option<NodeId>,
    /// Owned children, in document order.
    pub children: Vec<NodeId>,
    /// Set once the node is finalized; sealed nodes take no more content.
    pub sealed: bool,
}

impl Node {
    /// The node's kind, with the root reported as `Document` and text as
    /// `PlainText`.
    #[must_use]
    pub const fn kind(&self) -> ElementKind {
        match &self.node_type {
            NodeType::Document => ElementKind::Document,
            NodeType::Element(data) => data.kind,
            NodeType::Text(_) => ElementKind::PlainText,
        }
    }
}

/// Arena-based element tree.
///
/// All nodes live in one vector and refer to each other by [`NodeId`]. The
/// Document node is always at index 0.
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<Node>,
    seal_order: Vec<NodeId>,
}

impl DomTree {
    /// Create a new tree with just the Document node.
    #[must_use]
    pub fn new() -> Self {
        let document = Node {
            node_type: NodeType::Document,
            parent: None,
            children: Vec::new(),
            sealed: false,
        };
        Self {
            nodes: vec![document],
            seal_order: Vec::new(),
        }
    }

    /// Get the root document node ID.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get the number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty (it always holds at least the Document).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new node and return its ID.
    /// The node is not yet attached to the tree.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            node_type,
            parent: None,
            children: Vec::new(),
            sealed: false,
        });
        id
    }

    /// Appends `child` as the last child of `parent`.
    ///
    /// Sealed parents and block children under inline parents are logic
    /// faults in the builder.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(!self.nodes[parent.0].sealed, "append to sealed node");
        debug_assert!(
            self.nodes[parent.0].kind().category() == Category::Block
                || self.nodes[child.0].kind().category() == Category::Inline,
            "inline elements cannot hold block elements"
        );
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Append `text` to `parent`, extending its trailing text child when there
    /// is one. Returns the text node that received the data.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        debug_assert!(!self.nodes[parent.0].sealed, "append to sealed node");
        if let Some(last) = self.last_child(parent)
            && let NodeType::Text(ref mut data) = self.nodes[last.0].node_type
        {
            data.push_str(text);
            return last;
        }
        let id = self.alloc(NodeType::Text(text.to_string()));
        self.append_child(parent, id);
        id
    }

    /// Finalize a node. Sealing is recorded in order so closing sequences can
    /// be inspected after the parse.
    pub fn seal(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.get_mut(id.0)
            && !node.sealed
        {
            node.sealed = true;
            self.seal_order.push(id);
        }
    }

    /// Whether `id` has been finalized.
    #[must_use]
    pub fn is_sealed(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(|n| n.sealed)
    }

    /// Nodes in the order they were sealed.
    #[must_use]
    pub fn seal_order(&self) -> &[NodeId] {
        &self.seal_order
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Get the last child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.children.last().copied())
    }

    /// The kind of a node, if it exists.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> Option<ElementKind> {
        self.get(id).map(Node::kind)
    }

    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Get element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get text content if this node is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Concatenated text of `id` and all of its descendants.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        if let Some(text) = self.as_text(id) {
            out.push_str(text);
            return;
        }
        for &child in self.children(id) {
            self.collect_text(child, out);
        }
    }

    /// First node of `kind` in depth-first pre-order below (and including) `from`.
    #[must_use]
    pub fn find_first(&self, from: NodeId, kind: ElementKind) -> Option<NodeId> {
        if self.kind(from) == Some(kind) {
            return Some(from);
        }
        self.children(from)
            .iter()
            .find_map(|&child| self.find_first(child, kind))
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over ancestors of a node.
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}
