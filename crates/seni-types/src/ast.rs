//! AST node types for the Seni language.
//!
//! The parser produces a forest of [`Node`]s. Every node carries a [`Span`]
//! for error reporting. A LIST node owns its children; nodes are never
//! shared between parents.

use crate::form::Colour;
use crate::Span;

// ══════════════════════════════════════════════════════════════════════════════
// Nodes
// ══════════════════════════════════════════════════════════════════════════════

/// A parsed syntax node.
///
/// When `alterable` is set the node came from a bracket form `[value params...]`:
/// `parameter_ast` holds the annotation nodes that followed the value,
/// `parameter_prefix` holds comments that preceded it, and `gen_sym` is the
/// generated name assigned in discovery order.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub alterable: bool,
    pub parameter_ast: Vec<Node>,
    pub parameter_prefix: Vec<String>,
    pub gen_sym: Option<String>,
    pub span: Span,
}

/// The closed set of node kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// `(a b c)`. `quoted` is set when the list came from `'x`.
    List { children: Vec<Node>, quoted: bool },
    /// A vector of values sharing one bracket form, e.g. a 2D point.
    Vector(Vec<Node>),
    Int(i64),
    Float(f64),
    Name(String),
    /// `name:` (stored without the colon).
    Label(String),
    Str(String),
    Boolean(bool),
    Colour(Colour),
    Null,
}

impl Node {
    /// Create a plain (non-alterable) node.
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Self {
            kind,
            alterable: false,
            parameter_ast: Vec::new(),
            parameter_prefix: Vec::new(),
            gen_sym: None,
            span,
        }
    }

    /// `(children...)`
    pub fn list(children: Vec<Node>, span: Span) -> Self {
        Self::new(
            NodeKind::List {
                children,
                quoted: false,
            },
            span,
        )
    }

    pub fn name(name: impl Into<String>, span: Span) -> Self {
        Self::new(NodeKind::Name(name.into()), span)
    }

    /// Whether this node's kind may be marked alterable.
    pub fn is_literal(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Boolean(_)
                | NodeKind::Int(_)
                | NodeKind::Float(_)
                | NodeKind::Name(_)
                | NodeKind::Str(_)
        )
    }

    /// Children of a LIST or VECTOR node; empty for everything else.
    pub fn children(&self) -> &[Node] {
        match &self.kind {
            NodeKind::List { children, .. } | NodeKind::Vector(children) => children,
            _ => &[],
        }
    }

    /// The name if this is a NAME node.
    pub fn as_name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Name(n) => Some(n),
            _ => None,
        }
    }

    /// The label if this is a LABEL node.
    pub fn as_label(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Label(l) => Some(l),
            _ => None,
        }
    }

    /// Number of genotype values this node consumes when alterable.
    pub fn gene_count(&self) -> usize {
        if !self.alterable {
            return 0;
        }
        match &self.kind {
            NodeKind::Vector(children) => children.len(),
            _ => 1,
        }
    }

    /// Total number of genotype slots in this subtree, in traversal order.
    ///
    /// Parameter annotations are not counted: they describe how to vary the
    /// value and are never substituted themselves.
    pub fn alterable_slots(&self) -> usize {
        if self.alterable {
            return self.gene_count();
        }
        self.children().iter().map(Node::alterable_slots).sum()
    }

    /// Short kind name, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            NodeKind::List { .. } => "list",
            NodeKind::Vector(_) => "vector",
            NodeKind::Int(_) => "int",
            NodeKind::Float(_) => "float",
            NodeKind::Name(_) => "name",
            NodeKind::Label(_) => "label",
            NodeKind::Str(_) => "string",
            NodeKind::Boolean(_) => "boolean",
            NodeKind::Colour(_) => "colour",
            NodeKind::Null => "null",
        }
    }
}
