//! Arena-stored JavaScript syntax tree.
//!
//! Nodes live in one `Vec` owned by [`Ast`]; every edge is a [`NodeId`]
//! index into it. The analyzer remembers declaration sites as indices and
//! rewrites keywords through [`Ast::set_decl_kind`], so the change is
//! visible to every later reader of the tree. No node is created or
//! removed after lowering.

use std::fmt;
use std::ops::Index;

/// Index of a node in the [`Ast`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        NodeId(index as u32)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Byte range of a node (or token) in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// Source position: 1-based line, 0-based column (the parser's convention;
/// diagnostic location keys render the column 1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// The three declaration keywords, most to least restrictive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Const,
    Let,
    Var,
}

impl DeclKind {
    /// The keyword as it appears in source.
    pub fn as_str(self) -> &'static str {
        match self {
            DeclKind::Const => "const",
            DeclKind::Let => "let",
            DeclKind::Var => "var",
        }
    }

    /// Parse a keyword token. Anything else is not a declaration keyword.
    pub fn from_keyword(token: &str) -> Option<DeclKind> {
        match token {
            "const" => Some(DeclKind::Const),
            "let" => Some(DeclKind::Let),
            "var" => Some(DeclKind::Var),
            _ => None,
        }
    }
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single tree node.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    /// Position of the node's first character.
    pub start: Position,
    /// Byte range of the whole node.
    pub span: Span,
}

/// The node kinds the analyzer distinguishes. Everything else in the file
/// is lowered as [`NodeKind::Other`] with its children preserved, so the
/// walker still reaches nested nodes of interest.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// File root.
    Program { body: Vec<NodeId> },
    /// `var`/`let`/`const` statement. `kind` is the one mutable field of
    /// the whole tree; `keyword_span` is the keyword token's byte range.
    VariableDeclaration {
        kind: DeclKind,
        keyword_span: Span,
        declarators: Vec<NodeId>,
    },
    /// One `name = value` unit of a declaration. `names` holds every
    /// identifier the pattern binds (one for a plain identifier, several
    /// for destructuring); `pattern` is the binding side as a tree node.
    VariableDeclarator {
        names: Vec<String>,
        pattern: Option<NodeId>,
        init: Option<NodeId>,
    },
    /// A statement that is just an expression.
    ExpressionStatement { expression: NodeId },
    /// Plain or augmented assignment (`x = …`, `x += …`).
    AssignmentExpression { left: NodeId, right: NodeId },
    /// Dot or subscript access (`x.y`, `x[k]`).
    MemberExpression {
        object: NodeId,
        property: Option<NodeId>,
    },
    Identifier { name: String },
    /// A plain (non-template) string literal.
    StringLiteral { double_quoted: bool },
    Other { children: Vec<NodeId> },
}

impl NodeKind {
    /// Child edges in source order. Traversal follows exactly these;
    /// scalar fields (names, spans, flags) are not edges.
    pub fn children(&self) -> Vec<NodeId> {
        match self {
            NodeKind::Program { body } => body.clone(),
            NodeKind::VariableDeclaration { declarators, .. } => declarators.clone(),
            NodeKind::VariableDeclarator { pattern, init, .. } => {
                pattern.iter().chain(init.iter()).copied().collect()
            }
            NodeKind::ExpressionStatement { expression } => vec![*expression],
            NodeKind::AssignmentExpression { left, right } => vec![*left, *right],
            NodeKind::MemberExpression { object, property } => {
                std::iter::once(*object).chain(property.iter().copied()).collect()
            }
            NodeKind::Identifier { .. } | NodeKind::StringLiteral { .. } => Vec::new(),
            NodeKind::Other { children } => children.clone(),
        }
    }
}

/// The arena. Built once by the parser; mutated only through
/// [`Ast::set_decl_kind`].
#[derive(Debug)]
pub struct Ast {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Ast {
    pub(crate) fn new(nodes: Vec<Node>, root: NodeId) -> Self {
        Ast { nodes, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Current declaration keyword of a `VariableDeclaration` node.
    pub fn decl_kind(&self, id: NodeId) -> Option<DeclKind> {
        match &self[id].kind {
            NodeKind::VariableDeclaration { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Rewrite the declaration keyword of a `VariableDeclaration` node,
    /// the one in-place mutation the analyzer performs. A no-op for any
    /// other node kind.
    pub fn set_decl_kind(&mut self, id: NodeId, new_kind: DeclKind) {
        if let NodeKind::VariableDeclaration { kind, .. } = &mut self.nodes[id.index()].kind {
            *kind = new_kind;
        }
    }
}

impl Index<NodeId> for Ast {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }
}
