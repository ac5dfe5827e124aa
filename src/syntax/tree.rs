//! Syntax tree arena and node identifiers.

use std::fmt;

use crate::syntax::SyntaxKind;

/// A strongly-typed identifier for nodes within a [`SyntaxTree`].
///
/// `NodeId` wraps a `usize` index, providing type safety to prevent accidental
/// mixing of node indices with other integer values. Node ids are assigned
/// sequentially starting from 0 (the compilation unit root) when nodes are
/// pushed into a tree.
///
/// A `NodeId` is only meaningful together with the tree that produced it;
/// indexing a different tree with it yields an unrelated node or a panic.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Creates a new `NodeId` from a raw index value.
    ///
    /// This constructor is primarily intended for internal use and testing. Normal
    /// usage should obtain `NodeId` values from [`SyntaxTree::push`].
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the raw index of this node.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single node in a [`SyntaxTree`].
#[derive(Debug, Clone)]
pub struct SyntaxNode {
    kind: SyntaxKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    text: Option<Box<str>>,
}

impl SyntaxNode {
    /// Returns the kind of this node.
    #[must_use]
    pub fn kind(&self) -> SyntaxKind {
        self.kind
    }

    /// Returns the parent of this node, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Returns the children of this node in declaration order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Returns the source text attached to this node, if any.
    ///
    /// Identifiers carry their name; literals may carry their spelling.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

/// An arena-allocated syntax tree with parent links.
///
/// The tree is append-only: nodes are pushed under an existing parent and never
/// removed. Node 0 is always the [`SyntaxKind::CompilationUnit`] root. Parent
/// links make outward walks cheap, which is what the unit locator relies on.
///
/// See [`SyntaxKind`] for the positional conventions composite nodes follow.
///
/// # Examples
///
/// ```rust
/// use flowscope::syntax::{SyntaxKind, SyntaxTree};
///
/// let mut tree = SyntaxTree::new();
/// let class = tree.push(tree.root(), SyntaxKind::TypeDecl);
/// let method = tree.push(class, SyntaxKind::MethodDecl);
/// tree.push_text(method, SyntaxKind::Identifier, "run");
/// let body = tree.push(method, SyntaxKind::Block);
///
/// assert_eq!(tree.kind(method), SyntaxKind::MethodDecl);
/// assert_eq!(tree.method_body(method), Some(body));
/// assert_eq!(tree.parent(body), Some(method));
/// ```
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    nodes: Vec<SyntaxNode>,
}

impl SyntaxTree {
    /// Creates a new syntax tree containing only the compilation unit root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![SyntaxNode {
                kind: SyntaxKind::CompilationUnit,
                parent: None,
                children: Vec::new(),
                text: None,
            }],
        }
    }

    /// Returns the id of the compilation unit root.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Appends a new node of `kind` under `parent` and returns its id.
    ///
    /// # Panics
    ///
    /// Panics if `parent` does not refer to a node of this tree.
    pub fn push(&mut self, parent: NodeId, kind: SyntaxKind) -> NodeId {
        self.push_node(parent, kind, None)
    }

    /// Appends a new node of `kind` carrying source `text` under `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` does not refer to a node of this tree.
    pub fn push_text(&mut self, parent: NodeId, kind: SyntaxKind, text: &str) -> NodeId {
        self.push_node(parent, kind, Some(text.into()))
    }

    fn push_node(&mut self, parent: NodeId, kind: SyntaxKind, text: Option<Box<str>>) -> NodeId {
        assert!(
            parent.0 < self.nodes.len(),
            "parent {} is not a node of this tree",
            parent
        );
        let id = NodeId(self.nodes.len());
        self.nodes.push(SyntaxNode {
            kind,
            parent: Some(parent),
            children: Vec::new(),
            text,
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Returns the number of nodes in this tree, including the root.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the node behind `id`, or `None` if the id is out of bounds.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&SyntaxNode> {
        self.nodes.get(id.0)
    }

    /// Returns the kind of `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` does not refer to a node of this tree.
    #[must_use]
    pub fn kind(&self, node: NodeId) -> SyntaxKind {
        self.nodes[node.0].kind
    }

    /// Returns the parent of `node`, or `None` for the root.
    ///
    /// # Panics
    ///
    /// Panics if `node` does not refer to a node of this tree.
    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    /// Returns the children of `node` in declaration order.
    ///
    /// # Panics
    ///
    /// Panics if `node` does not refer to a node of this tree.
    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    /// Returns the source text attached to `node`, if any.
    ///
    /// # Panics
    ///
    /// Panics if `node` does not refer to a node of this tree.
    #[must_use]
    pub fn text(&self, node: NodeId) -> Option<&str> {
        self.nodes[node.0].text()
    }

    /// Returns `true` if `node` is an expression.
    ///
    /// # Panics
    ///
    /// Panics if `node` does not refer to a node of this tree.
    #[must_use]
    pub fn is_expression(&self, node: NodeId) -> bool {
        self.kind(node).is_expression()
    }

    /// Iterates from `node` up to the root, starting with `node` itself.
    pub fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut current = Some(node);
        std::iter::from_fn(move || {
            let node = current?;
            current = self.parent(node);
            Some(node)
        })
    }

    /// Returns the body block of a [`SyntaxKind::MethodDecl`], or `None` when the
    /// method is bodiless or `node` is not a method declaration.
    #[must_use]
    pub fn method_body(&self, node: NodeId) -> Option<NodeId> {
        if self.kind(node) != SyntaxKind::MethodDecl {
            return None;
        }
        self.children(node)
            .iter()
            .copied()
            .find(|&child| self.kind(child) == SyntaxKind::Block)
    }

    /// Returns the inline initializer of a [`SyntaxKind::FieldDecl`], or `None` when
    /// the field has no initializer or `node` is not a field declaration.
    #[must_use]
    pub fn field_initializer(&self, node: NodeId) -> Option<NodeId> {
        if self.kind(node) != SyntaxKind::FieldDecl {
            return None;
        }
        self.children(node).get(1).copied()
    }

    /// Returns the body of a [`SyntaxKind::Lambda`], or `None` when `node` is not a
    /// lambda expression.
    ///
    /// The body is either a [`SyntaxKind::Block`] or a bare expression.
    #[must_use]
    pub fn lambda_body(&self, node: NodeId) -> Option<NodeId> {
        if self.kind(node) != SyntaxKind::Lambda {
            return None;
        }
        self.children(node).last().copied()
    }
}

impl Default for SyntaxTree {
    fn default() -> Self {
        Self::new()
    }
}
