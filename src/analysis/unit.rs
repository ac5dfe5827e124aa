//! Analyzable unit identification.
//!
//! Dataflow runs over exactly one *analyzable unit* at a time: a method
//! declaration with a body, a lambda expression, a field's inline initializer,
//! or an instance/static initializer block. Each inline field initializer and
//! each initializer block is treated as its own unit; they are not merged into
//! one virtual block.
//!
//! [`enclosing_analyzable_unit`] resolves an arbitrary expression position to
//! the smallest enclosing unit by walking parent links outward. Positions with
//! no enclosing unit exist and are expected - the identifier inside an import
//! declaration is the canonical example - so the locator returns an `Option`,
//! never an error.

use std::fmt;

use strum::{EnumCount, EnumIter};

use crate::syntax::{NodeId, SyntaxKind, SyntaxTree};

/// The syntactic kind of an analyzable unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumCount, EnumIter)]
pub enum UnitKind {
    /// A method declaration.
    ///
    /// The locator matches method declarations with and without bodies; callers
    /// that need a control-flow graph must reject bodiless methods themselves
    /// (the query façade reports "no value available" for them).
    Method,
    /// A lambda expression.
    Lambda,
    /// A field declaration with an inline initializer.
    FieldInitializer,
    /// An instance or static initializer block.
    InitializerBlock,
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Method => "method",
            Self::Lambda => "lambda",
            Self::FieldInitializer => "field-initializer",
            Self::InitializerBlock => "initializer-block",
        };
        f.write_str(name)
    }
}

/// The identity of an analyzable unit within a syntax tree.
///
/// The identity is a plain value over the unit's root node and syntactic kind.
/// It is the *entire* graph cache key: auxiliary per-query state such as the
/// [`CompilationContext`](crate::context::CompilationContext) is deliberately
/// excluded, so semantically equivalent requests collide regardless of which
/// context object they carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnalyzableUnit {
    /// The root node of the unit: the method or field declaration, the lambda
    /// expression, or the initializer block.
    pub node: NodeId,
    /// The syntactic kind of the unit.
    pub kind: UnitKind,
}

impl AnalyzableUnit {
    /// Creates a unit identity from its root node and kind.
    #[must_use]
    pub fn new(node: NodeId, kind: UnitKind) -> Self {
        Self { node, kind }
    }

    /// Returns `true` if this unit has a body to build a control-flow graph from.
    ///
    /// Only method declarations can lack one; every other unit kind is located
    /// through the existence of its body or initializer.
    #[must_use]
    pub fn has_body(&self, tree: &SyntaxTree) -> bool {
        match self.kind {
            UnitKind::Method => tree.method_body(self.node).is_some(),
            UnitKind::Lambda | UnitKind::FieldInitializer | UnitKind::InitializerBlock => true,
        }
    }
}

impl fmt::Display for AnalyzableUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.kind, self.node)
    }
}

/// Finds the smallest analyzable unit enclosing `position`.
///
/// Walks outward through enclosing syntax until one of the unit forms matches:
///
/// - a method declaration (with or without a body),
/// - a block directly inside a type declaration (an initializer block),
/// - a field declaration with an inline initializer directly inside a type
///   declaration,
/// - an enclosing lambda expression.
///
/// Returns `None` if the root is reached without a match, e.g. for an
/// identifier inside an import or package declaration. Callers must treat
/// `None` as "no dataflow value available", never as an error.
///
/// Note that a lambda expression node itself resolves to its *enclosing* unit,
/// not to the lambda: the lambda only becomes the unit for positions inside
/// its body.
///
/// # Panics
///
/// Panics if `position` does not refer to a node of `tree`.
#[must_use]
pub fn enclosing_analyzable_unit(tree: &SyntaxTree, position: NodeId) -> Option<AnalyzableUnit> {
    let mut current = Some(position);
    while let Some(node) = current {
        if tree.kind(node) == SyntaxKind::MethodDecl {
            return Some(AnalyzableUnit::new(node, UnitKind::Method));
        }
        let parent = tree.parent(node);
        if let Some(parent) = parent {
            if tree.kind(parent) == SyntaxKind::TypeDecl {
                if tree.kind(node) == SyntaxKind::Block {
                    // a class or instance initializer block
                    return Some(AnalyzableUnit::new(node, UnitKind::InitializerBlock));
                }
                if tree.kind(node) == SyntaxKind::FieldDecl
                    && tree.field_initializer(node).is_some()
                {
                    // a field with an inline initializer
                    return Some(AnalyzableUnit::new(node, UnitKind::FieldInitializer));
                }
            }
            if tree.kind(parent) == SyntaxKind::Lambda {
                return Some(AnalyzableUnit::new(parent, UnitKind::Lambda));
            }
        }
        current = parent;
    }
    None
}
