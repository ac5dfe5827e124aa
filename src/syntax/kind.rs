//! Syntax node kind classification.

use std::fmt;

use strum::{EnumCount, EnumIter};

/// The kind of a [`SyntaxNode`](crate::syntax::SyntaxNode).
///
/// The set of kinds is intentionally small: just enough structure for the unit
/// locator to identify analyzable units, for the structural lowering to build
/// control-flow graphs, and for transfer functions to evaluate expressions.
///
/// # Positional Conventions
///
/// Several kinds give meaning to child positions rather than introducing
/// dedicated child kinds:
///
/// - [`MethodDecl`](Self::MethodDecl): child 0 is the name [`Identifier`](Self::Identifier);
///   the body, when present, is the first [`Block`](Self::Block) child. A method without a
///   `Block` child is bodiless (abstract or interface method).
/// - [`FieldDecl`](Self::FieldDecl): child 0 is the name identifier; child 1, when present,
///   is the inline initializer expression.
/// - [`Lambda`](Self::Lambda): leading [`Identifier`](Self::Identifier) children are
///   parameters; the last child is the body (a [`Block`](Self::Block) or an expression).
/// - [`Call`](Self::Call): child 0 is the callee identifier; the remaining children are
///   argument expressions.
/// - [`Assign`](Self::Assign): child 0 is the target identifier; child 1 is the assigned
///   expression.
/// - [`If`](Self::If): children are condition, then-[`Block`](Self::Block), and an optional
///   else-[`Block`](Self::Block).
/// - [`While`](Self::While): children are condition and body [`Block`](Self::Block).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumCount, EnumIter)]
pub enum SyntaxKind {
    /// The root of a syntax tree.
    CompilationUnit,
    /// An import declaration.
    Import,
    /// A type declaration. Members (methods, fields, initializer blocks) are direct children.
    TypeDecl,
    /// A method declaration, with or without a body.
    MethodDecl,
    /// A field declaration, optionally with an inline initializer.
    FieldDecl,
    /// A braced sequence of statements.
    ///
    /// A block directly inside a [`TypeDecl`](Self::TypeDecl) is an instance or static
    /// initializer block; a block inside a method or lambda is that unit's body.
    Block,
    /// A statement wrapping a single expression.
    ExpressionStatement,
    /// An `if` statement.
    If,
    /// A `while` loop.
    While,
    /// A `return` statement with an optional result expression.
    Return,
    /// A `throw` statement.
    Throw,
    /// An `assert` statement.
    Assert,
    /// A lambda expression.
    Lambda,
    /// A name reference.
    Identifier,
    /// The `null` literal.
    NullLiteral,
    /// Any non-null literal.
    Literal,
    /// A call expression.
    Call,
    /// An assignment expression.
    Assign,
}

impl SyntaxKind {
    /// Returns `true` if nodes of this kind are expressions.
    ///
    /// Expressions are the positions dataflow values are attached to, and the only
    /// positions accepted by
    /// [`DataFlow::value_of`](crate::analysis::dataflow::DataFlow::value_of).
    #[must_use]
    pub fn is_expression(self) -> bool {
        matches!(
            self,
            Self::Identifier
                | Self::NullLiteral
                | Self::Literal
                | Self::Call
                | Self::Assign
                | Self::Lambda
        )
    }
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_expression_kinds() {
        assert!(SyntaxKind::Identifier.is_expression());
        assert!(SyntaxKind::NullLiteral.is_expression());
        assert!(SyntaxKind::Lambda.is_expression());
        assert!(!SyntaxKind::Block.is_expression());
        assert!(!SyntaxKind::MethodDecl.is_expression());
        assert!(!SyntaxKind::ExpressionStatement.is_expression());
    }

    #[test]
    fn test_statement_and_declaration_kinds_are_not_expressions() {
        let expressions: Vec<_> = SyntaxKind::iter().filter(|k| k.is_expression()).collect();
        assert_eq!(expressions.len(), 6);
    }
}
