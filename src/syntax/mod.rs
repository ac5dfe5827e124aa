//! Minimal syntax tree model.
//!
//! This module provides the tree substrate the rest of the crate analyzes: an
//! append-only arena of [`SyntaxNode`]s with parent links, addressed by
//! strongly-typed [`NodeId`]s. It deliberately models only as much surface
//! syntax as per-method dataflow needs - declarations that delimit analyzable
//! units, the statement forms the structural lowering understands, and a small
//! expression vocabulary.
//!
//! An "expression position" throughout this crate is a pair of a [`SyntaxTree`]
//! reference and a [`NodeId`] whose kind satisfies
//! [`SyntaxKind::is_expression`]. Parent links make walking outward from such a
//! position cheap, which is the access pattern of the unit locator.

mod kind;
mod tree;

pub use kind::SyntaxKind;
pub use tree::{NodeId, SyntaxNode, SyntaxTree};
