//! Dataflow analysis framework and memoization.
//!
//! This module provides the framework independent static checks build on:
//!
//! - **Lattice**: [`JoinSemiLattice`] defines how abstract state combines at
//!   control flow merge points
//! - **Transfer function**: [`TransferFunction`] describes one analysis - its
//!   lattice and its per-statement update rule
//! - **Engine**: [`ForwardAnalysis`] iterates a transfer function over a
//!   control-flow graph to a fixpoint
//! - **Cache**: [`DataFlow`] memoizes graphs and completed runs so that many
//!   checks querying the same unit share the work
//!
//! A nullness propagation analysis ([`NullnessPropagation`]) is shipped both
//! as a usable analysis and as a worked example of the [`TransferFunction`]
//! contract.
//!
//! # Example
//!
//! ```rust
//! use flowscope::prelude::*;
//!
//! let mut tree = SyntaxTree::new();
//! let class = tree.push(tree.root(), SyntaxKind::TypeDecl);
//! let method = tree.push(class, SyntaxKind::MethodDecl);
//! tree.push_text(method, SyntaxKind::Identifier, "m");
//! let body = tree.push(method, SyntaxKind::Block);
//! let stmt = tree.push(body, SyntaxKind::ExpressionStatement);
//! let assign = tree.push(stmt, SyntaxKind::Assign);
//! tree.push_text(assign, SyntaxKind::Identifier, "x");
//! tree.push(assign, SyntaxKind::NullLiteral);
//!
//! let dataflow = DataFlow::new();
//! let ctx = CompilationContext::new();
//! let unit = enclosing_analyzable_unit(&tree, assign).unwrap();
//! let result = dataflow.analysis_of(&tree, unit, &ctx, NullnessPropagation)?;
//! assert_eq!(result.analysis().value_at(assign), Some(&Nullness::Null));
//! # Ok::<(), flowscope::Error>(())
//! ```

mod cache;
mod engine;
mod lattice;
mod nullness;
mod transfer;

pub use cache::{CacheStats, DataFlow, DataFlowResult};
pub use engine::ForwardAnalysis;
pub use lattice::JoinSemiLattice;
pub use nullness::{Nullness, NullnessPropagation, NullnessStore};
pub use transfer::{TransferFunction, ValueMap};
