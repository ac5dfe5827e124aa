//! Control Flow Graph construction and representation.
//!
//! A control-flow graph is the substrate dataflow analysis runs over: basic
//! blocks of statement nodes connected by possible-execution-order edges,
//! built for exactly one analyzable unit.
//!
//! # Key Components
//!
//! - [`ControlFlowGraph`] - The graph structure, with the traversals forward
//!   dataflow needs
//! - [`GraphBuilder`] - The construction seam the caching layer delegates to
//! - [`StructuralGraphBuilder`] - The shipped lowering over
//!   [`SyntaxKind`](crate::syntax::SyntaxKind) statement forms
//! - [`GraphFeatures`] - Optional construction features (exceptional edges,
//!   assertion nodes), always disabled by the caching layer
//!
//! # Examples
//!
//! ```rust
//! use flowscope::analysis::cfg::{GraphBuilder, GraphFeatures, StructuralGraphBuilder};
//! use flowscope::analysis::{AnalyzableUnit, UnitKind};
//! use flowscope::context::CompilationContext;
//! use flowscope::syntax::{SyntaxKind, SyntaxTree};
//!
//! let mut tree = SyntaxTree::new();
//! let class = tree.push(tree.root(), SyntaxKind::TypeDecl);
//! let method = tree.push(class, SyntaxKind::MethodDecl);
//! tree.push_text(method, SyntaxKind::Identifier, "m");
//! let body = tree.push(method, SyntaxKind::Block);
//! let stmt = tree.push(body, SyntaxKind::ExpressionStatement);
//! tree.push_text(stmt, SyntaxKind::Identifier, "x");
//!
//! let unit = AnalyzableUnit::new(method, UnitKind::Method);
//! let cfg = StructuralGraphBuilder::new().build(
//!     &tree,
//!     unit,
//!     GraphFeatures::empty(),
//!     &CompilationContext::new(),
//! )?;
//! assert_eq!(cfg.block_count(), 2);
//! # Ok::<(), flowscope::Error>(())
//! ```

mod builder;
mod graph;

pub use builder::{GraphBuilder, GraphFeatures, StructuralGraphBuilder};
pub use graph::{BasicBlock, BlockId, ControlFlowGraph};
