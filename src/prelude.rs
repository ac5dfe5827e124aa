//! # flowscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types
//! and traits of the crate. Import it to get quick access to everything a
//! dataflow-backed check needs.
//!
//! ```rust
//! use flowscope::prelude::*;
//! ```

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all flowscope operations
pub use crate::Error;

/// The result type used throughout flowscope
pub use crate::Result;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// The memoizing dataflow query façade
pub use crate::analysis::dataflow::{CacheStats, DataFlow, DataFlowResult};

/// Auxiliary compilation state passed alongside queries
pub use crate::context::CompilationContext;

// ================================================================================================
// Syntax Model
// ================================================================================================

/// Syntax tree arena, node ids, and node kinds
pub use crate::syntax::{NodeId, SyntaxKind, SyntaxNode, SyntaxTree};

// ================================================================================================
// Analyzable Units
// ================================================================================================

/// Unit identification from arbitrary tree positions
pub use crate::analysis::{enclosing_analyzable_unit, AnalyzableUnit, UnitKind};

// ================================================================================================
// Control Flow Graphs
// ================================================================================================

/// Control-flow graph representation and construction
pub use crate::analysis::cfg::{
    BasicBlock, BlockId, ControlFlowGraph, GraphBuilder, GraphFeatures, StructuralGraphBuilder,
};

// ================================================================================================
// Dataflow Framework
// ================================================================================================

/// Transfer function interface and the forward fixpoint engine
pub use crate::analysis::dataflow::{
    ForwardAnalysis, JoinSemiLattice, TransferFunction, ValueMap,
};

/// The shipped nullness propagation analysis
pub use crate::analysis::dataflow::{Nullness, NullnessPropagation, NullnessStore};
