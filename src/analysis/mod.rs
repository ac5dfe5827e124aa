//! Static analysis infrastructure.
//!
//! This module provides the analysis layers of the crate, leaves first:
//!
//! - [`unit`](self) - Identification of analyzable units (methods, lambdas,
//!   field initializers, initializer blocks) from arbitrary tree positions
//! - [`cfg`] - Control-flow graph representation and construction
//! - [`dataflow`] - Transfer functions, the forward fixpoint engine, and the
//!   memoizing [`DataFlow`](dataflow::DataFlow) query façade
//!
//! # Usage
//!
//! Most callers interact with [`dataflow::DataFlow`] only:
//!
//! ```rust,ignore
//! let dataflow = DataFlow::new();
//! let value = dataflow.value_of(&tree, expr, &ctx, NullnessPropagation)?;
//! ```
//!
//! The lower layers stay public for callers with custom lowerings (implement
//! [`cfg::GraphBuilder`]) or one-shot analyses that bypass caching (drive
//! [`dataflow::ForwardAnalysis`] directly).

pub mod cfg;
pub mod dataflow;

mod unit;

pub use unit::{enclosing_analyzable_unit, AnalyzableUnit, UnitKind};
