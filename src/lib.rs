// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![allow(dead_code)]

//! # flowscope
//!
//! A memoizing control-flow graph and dataflow analysis layer for per-method
//! static analysis of syntax trees.
//!
//! `flowscope` sits beneath a family of independent static checks that
//! repeatedly ask "what is the abstract value of this expression under
//! analysis X?" while walking the same syntax tree. Computing a control-flow
//! graph and running a fixpoint analysis over it are both expensive, so this
//! crate computes each at most once per analyzable unit and hands out the
//! memoized results.
//!
//! ## Features
//!
//! - **Unit location** - Find the smallest enclosing method, lambda, field
//!   initializer, or initializer block from any expression position
//! - **Single-slot graph cache** - Exactly one control-flow graph is kept
//!   resident, bounding memory across a whole-file traversal
//! - **Keyed analysis cache** - Analysis results are memoized per
//!   (transfer function, graph instance) pair and shared between
//!   independently constructed but value-equal analyses
//! - **Pluggable lowering** - Control-flow graph construction is behind the
//!   [`analysis::cfg::GraphBuilder`] trait; a structural lowering is shipped
//! - **Worklist engine** - A reverse-postorder forward fixpoint engine with
//!   join at merge points and per-expression value recording
//!
//! ## Quick Start
//!
//! ```rust
//! use flowscope::prelude::*;
//!
//! // Build a tiny compilation unit: class A { void m() { x = null; use(x); } }
//! let mut tree = SyntaxTree::new();
//! let class = tree.push(tree.root(), SyntaxKind::TypeDecl);
//! let method = tree.push(class, SyntaxKind::MethodDecl);
//! tree.push_text(method, SyntaxKind::Identifier, "m");
//! let body = tree.push(method, SyntaxKind::Block);
//! let assign_stmt = tree.push(body, SyntaxKind::ExpressionStatement);
//! let assign = tree.push(assign_stmt, SyntaxKind::Assign);
//! tree.push_text(assign, SyntaxKind::Identifier, "x");
//! tree.push(assign, SyntaxKind::NullLiteral);
//! let call_stmt = tree.push(body, SyntaxKind::ExpressionStatement);
//! let call = tree.push(call_stmt, SyntaxKind::Call);
//! tree.push_text(call, SyntaxKind::Identifier, "use");
//! let arg = tree.push_text(call, SyntaxKind::Identifier, "x");
//!
//! // Ask for the nullness of `x` at the call site.
//! let dataflow = DataFlow::new();
//! let ctx = CompilationContext::new();
//! let value = dataflow.value_of(&tree, arg, &ctx, NullnessPropagation)?;
//! assert_eq!(value, Some(Nullness::Null));
//! # Ok::<(), flowscope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! `flowscope` is organized into focused modules:
//!
//! - [`syntax`] - A minimal syntax tree arena with parent links, the
//!   substrate the unit locator walks
//! - [`analysis::cfg`] - Control-flow graph representation and construction
//! - [`analysis::dataflow`] - The transfer function interface, the forward
//!   fixpoint engine, the memoizing [`DataFlow`](analysis::dataflow::DataFlow)
//!   context, and a nullness demo analysis
//! - [`Error`] and [`Result`] - Error handling for propagated collaborator
//!   failures
//!
//! ## Caching Model
//!
//! The [`DataFlow`](analysis::dataflow::DataFlow) context holds at most one
//! control-flow graph at a time, keyed by the identity of the analyzable
//! unit. Building a graph for a different unit drops every cached analysis
//! result in bulk. This policy assumes the surrounding traversal finishes
//! all analyses for one unit before visiting the next; violating that
//! assumption degrades reuse but can never produce a value computed against
//! a superseded graph, because every analysis key embeds the exact graph
//! instance.
//!
//! ## Thread Safety
//!
//! A [`DataFlow`](analysis::dataflow::DataFlow) context is single-threaded by
//! design and deliberately neither [`Send`] nor [`Sync`]. Instantiate one
//! context per concurrently analyzed compilation unit.

pub mod analysis;
pub mod context;
pub mod prelude;
pub mod syntax;

mod error;

/// `flowscope` `Result` type alias
///
/// A specialized [`std::result::Result`] for flowscope operations. All
/// fallible operations in this crate return this type, with [`Error`] as the
/// error variant.
pub type Result<T> = std::result::Result<T, Error>;

/// `flowscope` Error type
///
/// The main error type for all operations in this crate. Failures raised by
/// the graph builder or the analysis engine propagate through the caching
/// layer unmodified.
pub use error::Error;
