//! Transfer function trait and per-expression value recording.
//!
//! A transfer function is the caller-supplied description of one dataflow
//! analysis: the lattice it runs over and the update rule applied as
//! execution crosses one statement. The engine owns iteration; the caching
//! layer owns memoization; the transfer function owns semantics.

use std::collections::HashMap;

use crate::{
    analysis::{cfg::ControlFlowGraph, dataflow::JoinSemiLattice},
    syntax::{NodeId, SyntaxTree},
};

/// The per-expression abstract values recorded during an analysis run.
///
/// Transfer functions record a value for every expression they evaluate;
/// after the run reaches its fixpoint, the map holds each expression's value
/// under the final abstract state. Re-recording a node overwrites the earlier
/// value, so intermediate iterations converge naturally.
#[derive(Debug, Clone)]
pub struct ValueMap<V> {
    values: HashMap<NodeId, V>,
}

impl<V> ValueMap<V> {
    /// Creates an empty value map.
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Records the abstract value of an expression node.
    ///
    /// An existing value for the same node is replaced.
    pub fn record(&mut self, node: NodeId, value: V) {
        self.values.insert(node, value);
    }

    /// Returns the recorded value of `node`, or `None` when the expression was
    /// never evaluated (e.g. it sits in unreachable code).
    #[must_use]
    pub fn value(&self, node: NodeId) -> Option<&V> {
        self.values.get(&node)
    }

    /// Returns the number of recorded expression values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no values were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<V> Default for ValueMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// One dataflow analysis: a lattice and an update rule per statement.
///
/// The trait exposes only the capabilities the engine and the caching layer
/// need; concrete analyses are free to carry whatever configuration they
/// like. Two additional obligations fall on implementors:
///
/// - **Cache identity.** Analyses passed to the caching layer must also
///   implement [`Eq`] and [`Hash`](std::hash::Hash), reflecting *only*
///   semantic configuration. Two value-equal instances are one cache key and
///   share a single fixpoint run; auxiliary state (counters, interners,
///   context handles) must be excluded from both.
/// - **Termination.** `transfer` must be monotone over a finite-height
///   lattice, otherwise the engine aborts with
///   [`Error::IterationLimit`](crate::Error::IterationLimit).
pub trait TransferFunction: 'static {
    /// The abstract value attached to each evaluated expression.
    type Value: Clone + PartialEq + std::fmt::Debug + 'static;

    /// The abstract state flowing along graph edges.
    type Store: JoinSemiLattice + 'static;

    /// Returns the abstract state at the entry of the unit.
    fn entry_store(&self, tree: &SyntaxTree, cfg: &ControlFlowGraph) -> Self::Store;

    /// Applies the update rule of one statement.
    ///
    /// `store` is the state flowing into the statement and must be updated in
    /// place to the state flowing out of it. Values of expressions evaluated
    /// along the way are recorded into `values`.
    fn transfer(
        &self,
        tree: &SyntaxTree,
        statement: NodeId,
        store: &mut Self::Store,
        values: &mut ValueMap<Self::Value>,
    );
}
