//! Lattice trait for dataflow stores.
//!
//! A lattice defines how abstract state combines where control flow merges.
//! The forward engine joins the out-stores of all predecessors to form a
//! block's in-store, so store types must implement [`JoinSemiLattice`].

use std::fmt::Debug;

/// A join semi-lattice with a join (least upper bound) operation.
///
/// The join combines information from control flow paths that merge. It must
/// satisfy:
///
/// - **Idempotent**: `x.join(x) = x`
/// - **Commutative**: `x.join(y) = y.join(x)`
/// - **Associative**: `x.join(y.join(z)) = (x.join(y)).join(z)`
///
/// For the fixpoint to terminate, joins must be monotone over a finite-height
/// lattice: repeated joining along any chain must stabilize after finitely
/// many steps. That obligation lies with the store type, not with the engine.
///
/// # Examples
///
/// ```rust
/// use flowscope::analysis::dataflow::JoinSemiLattice;
///
/// #[derive(Debug, Clone, PartialEq)]
/// enum Sign {
///     Zero,
///     NonZero,
///     Unknown,
/// }
///
/// impl JoinSemiLattice for Sign {
///     fn join(&self, other: &Self) -> Self {
///         if self == other {
///             self.clone()
///         } else {
///             Self::Unknown
///         }
///     }
///
///     fn is_top(&self) -> bool {
///         matches!(self, Self::Unknown)
///     }
/// }
/// ```
pub trait JoinSemiLattice: Clone + Debug + PartialEq {
    /// Computes the join (least upper bound) of two lattice elements.
    ///
    /// The join is the least specific value that covers both inputs.
    #[must_use]
    fn join(&self, other: &Self) -> Self;

    /// Returns `true` if this is the top element.
    ///
    /// The top element represents "no information"; joining anything into it
    /// cannot change it.
    fn is_top(&self) -> bool;
}
