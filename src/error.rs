use thiserror::Error;

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// This enum covers the failure modes of the two external collaborators the caching layer
/// delegates to: control-flow graph construction and fixpoint analysis execution. The cache
/// itself adds no retry, fallback, or suppression logic; collaborator failures pass through
/// unmodified.
///
/// Note that "expression has no enclosing analyzable unit" is *not* an error. Queries for
/// such positions return `Ok(None)` from
/// [`DataFlow::value_of`](crate::analysis::dataflow::DataFlow::value_of), since callers
/// routinely probe positions like identifiers inside import declarations and must treat the
/// answer as "no dataflow value available".
///
/// # Examples
///
/// ```rust,no_run
/// use flowscope::{Error, Result};
///
/// fn report(result: Result<()>) {
///     match result {
///         Ok(()) => {}
///         Err(Error::GraphError(message)) => eprintln!("lowering failed: {}", message),
///         Err(Error::IterationLimit(limit)) => eprintln!("no fixpoint after {} steps", limit),
///         Err(e) => eprintln!("analysis failed: {}", e),
///     }
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// Control-flow graph construction failed.
    ///
    /// Raised by a [`GraphBuilder`](crate::analysis::cfg::GraphBuilder) when the analyzable
    /// unit cannot be lowered, for example a method declaration without a body or a syntax
    /// node of an unexpected kind in statement position.
    #[error("{0}")]
    GraphError(String),

    /// Fixpoint analysis execution failed.
    ///
    /// Raised by the analysis engine when a run cannot complete, for example when the
    /// control-flow graph references a block that does not exist.
    #[error("{0}")]
    AnalysisError(String),

    /// The fixpoint iteration limit was reached.
    ///
    /// Termination of the fixpoint computation is an obligation of the transfer function
    /// (monotone updates over a finite-height lattice). The engine enforces an upper bound
    /// on worklist iterations so a non-monotone transfer function fails loudly instead of
    /// spinning forever.
    ///
    /// The associated value is the iteration limit that was reached.
    #[error("Reached the maximum number of fixpoint iterations allowed - {0}")]
    IterationLimit(usize),
}
