//! The memoizing dataflow context.
//!
//! [`DataFlow`] is the entry point every independent static check queries. It
//! composes three pieces:
//!
//! - the unit locator
//!   ([`enclosing_analyzable_unit`](crate::analysis::enclosing_analyzable_unit)),
//! - a single-slot control-flow graph cache keyed by unit identity,
//! - an analysis cache keyed by (transfer function value, graph instance).
//!
//! # Caching Policy
//!
//! Performance is tuned to two assumptions, both of which hold for the
//! traversal order of the surrounding check framework:
//!
//! - all dataflow analyses for a unit finish before the next unit is visited,
//! - multiple analyses for the same unit execute in arbitrary order.
//!
//! Keeping exactly one graph resident bounds memory across a whole-file
//! traversal; building a graph for a *different* unit therefore drops every
//! cached analysis in bulk. Violating the traversal assumption degrades
//! reuse - each unit switch rebuilds - but can never yield a value computed
//! against a superseded graph, because every analysis key embeds the exact
//! graph instance it was run over.
//!
//! Cache effectiveness is observable through [`CacheStats`] and through
//! `tracing` events (`debug` on rebuilds, `trace` on hits).

use std::{
    any::Any,
    cell::{Cell, RefCell},
    collections::HashMap,
    hash::{Hash, Hasher},
    rc::Rc,
};

use tracing::{debug, trace};

use crate::{
    analysis::{
        cfg::{ControlFlowGraph, GraphBuilder, GraphFeatures, StructuralGraphBuilder},
        dataflow::{engine::ForwardAnalysis, transfer::TransferFunction},
        enclosing_analyzable_unit, AnalyzableUnit,
    },
    context::CompilationContext,
    syntax::{NodeId, SyntaxTree},
    Result,
};

/// A completed analysis together with the graph it was run over.
///
/// Some callers need more than a single expression's value - per-block stores,
/// or values at several expressions of the same unit - so the façade returns
/// both artifacts.
pub struct DataFlowResult<T: TransferFunction> {
    analysis: Rc<ForwardAnalysis<T>>,
    graph: Rc<ControlFlowGraph>,
}

impl<T: TransferFunction> std::fmt::Debug for DataFlowResult<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataFlowResult").finish_non_exhaustive()
    }
}

impl<T: TransferFunction> DataFlowResult<T> {
    /// Returns the completed analysis run.
    #[must_use]
    pub fn analysis(&self) -> &ForwardAnalysis<T> {
        &self.analysis
    }

    /// Returns the control-flow graph the analysis was run over.
    #[must_use]
    pub fn graph(&self) -> &ControlFlowGraph {
        &self.graph
    }

    /// Splits this result into its shared parts.
    #[must_use]
    pub fn into_parts(self) -> (Rc<ForwardAnalysis<T>>, Rc<ControlFlowGraph>) {
        (self.analysis, self.graph)
    }
}

/// Counters describing cache effectiveness.
///
/// The single-slot graph policy rests on an assumed traversal order; these
/// counters are the signal to watch when that assumption is in doubt. A
/// healthy traversal shows one graph miss per unit and an analysis hit for
/// every repeated query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Queries answered from the resident control-flow graph.
    pub graph_hits: u64,
    /// Queries that had to (re)build the control-flow graph.
    pub graph_misses: u64,
    /// Queries answered from a memoized analysis run.
    pub analysis_hits: u64,
    /// Queries that had to execute a fixpoint run.
    pub analysis_misses: u64,
}

/// The memoizing dataflow query façade.
///
/// One `DataFlow` context serves one traversal of one syntax tree. It is
/// single-threaded, non-reentrant, and intentionally neither [`Send`] nor
/// [`Sync`]; hosts that analyze several compilation units concurrently must
/// instantiate one context per traversal.
///
/// # Examples
///
/// ```rust
/// use flowscope::prelude::*;
///
/// let mut tree = SyntaxTree::new();
/// let class = tree.push(tree.root(), SyntaxKind::TypeDecl);
/// let method = tree.push(class, SyntaxKind::MethodDecl);
/// tree.push_text(method, SyntaxKind::Identifier, "m");
/// let body = tree.push(method, SyntaxKind::Block);
/// let stmt = tree.push(body, SyntaxKind::ExpressionStatement);
/// let assign = tree.push(stmt, SyntaxKind::Assign);
/// tree.push_text(assign, SyntaxKind::Identifier, "x");
/// tree.push(assign, SyntaxKind::NullLiteral);
///
/// let dataflow = DataFlow::new();
/// let ctx = CompilationContext::new();
/// let value = dataflow.value_of(&tree, assign, &ctx, NullnessPropagation)?;
/// assert_eq!(value, Some(Nullness::Null));
/// # Ok::<(), flowscope::Error>(())
/// ```
pub struct DataFlow<B: GraphBuilder = StructuralGraphBuilder> {
    builder: B,
    slot: RefCell<Option<GraphSlot>>,
    analyses: RefCell<HashMap<AnalysisKey, Rc<dyn Any>>>,
    stats: Cell<CacheStats>,
}

/// The single resident graph, keyed by the unit that produced it.
struct GraphSlot {
    unit: AnalyzableUnit,
    graph: Rc<ControlFlowGraph>,
}

impl DataFlow<StructuralGraphBuilder> {
    /// Creates a dataflow context using the shipped structural lowering.
    #[must_use]
    pub fn new() -> Self {
        Self::with_builder(StructuralGraphBuilder::new())
    }
}

impl Default for DataFlow<StructuralGraphBuilder> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: GraphBuilder> DataFlow<B> {
    /// Creates a dataflow context delegating graph construction to `builder`.
    #[must_use]
    pub fn with_builder(builder: B) -> Self {
        Self {
            builder,
            slot: RefCell::new(None),
            analyses: RefCell::new(HashMap::new()),
            stats: Cell::new(CacheStats::default()),
        }
    }

    /// Returns a snapshot of the cache counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.stats.get()
    }

    /// Runs (or reuses) the `transfer` dataflow analysis over `unit`.
    ///
    /// For caching, two assumptions are made: equal units have the same
    /// control-flow graph, and value-equal transfer functions run over the
    /// same graph produce the same result. The analysis result is independent
    /// of `ctx`, which is passed through to collaborators but never compared.
    ///
    /// # Errors
    ///
    /// Propagates graph builder and analysis engine failures unmodified. In
    /// particular, passing a bodiless method unit fails with
    /// [`Error::GraphError`](crate::Error::GraphError); use
    /// [`value_of`](Self::value_of) to have such positions absorbed into
    /// `Ok(None)` instead.
    pub fn analysis_of<T>(
        &self,
        tree: &SyntaxTree,
        unit: AnalyzableUnit,
        ctx: &CompilationContext,
        transfer: T,
    ) -> Result<DataFlowResult<T>>
    where
        T: TransferFunction + Eq + Hash,
    {
        let graph = self.graph_for(tree, unit, ctx)?;
        let transfer = Rc::new(transfer);
        let key = AnalysisKey {
            transfer: Rc::clone(&transfer) as Rc<dyn TransferKey>,
            graph: Rc::clone(&graph),
        };

        if let Some(cached) = self.analyses.borrow().get(&key) {
            self.bump(|stats| stats.analysis_hits += 1);
            trace!(unit = %unit, "analysis cache hit");
            let analysis = Rc::clone(cached)
                .downcast::<ForwardAnalysis<T>>()
                .expect("analysis entry type matches its key");
            return Ok(DataFlowResult { analysis, graph });
        }

        self.bump(|stats| stats.analysis_misses += 1);
        debug!(unit = %unit, "running dataflow analysis to fixpoint");
        let mut analysis = ForwardAnalysis::from_rc(transfer);
        analysis.run(tree, &graph)?;
        let analysis = Rc::new(analysis);
        self.analyses
            .borrow_mut()
            .insert(key, Rc::clone(&analysis) as Rc<dyn Any>);
        Ok(DataFlowResult { analysis, graph })
    }

    /// Computes the abstract value of the expression at `position` under the
    /// `transfer` dataflow analysis.
    ///
    /// The expression must be part of a method, lambda, or initializer
    /// (inline field initializer or initializer block). Returns `Ok(None)`
    /// when it is not - e.g. the identifier in an import statement - and for
    /// expressions inside bodiless (abstract or interface) method
    /// declarations. Callers must treat `None` as "no dataflow value
    /// available", never as an error.
    ///
    /// Note that for initializers, each inline field initializer and each
    /// initializer block is analyzed separately; they are not merged into one
    /// virtual block.
    ///
    /// # Errors
    ///
    /// Propagates graph builder and analysis engine failures unmodified.
    ///
    /// # Panics
    ///
    /// Panics if `position` does not denote an expression node - that is a
    /// contract violation by the caller, not a recoverable condition.
    pub fn value_of<T>(
        &self,
        tree: &SyntaxTree,
        position: NodeId,
        ctx: &CompilationContext,
        transfer: T,
    ) -> Result<Option<T::Value>>
    where
        T: TransferFunction + Eq + Hash,
    {
        assert!(
            tree.is_expression(position),
            "position passed to value_of must be an expression, but node {} is a {}",
            position,
            tree.kind(position)
        );

        let Some(unit) = enclosing_analyzable_unit(tree, position) else {
            // expression is not part of a method, lambda, or initializer
            return Ok(None);
        };
        if !unit.has_body(tree) {
            // expressions can occur in abstract methods, for example the type
            // argument in `abstract Set<Entry<K, V>> entries();`
            return Ok(None);
        }

        let result = self.analysis_of(tree, unit, ctx, transfer)?;
        Ok(result.analysis().value_at(position).cloned())
    }

    /// Returns the resident graph for `unit`, building it on a slot mismatch.
    ///
    /// Building for a different unit drops every cached analysis *before* the
    /// new graph goes live, so no analysis entry can outlive the graph it was
    /// computed against.
    fn graph_for(
        &self,
        tree: &SyntaxTree,
        unit: AnalyzableUnit,
        ctx: &CompilationContext,
    ) -> Result<Rc<ControlFlowGraph>> {
        if let Some(slot) = self.slot.borrow().as_ref() {
            if slot.unit == unit {
                self.bump(|stats| stats.graph_hits += 1);
                trace!(unit = %unit, "control-flow graph cache hit");
                return Ok(Rc::clone(&slot.graph));
            }
        }

        let dropped = {
            let mut analyses = self.analyses.borrow_mut();
            let dropped = analyses.len();
            analyses.clear();
            dropped
        };
        self.bump(|stats| stats.graph_misses += 1);
        debug!(
            unit = %unit,
            dropped_analyses = dropped,
            "building control-flow graph"
        );

        let graph = Rc::new(
            self.builder
                .build(tree, unit, GraphFeatures::empty(), ctx)?,
        );
        *self.slot.borrow_mut() = Some(GraphSlot {
            unit,
            graph: Rc::clone(&graph),
        });
        Ok(graph)
    }

    fn bump(&self, update: impl FnOnce(&mut CacheStats)) {
        let mut stats = self.stats.get();
        update(&mut stats);
        self.stats.set(stats);
    }
}

/// Object-safe equality and hashing over type-erased transfer functions.
///
/// Equality holds only between values of the same concrete type that compare
/// equal under that type's `Eq`; the hash mixes in the `TypeId` so values of
/// different analyses land in different buckets.
trait TransferKey: Any {
    fn as_any(&self) -> &dyn Any;
    fn dyn_eq(&self, other: &dyn TransferKey) -> bool;
    fn dyn_hash(&self, state: &mut dyn Hasher);
}

impl<T: Any + Eq + Hash> TransferKey for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dyn_eq(&self, other: &dyn TransferKey) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }

    fn dyn_hash(&self, mut state: &mut dyn Hasher) {
        std::any::TypeId::of::<T>().hash(&mut state);
        self.hash(&mut state);
    }
}

/// Key of one memoized analysis run: the transfer function's value and the
/// exact graph instance it ran over.
///
/// The graph side compares by reference identity, never by structure: a
/// structurally identical graph built separately is a different substrate and
/// must not collide.
struct AnalysisKey {
    transfer: Rc<dyn TransferKey>,
    graph: Rc<ControlFlowGraph>,
}

impl PartialEq for AnalysisKey {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.graph, &other.graph) && self.transfer.dyn_eq(other.transfer.as_ref())
    }
}

impl Eq for AnalysisKey {}

impl Hash for AnalysisKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Rc::as_ptr(&self.graph) as *const () as usize).hash(state);
        self.transfer.dyn_hash(state);
    }
}
