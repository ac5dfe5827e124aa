//! Worklist-based forward fixpoint engine.
//!
//! This module provides the iterative engine that runs a
//! [`TransferFunction`] over a [`ControlFlowGraph`] to a fixpoint. Blocks are
//! seeded in reverse postorder; a block's in-store is the join of its
//! predecessors' out-stores; the transfer function is applied statement by
//! statement; blocks whose out-store changed re-enqueue their successors.
//!
//! The engine records a per-expression [`ValueMap`] as a side product of
//! transfer application. Once the fixpoint is reached, every recorded value
//! reflects the final abstract state, because any block whose input changed
//! is reprocessed and overwrites its earlier recordings.

use std::{collections::VecDeque, rc::Rc};

use crate::{
    analysis::{
        cfg::{BlockId, ControlFlowGraph},
        dataflow::{JoinSemiLattice, TransferFunction, ValueMap},
    },
    syntax::{NodeId, SyntaxTree},
    Error, Result,
};

/// Worklist iterations granted per block before the engine gives up.
///
/// Generous for any finite-height lattice; only a non-monotone transfer
/// function can exhaust it.
const ITERATIONS_PER_BLOCK: usize = 512;

/// Lower bound on the iteration budget, so tiny graphs are not starved.
const MIN_ITERATIONS: usize = 4096;

/// A forward dataflow analysis run.
///
/// Couples one transfer function with the mutable state of a fixpoint
/// computation: per-block in/out stores and the per-expression values
/// recorded along the way. The caching layer creates one instance per
/// (transfer function, graph) pair, runs it to completion once, and then
/// shares the completed run.
///
/// # Examples
///
/// ```rust,ignore
/// let mut analysis = ForwardAnalysis::new(NullnessPropagation);
/// analysis.run(&tree, &cfg)?;
/// let value = analysis.value_at(expr);
/// ```
pub struct ForwardAnalysis<T: TransferFunction> {
    /// The analysis being run.
    transfer: Rc<T>,
    /// In-store for each block; `None` until the block is first reached.
    in_states: Vec<Option<T::Store>>,
    /// Out-store for each block; `None` until the block is first processed.
    out_states: Vec<Option<T::Store>>,
    /// Abstract values of evaluated expressions.
    values: ValueMap<T::Value>,
    /// Number of worklist iterations performed.
    iterations: usize,
}

impl<T: TransferFunction> ForwardAnalysis<T> {
    /// Creates a new, not-yet-run analysis for the given transfer function.
    #[must_use]
    pub fn new(transfer: T) -> Self {
        Self::from_rc(Rc::new(transfer))
    }

    /// Creates a new analysis sharing an already-counted transfer function.
    ///
    /// The caching layer uses this to keep the cache key and the analysis
    /// pointing at the same transfer function instance.
    #[must_use]
    pub fn from_rc(transfer: Rc<T>) -> Self {
        Self {
            transfer,
            in_states: Vec::new(),
            out_states: Vec::new(),
            values: ValueMap::new(),
            iterations: 0,
        }
    }

    /// Returns the transfer function this analysis runs.
    #[must_use]
    pub fn transfer_function(&self) -> &T {
        &self.transfer
    }

    /// Returns the number of worklist iterations performed so far.
    #[must_use]
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Runs the analysis over `cfg` to a fixpoint.
    ///
    /// Any state from an earlier run is discarded first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IterationLimit`] when the iteration budget is
    /// exhausted, which indicates a non-monotone transfer function or an
    /// infinite-height store lattice.
    pub fn run(&mut self, tree: &SyntaxTree, cfg: &ControlFlowGraph) -> Result<()> {
        let num_blocks = cfg.block_count();
        self.in_states = vec![None; num_blocks];
        self.out_states = vec![None; num_blocks];
        self.values = ValueMap::new();
        self.iterations = 0;

        self.in_states[cfg.entry().index()] = Some(self.transfer.entry_store(tree, cfg));

        let limit = num_blocks
            .saturating_mul(ITERATIONS_PER_BLOCK)
            .max(MIN_ITERATIONS);

        let mut worklist: VecDeque<usize> = VecDeque::with_capacity(num_blocks);
        let mut in_worklist = vec![false; num_blocks];
        for block in cfg.reverse_postorder() {
            worklist.push_back(block.index());
            in_worklist[block.index()] = true;
        }

        while let Some(block_idx) = worklist.pop_front() {
            in_worklist[block_idx] = false;
            self.iterations += 1;
            if self.iterations > limit {
                return Err(Error::IterationLimit(limit));
            }

            if self.process(block_idx, tree, cfg)? {
                for succ in cfg.successors(BlockId::new(block_idx)) {
                    let idx = succ.index();
                    if !in_worklist[idx] {
                        worklist.push_back(idx);
                        in_worklist[idx] = true;
                    }
                }
            }
        }
        Ok(())
    }

    /// Processes one block.
    ///
    /// Returns `true` if the block's out-store changed.
    fn process(&mut self, block_idx: usize, tree: &SyntaxTree, cfg: &ControlFlowGraph) -> Result<bool> {
        let block_id = BlockId::new(block_idx);

        // The entry block keeps its boundary store; everything else joins the
        // out-stores of the predecessors reached so far.
        let input = if block_id == cfg.entry() {
            self.in_states[block_idx].clone()
        } else {
            let mut joined: Option<T::Store> = None;
            for pred in cfg.predecessors(block_id) {
                if let Some(out) = &self.out_states[pred.index()] {
                    joined = Some(match joined {
                        None => out.clone(),
                        Some(acc) => acc.join(out),
                    });
                }
            }
            joined
        };
        let Some(input) = input else {
            // no predecessor has produced a store yet
            return Ok(false);
        };
        self.in_states[block_idx] = Some(input.clone());

        let block = cfg.block(block_id).ok_or_else(|| {
            Error::AnalysisError(format!("graph references missing block {}", block_id))
        })?;
        let mut store = input;
        for &statement in &block.statements {
            self.transfer
                .transfer(tree, statement, &mut store, &mut self.values);
        }

        let output = Some(store);
        let changed = output != self.out_states[block_idx];
        self.out_states[block_idx] = output;
        Ok(changed)
    }

    /// Returns the abstract value of the expression at `node`, or `None` when
    /// the expression was never evaluated (unreachable code, or a node the
    /// transfer function does not attach values to).
    #[must_use]
    pub fn value_at(&self, node: NodeId) -> Option<&T::Value> {
        self.values.value(node)
    }

    /// Returns all recorded per-expression values.
    #[must_use]
    pub fn values(&self) -> &ValueMap<T::Value> {
        &self.values
    }

    /// Returns the in-store of `block`, or `None` when the block was never
    /// reached.
    #[must_use]
    pub fn in_state(&self, block: BlockId) -> Option<&T::Store> {
        self.in_states.get(block.index())?.as_ref()
    }

    /// Returns the out-store of `block`, or `None` when the block was never
    /// processed.
    #[must_use]
    pub fn out_state(&self, block: BlockId) -> Option<&T::Store> {
        self.out_states.get(block.index())?.as_ref()
    }
}
