//! Nullness propagation analysis.
//!
//! Tracks, for every variable, whether it definitely holds `null`, definitely
//! holds a non-null value, or may hold either, and attaches the resulting
//! [`Nullness`] to each evaluated expression. This is the kind of analysis
//! the caching layer exists to serve: several independent checks can query it
//! against the same unit and share one fixpoint run.
//!
//! The lattice is the classic three-point diamond: [`Nullness::Null`] and
//! [`Nullness::NonNull`] join to [`Nullness::Possibly`].

use std::collections::HashMap;
use std::fmt;

use crate::{
    analysis::{
        cfg::ControlFlowGraph,
        dataflow::{JoinSemiLattice, TransferFunction, ValueMap},
    },
    syntax::{NodeId, SyntaxKind, SyntaxTree},
};

/// The abstract nullness of an expression or variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nullness {
    /// Definitely `null` on every path reaching this point.
    Null,
    /// Definitely non-null on every path reaching this point.
    NonNull,
    /// May be either; also the value of anything unknown.
    Possibly,
}

impl JoinSemiLattice for Nullness {
    fn join(&self, other: &Self) -> Self {
        if self == other {
            *self
        } else {
            Self::Possibly
        }
    }

    fn is_top(&self) -> bool {
        matches!(self, Self::Possibly)
    }
}

impl fmt::Display for Nullness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Null => "null",
            Self::NonNull => "non-null",
            Self::Possibly => "possibly-null",
        };
        f.write_str(name)
    }
}

/// The per-point abstract state: nullness by variable name.
///
/// The store is normalized: variables whose nullness is
/// [`Nullness::Possibly`] are not tracked, so stores that carry the same
/// information compare equal and the fixpoint terminates quickly.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NullnessStore {
    vars: HashMap<String, Nullness>,
}

impl NullnessStore {
    /// Returns the nullness of `name`; untracked variables are
    /// [`Nullness::Possibly`].
    #[must_use]
    pub fn get(&self, name: &str) -> Nullness {
        self.vars.get(name).copied().unwrap_or(Nullness::Possibly)
    }

    /// Updates the nullness of `name`.
    pub fn set(&mut self, name: &str, value: Nullness) {
        if value == Nullness::Possibly {
            self.vars.remove(name);
        } else {
            self.vars.insert(name.to_string(), value);
        }
    }
}

impl JoinSemiLattice for NullnessStore {
    fn join(&self, other: &Self) -> Self {
        let mut joined = NullnessStore::default();
        for (name, &value) in &self.vars {
            joined.set(name, value.join(&other.get(name)));
        }
        // variables tracked only on the other side join with Possibly and
        // drop out of the normalized store
        joined
    }

    fn is_top(&self) -> bool {
        self.vars.is_empty()
    }
}

/// Forward nullness propagation.
///
/// A unit struct: the analysis carries no configuration, so every instance is
/// value-equal to every other and all queries share one cached run per graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NullnessPropagation;

impl NullnessPropagation {
    fn eval(
        tree: &SyntaxTree,
        node: NodeId,
        store: &mut NullnessStore,
        values: &mut ValueMap<Nullness>,
    ) -> Nullness {
        let value = match tree.kind(node) {
            SyntaxKind::NullLiteral => Nullness::Null,
            SyntaxKind::Literal | SyntaxKind::Lambda => Nullness::NonNull,
            SyntaxKind::Identifier => tree
                .text(node)
                .map_or(Nullness::Possibly, |name| store.get(name)),
            SyntaxKind::Assign => {
                let children = tree.children(node);
                let value = children
                    .get(1)
                    .map_or(Nullness::Possibly, |&rhs| Self::eval(tree, rhs, store, values));
                if let Some(&target) = children.first() {
                    if let Some(name) = tree.text(target) {
                        store.set(name, value);
                    }
                    values.record(target, value);
                }
                value
            }
            SyntaxKind::Call => {
                // the callee (child 0) is a name, not a value; arguments are
                for &arg in tree.children(node).iter().skip(1) {
                    Self::eval(tree, arg, store, values);
                }
                Nullness::Possibly
            }
            _ => Nullness::Possibly,
        };
        values.record(node, value);
        value
    }
}

impl TransferFunction for NullnessPropagation {
    type Value = Nullness;
    type Store = NullnessStore;

    fn entry_store(&self, _tree: &SyntaxTree, _cfg: &ControlFlowGraph) -> Self::Store {
        // parameters and fields are unknown at entry
        NullnessStore::default()
    }

    fn transfer(
        &self,
        tree: &SyntaxTree,
        statement: NodeId,
        store: &mut Self::Store,
        values: &mut ValueMap<Self::Value>,
    ) {
        match tree.kind(statement) {
            SyntaxKind::ExpressionStatement
            | SyntaxKind::Return
            | SyntaxKind::Throw
            | SyntaxKind::Assert => {
                if let Some(&expr) = tree.children(statement).first() {
                    Self::eval(tree, expr, store, values);
                }
            }
            // branch conditions and initializer expressions appear directly
            // in statement position
            _ if tree.is_expression(statement) => {
                Self::eval(tree, statement, store, values);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        analysis::{
            cfg::{GraphBuilder, GraphFeatures, StructuralGraphBuilder},
            dataflow::engine::ForwardAnalysis,
            AnalyzableUnit, UnitKind,
        },
        context::CompilationContext,
    };

    use super::*;

    #[test]
    fn test_join_is_the_three_point_diamond() {
        use Nullness::{NonNull, Null, Possibly};
        assert_eq!(Null.join(&Null), Null);
        assert_eq!(NonNull.join(&NonNull), NonNull);
        assert_eq!(Null.join(&NonNull), Possibly);
        assert_eq!(Possibly.join(&Null), Possibly);
        assert!(Possibly.is_top());
    }

    #[test]
    fn test_store_join_drops_conflicting_variables() {
        let mut left = NullnessStore::default();
        left.set("x", Nullness::Null);
        left.set("y", Nullness::NonNull);
        let mut right = NullnessStore::default();
        right.set("x", Nullness::Null);
        right.set("y", Nullness::Null);

        let joined = left.join(&right);
        assert_eq!(joined.get("x"), Nullness::Null);
        assert_eq!(joined.get("y"), Nullness::Possibly);
    }

    #[test]
    fn test_store_is_normalized() {
        let mut store = NullnessStore::default();
        store.set("x", Nullness::Null);
        store.set("x", Nullness::Possibly);
        assert_eq!(store, NullnessStore::default());
        assert!(store.is_top());
    }

    fn run_method(
        build: impl FnOnce(&mut SyntaxTree, NodeId) -> NodeId,
    ) -> (ForwardAnalysis<NullnessPropagation>, NodeId) {
        let mut tree = SyntaxTree::new();
        let class = tree.push(tree.root(), SyntaxKind::TypeDecl);
        let method = tree.push(class, SyntaxKind::MethodDecl);
        tree.push_text(method, SyntaxKind::Identifier, "m");
        let body = tree.push(method, SyntaxKind::Block);
        let probe = build(&mut tree, body);

        let cfg = StructuralGraphBuilder::new()
            .build(
                &tree,
                AnalyzableUnit::new(method, UnitKind::Method),
                GraphFeatures::empty(),
                &CompilationContext::new(),
            )
            .expect("lowering failed");
        let mut analysis = ForwardAnalysis::new(NullnessPropagation);
        analysis.run(&tree, &cfg).expect("analysis failed");
        (analysis, probe)
    }

    /// `{ x = null; use(x); }` - the argument is definitely null.
    #[test]
    fn test_assigned_null_reaches_use() {
        let (analysis, arg) = run_method(|tree, body| {
            let assign_stmt = tree.push(body, SyntaxKind::ExpressionStatement);
            let assign = tree.push(assign_stmt, SyntaxKind::Assign);
            tree.push_text(assign, SyntaxKind::Identifier, "x");
            tree.push(assign, SyntaxKind::NullLiteral);

            let call_stmt = tree.push(body, SyntaxKind::ExpressionStatement);
            let call = tree.push(call_stmt, SyntaxKind::Call);
            tree.push_text(call, SyntaxKind::Identifier, "use");
            tree.push_text(call, SyntaxKind::Identifier, "x")
        });

        assert_eq!(analysis.value_at(arg), Some(&Nullness::Null));
    }

    /// `{ if (c) { x = null; } else { x = 1; } use(x); }` - possibly null.
    #[test]
    fn test_conflicting_branches_join_to_possibly() {
        let (analysis, arg) = run_method(|tree, body| {
            let if_stmt = tree.push(body, SyntaxKind::If);
            tree.push_text(if_stmt, SyntaxKind::Identifier, "c");

            let then_block = tree.push(if_stmt, SyntaxKind::Block);
            let then_stmt = tree.push(then_block, SyntaxKind::ExpressionStatement);
            let then_assign = tree.push(then_stmt, SyntaxKind::Assign);
            tree.push_text(then_assign, SyntaxKind::Identifier, "x");
            tree.push(then_assign, SyntaxKind::NullLiteral);

            let else_block = tree.push(if_stmt, SyntaxKind::Block);
            let else_stmt = tree.push(else_block, SyntaxKind::ExpressionStatement);
            let else_assign = tree.push(else_stmt, SyntaxKind::Assign);
            tree.push_text(else_assign, SyntaxKind::Identifier, "x");
            tree.push_text(else_assign, SyntaxKind::Literal, "1");

            let call_stmt = tree.push(body, SyntaxKind::ExpressionStatement);
            let call = tree.push(call_stmt, SyntaxKind::Call);
            tree.push_text(call, SyntaxKind::Identifier, "use");
            tree.push_text(call, SyntaxKind::Identifier, "x")
        });

        assert_eq!(analysis.value_at(arg), Some(&Nullness::Possibly));
    }

    /// `{ x = 1; if (c) { x = null; } use(x); }` - agreement only without the branch.
    #[test]
    fn test_branch_without_else_keeps_fallthrough_state() {
        let (analysis, arg) = run_method(|tree, body| {
            let init_stmt = tree.push(body, SyntaxKind::ExpressionStatement);
            let init = tree.push(init_stmt, SyntaxKind::Assign);
            tree.push_text(init, SyntaxKind::Identifier, "x");
            tree.push_text(init, SyntaxKind::Literal, "1");

            let if_stmt = tree.push(body, SyntaxKind::If);
            tree.push_text(if_stmt, SyntaxKind::Identifier, "c");
            let then_block = tree.push(if_stmt, SyntaxKind::Block);
            let then_stmt = tree.push(then_block, SyntaxKind::ExpressionStatement);
            let then_assign = tree.push(then_stmt, SyntaxKind::Assign);
            tree.push_text(then_assign, SyntaxKind::Identifier, "x");
            tree.push(then_assign, SyntaxKind::NullLiteral);

            let call_stmt = tree.push(body, SyntaxKind::ExpressionStatement);
            let call = tree.push(call_stmt, SyntaxKind::Call);
            tree.push_text(call, SyntaxKind::Identifier, "use");
            tree.push_text(call, SyntaxKind::Identifier, "x")
        });

        assert_eq!(analysis.value_at(arg), Some(&Nullness::Possibly));
    }

    /// Call results are unknown: `{ x = f(); use(x); }`.
    #[test]
    fn test_call_result_is_possibly_null() {
        let (analysis, arg) = run_method(|tree, body| {
            let assign_stmt = tree.push(body, SyntaxKind::ExpressionStatement);
            let assign = tree.push(assign_stmt, SyntaxKind::Assign);
            tree.push_text(assign, SyntaxKind::Identifier, "x");
            let call = tree.push(assign, SyntaxKind::Call);
            tree.push_text(call, SyntaxKind::Identifier, "f");

            let use_stmt = tree.push(body, SyntaxKind::ExpressionStatement);
            let use_call = tree.push(use_stmt, SyntaxKind::Call);
            tree.push_text(use_call, SyntaxKind::Identifier, "use");
            tree.push_text(use_call, SyntaxKind::Identifier, "x")
        });

        assert_eq!(analysis.value_at(arg), Some(&Nullness::Possibly));
    }
}
