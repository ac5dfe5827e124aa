//! Control flow graph construction.
//!
//! Graph construction is behind the [`GraphBuilder`] trait so the caching
//! layer stays agnostic to how syntax is lowered. The shipped
//! [`StructuralGraphBuilder`] lowers the statement forms of
//! [`SyntaxKind`](crate::syntax::SyntaxKind) directly: straight-line
//! sequences, `if`/`else` diamonds, `while` loops with back edges, and early
//! exits.

use bitflags::bitflags;

use crate::{
    analysis::{
        cfg::{BlockId, ControlFlowGraph},
        AnalyzableUnit, UnitKind,
    },
    context::CompilationContext,
    syntax::{NodeId, SyntaxKind, SyntaxTree},
};

bitflags! {
    /// Optional features a [`GraphBuilder`] may model.
    ///
    /// The caching layer always requests [`GraphFeatures::empty`]: exceptional
    /// edges and assertion nodes enlarge graphs considerably, and the checks
    /// this layer serves do not consult them. Callers driving a builder
    /// directly may opt in.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct GraphFeatures: u8 {
        /// Model exceptional control flow: `throw` statements get an edge to
        /// the exit block.
        const EXCEPTIONAL_EDGES = 0b0000_0001;
        /// Model `assert` statements as graph nodes instead of skipping them.
        const ASSERTIONS = 0b0000_0010;
    }
}

/// Lowers the body of an analyzable unit to a [`ControlFlowGraph`].
///
/// Implementations must be deterministic: building the same unit from the same
/// tree twice yields structurally identical graphs. They need *not* be
/// interchangeable instances - the caching layer keys analysis results by
/// graph instance precisely so that separately built graphs never alias.
pub trait GraphBuilder {
    /// Builds the control-flow graph of `unit`.
    ///
    /// # Arguments
    ///
    /// * `tree` - The syntax tree containing the unit
    /// * `unit` - The unit to lower
    /// * `features` - Optional graph features to model
    /// * `ctx` - Auxiliary compilation state; not part of any cache key
    ///
    /// # Errors
    ///
    /// Returns [`Error::GraphError`](crate::Error::GraphError) when the unit
    /// cannot be lowered, e.g. a method declaration without a body.
    fn build(
        &self,
        tree: &SyntaxTree,
        unit: AnalyzableUnit,
        features: GraphFeatures,
        ctx: &CompilationContext,
    ) -> crate::Result<ControlFlowGraph>;
}

/// The shipped structural lowering.
///
/// Produces one basic block per maximal straight-line region:
///
/// - statements append to the current block,
/// - `if` introduces a diamond (condition as the last statement of the
///   current block, one block per arm, a merge block for live continuations),
/// - `while` introduces a loop header with a back edge from the body,
/// - `return` ends the current path at the exit block,
/// - `throw` ends the current path, with an edge to the exit block only when
///   [`GraphFeatures::EXCEPTIONAL_EDGES`] is set,
/// - `assert` is modeled only when [`GraphFeatures::ASSERTIONS`] is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralGraphBuilder;

impl StructuralGraphBuilder {
    /// Creates a new structural graph builder.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl GraphBuilder for StructuralGraphBuilder {
    fn build(
        &self,
        tree: &SyntaxTree,
        unit: AnalyzableUnit,
        features: GraphFeatures,
        ctx: &CompilationContext,
    ) -> crate::Result<ControlFlowGraph> {
        let mut cfg = ControlFlowGraph::new(unit);
        let lowering = Lowering { tree, features };

        let entry = cfg.entry();
        let exit = cfg.exit();
        let tail = match unit.kind {
            UnitKind::Method => {
                let body = tree.method_body(unit.node).ok_or_else(|| {
                    crate::Error::GraphError(format!(
                        "cannot build a control-flow graph for bodiless {}{}",
                        unit,
                        in_source(ctx)
                    ))
                })?;
                lowering.lower_block(&mut cfg, entry, body)?
            }
            UnitKind::Lambda => {
                let body = tree.lambda_body(unit.node).ok_or_else(|| {
                    crate::Error::GraphError(format!(
                        "{} has no body{}",
                        unit,
                        in_source(ctx)
                    ))
                })?;
                if tree.kind(body) == SyntaxKind::Block {
                    lowering.lower_block(&mut cfg, entry, body)?
                } else {
                    // expression-bodied lambda
                    cfg.push_statement(entry, body);
                    Some(entry)
                }
            }
            UnitKind::FieldInitializer => {
                let init = tree.field_initializer(unit.node).ok_or_else(|| {
                    crate::Error::GraphError(format!(
                        "{} has no initializer expression{}",
                        unit,
                        in_source(ctx)
                    ))
                })?;
                cfg.push_statement(entry, init);
                Some(entry)
            }
            UnitKind::InitializerBlock => lowering.lower_block(&mut cfg, entry, unit.node)?,
        };

        if let Some(tail) = tail {
            cfg.add_edge(tail, exit);
        }
        Ok(cfg)
    }
}

fn in_source(ctx: &CompilationContext) -> String {
    match ctx.source_name() {
        Some(name) => format!(" in {}", name),
        None => String::new(),
    }
}

struct Lowering<'a> {
    tree: &'a SyntaxTree,
    features: GraphFeatures,
}

impl Lowering<'_> {
    /// Lowers the statements of `block_node` starting in `current`.
    ///
    /// Returns the block the next statement would go into, or `None` when
    /// every path through the lowered statements has terminated.
    fn lower_block(
        &self,
        cfg: &mut ControlFlowGraph,
        current: BlockId,
        block_node: NodeId,
    ) -> crate::Result<Option<BlockId>> {
        let mut current = Some(current);
        for &stmt in self.tree.children(block_node) {
            let Some(live) = current else {
                // statements after a return/throw are unreachable; drop them
                break;
            };
            current = self.lower_statement(cfg, live, stmt)?;
        }
        Ok(current)
    }

    fn lower_statement(
        &self,
        cfg: &mut ControlFlowGraph,
        current: BlockId,
        stmt: NodeId,
    ) -> crate::Result<Option<BlockId>> {
        match self.tree.kind(stmt) {
            SyntaxKind::Block => self.lower_block(cfg, current, stmt),
            SyntaxKind::If => self.lower_if(cfg, current, stmt),
            SyntaxKind::While => self.lower_while(cfg, current, stmt),
            SyntaxKind::Return => {
                cfg.push_statement(current, stmt);
                let exit = cfg.exit();
                cfg.add_edge(current, exit);
                Ok(None)
            }
            SyntaxKind::Throw => {
                cfg.push_statement(current, stmt);
                if self.features.contains(GraphFeatures::EXCEPTIONAL_EDGES) {
                    let exit = cfg.exit();
                    cfg.add_edge(current, exit);
                }
                Ok(None)
            }
            SyntaxKind::Assert => {
                if self.features.contains(GraphFeatures::ASSERTIONS) {
                    cfg.push_statement(current, stmt);
                }
                Ok(Some(current))
            }
            _ => {
                cfg.push_statement(current, stmt);
                Ok(Some(current))
            }
        }
    }

    fn lower_if(
        &self,
        cfg: &mut ControlFlowGraph,
        current: BlockId,
        stmt: NodeId,
    ) -> crate::Result<Option<BlockId>> {
        let children = self.tree.children(stmt);
        let (&cond, rest) = children.split_first().ok_or_else(|| {
            crate::Error::GraphError(format!("malformed `if` at node {}", stmt))
        })?;
        let (&then_node, rest) = rest.split_first().ok_or_else(|| {
            crate::Error::GraphError(format!("`if` at node {} has no then branch", stmt))
        })?;

        cfg.push_statement(current, cond);

        let then_block = cfg.add_block();
        cfg.add_edge(current, then_block);
        let then_end = self.lower_block(cfg, then_block, then_node)?;

        let else_end = match rest.first() {
            Some(&else_node) => {
                let else_block = cfg.add_block();
                cfg.add_edge(current, else_block);
                self.lower_block(cfg, else_block, else_node)?
            }
            // no else: control may fall through the condition
            None => Some(current),
        };

        let live: Vec<BlockId> = [then_end, else_end].into_iter().flatten().collect();
        if live.is_empty() {
            return Ok(None);
        }
        let merge = cfg.add_block();
        for block in live {
            cfg.add_edge(block, merge);
        }
        Ok(Some(merge))
    }

    fn lower_while(
        &self,
        cfg: &mut ControlFlowGraph,
        current: BlockId,
        stmt: NodeId,
    ) -> crate::Result<Option<BlockId>> {
        let children = self.tree.children(stmt);
        let (&cond, rest) = children.split_first().ok_or_else(|| {
            crate::Error::GraphError(format!("malformed `while` at node {}", stmt))
        })?;
        let &body_node = rest.first().ok_or_else(|| {
            crate::Error::GraphError(format!("`while` at node {} has no body", stmt))
        })?;

        let header = cfg.add_block();
        cfg.add_edge(current, header);
        cfg.push_statement(header, cond);

        let body_block = cfg.add_block();
        cfg.add_edge(header, body_block);
        if let Some(body_end) = self.lower_block(cfg, body_block, body_node)? {
            cfg.add_edge(body_end, header);
        }

        let after = cfg.add_block();
        cfg.add_edge(header, after);
        Ok(Some(after))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds `class A { void m() { <build>(body) } }` and lowers the method.
    fn lower(build: impl FnOnce(&mut SyntaxTree, NodeId), features: GraphFeatures) -> ControlFlowGraph {
        let mut tree = SyntaxTree::new();
        let class = tree.push(tree.root(), SyntaxKind::TypeDecl);
        let method = tree.push(class, SyntaxKind::MethodDecl);
        tree.push_text(method, SyntaxKind::Identifier, "m");
        let body = tree.push(method, SyntaxKind::Block);
        build(&mut tree, body);

        let unit = AnalyzableUnit::new(method, UnitKind::Method);
        StructuralGraphBuilder::new()
            .build(&tree, unit, features, &CompilationContext::new())
            .expect("lowering failed")
    }

    fn statement(tree: &mut SyntaxTree, parent: NodeId, name: &str) {
        let stmt = tree.push(parent, SyntaxKind::ExpressionStatement);
        tree.push_text(stmt, SyntaxKind::Identifier, name);
    }

    #[test]
    fn test_sequential_statements_stay_in_entry_block() {
        let cfg = lower(
            |tree, body| {
                statement(tree, body, "a");
                statement(tree, body, "b");
                statement(tree, body, "c");
            },
            GraphFeatures::empty(),
        );

        // entry + exit
        assert_eq!(cfg.block_count(), 2);
        assert_eq!(cfg.block(cfg.entry()).unwrap().statements.len(), 3);
        let exit = cfg.exit();
        assert_eq!(cfg.successors(cfg.entry()).collect::<Vec<_>>(), vec![exit]);
    }

    #[test]
    fn test_if_else_forms_a_diamond() {
        let cfg = lower(
            |tree, body| {
                let if_stmt = tree.push(body, SyntaxKind::If);
                tree.push_text(if_stmt, SyntaxKind::Identifier, "cond");
                let then_block = tree.push(if_stmt, SyntaxKind::Block);
                statement(tree, then_block, "t");
                let else_block = tree.push(if_stmt, SyntaxKind::Block);
                statement(tree, else_block, "e");
            },
            GraphFeatures::empty(),
        );

        // entry, exit, then, else, merge
        assert_eq!(cfg.block_count(), 5);
        assert_eq!(cfg.successors(cfg.entry()).count(), 2);
        // merge block has two predecessors and flows to exit
        let merge = cfg
            .block_ids()
            .find(|&id| cfg.predecessors(id).count() == 2 && id != cfg.exit())
            .unwrap();
        assert_eq!(cfg.successors(merge).collect::<Vec<_>>(), vec![cfg.exit()]);
    }

    #[test]
    fn test_if_without_else_falls_through() {
        let cfg = lower(
            |tree, body| {
                let if_stmt = tree.push(body, SyntaxKind::If);
                tree.push_text(if_stmt, SyntaxKind::Identifier, "cond");
                let then_block = tree.push(if_stmt, SyntaxKind::Block);
                statement(tree, then_block, "t");
            },
            GraphFeatures::empty(),
        );

        // entry, exit, then, merge
        assert_eq!(cfg.block_count(), 4);
        // the entry branches to both the then block and the merge block
        assert_eq!(cfg.successors(cfg.entry()).count(), 2);
    }

    #[test]
    fn test_while_has_back_edge() {
        let cfg = lower(
            |tree, body| {
                let while_stmt = tree.push(body, SyntaxKind::While);
                tree.push_text(while_stmt, SyntaxKind::Identifier, "cond");
                let loop_body = tree.push(while_stmt, SyntaxKind::Block);
                statement(tree, loop_body, "b");
            },
            GraphFeatures::empty(),
        );

        // entry, header, body, after, exit
        assert_eq!(cfg.block_count(), 5);
        // the header is the block with two successors (body and after)
        let header = cfg
            .block_ids()
            .find(|&id| cfg.successors(id).count() == 2)
            .unwrap();
        // and it has two predecessors: the entry and the back edge
        assert_eq!(cfg.predecessors(header).count(), 2);
    }

    #[test]
    fn test_return_ends_the_path() {
        let cfg = lower(
            |tree, body| {
                let ret = tree.push(body, SyntaxKind::Return);
                tree.push_text(ret, SyntaxKind::Identifier, "x");
                // unreachable trailing statement
                statement(tree, body, "dead");
            },
            GraphFeatures::empty(),
        );

        assert_eq!(cfg.block_count(), 2);
        let entry = cfg.block(cfg.entry()).unwrap();
        // only the return was lowered
        assert_eq!(entry.statements.len(), 1);
    }

    #[test]
    fn test_early_return_in_branch() {
        let cfg = lower(
            |tree, body| {
                let if_stmt = tree.push(body, SyntaxKind::If);
                tree.push_text(if_stmt, SyntaxKind::Identifier, "cond");
                let then_block = tree.push(if_stmt, SyntaxKind::Block);
                let ret = tree.push(then_block, SyntaxKind::Return);
                tree.push_text(ret, SyntaxKind::Identifier, "x");
                statement(tree, body, "after");
            },
            GraphFeatures::empty(),
        );

        // entry, then, merge (fallthrough only), exit
        assert_eq!(cfg.block_count(), 4);
        // the exit has two predecessors: the returning branch and the fallthrough tail
        assert_eq!(cfg.predecessors(cfg.exit()).count(), 2);
    }

    #[test]
    fn test_throw_edges_depend_on_features() {
        let plain = lower(
            |tree, body| {
                let throw = tree.push(body, SyntaxKind::Throw);
                tree.push_text(throw, SyntaxKind::Identifier, "e");
            },
            GraphFeatures::empty(),
        );
        assert_eq!(plain.predecessors(plain.exit()).count(), 0);

        let exceptional = lower(
            |tree, body| {
                let throw = tree.push(body, SyntaxKind::Throw);
                tree.push_text(throw, SyntaxKind::Identifier, "e");
            },
            GraphFeatures::EXCEPTIONAL_EDGES,
        );
        assert_eq!(exceptional.predecessors(exceptional.exit()).count(), 1);
    }

    #[test]
    fn test_assert_is_skipped_unless_modeled() {
        let skipped = lower(
            |tree, body| {
                let assert_stmt = tree.push(body, SyntaxKind::Assert);
                tree.push_text(assert_stmt, SyntaxKind::Identifier, "inv");
            },
            GraphFeatures::empty(),
        );
        assert!(skipped.block(skipped.entry()).unwrap().statements.is_empty());

        let modeled = lower(
            |tree, body| {
                let assert_stmt = tree.push(body, SyntaxKind::Assert);
                tree.push_text(assert_stmt, SyntaxKind::Identifier, "inv");
            },
            GraphFeatures::ASSERTIONS,
        );
        assert_eq!(modeled.block(modeled.entry()).unwrap().statements.len(), 1);
    }

    #[test]
    fn test_bodiless_method_is_rejected() {
        let mut tree = SyntaxTree::new();
        let class = tree.push(tree.root(), SyntaxKind::TypeDecl);
        let method = tree.push(class, SyntaxKind::MethodDecl);
        tree.push_text(method, SyntaxKind::Identifier, "entries");

        let unit = AnalyzableUnit::new(method, UnitKind::Method);
        let result = StructuralGraphBuilder::new().build(
            &tree,
            unit,
            GraphFeatures::empty(),
            &CompilationContext::with_source_name("A.java"),
        );
        let err = result.unwrap_err();
        assert!(err.to_string().contains("bodiless"));
        assert!(err.to_string().contains("A.java"));
    }

    #[test]
    fn test_field_initializer_unit() {
        let mut tree = SyntaxTree::new();
        let class = tree.push(tree.root(), SyntaxKind::TypeDecl);
        let field = tree.push(class, SyntaxKind::FieldDecl);
        tree.push_text(field, SyntaxKind::Identifier, "f");
        let init = tree.push(field, SyntaxKind::NullLiteral);

        let unit = AnalyzableUnit::new(field, UnitKind::FieldInitializer);
        let cfg = StructuralGraphBuilder::new()
            .build(&tree, unit, GraphFeatures::empty(), &CompilationContext::new())
            .unwrap();

        assert_eq!(cfg.block_count(), 2);
        assert_eq!(cfg.block(cfg.entry()).unwrap().statements, vec![init]);
    }
}
