//! Graph construction: a single traversal of one function's syntax tree.
//!
//! Each construct is wired against a [`Fragment`], the open end of the
//! region built so far. Straight-line statements attach a node and move the
//! frontier; branching constructs fork child fragments seeded with the
//! frontier and fold them back in. `break` and `continue` leave a
//! [`FlowGraphNode::Jump`] placeholder behind and empty the frontier; the
//! enclosing loop resolves them once its own wiring is done.

use petgraph::stable_graph::NodeIndex;
use syn::spanned::Spanned;

use flowviz_error::error::FlowError;

use crate::display;
use crate::flow_graph::{ControlFlowGraph, EdgeCondition, FlowGraphNode, Fragment};

/// Unresolved jump placeholders of one enclosing loop.
#[derive(Debug, Default)]
struct LoopFrame {
    breaks: Vec<NodeIndex>,
    continues: Vec<NodeIndex>,
}

/// Builds the [`ControlFlowGraph`] of a single function.
///
/// All build state lives here: the arena being filled, the order counter
/// and the stack of enclosing loops. A builder is consumed by
/// [`GraphBuilder::build`], so two builds can never observe each other.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: ControlFlowGraph,
    order: u32,
    loops: Vec<LoopFrame>,
}

impl ControlFlowGraph {
    /// Build the flow graph of the single function contained in `file`.
    ///
    /// The returned graph still holds jump placeholders; callers run
    /// [`ControlFlowGraph::eliminate_jumps`] before handing the graph to a
    /// renderer.
    pub fn from_file(file: &syn::File) -> Result<Self, FlowError> {
        GraphBuilder::default().build(file)
    }
}

impl GraphBuilder {
    pub fn build(mut self, file: &syn::File) -> Result<ControlFlowGraph, FlowError> {
        let function = single_function(file)?;

        let entry = self.add_entry(display::fn_signature(function));
        self.graph.entry_points.push(entry);

        let mut fragment = Fragment::seeded(vec![entry]);
        self.connect_block(&function.block, &mut fragment)?;

        self.graph.exit_points = fragment.active_frontier(&self.graph);
        tracing::debug!(
            nodes = self.graph.node_count(),
            edges = self.graph.edge_count(),
            "flow graph constructed"
        );
        Ok(self.graph)
    }

    /// Run the statements of `block` against a child fragment seeded with
    /// the caller's frontier and pending condition, then carry the child's
    /// frontier back out.
    fn connect_block(&mut self, block: &syn::Block, fragment: &mut Fragment) -> Result<(), FlowError> {
        let seed = fragment.active_frontier(&self.graph);
        let mut inner = match fragment.pending() {
            Some(condition) => Fragment::seeded_with(seed, condition),
            None => Fragment::seeded(seed),
        };
        for stmt in &block.stmts {
            self.connect_stmt(stmt, &mut inner)?;
        }
        fragment.sequence(&self.graph, inner);
        Ok(())
    }

    fn connect_stmt(&mut self, stmt: &syn::Stmt, fragment: &mut Fragment) -> Result<(), FlowError> {
        match stmt {
            syn::Stmt::Local(local) => {
                if local.init.as_ref().is_some_and(|init| init.diverge.is_some()) {
                    return Err(FlowError::UnsupportedStatement {
                        kind: "`let ... else` statement".to_string(),
                        line: local.span().start().line,
                    });
                }
                let node = self.add_action(display::local(local));
                fragment.attach(&mut self.graph, node);
                Ok(())
            }
            syn::Stmt::Expr(expr, _) => self.connect_expr(expr, fragment),
            syn::Stmt::Macro(stmt_macro) => {
                let node = self.add_action(display::tokens(&stmt_macro.mac));
                fragment.attach(&mut self.graph, node);
                Ok(())
            }
            syn::Stmt::Item(item) => Err(FlowError::UnsupportedStatement {
                kind: format!("nested {}", item_kind(item)),
                line: stmt.span().start().line,
            }),
        }
    }

    fn connect_expr(&mut self, expr: &syn::Expr, fragment: &mut Fragment) -> Result<(), FlowError> {
        match expr {
            syn::Expr::If(expr_if) => self.connect_if(expr_if, fragment),
            syn::Expr::While(expr_while) => self.connect_while(expr_while, fragment),
            syn::Expr::ForLoop(expr_for) => self.connect_for_loop(expr_for, fragment),
            syn::Expr::Block(expr_block) if expr_block.label.is_none() => {
                self.connect_block(&expr_block.block, fragment)
            }
            syn::Expr::Return(expr_return) => {
                self.connect_return(expr_return, fragment);
                Ok(())
            }
            syn::Expr::Break(expr_break) => self.connect_break(expr_break, fragment),
            syn::Expr::Continue(expr_continue) => self.connect_continue(expr_continue, fragment),
            // value-shaped expressions become plain actions
            syn::Expr::Array(_)
            | syn::Expr::Assign(_)
            | syn::Expr::Binary(_)
            | syn::Expr::Call(_)
            | syn::Expr::Cast(_)
            | syn::Expr::Field(_)
            | syn::Expr::Group(_)
            | syn::Expr::Index(_)
            | syn::Expr::Lit(_)
            | syn::Expr::Macro(_)
            | syn::Expr::MethodCall(_)
            | syn::Expr::Paren(_)
            | syn::Expr::Path(_)
            | syn::Expr::Range(_)
            | syn::Expr::Reference(_)
            | syn::Expr::Repeat(_)
            | syn::Expr::Struct(_)
            | syn::Expr::Tuple(_)
            | syn::Expr::Unary(_) => {
                let node = self.add_action(display::expr(expr));
                fragment.attach(&mut self.graph, node);
                Ok(())
            }
            other => Err(FlowError::UnsupportedExpression {
                kind: expr_kind(other).to_string(),
                line: other.span().start().line,
            }),
        }
    }

    /// `if` forks the frontier at a condition node. The then arm continues
    /// under `True`, the else arm under `False`; an absent else arm leaves
    /// the condition itself on the frontier, so the false path falls
    /// through to whatever is wired next.
    fn connect_if(&mut self, expr_if: &syn::ExprIf, fragment: &mut Fragment) -> Result<(), FlowError> {
        let condition = self.add_condition(display::expr(&expr_if.cond));
        fragment.attach(&mut self.graph, condition);

        let seed = fragment.active_frontier(&self.graph);
        let mut then_arm = Fragment::seeded_with(seed.clone(), EdgeCondition::True);
        let mut else_arm = Fragment::seeded_with(seed, EdgeCondition::False);

        self.connect_block(&expr_if.then_branch, &mut then_arm)?;
        if let Some((_, else_expr)) = &expr_if.else_branch {
            // an `else if` chain arrives here as a nested `if` expression
            self.connect_expr(else_expr, &mut else_arm)?;
        }

        fragment.sequence(&self.graph, then_arm);
        fragment.merge(&self.graph, else_arm);
        Ok(())
    }

    fn connect_while(
        &mut self,
        expr_while: &syn::ExprWhile,
        fragment: &mut Fragment,
    ) -> Result<(), FlowError> {
        let condition = self.add_condition(display::expr(&expr_while.cond));
        fragment.attach(&mut self.graph, condition);
        self.connect_loop(condition, &expr_while.body, fragment)
    }

    /// `for` is wired exactly like `while` against a synthesized membership
    /// test, so `continue` re-enters the test in both loop forms.
    fn connect_for_loop(
        &mut self,
        expr_for: &syn::ExprForLoop,
        fragment: &mut Fragment,
    ) -> Result<(), FlowError> {
        let condition = self.add_condition(display::membership(&expr_for.pat, &expr_for.expr));
        fragment.attach(&mut self.graph, condition);
        self.connect_loop(condition, &expr_for.body, fragment)
    }

    /// Shared tail of both loop forms. `condition` is already attached and
    /// alone on the frontier.
    ///
    /// The body runs under `True`. Every node the body leaves open is wired
    /// back to the body's entry set, which is the condition node again, and
    /// the frontier after the loop is that same entry set: leaving the loop
    /// is the fall-through case and carries no condition of its own.
    fn connect_loop(
        &mut self,
        condition: NodeIndex,
        body_block: &syn::Block,
        fragment: &mut Fragment,
    ) -> Result<(), FlowError> {
        self.loops.push(LoopFrame::default());

        let mut body = Fragment::seeded_with(
            fragment.active_frontier(&self.graph),
            EdgeCondition::True,
        );
        let result = self.connect_block(body_block, &mut body);
        let frame = self.loops.pop().unwrap_or_default();
        result?;

        let body_entry = body.entry().to_vec();
        fragment.sequence(&self.graph, body);
        for from in fragment.active_frontier(&self.graph) {
            for to in &body_entry {
                self.graph.add_edge(from, *to, EdgeCondition::Unconditional);
            }
        }
        fragment.set_frontier(body_entry);

        for jump in frame.continues {
            self.graph.add_edge(jump, condition, EdgeCondition::Unconditional);
        }
        for jump in frame.breaks {
            // a break leaves the loop: its placeholder joins the frontier
            // and is wired to whatever follows the loop
            fragment.push_frontier(jump);
        }
        Ok(())
    }

    fn connect_return(&mut self, expr_return: &syn::ExprReturn, fragment: &mut Fragment) {
        let node = self.add_action(display::return_expr(expr_return));
        fragment.attach(&mut self.graph, node);
        // nothing after a return is reachable from it
        self.graph.mark_sink(node);
    }

    fn connect_break(
        &mut self,
        expr_break: &syn::ExprBreak,
        fragment: &mut Fragment,
    ) -> Result<(), FlowError> {
        let line = expr_break.span().start().line;
        if expr_break.label.is_some() {
            return Err(FlowError::LabeledBreak { line });
        }
        if self.loops.is_empty() {
            return Err(FlowError::BreakOutsideLoop { line });
        }

        let jump = self.add_jump("break");
        fragment.attach(&mut self.graph, jump);
        fragment.clear_frontier();
        if let Some(frame) = self.loops.last_mut() {
            frame.breaks.push(jump);
        }
        Ok(())
    }

    fn connect_continue(
        &mut self,
        expr_continue: &syn::ExprContinue,
        fragment: &mut Fragment,
    ) -> Result<(), FlowError> {
        let line = expr_continue.span().start().line;
        if expr_continue.label.is_some() {
            return Err(FlowError::LabeledContinue { line });
        }
        if self.loops.is_empty() {
            return Err(FlowError::ContinueOutsideLoop { line });
        }

        let jump = self.add_jump("continue");
        fragment.attach(&mut self.graph, jump);
        fragment.clear_frontier();
        if let Some(frame) = self.loops.last_mut() {
            frame.continues.push(jump);
        }
        Ok(())
    }

    fn next_order(&mut self) -> u32 {
        let order = self.order;
        self.order += 1;
        order
    }

    fn add_entry(&mut self, label: String) -> NodeIndex {
        let order = self.next_order();
        self.graph.add_node(FlowGraphNode::Entry { order, label })
    }

    fn add_action(&mut self, label: String) -> NodeIndex {
        let order = self.next_order();
        self.graph.add_node(FlowGraphNode::Action {
            order,
            label,
            is_sink: false,
        })
    }

    fn add_condition(&mut self, label: String) -> NodeIndex {
        let order = self.next_order();
        self.graph.add_node(FlowGraphNode::Condition { order, label })
    }

    /// Jump placeholders do not consume order numbers; they never survive
    /// into the finished graph.
    fn add_jump(&mut self, label: &str) -> NodeIndex {
        self.graph.add_node(FlowGraphNode::Jump {
            label: label.to_string(),
        })
    }
}

fn single_function(file: &syn::File) -> Result<&syn::ItemFn, FlowError> {
    if file.items.len() != 1 {
        return Err(FlowError::NotSingleFunction {
            found: file.items.len(),
        });
    }
    match &file.items[0] {
        syn::Item::Fn(function) => Ok(function),
        item => Err(FlowError::ExpectedFunction {
            found: item_kind(item).to_string(),
        }),
    }
}

fn item_kind(item: &syn::Item) -> &'static str {
    match item {
        syn::Item::Const(_) => "`const` declaration",
        syn::Item::Enum(_) => "`enum` declaration",
        syn::Item::Fn(_) => "`fn` declaration",
        syn::Item::Impl(_) => "`impl` block",
        syn::Item::Mod(_) => "module declaration",
        syn::Item::Static(_) => "`static` declaration",
        syn::Item::Struct(_) => "`struct` declaration",
        syn::Item::Trait(_) => "`trait` declaration",
        syn::Item::Use(_) => "`use` declaration",
        _ => "item declaration",
    }
}

fn expr_kind(expr: &syn::Expr) -> &'static str {
    match expr {
        syn::Expr::Async(_) => "`async` block",
        syn::Expr::Await(_) => "`.await` expression",
        syn::Expr::Block(_) => "labeled block",
        syn::Expr::Closure(_) => "closure",
        syn::Expr::Let(_) => "`let` guard",
        syn::Expr::Loop(_) => "`loop` expression",
        syn::Expr::Match(_) => "`match` expression",
        syn::Expr::Try(_) => "`?` expression",
        syn::Expr::TryBlock(_) => "`try` block",
        syn::Expr::Unsafe(_) => "`unsafe` block",
        syn::Expr::Yield(_) => "`yield` expression",
        _ => "expression",
    }
}
