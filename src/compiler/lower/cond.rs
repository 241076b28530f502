use generational_arena::Index;
use tracing::{debug, warn};

use super::{
    BranchRole, CondCounter, LoweringCtx, LoweringError, LoweringWarning,
    branch::expected_arity,
    scan::{self, LiveSet},
};
use crate::compiler::{
    analysis::SyntheticRole,
    parser::node::{Binding, ExprKind, Intrinsic, Node, StmtKind, Target},
    tokens::Span,
};

/// One conditional, read out of its `If` node.
struct Conditional {
    cond: Index,
    then_block: Vec<Index>,
    else_block: Vec<Index>,
    span: Span,
}

impl LoweringCtx<'_> {
    /// Rewrites every conditional in `stmts`, returning the new statements and
    /// the counter after the last conditional consumed.
    ///
    /// Statements before the first conditional are kept as they are. The
    /// conditional becomes a predicate, two deferred bodies, a lazy select and
    /// a rebind, and the statements after it are lowered recursively.
    pub fn lower_block(&mut self, stmts: &[Index], counter: CondCounter) -> Result<(Vec<Index>, CondCounter), LoweringError> {
        let Some(pos) = stmts.iter().position(|&stmt| scan::is_conditional(&*self.tree, stmt)) else {
            return Ok((stmts.to_vec(), counter));
        };
        let (previous, rest) = stmts.split_at(pos);
        let next = &rest[1..];

        let (n, counter) = counter.next();
        let conditional = self.read_conditional(rest[0], n)?;

        let (then_lowered, counter) = self.lower_block(&conditional.then_block, counter)?;
        let live = scan::live_set(&*self.tree, previous, &then_lowered);
        let (else_lowered, counter) = self.lower_block(&conditional.else_block, counter)?;

        let unmerged = scan::unmerged_assignments(&*self.tree, &else_lowered, &live);
        if !unmerged.is_empty() {
            let names: Vec<String> = unmerged
                .iter()
                .filter_map(|&var| self.binding_for(var).ok())
                .map(|binding| self.name_of(&binding))
                .collect();
            warn!(
                counter = n,
                names = ?names,
                "else branch assigns variables that are not merged back"
            );
            let span = self.display(conditional.span);
            self.warnings.push(LoweringWarning::UnmergedAssignments { counter: n, names, span });
        }
        let written = live
            .iter()
            .filter(|&&var| then_lowered.iter().any(|&stmt| scan::contains_assignment_to(&*self.tree, stmt, var)))
            .count();
        debug!(counter = n, live = live.len(), written, "lowering conditional");

        let then_body = self.package_branch(&then_lowered, &live, n, BranchRole::Then, conditional.span)?;
        let else_body = self.package_branch(&else_lowered, &live, n, BranchRole::Else, conditional.span)?;

        let mut lowered = previous.to_vec();
        lowered.extend(self.emit_merge(n, conditional.cond, then_body, else_body, &live, conditional.span)?);

        let (tail, counter) = self.lower_block(next, counter)?;
        lowered.extend(tail);
        Ok((lowered, counter))
    }

    fn read_conditional(&self, stmt: Index, counter: u32) -> Result<Conditional, LoweringError> {
        let node = self.node(stmt)?;
        let Some(StmtKind::If {
            cond,
            then_block,
            else_block,
        }) = node.as_stmt()
        else {
            return Err(LoweringError::NotFound {
                what: format!("conditional #{counter}"),
            });
        };
        let Some(else_block) = else_block else {
            return Err(LoweringError::MissingElse {
                counter,
                span: self.display(node.span),
            });
        };
        Ok(Conditional {
            cond: *cond,
            then_block: then_block.clone(),
            else_block: else_block.clone(),
            span: node.span,
        })
    }

    fn let_stmt(&mut self, binding: Binding, value: Index, span: Span) -> Index {
        self.push(Node::stmt(
            StmtKind::Let {
                binding,
                type_annotation: None,
                value,
            },
            span,
        ))
    }

    /// The five statements that replace conditional `n`.
    fn emit_merge(
        &mut self,
        n: u32,
        cond: Index,
        then_body: Index,
        else_body: Index,
        live: &LiveSet,
        span: Span,
    ) -> Result<Vec<Index>, LoweringError> {
        let predicate = self.synthetic(&format!("predicate_{n}"), SyntheticRole::Predicate, span);
        let if_true = self.synthetic(&format!("ifTrue_{n}"), SyntheticRole::IfTrue, span);
        let if_false = self.synthetic(&format!("ifFalse_{n}"), SyntheticRole::IfFalse, span);
        let merge = self.synthetic(&format!("merge_{n}"), SyntheticRole::Merge, span);

        let select_args = vec![
            self.var_expr(predicate, span),
            self.var_expr(if_true, span),
            self.var_expr(if_false, span),
        ];
        let select = self.push(Node::expr(
            ExprKind::Intrinsic {
                op: Intrinsic::Select,
                args: select_args,
            },
            span,
        ));

        let targets = if live.is_empty() {
            vec![Target::Discard]
        } else {
            live.iter()
                .map(|&var| self.binding_for(var).map(Target::Bind))
                .collect::<Result<Vec<_>, _>>()?
        };
        debug_assert_eq!(targets.len(), expected_arity(live));
        let merged = self.var_expr(merge, span);

        Ok(vec![
            self.let_stmt(predicate, cond, span),
            self.let_stmt(if_true, then_body, span),
            self.let_stmt(if_false, else_body, span),
            self.let_stmt(merge, select, span),
            self.push(Node::stmt(StmtKind::Destructure { targets, value: merged }, span)),
        ])
    }
}
