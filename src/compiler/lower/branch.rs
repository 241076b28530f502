use std::collections::HashSet;

use generational_arena::Index;
use tracing::warn;

use super::{
    BranchRole, LoweringCtx, LoweringError, LoweringWarning,
    rename::Renamer,
    scan::{self, LiveSet},
};
use crate::compiler::{
    analysis::{SyntheticRole, VarId},
    parser::node::{Binding, ExprKind, Intrinsic, Literal, Node, StmtKind},
    tokens::Span,
};

/// `shadow_{name}`, suffixed with `_2`, `_3`, .. when two live variables share a name.
fn shadow_name(name: &str, taken: &mut HashSet<String>) -> String {
    let base = format!("shadow_{name}");
    let mut candidate = base.clone();
    let mut suffix = 2;
    while taken.contains(&candidate) {
        candidate = format!("{base}_{suffix}");
        suffix += 1;
    }
    taken.insert(candidate.clone());
    candidate
}

/// The value count a branch body must produce for a given live set.
pub fn expected_arity(live: &LiveSet) -> usize {
    live.len().max(1)
}

impl LoweringCtx<'_> {
    pub(super) fn binding_for(&self, var: VarId) -> Result<Binding, LoweringError> {
        let variable = self.symbols.get(var).ok_or_else(|| LoweringError::NotFound {
            what: format!("variable {:?}", var.0.into_raw_parts()),
        })?;
        Ok(Binding::resolved(variable.name, var))
    }

    /// How many values a `return` statement produces.
    fn return_arity(&self, stmt: Index) -> Result<Option<usize>, LoweringError> {
        let Some(StmtKind::Return { value }) = self.node(stmt)?.as_stmt() else {
            return Ok(None);
        };
        let Some(value) = *value else {
            return Ok(Some(0));
        };
        Ok(Some(match self.node(value)?.as_expr() {
            Some(ExprKind::Tuple { items }) => items.len(),
            _ => 1,
        }))
    }

    /// Wraps an already lowered branch into a deferred body.
    ///
    /// The body opens with one shadow copy per live variable, continues with
    /// the branch renamed onto those shadows, and ends with the production of
    /// the shadows (or `graph_const(1)` for an empty live set) unless the
    /// branch already returns.
    pub(super) fn package_branch(
        &mut self,
        lowered: &[Index],
        live: &LiveSet,
        counter: u32,
        role: BranchRole,
        span: Span,
    ) -> Result<Index, LoweringError> {
        let mut renamer = Renamer::default();
        let mut body = Vec::with_capacity(live.len() * 2 + lowered.len() + 1);
        let mut shadows = Vec::with_capacity(live.len());
        let mut taken = HashSet::new();

        for &var in live {
            let original = self.binding_for(var)?;
            let name = shadow_name(&self.name_of(&original), &mut taken);
            let shadow = self.synthetic(&name, SyntheticRole::Shadow, span);
            let value = self.var_expr(original, span);
            body.push(self.push(Node::stmt(
                StmtKind::Let {
                    binding: shadow,
                    type_annotation: None,
                    value,
                },
                span,
            )));
            renamer.insert(var, shadow);
            shadows.push(shadow);
        }

        let renamed = renamer.rename_stmts(self.tree, lowered);
        let expected = expected_arity(live);

        if scan::has_top_level_return(&*self.tree, &renamed) {
            for &stmt in &renamed {
                let Some(found) = self.return_arity(stmt)? else {
                    continue;
                };
                let span = self.display(self.node(stmt)?.span);
                if found != expected {
                    return Err(LoweringError::ArityMismatch {
                        counter,
                        branch: role,
                        expected,
                        found,
                        span,
                    });
                }
                warn!(counter, branch = %role, "return inside a branch becomes the branch result");
                self.warnings.push(LoweringWarning::BranchReturn { counter, branch: role, span });
            }
            body.extend(renamed);
        } else {
            body.extend(renamed);
            let production = self.production(&shadows, span);
            body.push(self.push(Node::stmt(StmtKind::Return { value: Some(production) }, span)));
        }

        Ok(self.push(Node::expr(ExprKind::Closure { body }, span)))
    }

    /// `(shadow_a, shadow_b)` or, with nothing to carry, `graph_const(1)`.
    fn production(&mut self, shadows: &[Binding], span: Span) -> Index {
        if shadows.is_empty() {
            let one = self.push(Node::expr(ExprKind::Literal(Literal::Int(1)), span));
            return self.push(Node::expr(
                ExprKind::Intrinsic {
                    op: Intrinsic::GraphConst,
                    args: vec![one],
                },
                span,
            ));
        }
        let items = shadows.iter().map(|&shadow| self.var_expr(shadow, span)).collect();
        self.push(Node::expr(ExprKind::Tuple { items }, span))
    }
}
