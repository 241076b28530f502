use generational_arena::Index;

use crate::compiler::{
    analysis::{context::ResolveCtx, error::AnalysisError, symbols::VarOrigin},
    parser::node::{Binding, DefKind, ExprKind, NodeKind, StmtKind, Target},
    tokens::Span,
};

impl<'a> ResolveCtx<'a> {
    /// Binds every parameter, declaration and use inside one function definition.
    pub fn resolve_function(&mut self, def_idx: Index) {
        let Some(NodeKind::Def {
            kind: DefKind::Function { mut params, body, .. },
        }) = self.nodes.get(def_idx).map(|node| node.kind.clone())
        else {
            return;
        };

        self.push_scope();
        for param in params.iter_mut() {
            let duplicate = self.scopes.last().is_some_and(|scope| scope.contains_key(&param.name));
            if duplicate {
                self.diagnostics.push(AnalysisError::DuplicateParameter {
                    name: self.resolve_name(param.name),
                    span: param.span.to_display(self.interner),
                });
            }
            param.var = Some(self.declare(param.name, VarOrigin::Param, param.span));
        }
        self.resolve_stmts(&body);
        self.pop_scope();

        if let Some(NodeKind::Def {
            kind: DefKind::Function { params: stored, .. },
        }) = self.nodes.get_mut(def_idx).map(|node| &mut node.kind)
        {
            *stored = params;
        }
    }

    fn resolve_stmts(&mut self, stmts: &[Index]) {
        for &stmt in stmts {
            self.resolve_stmt(stmt);
        }
    }

    fn resolve_block(&mut self, stmts: &[Index]) {
        self.push_scope();
        self.resolve_stmts(stmts);
        self.pop_scope();
    }

    fn resolve_stmt(&mut self, idx: Index) {
        let Some((span, NodeKind::Stmt { kind })) = self.nodes.get(idx).map(|node| (node.span, node.kind.clone())) else {
            return;
        };

        let resolved = match kind {
            StmtKind::Let {
                binding,
                type_annotation,
                value,
            } => {
                // the initializer sees the previous binding of the same name
                self.resolve_expr(value);
                let var = self.declare(binding.name, VarOrigin::Local, span);
                StmtKind::Let {
                    binding: Binding::resolved(binding.name, var),
                    type_annotation,
                    value,
                }
            }
            StmtKind::Expr { expr } => {
                self.resolve_expr(expr);
                return;
            }
            StmtKind::Return { value } => {
                if let Some(value) = value {
                    self.resolve_expr(value);
                }
                return;
            }
            StmtKind::If {
                cond,
                then_block,
                else_block,
            } => {
                self.resolve_expr(cond);
                self.resolve_block(&then_block);
                if let Some(else_block) = &else_block {
                    self.resolve_block(else_block);
                }
                return;
            }
            StmtKind::Destructure { targets, value } => {
                self.resolve_expr(value);
                let targets = targets
                    .into_iter()
                    .map(|target| match target {
                        Target::Bind(binding) => Target::Bind(self.resolve_use(binding, span)),
                        Target::Discard => Target::Discard,
                    })
                    .collect();
                StmtKind::Destructure { targets, value }
            }
        };

        if let Some(node) = self.nodes.get_mut(idx) {
            node.kind = NodeKind::Stmt { kind: resolved };
        }
    }

    fn resolve_use(&mut self, binding: Binding, span: Span) -> Binding {
        match self.lookup(binding.name) {
            Some(var) => Binding::resolved(binding.name, var),
            None => {
                self.diagnostics.push(AnalysisError::UnresolvedIdentifier {
                    name: self.resolve_name(binding.name),
                    span: span.to_display(self.interner),
                });
                binding
            }
        }
    }

    fn resolve_expr(&mut self, idx: Index) {
        let Some((span, NodeKind::Expr { kind })) = self.nodes.get(idx).map(|node| (node.span, node.kind.clone())) else {
            return;
        };

        let resolved = match kind {
            ExprKind::Literal(_) => return,
            ExprKind::Var(binding) => ExprKind::Var(self.resolve_use(binding, span)),
            ExprKind::BinOp { left, right, .. } => {
                self.resolve_expr(left);
                self.resolve_expr(right);
                return;
            }
            ExprKind::UnaryOp { expr, .. } => {
                self.resolve_expr(expr);
                return;
            }
            ExprKind::Assign { target, op, value } => {
                self.resolve_expr(value);
                ExprKind::Assign {
                    target: self.resolve_use(target, span),
                    op,
                    value,
                }
            }
            ExprKind::Step { target, kind, fixity } => ExprKind::Step {
                target: self.resolve_use(target, span),
                kind,
                fixity,
            },
            ExprKind::Call { func, args } => {
                for &arg in &args {
                    self.resolve_expr(arg);
                }
                // calls to unknown procedures are left to the runtime
                if let Some(&(_, expected)) = self.fn_table.get(&func)
                    && expected != args.len()
                {
                    self.diagnostics.push(AnalysisError::ArgumentCount {
                        name: self.resolve_name(func),
                        expected,
                        found: args.len(),
                        span: span.to_display(self.interner),
                    });
                }
                return;
            }
            ExprKind::Tuple { items: args } | ExprKind::Intrinsic { args, .. } => {
                for &arg in &args {
                    self.resolve_expr(arg);
                }
                return;
            }
            ExprKind::Closure { body } => {
                self.resolve_block(&body);
                return;
            }
        };

        if let Some(node) = self.nodes.get_mut(idx) {
            node.kind = NodeKind::Expr { kind: resolved };
        }
    }
}
