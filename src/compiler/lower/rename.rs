use std::collections::HashMap;

use generational_arena::{Arena, Index};

use crate::compiler::{
    analysis::VarId,
    parser::node::{Binding, ExprKind, Node, NodeKind, StmtKind, Target},
    rewrite::rewrite_all,
};

/// Replaces every reference to a mapped variable with another binding.
///
/// Reads, assignment targets, step targets and destructuring targets are
/// rewritten; declaration sites are not.
#[derive(Debug, Default)]
pub struct Renamer {
    map: HashMap<VarId, Binding>,
}

impl Renamer {
    pub fn insert(&mut self, from: VarId, to: Binding) {
        self.map.insert(from, to);
    }

    fn rename(&self, binding: Binding) -> Binding {
        binding.var.and_then(|var| self.map.get(&var).copied()).unwrap_or(binding)
    }

    fn rename_kind(&self, kind: NodeKind) -> NodeKind {
        match kind {
            NodeKind::Expr { kind } => NodeKind::Expr {
                kind: match kind {
                    ExprKind::Var(binding) => ExprKind::Var(self.rename(binding)),
                    ExprKind::Assign { target, op, value } => ExprKind::Assign {
                        target: self.rename(target),
                        op,
                        value,
                    },
                    ExprKind::Step { target, kind, fixity } => ExprKind::Step {
                        target: self.rename(target),
                        kind,
                        fixity,
                    },
                    other => other,
                },
            },
            NodeKind::Stmt {
                kind: StmtKind::Destructure { targets, value },
            } => NodeKind::Stmt {
                kind: StmtKind::Destructure {
                    targets: targets
                        .into_iter()
                        .map(|target| match target {
                            Target::Bind(binding) => Target::Bind(self.rename(binding)),
                            Target::Discard => Target::Discard,
                        })
                        .collect(),
                    value,
                },
            },
            other => other,
        }
    }

    /// Returns renamed copies of `stmts`. The input nodes are not modified, and
    /// an empty map still yields a copy.
    pub fn rename_stmts(&self, tree: &mut Arena<Node>, stmts: &[Index]) -> Vec<Index> {
        rewrite_all(tree, stmts, &mut |_, kind, _| self.rename_kind(kind))
    }
}
