use generational_arena::{Arena, Index};

use crate::compiler::{
    parser::node::{Node, NodeKind, StmtKind},
    rewrite::rewrite_all,
};

/// Turns every `let x: T = e;` under `stmts` into `let x = e;`.
pub fn normalize(tree: &mut Arena<Node>, stmts: &[Index]) -> Vec<Index> {
    rewrite_all(tree, stmts, &mut |_, kind, _| match kind {
        NodeKind::Stmt {
            kind: StmtKind::Let { binding, value, .. },
        } => NodeKind::Stmt {
            kind: StmtKind::Let {
                binding,
                type_annotation: None,
                value,
            },
        },
        other => other,
    })
}
