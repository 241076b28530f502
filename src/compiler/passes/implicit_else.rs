use generational_arena::{Arena, Index};

use crate::compiler::{
    parser::node::{Node, NodeKind, StmtKind},
    rewrite::rewrite_all,
};

/// Gives every `if` without an `else` an empty one.
pub fn synthesize(tree: &mut Arena<Node>, stmts: &[Index]) -> Vec<Index> {
    rewrite_all(tree, stmts, &mut |_, kind, _| match kind {
        NodeKind::Stmt {
            kind:
                StmtKind::If {
                    cond,
                    then_block,
                    else_block: None,
                },
        } => NodeKind::Stmt {
            kind: StmtKind::If {
                cond,
                then_block,
                else_block: Some(Vec::new()),
            },
        },
        other => other,
    })
}
