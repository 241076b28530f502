use generational_arena::{Arena, Index};

use crate::compiler::{
    parser::node::{ExprKind, Intrinsic, Literal, Node, NodeKind, StmtKind},
    rewrite::rewrite_all,
    tokens::Span,
};

/// The span of `idx` if it is an integer or float literal.
fn numeric_literal(tree: &Arena<Node>, idx: Index) -> Option<Span> {
    let node = tree.get(idx)?;
    matches!(node.as_expr(), Some(ExprKind::Literal(Literal::Int(_) | Literal::Float(_)))).then_some(node.span)
}

fn promote_value(tree: &mut Arena<Node>, value: Index) -> Index {
    let Some(span) = numeric_literal(tree, value) else {
        return value;
    };
    tree.insert(Node::expr(
        ExprKind::Intrinsic {
            op: Intrinsic::GraphConst,
            args: vec![value],
        },
        span,
    ))
}

/// Wraps numeric literals that are assigned directly, or that initialize an
/// inferred-type `let`, in `graph_const(..)`.
///
/// Literals deeper inside an expression are left alone.
pub fn promote(tree: &mut Arena<Node>, stmts: &[Index]) -> Vec<Index> {
    rewrite_all(tree, stmts, &mut |tree, kind, _| match kind {
        NodeKind::Stmt {
            kind:
                StmtKind::Let {
                    binding,
                    type_annotation: None,
                    value,
                },
        } => NodeKind::Stmt {
            kind: StmtKind::Let {
                binding,
                type_annotation: None,
                value: promote_value(tree, value),
            },
        },
        NodeKind::Expr {
            kind: ExprKind::Assign { target, op, value },
        } => NodeKind::Expr {
            kind: ExprKind::Assign {
                target,
                op,
                value: promote_value(tree, value),
            },
        },
        other => other,
    })
}
