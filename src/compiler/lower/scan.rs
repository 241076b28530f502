use generational_arena::{Arena, Index};
use indexmap::IndexSet;

use crate::compiler::{
    analysis::VarId,
    parser::node::{Binding, ExprKind, Node, NodeKind, StmtKind, Target},
    rewrite::{visit, visit_all},
    tokens::Span,
};

/// Variables whose values must be reconciled across both branches, in the order
/// they were first seen. That order is the order of the merge tuple.
pub type LiveSet = IndexSet<VarId>;

pub fn is_conditional(tree: &Arena<Node>, stmt: Index) -> bool {
    matches!(tree.get(stmt).and_then(Node::as_stmt), Some(StmtKind::If { .. }))
}

/// Variables bound by `let` without a type annotation, at the top level of `stmts` only.
pub fn declared_variables(tree: &Arena<Node>, stmts: &[Index]) -> IndexSet<VarId> {
    stmts
        .iter()
        .filter_map(|&stmt| match tree.get(stmt).and_then(Node::as_stmt) {
            Some(StmtKind::Let {
                binding: Binding { var: Some(var), .. },
                type_annotation: None,
                ..
            }) => Some(*var),
            _ => None,
        })
        .collect()
}

/// Every variable bound by any `let` anywhere under `stmts`, deferred bodies included.
pub fn declared_anywhere(tree: &Arena<Node>, stmts: &[Index]) -> IndexSet<VarId> {
    let mut declared = IndexSet::new();
    visit_all(tree, stmts, &mut |node| {
        if let Some(StmtKind::Let {
            binding: Binding { var: Some(var), .. },
            ..
        }) = node.as_stmt()
        {
            declared.insert(*var);
        }
    });
    declared
}

fn assignment_targets(node: &Node) -> Vec<VarId> {
    match &node.kind {
        NodeKind::Expr {
            kind: ExprKind::Assign { target, .. } | ExprKind::Step { target, .. },
        } => target.var.into_iter().collect(),
        NodeKind::Stmt {
            kind: StmtKind::Destructure { targets, .. },
        } => targets
            .iter()
            .filter_map(|target| match target {
                Target::Bind(binding) => binding.var,
                Target::Discard => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Targets of every assignment operator, increment, decrement and destructuring
/// bind anywhere under `stmts`, through nested conditionals and deferred bodies.
pub fn assigned_variables(tree: &Arena<Node>, stmts: &[Index]) -> IndexSet<VarId> {
    let mut assigned = IndexSet::new();
    visit_all(tree, stmts, &mut |node| assigned.extend(assignment_targets(node)));
    assigned
}

/// Whether `stmt` assigns `var` anywhere, nested conditionals and deferred bodies included.
pub fn contains_assignment_to(tree: &Arena<Node>, stmt: Index, var: VarId) -> bool {
    let mut found = false;
    visit(tree, stmt, &mut |node| found |= assignment_targets(node).contains(&var));
    found
}

/// declared(previous) followed by the then-branch's assignments to variables
/// that outlive the branch.
pub fn live_set(tree: &Arena<Node>, previous: &[Index], then_branch: &[Index]) -> LiveSet {
    let branch_local = declared_anywhere(tree, then_branch);
    let mut live = declared_variables(tree, previous);
    live.extend(
        assigned_variables(tree, then_branch)
            .into_iter()
            .filter(|var| !branch_local.contains(var)),
    );
    live
}

/// Assignments in `branch` to outer variables that are missing from `live`.
pub fn unmerged_assignments(tree: &Arena<Node>, branch: &[Index], live: &LiveSet) -> IndexSet<VarId> {
    let branch_local = declared_anywhere(tree, branch);
    assigned_variables(tree, branch)
        .into_iter()
        .filter(|var| !branch_local.contains(var) && !live.contains(var))
        .collect()
}

pub fn has_top_level_return(tree: &Arena<Node>, stmts: &[Index]) -> bool {
    stmts
        .iter()
        .any(|&stmt| matches!(tree.get(stmt).and_then(Node::as_stmt), Some(StmtKind::Return { .. })))
}

/// The first name under `stmts` that name resolution did not bind.
pub fn first_unresolved(tree: &Arena<Node>, stmts: &[Index]) -> Option<(Binding, Span)> {
    let mut found = None;
    visit_all(tree, stmts, &mut |node| {
        if found.is_some() {
            return;
        }
        let binding = match &node.kind {
            NodeKind::Expr {
                kind: ExprKind::Var(b) | ExprKind::Assign { target: b, .. } | ExprKind::Step { target: b, .. },
            } => Some(*b),
            NodeKind::Stmt {
                kind: StmtKind::Let { binding, .. },
            } => Some(*binding),
            NodeKind::Stmt {
                kind: StmtKind::Destructure { targets, .. },
            } => targets.iter().find_map(|target| match target {
                Target::Bind(b) if b.var.is_none() => Some(*b),
                _ => None,
            }),
            _ => None,
        };
        if let Some(binding) = binding
            && binding.var.is_none()
        {
            found = Some((binding, node.span));
        }
    });
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::{
        Frontend, parse,
        parser::node::{DefKind, NodeKind},
    };

    fn body(frontend: &Frontend) -> Vec<Index> {
        let NodeKind::Root { defs } = &frontend.root.kind else {
            panic!("expected a root");
        };
        match frontend.tree.get(defs[0]).map(|node| &node.kind) {
            Some(NodeKind::Def {
                kind: DefKind::Function { body, .. },
            }) => body.clone(),
            _ => panic!("expected a procedure"),
        }
    }

    fn names(frontend: &Frontend, vars: &IndexSet<VarId>) -> Vec<String> {
        vars.iter()
            .filter_map(|&var| frontend.symbols.get(var))
            .filter_map(|variable| frontend.interner.resolve(variable.name))
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_declared_skips_annotated_and_nested() {
        let frontend = parse("fn f(a: bool) { let x = 1; let y: i32 = 2; if a { let z = 3; } else { } let w = 4; }", "t.ag").unwrap();
        let declared = declared_variables(&frontend.tree, &body(&frontend));
        assert_eq!(names(&frontend, &declared), ["x", "w"]);
    }

    #[test]
    fn test_assigned_recurses_into_branches() {
        let frontend = parse(
            "fn f(a: bool, x: i32, y: i32, z: i32) { y <<= 1; if a { x++; } else { if a { --z; } else { } } y = 2; }",
            "t.ag",
        )
        .unwrap();
        let stmts = body(&frontend);
        let assigned = assigned_variables(&frontend.tree, &stmts);
        assert_eq!(names(&frontend, &assigned), ["y", "x", "z"]);

        let z = assigned[2];
        assert!(contains_assignment_to(&frontend.tree, stmts[1], z));
        assert!(!contains_assignment_to(&frontend.tree, stmts[0], z));
    }

    #[test]
    fn test_live_set_excludes_branch_locals() {
        let frontend = parse("fn f(a: bool) { let x = 1; let y = 2; if a { let t = 3; t = 4; y = t; } else { } }", "t.ag").unwrap();
        let stmts = body(&frontend);
        let Some(StmtKind::If { then_block, .. }) = frontend.tree.get(stmts[2]).and_then(Node::as_stmt) else {
            panic!("expected a conditional");
        };
        let live = live_set(&frontend.tree, &stmts[..2], then_block);
        assert_eq!(names(&frontend, &live), ["x", "y"]);
    }

    #[test]
    fn test_scanners_accept_empty_input() {
        let tree = Arena::new();
        assert!(declared_variables(&tree, &[]).is_empty());
        assert!(assigned_variables(&tree, &[]).is_empty());
        assert!(live_set(&tree, &[], &[]).is_empty());
        assert!(!has_top_level_return(&tree, &[]));
    }
}
