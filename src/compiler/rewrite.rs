use generational_arena::{Arena, Index};

use crate::compiler::{parser::node::NodeKind, parser::node::Node, tokens::Span};

/// Copies the subtree at `idx` into fresh nodes, applying `f` to every copied kind bottom-up.
///
/// The source nodes are left untouched, so a tree can be rewritten while other
/// references to it stay valid.
pub fn rewrite(tree: &mut Arena<Node>, idx: Index, f: &mut impl FnMut(&mut Arena<Node>, NodeKind, Span) -> NodeKind) -> Index {
    let Some(node) = tree.get(idx).cloned() else {
        return idx;
    };
    let kind = node.kind.map_children(&mut |child| rewrite(tree, child, &mut *f));
    let kind = f(tree, kind, node.span);
    tree.insert(Node::new(kind, node.span))
}

pub fn rewrite_all(
    tree: &mut Arena<Node>,
    stmts: &[Index],
    f: &mut impl FnMut(&mut Arena<Node>, NodeKind, Span) -> NodeKind,
) -> Vec<Index> {
    stmts.iter().map(|&stmt| rewrite(tree, stmt, &mut *f)).collect()
}

/// Visits every node under `idx`, parents before children.
pub fn visit(tree: &Arena<Node>, idx: Index, f: &mut impl FnMut(&Node)) {
    let Some(node) = tree.get(idx) else {
        return;
    };
    f(node);
    for child in node.kind.children() {
        visit(tree, child, &mut *f);
    }
}

pub fn visit_all(tree: &Arena<Node>, stmts: &[Index], f: &mut impl FnMut(&Node)) {
    for &stmt in stmts {
        visit(tree, stmt, &mut *f);
    }
}
