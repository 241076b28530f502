mod context;
pub mod error;
pub mod function_table;
mod resolve;
mod symbols;

use generational_arena::Arena;

pub use error::AnalysisError;
pub use function_table::FunctionTable;
pub use symbols::{SymbolTable, SyntheticRole, VarId, VarOrigin, Variable};

use crate::compiler::{
    Interner,
    parser::node::{DefKind, Node, NodeKind},
};
use context::ResolveCtx;
use function_table::generate_function_table;

/// Resolves every identifier under `root` to a [`VarId`], recording variables in `symbols`.
pub fn analysis_pass(root: &Node, nodes: &mut Arena<Node>, interner: &Interner, symbols: &mut SymbolTable) -> (FunctionTable, Vec<AnalysisError>) {
    let NodeKind::Root { defs } = &root.kind else {
        return (FunctionTable::new(), Vec::new());
    };

    let mut diagnostics = Vec::new();
    let (fn_table, duplicates) = generate_function_table(defs, nodes);
    for dup in duplicates {
        if let Some(node) = nodes.get(dup)
            && let NodeKind::Def {
                kind: DefKind::Function { name, .. },
            } = &node.kind
        {
            diagnostics.push(AnalysisError::DuplicateFunction {
                name: interner.resolve(*name).unwrap_or("<unknown>").to_string(),
                span: node.span.to_display(interner),
            });
        }
    }

    let mut ctx = ResolveCtx::new(nodes, interner, symbols, &fn_table, &mut diagnostics);
    for &def in defs {
        ctx.resolve_function(def);
    }

    (fn_table, diagnostics)
}
