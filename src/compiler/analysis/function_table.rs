use std::collections::HashMap;

use generational_arena::{Arena, Index};
use string_interner::symbol::SymbolUsize;

use crate::compiler::parser::node::{DefKind, Node, NodeKind};

/// Procedure name to its definition node and parameter count.
pub type FunctionTable = HashMap<SymbolUsize, (Index, usize)>;

/// Builds the table from the definitions listed under a root.
/// Later duplicates are returned separately instead of overwriting.
pub fn generate_function_table(defs: &[Index], nodes: &Arena<Node>) -> (FunctionTable, Vec<Index>) {
    let mut function_table = FunctionTable::new();
    let mut duplicates = Vec::new();

    for &def_idx in defs {
        let Some(NodeKind::Def {
            kind: DefKind::Function { name, params, .. },
        }) = nodes.get(def_idx).map(|node| &node.kind)
        else {
            continue;
        };
        if function_table.contains_key(name) {
            duplicates.push(def_idx);
        } else {
            function_table.insert(*name, (def_idx, params.len()));
        }
    }

    (function_table, duplicates)
}
