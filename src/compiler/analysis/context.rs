use std::collections::HashMap;

use generational_arena::Arena;
use string_interner::symbol::SymbolUsize;

use crate::compiler::{
    Interner,
    analysis::{
        error::AnalysisError,
        function_table::FunctionTable,
        symbols::{SymbolTable, VarId, VarOrigin},
    },
    parser::node::Node,
    tokens::Span,
};

pub struct ResolveCtx<'a> {
    pub nodes: &'a mut Arena<Node>,
    pub interner: &'a Interner,
    pub symbols: &'a mut SymbolTable,
    pub fn_table: &'a FunctionTable,
    pub scopes: Vec<HashMap<SymbolUsize, VarId>>,
    pub diagnostics: &'a mut Vec<AnalysisError>,
}

impl<'a> ResolveCtx<'a> {
    pub fn new(
        nodes: &'a mut Arena<Node>,
        interner: &'a Interner,
        symbols: &'a mut SymbolTable,
        fn_table: &'a FunctionTable,
        diagnostics: &'a mut Vec<AnalysisError>,
    ) -> Self {
        Self {
            nodes,
            interner,
            symbols,
            fn_table,
            scopes: Vec::new(),
            diagnostics,
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    /// Declares in the innermost scope. Redeclaring a name shadows it with a fresh id.
    pub fn declare(&mut self, name: SymbolUsize, origin: VarOrigin, span: Span) -> VarId {
        let var = self.symbols.declare(name, origin, span);
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name, var);
        }
        var
    }

    pub fn lookup(&self, name: SymbolUsize) -> Option<VarId> {
        self.scopes.iter().rev().find_map(|scope| scope.get(&name).copied())
    }

    pub fn resolve_name(&self, name: SymbolUsize) -> String {
        self.interner.resolve(name).unwrap_or("<unknown>").to_string()
    }
}
