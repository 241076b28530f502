use generational_arena::{Arena, Index};
use string_interner::symbol::SymbolUsize;

use crate::compiler::tokens::Span;

/// Identity of one variable: a parameter, a `let`, or a binding introduced by lowering.
///
/// Two variables with the same textual name in different scopes have different ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarId(pub Index);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntheticRole {
    Predicate,
    IfTrue,
    IfFalse,
    Merge,
    Shadow,
    Placeholder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarOrigin {
    Param,
    Local,
    Synthetic(SyntheticRole),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: SymbolUsize,
    pub origin: VarOrigin,
    pub span: Span,
}

#[derive(Debug, Default)]
pub struct SymbolTable {
    vars: Arena<Variable>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, name: SymbolUsize, origin: VarOrigin, span: Span) -> VarId {
        VarId(self.vars.insert(Variable { name, origin, span }))
    }

    pub fn get(&self, var: VarId) -> Option<&Variable> {
        self.vars.get(var.0)
    }

    pub fn is_synthetic(&self, var: VarId) -> bool {
        matches!(self.get(var).map(|v| v.origin), Some(VarOrigin::Synthetic(_)))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (VarId, &Variable)> {
        self.vars.iter().map(|(idx, var)| (VarId(idx), var))
    }
}
