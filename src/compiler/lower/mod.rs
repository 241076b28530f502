//! Conditional lowering.
//!
//! Every `if`/`else` in a procedure body is rewritten into a predicate binding,
//! two deferred branch bodies, one lazy `select` and a destructuring rebind of
//! the variables that must survive the branch:
//!
//! ```text
//! let predicate_1 = c != 0;
//! let ifTrue_1 = || { let shadow_c = c; shadow_c = 1; return (shadow_c,); };
//! let ifFalse_1 = || { let shadow_c = c; shadow_c = 2; return (shadow_c,); };
//! let merge_1 = select(predicate_1, ifTrue_1, ifFalse_1);
//! (c,) = merge_1;
//! ```

mod branch;
mod cond;
pub mod error;
pub mod rename;
pub mod scan;

use generational_arena::{Arena, Index};

pub use error::{BranchRole, LoweringError, LoweringWarning};

use crate::compiler::{
    Interner,
    analysis::{SymbolTable, SyntheticRole, VarOrigin},
    parser::node::{Binding, ExprKind, Node, Param},
    tokens::{DisplaySpan, Span},
};

/// Prefixes of generated bindings. User variables may not start with these.
pub const RESERVED_PREFIXES: [&str; 5] = ["predicate_", "ifTrue_", "ifFalse_", "merge_", "shadow_"];

/// The next conditional number to hand out. Threaded through every recursive
/// call and returned, so no state outlives one lowering run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CondCounter(u32);

impl CondCounter {
    pub fn new() -> Self {
        Self(1)
    }

    /// The value for the next conditional and the advanced counter.
    pub fn next(self) -> (u32, CondCounter) {
        (self.0, CondCounter(self.0 + 1))
    }

    /// How many conditionals have been lowered so far.
    pub fn consumed(self) -> u32 {
        self.0 - 1
    }
}

impl Default for CondCounter {
    fn default() -> Self {
        Self::new()
    }
}

pub struct LoweringCtx<'a> {
    pub tree: &'a mut Arena<Node>,
    pub symbols: &'a mut SymbolTable,
    pub interner: &'a mut Interner,
    pub warnings: Vec<LoweringWarning>,
}

impl<'a> LoweringCtx<'a> {
    pub fn new(tree: &'a mut Arena<Node>, symbols: &'a mut SymbolTable, interner: &'a mut Interner) -> Self {
        Self {
            tree,
            symbols,
            interner,
            warnings: Vec::new(),
        }
    }

    pub fn node(&self, idx: Index) -> Result<&Node, LoweringError> {
        self.tree.get(idx).ok_or_else(|| LoweringError::NotFound {
            what: format!("node {:?}", idx.into_raw_parts()),
        })
    }

    pub fn push(&mut self, node: Node) -> Index {
        self.tree.insert(node)
    }

    pub fn display(&self, span: Span) -> DisplaySpan {
        span.to_display(&*self.interner)
    }

    pub fn name_of(&self, binding: &Binding) -> String {
        self.interner.resolve(binding.name).unwrap_or("<unknown>").to_string()
    }

    /// Declares a generated variable named `name`.
    pub fn synthetic(&mut self, name: &str, role: SyntheticRole, span: Span) -> Binding {
        let symbol = self.interner.get_or_intern(name);
        let var = self.symbols.declare(symbol, VarOrigin::Synthetic(role), span);
        Binding::resolved(symbol, var)
    }

    pub fn var_expr(&mut self, binding: Binding, span: Span) -> Index {
        self.push(Node::expr(ExprKind::Var(binding), span))
    }

    /// Rejects user variables that could collide with generated names.
    pub fn check_reserved_names(&self, params: &[Param], body: &[Index]) -> Result<(), LoweringError> {
        let params = params.iter().filter_map(|param| param.var);
        for var in params.chain(scan::declared_anywhere(&*self.tree, body)) {
            if self.symbols.is_synthetic(var) {
                continue;
            }
            let Some(variable) = self.symbols.get(var) else {
                continue;
            };
            let name = self.interner.resolve(variable.name).unwrap_or_default();
            if let Some(prefix) = RESERVED_PREFIXES.iter().find(|prefix| name.starts_with(**prefix)) {
                return Err(LoweringError::ReservedName {
                    name: name.to_string(),
                    prefix: *prefix,
                    span: self.display(variable.span),
                });
            }
        }
        Ok(())
    }

    /// Lowers every conditional in a procedure body, numbering them from 1.
    pub fn lower_body(&mut self, params: &[Param], body: &[Index]) -> Result<Vec<Index>, LoweringError> {
        if let Some((binding, span)) = scan::first_unresolved(&*self.tree, body) {
            return Err(LoweringError::Unresolved {
                name: self.name_of(&binding),
                span: self.display(span),
            });
        }
        self.check_reserved_names(params, body)?;

        let (lowered, counter) = self.lower_block(body, CondCounter::new())?;
        tracing::trace!(conditionals = counter.consumed(), "lowered body");
        Ok(lowered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::{
        Frontend, emit, parse,
        parser::node::{DefKind, NodeKind},
    };

    /// Lowers the body of the first procedure in `source` without any preparation passes.
    fn lower_first(source: &str) -> Result<String, LoweringError> {
        let Frontend {
            mut interner,
            mut tree,
            root,
            mut symbols,
            ..
        } = parse(source, "t.ag").unwrap();
        let NodeKind::Root { defs } = &root.kind else {
            panic!("expected a root");
        };
        let Some(NodeKind::Def {
            kind: DefKind::Function { params, body, .. },
        }) = tree.get(defs[0]).map(|node| node.kind.clone())
        else {
            panic!("expected a procedure");
        };

        let lowered = LoweringCtx::new(&mut tree, &mut symbols, &mut interner).lower_body(&params, &body)?;
        Ok(emit::render_stmts(&lowered, &tree, &interner))
    }

    #[test]
    fn test_counter_threads_values() {
        let counter = CondCounter::new();
        let (first, counter) = counter.next();
        let (second, counter) = counter.next();
        assert_eq!((first, second), (1, 2));
        assert_eq!(counter.consumed(), 2);
        assert_eq!(CondCounter::default().consumed(), 0);
    }

    #[test]
    fn test_body_without_conditionals_is_unchanged() {
        let text = lower_first("fn f(a: i32): i32 { let b = a + 1; return b; }").unwrap();
        assert_eq!(text, "let b = a + 1;\nreturn b;\n");
    }

    #[test]
    fn test_single_conditional() {
        let source = "fn f(a: i32): i32 {\n    let c = 0;\n    if a > 0 { c = 1; } else { c = 2; }\n    return c;\n}\n";
        let expected = [
            "let c = 0;",
            "let predicate_1 = a > 0;",
            "let ifTrue_1 = || {",
            "    let shadow_c = c;",
            "    shadow_c = 1;",
            "    return (shadow_c,);",
            "};",
            "let ifFalse_1 = || {",
            "    let shadow_c = c;",
            "    shadow_c = 2;",
            "    return (shadow_c,);",
            "};",
            "let merge_1 = select(predicate_1, ifTrue_1, ifFalse_1);",
            "(c,) = merge_1;",
            "return c;",
            "",
        ]
        .join("\n");
        assert_eq!(lower_first(source).unwrap(), expected);
    }

    #[test]
    fn test_sibling_conditionals_get_consecutive_numbers() {
        let source = r#"
fn f(a: i32): i32 {
    let x = 0;
    if a > 0 { x = 1; } else { x = 2; }
    let y = 0;
    if a < 5 { y = 3; } else { y = 4; }
    return x + y;
}
"#;
        let text = lower_first(source).unwrap();
        assert!(text.contains("let merge_1 = select(predicate_1, ifTrue_1, ifFalse_1);"));
        assert!(text.contains("let merge_2 = select(predicate_2, ifTrue_2, ifFalse_2);"));
        assert!(!text.contains("merge_3"));
        // the second conditional sees only what precedes it in the lowered range
        assert!(text.contains("(y,) = merge_2;"));
    }

    #[test]
    fn test_missing_else_reports_its_number() {
        let source = r#"
fn f(a: i32): i32 {
    let x = 0;
    if a > 0 { x = 1; } else { x = 2; }
    if a > 1 { x = 3; }
    return x;
}
"#;
        let error = lower_first(source).unwrap_err();
        assert!(matches!(error, LoweringError::MissingElse { counter: 2, .. }), "{error:?}");
    }

    #[test]
    fn test_reserved_prefix_is_rejected() {
        let error = lower_first("fn f(): i32 { let merge_1 = 3; return merge_1; }").unwrap_err();
        assert!(
            matches!(&error, LoweringError::ReservedName { name, prefix: "merge_", .. } if name == "merge_1"),
            "{error:?}"
        );
    }

    #[test]
    fn test_reserved_prefix_on_parameter() {
        let error = lower_first("fn f(shadow_a: i32): i32 { return shadow_a; }").unwrap_err();
        assert!(matches!(error, LoweringError::ReservedName { prefix: "shadow_", .. }), "{error:?}");
    }
}
