use std::collections::BTreeSet;

use autograph::compiler::{
    LowerOptions, LoweredProgram, emit,
    lower::LoweringWarning,
    lower_source,
    runtime::{Interpreter, Value},
};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Stmt {
    Assign(&'static str, &'static str, String),
    Step(&'static str),
    Local(&'static str, String),
    If(String, Vec<Stmt>, Vec<Stmt>),
}

impl Stmt {
    fn render(&self, depth: usize, out: &mut String) {
        let indent = "    ".repeat(depth);
        match self {
            Stmt::Assign(target, op, value) => out.push_str(&format!("{indent}{target} {op} {value};\n")),
            Stmt::Step(target) => out.push_str(&format!("{indent}{target}++;\n")),
            Stmt::Local(target, value) => {
                out.push_str(&format!("{indent}let t = {value};\n"));
                out.push_str(&format!("{indent}{target} += t;\n"));
            }
            Stmt::If(cond, then_block, else_block) => {
                out.push_str(&format!("{indent}if {cond} {{\n"));
                for stmt in then_block {
                    stmt.render(depth + 1, out);
                }
                out.push_str(&format!("{indent}}} else {{\n"));
                for stmt in else_block {
                    stmt.render(depth + 1, out);
                }
                out.push_str(&format!("{indent}}}\n"));
            }
        }
    }

    /// Targets written anywhere in the statement.
    fn targets(&self, out: &mut BTreeSet<&'static str>) {
        match self {
            Stmt::Assign(target, ..) | Stmt::Step(target) | Stmt::Local(target, _) => {
                out.insert(*target);
            }
            Stmt::If(_, then_block, else_block) => {
                for stmt in then_block.iter().chain(else_block) {
                    stmt.targets(out);
                }
            }
        }
    }

    /// Makes every then-branch write at least what its else-branch writes, so
    /// no else-branch assignment falls outside the merge.
    fn balanced(self) -> Stmt {
        let Stmt::If(cond, then_block, else_block) = self else {
            return self;
        };
        let mut then_block: Vec<Stmt> = then_block.into_iter().map(Stmt::balanced).collect();
        let else_block: Vec<Stmt> = else_block.into_iter().map(Stmt::balanced).collect();
        let (mut written, mut needed) = (BTreeSet::new(), BTreeSet::new());
        then_block.iter().for_each(|stmt| stmt.targets(&mut written));
        else_block.iter().for_each(|stmt| stmt.targets(&mut needed));
        for target in needed.difference(&written) {
            then_block.push(Stmt::Assign(*target, "+=", "0".to_string()));
        }
        Stmt::If(cond, then_block, else_block)
    }

    fn conditionals(&self) -> usize {
        match self {
            Stmt::If(_, then_block, else_block) => 1 + count(then_block) + count(else_block),
            _ => 0,
        }
    }
}

fn count(stmts: &[Stmt]) -> usize {
    stmts.iter().map(Stmt::conditionals).sum()
}

fn source(stmts: &[Stmt], marked: bool) -> String {
    let mut out = String::new();
    if marked {
        out.push_str("#[autograph]\n");
    }
    out.push_str("fn f(a: i32, b: i32): i32 {\n    let x = a;\n    let y = b;\n    let z = 0;\n");
    for stmt in stmts {
        stmt.render(1, &mut out);
    }
    out.push_str("    return x * 7 + y * 3 + z;\n}\n");
    out
}

/// The results of `f(a, b)` in the original and the lowered program, and the
/// number of selects the lowered one ran.
fn evaluate(program: &LoweredProgram, a: i64, b: i64) -> (Value, Value, usize) {
    let args = vec![Value::Int(a), Value::Int(b)];
    let expected = Interpreter::new(&program.original, &program.tree, &program.interner)
        .call("f", args.clone())
        .unwrap();
    let mut lowered = Interpreter::new(&program.lowered, &program.tree, &program.interner);
    let actual = lowered.call("f", args).unwrap();
    let stats = lowered.stats();
    assert_eq!(stats.selects, stats.deferred_calls);
    (expected, actual, stats.selects)
}

fn operand() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(vec!["a", "b", "x", "y", "z"]).prop_map(|name| name.to_string()),
        (0i64..6).prop_map(|value| value.to_string()),
    ]
}

fn expr() -> impl Strategy<Value = String> {
    prop_oneof![
        operand(),
        (operand(), prop::sample::select(vec!["+", "-", "*"]), operand()).prop_map(|(l, op, r)| format!("{l} {op} {r}")),
    ]
}

fn target() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["x", "y", "z"])
}

fn stmt() -> impl Strategy<Value = Stmt> {
    let leaf = prop_oneof![
        (target(), prop::sample::select(vec!["=", "+=", "-="]), expr()).prop_map(|(t, op, e)| Stmt::Assign(t, op, e)),
        target().prop_map(Stmt::Step),
        (target(), expr()).prop_map(|(t, e)| Stmt::Local(t, e)),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        let cond = (operand(), prop::sample::select(vec!["<", ">", "==", "!="]), operand())
            .prop_map(|(l, op, r)| format!("{l} {op} {r}"));
        (
            cond,
            prop::collection::vec(inner.clone(), 0..4),
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(cond, then_block, else_block)| Stmt::If(cond, then_block, else_block))
    })
}

fn straight_line() -> impl Strategy<Value = Stmt> {
    prop_oneof![
        (target(), prop::sample::select(vec!["=", "+=", "-="]), expr()).prop_map(|(t, op, e)| Stmt::Assign(t, op, e)),
        target().prop_map(Stmt::Step),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn lowering_preserves_results(
        stmts in prop::collection::vec(stmt().prop_map(Stmt::balanced), 0..5),
        a in -10i64..10,
        b in -10i64..10,
    ) {
        let source = source(&stmts, true);
        let program = lower_source(&source, "prop.ag", &LowerOptions::default()).unwrap();
        prop_assert!(program.warnings.is_empty(), "{:?}", program.warnings);

        let (expected, actual, selects) = evaluate(&program, a, b);
        prop_assert_eq!(actual, expected, "{}", program.source);
        prop_assert!(selects <= count(&stmts));
    }

    #[test]
    fn only_reported_conditionals_change_results(
        stmts in prop::collection::vec(stmt(), 0..5),
        a in -10i64..10,
        b in -10i64..10,
    ) {
        let source = source(&stmts, true);
        let program = lower_source(&source, "prop.ag", &LowerOptions::default()).unwrap();

        let (expected, actual, _) = evaluate(&program, a, b);
        if actual != expected {
            prop_assert!(
                program
                    .warnings
                    .iter()
                    .any(|warning| matches!(warning, LoweringWarning::UnmergedAssignments { .. })),
                "{}",
                program.source
            );
        }
    }

    #[test]
    fn every_conditional_gets_its_own_number(stmts in prop::collection::vec(stmt(), 0..5)) {
        let source = source(&stmts, true);
        let program = lower_source(&source, "prop.ag", &LowerOptions::default()).unwrap();

        let total = count(&stmts);
        prop_assert_eq!(program.source.matches("let merge_").count(), total);
        for n in 1..=total {
            let merge = format!("let merge_{n} = select(predicate_{n}, ifTrue_{n}, ifFalse_{n});");
            prop_assert_eq!(program.source.matches(&merge).count(), 1);
        }
        prop_assert!(!program.source.contains(" if "));
    }

    #[test]
    fn straight_line_bodies_are_unchanged(stmts in prop::collection::vec(straight_line(), 0..6)) {
        let options = LowerOptions {
            all_procedures: true,
            promote_literals: false,
            ..LowerOptions::default()
        };
        let program = lower_source(&source(&stmts, false), "prop.ag", &options).unwrap();
        let original = emit::render(&program.original, &program.tree, &program.interner);
        let expected = original.replacen("fn f(a: i32, b: i32): i32", "fn _f(a: symbolic, b: symbolic): symbolic", 1);
        prop_assert!(program.source.ends_with(&expected), "{}", program.source);
    }
}
