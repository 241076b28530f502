use std::fs;

use autograph::compiler::{
    LowerOptions, LoweredProgram, lower_source, parse,
    runtime::{Interpreter, RuntimeError, Stats, Value},
};

fn program(path: &str, options: &LowerOptions) -> LoweredProgram {
    let source = fs::read_to_string(format!("tests/fixtures/valid/{path}")).unwrap();
    lower_source(&source, path, options).unwrap()
}

/// Evaluates `entry` in the original and the lowered program.
fn evaluate(program: &LoweredProgram, entry: &str, args: &[i64]) -> (Value, Value, Stats) {
    let args: Vec<Value> = args.iter().copied().map(Value::Int).collect();
    let mut original = Interpreter::new(&program.original, &program.tree, &program.interner);
    let expected = original.call(entry, args.clone()).unwrap();

    let lowered_entry = &program.entry_points[entry];
    let mut lowered = Interpreter::new(&program.lowered, &program.tree, &program.interner);
    let actual = lowered.call(lowered_entry, args).unwrap();
    (expected, actual, lowered.stats())
}

#[test]
fn test_single_conditional_preserves_results() {
    let program = program("single.ag", &LowerOptions::default());
    for (a, b, result) in [(1, 2, 1), (-3, 3, 2), (0, 0, 2), (5, -9, 1)] {
        let (expected, actual, _) = evaluate(&program, "f", &[a, b]);
        assert_eq!(expected, Value::Int(result));
        assert_eq!(actual, expected, "f({a}, {b})");
    }
}

#[test]
fn test_select_runs_exactly_one_branch() {
    let program = program("single.ag", &LowerOptions::default());
    let (_, _, stats) = evaluate(&program, "f", &[1, 2]);
    assert_eq!(
        stats,
        Stats {
            calls: 2,
            selects: 1,
            deferred_calls: 1,
        }
    );
}

#[test]
fn test_nested_conditional_preserves_results() {
    let options = LowerOptions {
        implicit_else: true,
        ..LowerOptions::default()
    };
    let program = program("nested.ag", &options);

    let (expected, actual, stats) = evaluate(&program, "f", &[3, 1]);
    assert_eq!(expected, Value::Int(5));
    assert_eq!(actual, expected);
    assert_eq!((stats.selects, stats.deferred_calls), (2, 2));

    let (expected, actual, stats) = evaluate(&program, "f", &[-5, 1]);
    assert_eq!(expected, Value::Int(-3));
    assert_eq!(actual, expected);
    assert_eq!((stats.selects, stats.deferred_calls), (1, 1));

    for a in -4..4 {
        for b in -4..4 {
            let (expected, actual, _) = evaluate(&program, "f", &[a, b]);
            assert_eq!(actual, expected, "f({a}, {b})");
        }
    }
}

#[test]
fn test_three_live_variables_preserve_results() {
    let program = program("three_live.ag", &LowerOptions::default());
    let (expected, actual, _) = evaluate(&program, "mix", &[5, 2]);
    assert_eq!(expected, Value::Int(251));
    assert_eq!(actual, expected);
    let (expected, actual, _) = evaluate(&program, "mix", &[1, 2]);
    assert_eq!(expected, Value::Int(119));
    assert_eq!(actual, expected);
}

#[test]
fn test_program_with_helper_preserves_results() {
    let program = program("program.ag", &LowerOptions::default());
    for (a, b, result) in [(20, 3, 13), (5, 3, 7), (4, 4, 1), (1, 9, 5)] {
        let (expected, actual, _) = evaluate(&program, "score", &[a, b]);
        assert_eq!(expected, Value::Int(result), "score({a}, {b})");
        assert_eq!(actual, expected, "score({a}, {b})");
    }
}

#[test]
fn test_deferred_body_writes_stay_inside_it() {
    let source = r#"
#[autograph]
fn f(a: i32): i32 {
    let x = 1;
    if a > 0 {
        x = 2;
    } else {
        x = 3;
    }
    if a > 5 {
        a += 1;
    } else {
        x = 9;
    }
    return x;
}
"#;
    let program = lower_source(source, "test.ag", &LowerOptions::default()).unwrap();
    assert_eq!(program.warnings.len(), 1);

    // `x = 9` is not merged back, so only the original sees it
    let (expected, actual, _) = evaluate(&program, "f", &[1]);
    assert_eq!(expected, Value::Int(9));
    assert_eq!(actual, Value::Int(2));

    let (expected, actual, _) = evaluate(&program, "f", &[7]);
    assert_eq!(expected, Value::Int(2));
    assert_eq!(actual, expected);
}

#[test]
fn test_division_by_zero() {
    let frontend = parse("fn f(a: i32): i32 { return 10 / a; }", "test.ag").unwrap();
    let mut interpreter = Interpreter::new(&frontend.root, &frontend.tree, &frontend.interner);
    assert_eq!(interpreter.call("f", vec![Value::Int(2)]).unwrap(), Value::Int(5));
    let error = interpreter.call("f", vec![Value::Int(0)]).unwrap_err();
    assert!(matches!(error, RuntimeError::DivisionByZero { .. }), "{error:?}");
}

#[test]
fn test_call_errors() {
    let frontend = parse("fn f(a: i32): i32 { return a; } fn g(): i32 { }", "test.ag").unwrap();
    let mut interpreter = Interpreter::new(&frontend.root, &frontend.tree, &frontend.interner);
    assert!(matches!(
        interpreter.call("nope", vec![]),
        Err(RuntimeError::UnknownFunction { name }) if name == "nope"
    ));
    assert!(matches!(
        interpreter.call("f", vec![]),
        Err(RuntimeError::ArgumentCount { expected: 1, found: 0, .. })
    ));
    assert!(matches!(interpreter.call("g", vec![]), Err(RuntimeError::MissingReturn { .. })));
}

#[test]
fn test_type_mismatch() {
    let frontend = parse("fn f(a: bool): i32 { return a + 1; }", "test.ag").unwrap();
    let mut interpreter = Interpreter::new(&frontend.root, &frontend.tree, &frontend.interner);
    let error = interpreter.call("f", vec![Value::Bool(true)]).unwrap_err();
    assert!(matches!(error, RuntimeError::TypeMismatch { .. }), "{error:?}");
}

#[test]
fn test_procedure_without_return_type_yields_unit() {
    let frontend = parse("fn f(a: i32) { a += 1; }", "test.ag").unwrap();
    let mut interpreter = Interpreter::new(&frontend.root, &frontend.tree, &frontend.interner);
    assert_eq!(interpreter.call("f", vec![Value::Int(1)]).unwrap(), Value::unit());
}
