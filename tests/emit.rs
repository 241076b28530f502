use autograph::compiler::{
    LowerOptions, emit, lower_source, parse,
    runtime::{Interpreter, Value},
};

const SOURCE: &str = r#"
fn f(a: i32, p: bool): i32 {
    let b = -(-a);
    let c = -(--a);
    let q = !(!p);
    let big = 100000000000000000000.0;
    let small = 0.0000001;
    if q {
        return b + c;
    } else {
        return -b * c;
    }
}
"#;

#[test]
fn test_nested_prefix_operators_keep_their_parentheses() {
    let program = lower_source(SOURCE, "test.ag", &LowerOptions::default()).unwrap();
    for line in [
        "    let b = -(-a);\n",
        "    let c = -(--a);\n",
        "    let q = !(!p);\n",
        "    let big = 100000000000000000000.0;\n",
        "    let small = 0.0000001;\n",
        "        return -b * c;\n",
    ] {
        assert!(program.source.contains(line), "missing {line:?} in\n{}", program.source);
    }
}

#[test]
fn test_printed_program_reparses_to_itself() {
    let program = lower_source(SOURCE, "test.ag", &LowerOptions::default()).unwrap();
    let reparsed = parse(&program.source, "printed.ag").unwrap();
    assert_eq!(emit::render(&reparsed.root, &reparsed.tree, &reparsed.interner), program.source);

    for a in [5, -3, 0] {
        for p in [true, false] {
            let args = vec![Value::Int(a), Value::Bool(p)];
            let expected = Interpreter::new(&program.original, &program.tree, &program.interner)
                .call("f", args.clone())
                .unwrap();
            let actual = Interpreter::new(&reparsed.root, &reparsed.tree, &reparsed.interner)
                .call("f", args)
                .unwrap();
            assert_eq!(actual, expected, "f({a}, {p})");
        }
    }
}
