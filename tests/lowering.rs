use std::fs;

use autograph::compiler::{
    LowerOptions, LoweredProgram, Settings, emit,
    error::CompileError,
    lower::{BranchRole, LoweringError, LoweringWarning},
    lower_source, parse,
};

fn fixture(path: &str) -> String {
    fs::read_to_string(format!("tests/fixtures/{path}")).unwrap()
}

fn lower(source: &str) -> LoweredProgram {
    lower_source(source, "test.ag", &LowerOptions::default()).unwrap()
}

fn lowering_errors(source: &str, options: &LowerOptions) -> Vec<LoweringError> {
    match lower_source(source, "test.ag", options) {
        Err(CompileError::Lowering(errors)) => errors,
        Err(other) => panic!("expected lowering errors, got {other:?}"),
        Ok(program) => panic!("expected lowering errors, got\n{}", program.source),
    }
}

fn implicit_else() -> LowerOptions {
    LowerOptions {
        implicit_else: true,
        ..LowerOptions::default()
    }
}

#[test]
fn test_straight_line_procedure() {
    let program = lower(&fixture("valid/straight.ag"));
    let expected = r#"fn add(a: i32, b: i32): i32 {
    let _a = placeholder(a);
    let _b = placeholder(b);
    return run(_add(_a, _b));
}

fn _add(a: symbolic, b: symbolic): symbolic {
    let c = a + b;
    return c;
}
"#;
    assert_eq!(program.source, expected);
    assert!(!program.source.contains("predicate_"));
    assert!(!program.source.contains("merge_"));
}

#[test]
fn test_unmarked_program_is_unchanged() {
    let source = "fn f(a: i32): i32 {\n    let b = a * 2;\n    if b > 3 {\n        return b;\n    }\n    return a;\n}\n";
    let program = lower(source);
    assert_eq!(program.source, source);
    assert_eq!(program.entry_points.get("f").map(String::as_str), Some("f"));
}

#[test]
fn test_single_conditional() {
    let program = lower(&fixture("valid/single.ag"));
    let expected = r#"fn f(a: i32, b: i32): i32 {
    let _a = placeholder(a);
    let _b = placeholder(b);
    return run(_f(_a, _b));
}

fn _f(a: symbolic, b: symbolic): symbolic {
    let c = a + b;
    let predicate_1 = c != 0;
    let ifTrue_1 = || {
        let shadow_c = c;
        shadow_c = graph_const(1);
        return (shadow_c,);
    };
    let ifFalse_1 = || {
        let shadow_c = c;
        shadow_c = graph_const(2);
        return (shadow_c,);
    };
    let merge_1 = select(predicate_1, ifTrue_1, ifFalse_1);
    (c,) = merge_1;
    return c;
}
"#;
    assert_eq!(program.source, expected);
}

#[test]
fn test_nested_conditional_without_else_is_rejected() {
    let errors = lowering_errors(&fixture("valid/nested.ag"), &LowerOptions::default());
    assert!(
        matches!(errors[..], [LoweringError::MissingElse { counter: 2, .. }]),
        "{errors:?}"
    );
}

#[test]
fn test_nested_conditional_is_lowered_inside_then_branch() {
    let program = lower_source(&fixture("valid/nested.ag"), "nested.ag", &implicit_else()).unwrap();
    let source = &program.source;

    let inner_merge = source
        .find("        let merge_2 = select(predicate_2, ifTrue_2, ifFalse_2);\n")
        .expect("inner merge inside the outer then branch");
    let outer_else = source.find("    let ifFalse_1 = || {\n").unwrap();
    let outer_merge = source.find("    let merge_1 = select(predicate_1, ifTrue_1, ifFalse_1);\n").unwrap();
    assert!(inner_merge < outer_else && outer_else < outer_merge);

    // the inner rebind targets the outer branch's shadow
    assert!(source.contains("        (shadow_c,) = merge_2;\n"));
    assert!(source.contains("    (c,) = merge_1;\n    return c;\n"));
    assert_eq!(source.matches("let merge_").count(), 2);
}

#[test]
fn test_merge_order_follows_declarations() {
    let program = lower(&fixture("valid/three_live.ag"));
    assert!(program.source.contains("    (x, y, z) = merge_1;\n"), "{}", program.source);
    assert!(program.source.contains("        return (shadow_x, shadow_y, shadow_z);\n"));
    assert!(
        program
            .source
            .contains("        let shadow_x = x;\n        let shadow_y = y;\n        let shadow_z = z;\n")
    );
    assert!(program.source.contains("        shadow_z -= graph_const(1);\n"));
}

#[test]
fn test_empty_live_set_produces_constant() {
    let source = r#"
fn log(v: i32): i32 { return v; }

#[autograph]
fn f(a: i32): i32 {
    if a > 0 {
        log(1);
    } else {
        log(2);
    }
    return a;
}
"#;
    let program = lower(source);
    assert_eq!(program.source.matches("        return graph_const(1);\n").count(), 2);
    assert!(program.source.contains("    (_,) = merge_1;\n"));
}

#[test]
fn test_branch_local_declarations_are_not_merged() {
    let source = r#"
#[autograph]
fn f(a: i32): i32 {
    let c = 0;
    if a > 0 {
        let t = a * 2;
        c = t;
    } else {
        let t = 5;
        c = t;
    }
    return c;
}
"#;
    let program = lower(source);
    assert!(program.source.contains("    (c,) = merge_1;\n"), "{}", program.source);
    assert!(!program.source.contains("shadow_t"));
}

#[test]
fn test_counters_are_unique_across_program() {
    let program = lower(&fixture("valid/program.ag"));
    for n in 1..=4 {
        let merge = format!("let merge_{n} = select(predicate_{n}, ifTrue_{n}, ifFalse_{n});");
        assert_eq!(program.source.matches(&merge).count(), 1, "{merge}\n{}", program.source);
    }
    assert!(!program.source.contains("merge_5"));
}

#[test]
fn test_custom_prefixes() {
    let program = lower(&fixture("valid/program.ag"));
    assert_eq!(program.entry_points.get("score").map(String::as_str), Some("graph_score"));
    assert_eq!(program.entry_points.get("clamp").map(String::as_str), Some("clamp"));
    assert!(program.source.contains("fn graph_score(a: i32, b: i32): i32 {\n    let auto_a = placeholder(a);\n"));
    assert!(program.source.contains("    return run(auto_score(auto_a, auto_b));\n"));
    assert!(program.source.contains("fn auto_score(a: symbolic, b: symbolic): symbolic {\n"));
    // unmarked procedures keep their conditionals
    assert!(program.source.contains("fn clamp(v: i32, lo: i32, hi: i32): i32 {\n    if v < lo {\n        return lo;\n    }\n"));
}

#[test]
fn test_default_settings_apply_to_bare_marker() {
    let options = LowerOptions {
        default_settings: Settings {
            prefix: "wrap_".to_string(),
            auto_prefix: "lowered_".to_string(),
        },
        ..LowerOptions::default()
    };
    let program = lower_source(&fixture("valid/straight.ag"), "straight.ag", &options).unwrap();
    assert!(program.source.contains("fn wrap_add(a: i32, b: i32): i32 {"));
    assert!(program.source.contains("fn lowered_add(a: symbolic, b: symbolic): symbolic {"));
    assert_eq!(program.entry_points.get("add").map(String::as_str), Some("wrap_add"));
}

#[test]
fn test_all_procedures_option() {
    let options = LowerOptions {
        all_procedures: true,
        implicit_else: true,
        ..LowerOptions::default()
    };
    let program = lower_source(&fixture("valid/program.ag"), "program.ag", &options).unwrap();
    assert!(program.source.contains("fn _clamp(v: symbolic, lo: symbolic, hi: symbolic): symbolic {"));
    assert!(!program.source.contains("    if v < lo {"));
}

#[test]
fn test_passes_can_be_disabled() {
    let options = LowerOptions {
        promote_literals: false,
        normalize_declarations: false,
        ..LowerOptions::default()
    };
    let source = "#[autograph]\nfn f(a: i32): i32 {\n    let c: i32 = 1;\n    return a + c;\n}\n";
    let program = lower_source(source, "test.ag", &options).unwrap();
    assert!(program.source.contains("    let c: i32 = 1;\n"), "{}", program.source);

    let program = lower(source);
    assert!(program.source.contains("    let c = graph_const(1);\n"), "{}", program.source);
}

#[test]
fn test_original_tree_is_untouched() {
    let source = fixture("valid/program.ag");
    let program = lower(&source);
    let frontend = parse(&source, "program.ag").unwrap();
    assert_eq!(
        emit::render(&program.original, &program.tree, &program.interner),
        emit::render(&frontend.root, &frontend.tree, &frontend.interner)
    );
}

#[test]
fn test_missing_else_fixture() {
    let errors = lowering_errors(&fixture("invalid/missing_else.ag"), &LowerOptions::default());
    assert!(matches!(errors[..], [LoweringError::MissingElse { counter: 1, .. }]), "{errors:?}");
    assert!(lower_source(&fixture("invalid/missing_else.ag"), "test.ag", &implicit_else()).is_ok());
}

#[test]
fn test_reserved_name_fixture() {
    let errors = lowering_errors(&fixture("invalid/reserved.ag"), &LowerOptions::default());
    assert!(
        matches!(&errors[..], [LoweringError::ReservedName { name, prefix: "predicate_", .. }] if name == "predicate_1"),
        "{errors:?}"
    );
}

#[test]
fn test_reserved_names_in_unmarked_procedures_are_allowed() {
    assert!(lower_source("fn f(): i32 { let merge_1 = 1; return merge_1; }", "test.ag", &LowerOptions::default()).is_ok());
}

#[test]
fn test_equal_prefixes_collide() {
    let source = "#[autograph(prefix = \"p_\", auto_prefix = \"p_\")]\nfn f(a: i32): i32 { return a; }";
    let errors = lowering_errors(source, &LowerOptions::default());
    assert!(
        matches!(&errors[..], [LoweringError::PrefixCollision { name, .. }] if name == "p_f"),
        "{errors:?}"
    );
}

#[test]
fn test_generated_name_collides_with_existing_procedure() {
    let source = "fn _f(a: i32): i32 { return a; }\n#[autograph]\nfn f(a: i32): i32 { return a; }";
    let errors = lowering_errors(source, &LowerOptions::default());
    assert!(
        matches!(&errors[..], [LoweringError::PrefixCollision { procedure, name, .. }] if procedure == "f" && name == "_f"),
        "{errors:?}"
    );
}

#[test]
fn test_explicit_return_arity_is_checked() {
    let source = r#"
#[autograph]
fn f(a: i32): i32 {
    let c = 0;
    if a > 0 {
        c = 1;
        return;
    } else {
        c = 2;
    }
    return c;
}
"#;
    let errors = lowering_errors(source, &LowerOptions::default());
    assert!(
        matches!(
            errors[..],
            [LoweringError::ArityMismatch {
                counter: 1,
                branch: BranchRole::Then,
                expected: 1,
                found: 0,
                ..
            }]
        ),
        "{errors:?}"
    );
}

#[test]
fn test_explicit_return_of_matching_arity_is_kept() {
    let source = r#"
#[autograph]
fn f(a: i32): i32 {
    let c = 0;
    if a > 0 {
        return a;
    } else {
        c = 2;
    }
    return c;
}
"#;
    let program = lower(source);
    assert!(program.source.contains("        let shadow_c = c;\n        return a;\n    };\n"), "{}", program.source);
    assert!(
        matches!(
            program.warnings.as_slice(),
            [LoweringWarning::BranchReturn {
                counter: 1,
                branch: BranchRole::Then,
                ..
            }]
        ),
        "{:?}",
        program.warnings
    );
}

#[test]
fn test_else_only_assignment_is_reported() {
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
    let program = lower(source);
    assert!(program.source.contains("    (a,) = merge_2;\n"), "{}", program.source);
    assert_eq!(program.warnings.len(), 1, "{:?}", program.warnings);
    assert!(matches!(
        &program.warnings[0],
        LoweringWarning::UnmergedAssignments { counter: 2, names, .. } if names == &["x"]
    ));
}

#[test]
fn test_fully_merged_conditionals_have_no_warnings() {
    for path in ["valid/single.ag", "valid/three_live.ag", "valid/program.ag"] {
        let program = lower(&fixture(path));
        assert!(program.warnings.is_empty(), "{path}: {:?}", program.warnings);
    }
}

#[test]
fn test_shadows_of_same_named_variables_stay_distinct() {
    let source = r#"
#[autograph]
fn f(a: i32): i32 {
    let x = a;
    let x = x + 1;
    if a > 0 {
        x = 2;
    } else {
        x += 3;
    }
    return x;
}
"#;
    let program = lower(source);
    let then_body = "        let shadow_x = x;\n        let shadow_x_2 = x;\n        shadow_x_2 = graph_const(2);\n        return (shadow_x, shadow_x_2);\n";
    assert!(program.source.contains(then_body), "{}", program.source);
    assert!(program.source.contains("        shadow_x_2 += graph_const(3);\n"), "{}", program.source);
    assert!(program.source.contains("    (x, x) = merge_1;\n"), "{}", program.source);
}

#[test]
fn test_every_failing_procedure_is_reported() {
    let source = "#[autograph]\nfn f(a: i32) { if a > 0 { a = 1; } }\n#[autograph]\nfn g(a: i32) { if a > 0 { a = 1; } }";
    let errors = lowering_errors(source, &LowerOptions::default());
    assert_eq!(errors.len(), 2);
}
