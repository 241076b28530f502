use crate::compiler::tokens::PrimitiveTypes;

use super::Lexer;

impl<'a> Lexer<'a> {
    pub fn check_type_literals(word: &str) -> Option<PrimitiveTypes> {
        use crate::compiler::tokens::PrimitiveTypes::*;

        const PATTERNS: &[(&str, PrimitiveTypes)] = &[
            ("i32", I32),
            ("i64", I64),
            ("f32", F32),
            ("f64", F64),
            ("bool", Bool),
            ("symbolic", Symbolic),
        ];

        PATTERNS.iter().find(|(pattern, _)| *pattern == word).map(|(_, ty)| *ty)
    }
}
