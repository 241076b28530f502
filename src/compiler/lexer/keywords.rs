use crate::compiler::tokens::Keyword;

use super::Lexer;

impl<'a> Lexer<'a> {
    pub fn check_keywords(word: &str) -> Option<Keyword> {
        use crate::compiler::tokens::Keyword::*;

        const PATTERNS: &[(&str, Keyword)] = &[("fn", Fn), ("let", Let), ("if", If), ("else", Else), ("return", Return)];

        PATTERNS
            .iter()
            .find(|(pattern, _)| *pattern == word)
            .map(|(_, keyword)| *keyword)
    }
}
