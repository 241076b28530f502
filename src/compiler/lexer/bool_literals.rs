use super::Lexer;

impl<'a> Lexer<'a> {
    pub fn check_bool(word: &str) -> Option<bool> {
        const PATTERNS: &[(&str, bool)] = &[("true", true), ("false", false)];

        PATTERNS.iter().find(|(pattern, _)| *pattern == word).map(|(_, value)| *value)
    }
}
