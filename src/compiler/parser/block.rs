use generational_arena::Index;

use crate::compiler::tokens::{Punctuation, Span, TokenKind};

use super::{Parser, error::ParserError};

impl<'a> Parser<'a> {
    /// Parses `{ stmt* }` and returns the statements with the span of the braces.
    pub fn parse_block_body(&mut self) -> Result<(Vec<Index>, Span), ParserError> {
        let start_span = self.expect_punct(Punctuation::OpenBrace, "opening brace '{'")?.span;

        let mut statements = Vec::new();

        while !self.is_punct(Punctuation::CloseBrace) && self.current().kind != TokenKind::Eof {
            statements.push(self.parse_statement()?);
        }

        let end_span = self.expect_punct(Punctuation::CloseBrace, "closing brace '}'")?.span;

        Ok((statements, start_span.connect_new(&end_span)))
    }
}
