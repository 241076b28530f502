use crate::compiler::tokens::{Token, TokenKind};

use super::{Lexer, error::LexError};

impl<'a> Lexer<'a> {
    /// Strings only occur as marker arguments, so no escapes beyond `\"` and `\\`.
    pub fn lex_string(&mut self) {
        let start = self.cursor;
        self.bump(); // consume opening quote

        let mut value = String::new();
        loop {
            match self.bump() {
                Some('"') => break,
                Some('\\') => match self.bump() {
                    Some(escaped) => value.push(escaped),
                    None => {
                        let span = self.span_from(start).to_display(self.interner());
                        self.errors.push(LexError::UnterminatedString { span });
                        return;
                    }
                },
                Some('\n') | None => {
                    let span = self.span_from(start).to_display(self.interner());
                    self.errors.push(LexError::UnterminatedString { span });
                    return;
                }
                Some(c) => value.push(c),
            }
        }

        let span = self.span_from(start);
        let symbol = self.interner.get_or_intern(&value);
        self.tokens.push(Token::new(TokenKind::StringLiteral(symbol), span));
    }
}
