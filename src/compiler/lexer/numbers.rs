use crate::compiler::tokens::{Token, TokenKind};

use super::{Lexer, error::LexError};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberBase {
    Decimal,
    Hex,
    Binary,
    Octal,
}

impl NumberBase {
    fn radix(self) -> u32 {
        match self {
            NumberBase::Decimal => 10,
            NumberBase::Hex => 16,
            NumberBase::Binary => 2,
            NumberBase::Octal => 8,
        }
    }
}

impl<'a> Lexer<'a> {
    pub fn lex_number(&mut self) {
        let start = self.cursor;
        let mut base = NumberBase::Decimal;
        let mut float = false;
        let mut digits = String::new();

        if self.peek() == Some('0') {
            let prefixed = match self.peek_at(1) {
                Some('x') => Some(NumberBase::Hex),
                Some('b') => Some(NumberBase::Binary),
                Some('o') => Some(NumberBase::Octal),
                _ => None,
            };
            if let Some(prefixed) = prefixed {
                base = prefixed;
                self.bump();
                self.bump();
            }
        }

        while let Some(c) = self.peek() {
            if c == '_' {
                self.bump();
            } else if c.is_digit(base.radix()) {
                digits.push(c);
                self.bump();
            } else if c == '.' && !float && self.peek_at(1).is_some_and(|next| next.is_ascii_digit()) {
                float = true;
                digits.push(c);
                self.bump();
            } else {
                break;
            }
        }

        let span = self.span_from(start);
        let display = span.to_display(self.interner());

        if float {
            if base != NumberBase::Decimal {
                self.errors.push(LexError::NonDecimalFloat { span: display });
                return;
            }
            match digits.parse::<f64>() {
                Ok(n) => self.tokens.push(Token::new(TokenKind::FloatLiteral(n), span)),
                Err(source) => self.errors.push(LexError::InvalidFloat {
                    value: digits,
                    span: display,
                    source,
                }),
            }
        } else {
            match i64::from_str_radix(&digits, base.radix()) {
                Ok(n) => self.tokens.push(Token::new(TokenKind::IntLiteral(n), span)),
                Err(source) => self.errors.push(LexError::InvalidInteger {
                    value: digits,
                    span: display,
                    source,
                }),
            }
        }
    }
}
