use string_interner::symbol::SymbolUsize;

use super::{
    Interner,
    tokens::{Span, Token, TokenKind},
};

mod bool_literals;
pub mod error;
mod keywords;
mod numbers;
mod punctuation;
mod strings;
mod type_literals;

use error::LexError;

pub trait LexedChar {
    fn is_valid_ident_start(&self) -> bool;
    fn is_valid_ident_char(&self) -> bool;
}

impl LexedChar for char {
    fn is_valid_ident_start(&self) -> bool {
        self.is_ascii_alphabetic() || *self == '_'
    }

    fn is_valid_ident_char(&self) -> bool {
        self.is_ascii_alphanumeric() || *self == '_'
    }
}

/// 1-based line and column of the next character to be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub line: usize,
    pub col: usize,
}

pub struct Lexer<'a> {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexError>,
    pub cursor: Cursor,
    interner: &'a mut Interner,
    file: SymbolUsize,
    chars: Vec<char>,
    pos: usize,
    /// position of the most recently consumed character
    last: Cursor,
}

impl<'a> Lexer<'a> {
    pub fn new(interner: &'a mut Interner, file: SymbolUsize) -> Self {
        Self {
            tokens: Vec::new(),
            errors: Vec::new(),
            cursor: Cursor { line: 1, col: 1 },
            interner,
            file,
            chars: Vec::new(),
            pos: 0,
            last: Cursor { line: 1, col: 1 },
        }
    }

    pub fn interner(&self) -> &Interner {
        &*self.interner
    }

    /// Tokenizes the whole input and terminates the stream with `Eof`.
    pub fn tokenize(&mut self, chars: Vec<char>) {
        self.tokens.reserve(chars.len() / 4);
        self.chars = chars;
        self.pos = 0;

        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.bump();
            } else if c == '/' && self.peek_at(1) == Some('/') {
                self.skip_line_comment();
            } else if c == '/' && self.peek_at(1) == Some('*') {
                self.skip_block_comment();
            } else if c.is_ascii_digit() {
                self.lex_number();
            } else if c.is_valid_ident_start() {
                self.lex_word();
            } else if c == '"' {
                self.lex_string();
            } else if !self.check_punctuation() {
                let start = self.cursor;
                self.bump();
                let span = self.span_from(start).to_display(self.interner());
                self.errors.push(LexError::UnexpectedCharacter { character: c, span });
            }
        }

        let end = self.cursor;
        let span = self.create_span(end, end);
        self.tokens.push(Token::new(TokenKind::Eof, span));
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        self.last = self.cursor;
        if c == '\n' {
            self.cursor.line += 1;
            self.cursor.col = 1;
        } else {
            self.cursor.col += 1;
        }
        Some(c)
    }

    pub(crate) fn create_span(&self, start: Cursor, end: Cursor) -> Span {
        Span::new(self.file, start.line, start.col, end.line, end.col)
    }

    /// span from `start` up to and including the last consumed character
    pub(crate) fn span_from(&self, start: Cursor) -> Span {
        self.create_span(start, self.last)
    }

    fn lex_word(&mut self) {
        let start = self.cursor;
        let mut word = String::new();
        while let Some(c) = self.peek()
            && c.is_valid_ident_char()
        {
            word.push(c);
            self.bump();
        }
        let span = self.span_from(start);

        let kind = if let Some(keyword) = Self::check_keywords(&word) {
            TokenKind::Keyword(keyword)
        } else if let Some(value) = Self::check_bool(&word) {
            TokenKind::BoolLiteral(value)
        } else if let Some(ty) = Self::check_type_literals(&word) {
            TokenKind::TypeLiteral(ty)
        } else {
            TokenKind::Identifier(self.interner.get_or_intern(&word))
        };
        self.tokens.push(Token::new(kind, span));
    }

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.bump() {
            if c == '\n' {
                break;
            }
        }
    }

    fn skip_block_comment(&mut self) {
        let start = self.cursor;
        self.bump();
        self.bump();
        loop {
            match self.bump() {
                Some('*') if self.peek() == Some('/') => {
                    self.bump();
                    return;
                }
                Some(_) => {}
                None => {
                    let span = self.span_from(start).to_display(self.interner());
                    self.errors.push(LexError::UnterminatedComment { span });
                    return;
                }
            }
        }
    }
}
