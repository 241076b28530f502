use std::fmt::{self, Display};
use thiserror::Error;

use crate::compiler::{
    Interner,
    tokens::{DisplaySpan, Span},
};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexError {
    #[error("Unexpected character '{character}'")]
    UnexpectedCharacter { character: char, span: DisplaySpan },

    #[error("Unterminated string literal")]
    UnterminatedString { span: DisplaySpan },

    #[error("Unterminated block comment")]
    UnterminatedComment { span: DisplaySpan },

    #[error("Invalid float '{value}'")]
    InvalidFloat {
        value: String,
        span: DisplaySpan,
        #[source]
        source: std::num::ParseFloatError,
    },

    #[error("Invalid integer '{value}'")]
    InvalidInteger {
        value: String,
        span: DisplaySpan,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("Non-decimal float")]
    NonDecimalFloat { span: DisplaySpan },
}

impl Span {
    pub fn to_display(&self, interner: &Interner) -> DisplaySpan {
        DisplaySpan {
            file: interner.resolve(self.file).unwrap_or("<unknown>").to_string(),
            start: self.start,
            end: self.end,
        }
    }
}

impl Display for DisplaySpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}-{}", self.file, self.start.0, self.start.1, self.end.1)
    }
}

impl LexError {
    pub fn span(&self) -> &DisplaySpan {
        match self {
            LexError::UnexpectedCharacter { span, .. }
            | LexError::UnterminatedString { span }
            | LexError::UnterminatedComment { span }
            | LexError::InvalidFloat { span, .. }
            | LexError::InvalidInteger { span, .. }
            | LexError::NonDecimalFloat { span } => span,
        }
    }
}
