use thiserror::Error;

use crate::compiler::tokens::DisplaySpan;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParserError {
    #[error("Unexpected {what}")]
    Unexpected { what: String, span: DisplaySpan },

    #[error("Expected {what}, got {got}")]
    Expected { what: String, got: String, span: DisplaySpan },

    #[error("Invalid {what}: {reason}")]
    Invalid {
        what: String,
        reason: String,
        span: DisplaySpan,
    },

    #[error("Node not found: {what}")]
    NotFound { what: String, span: DisplaySpan },
}

impl ParserError {
    pub fn span(&self) -> &DisplaySpan {
        match self {
            ParserError::Unexpected { span, .. }
            | ParserError::Expected { span, .. }
            | ParserError::Invalid { span, .. }
            | ParserError::NotFound { span, .. } => span,
        }
    }

    pub fn help(&self) -> &'static str {
        match self {
            ParserError::Unexpected { .. } => "Check the syntax at this location",
            ParserError::Expected { .. } => "Check the syntax - the parser expected something different here",
            ParserError::Invalid { .. } => "This construct is not valid in the current context",
            ParserError::NotFound { .. } => "This is likely a parser bug - please report it",
        }
    }
}
