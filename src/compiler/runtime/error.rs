use thiserror::Error;

use crate::compiler::tokens::DisplaySpan;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("Division by zero")]
    DivisionByZero { span: DisplaySpan },

    #[error("Cannot apply '{op}' to {found}")]
    TypeMismatch { op: String, found: String, span: DisplaySpan },

    #[error("Expected {expected} value(s), got {found}")]
    ArityMismatch {
        expected: usize,
        found: usize,
        span: DisplaySpan,
    },

    #[error("Unknown function '{name}'")]
    UnknownFunction { name: String },

    #[error("Function '{name}' expects {expected} argument(s), got {found}")]
    ArgumentCount { name: String, expected: usize, found: usize },

    #[error("'{name}' finished without returning a value")]
    MissingReturn { name: String },

    #[error("'{name}' is read before it has a value")]
    UnboundVariable { name: String, span: DisplaySpan },

    #[error("Call depth exceeded {limit} in '{name}'")]
    RecursionLimit { name: String, limit: usize },

    #[error("Invalid argument '{value}'")]
    InvalidArgument { value: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RuntimeError {
    pub fn span(&self) -> Option<&DisplaySpan> {
        match self {
            RuntimeError::DivisionByZero { span }
            | RuntimeError::TypeMismatch { span, .. }
            | RuntimeError::ArityMismatch { span, .. }
            | RuntimeError::UnboundVariable { span, .. } => Some(span),
            RuntimeError::UnknownFunction { .. }
            | RuntimeError::ArgumentCount { .. }
            | RuntimeError::MissingReturn { .. }
            | RuntimeError::RecursionLimit { .. }
            | RuntimeError::InvalidArgument { .. }
            | RuntimeError::Internal(_) => None,
        }
    }

    pub fn help(&self) -> &'static str {
        match self {
            RuntimeError::DivisionByZero { .. } => "Check the divisor before dividing",
            RuntimeError::TypeMismatch { .. } => "Operands must be numbers of the same kind, or booleans for logical operators",
            RuntimeError::ArityMismatch { .. } => "Both deferred bodies of a select must produce the same number of values",
            RuntimeError::UnknownFunction { .. } => "Check the function name",
            RuntimeError::ArgumentCount { .. } => "Pass exactly as many arguments as the function declares",
            RuntimeError::MissingReturn { .. } => "Add a return statement",
            RuntimeError::UnboundVariable { .. } => "Assign the variable before reading it",
            RuntimeError::RecursionLimit { .. } => "Look for unbounded recursion",
            RuntimeError::InvalidArgument { .. } => "Arguments are integers, floats, true or false",
            RuntimeError::Internal(_) => "This is likely an evaluator bug - please report it",
        }
    }
}
