use thiserror::Error;

use crate::compiler::tokens::DisplaySpan;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Unresolved identifier '{name}'")]
    UnresolvedIdentifier { name: String, span: DisplaySpan },

    #[error("Function '{name}' is defined more than once")]
    DuplicateFunction { name: String, span: DisplaySpan },

    #[error("Parameter '{name}' is declared more than once")]
    DuplicateParameter { name: String, span: DisplaySpan },

    #[error("Function '{name}' expects {expected} argument(s), got {found}")]
    ArgumentCount {
        name: String,
        expected: usize,
        found: usize,
        span: DisplaySpan,
    },
}

impl AnalysisError {
    pub fn span(&self) -> &DisplaySpan {
        match self {
            AnalysisError::UnresolvedIdentifier { span, .. }
            | AnalysisError::DuplicateFunction { span, .. }
            | AnalysisError::DuplicateParameter { span, .. }
            | AnalysisError::ArgumentCount { span, .. } => span,
        }
    }

    pub fn help(&self) -> &'static str {
        match self {
            AnalysisError::UnresolvedIdentifier { .. } => "This identifier was not found in the current scope",
            AnalysisError::DuplicateFunction { .. } => "Rename one of the functions",
            AnalysisError::DuplicateParameter { .. } => "Parameter names must be unique",
            AnalysisError::ArgumentCount { .. } => "Pass exactly as many arguments as the function declares",
        }
    }
}
