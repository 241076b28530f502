use std::fmt::{self, Display};

use thiserror::Error;

use crate::compiler::tokens::DisplaySpan;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchRole {
    Then,
    Else,
}

impl Display for BranchRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BranchRole::Then => write!(f, "then"),
            BranchRole::Else => write!(f, "else"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LoweringError {
    #[error("Conditional #{counter} has no else branch")]
    MissingElse { counter: u32, span: DisplaySpan },

    #[error("Conditional #{counter}: {branch} branch produces {found} value(s), expected {expected}")]
    ArityMismatch {
        counter: u32,
        branch: BranchRole,
        expected: usize,
        found: usize,
        span: DisplaySpan,
    },

    #[error("'{name}' reached lowering without being resolved")]
    Unresolved { name: String, span: DisplaySpan },

    #[error("'{name}' uses the reserved prefix '{prefix}'")]
    ReservedName {
        name: String,
        prefix: &'static str,
        span: DisplaySpan,
    },

    #[error("Procedure '{procedure}' and its generated counterpart would both be named '{name}'")]
    PrefixCollision {
        procedure: String,
        name: String,
        span: DisplaySpan,
    },

    #[error("Node not found: {what}")]
    NotFound { what: String },
}

impl LoweringError {
    pub fn span(&self) -> Option<&DisplaySpan> {
        match self {
            LoweringError::MissingElse { span, .. }
            | LoweringError::ArityMismatch { span, .. }
            | LoweringError::Unresolved { span, .. }
            | LoweringError::ReservedName { span, .. }
            | LoweringError::PrefixCollision { span, .. } => Some(span),
            LoweringError::NotFound { .. } => None,
        }
    }

    pub fn help(&self) -> &'static str {
        match self {
            LoweringError::MissingElse { .. } => "Add an else branch, or lower with --implicit-else",
            LoweringError::ArityMismatch { .. } => "Both branches must produce one value per live variable",
            LoweringError::Unresolved { .. } => "Run name resolution before lowering",
            LoweringError::ReservedName { .. } => "Rename the variable; this prefix is used for generated bindings",
            LoweringError::PrefixCollision { .. } => "Use different values for prefix and auto_prefix",
            LoweringError::NotFound { .. } => "This is likely a lowering bug - please report it",
        }
    }
}

/// Input that lowers, but whose lowered form may not behave like the original.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LoweringWarning {
    #[error("Conditional #{counter}: else branch assigns {} without merging it back", .names.join(", "))]
    UnmergedAssignments {
        counter: u32,
        names: Vec<String>,
        span: DisplaySpan,
    },

    #[error("Conditional #{counter}: return in the {branch} branch ends only the branch, not the procedure")]
    BranchReturn {
        counter: u32,
        branch: BranchRole,
        span: DisplaySpan,
    },
}
