use colored::Colorize;
use std::fmt::{self, Display, Write};
use thiserror::Error;

use crate::compiler::{
    analysis::AnalysisError, lexer::error::LexError, lower::LoweringError, parser::error::ParserError, runtime::RuntimeError,
    tokens::DisplaySpan,
};

/// The phase of compilation where an error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompilerPhase {
    Io,
    Lexing,
    Parsing,
    Analysis,
    Lowering,
    Evaluation,
}

impl Display for CompilerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompilerPhase::Io => write!(f, "IO"),
            CompilerPhase::Lexing => write!(f, "Lexing"),
            CompilerPhase::Parsing => write!(f, "Parsing"),
            CompilerPhase::Analysis => write!(f, "Analysis"),
            CompilerPhase::Lowering => write!(f, "Lowering"),
            CompilerPhase::Evaluation => write!(f, "Evaluation"),
        }
    }
}

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("Could not read '{path}'")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{} lexing error(s)", .0.len())]
    Lex(Vec<LexError>),

    #[error("{} parse error(s)", .0.len())]
    Parse(Vec<ParserError>),

    #[error("{} analysis error(s)", .0.len())]
    Analysis(Vec<AnalysisError>),

    #[error("{} lowering error(s)", .0.len())]
    Lowering(Vec<LoweringError>),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl From<LoweringError> for CompileError {
    fn from(error: LoweringError) -> Self {
        CompileError::Lowering(vec![error])
    }
}

/// One reportable problem, flattened out of a [`CompileError`].
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub phase: CompilerPhase,
    pub message: String,
    pub span: Option<DisplaySpan>,
    pub help: Option<&'static str>,
}

impl CompileError {
    pub fn phase(&self) -> CompilerPhase {
        match self {
            CompileError::Io { .. } => CompilerPhase::Io,
            CompileError::Lex(_) => CompilerPhase::Lexing,
            CompileError::Parse(_) => CompilerPhase::Parsing,
            CompileError::Analysis(_) => CompilerPhase::Analysis,
            CompileError::Lowering(_) => CompilerPhase::Lowering,
            CompileError::Runtime(_) => CompilerPhase::Evaluation,
        }
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let phase = self.phase();
        let diagnostic = |message: String, span: Option<&DisplaySpan>, help: Option<&'static str>| Diagnostic {
            phase,
            message,
            span: span.cloned(),
            help,
        };
        match self {
            CompileError::Io { source, .. } => vec![diagnostic(format!("{self}: {source}"), None, None)],
            CompileError::Lex(errors) => errors.iter().map(|e| diagnostic(e.to_string(), Some(e.span()), None)).collect(),
            CompileError::Parse(errors) => errors
                .iter()
                .map(|e| diagnostic(e.to_string(), Some(e.span()), Some(e.help())))
                .collect(),
            CompileError::Analysis(errors) => errors
                .iter()
                .map(|e| diagnostic(e.to_string(), Some(e.span()), Some(e.help())))
                .collect(),
            CompileError::Lowering(errors) => errors.iter().map(|e| diagnostic(e.to_string(), e.span(), Some(e.help()))).collect(),
            CompileError::Runtime(e) => vec![diagnostic(e.to_string(), e.span(), Some(e.help()))],
        }
    }
}

/// The line a span starts on, with a caret line under the spanned columns.
fn snippet(span: &DisplaySpan, source: &str) -> Option<String> {
    let line_idx = span.start.0.checked_sub(1)?;
    let line = source.lines().nth(line_idx)?;

    let line_num = span.start.0.to_string();
    let padding = " ".repeat(line_num.len());
    let col_start = span.start.1.saturating_sub(1);
    let len = if span.end.0 == span.start.0 {
        span.end.1.saturating_sub(span.start.1).saturating_add(1).max(1)
    } else {
        line.len().saturating_sub(col_start).max(1)
    };

    let mut out = String::new();
    let _ = writeln!(out, "{} {} {}", line_num.blue(), "🮌".blue(), line);
    let _ = write!(out, "{} {} {}{}", padding, "🮌".blue(), " ".repeat(col_start), "▔".repeat(len).red().bold());
    Some(out)
}

impl Diagnostic {
    /// Renders the diagnostic; `source` is the text the span points into.
    pub fn render(&self, source: Option<&str>) -> String {
        let mut out = format!(
            "{}{}: {}",
            "error".red(),
            format!("[{}]", self.phase).dimmed(),
            self.message.bright_white().bold()
        );
        if let Some(span) = &self.span {
            let _ = write!(out, "\n{span}");
            if let Some(snippet) = source.and_then(|source| snippet(span, source)) {
                let _ = write!(out, "\n{snippet}");
            }
        }
        if let Some(help) = self.help {
            let _ = write!(out, "\n{} {}", "help:".green().bold(), help);
        }
        out
    }
}

pub fn print_errors(error: &CompileError, source: Option<&str>) {
    for diagnostic in error.diagnostics() {
        eprintln!("{}\n", diagnostic.render(source));
    }
}
