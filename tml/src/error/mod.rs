//! Compile-time errors and diagnostic reporting

use crate::ast::Span;
use crate::interp::RuntimeError;
use crate::types::Type;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, CompileError>;

/// Error raised while lexing, parsing or scope-checking a program
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("Lexer error at {span}: {message}")]
    Lexer { message: String, span: Span },

    #[error("Syntax error at {span}: {message}")]
    Syntax { message: String, span: Span },

    #[error("`{name}` is already declared in this scope")]
    DuplicateDeclaration { name: String, span: Span },

    #[error("`{name}` is not declared")]
    UndeclaredIdentifier {
        name: String,
        span: Span,
        suggestion: Option<String>,
    },

    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: Type,
        found: Type,
        span: Span,
    },

    #[error("`{name}` takes {declared} argument(s) but {supplied} were supplied")]
    WrongNumArgs {
        name: String,
        declared: usize,
        supplied: usize,
        span: Span,
    },

    #[error("IO error: {message}")]
    Io { message: String },
}

impl CompileError {
    pub fn lexer(message: impl Into<String>, span: Span) -> Self {
        Self::Lexer {
            message: message.into(),
            span,
        }
    }

    pub fn syntax(message: impl Into<String>, span: Span) -> Self {
        Self::Syntax {
            message: message.into(),
            span,
        }
    }

    pub fn io_error(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Lexer { span, .. }
            | Self::Syntax { span, .. }
            | Self::DuplicateDeclaration { span, .. }
            | Self::UndeclaredIdentifier { span, .. }
            | Self::TypeMismatch { span, .. }
            | Self::WrongNumArgs { span, .. } => Some(*span),
            Self::Io { .. } => None,
        }
    }

    /// Same error with its span moved back by `by` bytes
    ///
    /// Turns a span taken from a shifted token stream into one relative to
    /// the start of its own file.
    pub fn unshift(mut self, by: usize) -> Self {
        match &mut self {
            Self::Lexer { span, .. }
            | Self::Syntax { span, .. }
            | Self::DuplicateDeclaration { span, .. }
            | Self::UndeclaredIdentifier { span, .. }
            | Self::TypeMismatch { span, .. }
            | Self::WrongNumArgs { span, .. } => *span = span.unshift(by),
            Self::Io { .. } => {}
        }
        self
    }

    /// Short label for the diagnostic header
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Lexer { .. } => "Lexer",
            Self::Syntax { .. } => "Syntax",
            Self::DuplicateDeclaration { .. }
            | Self::UndeclaredIdentifier { .. }
            | Self::WrongNumArgs { .. } => "Scope",
            Self::TypeMismatch { .. } => "Type",
            Self::Io { .. } => "IO",
        }
    }

    /// Message rendered under the source label
    pub fn message(&self) -> String {
        match self {
            Self::Lexer { message, .. } | Self::Syntax { message, .. } => message.clone(),
            Self::UndeclaredIdentifier {
                name, suggestion, ..
            } => format!(
                "`{name}` is not declared{}",
                crate::util::format_suggestion_hint(suggestion.as_deref())
            ),
            Self::Io { message } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Report error with ariadne
pub fn report_error(filename: &str, source: &str, error: &CompileError) {
    let header = format!("{} error", error.kind());
    if let Err(e) = render(filename, source, error.span(), &header, &error.message()) {
        log::warn!("failed to render diagnostic: {e}");
        eprintln!("{filename}: {error}");
    }
}

/// Report a runtime error at `span`, which is relative to `source`
pub fn report_runtime_error(filename: &str, source: &str, span: Span, error: &RuntimeError) {
    if let Err(e) = render(filename, source, Some(span), "Runtime error", &error.to_string()) {
        log::warn!("failed to render diagnostic: {e}");
        eprintln!("{filename}: runtime error: {error}");
    }
}

fn render(
    filename: &str,
    source: &str,
    span: Option<Span>,
    header: &str,
    message: &str,
) -> std::io::Result<()> {
    use ariadne::{Color, Label, Report, ReportKind, Source};

    match span {
        Some(span) => Report::build(ReportKind::Error, (filename, span.start..span.end))
            .with_message(header)
            .with_label(
                Label::new((filename, span.start..span.end))
                    .with_message(message)
                    .with_color(Color::Red),
            )
            .finish()
            .eprint((filename, Source::from(source))),
        None => Report::build(ReportKind::Error, (filename, 0..0))
            .with_message(format!("{header}: {message}"))
            .finish()
            .eprint((filename, Source::from(source))),
    }
}
