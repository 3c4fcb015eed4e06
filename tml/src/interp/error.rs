//! Runtime errors for the interpreter

use crate::ast::Span;
use thiserror::Error;

/// Error that aborts evaluation
///
/// Distinct from a machine that halts by rejecting: a `RuntimeError` means
/// the program itself was malformed at the point it was reached.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("undefined variable: {name}")]
    UndefinedVariable { name: String, span: Span },

    #[error("undefined function: {name}")]
    UndefinedFunction { name: String, span: Span },

    #[error("function {name} expects {declared} argument(s), got {supplied}")]
    ArityMismatch {
        name: String,
        declared: usize,
        supplied: usize,
        span: Span,
    },
}

impl RuntimeError {
    pub fn undefined_variable(name: &str, span: Span) -> Self {
        RuntimeError::UndefinedVariable {
            name: name.to_string(),
            span,
        }
    }

    pub fn undefined_function(name: &str, span: Span) -> Self {
        RuntimeError::UndefinedFunction {
            name: name.to_string(),
            span,
        }
    }

    pub fn arity_mismatch(name: &str, declared: usize, supplied: usize, span: Span) -> Self {
        RuntimeError::ArityMismatch {
            name: name.to_string(),
            declared,
            supplied,
            span,
        }
    }

    /// Location of the reference or call that failed
    pub fn span(&self) -> Span {
        match self {
            Self::UndefinedVariable { span, .. }
            | Self::UndefinedFunction { span, .. }
            | Self::ArityMismatch { span, .. } => *span,
        }
    }
}

/// Result type for interpreter operations
pub type InterpResult<T> = Result<T, RuntimeError>;
