//! Evaluation errors.
//!
//! `LessErrorKind` carries the structured cause; `LessError` adds the trail of
//! nodes the error propagated through (innermost first). Constructors are
//! centralized here so every call site produces the same message for the
//! same condition.

use std::fmt::{self, Write};
use std::path::Path;

use less_ir::Span;

/// Result of an evaluation step.
pub type LessResult<T> = Result<T, LessError>;

/// Broad classification of an error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed source, raised by the parser.
    Syntax,
    /// The stylesheet is well-formed but cannot be evaluated.
    Execution,
    /// An engine invariant was violated.
    Internal,
}

/// Typed error cause.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LessErrorKind {
    #[error("syntax error: {message}")]
    Syntax { message: String },

    #[error("undefined variable {name}")]
    UndefinedVariable { name: String },

    /// Also raised when every matching definition rejected the arguments.
    #[error("no mixin named {selector} is defined")]
    UndefinedMixin { selector: String },

    #[error("mixin {path} exceeded the recursion limit of {limit}")]
    MixinRecursion { path: String, limit: usize },

    #[error("import cycle detected: {chain}")]
    ImportCycle { path: String, chain: String },

    #[error("an error occurred importing '{path}': {reason}")]
    ImportFailed { path: String, reason: String },

    #[error("variable {name} is defined recursively")]
    VariableCycle { name: String },

    #[error("invalid operation: {message}")]
    InvalidOperation { message: String },

    #[error("internal error: {message}")]
    Internal { message: String },
}

impl LessErrorKind {
    pub fn category(&self) -> ErrorCategory {
        match self {
            LessErrorKind::Syntax { .. } => ErrorCategory::Syntax,
            LessErrorKind::Internal { .. } => ErrorCategory::Internal,
            LessErrorKind::UndefinedVariable { .. }
            | LessErrorKind::UndefinedMixin { .. }
            | LessErrorKind::MixinRecursion { .. }
            | LessErrorKind::ImportCycle { .. }
            | LessErrorKind::ImportFailed { .. }
            | LessErrorKind::VariableCycle { .. }
            | LessErrorKind::InvalidOperation { .. } => ErrorCategory::Execution,
        }
    }
}

/// A node an error propagated through.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorContext {
    /// Source-like rendering of the node.
    pub repr: String,
    pub span: Span,
}

/// Evaluation error with its propagation trail.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind}")]
pub struct LessError {
    pub kind: LessErrorKind,
    /// Location of the cause, when known.
    pub span: Option<Span>,
    trail: Vec<ErrorContext>,
}

impl LessError {
    pub fn new(kind: LessErrorKind) -> Self {
        LessError {
            kind,
            span: None,
            trail: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Record a node the error propagated through.
    #[must_use]
    pub fn context(mut self, repr: impl Into<String>, span: Span) -> Self {
        self.trail.push(ErrorContext {
            repr: repr.into(),
            span,
        });
        self
    }

    /// Contextual trail, innermost first.
    pub fn trail(&self) -> &[ErrorContext] {
        &self.trail
    }

    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    /// Message followed by the trail, one node per line.
    pub fn report(&self) -> String {
        let mut out = self.kind.to_string();
        if let Some(span) = self.span.filter(|span| *span != Span::DUMMY) {
            let _ = write!(out, " at {span}");
        }
        for ctx in &self.trail {
            out.push_str("\n  in ");
            out.push_str(&ctx.repr);
            if ctx.span != Span::DUMMY {
                let _ = write!(out, " at {}", ctx.span);
            }
        }
        out
    }
}

impl From<LessErrorKind> for LessError {
    fn from(kind: LessErrorKind) -> Self {
        LessError::new(kind)
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorCategory::Syntax => "syntax",
            ErrorCategory::Execution => "execution",
            ErrorCategory::Internal => "internal",
        };
        f.write_str(name)
    }
}

// Syntax Errors

#[cold]
pub fn syntax_error(message: impl Into<String>, span: Span) -> LessError {
    LessError::new(LessErrorKind::Syntax {
        message: message.into(),
    })
    .with_span(span)
}

// Variable Errors

#[cold]
pub fn undefined_variable(name: &str) -> LessError {
    LessError::new(LessErrorKind::UndefinedVariable {
        name: name.to_owned(),
    })
}

#[cold]
pub fn variable_cycle(name: &str) -> LessError {
    LessError::new(LessErrorKind::VariableCycle {
        name: name.to_owned(),
    })
}

// Mixin Errors

#[cold]
pub fn mixin_undefined(selector: &str) -> LessError {
    LessError::new(LessErrorKind::UndefinedMixin {
        selector: selector.to_owned(),
    })
}

#[cold]
pub fn mixin_recursion(path: &str, limit: usize) -> LessError {
    LessError::new(LessErrorKind::MixinRecursion {
        path: path.to_owned(),
        limit,
    })
}

// Import Errors

#[cold]
pub fn import_cycle(path: &Path, chain: &[&Path]) -> LessError {
    let chain = chain
        .iter()
        .map(|p| p.display().to_string())
        .chain(std::iter::once(path.display().to_string()))
        .collect::<Vec<_>>()
        .join(" -> ");
    LessError::new(LessErrorKind::ImportCycle {
        path: path.display().to_string(),
        chain,
    })
}

#[cold]
pub fn import_failed(path: &Path, reason: impl fmt::Display) -> LessError {
    LessError::new(LessErrorKind::ImportFailed {
        path: path.display().to_string(),
        reason: reason.to_string(),
    })
}

// Expression Errors

#[cold]
pub fn invalid_operation(message: impl Into<String>) -> LessError {
    LessError::new(LessErrorKind::InvalidOperation {
        message: message.into(),
    })
}

#[cold]
pub fn division_by_zero() -> LessError {
    invalid_operation("division by zero")
}

#[cold]
pub fn wrong_arg_count(function: &str, expected: usize, got: usize) -> LessError {
    invalid_operation(format!(
        "{function} expects {expected} argument{}, got {got}",
        if expected == 1 { "" } else { "s" }
    ))
}

// Internal Errors

#[cold]
pub fn unexpanded_mixin_call(call: &str) -> LessError {
    LessError::new(LessErrorKind::Internal {
        message: format!("mixin call {call} reached rule evaluation unexpanded"),
    })
}

#[cfg(test)]
mod tests;
