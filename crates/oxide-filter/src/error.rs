//! Error types for the filter compiler.

use crate::lexer::{Span, TokenKind};

/// What went wrong while reading an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyntaxErrorKind {
    /// The expression is empty or only whitespace.
    EmptyInput,
    /// A token appeared where it cannot be used.
    UnexpectedToken,
    /// The expression stopped where more input was required.
    UnexpectedEnd,
    /// A `(` without its `)` or the other way round.
    UnmatchedParen,
    /// A function argument list contains an empty slot.
    EmptyArgument,
    /// A `'` literal is never closed.
    UnterminatedString,
    /// A character outside the filter grammar.
    InvalidCharacter,
    /// Nesting exceeds the configured maximum depth.
    TooDeep,
    /// Operator chains make the tree taller than the configured maximum.
    TooLong,
    /// An `@pN` reference without an extracted value.
    UnboundParameter,
}

/// A syntax error with the location it was detected at.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, serde::Serialize)]
#[error("{message} at position {}..{}", span.start, span.end)]
pub struct SyntaxError {
    /// The error category.
    pub kind: SyntaxErrorKind,
    /// The error message.
    pub message: String,
    /// The location of the error.
    pub span: Span,
    /// The offending token, if there was one.
    pub found: Option<String>,
}

impl SyntaxError {
    /// Creates a new syntax error.
    #[must_use]
    pub fn new(kind: SyntaxErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            message: message.into(),
            span,
            found: None,
        }
    }

    /// Creates an "unexpected token" error.
    #[must_use]
    pub fn unexpected(expected: &str, found: &TokenKind, span: Span) -> Self {
        if matches!(found, TokenKind::Eof) {
            return Self::unexpected_end(expected, span);
        }
        Self {
            kind: SyntaxErrorKind::UnexpectedToken,
            message: format!("Unexpected token: expected {expected}, found `{found}`"),
            span,
            found: Some(found.to_string()),
        }
    }

    /// Creates an "unexpected end of input" error.
    #[must_use]
    pub fn unexpected_end(expected: &str, span: Span) -> Self {
        Self::new(
            SyntaxErrorKind::UnexpectedEnd,
            format!("Unexpected end of input: expected {expected}"),
            span,
        )
    }

    /// Rewrites the span through `map`; used to report errors against the
    /// caller's text after literal extraction changed offsets.
    #[must_use]
    pub fn map_span(mut self, map: impl FnOnce(Span) -> Span) -> Self {
        self.span = map(self.span);
        self
    }
}

/// An internal consistency violation in a syntax tree.
///
/// Only reachable through a broken [`Dialect`](crate::dialect::Dialect)
/// implementation or a hand-built tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invariant violated: {message}")]
pub struct InvariantError {
    /// What was violated.
    pub message: String,
}

impl InvariantError {
    /// Creates a new invariant error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors surfaced by [`compile`](crate::compile()) and the resolver.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// The expression could not be parsed.
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    /// No dialect is registered under this name.
    #[error("unsupported dialect: {0}")]
    UnsupportedDialect(String),

    /// The dialect rejects a function call.
    #[error("function '{name}' is not supported by the {dialect} dialect")]
    UnsupportedFunction {
        /// Dialect name.
        dialect: &'static str,
        /// Function name as written.
        name: String,
    },

    /// A mapped function was called with the wrong number of arguments.
    #[error("function '{function}' expects {expected} argument(s), found {found}")]
    InvalidArguments {
        /// Function name as written.
        function: String,
        /// Required argument count.
        expected: usize,
        /// Argument count in the expression.
        found: usize,
    },

    /// A transform produced a malformed tree.
    #[error(transparent)]
    Invariant(#[from] InvariantError),
}

/// Result type alias for compiler operations.
pub type Result<T> = std::result::Result<T, CompileError>;
