//! Token types for the filter lexer.

use std::fmt;

use super::Span;

/// Word operators of the filter language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    And,
    Or,
    Not,
    Like,
}

impl Keyword {
    /// Looks up a keyword, ignoring ASCII case.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("AND") {
            Some(Self::And)
        } else if s.eq_ignore_ascii_case("OR") {
            Some(Self::Or)
        } else if s.eq_ignore_ascii_case("NOT") {
            Some(Self::Not)
        } else if s.eq_ignore_ascii_case("LIKE") {
            Some(Self::Like)
        } else {
            None
        }
    }

    /// Returns the canonical upper-case spelling.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::Like => "LIKE",
        }
    }
}

/// Token kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Column or function name, possibly dot-qualified (`users.name`).
    Identifier(String),
    /// Numeric literal, kept as written.
    Number(String),
    /// String literal, already decoded.
    String(String),
    Keyword(Keyword),
    /// `?`, a value bound by the caller.
    Question,
    /// `@p<N>`, a literal lifted out by the extractor.
    Parameter(usize),

    LeftParen,
    RightParen,
    Comma,

    Plus,
    Minus,
    Star,
    Slash,

    /// `=`
    Eq,
    /// `==`
    EqEq,
    /// `!=`
    NotEq,
    /// `<>`
    LtGt,
    Lt,
    LtEq,
    Gt,
    GtEq,

    /// `&&`
    AndAnd,
    /// `||`
    OrOr,
    /// `!`
    Bang,

    Eof,
}

impl TokenKind {
    /// True for `OR` and `||`.
    #[must_use]
    pub const fn is_or(&self) -> bool {
        matches!(self, Self::OrOr | Self::Keyword(Keyword::Or))
    }

    /// True for `AND` and `&&`.
    #[must_use]
    pub const fn is_and(&self) -> bool {
        matches!(self, Self::AndAnd | Self::Keyword(Keyword::And))
    }

    /// True for `NOT` and `!`.
    #[must_use]
    pub const fn is_not(&self) -> bool {
        matches!(self, Self::Bang | Self::Keyword(Keyword::Not))
    }

    /// True for every comparison operator, `LIKE` included.
    #[must_use]
    pub const fn is_comparison(&self) -> bool {
        matches!(
            self,
            Self::Eq
                | Self::EqEq
                | Self::NotEq
                | Self::LtGt
                | Self::Lt
                | Self::LtEq
                | Self::Gt
                | Self::GtEq
                | Self::Keyword(Keyword::Like)
        )
    }

    /// True for tokens after which a `-` or `+` is a binary operator
    /// rather than a sign.
    #[must_use]
    pub const fn ends_operand(&self) -> bool {
        matches!(
            self,
            Self::Identifier(_)
                | Self::Number(_)
                | Self::String(_)
                | Self::Question
                | Self::Parameter(_)
                | Self::RightParen
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier(name) | Self::Number(name) => f.write_str(name),
            Self::String(value) => write!(f, "'{value}'"),
            Self::Keyword(kw) => f.write_str(kw.as_str()),
            Self::Question => f.write_str("?"),
            Self::Parameter(index) => write!(f, "@p{index}"),
            Self::LeftParen => f.write_str("("),
            Self::RightParen => f.write_str(")"),
            Self::Comma => f.write_str(","),
            Self::Plus => f.write_str("+"),
            Self::Minus => f.write_str("-"),
            Self::Star => f.write_str("*"),
            Self::Slash => f.write_str("/"),
            Self::Eq => f.write_str("="),
            Self::EqEq => f.write_str("=="),
            Self::NotEq => f.write_str("!="),
            Self::LtGt => f.write_str("<>"),
            Self::Lt => f.write_str("<"),
            Self::LtEq => f.write_str("<="),
            Self::Gt => f.write_str(">"),
            Self::GtEq => f.write_str(">="),
            Self::AndAnd => f.write_str("&&"),
            Self::OrOr => f.write_str("||"),
            Self::Bang => f.write_str("!"),
            Self::Eof => f.write_str("end of input"),
        }
    }
}

/// A token with its span in the source code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The location in the source code.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns true if this is an EOF token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }
}
