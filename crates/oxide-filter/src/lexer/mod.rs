//! Filter expression lexer.
//!
//! A hand-written lexer producing a stream of spanned tokens.

mod span;
mod token;
mod tokenizer;

pub use span::Span;
pub use token::{Keyword, Token, TokenKind};
pub use tokenizer::Lexer;

pub(crate) use tokenizer::{is_ident_char, is_ident_start, scan_quoted};
