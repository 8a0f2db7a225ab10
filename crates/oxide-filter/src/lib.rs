//! # oxide-filter
//!
//! Compiles a compact filter language into dialect-correct SQL `WHERE`
//! fragments.
//!
//! This crate provides:
//! - A literal extractor that lifts `field == '<literal>'` values out of the
//!   expression before it is parsed
//! - A layered parser producing an owned expression tree
//! - Dialect resolution of identifiers and portable functions
//! - Reconstruction of SQL text with minimal parentheses
//!
//! ## Compiling a filter
//!
//! ```rust
//! use oxide_filter::{compile, DialectId};
//!
//! let filter = compile("year(BirthDay) = ? AND len(UserName) > 3", DialectId::Postgres)?;
//! assert_eq!(
//!     filter.sql,
//!     "date_part('year',birth_day) = ? AND LENGTH(user_name) > 3"
//! );
//! # Ok::<(), oxide_filter::CompileError>(())
//! ```
//!
//! ## Extracted literals
//!
//! Literals compared with `==` never reach the parser. They are returned in
//! order and re-inlined with embedded quotes doubled, or bound as `?`:
//!
//! ```rust
//! use oxide_filter::{compile, CompileOptions, Compiler, DialectId, LiteralMode};
//!
//! let filter = compile(r"code=='abc\' AND cc'", DialectId::Postgres)?;
//! assert_eq!(filter.sql, "code = 'abc'' AND cc'");
//! assert_eq!(filter.params, vec!["abc' AND cc"]);
//!
//! let bound = Compiler::new(DialectId::Postgres)
//!     .with_options(CompileOptions {
//!         literals: LiteralMode::Bind,
//!         ..CompileOptions::default()
//!     })
//!     .compile(r"code=='abc\' AND cc'")?;
//! assert_eq!(bound.sql, "code = ?");
//! # Ok::<(), oxide_filter::CompileError>(())
//! ```

pub mod ast;
pub mod compile;
pub mod dialect;
pub mod error;
pub mod extract;
pub mod lexer;
pub mod parser;

pub use ast::{reconstruct, Binding, LiteralMode, Node, Operand, Operator, ParsedExpression};
pub use compile::{compile, parse, CompileOptions, CompiledFilter, Compiler};
pub use dialect::{resolve, to_snake_case, Dialect, DialectId, Resolver, UnknownFunctions};
pub use error::{CompileError, InvariantError, Result, SyntaxError, SyntaxErrorKind};
pub use extract::{extract_literals, Extraction};
pub use lexer::{Lexer, Span, Token, TokenKind};
pub use parser::{split_arguments, Parser};
