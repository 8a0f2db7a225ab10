//! Filter expression parser.
//!
//! A layered splitter over the token stream. The input is assumed to have
//! been through [`extract_literals`](crate::extract::extract_literals)
//! already; `@pN` references come back as unbound parameter operands.

mod args;
mod parser;

pub use args::split_arguments;
pub use parser::{Parser, DEFAULT_MAX_DEPTH, DEFAULT_MAX_HEIGHT};
