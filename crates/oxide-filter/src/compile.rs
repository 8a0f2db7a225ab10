//! Compilation entry points: extract, parse, resolve, reconstruct.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::ast::{rebind, Binding, LiteralMode, ParsedExpression, RenderOptions, Renderer};
use crate::dialect::{DialectId, Resolver, UnknownFunctions};
use crate::error::{Result, SyntaxError};
use crate::extract::extract_literals;
use crate::parser::{Parser, DEFAULT_MAX_DEPTH, DEFAULT_MAX_HEIGHT};

/// Compilation settings. Every field has a default, so a partial JSON
/// document is a valid configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompileOptions {
    /// Maximum nesting of groups and function argument lists.
    pub max_depth: usize,
    /// Maximum tree height, which bounds flat operator chains.
    pub max_height: usize,
    /// Treatment of extracted literals in the output.
    pub literals: LiteralMode,
    /// Treatment of functions the dialect does not map.
    pub unknown_functions: UnknownFunctions,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_height: DEFAULT_MAX_HEIGHT,
            literals: LiteralMode::default(),
            unknown_functions: UnknownFunctions::default(),
        }
    }
}

/// A compiled `WHERE` fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledFilter {
    /// The SQL fragment.
    pub sql: String,
    /// Literals extracted from `field == '...'` comparisons, in order.
    pub params: Vec<String>,
    /// Meaning of each `?` in `sql`, left to right.
    pub bindings: Vec<Binding>,
}

impl CompiledFilter {
    /// Splits into the SQL fragment and the parameter list.
    #[must_use]
    pub fn into_parts(self) -> (String, Vec<String>) {
        (self.sql, self.params)
    }
}

/// Compiles filter expressions for one dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct Compiler {
    dialect: DialectId,
    options: CompileOptions,
}

impl Compiler {
    /// Creates a compiler with default options.
    #[must_use]
    pub fn new(dialect: DialectId) -> Self {
        Self {
            dialect,
            options: CompileOptions::default(),
        }
    }

    /// Replaces the compile options.
    #[must_use]
    pub const fn with_options(mut self, options: CompileOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the target dialect.
    #[must_use]
    pub const fn dialect(&self) -> DialectId {
        self.dialect
    }

    /// Returns the compile options.
    #[must_use]
    pub const fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Compiles `expression` into a SQL fragment and its parameters.
    ///
    /// # Errors
    ///
    /// Returns the first syntax, resolution or invariant error hit. Syntax
    /// error spans point into `expression`.
    pub fn compile(&self, expression: &str) -> Result<CompiledFilter> {
        let parsed = parse_with_limits(expression, &self.options)?;

        let resolver =
            Resolver::new(self.dialect).unknown_functions(self.options.unknown_functions);
        let root = resolver.resolve(&parsed.root)?;

        let rendered = Renderer::new(RenderOptions {
            literals: self.options.literals,
            escape_backslash: resolver.dialect().escapes_backslash(),
        })
        .render(&root);

        debug!(
            dialect = %self.dialect,
            sql = %rendered.sql,
            params = parsed.params.len(),
            "compiled filter"
        );

        Ok(CompiledFilter {
            sql: rendered.sql,
            params: parsed.params,
            bindings: rendered.bindings,
        })
    }
}

/// Parses `expression` into a tree with its extracted literals bound.
///
/// # Errors
///
/// Returns a `SyntaxError` whose span points into `expression`.
pub fn parse(expression: &str) -> std::result::Result<ParsedExpression, SyntaxError> {
    parse_with_limits(expression, &CompileOptions::default())
}

fn parse_with_limits(
    expression: &str,
    options: &CompileOptions,
) -> std::result::Result<ParsedExpression, SyntaxError> {
    let extraction = extract_literals(expression)?;
    trace!(
        rewritten = %extraction.text,
        params = extraction.params.len(),
        "extracted literals"
    );

    let root = Parser::new(&extraction.text)
        .with_max_depth(options.max_depth)
        .with_max_height(options.max_height)
        .with_param_count(extraction.params.len())
        .parse_expression()
        .map_err(|e| e.map_span(|span| extraction.original_span(span)))?;

    Ok(ParsedExpression {
        root: rebind(root, &extraction.params),
        params: extraction.params,
    })
}

/// Compiles `expression` for `dialect` with default options.
///
/// # Errors
///
/// See [`Compiler::compile`].
pub fn compile(expression: &str, dialect: DialectId) -> Result<CompiledFilter> {
    Compiler::new(dialect).compile(expression)
}
