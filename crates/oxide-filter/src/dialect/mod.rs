//! SQL dialect support.
//!
//! A dialect decides how identifiers are cased and how the portable
//! function vocabulary of the filter language (`len`, `year`, ...) is
//! spelled in its SQL. Dialects are stateless `'static` values.

mod case;
mod generic;
mod mysql;
mod postgres;
mod resolver;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ast::Node;
use crate::error::CompileError;

pub use case::to_snake_case;
pub use generic::GenericDialect;
pub use mysql::MySqlDialect;
pub use postgres::PostgresDialect;
pub use resolver::{resolve, Resolver, UnknownFunctions};

/// Units accepted by the date-part functions, in their portable spelling.
pub(crate) const DATE_PARTS: [&str; 6] = ["year", "month", "day", "hour", "minute", "second"];

/// How a dialect spells one of the portable functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionMapping {
    /// Same arguments under another name.
    Rename {
        /// The dialect's function name.
        to: &'static str,
        /// Required argument count.
        arity: usize,
    },
    /// `date_part('<unit>', x)`.
    DatePart(&'static str),
}

impl FunctionMapping {
    /// Returns the number of arguments the portable function takes.
    #[must_use]
    pub const fn arity(&self) -> usize {
        match self {
            Self::Rename { arity, .. } => *arity,
            Self::DatePart(_) => 1,
        }
    }

    /// Builds the dialect's call from already-resolved arguments.
    ///
    /// # Errors
    ///
    /// Returns `CompileError::InvalidArguments` on an arity mismatch.
    pub fn apply(self, name: &str, arguments: Vec<Node>) -> Result<Node, CompileError> {
        if arguments.len() != self.arity() {
            return Err(CompileError::InvalidArguments {
                function: name.to_string(),
                expected: self.arity(),
                found: arguments.len(),
            });
        }
        Ok(match self {
            Self::Rename { to, .. } => Node::call(to, arguments),
            Self::DatePart(unit) => {
                let mut args = Vec::with_capacity(arguments.len() + 1);
                args.push(Node::string(unit));
                args.extend(arguments);
                Node::call("date_part", args)
            }
        })
    }
}

/// Trait for SQL dialect-specific behavior.
pub trait Dialect: Send + Sync {
    /// Returns the name of the dialect.
    fn name(&self) -> &'static str;

    /// Transforms a column name. Defaults to `snake_case`.
    fn identifier(&self, name: &str) -> String {
        to_snake_case(name)
    }

    /// Looks up a portable function; `name` is already lower-case.
    fn function(&self, _name: &str) -> Option<FunctionMapping> {
        None
    }

    /// Returns whether the dialect maps the function (case-insensitive).
    fn supports_function(&self, name: &str) -> bool {
        self.function(&name.to_ascii_lowercase()).is_some()
    }

    /// Returns whether `\` is an escape character inside string literals.
    fn escapes_backslash(&self) -> bool {
        false
    }

    /// Rewrites a call whose arguments are already resolved. Calls the
    /// dialect does not map come back unchanged.
    ///
    /// # Errors
    ///
    /// Returns `CompileError::InvalidArguments` when a mapped function is
    /// called with the wrong number of arguments.
    fn rewrite_function(&self, name: &str, arguments: Vec<Node>) -> Result<Node, CompileError> {
        match self.function(&name.to_ascii_lowercase()) {
            Some(mapping) => mapping.apply(name, arguments),
            None => Ok(Node::call(name, arguments)),
        }
    }
}

/// Names a built-in dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectId {
    #[default]
    Postgres,
    MySql,
    Generic,
}

impl DialectId {
    /// All built-in dialects.
    pub const ALL: [Self; 3] = [Self::Postgres, Self::MySql, Self::Generic];

    /// Returns the dialect implementation.
    #[must_use]
    pub const fn dialect(self) -> &'static dyn Dialect {
        match self {
            Self::Postgres => &PostgresDialect,
            Self::MySql => &MySqlDialect,
            Self::Generic => &GenericDialect,
        }
    }

    /// Returns the canonical name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::MySql => "mysql",
            Self::Generic => "generic",
        }
    }
}

impl fmt::Display for DialectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DialectId {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            "mysql" | "mariadb" => Ok(Self::MySql),
            "generic" | "ansi" => Ok(Self::Generic),
            _ => Err(CompileError::UnsupportedDialect(s.to_string())),
        }
    }
}
