//! Dialect resolution of expression trees.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Dialect, DialectId};
use crate::ast::{Node, Operand};
use crate::error::{CompileError, Result};

/// Treatment of function calls the dialect has no mapping for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownFunctions {
    /// Keep the call as written, with resolved arguments.
    #[default]
    PassThrough,
    /// Fail with [`CompileError::UnsupportedFunction`].
    Reject,
}

/// Rewrites a tree for one dialect.
///
/// Resolution builds a new tree and leaves its input untouched.
#[derive(Clone, Copy)]
pub struct Resolver {
    dialect: &'static dyn Dialect,
    unknown_functions: UnknownFunctions,
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("dialect", &self.dialect.name())
            .field("unknown_functions", &self.unknown_functions)
            .finish()
    }
}

impl Resolver {
    /// Creates a resolver for a built-in dialect.
    #[must_use]
    pub const fn new(dialect: DialectId) -> Self {
        Self::with_dialect(dialect.dialect())
    }

    /// Creates a resolver for any dialect implementation.
    #[must_use]
    pub const fn with_dialect(dialect: &'static dyn Dialect) -> Self {
        Self {
            dialect,
            unknown_functions: UnknownFunctions::PassThrough,
        }
    }

    /// Sets the treatment of unmapped function calls.
    #[must_use]
    pub const fn unknown_functions(mut self, policy: UnknownFunctions) -> Self {
        self.unknown_functions = policy;
        self
    }

    /// Returns the dialect this resolver targets.
    #[must_use]
    pub const fn dialect(&self) -> &'static dyn Dialect {
        self.dialect
    }

    /// Resolves `node` and checks the result's structural invariants.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedFunction`, `InvalidArguments`, or `Invariant`
    /// when the dialect produced a malformed tree.
    pub fn resolve(&self, node: &Node) -> Result<Node> {
        let resolved = self.resolve_node(node)?;
        resolved.check_invariants()?;
        Ok(resolved)
    }

    fn resolve_node(&self, node: &Node) -> Result<Node> {
        match node {
            Node::Operand(Operand::Identifier(name)) => {
                Ok(Node::identifier(self.dialect.identifier(name)))
            }
            Node::Operand(_) => Ok(node.clone()),
            Node::Operator { op, left, right } => Ok(Node::Operator {
                op: *op,
                left: Box::new(self.resolve_node(left)?),
                right: match right {
                    Some(right) => Some(Box::new(self.resolve_node(right)?)),
                    None => None,
                },
            }),
            Node::FunctionCall { name, arguments } => {
                let arguments = arguments
                    .iter()
                    .map(|arg| self.resolve_node(arg))
                    .collect::<Result<Vec<_>>>()?;

                if !self.dialect.supports_function(name) {
                    if self.unknown_functions == UnknownFunctions::Reject {
                        return Err(CompileError::UnsupportedFunction {
                            dialect: self.dialect.name(),
                            name: name.clone(),
                        });
                    }
                    debug!(
                        function = %name,
                        dialect = self.dialect.name(),
                        "passing unmapped function through"
                    );
                }
                self.dialect.rewrite_function(name, arguments)
            }
        }
    }
}

/// Resolves `node` for a built-in dialect, passing unmapped functions
/// through.
///
/// # Errors
///
/// See [`Resolver::resolve`].
pub fn resolve(node: &Node, dialect: DialectId) -> Result<Node> {
    Resolver::new(dialect).resolve(node)
}
