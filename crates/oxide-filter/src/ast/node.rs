//! Expression tree types.

use crate::error::InvariantError;

/// Operators of the filter language, in their SQL spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    // Logical
    And,
    Or,
    Not,

    // Comparison
    Eq,
    Like,
    /// `<>`
    LtGt,
    /// `!=`
    NotEq,
    GtEq,
    LtEq,
    Gt,
    Lt,

    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::Eq => "=",
            Self::Like => "LIKE",
            Self::LtGt => "<>",
            Self::NotEq => "!=",
            Self::GtEq => ">=",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        }
    }

    /// Returns the precedence of the operator (higher = binds tighter).
    #[must_use]
    pub const fn precedence(&self) -> u8 {
        match self {
            Self::Or => 1,
            Self::And => 2,
            Self::Not => 3,
            Self::Eq
            | Self::Like
            | Self::LtGt
            | Self::NotEq
            | Self::GtEq
            | Self::LtEq
            | Self::Gt
            | Self::Lt => 4,
            Self::Add | Self::Sub => 5,
            Self::Mul | Self::Div => 6,
        }
    }

    /// `NOT` is the only prefix operator.
    #[must_use]
    pub const fn is_unary(&self) -> bool {
        matches!(self, Self::Not)
    }

    #[must_use]
    pub const fn is_comparison(&self) -> bool {
        self.precedence() == 4
    }

    /// Operators where `a op (b op c)` equals `(a op b) op c`.
    #[must_use]
    pub const fn is_associative(&self) -> bool {
        matches!(self, Self::And | Self::Or | Self::Add | Self::Mul)
    }
}

/// A leaf of the expression tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// Column name as written, possibly dot-qualified.
    Identifier(String),
    /// Numeric literal as written.
    Number(String),
    /// String literal written inline, holding the decoded value.
    String(String),
    /// `?`, bound positionally by the caller.
    Placeholder,
    /// `@pN` reference not yet rebound to its extracted value.
    Parameter(usize),
    /// An extracted literal after rebinding.
    Bound {
        /// Position in the parameter list.
        index: usize,
        /// The decoded value.
        value: String,
    },
}

/// An expression tree node. Every node owns its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// An operator application; `right` is `None` only for `NOT`.
    Operator {
        /// Operator.
        op: Operator,
        /// Left operand (the only operand of `NOT`).
        left: Box<Node>,
        /// Right operand.
        right: Option<Box<Node>>,
    },

    /// A leaf value.
    Operand(Operand),

    /// A function call.
    FunctionCall {
        /// The function name.
        name: String,
        /// The arguments, in order.
        arguments: Vec<Node>,
    },
}

impl Node {
    /// Creates a binary operator node.
    #[must_use]
    pub fn binary(left: Self, op: Operator, right: Self) -> Self {
        debug_assert!(!op.is_unary(), "NOT takes a single operand");
        Self::Operator {
            op,
            left: Box::new(left),
            right: Some(Box::new(right)),
        }
    }

    /// Creates a `NOT` node.
    #[must_use]
    pub fn not(operand: Self) -> Self {
        Self::Operator {
            op: Operator::Not,
            left: Box::new(operand),
            right: None,
        }
    }

    /// Creates a column reference.
    #[must_use]
    pub fn identifier(name: impl Into<String>) -> Self {
        Self::Operand(Operand::Identifier(name.into()))
    }

    /// Creates a numeric literal.
    #[must_use]
    pub fn number(text: impl Into<String>) -> Self {
        Self::Operand(Operand::Number(text.into()))
    }

    /// Creates a string literal from its decoded value.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::Operand(Operand::String(value.into()))
    }

    /// Creates a `?` placeholder.
    #[must_use]
    pub const fn placeholder() -> Self {
        Self::Operand(Operand::Placeholder)
    }

    /// Creates a function call.
    #[must_use]
    pub fn call(name: impl Into<String>, arguments: Vec<Self>) -> Self {
        Self::FunctionCall {
            name: name.into(),
            arguments,
        }
    }

    /// Returns the operator if this is an operator node.
    #[must_use]
    pub const fn operator(&self) -> Option<Operator> {
        match self {
            Self::Operator { op, .. } => Some(*op),
            _ => None,
        }
    }

    /// Checks operator arity and that no `@pN` reference is left unbound.
    ///
    /// # Errors
    ///
    /// Returns an `InvariantError` describing the first violation found.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        match self {
            Self::Operator { op, left, right } => {
                match (op.is_unary(), right) {
                    (true, Some(_)) => {
                        return Err(InvariantError::new("NOT node has a right operand"));
                    }
                    (false, None) => {
                        return Err(InvariantError::new(format!(
                            "binary operator {} is missing its right operand",
                            op.as_str()
                        )));
                    }
                    _ => {}
                }
                left.check_invariants()?;
                if let Some(right) = right {
                    right.check_invariants()?;
                }
                Ok(())
            }
            Self::Operand(Operand::Parameter(index)) => Err(InvariantError::new(format!(
                "parameter @p{index} was never bound"
            ))),
            Self::Operand(_) => Ok(()),
            Self::FunctionCall { arguments, .. } => {
                arguments.iter().try_for_each(Self::check_invariants)
            }
        }
    }
}

/// A parsed filter expression and the literals extracted from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedExpression {
    /// Root of the tree.
    pub root: Node,
    /// Extracted literal values; `Operand::Bound::index` points into this list.
    pub params: Vec<String>,
}

/// Replaces every `@pN` reference whose value exists in `params` with an
/// [`Operand::Bound`]. Consumes the tree and returns the rebound one.
#[must_use]
pub fn rebind(node: Node, params: &[String]) -> Node {
    match node {
        Node::Operand(Operand::Parameter(index)) => match params.get(index) {
            Some(value) => Node::Operand(Operand::Bound {
                index,
                value: value.clone(),
            }),
            None => Node::Operand(Operand::Parameter(index)),
        },
        Node::Operand(_) => node,
        Node::Operator { op, left, right } => Node::Operator {
            op,
            left: Box::new(rebind(*left, params)),
            right: right.map(|r| Box::new(rebind(*r, params))),
        },
        Node::FunctionCall { name, arguments } => Node::FunctionCall {
            name,
            arguments: arguments
                .into_iter()
                .map(|arg| rebind(arg, params))
                .collect(),
        },
    }
}
