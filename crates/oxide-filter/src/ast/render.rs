//! Serializes expression trees back into SQL text.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Node, Operand, Operator};

/// How extracted literals ([`Operand::Bound`]) are written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiteralMode {
    /// Re-inline the value as a quoted SQL string with quotes doubled.
    #[default]
    Inline,
    /// Emit `?` and report the value through the binding list.
    Bind,
}

/// Reconstruction settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOptions {
    /// Treatment of extracted literals.
    pub literals: LiteralMode,
    /// Also double `\` inside string literals, for dialects that treat it
    /// as an escape character.
    pub escape_backslash: bool,
}

/// What a `?` in the rendered SQL must be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "index")]
pub enum Binding {
    /// The n-th (0-based) `?` written in the original expression.
    External(usize),
    /// The extracted literal at this position of the parameter list.
    Param(usize),
}

/// Rendered SQL plus the positional meaning of each `?` in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    /// The SQL fragment.
    pub sql: String,
    /// One entry per `?` in `sql`, left to right.
    pub bindings: Vec<Binding>,
}

/// Writes a [`Node`] tree as SQL, adding parentheses only where the tree
/// shape would otherwise be lost.
#[derive(Debug, Default)]
pub struct Renderer {
    options: RenderOptions,
    out: String,
    bindings: Vec<Binding>,
    external: usize,
}

impl Renderer {
    /// Creates a renderer with the given options.
    #[must_use]
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Renders `node`, consuming the renderer.
    #[must_use]
    pub fn render(mut self, node: &Node) -> Rendered {
        self.node(node);
        Rendered {
            sql: self.out,
            bindings: self.bindings,
        }
    }

    fn node(&mut self, node: &Node) {
        match node {
            Node::Operand(operand) => self.operand(operand),
            Node::FunctionCall { name, arguments } => {
                self.out.push_str(name);
                self.out.push('(');
                for (i, arg) in arguments.iter().enumerate() {
                    if i > 0 {
                        self.out.push(',');
                    }
                    self.node(arg);
                }
                self.out.push(')');
            }
            Node::Operator { op, left, right } => match right {
                None => {
                    self.out.push_str(op.as_str());
                    self.out.push(' ');
                    self.child(*op, left, false);
                }
                Some(right) => {
                    self.child(*op, left, false);
                    self.out.push(' ');
                    self.out.push_str(op.as_str());
                    self.out.push(' ');
                    self.child(*op, right, true);
                }
            },
        }
    }

    fn child(&mut self, parent: Operator, child: &Node, is_right: bool) {
        if needs_parens(parent, child, is_right) {
            self.out.push('(');
            self.node(child);
            self.out.push(')');
        } else {
            self.node(child);
        }
    }

    fn operand(&mut self, operand: &Operand) {
        match operand {
            Operand::Identifier(text) | Operand::Number(text) => self.out.push_str(text),
            Operand::String(value) => self.quoted(value),
            Operand::Placeholder => {
                self.out.push('?');
                self.bindings.push(Binding::External(self.external));
                self.external += 1;
            }
            Operand::Parameter(index) => {
                self.out.push_str("@p");
                self.out.push_str(&index.to_string());
            }
            Operand::Bound { index, value } => match self.options.literals {
                LiteralMode::Inline => self.quoted(value),
                LiteralMode::Bind => {
                    self.out.push('?');
                    self.bindings.push(Binding::Param(*index));
                }
            },
        }
    }

    fn quoted(&mut self, value: &str) {
        self.out.push('\'');
        for c in value.chars() {
            match c {
                '\'' => self.out.push_str("''"),
                '\\' if self.options.escape_backslash => self.out.push_str("\\\\"),
                other => self.out.push(other),
            }
        }
        self.out.push('\'');
    }
}

/// A child is wrapped when it binds looser than its parent, when two
/// comparisons nest, or when it sits on the right of an equal-precedence
/// operator that is not associative with it.
fn needs_parens(parent: Operator, child: &Node, is_right: bool) -> bool {
    let Some(child_op) = child.operator() else {
        return false;
    };
    let (p, c) = (parent.precedence(), child_op.precedence());
    if c < p || (parent.is_comparison() && child_op.is_comparison()) {
        return true;
    }
    is_right && c == p && !(child_op == parent && parent.is_associative())
}

/// Reconstructs SQL text from a tree, re-inlining extracted literals.
#[must_use]
pub fn reconstruct(node: &Node) -> String {
    Renderer::new(RenderOptions::default()).render(node).sql
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&reconstruct(self))
    }
}
