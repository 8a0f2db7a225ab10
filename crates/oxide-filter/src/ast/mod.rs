//! Expression tree and its SQL reconstruction.

mod node;
mod render;

pub use node::{rebind, Node, Operand, Operator, ParsedExpression};
pub use render::{reconstruct, Binding, LiteralMode, RenderOptions, Rendered, Renderer};
