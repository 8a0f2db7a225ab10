//! Generic SQL dialect.

use super::Dialect;

/// A dialect that only normalizes identifiers; every function call is
/// written as it appears in the expression.
#[derive(Debug, Default, Clone, Copy)]
pub struct GenericDialect;

impl Dialect for GenericDialect {
    fn name(&self) -> &'static str {
        "generic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Node;

    #[test]
    fn test_generic_dialect() {
        let dialect = GenericDialect;
        assert_eq!(dialect.name(), "generic");
        assert_eq!(dialect.identifier("BirthDay"), "birth_day");
        assert!(!dialect.supports_function("len"));
        assert!(!dialect.escapes_backslash());
        assert_eq!(
            dialect
                .rewrite_function("year", vec![Node::identifier("d")])
                .unwrap(),
            Node::call("year", vec![Node::identifier("d")])
        );
    }
}
