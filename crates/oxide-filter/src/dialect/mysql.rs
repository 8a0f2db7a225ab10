//! MySQL dialect.

use super::{Dialect, FunctionMapping};

/// MySQL: `len` becomes `CHAR_LENGTH`, the date-part functions become
/// `YEAR(x)` through `SECOND(x)`, and backslashes in literals are escaped.
#[derive(Debug, Default, Clone, Copy)]
pub struct MySqlDialect;

impl Dialect for MySqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn function(&self, name: &str) -> Option<FunctionMapping> {
        let to = match name {
            "len" => "CHAR_LENGTH",
            "year" => "YEAR",
            "month" => "MONTH",
            "day" => "DAY",
            "hour" => "HOUR",
            "minute" => "MINUTE",
            "second" => "SECOND",
            _ => return None,
        };
        Some(FunctionMapping::Rename { to, arity: 1 })
    }

    fn escapes_backslash(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{reconstruct, Node};

    #[test]
    fn test_mysql_functions() {
        let len = MySqlDialect
            .rewrite_function("LEN", vec![Node::identifier("name")])
            .unwrap();
        assert_eq!(reconstruct(&len), "CHAR_LENGTH(name)");

        let year = MySqlDialect
            .rewrite_function("year", vec![Node::identifier("birth_day")])
            .unwrap();
        assert_eq!(reconstruct(&year), "YEAR(birth_day)");
    }

    #[test]
    fn test_mysql_escapes_backslash() {
        assert!(MySqlDialect.escapes_backslash());
        assert_eq!(MySqlDialect.name(), "mysql");
    }
}
