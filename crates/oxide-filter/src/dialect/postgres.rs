//! PostgreSQL dialect.

use super::{Dialect, FunctionMapping, DATE_PARTS};

/// PostgreSQL: `len` becomes `LENGTH` and the date-part functions become
/// `date_part('<unit>', x)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PostgresDialect;

impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn function(&self, name: &str) -> Option<FunctionMapping> {
        if name == "len" {
            return Some(FunctionMapping::Rename {
                to: "LENGTH",
                arity: 1,
            });
        }
        DATE_PARTS
            .into_iter()
            .find(|unit| *unit == name)
            .map(FunctionMapping::DatePart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{reconstruct, Node};

    #[test]
    fn test_len() {
        let node = PostgresDialect
            .rewrite_function("len", vec![Node::identifier("name")])
            .unwrap();
        assert_eq!(reconstruct(&node), "LENGTH(name)");
    }

    #[test]
    fn test_date_parts() {
        for unit in DATE_PARTS {
            let node = PostgresDialect
                .rewrite_function(&unit.to_uppercase(), vec![Node::identifier("id")])
                .unwrap();
            assert_eq!(reconstruct(&node), format!("date_part('{unit}',id)"));
        }
    }

    #[test]
    fn test_unmapped_function_is_kept() {
        assert!(!PostgresDialect.supports_function("coalesce"));
        assert!(PostgresDialect.supports_function("Year"));
        assert!(!PostgresDialect.escapes_backslash());
    }
}
