//! Normalized reconstruction of filter expressions.

mod common;

use common::{round_trip, sql};

// =============================================================================
// Operators and spacing
// =============================================================================

#[test]
fn test_binary_operators_are_spaced() {
    assert_eq!(sql("a=1"), "a = 1");
    assert_eq!(sql("a<>1"), "a <> 1");
    assert_eq!(sql("a!=1"), "a != 1");
    assert_eq!(sql("a>=1 AND b<=2"), "a >= 1 AND b <= 2");
    assert_eq!(sql("a>1 OR b<2"), "a > 1 OR b < 2");
}

#[test]
fn test_double_equals_is_normalized() {
    assert_eq!(sql("x==1"), "x = 1");
    assert_eq!(sql("x == y"), "x = y");
}

#[test]
fn test_symbolic_logical_operators() {
    assert_eq!(sql("a && b || !c"), "a AND b OR NOT c");
    assert_eq!(sql("not a = b"), "NOT a = b");
    assert_eq!(sql("a = 1 and b = 2 or c = 3"), "a = 1 AND b = 2 OR c = 3");
}

#[test]
fn test_like() {
    assert_eq!(
        sql("left(first_name+' '+last_name,3) like 'abc'"),
        "left(first_name + ' ' + last_name,3) LIKE 'abc'"
    );
}

#[test]
fn test_keywords_only_match_whole_words() {
    assert_eq!(sql("ORDER_ID = 1"), "order_id = 1");
    assert_eq!(sql("android = 1 OR notes = 2"), "android = 1 OR notes = 2");
}

// =============================================================================
// Precedence and parentheses
// =============================================================================

#[test]
fn test_arithmetic_chain_needs_no_parens() {
    assert_eq!(sql("1+2*3+4-5/6*7"), "1 + 2 * 3 + 4 - 5 / 6 * 7");
}

#[test]
fn test_redundant_parens_are_dropped() {
    assert_eq!(sql("((a))"), "a");
    assert_eq!(sql("(1 - 2) - 3"), "1 - 2 - 3");
    assert_eq!(sql("a OR (b OR c)"), "a OR b OR c");
    assert_eq!(sql("(a = 1) AND (b = 2)"), "a = 1 AND b = 2");
}

#[test]
fn test_required_parens_are_kept() {
    assert_eq!(sql("(a OR b) AND c"), "(a OR b) AND c");
    assert_eq!(sql("a = 1 AND (b = 2 OR c = 3)"), "a = 1 AND (b = 2 OR c = 3)");
    assert_eq!(sql("1 - (2 - 3)"), "1 - (2 - 3)");
    assert_eq!(sql("(1 + 2) * 3"), "(1 + 2) * 3");
    assert_eq!(sql("NOT (a AND b)"), "NOT (a AND b)");
    assert_eq!(sql("(a = b) = c"), "(a = b) = c");
}

#[test]
fn test_negative_numbers() {
    assert_eq!(sql("price * -1 > 0"), "price * -1 > 0");
    assert_eq!(sql("a - -1"), "a - -1");
    assert_eq!(sql("a > -2.5"), "a > -2.5");
}

#[test]
fn test_placeholders() {
    assert_eq!(
        sql("date_part('year',birth_day)=?"),
        "date_part('year',birth_day) = ?"
    );
}

// =============================================================================
// Fixed points
// =============================================================================

#[test]
fn test_round_trips() {
    for expr in [
        "1+2*3+4-5/6*7",
        "(a OR b) AND NOT c = 1",
        "left(first_name+' '+last_name,3) like 'abc'",
        "code=='abc\\' AND cc' OR x = ?",
        "NOT (a AND b) || c <> 2",
        "1 - (2 - (3 - 4))",
        "f(g(h(x)), 'a, b', -1)",
    ] {
        round_trip(expr);
    }
}
