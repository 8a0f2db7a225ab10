//! Literal extraction, escaping and binding.

mod common;

use common::{compile_opts, compile_with, sql};
use oxide_filter::{
    extract_literals, Binding, CompileOptions, DialectId, LiteralMode,
};

fn bind() -> CompileOptions {
    CompileOptions {
        literals: LiteralMode::Bind,
        ..CompileOptions::default()
    }
}

// =============================================================================
// Extraction
// =============================================================================

#[test]
fn test_extracted_literal_is_escaped() {
    let out = compile_with(r"code=='abc\' AND cc'", DialectId::Postgres);
    assert_eq!(out.sql, "code = 'abc'' AND cc'");
    assert_eq!(out.params, vec!["abc' AND cc"]);
}

#[test]
fn test_logical_keywords_inside_literals_are_data() {
    let out = compile_with(
        "code == 'abc OR cc' AND name=='def'",
        DialectId::Postgres,
    );
    assert_eq!(out.sql, "code = 'abc OR cc' AND name = 'def'");
    assert_eq!(out.params, vec!["abc OR cc", "def"]);
}

#[test]
fn test_injection_attempt_stays_one_literal() {
    let out = compile_with(r"name=='x\' OR \'1\'=\'1'", DialectId::Postgres);
    assert_eq!(out.sql, "name = 'x'' OR ''1''=''1'");
    assert_eq!(out.params, vec!["x' OR '1'='1"]);
}

#[test]
fn test_empty_literal() {
    let out = compile_with("LastName == ''", DialectId::Postgres);
    assert_eq!(out.sql, "last_name = ''");
    assert_eq!(out.params, vec![""]);
}

#[test]
fn test_plain_literals_are_not_extracted() {
    let out = compile_with(r"name = 'O\'Brien'", DialectId::Postgres);
    assert_eq!(out.sql, "name = 'O''Brien'");
    assert!(out.params.is_empty());
}

#[test]
fn test_extraction_is_idempotent() {
    let once = extract_literals("a=='x' OR (b == 'y' AND c = 1)").unwrap();
    assert_eq!(once.text, "a=@p0 OR (b=@p1 AND c = 1)");
    let twice = extract_literals(&once.text).unwrap();
    assert_eq!(twice.text, once.text);
    assert!(twice.params.is_empty());
}

// =============================================================================
// Backslashes
// =============================================================================

#[test]
fn test_backslash_is_only_escaped_for_mysql() {
    let expr = r"path=='C:\\temp'";
    assert_eq!(sql(expr), r"path = 'C:\temp'");
    assert_eq!(
        compile_with(expr, DialectId::MySql).sql,
        r"path = 'C:\\temp'"
    );
    assert_eq!(compile_with(expr, DialectId::MySql).params, vec![r"C:\temp"]);
}

// =============================================================================
// Bind mode
// =============================================================================

#[test]
fn test_bind_mode_interleaves_bindings() {
    let out = compile_opts(
        "a=='x' AND b = ? AND c=='y' OR d = ?",
        DialectId::Postgres,
        bind(),
    );
    assert_eq!(out.sql, "a = ? AND b = ? AND c = ? OR d = ?");
    assert_eq!(out.params, vec!["x", "y"]);
    assert_eq!(
        out.bindings,
        vec![
            Binding::Param(0),
            Binding::External(0),
            Binding::Param(1),
            Binding::External(1),
        ]
    );
}

#[test]
fn test_bind_mode_keeps_plain_literals_inline() {
    let out = compile_opts("a == 'x' AND b LIKE 'y%'", DialectId::Postgres, bind());
    assert_eq!(out.sql, "a = ? AND b LIKE 'y%'");
    assert_eq!(out.bindings, vec![Binding::Param(0)]);
}

#[test]
fn test_inline_mode_reports_external_placeholders() {
    let out = compile_with("a == 'x' AND b = ?", DialectId::Postgres);
    assert_eq!(out.sql, "a = 'x' AND b = ?");
    assert_eq!(out.bindings, vec![Binding::External(0)]);
}

#[test]
fn test_compiled_filter_serializes() {
    let out = compile_opts("a == 'x'", DialectId::Postgres, bind());
    let json = serde_json::to_value(&out).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "sql": "a = ?",
            "params": ["x"],
            "bindings": [{"kind": "param", "index": 0}],
        })
    );
}
