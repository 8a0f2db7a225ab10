#![allow(dead_code)]

use oxide_filter::{
    compile, parse, reconstruct, CompileError, CompileOptions, CompiledFilter, Compiler,
    DialectId, SyntaxError,
};

pub fn compile_with(expr: &str, dialect: DialectId) -> CompiledFilter {
    compile(expr, dialect).unwrap_or_else(|e| panic!("Failed to compile: {expr}\nError: {e}"))
}

pub fn compile_opts(expr: &str, dialect: DialectId, options: CompileOptions) -> CompiledFilter {
    Compiler::new(dialect)
        .with_options(options)
        .compile(expr)
        .unwrap_or_else(|e| panic!("Failed to compile: {expr}\nError: {e}"))
}

/// Compiles for Postgres and returns the SQL only.
pub fn sql(expr: &str) -> String {
    compile_with(expr, DialectId::Postgres).sql
}

pub fn compile_err(expr: &str) -> CompileError {
    compile(expr, DialectId::Postgres)
        .expect_err(&format!("Expected compile error for: {expr}"))
}

pub fn syntax_err(expr: &str) -> SyntaxError {
    match compile_err(expr) {
        CompileError::Syntax(e) => e,
        other => panic!("Expected syntax error for {expr}, got {other:?}"),
    }
}

/// Verifies that reconstruction is a fixed point: reconstructing the tree
/// of a reconstructed expression yields the same text.
pub fn round_trip(expr: &str) {
    let first = reconstruct(&parse(expr).unwrap_or_else(|e| panic!("{expr}: {e}")).root);
    let second = reconstruct(&parse(&first).unwrap_or_else(|e| panic!("{first}: {e}")).root);
    assert_eq!(
        first, second,
        "Round-trip failed.\n  Input:    {expr}\n  First:    {first}\n  Second:   {second}"
    );
}
