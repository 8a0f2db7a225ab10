//! Function argument splitting.

use crate::error::{SyntaxError, SyntaxErrorKind};
use crate::lexer::{scan_quoted, Span, Token, TokenKind};

/// Splits the argument list of a call such as
/// `f(concat(first_name,' ',last_name),1)` into its top-level arguments,
/// trimmed and in order.
///
/// Commas inside nested parentheses or `'`-quoted literals do not split.
/// `f()` yields no arguments.
///
/// # Errors
///
/// Returns a `SyntaxError` when the text has no argument list, when the
/// parentheses do not balance, when a literal is unterminated, or when an
/// argument slot is empty (`f(a,,b)`).
pub fn split_arguments(call: &str) -> Result<Vec<String>, SyntaxError> {
    if call.trim().is_empty() {
        return Err(SyntaxError::new(
            SyntaxErrorKind::EmptyInput,
            "Empty function call",
            Span::point(call.len()),
        ));
    }
    let Some(open) = call.find('(') else {
        return Err(SyntaxError::unexpected_end(
            "argument list",
            Span::point(call.len()),
        ));
    };

    let mut arguments = Vec::new();
    let mut depth = 0usize;
    let mut slot_start = open + 1;
    let mut pos = open;

    while pos < call.len() {
        let b = call.as_bytes()[pos];
        match b {
            b'\'' => {
                let (_, end) = scan_quoted(call, pos)?;
                pos = end;
                continue;
            }
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    push_slot(&mut arguments, call, slot_start, pos, true)?;
                    let rest = &call[pos + 1..];
                    if let Some(extra) = rest.find(|c: char| !c.is_whitespace()) {
                        let at = pos + 1 + extra;
                        return Err(SyntaxError::new(
                            SyntaxErrorKind::UnexpectedToken,
                            "Unexpected text after argument list",
                            Span::new(at, call.len()),
                        ));
                    }
                    return Ok(arguments);
                }
            }
            b',' if depth == 1 => {
                push_slot(&mut arguments, call, slot_start, pos, false)?;
                slot_start = pos + 1;
            }
            _ => {}
        }
        pos += 1;
    }

    Err(SyntaxError {
        kind: SyntaxErrorKind::UnmatchedParen,
        message: String::from("Unclosed argument list"),
        span: Span::new(open, open + 1),
        found: Some(String::from("(")),
    })
}

/// Appends `call[start..end]` trimmed. An empty slot is an error unless it
/// is the only one (`f()`).
fn push_slot(
    arguments: &mut Vec<String>,
    call: &str,
    start: usize,
    end: usize,
    last: bool,
) -> Result<(), SyntaxError> {
    let slot = call[start..end].trim();
    if slot.is_empty() {
        if last && arguments.is_empty() {
            return Ok(());
        }
        return Err(SyntaxError::new(
            SyntaxErrorKind::EmptyArgument,
            "Empty function argument",
            Span::point(end),
        ));
    }
    arguments.push(slot.to_string());
    Ok(())
}

/// Token-level counterpart of [`split_arguments`] used by the parser.
/// `args` is the non-empty token run between the call's parentheses.
pub(super) fn split_top_level(args: &[Token], close: Span) -> Result<Vec<&[Token]>, SyntaxError> {
    let mut slots = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, token) in args.iter().enumerate() {
        match token.kind {
            TokenKind::LeftParen => depth += 1,
            TokenKind::RightParen => depth = depth.saturating_sub(1),
            TokenKind::Comma if depth == 0 => {
                if i == start {
                    return Err(empty_argument(token.span));
                }
                slots.push(&args[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if start == args.len() {
        return Err(empty_argument(Span::point(close.start)));
    }
    slots.push(&args[start..]);
    Ok(slots)
}

fn empty_argument(span: Span) -> SyntaxError {
    SyntaxError {
        kind: SyntaxErrorKind::EmptyArgument,
        message: String::from("Empty function argument"),
        span,
        found: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_call_stays_whole() {
        assert_eq!(
            split_arguments("f(concat(first_name,' ',last_name),1)").unwrap(),
            vec!["concat(first_name,' ',last_name)", "1"]
        );
    }

    #[test]
    fn test_comma_inside_literal_does_not_split() {
        assert_eq!(
            split_arguments("coalesce(name, 'a, b')").unwrap(),
            vec!["name", "'a, b'"]
        );
        assert_eq!(
            split_arguments(r"f('it\'s, ok', x)").unwrap(),
            vec![r"'it\'s, ok'", "x"]
        );
    }

    #[test]
    fn test_no_arguments() {
        assert!(split_arguments("now()").unwrap().is_empty());
        assert!(split_arguments("now(  )").unwrap().is_empty());
    }

    #[test]
    fn test_arguments_are_trimmed() {
        assert_eq!(
            split_arguments("left( name ,  3 )").unwrap(),
            vec!["name", "3"]
        );
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            split_arguments("f(a,,b)").unwrap_err().kind,
            SyntaxErrorKind::EmptyArgument
        );
        assert_eq!(
            split_arguments("f(a,)").unwrap_err().kind,
            SyntaxErrorKind::EmptyArgument
        );
        assert_eq!(
            split_arguments("f(a, g(b)").unwrap_err().kind,
            SyntaxErrorKind::UnmatchedParen
        );
        assert_eq!(
            split_arguments("f('a)").unwrap_err().kind,
            SyntaxErrorKind::UnterminatedString
        );
        assert_eq!(
            split_arguments("f").unwrap_err().kind,
            SyntaxErrorKind::UnexpectedEnd
        );
        assert_eq!(
            split_arguments("f(a) b").unwrap_err().kind,
            SyntaxErrorKind::UnexpectedToken
        );
        assert_eq!(
            split_arguments("  ").unwrap_err().kind,
            SyntaxErrorKind::EmptyInput
        );
    }
}
