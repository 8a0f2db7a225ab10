//! Literal extraction.
//!
//! Before parsing, every `field == '<literal>'` comparison is rewritten to
//! `field=@p<N>` and the decoded literal is pushed onto an ordered
//! parameter list. The parser never sees user-supplied string content for
//! these comparisons; the values travel separately and are rebound into the
//! tree (or bound by the driver) afterwards.

use crate::error::SyntaxError;
use crate::lexer::{is_ident_char, is_ident_start, scan_quoted, Span};

/// One `field == '<literal>'` occurrence replaced by `field=@pN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Replacement {
    /// The whole pattern in the original text.
    pub original: Span,
    /// The `field=@pN` text in the rewritten text.
    pub rewritten: Span,
    /// Byte offset of the quoted literal in the original text.
    pub literal_start: usize,
    /// Length of the field name, which is copied unchanged.
    pub field_len: usize,
}

/// Result of [`extract_literals`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// The rewritten text, with `@pN` references in place of literals.
    pub text: String,
    /// Decoded literal values, indexed by `N`.
    pub params: Vec<String>,
    /// Replacements in left-to-right order.
    pub replacements: Vec<Replacement>,
}

impl Extraction {
    /// Maps a byte offset in [`Extraction::text`] back to the input text.
    ///
    /// Offsets inside a replaced field name map one-to-one; offsets inside
    /// the generated `=@pN` map to the start of the quoted literal.
    #[must_use]
    pub fn original_offset(&self, offset: usize) -> usize {
        let mut mapped = offset;
        for r in &self.replacements {
            if offset < r.rewritten.start {
                break;
            }
            if offset < r.rewritten.end {
                let within = offset - r.rewritten.start;
                return if within < r.field_len {
                    r.original.start + within
                } else {
                    r.literal_start
                };
            }
            mapped = offset - r.rewritten.end + r.original.end;
        }
        mapped
    }

    /// Maps a span in [`Extraction::text`] back to the input text.
    #[must_use]
    pub fn original_span(&self, span: Span) -> Span {
        let start = self.original_offset(span.start);
        let end = self.original_offset(span.end).max(start);
        Span::new(start, end)
    }
}

/// Lifts `field == '<literal>'` literals out of `input`.
///
/// Inside the literal `\'` and `''` are a quote and `\\` a backslash; any
/// other character is copied verbatim and an unescaped `'` ends the literal.
/// Text without such comparisons, including text that was already
/// extracted, comes back unchanged with an empty parameter list.
///
/// # Errors
///
/// Returns a `SyntaxError` if an extracted literal is never closed.
pub fn extract_literals(input: &str) -> Result<Extraction, SyntaxError> {
    let mut text = String::with_capacity(input.len());
    let mut params = Vec::new();
    let mut replacements = Vec::new();
    let mut pos = 0;

    while let Some(c) = input[pos..].chars().next() {
        if is_ident_start(c) {
            let field_end = scan_field(input, pos);
            if let Some((value, end, literal_start)) = match_literal(input, field_end)? {
                let field = &input[pos..field_end];
                let rewritten_start = text.len();
                text.push_str(&format!("{field}=@p{}", params.len()));
                replacements.push(Replacement {
                    original: Span::new(pos, end),
                    rewritten: Span::new(rewritten_start, text.len()),
                    literal_start,
                    field_len: field.len(),
                });
                params.push(value);
                pos = end;
            } else {
                text.push_str(&input[pos..field_end]);
                pos = field_end;
            }
            continue;
        }

        if c == '\'' {
            // Literals outside the pattern are copied verbatim; an unclosed
            // one is reported by the lexer.
            let end = scan_quoted(input, pos).map_or(input.len(), |(_, end)| end);
            text.push_str(&input[pos..end]);
            pos = end;
            continue;
        }

        text.push(c);
        pos += c.len_utf8();
    }

    Ok(Extraction {
        text,
        params,
        replacements,
    })
}

/// Returns the end of the (possibly dot-qualified) field name at `start`.
fn scan_field(input: &str, start: usize) -> usize {
    let bytes = input.as_bytes();
    let mut end = start;
    while end < bytes.len() {
        let b = char::from(bytes[end]);
        let qualified = b == '.'
            && bytes
                .get(end + 1)
                .is_some_and(|&next| is_ident_start(char::from(next)));
        if is_ident_char(b) || qualified {
            end += 1;
        } else {
            break;
        }
    }
    end
}

/// Matches `<spaces>==<spaces>'<literal>'` at `from`.
fn match_literal(
    input: &str,
    from: usize,
) -> Result<Option<(String, usize, usize)>, SyntaxError> {
    let after_field = skip_spaces(input, from);
    if !input[after_field..].starts_with("==") {
        return Ok(None);
    }
    let literal_start = skip_spaces(input, after_field + 2);
    if !input[literal_start..].starts_with('\'') {
        return Ok(None);
    }
    let (value, end) = scan_quoted(input, literal_start)?;
    Ok(Some((value, end, literal_start)))
}

fn skip_spaces(input: &str, from: usize) -> usize {
    input[from..]
        .find(|c: char| c != ' ' && c != '\t')
        .map_or(input.len(), |n| from + n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SyntaxErrorKind;

    #[test]
    fn test_single_literal() {
        let ex = extract_literals(r"code=='abc\' AND cc'").unwrap();
        assert_eq!(ex.text, "code=@p0");
        assert_eq!(ex.params, vec!["abc' AND cc"]);
    }

    #[test]
    fn test_doubled_quote() {
        let ex = extract_literals("name == 'O''Brien'").unwrap();
        assert_eq!(ex.text, "name=@p0");
        assert_eq!(ex.params, vec!["O'Brien"]);
    }

    #[test]
    fn test_multiple_literals_keep_order() {
        let ex = extract_literals("code == 'abc OR cc' AND name=='def'").unwrap();
        assert_eq!(ex.text, "code=@p0 AND name=@p1");
        assert_eq!(ex.params, vec!["abc OR cc", "def"]);
    }

    #[test]
    fn test_no_literals_is_identity() {
        for input in ["a==b", "year(join_date)=?", "x = 'y'", "code=@p0 AND name=@p1", ""] {
            let ex = extract_literals(input).unwrap();
            assert_eq!(ex.text, input);
            assert!(ex.params.is_empty());
            assert!(ex.replacements.is_empty());
        }
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let once = extract_literals("a=='x' OR b=='y'").unwrap();
        let twice = extract_literals(&once.text).unwrap();
        assert_eq!(twice.text, once.text);
        assert!(twice.params.is_empty());
    }

    #[test]
    fn test_equality_inside_plain_literal_is_not_matched() {
        let ex = extract_literals("note LIKE 'a==''b'").unwrap();
        assert!(ex.params.is_empty());
    }

    #[test]
    fn test_unterminated_literal() {
        let err = extract_literals("name == 'abc").unwrap_err();
        assert_eq!(err.kind, SyntaxErrorKind::UnterminatedString);
        assert_eq!(err.span, Span::new(8, 12));
    }

    #[test]
    fn test_qualified_field() {
        let ex = extract_literals("users.name=='bob'").unwrap();
        assert_eq!(ex.text, "users.name=@p0");
        assert_eq!(ex.params, vec!["bob"]);
    }

    #[test]
    fn test_offsets_map_back_to_input() {
        // input:     "a == 'long value' AND ?"
        // rewritten: "a=@p0 AND ?"
        let ex = extract_literals("a == 'long value' AND ?").unwrap();
        assert_eq!(ex.text, "a=@p0 AND ?");
        assert_eq!(ex.original_offset(0), 0);
        assert_eq!(ex.original_offset(2), 5);
        assert_eq!(ex.original_offset(10), 22);
        assert_eq!(ex.original_span(Span::new(10, 11)), Span::new(22, 23));
    }
}
