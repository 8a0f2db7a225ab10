//! Filter expression tokenizer.

use super::{Keyword, Span, Token, TokenKind};
use crate::error::{SyntaxError, SyntaxErrorKind};

/// A lexer that tokenizes filter expressions.
pub struct Lexer<'a> {
    /// The input source code.
    input: &'a str,
    /// The current byte position.
    pos: usize,
    /// The byte position of the start of the current token.
    start: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            start: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consumes `expected` if it is the next character.
    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    const fn make_span(&self) -> Span {
        Span::new(self.start, self.pos)
    }

    const fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.make_span())
    }

    /// Scans an identifier or keyword; `.` joins qualified segments.
    fn scan_identifier(&mut self) -> Token {
        loop {
            while self.peek().is_some_and(is_ident_char) {
                self.advance();
            }
            let rest = &self.input[self.pos..];
            let mut chars = rest.chars();
            if chars.next() == Some('.') && chars.next().is_some_and(is_ident_start) {
                self.advance();
                continue;
            }
            break;
        }

        let text = &self.input[self.start..self.pos];
        match Keyword::from_str(text) {
            Some(kw) => self.make_token(TokenKind::Keyword(kw)),
            None => self.make_token(TokenKind::Identifier(text.to_string())),
        }
    }

    fn scan_number(&mut self) -> Token {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        let rest = &self.input[self.pos..];
        let mut chars = rest.chars();
        if chars.next() == Some('.') && chars.next().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }
        let text = &self.input[self.start..self.pos];
        self.make_token(TokenKind::Number(text.to_string()))
    }

    fn scan_string(&mut self) -> Result<Token, SyntaxError> {
        let (value, end) = scan_quoted(self.input, self.start)?;
        self.pos = end;
        Ok(self.make_token(TokenKind::String(value)))
    }

    /// Scans `@p<N>`.
    fn scan_parameter(&mut self) -> Result<Token, SyntaxError> {
        self.advance(); // @
        if !self.eat('p') {
            return Err(self.invalid("expected `p<N>` after `@`"));
        }
        let digits_start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        let index = self.input[digits_start..self.pos]
            .parse::<usize>()
            .map_err(|_| self.invalid("expected a parameter index after `@p`"))?;
        Ok(self.make_token(TokenKind::Parameter(index)))
    }

    fn invalid(&self, message: &str) -> SyntaxError {
        let found = &self.input[self.start..self.pos.max(self.start + 1).min(self.input.len())];
        SyntaxError {
            kind: SyntaxErrorKind::InvalidCharacter,
            message: format!("Invalid character sequence: {message}"),
            span: self.make_span(),
            found: Some(found.to_string()),
        }
    }

    /// Returns the next token, or an `Eof` token once input is exhausted.
    ///
    /// # Errors
    ///
    /// Returns a `SyntaxError` for unterminated strings and characters
    /// outside the grammar.
    pub fn next_token(&mut self) -> Result<Token, SyntaxError> {
        self.skip_whitespace();
        self.start = self.pos;

        let Some(c) = self.peek() else {
            return Ok(self.make_token(TokenKind::Eof));
        };

        if is_ident_start(c) {
            return Ok(self.scan_identifier());
        }
        if c.is_ascii_digit() {
            return Ok(self.scan_number());
        }
        match c {
            '\'' => return self.scan_string(),
            '@' => return self.scan_parameter(),
            _ => {}
        }

        self.advance();
        let kind = match c {
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            ',' => TokenKind::Comma,
            '?' => TokenKind::Question,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '=' => {
                if self.eat('=') {
                    TokenKind::EqEq
                } else {
                    TokenKind::Eq
                }
            }
            '!' => {
                if self.eat('=') {
                    TokenKind::NotEq
                } else {
                    TokenKind::Bang
                }
            }
            '<' => {
                if self.eat('>') {
                    TokenKind::LtGt
                } else if self.eat('=') {
                    TokenKind::LtEq
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                if self.eat('=') {
                    TokenKind::GtEq
                } else {
                    TokenKind::Gt
                }
            }
            '&' => {
                if !self.eat('&') {
                    return Err(self.invalid("single `&`, did you mean `&&`?"));
                }
                TokenKind::AndAnd
            }
            '|' => {
                if !self.eat('|') {
                    return Err(self.invalid("single `|`, did you mean `||`?"));
                }
                TokenKind::OrOr
            }
            other => {
                return Err(SyntaxError {
                    kind: SyntaxErrorKind::InvalidCharacter,
                    message: format!("Unexpected character '{other}'"),
                    span: self.make_span(),
                    found: Some(other.to_string()),
                });
            }
        };
        Ok(self.make_token(kind))
    }

    /// Tokenizes the entire input. The trailing `Eof` token is not included.
    ///
    /// # Errors
    ///
    /// Returns the first `SyntaxError` hit while scanning.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, SyntaxError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            if token.is_eof() {
                break;
            }
            tokens.push(token);
        }
        Ok(tokens)
    }
}

pub(crate) const fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

pub(crate) const fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Decodes the `'`-quoted literal opening at byte `open`.
///
/// `\'` and `''` yield a quote and `\\` a backslash; any other character is
/// taken verbatim. Returns the value and the offset just past the closing
/// quote.
pub(crate) fn scan_quoted(input: &str, open: usize) -> Result<(String, usize), SyntaxError> {
    let mut value = String::new();
    let mut chars = input[open + 1..].char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        match c {
            '\'' if chars.peek().is_some_and(|&(_, next)| next == '\'') => {
                value.push('\'');
                chars.next();
            }
            '\'' => return Ok((value, open + 1 + offset + 1)),
            '\\' => match input[open + 1 + offset + 1..].chars().next() {
                Some(escaped @ ('\'' | '\\')) => {
                    value.push(escaped);
                    chars.next();
                }
                _ => value.push('\\'),
            },
            other => value.push(other),
        }
    }

    Err(SyntaxError {
        kind: SyntaxErrorKind::UnterminatedString,
        message: String::from("Unterminated string literal"),
        span: Span::new(open, input.len()),
        found: None,
    })
}
