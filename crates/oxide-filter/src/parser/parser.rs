//! Layered filter-expression parser.
//!
//! The token stream is split top-down at the loosest-binding operators that
//! sit outside any parentheses: `OR`, then `AND`, then prefix `NOT`, then
//! comparison, then additive, then multiplicative, then primary. A layer
//! collects all of its operators at once and folds the operands left to
//! right, so equal-precedence chains are left-associative and cost no
//! recursion.

use super::args::split_top_level;
use crate::ast::{Node, Operand, Operator};
use crate::error::{SyntaxError, SyntaxErrorKind};
use crate::lexer::{Keyword, Lexer, Span, Token, TokenKind};

/// Default limit on nesting depth. Each parenthesized group and each
/// function argument list adds one level.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Default limit on tree height. Every operator on the path from the root
/// to a leaf counts, so this bounds the length of flat chains.
pub const DEFAULT_MAX_HEIGHT: usize = 2048;

type Layer<'a> = fn(&Parser<'a>, &[Token], Level) -> Result<Node, SyntaxError>;

/// Position of a token run within the tree being built.
#[derive(Debug, Clone, Copy, Default)]
struct Level {
    depth: usize,
    height: usize,
}

/// Filter expression parser.
#[derive(Debug, Clone, Copy)]
pub struct Parser<'a> {
    input: &'a str,
    max_depth: usize,
    max_height: usize,
    /// Number of extracted literals `@pN` references may point at.
    param_count: Option<usize>,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given input.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            max_depth: DEFAULT_MAX_DEPTH,
            max_height: DEFAULT_MAX_HEIGHT,
            param_count: None,
        }
    }

    /// Sets the maximum nesting depth.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the maximum tree height.
    #[must_use]
    pub const fn with_max_height(mut self, max_height: usize) -> Self {
        self.max_height = max_height;
        self
    }

    /// Rejects `@pN` references with `N >= count`.
    #[must_use]
    pub const fn with_param_count(mut self, count: usize) -> Self {
        self.param_count = Some(count);
        self
    }

    /// Parses the input into a raw tree. `@pN` references are kept as
    /// [`Operand::Parameter`]; see [`rebind`](crate::ast::rebind).
    ///
    /// # Errors
    ///
    /// Returns a `SyntaxError` if the input is empty or malformed, nested
    /// deeper than the configured maximum, or taller than the configured
    /// maximum height.
    pub fn parse_expression(&self) -> Result<Node, SyntaxError> {
        let tokens = Lexer::new(self.input).tokenize()?;
        if tokens.is_empty() {
            return Err(SyntaxError::new(
                SyntaxErrorKind::EmptyInput,
                "Empty expression",
                Span::point(self.input.len()),
            ));
        }
        check_parens(&tokens)?;
        self.parse_or(&tokens, Level::default())
    }

    /// Parses `OR`/`||`.
    fn parse_or(&self, tokens: &[Token], level: Level) -> Result<Node, SyntaxError> {
        let at = positions(tokens, |t, _| t.kind.is_or());
        self.fold(tokens, &at, level, |_| Operator::Or, Self::parse_and)
    }

    /// Parses `AND`/`&&`.
    fn parse_and(&self, tokens: &[Token], level: Level) -> Result<Node, SyntaxError> {
        let at = positions(tokens, |t, _| t.kind.is_and());
        self.fold(tokens, &at, level, |_| Operator::And, Self::parse_not)
    }

    /// Parses any number of prefix `NOT`/`!`.
    fn parse_not(&self, tokens: &[Token], level: Level) -> Result<Node, SyntaxError> {
        let count = tokens.iter().take_while(|t| t.kind.is_not()).count();
        if count == 0 {
            return self.parse_comparison(tokens, level);
        }
        let rest = &tokens[count..];
        if rest.is_empty() {
            return Err(SyntaxError::unexpected_end(
                "expression after NOT",
                Span::point(tokens[count - 1].span.end),
            ));
        }

        let level = self.lengthen(tokens, level, count)?;
        let mut node = self.parse_comparison(rest, level)?;
        for _ in 0..count {
            node = Node::not(node);
        }
        Ok(node)
    }

    /// Parses a single comparison; both sides are arithmetic.
    fn parse_comparison(&self, tokens: &[Token], level: Level) -> Result<Node, SyntaxError> {
        let at = positions(tokens, |t, _| t.kind.is_comparison());
        if let [_, second, ..] = at.as_slice() {
            return Err(SyntaxError::unexpected(
                "AND or OR between comparisons",
                &tokens[*second].kind,
                tokens[*second].span,
            ));
        }
        self.fold(tokens, &at, level, comparison_operator, Self::parse_additive)
    }

    /// Parses `+` and `-`. A `-` is binary only after a token that ends an
    /// operand.
    fn parse_additive(&self, tokens: &[Token], level: Level) -> Result<Node, SyntaxError> {
        let at = positions(tokens, |t, prev| {
            matches!(t.kind, TokenKind::Plus | TokenKind::Minus)
                && prev.is_some_and(|prev| prev.kind.ends_operand())
        });
        let op = |kind: &TokenKind| {
            if *kind == TokenKind::Plus {
                Operator::Add
            } else {
                Operator::Sub
            }
        };
        self.fold(tokens, &at, level, op, Self::parse_multiplicative)
    }

    /// Parses `*` and `/`.
    fn parse_multiplicative(&self, tokens: &[Token], level: Level) -> Result<Node, SyntaxError> {
        let at = positions(tokens, |t, _| {
            matches!(t.kind, TokenKind::Star | TokenKind::Slash)
        });
        let op = |kind: &TokenKind| {
            if *kind == TokenKind::Star {
                Operator::Mul
            } else {
                Operator::Div
            }
        };
        self.fold(tokens, &at, level, op, Self::parse_primary)
    }

    /// Parses a parenthesized group, a function call or a single operand.
    fn parse_primary(&self, tokens: &[Token], level: Level) -> Result<Node, SyntaxError> {
        match tokens {
            [] => Err(SyntaxError::unexpected_end(
                "expression",
                Span::point(self.input.len()),
            )),
            [token] => self.parse_operand(token),
            [
                Token {
                    kind: TokenKind::Minus,
                    span,
                },
                Token {
                    kind: TokenKind::Number(n),
                    span: number_span,
                },
            ] if span.end == number_span.start => Ok(Node::number(format!("-{n}"))),
            [open, inner @ .., close]
                if open.kind == TokenKind::LeftParen && group_spans(tokens) =>
            {
                if inner.is_empty() {
                    return Err(SyntaxError::unexpected("expression", &close.kind, close.span));
                }
                let level = self.descend(open.span.merge(close.span), level, 0)?;
                self.parse_or(inner, level)
            }
            [name, open, ..]
                if matches!(name.kind, TokenKind::Identifier(_))
                    && open.kind == TokenKind::LeftParen
                    && group_spans(&tokens[1..]) =>
            {
                self.parse_function_call(tokens, level)
            }
            [first, second, ..] => {
                if first.kind.ends_operand() {
                    Err(SyntaxError::unexpected("operator", &second.kind, second.span))
                } else {
                    Err(SyntaxError::unexpected("operand", &first.kind, first.span))
                }
            }
        }
    }

    /// Parses `name(arg, ...)`; each argument starts at the arithmetic layer.
    fn parse_function_call(&self, tokens: &[Token], level: Level) -> Result<Node, SyntaxError> {
        let TokenKind::Identifier(name) = &tokens[0].kind else {
            return Err(SyntaxError::unexpected(
                "function name",
                &tokens[0].kind,
                tokens[0].span,
            ));
        };
        let args = &tokens[2..tokens.len() - 1];
        let close = &tokens[tokens.len() - 1];

        let arguments = if args.is_empty() {
            Vec::new()
        } else {
            let level = self.descend(tokens[1].span.merge(close.span), level, 1)?;
            split_top_level(args, close.span)?
                .into_iter()
                .map(|arg| self.parse_additive(arg, level))
                .collect::<Result<Vec<_>, _>>()?
        };

        Ok(Node::call(name.clone(), arguments))
    }

    fn parse_operand(&self, token: &Token) -> Result<Node, SyntaxError> {
        let operand = match &token.kind {
            TokenKind::Identifier(name) => Operand::Identifier(name.clone()),
            TokenKind::Number(text) => Operand::Number(text.clone()),
            TokenKind::String(value) => Operand::String(value.clone()),
            TokenKind::Question => Operand::Placeholder,
            TokenKind::Parameter(index) => {
                if self.param_count.is_some_and(|count| *index >= count) {
                    return Err(SyntaxError {
                        kind: SyntaxErrorKind::UnboundParameter,
                        message: format!("No extracted value for parameter @p{index}"),
                        span: token.span,
                        found: Some(token.kind.to_string()),
                    });
                }
                Operand::Parameter(*index)
            }
            other => return Err(SyntaxError::unexpected("operand", other, token.span)),
        };
        Ok(Node::Operand(operand))
    }

    /// Splits `tokens` at the operator indices `at`, parses every operand
    /// with `operand` and folds the results left to right.
    fn fold(
        &self,
        tokens: &[Token],
        at: &[usize],
        level: Level,
        operator: impl Fn(&TokenKind) -> Operator,
        operand: Layer<'a>,
    ) -> Result<Node, SyntaxError> {
        let Some(&last) = at.last() else {
            return operand(self, tokens, level);
        };

        let mut segments = Vec::with_capacity(at.len() + 1);
        let mut start = 0;
        for &i in at {
            if i == start {
                return Err(SyntaxError::unexpected(
                    "expression",
                    &tokens[i].kind,
                    tokens[i].span,
                ));
            }
            segments.push(&tokens[start..i]);
            start = i + 1;
        }
        if start == tokens.len() {
            let op_token = &tokens[last];
            return Err(SyntaxError::unexpected_end(
                &format!("expression after `{}`", op_token.kind),
                Span::point(op_token.span.end),
            ));
        }
        segments.push(&tokens[start..]);

        let level = self.lengthen(tokens, level, at.len())?;
        let mut node = operand(self, segments[0], level)?;
        for (&i, segment) in at.iter().zip(&segments[1..]) {
            let right = operand(self, segment, level)?;
            node = Node::binary(node, operator(&tokens[i].kind), right);
        }
        Ok(node)
    }

    /// Enters a group or argument list spanning `span`.
    fn descend(&self, span: Span, level: Level, height: usize) -> Result<Level, SyntaxError> {
        let depth = level.depth + 1;
        if depth > self.max_depth {
            return Err(SyntaxError::new(
                SyntaxErrorKind::TooDeep,
                format!("Expression nested deeper than {} levels", self.max_depth),
                span,
            ));
        }
        Ok(Level {
            depth,
            height: level.height + height,
        })
    }

    /// Stacks `count` operators over the operands of `tokens`.
    fn lengthen(&self, tokens: &[Token], level: Level, count: usize) -> Result<Level, SyntaxError> {
        let height = level.height + count;
        if height > self.max_height {
            let span = match (tokens.first(), tokens.last()) {
                (Some(first), Some(last)) => first.span.merge(last.span),
                _ => Span::point(0),
            };
            return Err(SyntaxError::new(
                SyntaxErrorKind::TooLong,
                format!("Operator chain taller than {} levels", self.max_height),
                span,
            ));
        }
        Ok(Level { height, ..level })
    }
}

/// Maps a comparison token to its operator; `==` becomes `=`.
const fn comparison_operator(kind: &TokenKind) -> Operator {
    match kind {
        TokenKind::Keyword(Keyword::Like) => Operator::Like,
        TokenKind::LtGt => Operator::LtGt,
        TokenKind::NotEq => Operator::NotEq,
        TokenKind::GtEq => Operator::GtEq,
        TokenKind::LtEq => Operator::LtEq,
        TokenKind::Gt => Operator::Gt,
        TokenKind::Lt => Operator::Lt,
        _ => Operator::Eq,
    }
}

/// Indices of all parenthesis-depth-0 tokens accepted by `pred`, left to
/// right. `pred` also sees the token immediately before the candidate.
fn positions(tokens: &[Token], pred: impl Fn(&Token, Option<&Token>) -> bool) -> Vec<usize> {
    let mut depth = 0usize;
    let mut found = Vec::new();
    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::LeftParen => depth += 1,
            TokenKind::RightParen => depth = depth.saturating_sub(1),
            _ if depth == 0 && pred(token, i.checked_sub(1).map(|j| &tokens[j])) => {
                found.push(i);
            }
            _ => {}
        }
    }
    found
}

/// True when the `(` at the start of `tokens` is closed by the last token.
fn group_spans(tokens: &[Token]) -> bool {
    if tokens.last().map(|t| &t.kind) != Some(&TokenKind::RightParen) {
        return false;
    }
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::LeftParen => depth += 1,
            TokenKind::RightParen => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return i == tokens.len() - 1;
                }
            }
            _ => {}
        }
    }
    false
}

/// Verifies that parentheses balance, reporting the offending one.
fn check_parens(tokens: &[Token]) -> Result<(), SyntaxError> {
    let mut open = Vec::new();
    for token in tokens {
        match token.kind {
            TokenKind::LeftParen => open.push(token.span),
            TokenKind::RightParen => {
                if open.pop().is_none() {
                    return Err(SyntaxError {
                        kind: SyntaxErrorKind::UnmatchedParen,
                        message: String::from("Unmatched closing parenthesis"),
                        span: token.span,
                        found: Some(String::from(")")),
                    });
                }
            }
            _ => {}
        }
    }
    match open.pop() {
        Some(span) => Err(SyntaxError {
            kind: SyntaxErrorKind::UnmatchedParen,
            message: String::from("Unclosed parenthesis"),
            span,
            found: Some(String::from("(")),
        }),
        None => Ok(()),
    }
}
