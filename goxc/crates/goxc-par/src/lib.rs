//! goxc-par - Parser (syntactic analyzer) for GoxLang
//!
//! A recursive-descent parser over the token stream produced by
//! `goxc-lex`. Statements are dispatched on one token of lookahead;
//! expressions use Pratt parsing (top-down operator precedence).
//!
//! # Operator precedence (lowest to highest)
//!
//! | Level | Operators | Associativity |
//! |-------|-----------|---------------|
//! | 1 | `\|\|` | Left |
//! | 2 | `&&` | Left |
//! | 3 | `<`, `<=`, `>`, `>=`, `==`, `!=` | Left |
//! | 4 | `+`, `-` | Left |
//! | 5 | `*`, `/` | Left |
//! | 6 | `+`, `-`, `^` (prefix) | Right |
//!
//! The parser fails fast: the first syntax error aborts with a
//! [`ParseError`] carrying the expected-token message and the line.

pub mod ast;
mod expr;
mod items;
mod stmt;

pub use ast::*;

use goxc_lex::{Token, TokenKind};
use thiserror::Error;

/// A syntax error: what was expected, and where.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("[line {line}] syntax error: {message}")]
pub struct ParseError {
    pub line: u32,
    pub message: String,
}

/// Recursive-descent parser over a token stream.
///
/// The token stream must end with an `Eof` token (as produced by
/// [`goxc_lex::Lexer::tokenize`]).
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

impl Parser {
    /// Creates a parser over the given token stream.
    pub fn new(tokens: Vec<Token>) -> Self {
        debug_assert!(
            matches!(tokens.last(), Some(t) if t.kind == TokenKind::Eof),
            "token stream must end with Eof"
        );
        Self { tokens, current: 0 }
    }

    /// Parses the whole stream into a list of top-level statements.
    pub fn parse(&mut self) -> Result<Program, ParseError> {
        let mut program = Vec::new();
        while !self.check(TokenKind::Eof) {
            program.push(self.parse_stmt()?);
        }
        Ok(program)
    }

    /// Current token. The trailing `Eof` token is sticky.
    pub(crate) fn peek(&self) -> &Token {
        self.tokens
            .get(self.current)
            .unwrap_or_else(|| self.tokens.last().expect("non-empty token stream"))
    }

    /// Kind of the current token.
    pub(crate) fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    /// Kind of the token after the current one.
    pub(crate) fn peek_next_kind(&self) -> TokenKind {
        self.tokens
            .get(self.current + 1)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    /// Consumes and returns the current token.
    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.current < self.tokens.len() - 1 {
            self.current += 1;
        }
        token
    }

    /// Returns true if the current token has the given kind.
    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    /// Consumes the current token if it has the given kind.
    pub(crate) fn match_kind(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes a token of the given kind or fails with an
    /// expected-token message. `context` reads like "after print
    /// statement".
    pub(crate) fn expect(
        &mut self,
        kind: TokenKind,
        context: &str,
    ) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error(format!(
                "expected {} {}, found {}",
                kind,
                context,
                self.peek_kind()
            )))
        }
    }

    /// Builds a parse error at the current token's line.
    pub(crate) fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            line: self.peek().line,
            message: message.into(),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_util {
    use super::*;
    use goxc_lex::Lexer;
    use goxc_util::Handler;

    /// Lexes and parses a source snippet, panicking on lexical errors.
    pub fn parse_source(source: &str) -> Result<Program, ParseError> {
        let handler = Handler::new();
        let tokens = Lexer::new(source, &handler).tokenize();
        assert!(
            !handler.has_errors(),
            "lexical errors in test source: {:?}",
            handler.diagnostics()
        );
        Parser::new(tokens).parse()
    }

    /// Like `parse_source` but panics on syntax errors too.
    pub fn parse_ok(source: &str) -> Program {
        parse_source(source).expect("test source must parse")
    }
}
