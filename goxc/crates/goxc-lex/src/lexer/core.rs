//! Core lexer implementation.
//!
//! Contains the main `Lexer` struct, the token dispatch loop, and the
//! helpers shared by the specialized lexing modules.

use goxc_util::Handler;

use crate::cursor::Cursor;
use crate::token::{single_char_kind, Literal, Token, TokenKind};

/// Lexer for GoxLang source text.
///
/// Produces tokens on demand via [`next_token`](Lexer::next_token) or all
/// at once via [`tokenize`](Lexer::tokenize). Errors go to the shared
/// diagnostic handler and scanning continues, so one pass collects every
/// lexical problem in the file.
pub struct Lexer<'a> {
    /// Character cursor over the source.
    pub(crate) cursor: Cursor<'a>,

    /// Diagnostic handler for lexical errors.
    pub(crate) handler: &'a Handler,

    /// Byte offset where the current token starts.
    pub(crate) token_start: usize,

    /// Line where the current token starts (1-based).
    pub(crate) token_line: u32,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer over the given source.
    pub fn new(source: &'a str, handler: &'a Handler) -> Self {
        Self {
            cursor: Cursor::new(source),
            handler,
            token_start: 0,
            token_line: 1,
        }
    }

    /// Scans the entire source and returns the token stream, ending with
    /// an `Eof` token.
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return tokens;
            }
        }
    }

    /// Returns the next token from the source.
    ///
    /// Skips whitespace and comments, then dispatches on the first
    /// character. Unexpected characters are reported and skipped so the
    /// scan keeps going.
    pub fn next_token(&mut self) -> Token {
        loop {
            self.skip_whitespace_and_comments();

            self.token_start = self.cursor.position();
            self.token_line = self.cursor.line();

            if self.cursor.is_at_end() {
                return Token::new(TokenKind::Eof, "", self.token_line);
            }

            let c = self.cursor.current_char();
            match c {
                '=' => return self.lex_equals(),
                '<' => return self.lex_less(),
                '>' => return self.lex_greater(),
                '!' => {
                    if let Some(token) = self.lex_bang() {
                        return token;
                    }
                }
                '&' => {
                    if let Some(token) = self.lex_ampersand() {
                        return token;
                    }
                }
                '|' => {
                    if let Some(token) = self.lex_pipe() {
                        return token;
                    }
                }
                // Comments were skipped above, so a surviving '/' is division.
                '/' => {
                    self.cursor.advance();
                    return self.make_token(TokenKind::Slash);
                }
                '"' => {
                    if let Some(token) = self.lex_string() {
                        return token;
                    }
                }
                '\'' => {
                    if let Some(token) = self.lex_char() {
                        return token;
                    }
                }
                '.' if self.cursor.peek_next().is_ascii_digit() => {
                    return self.lex_number();
                }
                c if c.is_ascii_digit() => return self.lex_number(),
                c if c.is_ascii_alphabetic() || c == '_' => return self.lex_identifier(),
                c => {
                    if let Some(kind) = single_char_kind(c) {
                        self.cursor.advance();
                        return self.make_token(kind);
                    }
                    self.cursor.advance();
                    self.report_error(format!("unexpected character '{}'", c));
                }
            }
        }
    }

    /// Builds a token from the current lexeme with no literal payload.
    pub(crate) fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(
            kind,
            self.cursor.slice_from(self.token_start),
            self.token_line,
        )
    }

    /// Builds a token from the current lexeme carrying a literal value.
    pub(crate) fn make_literal_token(&self, kind: TokenKind, literal: Literal) -> Token {
        Token::with_literal(
            kind,
            self.cursor.slice_from(self.token_start),
            literal,
            self.token_line,
        )
    }

    /// Reports a lexical error at the current token's line.
    pub(crate) fn report_error(&self, message: String) {
        self.handler.error_at(self.token_line, message);
    }
}
