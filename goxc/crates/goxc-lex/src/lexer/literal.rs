//! Character and string literal lexing.
//!
//! A character literal is `'X'` for any single character, or the escape
//! form `'\xHH'` with exactly two hex digits; its value is the code point.
//! String literals are scanned so they can be diagnosed precisely, but
//! they get their own token kind (`Str`) rather than being folded into
//! `Char`; the parser rejects them.

use crate::token::{Literal, Token, TokenKind};
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes a character literal. Returns `None` after reporting if the
    /// literal is malformed, so the caller keeps scanning.
    pub(crate) fn lex_char(&mut self) -> Option<Token> {
        self.cursor.advance(); // opening quote

        let value = match self.cursor.current_char() {
            '\0' => {
                self.report_error("unterminated character literal".to_string());
                return None;
            }
            '\'' => {
                self.cursor.advance();
                self.report_error("empty character literal".to_string());
                return None;
            }
            '\\' => {
                self.cursor.advance();
                self.lex_char_escape()?
            }
            c => {
                self.cursor.advance();
                c
            }
        };

        if !self.cursor.match_char('\'') {
            self.report_error("unterminated character literal".to_string());
            return None;
        }

        Some(self.make_literal_token(TokenKind::Char, Literal::Char(value)))
    }

    /// Lexes the `xHH` part of a `\xHH` escape (the backslash is already
    /// consumed).
    fn lex_char_escape(&mut self) -> Option<char> {
        if !self.cursor.match_char('x') {
            self.report_error(format!(
                "invalid escape '\\{}' in character literal",
                self.cursor.current_char()
            ));
            return None;
        }

        let mut value: u32 = 0;
        for _ in 0..2 {
            match self.cursor.current_char().to_digit(16) {
                Some(digit) => {
                    value = value * 16 + digit;
                    self.cursor.advance();
                }
                None => {
                    self.report_error(
                        "expected two hex digits in '\\xHH' escape".to_string(),
                    );
                    return None;
                }
            }
        }

        // Two hex digits cap at 0xFF, always a valid code point.
        char::from_u32(value)
    }

    /// Lexes a string literal into a `Str` token. Newlines inside the
    /// string are allowed and counted.
    pub(crate) fn lex_string(&mut self) -> Option<Token> {
        self.cursor.advance(); // opening quote

        let content_start = self.cursor.position();
        while !self.cursor.is_at_end() && self.cursor.current_char() != '"' {
            self.cursor.advance();
        }

        if self.cursor.is_at_end() {
            self.report_error("unterminated string".to_string());
            return None;
        }

        let content = self.cursor.slice_from(content_start).to_string();
        self.cursor.advance(); // closing quote

        Some(self.make_literal_token(TokenKind::Str, Literal::Str(content)))
    }
}
