//! Number literal lexing.
//!
//! Handles unsigned decimal integers and floats. A leading `-` or `+` is
//! never part of the number; sign is the unary operator's job, which keeps
//! `a-1` lexing as three tokens.

use crate::token::{Literal, Token, TokenKind};
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes an integer or float literal.
    ///
    /// Grammar: `digits` for an integer, `digits '.' digits` or
    /// `'.' digits` for a float. A trailing bare dot (`5.`) is not
    /// consumed; it falls through to ordinary dispatch.
    pub(crate) fn lex_number(&mut self) -> Token {
        while self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }

        let is_float = self.cursor.current_char() == '.'
            && self.cursor.peek_next().is_ascii_digit();

        if is_float {
            self.cursor.advance(); // '.'
            while self.cursor.current_char().is_ascii_digit() {
                self.cursor.advance();
            }

            let text = self.cursor.slice_from(self.token_start);
            // digits '.' digits always parses as f64
            let value: f64 = text.parse().unwrap_or(0.0);
            return self.make_literal_token(TokenKind::Float, Literal::Float(value));
        }

        let text = self.cursor.slice_from(self.token_start);
        match text.parse::<i64>() {
            Ok(value) => self.make_literal_token(TokenKind::Int, Literal::Int(value)),
            Err(_) => {
                self.report_error(format!("malformed number '{}'", text));
                self.make_literal_token(TokenKind::Int, Literal::Int(0))
            }
        }
    }
}
