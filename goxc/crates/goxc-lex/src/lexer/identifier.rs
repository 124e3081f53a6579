//! Identifier and keyword lexing.

use crate::token::{keyword_from_ident, Token, TokenKind};
use crate::Lexer;

/// True for characters that may continue an identifier.
fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl<'a> Lexer<'a> {
    /// Lexes an identifier or keyword.
    ///
    /// Identifiers match `[A-Za-z_][A-Za-z0-9_]*`. After reading the
    /// lexeme, reserved words are folded to their keyword kinds.
    pub(crate) fn lex_identifier(&mut self) -> Token {
        while is_ident_continue(self.cursor.current_char()) {
            self.cursor.advance();
        }

        let text = self.cursor.slice_from(self.token_start);
        match keyword_from_ident(text) {
            Some(kind) => self.make_token(kind),
            None => self.make_token(TokenKind::Ident),
        }
    }
}
