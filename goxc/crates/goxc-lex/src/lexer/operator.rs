//! One- and two-character operator lexing.
//!
//! The two-character operators are recognized greedily; when the second
//! character does not match, the first falls through to its
//! single-character meaning. `!`, `&`, and `|` have no single-character
//! meaning in GoxLang, so a failed match there is a lexical error.

use crate::token::{Token, TokenKind};
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes `=` or `==`.
    pub(crate) fn lex_equals(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.make_token(TokenKind::EqEq)
        } else {
            self.make_token(TokenKind::Assign)
        }
    }

    /// Lexes `<` or `<=`.
    pub(crate) fn lex_less(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.make_token(TokenKind::LtEq)
        } else {
            self.make_token(TokenKind::Lt)
        }
    }

    /// Lexes `>` or `>=`.
    pub(crate) fn lex_greater(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.make_token(TokenKind::GtEq)
        } else {
            self.make_token(TokenKind::Gt)
        }
    }

    /// Lexes `!=`. A lone `!` is an error.
    pub(crate) fn lex_bang(&mut self) -> Option<Token> {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Some(self.make_token(TokenKind::NotEq))
        } else {
            self.report_error("unexpected character '!'".to_string());
            None
        }
    }

    /// Lexes `&&`. A lone `&` is an error.
    pub(crate) fn lex_ampersand(&mut self) -> Option<Token> {
        self.cursor.advance();
        if self.cursor.match_char('&') {
            Some(self.make_token(TokenKind::AndAnd))
        } else {
            self.report_error("unexpected character '&'".to_string());
            None
        }
    }

    /// Lexes `||`. A lone `|` is an error.
    pub(crate) fn lex_pipe(&mut self) -> Option<Token> {
        self.cursor.advance();
        if self.cursor.match_char('|') {
            Some(self.make_token(TokenKind::OrOr))
        } else {
            self.report_error("unexpected character '|'".to_string());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Lexer, TokenKind};
    use goxc_util::Handler;

    fn kinds_of(source: &str) -> Vec<TokenKind> {
        let handler = Handler::new();
        let tokens = Lexer::new(source, &handler).tokenize();
        assert!(!handler.has_errors());
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_relational_pairs() {
        assert_eq!(
            kinds_of("< <= > >="),
            vec![
                TokenKind::Lt,
                TokenKind::LtEq,
                TokenKind::Gt,
                TokenKind::GtEq,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_adjacent_operators() {
        // "<=<" must not eat three characters greedily
        assert_eq!(
            kinds_of("<=<"),
            vec![TokenKind::LtEq, TokenKind::Lt, TokenKind::Eof]
        );
    }

    #[test]
    fn test_logical_operators() {
        assert_eq!(
            kinds_of("a && b || c"),
            vec![
                TokenKind::Ident,
                TokenKind::AndAnd,
                TokenKind::Ident,
                TokenKind::OrOr,
                TokenKind::Ident,
                TokenKind::Eof
            ]
        );
    }
}
