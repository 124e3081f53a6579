//! goxc-lex - Lexical analyzer for GoxLang
//!
//! Transforms source text into a stream of [`Token`]s. The lexer is a
//! single-pass scanner with one character of lookahead; it skips whitespace
//! and comments, folds keywords out of identifiers, and recognizes the
//! two-character operators (`==`, `!=`, `<=`, `>=`, `&&`, `||`) before
//! falling back to their single-character meanings.
//!
//! Lexical errors are reported through the shared diagnostic
//! [`Handler`](goxc_util::Handler); scanning continues after an error so a
//! single run can surface every problem in the file.

pub mod cursor;
mod lexer;
pub mod token;

pub use cursor::Cursor;
pub use lexer::Lexer;
pub use token::{keyword_from_ident, Literal, Token, TokenKind};
