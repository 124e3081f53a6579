//! Declaration parsing: variables, constants, and functions.

use goxc_lex::TokenKind;

use crate::ast::{FuncDecl, Param, Stmt, VarDecl};
use crate::{ParseError, Parser};

impl Parser {
    /// Parses `(var|const) IDENT [type] [= expr] ;`.
    ///
    /// Both the type annotation and the initializer are optional in the
    /// grammar; the semantic checker enforces that at least one is
    /// present and that constants are initialized.
    pub(crate) fn parse_var_decl(&mut self) -> Result<Stmt, ParseError> {
        let is_const = self.match_kind(TokenKind::Const);
        if !is_const {
            self.expect(TokenKind::Var, "to start variable declaration")?;
        }

        let name_token = self.expect(TokenKind::Ident, "as variable name")?;
        let ty = self.parse_type_name();

        let init = if self.match_kind(TokenKind::Assign) {
            Some(self.parse_expr()?)
        } else {
            None
        };

        self.expect(TokenKind::Semi, "after variable declaration")?;

        Ok(Stmt::Var(VarDecl {
            name: name_token.lexeme,
            ty,
            init,
            is_const,
            line: name_token.line,
        }))
    }

    /// Parses `[import] func IDENT ( params ) return_type { body }`.
    ///
    /// The return type is mandatory. Imported functions still carry a
    /// syntactic body (usually empty); it is never lowered.
    pub(crate) fn parse_func_decl(&mut self) -> Result<Stmt, ParseError> {
        let imported = self.match_kind(TokenKind::Import);
        let line = self.expect(TokenKind::Func, "to start function declaration")?.line;

        let name_token = self.expect(TokenKind::Ident, "as function name")?;
        self.expect(TokenKind::LParen, "after function name")?;
        let params = self.parse_params()?;
        self.expect(TokenKind::RParen, "after parameters")?;

        let return_type = self.parse_type_name().ok_or_else(|| {
            self.error(format!(
                "expected return type after parameters, found {}",
                self.peek_kind()
            ))
        })?;

        let body = self.parse_block("before function body")?;

        Ok(Stmt::Func(FuncDecl {
            name: name_token.lexeme,
            params,
            return_type,
            body,
            imported,
            line,
        }))
    }

    /// Parses a comma-separated list of `IDENT type` pairs.
    fn parse_params(&mut self) -> Result<Vec<Param>, ParseError> {
        let mut params = Vec::new();
        if !self.check(TokenKind::Ident) {
            return Ok(params);
        }

        loop {
            let name_token = self.expect(TokenKind::Ident, "as parameter name")?;
            let ty = self.parse_type_name().ok_or_else(|| {
                self.error(format!(
                    "expected parameter type, found {}",
                    self.peek_kind()
                ))
            })?;
            params.push(Param {
                name: name_token.lexeme,
                ty,
            });
            if !self.match_kind(TokenKind::Comma) {
                break;
            }
        }
        Ok(params)
    }
}
