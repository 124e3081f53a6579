//! Statement parsing.
//!
//! One token of lookahead chooses the production; every statement except
//! the block-structured ones (`if`, `while`, `func`) ends with `;`.

use goxc_lex::TokenKind;

use crate::ast::{
    AssignStmt, ExprStmt, IfStmt, Location, PrintStmt, ReturnStmt, Stmt, WhileStmt,
};
use crate::{ParseError, Parser};

impl Parser {
    /// Parses one statement.
    pub(crate) fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        match self.peek_kind() {
            TokenKind::Ident if self.peek_next_kind() == TokenKind::Assign => {
                self.parse_assignment()
            }
            TokenKind::Backtick => self.parse_assignment(),
            TokenKind::Var | TokenKind::Const => self.parse_var_decl(),
            TokenKind::Import | TokenKind::Func => self.parse_func_decl(),
            TokenKind::If => self.parse_if_stmt(),
            TokenKind::While => self.parse_while_stmt(),
            TokenKind::Break => {
                let line = self.advance().line;
                self.expect(TokenKind::Semi, "after 'break'")?;
                Ok(Stmt::Break { line })
            }
            TokenKind::Continue => {
                let line = self.advance().line;
                self.expect(TokenKind::Semi, "after 'continue'")?;
                Ok(Stmt::Continue { line })
            }
            TokenKind::Return => {
                let line = self.advance().line;
                let expr = self.parse_expr()?;
                self.expect(TokenKind::Semi, "after return statement")?;
                Ok(Stmt::Return(ReturnStmt { expr, line }))
            }
            TokenKind::Print => {
                let line = self.advance().line;
                let expr = self.parse_expr()?;
                self.expect(TokenKind::Semi, "after print statement")?;
                Ok(Stmt::Print(PrintStmt { expr, line }))
            }
            _ => {
                let line = self.peek().line;
                let expr = self.parse_expr()?;
                self.expect(TokenKind::Semi, "after expression")?;
                Ok(Stmt::Expr(ExprStmt { expr, line }))
            }
        }
    }

    /// Parses `location = expr ;`.
    fn parse_assignment(&mut self) -> Result<Stmt, ParseError> {
        let target = self.parse_location()?;
        let line = target.line();
        self.expect(TokenKind::Assign, "in assignment")?;
        let value = self.parse_expr()?;
        self.expect(TokenKind::Semi, "after assignment")?;
        Ok(Stmt::Assign(AssignStmt {
            target,
            value,
            line,
        }))
    }

    /// Parses an assignable location: an identifier, or `` ` `` followed
    /// by an address expression.
    fn parse_location(&mut self) -> Result<Location, ParseError> {
        if self.check(TokenKind::Backtick) {
            let line = self.advance().line;
            let address = self.parse_expr()?;
            Ok(Location::Memory { address, line })
        } else {
            let token = self.expect(TokenKind::Ident, "as assignment target")?;
            Ok(Location::Named {
                name: token.lexeme,
                line: token.line,
            })
        }
    }

    /// Parses `if cond { ... } [else { ... }]`. A missing `else` yields
    /// an empty alternative branch.
    fn parse_if_stmt(&mut self) -> Result<Stmt, ParseError> {
        let line = self.expect(TokenKind::If, "to start if statement")?.line;
        let condition = self.parse_expr()?;
        let then_branch = self.parse_block("after if condition")?;

        let else_branch = if self.match_kind(TokenKind::Else) {
            self.parse_block("after 'else'")?
        } else {
            Vec::new()
        };

        Ok(Stmt::If(IfStmt {
            condition,
            then_branch,
            else_branch,
            line,
        }))
    }

    /// Parses `while cond { ... }`.
    fn parse_while_stmt(&mut self) -> Result<Stmt, ParseError> {
        let line = self.expect(TokenKind::While, "to start while statement")?.line;
        let condition = self.parse_expr()?;
        let body = self.parse_block("after while condition")?;
        Ok(Stmt::While(WhileStmt {
            condition,
            body,
            line,
        }))
    }

    /// Parses a braced statement list.
    pub(crate) fn parse_block(&mut self, context: &str) -> Result<Vec<Stmt>, ParseError> {
        self.expect(TokenKind::LBrace, context)?;
        let mut body = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.check(TokenKind::Eof) {
            body.push(self.parse_stmt()?);
        }
        self.expect(TokenKind::RBrace, "to close block")?;
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{parse_ok, parse_source};
    use crate::Expr;

    #[test]
    fn test_assignment() {
        let program = parse_ok("x = 42;");
        match &program[0] {
            Stmt::Assign(assign) => {
                assert!(matches!(
                    &assign.target,
                    Location::Named { name, .. } if name == "x"
                ));
                assert!(matches!(assign.value, Expr::Int(42)));
            }
            other => panic!("expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_memory_assignment() {
        let program = parse_ok("`1000 = 7;");
        match &program[0] {
            Stmt::Assign(assign) => {
                assert!(matches!(assign.target, Location::Memory { .. }));
            }
            other => panic!("expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_print_statement() {
        let program = parse_ok("print 1+2;");
        assert!(matches!(&program[0], Stmt::Print(_)));
    }

    #[test]
    fn test_if_without_else() {
        let program = parse_ok("if true { print 1; }");
        match &program[0] {
            Stmt::If(stmt) => {
                assert_eq!(stmt.then_branch.len(), 1);
                assert!(stmt.else_branch.is_empty());
            }
            other => panic!("expected if, got {:?}", other),
        }
    }

    #[test]
    fn test_if_with_else() {
        let program = parse_ok("if true { print 1; } else { print 2; print 3; }");
        match &program[0] {
            Stmt::If(stmt) => {
                assert_eq!(stmt.then_branch.len(), 1);
                assert_eq!(stmt.else_branch.len(), 2);
            }
            other => panic!("expected if, got {:?}", other),
        }
    }

    #[test]
    fn test_while_loop() {
        let program = parse_ok("while 1 < 2 { x = 1; }");
        match &program[0] {
            Stmt::While(stmt) => assert_eq!(stmt.body.len(), 1),
            other => panic!("expected while, got {:?}", other),
        }
    }

    #[test]
    fn test_break_and_continue_need_semicolons() {
        let program = parse_ok("while true { break; continue; }");
        match &program[0] {
            Stmt::While(stmt) => {
                assert!(matches!(stmt.body[0], Stmt::Break { .. }));
                assert!(matches!(stmt.body[1], Stmt::Continue { .. }));
            }
            other => panic!("expected while, got {:?}", other),
        }

        assert!(parse_source("while true { break }").is_err());
    }

    #[test]
    fn test_expression_statement() {
        let program = parse_ok("f(1);");
        assert!(matches!(&program[0], Stmt::Expr(_)));
    }

    #[test]
    fn test_missing_semicolon() {
        let err = parse_source("print 1").unwrap_err();
        assert!(err.message.contains("';'"), "message: {}", err.message);
    }

    #[test]
    fn test_unclosed_block() {
        assert!(parse_source("while true { print 1;").is_err());
    }
}
