//! Expression parsing using Pratt parsing (top-down operator precedence).

use goxc_lex::{Literal, TokenKind};

use crate::ast::{
    BinOp, BinaryExpr, CallExpr, CastExpr, Expr, Location, TypeName, UnOp, UnaryExpr,
};
use crate::{ParseError, Parser};

/// Binding power levels for Pratt parsing.
/// Higher numbers = tighter binding (higher precedence).
mod bp {
    /// Minimum binding power (start of expression)
    pub const MIN: u8 = 0;

    /// Logical OR: ||
    pub const LOGICAL_OR: u8 = 2;

    /// Logical AND: &&
    pub const LOGICAL_AND: u8 = 4;

    /// Comparison: <, <=, >, >=, ==, !=
    pub const COMPARISON: u8 = 6;

    /// Additive: +, -
    pub const ADDITIVE: u8 = 8;

    /// Multiplicative: *, /
    pub const MULTIPLICATIVE: u8 = 10;
}

impl Parser {
    /// Parses a complete expression.
    pub(crate) fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_expr_bp(bp::MIN)
    }

    /// Pratt parser core: parses an expression consuming only operators
    /// whose left binding power is at least `min_bp`.
    ///
    /// All binary operators are left-associative, so each right binding
    /// power is `left + 1`.
    fn parse_expr_bp(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_unary()?;

        while let Some((lbp, op)) = self.infix_binding_power() {
            if lbp < min_bp {
                break;
            }
            self.advance();
            let rhs = self.parse_expr_bp(lbp + 1)?;
            lhs = Expr::Binary(Box::new(BinaryExpr {
                left: lhs,
                op,
                right: rhs,
            }));
        }

        Ok(lhs)
    }

    /// Left binding power and operator for the current token, if it is a
    /// binary operator.
    fn infix_binding_power(&self) -> Option<(u8, BinOp)> {
        let entry = match self.peek_kind() {
            TokenKind::OrOr => (bp::LOGICAL_OR, BinOp::Or),
            TokenKind::AndAnd => (bp::LOGICAL_AND, BinOp::And),
            TokenKind::Lt => (bp::COMPARISON, BinOp::Lt),
            TokenKind::LtEq => (bp::COMPARISON, BinOp::Le),
            TokenKind::Gt => (bp::COMPARISON, BinOp::Gt),
            TokenKind::GtEq => (bp::COMPARISON, BinOp::Ge),
            TokenKind::EqEq => (bp::COMPARISON, BinOp::Eq),
            TokenKind::NotEq => (bp::COMPARISON, BinOp::Ne),
            TokenKind::Plus => (bp::ADDITIVE, BinOp::Add),
            TokenKind::Minus => (bp::ADDITIVE, BinOp::Sub),
            TokenKind::Star => (bp::MULTIPLICATIVE, BinOp::Mul),
            TokenKind::Slash => (bp::MULTIPLICATIVE, BinOp::Div),
            _ => return None,
        };
        Some(entry)
    }

    /// Parses a prefix operator chain, then a primary. Prefix operators
    /// bind tighter than any binary operator: `-a * b` is `(-a) * b`.
    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let op = match self.peek_kind() {
            TokenKind::Plus => UnOp::Pos,
            TokenKind::Minus => UnOp::Neg,
            TokenKind::Caret => UnOp::Grow,
            _ => return self.parse_primary(),
        };
        self.advance();
        let expr = self.parse_unary()?;
        Ok(Expr::Unary(Box::new(UnaryExpr { op, expr })))
    }

    /// Parses a primary expression: a literal, a parenthesized
    /// expression, a type cast `T(expr)`, a call, or a location.
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        match self.peek_kind() {
            TokenKind::Int => {
                let token = self.advance();
                match token.literal {
                    Some(Literal::Int(v)) => Ok(Expr::Int(v)),
                    _ => Err(self.error("integer token without value")),
                }
            }
            TokenKind::Float => {
                let token = self.advance();
                match token.literal {
                    Some(Literal::Float(v)) => Ok(Expr::Float(v)),
                    _ => Err(self.error("float token without value")),
                }
            }
            TokenKind::Char => {
                let token = self.advance();
                match token.literal {
                    Some(Literal::Char(c)) => Ok(Expr::Char(c)),
                    _ => Err(self.error("character token without value")),
                }
            }
            TokenKind::True => {
                self.advance();
                Ok(Expr::Bool(true))
            }
            TokenKind::False => {
                self.advance();
                Ok(Expr::Bool(false))
            }
            TokenKind::Str => Err(self.error("string literals are not supported")),
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect(TokenKind::RParen, "after parenthesized expression")?;
                Ok(expr)
            }
            kind if kind.is_type_keyword() => self.parse_cast(),
            TokenKind::Ident => {
                if self.peek_next_kind() == TokenKind::LParen {
                    self.parse_call()
                } else {
                    let token = self.advance();
                    Ok(Expr::Location(Box::new(Location::Named {
                        name: token.lexeme,
                        line: token.line,
                    })))
                }
            }
            TokenKind::Backtick => {
                let token = self.advance();
                let address = self.parse_expr()?;
                Ok(Expr::Location(Box::new(Location::Memory {
                    address,
                    line: token.line,
                })))
            }
            kind => Err(self.error(format!("expected expression, found {}", kind))),
        }
    }

    /// Parses a type cast, `T(expr)` with `T` one of the type keywords.
    fn parse_cast(&mut self) -> Result<Expr, ParseError> {
        let Some(target) = self.parse_type_name() else {
            return Err(self.error(format!(
                "expected type name in cast, found {}",
                self.peek_kind()
            )));
        };
        self.expect(TokenKind::LParen, "in type cast")?;
        let expr = self.parse_expr()?;
        self.expect(TokenKind::RParen, "in type cast")?;
        Ok(Expr::Cast(Box::new(CastExpr { target, expr })))
    }

    /// Parses a function call, `name(args)`.
    fn parse_call(&mut self) -> Result<Expr, ParseError> {
        let name_token = self.expect(TokenKind::Ident, "before call arguments")?;
        self.expect(TokenKind::LParen, "after function name")?;

        let mut args = Vec::new();
        if !self.check(TokenKind::RParen) {
            args.push(self.parse_expr()?);
            while self.match_kind(TokenKind::Comma) {
                args.push(self.parse_expr()?);
            }
        }
        self.expect(TokenKind::RParen, "after call arguments")?;

        Ok(Expr::Call(CallExpr {
            name: name_token.lexeme,
            args,
            line: name_token.line,
        }))
    }

    /// Consumes a type keyword if present.
    pub(crate) fn parse_type_name(&mut self) -> Option<TypeName> {
        let ty = match self.peek_kind() {
            TokenKind::IntType => TypeName::Int,
            TokenKind::FloatType => TypeName::Float,
            TokenKind::CharType => TypeName::Char,
            TokenKind::BoolType => TypeName::Bool,
            _ => return None,
        };
        self.advance();
        Some(ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::parse_ok;
    use crate::Stmt;

    /// Extracts the expression from a single `print e;` program.
    fn parse_expr_source(source: &str) -> Expr {
        let program = parse_ok(&format!("print {};", source));
        match program.into_iter().next() {
            Some(Stmt::Print(p)) => p.expr,
            other => panic!("expected print statement, got {:?}", other),
        }
    }

    fn as_binary(expr: &Expr) -> &BinaryExpr {
        match expr {
            Expr::Binary(b) => b,
            other => panic!("expected binary expression, got {:?}", other),
        }
    }

    #[test]
    fn test_literals() {
        assert!(matches!(parse_expr_source("42"), Expr::Int(42)));
        assert!(matches!(parse_expr_source("3.5"), Expr::Float(_)));
        assert!(matches!(parse_expr_source("'A'"), Expr::Char('A')));
        assert!(matches!(parse_expr_source("true"), Expr::Bool(true)));
        assert!(matches!(parse_expr_source("false"), Expr::Bool(false)));
    }

    #[test]
    fn test_mul_binds_tighter_on_right() {
        // a+b*c => a + (b*c)
        let expr = parse_expr_source("1+2*3");
        let outer = as_binary(&expr);
        assert_eq!(outer.op, BinOp::Add);
        assert!(matches!(outer.left, Expr::Int(1)));
        let inner = as_binary(&outer.right);
        assert_eq!(inner.op, BinOp::Mul);
    }

    #[test]
    fn test_mul_binds_tighter_on_left() {
        // a*b+c => (a*b) + c
        let expr = parse_expr_source("1*2+3");
        let outer = as_binary(&expr);
        assert_eq!(outer.op, BinOp::Add);
        let inner = as_binary(&outer.left);
        assert_eq!(inner.op, BinOp::Mul);
        assert!(matches!(outer.right, Expr::Int(3)));
    }

    #[test]
    fn test_left_associativity() {
        // a-b-c => (a-b)-c
        let expr = parse_expr_source("10-4-3");
        let outer = as_binary(&expr);
        assert_eq!(outer.op, BinOp::Sub);
        let inner = as_binary(&outer.left);
        assert_eq!(inner.op, BinOp::Sub);
        assert!(matches!(inner.left, Expr::Int(10)));
        assert!(matches!(outer.right, Expr::Int(3)));
    }

    #[test]
    fn test_parentheses_override() {
        // (a+b)*c
        let expr = parse_expr_source("(1+2)*3");
        let outer = as_binary(&expr);
        assert_eq!(outer.op, BinOp::Mul);
        let inner = as_binary(&outer.left);
        assert_eq!(inner.op, BinOp::Add);
    }

    #[test]
    fn test_comparison_below_additive() {
        // a+b < c*d
        let expr = parse_expr_source("1+2 < 3*4");
        let outer = as_binary(&expr);
        assert_eq!(outer.op, BinOp::Lt);
        assert_eq!(as_binary(&outer.left).op, BinOp::Add);
        assert_eq!(as_binary(&outer.right).op, BinOp::Mul);
    }

    #[test]
    fn test_logical_precedence() {
        // a<b && c<d || e==f  =>  ((a<b && c<d) || e==f)
        let expr = parse_expr_source("1<2 && 3<4 || 5==6");
        let outer = as_binary(&expr);
        assert_eq!(outer.op, BinOp::Or);
        assert_eq!(as_binary(&outer.left).op, BinOp::And);
        assert_eq!(as_binary(&outer.right).op, BinOp::Eq);
    }

    #[test]
    fn test_unary_binds_tighter_than_mul() {
        // -a * b => (-a) * b
        let expr = parse_expr_source("-2 * 3");
        let outer = as_binary(&expr);
        assert_eq!(outer.op, BinOp::Mul);
        assert!(matches!(
            &outer.left,
            Expr::Unary(u) if u.op == UnOp::Neg
        ));
    }

    #[test]
    fn test_nested_unary() {
        let expr = parse_expr_source("--5");
        match expr {
            Expr::Unary(outer) => {
                assert_eq!(outer.op, UnOp::Neg);
                assert!(matches!(outer.expr, Expr::Unary(_)));
            }
            other => panic!("expected unary, got {:?}", other),
        }
    }

    #[test]
    fn test_grow_operator() {
        let expr = parse_expr_source("^8");
        assert!(matches!(
            expr,
            Expr::Unary(u) if u.op == UnOp::Grow
        ));
    }

    #[test]
    fn test_type_cast() {
        let expr = parse_expr_source("float(1)");
        match expr {
            Expr::Cast(cast) => {
                assert_eq!(cast.target, TypeName::Float);
                assert!(matches!(cast.expr, Expr::Int(1)));
            }
            other => panic!("expected cast, got {:?}", other),
        }
    }

    #[test]
    fn test_call_with_arguments() {
        let expr = parse_expr_source("f(1, 2+3)");
        match expr {
            Expr::Call(call) => {
                assert_eq!(call.name, "f");
                assert_eq!(call.args.len(), 2);
            }
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_call_no_arguments() {
        let expr = parse_expr_source("f()");
        match expr {
            Expr::Call(call) => assert!(call.args.is_empty()),
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_named_location_read() {
        let expr = parse_expr_source("x");
        assert!(matches!(
            expr,
            Expr::Location(loc) if matches!(*loc, Location::Named { ref name, .. } if name == "x")
        ));
    }

    #[test]
    fn test_memory_location_read() {
        let expr = parse_expr_source("`1000");
        assert!(matches!(
            expr,
            Expr::Location(loc) if matches!(*loc, Location::Memory { .. })
        ));
    }
}
