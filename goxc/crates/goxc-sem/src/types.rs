//! Operator and cast typing rules.
//!
//! Pure lookup functions shared by the checker (to validate) and the IR
//! lowerer (to recompute expression types during opcode selection).

use goxc_par::{BinOp, TypeName, UnOp};

/// Result type of a binary operation, or `None` if the operand pair is
/// not accepted.
///
/// Arithmetic works on matching numeric pairs. The relational operators
/// compare matching numeric pairs and chars; `==`/`!=` also compare
/// bools. The logical operators require bools on both sides.
pub fn check_binop(op: BinOp, left: TypeName, right: TypeName) -> Option<TypeName> {
    use TypeName::*;

    match op {
        BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div => match (left, right) {
            (Int, Int) => Some(Int),
            (Float, Float) => Some(Float),
            _ => None,
        },
        BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => match (left, right) {
            (Int, Int) | (Float, Float) | (Char, Char) => Some(Bool),
            _ => None,
        },
        BinOp::Eq | BinOp::Ne => match (left, right) {
            (Int, Int) | (Float, Float) | (Char, Char) | (Bool, Bool) => Some(Bool),
            _ => None,
        },
        BinOp::And | BinOp::Or => match (left, right) {
            (Bool, Bool) => Some(Bool),
            _ => None,
        },
    }
}

/// Result type of a unary operation, or `None` if the operand type is
/// not accepted.
pub fn check_unaryop(op: UnOp, ty: TypeName) -> Option<TypeName> {
    use TypeName::*;

    match op {
        UnOp::Pos | UnOp::Neg => match ty {
            Int => Some(Int),
            Float => Some(Float),
            _ => None,
        },
        UnOp::Not => match ty {
            Bool => Some(Bool),
            _ => None,
        },
        UnOp::Grow => match ty {
            Int => Some(Int),
            _ => None,
        },
    }
}

/// Whether `T(expr)` is a legal cast. Every scalar pair is; the lowerer
/// only emits a conversion when the IR representation changes.
pub fn cast_allowed(_from: TypeName, _to: TypeName) -> bool {
    true
}
