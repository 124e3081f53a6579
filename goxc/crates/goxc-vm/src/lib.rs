//! goxc-vm - Stack-machine interpreter for GoxLang IR
//!
//! Executes a compiled [`Module`](goxc_ir::Module), starting from its
//! synthetic `main`. The machine keeps a value stack shared across
//! frames, per-frame locals, zero-initialized globals, and a sparse
//! memory image addressed by `PEEK*`/`POKE*`/`GROW`.
//!
//! Structured control flow (`IF`/`ELSE`/`ENDIF`, `LOOP`/`CBREAK`/
//! `CONTINUE`/`ENDLOOP`) is resolved once per frame into a jump table of
//! structurally matching targets; nesting to any depth costs nothing at
//! dispatch time and an unbalanced structure surfaces as a runtime error.

mod control;
mod machine;

use std::fmt;

use goxc_ir::IrType;
use thiserror::Error;

pub use machine::StackMachine;

/// A runtime value: the IR's two representation classes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
}

impl Value {
    /// The zero value of an IR type, used to initialize globals and
    /// declared locals.
    pub fn zero(ty: IrType) -> Value {
        match ty {
            IrType::I => Value::Int(0),
            IrType::F => Value::Float(0.0),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            // {:?} keeps a trailing ".0" on whole floats
            Value::Float(v) => write!(f, "{:?}", v),
        }
    }
}

/// Errors that terminate the interpreter.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("division by zero")]
    DivideByZero,

    #[error("value stack underflow during {0}")]
    StackUnderflow(&'static str),

    #[error("expected an integer on the stack for {0}")]
    ExpectedInt(&'static str),

    #[error("expected a float on the stack for {0}")]
    ExpectedFloat(&'static str),

    #[error("call to undefined function '{0}'")]
    UndefinedFunction(String),

    #[error("call to imported function '{0}'")]
    ImportedCall(String),

    #[error("access to undeclared local '{0}'")]
    UndeclaredLocal(String),

    #[error("access to undeclared global '{0}'")]
    UndeclaredGlobal(String),

    #[error("no matching {target} for {op}")]
    UnmatchedLabel {
        op: &'static str,
        target: &'static str,
    },

    #[error("module has no 'main' function")]
    MissingMain,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
