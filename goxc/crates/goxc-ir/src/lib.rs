//! goxc-ir - Stack-machine intermediate representation
//!
//! Defines the IR module model (globals, functions, instructions) and the
//! lowering pass that flattens a validated AST into it. Every function
//! becomes a flat instruction list; top-level code and global
//! initializers land in a synthetic `main`.

pub mod ir;
pub mod lower;

pub use ir::{Instr, IrFunction, IrGlobal, IrType, Module};
pub use lower::generate;
