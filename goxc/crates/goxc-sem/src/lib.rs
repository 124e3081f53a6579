//! goxc-sem - Semantic analysis for GoxLang
//!
//! Validates a parsed program in two passes: the first registers all
//! top-level functions and explicitly typed globals (so forward references
//! work), the second type-checks every statement and expression.
//! Diagnostics accumulate in the shared handler; the driver refuses to
//! lower a program that produced any.

pub mod check;
pub mod scope;
pub mod types;

pub use check::Checker;
pub use scope::{ScopeId, ScopeTree, Symbol};
pub use types::{cast_allowed, check_binop, check_unaryop};
