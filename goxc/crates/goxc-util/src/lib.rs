//! goxc-util - Shared compiler infrastructure
//!
//! This crate holds the pieces every phase of the GoxLang pipeline needs:
//! the diagnostic types (errors and warnings tagged with a source line) and
//! the handler that collects them across a compilation.

pub mod diagnostic;

pub use diagnostic::{Diagnostic, Handler, Level};
