//! Diagnostic module - Error and warning reporting infrastructure.
//!
//! Every compile phase reports problems as [`Diagnostic`] values collected
//! by a shared [`Handler`]. The handler never aborts on its own; each phase
//! decides whether to continue (the lexer does, the semantic checker does)
//! or to stop at the first failure (the parser).
//!
//! # Examples
//!
//! ```
//! use goxc_util::Handler;
//!
//! let handler = Handler::new();
//! handler.error_at(3, "unexpected character '@'");
//!
//! if handler.has_errors() {
//!     eprintln!("compilation failed with {} errors", handler.error_count());
//! }
//! ```

use std::cell::RefCell;
use std::fmt;

/// Diagnostic severity level
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    /// An error that prevents later phases from running
    Error,
    /// A warning that doesn't prevent compilation
    Warning,
    /// Additional information about a diagnostic
    Note,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "error"),
            Level::Warning => write!(f, "warning"),
            Level::Note => write!(f, "note"),
        }
    }
}

/// A diagnostic message with severity and source location.
///
/// The location is a 1-based line number; `line` is `None` for problems
/// that have no single source line (e.g. a missing `main`).
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    /// Diagnostic severity level
    pub level: Level,
    /// Main diagnostic message
    pub message: String,
    /// Source line (1-based), when known
    pub line: Option<u32>,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(level: Level, message: impl Into<String>, line: Option<u32>) -> Self {
        Self {
            level,
            message: message.into(),
            line,
        }
    }

    /// Create an error diagnostic at a source line
    pub fn error(message: impl Into<String>, line: u32) -> Self {
        Self::new(Level::Error, message, Some(line))
    }

    /// Create a warning diagnostic at a source line
    pub fn warning(message: impl Into<String>, line: u32) -> Self {
        Self::new(Level::Warning, message, Some(line))
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "[line {}] {}: {}", line, self.level, self.message),
            None => write!(f, "{}: {}", self.level, self.message),
        }
    }
}

/// Handler for collecting and reporting diagnostics.
///
/// The `Handler` collects diagnostics behind a `RefCell` so phases that
/// only hold a shared reference can still report. Queries (`has_errors`,
/// `error_count`) drive the driver's short-circuiting between phases.
pub struct Handler {
    /// Collected diagnostics, in report order
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl Handler {
    /// Create a new handler
    pub fn new() -> Self {
        Self {
            diagnostics: RefCell::new(Vec::new()),
        }
    }

    /// Report an error at a source line
    pub fn error_at(&self, line: u32, message: impl Into<String>) {
        self.emit(Diagnostic::error(message, line));
    }

    /// Report an error with no particular source line
    pub fn error(&self, message: impl Into<String>) {
        self.emit(Diagnostic::new(Level::Error, message, None));
    }

    /// Report a warning at a source line
    pub fn warning_at(&self, line: u32, message: impl Into<String>) {
        self.emit(Diagnostic::warning(message, line));
    }

    /// Emit a pre-built diagnostic
    pub fn emit(&self, diagnostic: Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    /// Check if any errors have been reported
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .borrow()
            .iter()
            .any(|d| d.level == Level::Error)
    }

    /// Get the number of errors
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.level == Level::Error)
            .count()
    }

    /// Get all diagnostics reported so far
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    /// Clear all diagnostics
    pub fn clear(&self) {
        self.diagnostics.borrow_mut().clear();
    }
}

impl Default for Handler {
    fn default() -> Self {
        Self::new()
    }
}
