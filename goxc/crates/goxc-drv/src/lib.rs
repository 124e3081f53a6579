//! goxc-drv - Compiler driver
//!
//! Orchestrates the pipeline: lex -> parse -> check -> lower -> run.
//! Each stage completes and hands its artifact to the next; any
//! diagnostic short-circuits the rest. The staged entry points
//! ([`tokenize`], [`parse`], [`compile`]) also back the CLI's
//! `--emit-*` flags.

use std::io::Write;

use goxc_ir::Module;
use goxc_lex::{Lexer, Token};
use goxc_par::{ParseError, Parser, Program};
use goxc_sem::Checker;
use goxc_util::{Diagnostic, Handler};
use goxc_vm::{RuntimeError, StackMachine, Value};
use thiserror::Error;

/// Process exit codes for the `goxc` binary.
pub mod exit_code {
    /// Program compiled and ran to completion.
    pub const SUCCESS: i32 = 0;
    /// Bad command line or unreadable input file.
    pub const USAGE: i32 = 1;
    /// Lexical errors.
    pub const LEX: i32 = 65;
    /// Syntax error.
    pub const SYNTAX: i32 = 66;
    /// Semantic diagnostics.
    pub const SEMANTIC: i32 = 67;
    /// The interpreter terminated with an error.
    pub const RUNTIME: i32 = 70;
}

/// A failed compile: which stage refused, and what it reported.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("lexical errors")]
    Lex(Vec<Diagnostic>),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("semantic errors")]
    Semantic(Vec<Diagnostic>),
}

impl CompileError {
    /// The exit code the driver maps this failure to.
    pub fn exit_code(&self) -> i32 {
        match self {
            CompileError::Lex(_) => exit_code::LEX,
            CompileError::Parse(_) => exit_code::SYNTAX,
            CompileError::Semantic(_) => exit_code::SEMANTIC,
        }
    }

    /// Renders every diagnostic of this failure, one per line.
    pub fn report(&self, mut out: impl Write) -> std::io::Result<()> {
        match self {
            CompileError::Lex(diags) | CompileError::Semantic(diags) => {
                for diag in diags {
                    writeln!(out, "{}", diag)?;
                }
            }
            CompileError::Parse(err) => writeln!(out, "{}", err)?,
        }
        Ok(())
    }
}

/// Lexes source text into a token stream.
pub fn tokenize(source: &str) -> Result<Vec<Token>, CompileError> {
    let handler = Handler::new();
    let tokens = Lexer::new(source, &handler).tokenize();
    if handler.has_errors() {
        return Err(CompileError::Lex(handler.diagnostics()));
    }
    Ok(tokens)
}

/// Lexes and parses source text into an AST.
pub fn parse(source: &str) -> Result<Program, CompileError> {
    let tokens = tokenize(source)?;
    let program = Parser::new(tokens).parse()?;
    Ok(program)
}

/// Runs the full front end and lowers to an IR module.
pub fn compile(source: &str) -> Result<Module, CompileError> {
    let program = parse(source)?;

    let handler = Handler::new();
    Checker::check(&program, &handler);
    if handler.has_errors() {
        return Err(CompileError::Semantic(handler.diagnostics()));
    }

    Ok(goxc_ir::generate(&program))
}

/// Executes a compiled module, writing program output to `out`.
pub fn run<W: Write>(module: &Module, out: W) -> Result<Value, RuntimeError> {
    StackMachine::new(module, out).run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_success() {
        let module = compile("print 1;").expect("must compile");
        assert!(module.function("main").is_some());
    }

    #[test]
    fn test_lex_stage_failure() {
        let err = compile("var @ int;").unwrap_err();
        assert_eq!(err.exit_code(), exit_code::LEX);
    }

    #[test]
    fn test_parse_stage_failure() {
        let err = compile("print 1").unwrap_err();
        assert_eq!(err.exit_code(), exit_code::SYNTAX);
    }

    #[test]
    fn test_semantic_stage_failure() {
        let err = compile("x = 1;").unwrap_err();
        assert_eq!(err.exit_code(), exit_code::SEMANTIC);
    }

    #[test]
    fn test_lexical_errors_stop_before_parsing() {
        // the unterminated comment is a lexical error even though the
        // prefix parses fine
        let err = compile("print 1; /* open").unwrap_err();
        assert!(matches!(err, CompileError::Lex(_)));
    }

    #[test]
    fn test_report_renders_lines() {
        let err = compile("const c int = 1; c = 2;").unwrap_err();
        let mut rendered = Vec::new();
        err.report(&mut rendered).unwrap();
        let text = String::from_utf8(rendered).unwrap();
        assert!(text.contains("const"), "report: {}", text);
        assert!(text.contains("[line 1]"), "report: {}", text);
    }
}
