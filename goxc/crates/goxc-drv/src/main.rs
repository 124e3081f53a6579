//! The `goxc` command line interface.
//!
//! Usage: `goxc [--emit-tokens|--emit-ast|--emit-ir] <file.gox>`
//!
//! With no flag the program is compiled and executed; the `--emit-*`
//! flags stop after the named stage and print its artifact.

use std::path::PathBuf;

use anyhow::{bail, Context};
use goxc_drv::exit_code;

/// How far to take the pipeline.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Emit {
    Tokens,
    Ast,
    Ir,
    Run,
}

struct Options {
    path: PathBuf,
    emit: Emit,
}

impl Options {
    fn from_args(args: impl Iterator<Item = String>) -> anyhow::Result<Options> {
        let mut path = None;
        let mut emit = Emit::Run;

        for arg in args {
            match arg.as_str() {
                "--emit-tokens" => emit = Emit::Tokens,
                "--emit-ast" => emit = Emit::Ast,
                "--emit-ir" => emit = Emit::Ir,
                flag if flag.starts_with('-') => bail!("unknown option '{}'", flag),
                _ => {
                    if path.replace(PathBuf::from(&arg)).is_some() {
                        bail!("expected exactly one source file");
                    }
                }
            }
        }

        let Some(path) = path else {
            bail!("usage: goxc [--emit-tokens|--emit-ast|--emit-ir] <file.gox>");
        };
        Ok(Options { path, emit })
    }
}

fn main() {
    let code = match try_main() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {:#}", err);
            exit_code::USAGE
        }
    };
    std::process::exit(code);
}

fn try_main() -> anyhow::Result<i32> {
    let options = Options::from_args(std::env::args().skip(1))?;
    let source = std::fs::read_to_string(&options.path)
        .with_context(|| format!("cannot read '{}'", options.path.display()))?;

    match options.emit {
        Emit::Tokens => match goxc_drv::tokenize(&source) {
            Ok(tokens) => {
                for token in tokens {
                    println!("{:?}", token);
                }
                Ok(exit_code::SUCCESS)
            }
            Err(err) => report(err),
        },
        Emit::Ast => match goxc_drv::parse(&source) {
            Ok(program) => {
                println!("{:#?}", program);
                Ok(exit_code::SUCCESS)
            }
            Err(err) => report(err),
        },
        Emit::Ir => match goxc_drv::compile(&source) {
            Ok(module) => {
                print!("{}", module);
                Ok(exit_code::SUCCESS)
            }
            Err(err) => report(err),
        },
        Emit::Run => {
            let module = match goxc_drv::compile(&source) {
                Ok(module) => module,
                Err(err) => return report(err),
            };
            match goxc_drv::run(&module, std::io::stdout()) {
                Ok(_) => Ok(exit_code::SUCCESS),
                Err(err) => {
                    eprintln!("runtime error: {}", err);
                    Ok(exit_code::RUNTIME)
                }
            }
        }
    }
}

/// Prints a compile failure's diagnostics to stderr and maps it to its
/// exit code.
fn report(err: goxc_drv::CompileError) -> anyhow::Result<i32> {
    err.report(std::io::stderr())?;
    Ok(err.exit_code())
}
