//! Orchestrates lexer → parser → AST builder → analyzer → emitter, formats
//! diagnostics, and writes the output file (spec.md §4.7). Mirrors the
//! teacher's `src/bin/why/main.rs` stage-by-stage driving shape.

use std::fs;
use std::path::{Path, PathBuf};

use crate::analyzer::analyze;
use crate::ast::builder::build_program;
use crate::cli::CompileArgs;
use crate::emitter::emit;
use crate::errors::CompileError;
use crate::lexer::Lexer;
use crate::parser::parse;

/// Runs the full pipeline for `args`, printing diagnostics to standard error.
/// Returns the process exit code (`0` on success, `1` otherwise).
pub fn run(args: &CompileArgs) -> i32 {
    let source = match fs::read_to_string(&args.input) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("error: could not read '{}': {e}", args.input.display());
            return 1;
        }
    };

    log::info!("lexing {}", args.input.display());
    let tokens = match Lexer::new(&source).lex() {
        Ok(tokens) => tokens,
        Err(e) => return report(&[CompileError::from(e)]),
    };

    log::info!("parsing");
    let cst = match parse(tokens) {
        Ok(cst) => cst,
        Err(e) => return report(&[CompileError::from(e)]),
    };

    log::info!("building ast");
    let program = match build_program(cst) {
        Ok(program) => program,
        Err(e) => return report(&[CompileError::from(e)]),
    };

    log::info!("analyzing");
    let analysis = analyze(&program);
    if !analysis.is_ok() {
        let errors: Vec<CompileError> = analysis
            .semantic_errors
            .into_iter()
            .map(CompileError::from)
            .chain(analysis.type_errors.into_iter().map(CompileError::from))
            .collect();
        return report(&errors);
    }

    log::info!("emitting");
    let output_text = match emit(&program) {
        Ok(text) => text,
        Err(e) => return report(&[CompileError::from(e)]),
    };

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input));

    log::debug!("writing {}", output_path.display());
    if let Err(e) = fs::write(&output_path, output_text) {
        eprintln!("error: could not write '{}': {e}", output_path.display());
        return 1;
    }

    log::info!("wrote {}", output_path.display());
    0
}

fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("cs")
}

fn report(errors: &[CompileError]) -> i32 {
    for error in errors {
        eprintln!("{error}");
    }
    1
}
