//! Command-line surface: a single `compile` subcommand (spec.md §6), in the
//! teacher's `Cli`/`Commands`-derive shape (`src/bin/why/cli.rs`).

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "gplc", version, about = "Ahead-of-time compiler for GP-λ, emitting C# source")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compile a single GP-λ source file to a C# source file.
    Compile(CompileArgs),
}

#[derive(Debug, Args)]
pub struct CompileArgs {
    /// Path to the GP-λ source file.
    #[arg(long)]
    pub input: PathBuf,

    /// Output path; defaults to the input path with its extension replaced
    /// by `.cs`.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Emit per-stage progress to standard output.
    #[arg(long)]
    pub verbose: bool,
}
