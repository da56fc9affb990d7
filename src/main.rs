use clap::Parser;
use log::LevelFilter;

use gplc::cli::{Cli, Commands};
use gplc::driver;

fn main() {
    let cli = Cli::parse();

    let Commands::Compile(args) = &cli.command;
    let level = if args.verbose { LevelFilter::Info } else { LevelFilter::Error };
    simple_logger::SimpleLogger::new()
        .with_level(level)
        .init()
        .expect("logger is only initialized once");

    std::process::exit(driver::run(args));
}
