//! `FieldLab` — single-file offline interactive physics lab generator

use clap::Parser;

use fieldlab::cli::args::Cli;
use fieldlab::cli::commands;
use fieldlab::error::ExitCode;
use fieldlab::observability::{LogFormat, init_logging};

fn main() {
    let cli = Cli::parse();

    if !cli.quiet {
        init_logging(LogFormat::Human, cli.verbose, cli.color);
    }

    match commands::dispatch(&cli) {
        Ok(()) => std::process::exit(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
