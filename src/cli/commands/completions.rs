//! `completions` command: emit a completion script for the requested shell.

use clap::CommandFactory;
use clap_complete::Shell as Target;

use crate::cli::args::{Cli, CompletionsArgs, Shell};

impl Shell {
    const fn target(self) -> Target {
        match self {
            Self::Bash => Target::Bash,
            Self::Zsh => Target::Zsh,
            Self::Fish => Target::Fish,
            Self::PowerShell => Target::PowerShell,
            Self::Elvish => Target::Elvish,
        }
    }
}

/// Write the completion script to stdout.
pub fn run(args: &CompletionsArgs) {
    let mut cmd = Cli::command();
    clap_complete::generate(
        args.shell.target(),
        &mut cmd,
        "fieldlab",
        &mut std::io::stdout(),
    );
}
