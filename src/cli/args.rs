//! CLI argument definitions
//!
//! All Clap derive structs for `FieldLab` command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::config::BuildMode;

// ============================================================================
// Root CLI
// ============================================================================

/// Single-file offline interactive physics lab generator.
#[derive(Parser, Debug)]
#[command(name = "fieldlab", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "FIELDLAB_COLOR")]
    pub color: ColorChoice,
}

// ============================================================================
// Top-Level Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render the site to a single HTML file.
    Build(BuildArgs),

    /// List registered modules.
    List(ListArgs),

    /// Validate the formulas document against the module registry.
    Check(CheckArgs),

    /// Generate shell completion scripts.
    Completions(CompletionsArgs),

    /// Display version and build information.
    Version(VersionArgs),
}

// ============================================================================
// Build Command
// ============================================================================

/// Arguments for `build`.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Output HTML path.
    #[arg(short, long, default_value = "dist/fieldlab.html", env = "FIELDLAB_OUT")]
    pub out: PathBuf,

    /// Path to a YAML site configuration file.
    #[arg(short, long, env = "FIELDLAB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Plotly embedding mode (release inlines the bundle, debug uses the CDN).
    #[arg(short, long)]
    pub mode: Option<BuildMode>,

    /// Path to a local plotly.min.js bundle.
    #[arg(long, env = "FIELDLAB_PLOTLY")]
    pub plotly: Option<PathBuf>,

    /// Module id to exclude (repeatable).
    #[arg(long, action = ArgAction::Append, value_name = "MODULE_ID")]
    pub skip: Vec<String>,

    /// Path to the formulas Markdown document.
    #[arg(long, env = "FIELDLAB_FORMULAS")]
    pub formulas: Option<PathBuf>,
}

// ============================================================================
// List / Check
// ============================================================================

/// Arguments for `list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for `check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Formulas document to validate.
    #[arg(default_value = "formulas.md")]
    pub formulas: PathBuf,

    /// Treat findings as errors.
    #[arg(long)]
    pub strict: bool,
}

// ============================================================================
// Completions / Version
// ============================================================================

/// Arguments for shell completion generation.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script.
    pub shell: Shell,
}

/// Arguments for version display.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Output format for reporting commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Human,
    /// Machine-readable JSON.
    Json,
}

/// Supported completion shells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// GNU Bash.
    Bash,
    /// Z shell.
    Zsh,
    /// Fish shell.
    Fish,
    /// `PowerShell`.
    PowerShell,
    /// Elvish shell.
    Elvish,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn build_defaults() {
        let cli = Cli::try_parse_from(["fieldlab", "build"]).unwrap();
        let Commands::Build(args) = cli.command else {
            panic!("expected build");
        };
        assert_eq!(args.out, PathBuf::from("dist/fieldlab.html"));
        assert!(args.config.is_none());
        assert!(args.mode.is_none());
        assert!(args.skip.is_empty());
    }

    #[test]
    fn skip_is_repeatable() {
        let cli = Cli::try_parse_from([
            "fieldlab",
            "build",
            "--skip",
            "ct_recon",
            "--skip",
            "cyclotron",
        ])
        .unwrap();
        let Commands::Build(args) = cli.command else {
            panic!("expected build");
        };
        assert_eq!(args.skip, vec!["ct_recon", "cyclotron"]);
    }

    #[test]
    fn mode_values_parse() {
        for (flag, mode) in [("release", BuildMode::Release), ("debug", BuildMode::Debug)] {
            let cli = Cli::try_parse_from(["fieldlab", "build", "--mode", flag]).unwrap();
            let Commands::Build(args) = cli.command else {
                panic!("expected build");
            };
            assert_eq!(args.mode, Some(mode));
        }
    }

    #[test]
    fn verbose_counts() {
        let cli = Cli::try_parse_from(["fieldlab", "-vv", "list"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn check_defaults_to_formulas_md() {
        let cli = Cli::try_parse_from(["fieldlab", "check"]).unwrap();
        let Commands::Check(args) = cli.command else {
            panic!("expected check");
        };
        assert_eq!(args.formulas, PathBuf::from("formulas.md"));
        assert!(!args.strict);
    }
}
