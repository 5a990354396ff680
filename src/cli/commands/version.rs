//! `version` command: report the crate name and version, optionally as JSON
//! for scripting.

use serde_json::json;

use crate::cli::args::{OutputFormat, VersionArgs};

/// Print version information to stdout.
pub fn run(args: &VersionArgs) {
    let name = env!("CARGO_PKG_NAME");
    let version = env!("CARGO_PKG_VERSION");

    match args.format {
        OutputFormat::Human => println!("{name} {version}"),
        OutputFormat::Json => println!("{}", json!({"name": name, "version": version})),
    }
}
