//! `list` command: show registered modules.

use serde_json::json;

use crate::cli::args::{ListArgs, OutputFormat};
use crate::error::Result;
use crate::modules;

/// Print the registered modules in navigation order.
///
/// # Errors
///
/// Returns a JSON error if serialization fails.
pub fn run(args: &ListArgs) -> Result<()> {
    let entries: Vec<(&str, String)> = modules::builders()
        .iter()
        .map(|b| {
            let bundle = b();
            (bundle.id, bundle.title)
        })
        .collect();

    match args.format {
        OutputFormat::Human => {
            let width = entries.iter().map(|(id, _)| id.len()).max().unwrap_or(0);
            for (id, title) in &entries {
                println!("{id:width$}  {title}");
            }
        }
        OutputFormat::Json => {
            let items: Vec<_> = entries
                .iter()
                .map(|(id, title)| json!({"id": id, "title": title}))
                .collect();
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
    }
    Ok(())
}
