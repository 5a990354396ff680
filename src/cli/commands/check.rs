//! `check` command: formulas coverage report.
//!
//! Compares the formulas document's section keys against the module
//! registry. Two kinds of findings: orphan sections that match no module,
//! and modules with no formula section. The `_global` section is shared
//! and never an orphan.

use tracing::warn;

use crate::cli::args::CheckArgs;
use crate::error::{CheckError, ConfigError, Result};
use crate::markdown::sections::{self, GLOBAL_SECTION};
use crate::modules;

/// One coverage finding.
#[derive(Debug, PartialEq, Eq)]
pub enum Finding {
    /// A `## <key>` section with no matching module id.
    OrphanSection(String),
    /// A registered module with no formula section.
    UncoveredModule(String),
}

/// Compute the findings for a formulas document.
#[must_use]
pub fn coverage(formulas_md: &str, known_ids: &[&str]) -> Vec<Finding> {
    let split = sections::split_sections(formulas_md);
    let mut findings = Vec::new();
    for key in split.keys() {
        if key != GLOBAL_SECTION && !known_ids.contains(&key.as_str()) {
            findings.push(Finding::OrphanSection(key.clone()));
        }
    }
    for id in known_ids {
        if !split.contains_key(*id) {
            findings.push(Finding::UncoveredModule((*id).to_string()));
        }
    }
    findings
}

/// Run the coverage check and report findings.
///
/// # Errors
///
/// Returns `ConfigError::MissingFile` for an unreadable document and
/// `CheckError::Strict` when `--strict` is set and findings exist.
pub fn run(args: &CheckArgs) -> Result<()> {
    let text = std::fs::read_to_string(&args.formulas).map_err(|_| ConfigError::MissingFile {
        path: args.formulas.clone(),
    })?;
    let known = modules::registered_ids();
    let findings = coverage(&text, &known);

    for finding in &findings {
        match finding {
            Finding::OrphanSection(key) => {
                warn!(section = %key, "formula section matches no module");
                println!("orphan section: {key}");
            }
            Finding::UncoveredModule(id) => {
                warn!(module = %id, "module has no formula section");
                println!("uncovered module: {id}");
            }
        }
    }

    if findings.is_empty() {
        println!("ok: all sections matched");
    } else if args.strict {
        return Err(CheckError::Strict {
            count: findings.len(),
        }
        .into());
    }
    Ok(())
}
