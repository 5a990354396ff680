//! Section splitting of the formulas document.
//!
//! The document is keyed by `## <key>` headings: one section per module id
//! plus an optional `_global` section shared by every module. Text before
//! the first `##` heading is ignored.

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;

/// Key of the section prepended to every module's formula block.
pub const GLOBAL_SECTION: &str = "_global";

static SECTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^##\s+(\S+)\s*$").expect("static regex"));

/// Split a Markdown document into sections keyed by `## <key>` headings.
///
/// Keys keep document order. A repeated key overwrites the earlier section.
#[must_use]
pub fn split_sections(md: &str) -> IndexMap<String, String> {
    let mut sections: IndexMap<String, String> = IndexMap::new();
    let mut current: Option<String> = None;
    let mut buf: Vec<&str> = Vec::new();

    for line in md.lines() {
        if let Some(caps) = SECTION_RE.captures(line) {
            if let Some(key) = current.take() {
                sections.insert(key, buf.join("\n").trim_matches('\n').to_string());
            }
            current = Some(caps[1].to_string());
            buf.clear();
            continue;
        }
        if current.is_none() {
            continue;
        }
        buf.push(line);
    }
    if let Some(key) = current {
        sections.insert(key, buf.join("\n").trim_matches('\n').to_string());
    }
    sections
}
