//! Inline Markdown pass.
//!
//! Minimal inline markup:
//! - `` `code` `` spans (contents escaped, no further styling inside)
//! - `**bold**`
//!
//! Everything else is HTML-escaped.

use std::sync::LazyLock;

use regex::Regex;

use crate::html::escape;

static BOLD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("static regex"));

/// Render inline markup to HTML.
#[must_use]
pub fn render_inline(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, part) in text.split('`').enumerate() {
        if i % 2 == 1 {
            out.push_str("<code>");
            out.push_str(&escape(part));
            out.push_str("</code>");
        } else {
            let escaped = escape(part);
            out.push_str(&BOLD_RE.replace_all(&escaped, "<b>$1</b>"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_span() {
        assert_eq!(render_inline("use `x < y` here"), "use <code>x &lt; y</code> here");
    }

    #[test]
    fn bold() {
        assert_eq!(render_inline("a **strong** word"), "a <b>strong</b> word");
    }

    #[test]
    fn bold_not_applied_inside_code() {
        assert_eq!(render_inline("`**literal**`"), "<code>**literal**</code>");
    }

    #[test]
    fn escapes_outside_code() {
        assert_eq!(render_inline("1 < 2 & 3 > 2"), "1 &lt; 2 &amp; 3 &gt; 2");
    }

    #[test]
    fn unbalanced_backtick_leaves_tail_as_code() {
        // an odd trailing segment still renders as a code span
        assert_eq!(render_inline("before `tail"), "before <code>tail</code>");
    }

    #[test]
    fn multiple_bold_runs() {
        assert_eq!(
            render_inline("**a** and **b**"),
            "<b>a</b> and <b>b</b>"
        );
    }
}
