//! Minimal Markdown renderer for offline packaging.
//!
//! The formulas document is authored in a small Markdown subset and
//! rendered here without an external Markdown engine so the generated
//! page carries no extra runtime. Supported:
//!
//! - `###` headings and deeper (shifted down one level, `h4`..`h6`)
//! - unordered / ordered lists, nested by 2-space indentation
//! - paragraphs
//! - fenced code blocks
//! - horizontal rule: `---`
//! - blockquote lines starting with `>`
//! - inline `code` spans and `**bold**`

pub mod inline;
pub mod sections;

use std::sync::LazyLock;

use regex::Regex;

use crate::html::escape;
use inline::render_inline;

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{3,6})\s+(.*)$").expect("static regex"));
static QUOTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^>\s?(.*)$").expect("static regex"));
static HRULE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^---\s*$").expect("static regex"));
static UL_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)[-*]\s+(.*)$").expect("static regex"));
static OL_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)\d+\.\s+(.*)$").expect("static regex"));

/// List flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Unordered,
    Ordered,
}

impl ListKind {
    const fn tag(self) -> &'static str {
        match self {
            Self::Unordered => "ul",
            Self::Ordered => "ol",
        }
    }
}

#[derive(Debug)]
struct ListItem {
    html: String,
    child: Option<ListNode>,
}

#[derive(Debug)]
struct ListNode {
    kind: ListKind,
    items: Vec<ListItem>,
}

impl ListNode {
    const fn new(kind: ListKind) -> Self {
        Self {
            kind,
            items: Vec::new(),
        }
    }

    fn render(&self, out: &mut String) {
        let tag = self.kind.tag();
        out.push('<');
        out.push_str(tag);
        out.push('>');
        for item in &self.items {
            out.push_str("<li>");
            out.push_str(&item.html);
            if let Some(ref child) = item.child {
                child.render(out);
            }
            out.push_str("</li>");
        }
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
    }
}

/// In-flight nested-list state.
///
/// The stack owns the currently open branch of the list tree, deepest node
/// last; popping re-attaches the popped node as the child of the last item
/// one level up.
#[derive(Debug, Default)]
struct ListBuilder {
    stack: Vec<(usize, ListNode)>,
}

impl ListBuilder {
    fn is_active(&self) -> bool {
        !self.stack.is_empty()
    }

    /// Pop the deepest open node and attach it to its parent's last item.
    fn pop_attach(&mut self) {
        if let Some((_, node)) = self.stack.pop() {
            if let Some((_, parent)) = self.stack.last_mut() {
                if let Some(last) = parent.items.last_mut() {
                    last.child = Some(node);
                } else {
                    // malformed indentation left a childless branch; drop it
                    tracing::debug!("discarding list branch with no parent item");
                }
            } else {
                self.stack.push((0, node));
            }
        }
    }

    /// Collapse the open branch into the root and render it.
    fn flush(&mut self, out: &mut Vec<String>) {
        if self.stack.is_empty() {
            return;
        }
        while self.stack.len() > 1 {
            self.pop_attach();
        }
        let (_, root) = self.stack.pop().expect("stack has one node");
        let mut html = String::new();
        root.render(&mut html);
        out.push(html);
    }

    /// Add one list item of `kind` at `indent_level`.
    fn add(&mut self, kind: ListKind, indent_level: usize, content: &str, out: &mut Vec<String>) {
        let mut level = indent_level;
        if self.stack.is_empty() {
            self.stack.push((0, ListNode::new(kind)));
            level = 0;
        }

        // climb up if needed
        while self
            .stack
            .last()
            .is_some_and(|(l, _)| level < *l && self.stack.len() > 1)
        {
            self.pop_attach();
        }

        // descend if needed: open a nested list under the last item
        loop {
            let (top_level, top) = self.stack.last_mut().expect("stack is non-empty");
            if level <= *top_level {
                break;
            }
            if top.items.is_empty() {
                // malformed indentation; treat as same level
                level = *top_level;
                break;
            }
            let next_level = *top_level + 1;
            // reuse an already-built child of the same kind, replace otherwise
            let child = match top.items.last_mut().and_then(|it| it.child.take()) {
                Some(existing) if existing.kind == kind => existing,
                _ => ListNode::new(kind),
            };
            self.stack.push((next_level, child));
        }

        // kind change at the same indent starts a new list block
        if self.stack.last().is_some_and(|(_, n)| n.kind != kind) {
            self.flush(out);
            self.stack.push((0, ListNode::new(kind)));
        }

        let (_, node) = self.stack.last_mut().expect("stack is non-empty");
        node.items.push(ListItem {
            html: render_inline(content.trim()),
            child: None,
        });
    }

    /// Append a continuation line to the last item at `target_level`.
    ///
    /// Returns `false` if no suitable item exists (the caller falls back to
    /// paragraph handling).
    fn append_continuation(&mut self, target_level: usize, text: &str) -> bool {
        let idx = self
            .stack
            .iter()
            .rposition(|(l, _)| *l == target_level)
            .unwrap_or(0);
        let Some((_, node)) = self.stack.get_mut(idx) else {
            return false;
        };
        if let Some(last) = node.items.last_mut() {
            last.html.push_str("<br/>");
            last.html.push_str(&render_inline(text));
            true
        } else {
            false
        }
    }
}

/// Render a Markdown fragment to HTML.
#[must_use]
pub fn to_html(md: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut para: Vec<String> = Vec::new();
    let mut in_code = false;
    let mut code_lines: Vec<String> = Vec::new();
    let mut list = ListBuilder::default();

    fn flush_para(para: &mut Vec<String>, out: &mut Vec<String>) {
        if para.is_empty() {
            return;
        }
        let text = para
            .iter()
            .map(|s| s.trim())
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string();
        if !text.is_empty() {
            out.push(format!("<p>{}</p>", render_inline(&text)));
        }
        para.clear();
    }

    for raw in md.lines() {
        let line = raw.trim_end_matches('\n');
        let stripped = line.trim();

        if in_code {
            if stripped.starts_with("```") {
                out.push(format!(
                    "<pre><code>{}</code></pre>",
                    escape(&code_lines.join("\n"))
                ));
                in_code = false;
                code_lines.clear();
            } else {
                code_lines.push(line.to_string());
            }
            continue;
        }

        if stripped.starts_with("```") {
            flush_para(&mut para, &mut out);
            list.flush(&mut out);
            in_code = true;
            code_lines.clear();
            continue;
        }

        if HRULE_RE.is_match(stripped) {
            flush_para(&mut para, &mut out);
            list.flush(&mut out);
            out.push("<hr/>".to_string());
            continue;
        }

        if let Some(caps) = HEADING_RE.captures(stripped) {
            flush_para(&mut para, &mut out);
            list.flush(&mut out);
            let lvl = caps[1].len();
            // map ### -> h4, #### -> h5, #####/###### -> h6
            let html_lvl = match lvl {
                3 => 4,
                4 => 5,
                _ => 6,
            };
            out.push(format!(
                "<h{html_lvl}>{}</h{html_lvl}>",
                render_inline(caps[2].trim())
            ));
            continue;
        }

        if let Some(caps) = QUOTE_RE.captures(stripped) {
            flush_para(&mut para, &mut out);
            list.flush(&mut out);
            out.push(format!(
                "<p class=\"quote\">{}</p>",
                render_inline(caps[1].trim())
            ));
            continue;
        }

        if let Some(caps) = UL_ITEM_RE.captures(line) {
            flush_para(&mut para, &mut out);
            list.add(ListKind::Unordered, caps[1].len() / 2, &caps[2], &mut out);
            continue;
        }

        if let Some(caps) = OL_ITEM_RE.captures(line) {
            flush_para(&mut para, &mut out);
            list.add(ListKind::Ordered, caps[1].len() / 2, &caps[2], &mut out);
            continue;
        }

        // continuation line within a list item (indentation-based)
        if list.is_active() && !stripped.is_empty() {
            let lead = line.len() - line.trim_start_matches(' ').len();
            if lead >= 2 {
                let target_level = (lead / 2).saturating_sub(1);
                if list.append_continuation(target_level, stripped) {
                    continue;
                }
            }
        }

        if stripped.is_empty() {
            flush_para(&mut para, &mut out);
            list.flush(&mut out);
            continue;
        }

        para.push(line.to_string());
    }

    flush_para(&mut para, &mut out);
    list.flush(&mut out);
    if in_code {
        // unterminated fence at EOF still renders
        out.push(format!(
            "<pre><code>{}</code></pre>",
            escape(&code_lines.join("\n"))
        ));
    }

    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paragraphs_join_lines() {
        let html = to_html("first line\nsecond line\n\nnext para");
        assert_eq!(html, "<p>first line second line</p>\n<p>next para</p>");
    }

    #[test]
    fn heading_levels_shift_down() {
        assert_eq!(to_html("### Title"), "<h4>Title</h4>");
        assert_eq!(to_html("#### Title"), "<h5>Title</h5>");
        assert_eq!(to_html("##### Title"), "<h6>Title</h6>");
        assert_eq!(to_html("###### Title"), "<h6>Title</h6>");
    }

    #[test]
    fn horizontal_rule() {
        assert_eq!(to_html("---"), "<hr/>");
    }

    #[test]
    fn blockquote_becomes_quote_paragraph() {
        assert_eq!(to_html("> note this"), "<p class=\"quote\">note this</p>");
    }

    #[test]
    fn fenced_code_block_is_escaped() {
        let html = to_html("```\nlet x = a < b;\n```");
        assert_eq!(html, "<pre><code>let x = a &lt; b;</code></pre>");
    }

    #[test]
    fn unterminated_fence_flushes_at_eof() {
        let html = to_html("```\ndangling");
        assert_eq!(html, "<pre><code>dangling</code></pre>");
    }

    #[test]
    fn flat_unordered_list() {
        let html = to_html("- one\n- two");
        assert_eq!(html, "<ul><li>one</li><li>two</li></ul>");
    }

    #[test]
    fn flat_ordered_list() {
        let html = to_html("1. one\n2. two");
        assert_eq!(html, "<ol><li>one</li><li>two</li></ol>");
    }

    #[test]
    fn nested_list_two_levels() {
        let html = to_html("- a\n  - a1\n  - a2\n- b");
        assert_eq!(
            html,
            "<ul><li>a<ul><li>a1</li><li>a2</li></ul></li><li>b</li></ul>"
        );
    }

    #[test]
    fn nested_list_climbs_back_up() {
        let html = to_html("- a\n  - a1\n    - a1i\n  - a2\n- b");
        assert_eq!(
            html,
            "<ul><li>a<ul><li>a1<ul><li>a1i</li></ul></li><li>a2</li></ul></li><li>b</li></ul>"
        );
    }

    #[test]
    fn ordered_nested_inside_unordered() {
        let html = to_html("- a\n  1. first\n  2. second");
        assert_eq!(
            html,
            "<ul><li>a<ol><li>first</li><li>second</li></ol></li></ul>"
        );
    }

    #[test]
    fn kind_change_at_same_level_starts_new_list() {
        let html = to_html("- a\n1. b");
        assert_eq!(html, "<ul><li>a</li></ul>\n<ol><li>b</li></ol>");
    }

    #[test]
    fn malformed_indent_treated_as_same_level() {
        // first item already indented: the skipped level collapses to 0
        let html = to_html("    - deep\n- top");
        assert_eq!(html, "<ul><li>deep</li><li>top</li></ul>");
    }

    #[test]
    fn continuation_line_appends_to_item() {
        let html = to_html("- item\n  more text");
        assert_eq!(html, "<ul><li>item<br/>more text</li></ul>");
    }

    #[test]
    fn blank_line_closes_list() {
        let html = to_html("- a\n\npara");
        assert_eq!(html, "<ul><li>a</li></ul>\n<p>para</p>");
    }

    #[test]
    fn inline_markup_inside_blocks() {
        let html = to_html("- uses `V_H = IB/(nqt)` and **bold**");
        assert_eq!(
            html,
            "<ul><li>uses <code>V_H = IB/(nqt)</code> and <b>bold</b></li></ul>"
        );
    }

    #[test]
    fn mixed_document() {
        let md = "### Derivation\n\nSome text with `code`.\n\n- step one\n- step two\n\n---\n\n> closing remark";
        let html = to_html(md);
        assert!(html.contains("<h4>Derivation</h4>"));
        assert!(html.contains("<p>Some text with <code>code</code>.</p>"));
        assert!(html.contains("<ul><li>step one</li><li>step two</li></ul>"));
        assert!(html.contains("<hr/>"));
        assert!(html.contains("<p class=\"quote\">closing remark</p>"));
    }
}
