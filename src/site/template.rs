//! Page shell.
//!
//! One dark-themed document: brand block and nav buttons in a fixed
//! sidebar, one `<section class="module">` per module on the right. All
//! styling is inlined so the output stays a single file.

use crate::html::escape;

/// A module already rendered down to HTML strings.
#[derive(Debug, Clone)]
pub struct RenderedModule {
    pub id: String,
    pub title: String,
    pub intro_html: String,
    pub controls_html: String,
    pub figures_html: Vec<String>,
    /// Compact JSON embedded as `data-<id>`.
    pub data_json: String,
    pub pitfalls_html: String,
    pub questions_html: String,
}

/// Everything the shell needs besides the modules themselves.
#[derive(Debug)]
pub struct Page<'a> {
    pub title: &'a str,
    pub subtitle: &'a str,
    pub lang: &'a str,
    /// Preformatted build timestamp for the brand block.
    pub build_time: &'a str,
    /// Either an inline plotly bundle or a CDN script tag.
    pub plotly_head: &'a str,
    /// Shared runtime, module init scripts, then the boot script.
    pub scripts_js: &'a str,
    pub modules: &'a [RenderedModule],
}

const CSS: &str = r#"
:root{
  --bg:#0f1419; --panel:#161d26; --card:#1b2430; --line:#273142;
  --text:#dce3ec; --muted:#8b98a9; --accent:#4da3ff; --accent2:#ffb454;
}
*{box-sizing:border-box}
html,body{margin:0;padding:0;background:var(--bg);color:var(--text);
  font-family:"Segoe UI",system-ui,-apple-system,sans-serif;font-size:15px}
a{color:var(--accent)}
.layout{display:grid;grid-template-columns:260px 1fr;min-height:100vh}
nav{background:var(--panel);border-right:1px solid var(--line);
  padding:18px 14px;position:sticky;top:0;height:100vh;overflow-y:auto}
.brand h1{font-size:19px;margin:0 0 4px 0}
.brand .sub{color:var(--muted);font-size:12px;margin:0 0 2px 0}
.brand .stamp{color:var(--muted);font-size:11px;margin:0 0 14px 0}
nav button{display:block;width:100%;text-align:left;margin:4px 0;
  padding:9px 12px;border:1px solid var(--line);border-radius:8px;
  background:var(--card);color:var(--text);cursor:pointer;font-size:14px}
nav button:hover{border-color:var(--accent)}
nav button.active{border-color:var(--accent);background:#20304a}
main{padding:20px 24px;min-width:0}
section.module{display:none}
section.module.active{display:block}
section.module h2{margin:4px 0 10px 0}
.grid{display:grid;grid-template-columns:340px 1fr;gap:16px;align-items:start}
.card{background:var(--card);border:1px solid var(--line);
  border-radius:10px;padding:14px 16px;margin-bottom:16px}
.card h3{margin:0 0 10px 0;font-size:15px;color:var(--accent2)}
.intro{color:var(--text)}
.intro p{line-height:1.55}
.controls .control{margin-bottom:12px}
.controls label{display:block;font-size:13px;color:var(--muted);margin-bottom:3px}
.controls .control-row{display:flex;align-items:center;gap:8px}
.controls input[type=range]{width:100%}
.controls select,.controls input[type=number]{width:100%;background:var(--panel);
  color:var(--text);border:1px solid var(--line);border-radius:6px;padding:5px 8px}
.controls .value{color:var(--accent);font-size:13px;white-space:nowrap}
.controls .help{color:var(--muted);font-size:12px}
.btnrow{display:flex;gap:8px;flex-wrap:wrap;margin-top:6px}
.btnrow button{padding:7px 14px;border-radius:7px;border:1px solid var(--line);
  background:var(--panel);color:var(--text);cursor:pointer}
.btnrow button.primary{background:var(--accent);border-color:var(--accent);color:#08121f}
.figgrid{display:grid;grid-template-columns:repeat(auto-fit,minmax(420px,1fr));gap:14px}
.figbody{height:380px}
.readouts{display:grid;grid-template-columns:repeat(auto-fit,minmax(150px,1fr));
  gap:10px;margin-bottom:16px}
.readout{background:var(--card);border:1px solid var(--line);
  border-radius:8px;padding:8px 12px}
.readout .k{color:var(--muted);font-size:12px}
.readout .v{font-size:16px;color:var(--accent2)}
details.formula{margin-top:10px;border:1px solid var(--line);
  border-radius:8px;padding:8px 12px;background:var(--panel)}
details.formula summary{cursor:pointer;color:var(--accent)}
.formula-global{border-bottom:1px dashed var(--line);padding-bottom:8px;margin-bottom:8px}
pre{background:#0b1016;border:1px solid var(--line);border-radius:8px;
  padding:10px;overflow-x:auto}
code{background:#0b1016;border-radius:4px;padding:1px 5px;font-size:13px}
.quote{border-left:3px solid var(--accent);padding-left:10px;color:var(--muted)}
@media (max-width:980px){
  .layout{grid-template-columns:1fr}
  nav{position:static;height:auto}
  .grid{grid-template-columns:1fr}
}
"#;

fn render_section(m: &RenderedModule, out: &mut String) {
    let id = &m.id;
    out.push_str(&format!(
        "<section class=\"module\" id=\"section-{id}\">\n<h2>{}</h2>\n",
        escape(&m.title)
    ));
    out.push_str("<div class=\"grid\">\n<div>\n");
    out.push_str(&format!(
        "<div class=\"card intro\">{}</div>\n",
        m.intro_html
    ));
    out.push_str(&format!(
        "<div class=\"card controls\"><h3>Parameters</h3>\n{}\n\
         <div class=\"btnrow\"><button id=\"snap-{id}\">Save PNG</button></div></div>\n",
        m.controls_html
    ));
    out.push_str("</div>\n<div>\n");
    out.push_str(&format!("<div id=\"readouts-{id}\" class=\"readouts\"></div>\n"));
    out.push_str("<div class=\"figgrid\">\n");
    for fig in &m.figures_html {
        out.push_str("<div class=\"card figbody\">");
        out.push_str(fig);
        out.push_str("</div>\n");
    }
    out.push_str("</div>\n");
    if !m.pitfalls_html.is_empty() {
        out.push_str(&format!(
            "<div class=\"card\"><h3>Common pitfalls</h3>{}</div>\n",
            m.pitfalls_html
        ));
    }
    if !m.questions_html.is_empty() {
        out.push_str(&format!(
            "<div class=\"card\"><h3>Guiding questions</h3>{}</div>\n",
            m.questions_html
        ));
    }
    out.push_str("</div>\n</div>\n");
    out.push_str(&format!(
        "<script type=\"application/json\" id=\"data-{id}\">{}</script>\n",
        m.data_json
    ));
    out.push_str("</section>\n");
}

/// Render the full document.
#[must_use]
pub fn render_page(page: &Page<'_>) -> String {
    let mut nav = String::new();
    for m in page.modules {
        nav.push_str(&format!(
            "<button id=\"nav-{}\">{}</button>\n",
            m.id,
            escape(&m.title)
        ));
    }

    let mut sections = String::new();
    for m in page.modules {
        render_section(m, &mut sections);
    }

    format!(
        "<!DOCTYPE html>\n<html lang=\"{lang}\">\n<head>\n<meta charset=\"utf-8\"/>\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\"/>\n\
         <title>{title}</title>\n<style>{css}</style>\n{plotly}\n</head>\n<body>\n\
         <div class=\"layout\">\n<nav>\n<div class=\"brand\">\n<h1>{title}</h1>\n\
         <p class=\"sub\">{subtitle}</p>\n<p class=\"stamp\">built {stamp}</p>\n</div>\n\
         {nav}</nav>\n<main>\n{sections}</main>\n</div>\n\
         <script>\n{scripts}\n</script>\n</body>\n</html>\n",
        lang = escape(page.lang),
        title = escape(page.title),
        css = CSS,
        plotly = page.plotly_head,
        subtitle = escape(page.subtitle),
        stamp = escape(page.build_time),
        nav = nav,
        sections = sections,
        scripts = page.scripts_js,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_module() -> RenderedModule {
        RenderedModule {
            id: "hall_effect".to_string(),
            title: "Hall Effect".to_string(),
            intro_html: "<p>intro</p>".to_string(),
            controls_html: "<div class=\"control\">c</div>".to_string(),
            figures_html: vec!["<div id=\"fig-hall_effect-0\"></div>".to_string()],
            data_json: "{\"defaults\":{}}".to_string(),
            pitfalls_html: "<ul><li>p</li></ul>".to_string(),
            questions_html: String::new(),
        }
    }

    #[test]
    fn page_wires_nav_section_and_payload() {
        let m = sample_module();
        let html = render_page(&Page {
            title: "FieldLab",
            subtitle: "sub",
            lang: "en",
            build_time: "2026-08-30 12:00",
            plotly_head: "<script src=\"cdn\"></script>",
            scripts_js: "// js",
            modules: std::slice::from_ref(&m),
        });
        assert!(html.contains("<html lang=\"en\">"));
        assert!(html.contains("id=\"nav-hall_effect\""));
        assert!(html.contains("id=\"section-hall_effect\""));
        assert!(html.contains("id=\"snap-hall_effect\""));
        assert!(html.contains("id=\"readouts-hall_effect\""));
        assert!(html.contains(
            "<script type=\"application/json\" id=\"data-hall_effect\">{\"defaults\":{}}</script>"
        ));
        assert!(html.contains("built 2026-08-30 12:00"));
        assert!(html.contains("Common pitfalls"));
        // no questions card for an empty fragment
        assert!(!html.contains("Guiding questions"));
    }

    #[test]
    fn stylesheet_covers_emitted_control_classes() {
        let slider = crate::html::controls::slider("m-x", "x", 0.0, 1.0, 0.1, 0.5, "tip");
        for class in ["control", "control-row", "value", "help"] {
            assert!(
                slider.contains(&format!("class=\"{class}\"")),
                "fragment lost class {class}"
            );
            assert!(
                CSS.contains(&format!(".controls .{class}{{")),
                "no rule for .{class}"
            );
        }
    }

    #[test]
    fn title_is_escaped() {
        let m = sample_module();
        let html = render_page(&Page {
            title: "A<B>&C",
            subtitle: "s",
            lang: "en",
            build_time: "t",
            plotly_head: "",
            scripts_js: "",
            modules: std::slice::from_ref(&m),
        });
        assert!(html.contains("<title>A&lt;B&gt;&amp;C</title>"));
    }
}
