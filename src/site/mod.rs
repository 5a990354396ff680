//! Site assembly.
//!
//! Collects the module bundles, merges the formulas document into the
//! intros, renders figures and the page shell, and embeds plotly.js for
//! offline use.

pub mod runtime;
pub mod template;

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::{BuildMode, SiteConfig};
use crate::error::{ConfigError, RenderError, Result};
use crate::markdown::{self, sections};
use crate::modules::{self, ModuleBundle};

static PLOTLY_VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"plotly\.js v(\d+\.\d+\.\d+)").expect("static regex"));

/// Resolved build inputs: config file merged with CLI overrides.
#[derive(Debug, Clone)]
pub struct SiteOptions {
    pub title: String,
    pub subtitle: String,
    pub lang: String,
    pub mode: BuildMode,
    /// Local plotly.min.js, required in release mode.
    pub plotly_bundle: Option<PathBuf>,
    /// CDN URL override for debug mode.
    pub cdn_url: Option<String>,
    pub formulas: Option<PathBuf>,
    pub skip: Vec<String>,
}

impl SiteOptions {
    /// Options from a loaded (or default) config file.
    #[must_use]
    pub fn from_config(cfg: &SiteConfig) -> Self {
        Self {
            title: cfg.site.title.clone(),
            subtitle: cfg.site.subtitle.clone(),
            lang: cfg.site.lang.clone(),
            mode: cfg.plotly.mode,
            plotly_bundle: cfg.plotly.bundle.clone(),
            cdn_url: cfg.plotly.cdn_url.clone(),
            formulas: cfg.formulas.clone(),
            skip: cfg.skip.clone(),
        }
    }
}

impl Default for SiteOptions {
    fn default() -> Self {
        Self::from_config(&SiteConfig::default())
    }
}

/// Build the complete HTML document.
///
/// # Errors
///
/// Returns a render error on duplicate or unknown module ids, an empty
/// module set, a non-finite payload value, or an unreadable plotly bundle;
/// a config error when release mode has no bundle path or the formulas
/// file cannot be read.
pub fn build_site(options: &SiteOptions) -> Result<String> {
    let bundles = collect_bundles(&options.skip)?;
    info!(modules = bundles.len(), mode = ?options.mode, "assembling site");

    let formulas = load_formulas(options.formulas.as_deref())?;
    let plotly_head = plotly_head(options)?;

    let mut rendered = Vec::with_capacity(bundles.len());
    let mut scripts = String::from(runtime::RUNTIME_JS);
    for bundle in &bundles {
        check_payload_finite(bundle.id, &bundle.data_payload)?;
        rendered.push(render_module(bundle, formulas.as_ref())?);
        scripts.push('\n');
        scripts.push_str(&bundle.js);
    }

    let ids: Vec<&str> = bundles.iter().map(|b| b.id).collect();
    let ids_json = serde_json::to_string(&ids)?;
    scripts.push('\n');
    scripts.push_str(&runtime::boot_js(&ids_json));

    let build_time = chrono::Local::now().format("%Y-%m-%d %H:%M").to_string();
    let html = template::render_page(&template::Page {
        title: &options.title,
        subtitle: &options.subtitle,
        lang: &options.lang,
        build_time: &build_time,
        plotly_head: &plotly_head,
        scripts_js: &scripts,
        modules: &rendered,
    });
    debug!(bytes = html.len(), "page rendered");
    Ok(html)
}

/// Run every registered builder, validate ids and apply the skip list.
fn collect_bundles(skip: &[String]) -> Result<Vec<ModuleBundle>> {
    let known = modules::registered_ids();
    for id in skip {
        if !known.contains(&id.as_str()) {
            return Err(RenderError::UnknownModule(id.clone()).into());
        }
    }
    collect_from(&modules::builders(), skip)
}

fn collect_from(builders: &[modules::Builder], skip: &[String]) -> Result<Vec<ModuleBundle>> {
    let mut seen: Vec<&str> = Vec::new();
    let mut out = Vec::new();
    for builder in builders {
        let bundle = builder();
        if seen.contains(&bundle.id) {
            return Err(RenderError::DuplicateModule(bundle.id.to_string()).into());
        }
        seen.push(bundle.id);
        if skip.iter().any(|s| s == bundle.id) {
            debug!(module = bundle.id, "skipped");
            continue;
        }
        out.push(bundle);
    }
    if out.is_empty() {
        return Err(RenderError::NoModules.into());
    }
    Ok(out)
}

/// Per-section formula HTML, already rendered from Markdown.
struct Formulas {
    global_html: Option<String>,
    by_id: indexmap::IndexMap<String, String>,
}

fn load_formulas(path: Option<&Path>) -> Result<Option<Formulas>> {
    let Some(path) = path else { return Ok(None) };
    let text = std::fs::read_to_string(path).map_err(|_| ConfigError::MissingFile {
        path: path.to_path_buf(),
    })?;
    let split = sections::split_sections(&text);
    let mut global_html = None;
    let mut by_id = indexmap::IndexMap::new();
    for (key, body) in split {
        let html = markdown::to_html(&body);
        if key == sections::GLOBAL_SECTION {
            global_html = Some(html);
        } else {
            by_id.insert(key, html);
        }
    }
    Ok(Some(Formulas { global_html, by_id }))
}

fn formula_details(formulas: &Formulas, module_id: &str) -> Option<String> {
    let body = formulas.by_id.get(module_id);
    if body.is_none() && formulas.global_html.is_none() {
        return None;
    }
    let mut html = String::from(
        "<details class=\"formula\"><summary>Formulas &amp; background</summary>",
    );
    if let Some(ref g) = formulas.global_html {
        html.push_str(&format!("<div class=\"formula-global\">{g}</div>"));
    }
    if let Some(b) = body {
        html.push_str(&format!("<div class=\"formula-body\">{b}</div>"));
    }
    html.push_str("</details>");
    Some(html)
}

fn render_module(
    bundle: &ModuleBundle,
    formulas: Option<&Formulas>,
) -> Result<template::RenderedModule> {
    let mut intro_html = bundle.intro_html.clone();
    if let Some(details) = formulas.and_then(|f| formula_details(f, bundle.id)) {
        intro_html.push_str(&details);
    }
    let mut figures_html = Vec::with_capacity(bundle.figures.len());
    for (i, fig) in bundle.figures.iter().enumerate() {
        figures_html.push(crate::figure::render(fig, bundle.id, i)?);
    }
    Ok(template::RenderedModule {
        id: bundle.id.to_string(),
        title: bundle.title.clone(),
        intro_html,
        controls_html: bundle.controls_html.clone(),
        figures_html,
        data_json: serde_json::to_string(&bundle.data_payload)?,
        pitfalls_html: bundle.pitfalls_html.clone(),
        questions_html: bundle.questions_html.clone(),
    })
}

/// Reject payloads carrying non-finite floats.
///
/// `serde_json` lowers NaN/Inf to `null` when a payload is built with the
/// `json!` macro, so any `null` inside the tree marks a lost float.
fn check_payload_finite(module_id: &str, payload: &Value) -> Result<()> {
    fn walk(value: &Value, path: &str) -> std::result::Result<(), String> {
        match value {
            Value::Null => Err(path.to_string()),
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    walk(item, &format!("{path}[{i}]"))?;
                }
                Ok(())
            }
            Value::Object(map) => {
                for (k, v) in map {
                    let p = if path.is_empty() {
                        k.clone()
                    } else {
                        format!("{path}.{k}")
                    };
                    walk(v, &p)?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
    walk(payload, "").map_err(|path| {
        RenderError::NonFinitePayload {
            module: module_id.to_string(),
            path,
        }
        .into()
    })
}

fn plotly_head(options: &SiteOptions) -> Result<String> {
    match options.mode {
        BuildMode::Release => {
            let Some(ref path) = options.plotly_bundle else {
                return Err(ConfigError::InvalidValue {
                    field: "plotly.bundle".to_string(),
                    value: "(unset)".to_string(),
                    expected: "a plotly.min.js path in release mode".to_string(),
                }
                .into());
            };
            let body = std::fs::read_to_string(path).map_err(|e| RenderError::PlotlyBundle {
                path: path.clone(),
                message: e.to_string(),
            })?;
            info!(path = %path.display(), bytes = body.len(), "inlining plotly bundle");
            Ok(format!("<script>{body}</script>"))
        }
        BuildMode::Debug => {
            let url = options.cdn_url.clone().unwrap_or_else(|| {
                let version = options
                    .plotly_bundle
                    .as_ref()
                    .and_then(|p| std::fs::read_to_string(p).ok())
                    .and_then(|body| sniff_plotly_version(&body));
                match version {
                    Some(v) => format!("https://cdn.plot.ly/plotly-{v}.min.js"),
                    None => "https://cdn.plot.ly/plotly-latest.min.js".to_string(),
                }
            });
            Ok(format!("<script src=\"{url}\"></script>"))
        }
    }
}

/// Read the version out of a bundle's leading comment.
fn sniff_plotly_version(bundle: &str) -> Option<String> {
    let head: String = bundle.chars().take(200).collect();
    PLOTLY_VERSION_RE
        .captures(&head)
        .map(|c| c[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn debug_options() -> SiteOptions {
        SiteOptions {
            mode: BuildMode::Debug,
            ..SiteOptions::default()
        }
    }

    #[test]
    fn builds_full_page_in_debug_mode() {
        let html = build_site(&debug_options()).unwrap();
        for id in modules::registered_ids() {
            assert!(html.contains(&format!("id=\"section-{id}\"")), "{id}");
            assert!(html.contains(&format!("id=\"nav-{id}\"")), "{id}");
            assert!(html.contains(&format!("id=\"data-{id}\"")), "{id}");
            assert!(html.contains(&format!("function init_{id}()")), "{id}");
        }
        assert!(html.contains("https://cdn.plot.ly/plotly-latest.min.js"));
        assert!(html.contains("function flBilinearSeries("));
    }

    #[test]
    fn skip_removes_module_everywhere() {
        let mut options = debug_options();
        options.skip = vec!["ct_recon".to_string()];
        let html = build_site(&options).unwrap();
        assert!(!html.contains("id=\"section-ct_recon\""));
        assert!(!html.contains("id=\"nav-ct_recon\""));
        assert!(!html.contains("function init_ct_recon()"));
        assert!(html.contains("id=\"section-rlc_discharge\""));
    }

    #[test]
    fn duplicate_module_id_is_an_error() {
        let builders: Vec<modules::Builder> =
            vec![modules::hall_effect::build, modules::hall_effect::build];
        let err = collect_from(&builders, &[]).unwrap_err();
        assert!(matches!(
            err,
            crate::error::FieldLabError::Render(RenderError::DuplicateModule(ref id))
                if id == "hall_effect"
        ));
    }

    #[test]
    fn unknown_skip_id_is_an_error() {
        let mut options = debug_options();
        options.skip = vec!["warp_drive".to_string()];
        let err = build_site(&options).unwrap_err();
        assert!(err.to_string().contains("warp_drive"));
    }

    #[test]
    fn skipping_everything_is_an_error() {
        let mut options = debug_options();
        options.skip = modules::registered_ids()
            .into_iter()
            .map(str::to_string)
            .collect();
        let err = build_site(&options).unwrap_err();
        assert!(err.to_string().contains("no modules"));
    }

    #[test]
    fn release_mode_requires_a_bundle_path() {
        let options = SiteOptions::default();
        assert!(matches!(options.mode, BuildMode::Release));
        let err = build_site(&options).unwrap_err();
        assert!(err.to_string().contains("plotly.bundle"));
    }

    #[test]
    fn release_mode_inlines_the_bundle() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "/* plotly.js v2.32.0 */ window.Plotly = {{}};").unwrap();
        let mut options = SiteOptions::default();
        options.plotly_bundle = Some(f.path().to_path_buf());
        let html = build_site(&options).unwrap();
        assert!(html.contains("window.Plotly"));
        assert!(!html.contains("cdn.plot.ly"));
    }

    #[test]
    fn debug_mode_sniffs_version_from_bundle() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "/* plotly.js v2.32.0 */").unwrap();
        let mut options = debug_options();
        options.plotly_bundle = Some(f.path().to_path_buf());
        let html = build_site(&options).unwrap();
        assert!(html.contains("https://cdn.plot.ly/plotly-2.32.0.min.js"));
    }

    #[test]
    fn cdn_url_override_wins() {
        let mut options = debug_options();
        options.cdn_url = Some("https://mirror.example/plotly.js".to_string());
        let html = build_site(&options).unwrap();
        assert!(html.contains("src=\"https://mirror.example/plotly.js\""));
    }

    #[test]
    fn formulas_merge_into_intros() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(
            f,
            "## _global\n\nShared notation: `mu0`.\n\n## hall_effect\n\n- `V_H = IB/(nqt)`\n"
        )
        .unwrap();
        let mut options = debug_options();
        options.formulas = Some(f.path().to_path_buf());
        let html = build_site(&options).unwrap();
        assert!(html.contains("<details class=\"formula\">"));
        assert!(html.contains("Shared notation"));
        assert!(html.contains("V_H = IB/(nqt)"));
    }

    #[test]
    fn missing_formulas_file_is_an_error() {
        let mut options = debug_options();
        options.formulas = Some(PathBuf::from("/nonexistent/formulas.md"));
        let err = build_site(&options).unwrap_err();
        assert!(matches!(
            err,
            crate::error::FieldLabError::Config(ConfigError::MissingFile { .. })
        ));
    }

    #[test]
    fn finite_check_reports_json_path() {
        let payload = json!({"defaults": {"a": 1.0}, "series": [1.0, f64::NAN]});
        let err = check_payload_finite("rail_launcher", &payload).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("rail_launcher"));
        assert!(msg.contains("series[1]"));
    }

    #[test]
    fn all_registered_payloads_are_finite() {
        for builder in modules::builders() {
            let bundle = builder();
            check_payload_finite(bundle.id, &bundle.data_payload).unwrap();
        }
    }

    #[test]
    fn version_sniffing() {
        assert_eq!(
            sniff_plotly_version("/* plotly.js v2.32.0 */ ..."),
            Some("2.32.0".to_string())
        );
        assert_eq!(sniff_plotly_version("no version here"), None);
    }
}
