//! Plotly figure definitions.
//!
//! A figure is a set of traces plus a layout, both plain JSON values. The
//! assembler renders each as a placeholder div and a `Plotly.newPlot` call
//! with a shared config; module scripts later mutate the traces in place
//! via `Plotly.restyle`.

use serde_json::{Value, json};

/// One Plotly figure: traces plus layout.
#[derive(Debug, Clone)]
pub struct Figure {
    /// Plotly trace objects.
    pub traces: Vec<Value>,
    /// Plotly layout object.
    pub layout: Value,
}

impl Figure {
    /// Create a figure from traces and a layout.
    #[must_use]
    pub const fn new(traces: Vec<Value>, layout: Value) -> Self {
        Self { traces, layout }
    }
}

/// Div id for figure `index` of `module_id` (`fig-<module>-<index>`).
#[must_use]
pub fn div_id(module_id: &str, index: usize) -> String {
    format!("fig-{module_id}-{index}")
}

/// Shared Plotly config: responsive, no logo, lasso/select removed.
#[must_use]
pub fn plot_config() -> Value {
    json!({
        "responsive": true,
        "displaylogo": false,
        "modeBarButtonsToRemove": ["lasso2d", "select2d"],
    })
}

/// Layout defaults shared by the time-series figures: dark template and
/// tight margins. Module layouts merge on top of this.
#[must_use]
pub fn base_layout(title: &str) -> Value {
    json!({
        "template": "plotly_dark",
        "margin": {"l": 55, "r": 20, "t": 40, "b": 45},
        "title": title,
    })
}

/// Merge `extra` keys into a `base` layout object (shallow).
#[must_use]
pub fn merge_layout(mut base: Value, extra: Value) -> Value {
    if let (Some(b), Some(e)) = (base.as_object_mut(), extra.as_object()) {
        for (k, v) in e {
            b.insert(k.clone(), v.clone());
        }
    }
    base
}

/// Render a figure to its embeddable HTML: a sized div plus the
/// `Plotly.newPlot` bootstrap script.
///
/// # Errors
///
/// Returns `serde_json::Error` if a trace or layout fails to serialize.
pub fn render(figure: &Figure, module_id: &str, index: usize) -> Result<String, serde_json::Error> {
    let id = div_id(module_id, index);
    let traces = serde_json::to_string(&figure.traces)?;
    let layout = serde_json::to_string(&figure.layout)?;
    let config = serde_json::to_string(&plot_config())?;
    Ok(format!(
        "<div id=\"{id}\" class=\"js-plotly-plot\" style=\"width:100%;height:100%\"></div>\n\
         <script>Plotly.newPlot(document.getElementById(\"{id}\"), {traces}, {layout}, {config});</script>"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn div_id_format() {
        assert_eq!(div_id("rlc_discharge", 0), "fig-rlc_discharge-0");
    }

    #[test]
    fn render_contains_newplot_and_traces() {
        let fig = Figure::new(
            vec![json!({"x": [0, 1], "y": [0, 0], "mode": "lines", "name": "I(t)"})],
            base_layout("Discharge"),
        );
        let html = render(&fig, "rlc_discharge", 0).unwrap();
        assert!(html.contains("id=\"fig-rlc_discharge-0\""));
        assert!(html.contains("Plotly.newPlot"));
        assert!(html.contains("\"I(t)\""));
        assert!(html.contains("plotly_dark"));
        assert!(html.contains("\"displaylogo\":false"));
    }

    #[test]
    fn merge_layout_overrides_and_extends() {
        let merged = merge_layout(
            base_layout("t"),
            json!({"xaxis_title": "t (ms)", "title": "override"}),
        );
        assert_eq!(merged["title"], "override");
        assert_eq!(merged["xaxis_title"], "t (ms)");
        assert_eq!(merged["template"], "plotly_dark");
    }
}
