mod common;

use common::{run_fieldlab, stderr_str, write_fixture};

const ALL_IDS: &[&str] = &[
    "rlc_discharge",
    "rail_launcher",
    "coupled_resonance",
    "hall_effect",
    "cyclotron",
    "induction_heating",
    "ct_recon",
];

fn build_debug(dir: &std::path::Path, extra: &[&str]) -> String {
    let out = dir.join("site.html");
    let mut args = vec!["build", "--mode", "debug", "--out", out.to_str().unwrap()];
    args.extend_from_slice(extra);
    let output = run_fieldlab(&args);
    assert!(
        output.status.success(),
        "build failed: {}",
        stderr_str(&output)
    );
    std::fs::read_to_string(out).unwrap()
}

#[test]
fn debug_build_contains_every_module() {
    let dir = tempfile::tempdir().unwrap();
    let html = build_debug(dir.path(), &[]);
    assert!(html.starts_with("<!DOCTYPE html>"));
    for id in ALL_IDS {
        assert!(html.contains(&format!("id=\"section-{id}\"")), "{id}");
        assert!(html.contains(&format!("id=\"nav-{id}\"")), "{id}");
        assert!(html.contains(&format!("function init_{id}()")), "{id}");
    }
    assert!(html.contains("cdn.plot.ly"));
    assert!(html.contains("function flGetJSON("));
}

#[test]
fn every_embedded_payload_is_valid_json() {
    let dir = tempfile::tempdir().unwrap();
    let html = build_debug(dir.path(), &[]);
    for id in ALL_IDS {
        let open = format!("<script type=\"application/json\" id=\"data-{id}\">");
        let start = html.find(&open).unwrap_or_else(|| panic!("no payload for {id}")) + open.len();
        let end = start + html[start..].find("</script>").expect("unterminated payload");
        let payload: serde_json::Value =
            serde_json::from_str(&html[start..end]).unwrap_or_else(|e| panic!("{id}: {e}"));
        assert!(payload.get("defaults").is_some(), "{id}: no defaults");
    }
}

#[test]
fn release_build_inlines_the_bundle() {
    let dir = tempfile::tempdir().unwrap();
    let bundle = write_fixture(
        dir.path(),
        "plotly.min.js",
        "/* plotly.js v2.32.0 */ window.Plotly = {};",
    );
    let out = dir.path().join("site.html");
    let output = run_fieldlab(&[
        "build",
        "--out",
        out.to_str().unwrap(),
        "--plotly",
        bundle.to_str().unwrap(),
    ]);
    assert!(
        output.status.success(),
        "build failed: {}",
        stderr_str(&output)
    );
    let html = std::fs::read_to_string(out).unwrap();
    assert!(html.contains("window.Plotly"));
    assert!(!html.contains("cdn.plot.ly"));
}

#[test]
fn formulas_and_config_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let formulas = write_fixture(
        dir.path(),
        "formulas.md",
        "## _global\nNotation: `mu0` is vacuum permeability.\n\n## hall_effect\n- `V_H = IB/(nqt)`\n",
    );
    let cfg = write_fixture(
        dir.path(),
        "site.yaml",
        &format!(
            "site:\n  title: EM Teaching Lab\n  lang: en\nplotly:\n  mode: debug\nformulas: {}\nskip:\n  - ct_recon\n",
            formulas.display()
        ),
    );
    let html = build_debug(dir.path(), &["--config", cfg.to_str().unwrap()]);
    assert!(html.contains("<title>EM Teaching Lab</title>"));
    assert!(html.contains("<details class=\"formula\">"));
    assert!(html.contains("V_H = IB/(nqt)"));
    assert!(!html.contains("id=\"section-ct_recon\""));
    assert!(html.contains("id=\"section-hall_effect\""));
}
