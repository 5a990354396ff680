//! Hall effect module: Hall voltage and the carrier-deflection diagram.

use serde_json::json;

use crate::figure::{Figure, base_layout, merge_layout};
use crate::html::controls::{ButtonStyle, buttons, select, slider};
use crate::modules::{ModuleBundle, bind_js};
use crate::physics::E_CHARGE;

/// Stable module id.
pub const MODULE_ID: &str = "hall_effect";

const JS: &str = r##"
function init___ID__(){
  const id = "__ID__";
  const root = document.getElementById("section-"+id);
  const data = flGetJSON("data-"+id);

  const els = {
    I: root.querySelector("#__ID__-I"),
    B: root.querySelector("#__ID__-B"),
    n: root.querySelector("#__ID__-n"),
    t: root.querySelector("#__ID__-t"),
    type: root.querySelector("#__ID__-type"),
    reset: root.querySelector("#__ID__-reset"),
  };

  flBindValue(root, "__ID__-I", " A", 2);
  flBindValue(root, "__ID__-B", " T", 3);
  flBindValue(root, "__ID__-n", "", 1);
  flBindValue(root, "__ID__-t", " mm", 2);

  const figVH = document.getElementById("fig-__ID__-0");
  const figDir = document.getElementById("fig-__ID__-1");

  const readouts = root.querySelector("#readouts-"+id);
  flMakeReadouts(readouts, [
    {key:"V_H at current B", id:"__ID__-ro-vh", value:"—"},
    {key:"carrier sign", id:"__ID__-ro-sign", value:"—"},
    {key:"drift speed (arb.)", id:"__ID__-ro-v", value:"—"},
  ]);

  const e = data.consts.e;

  function hallVoltage(I, B, n, t, sign){
    // V_H = I B / (n q t); sign flips with carrier type
    return sign * I * B / Math.max(1e-30, n * e * t);
  }

  function update(){
    const I = Math.max(0, flNum(els.I.value));
    const B = Math.max(0, flNum(els.B.value));
    const n = 1e22*Math.max(1e-6, flNum(els.n.value));
    const t = 1e-3*Math.max(1e-6, flNum(els.t.value));
    const hole = (els.type.value === "hole");
    const sign = hole ? 1 : -1;

    const vh = hallVoltage(I, B, n, t, sign);
    root.querySelector("#__ID__-ro-vh").textContent = flFmt(1000*vh, 3) + " mV";
    root.querySelector("#__ID__-ro-sign").textContent = hole ? "holes (q>0)" : "electrons (q<0)";
    root.querySelector("#__ID__-ro-v").textContent = flFmt(I/(n*e*t), 4);

    // V_H(B) sweep with the other parameters held fixed
    const N = 200;
    const Bs = new Array(N);
    const Vs = new Array(N);
    for(let i=0;i<N;i++) {
      const b = 0.2*i/(N-1);
      Bs[i] = b;
      Vs[i] = 1000*hallVoltage(I, b, n, t, sign);
    }
    Plotly.restyle(figVH, {x:[Bs], y:[Vs]}, [0]);

    // direction diagram: flip the Lorentz-force and Hall-field arrows
    const fDir = hole ? 1 : -1;
    Plotly.restyle(figDir, {y:[[0, 0.6*fDir]]}, [1]);
    Plotly.restyle(figDir, {y:[[0, 0.55*fDir]]}, [3]);
  }

  function reset(){
    const d = data.defaults || {};
    Object.keys(d).forEach(k => {
      const el = root.querySelector("#__ID__-"+k);
      if(el) el.value = d[k];
    });
    flRefreshBoundValues(root);
    update();
  }

  Object.values(els).forEach(el => {
    if(!el) return;
    const ev = (el.tagName === "SELECT") ? "change" : "input";
    el.addEventListener(ev, update);
  });
  els.reset.addEventListener("click", reset);
  update();
}
"##;

/// Build the Hall effect bundle.
#[must_use]
pub fn build() -> ModuleBundle {
    let intro_html = "<p>\n\
        The Hall effect turns an invisible force on charge carriers into a \
        measurable voltage: carriers in a magnetic field deflect sideways under \
        the Lorentz force <code>F = q v × B</code> until the transverse field E_H \
        balances it. The ideal single-carrier model gives \
        <code>V_H = I B /(n q t)</code> with t the sample thickness.\n</p>\n<p>\n\
        The page shows how V_H scales with I, B, n and t, and uses a direction \
        diagram to identify the carrier type.\n</p>"
        .to_string();

    let controls_html = [
        slider(
            &format!("{MODULE_ID}-I"),
            "Current I (A)",
            0.0,
            5.0,
            0.05,
            1.0,
            "",
        ),
        slider(
            &format!("{MODULE_ID}-B"),
            "Magnetic field B (T)",
            0.0,
            0.2,
            0.002,
            0.08,
            "",
        ),
        slider(
            &format!("{MODULE_ID}-n"),
            "Carrier density n (×10²² m⁻³)",
            0.2,
            20.0,
            0.2,
            4.0,
            "More carriers per volume means a smaller Hall voltage.",
        ),
        slider(
            &format!("{MODULE_ID}-t"),
            "Thickness t (mm)",
            0.1,
            5.0,
            0.05,
            1.0,
            "",
        ),
        select(
            &format!("{MODULE_ID}-type"),
            "Carrier type",
            &[("electron", "electrons (q<0)"), ("hole", "holes (q>0)")],
            "electron",
            "The type flips the sign of V_H and the arrows in the diagram.",
        ),
        buttons(&[(
            &format!("{MODULE_ID}-reset"),
            "Reset parameters",
            ButtonStyle::Primary,
        )]),
    ]
    .join("\n");

    let fig_vh = Figure::new(
        vec![json!({"x": [0, 0.2], "y": [0, 1], "mode": "lines", "name": "V_H(B)",
                    "line": {"color": "#66d9ef", "width": 2}})],
        merge_layout(
            base_layout("Hall voltage V_H vs field B (other parameters fixed)"),
            json!({
                "xaxis": {"title": "B (T)"},
                "yaxis": {"title": "V_H (mV)"},
                "showlegend": false,
            }),
        ),
    );

    let fig_dir = Figure::new(
        vec![
            json!({"x": [0.0, 1.0], "y": [0.0, 0.0], "mode": "lines+markers", "name": "I",
                   "line": {"color": "#66d9ef", "width": 4}, "marker": {"size": 6}}),
            json!({"x": [0.5, 0.5], "y": [0.0, -0.6], "mode": "lines+markers", "name": "F_L",
                   "line": {"color": "#ff6b6b", "width": 4}, "marker": {"size": 6}}),
            json!({"x": [0.5], "y": [0.8], "mode": "text", "text": ["B ⊙"], "name": "B",
                   "textfont": {"size": 18, "color": "rgba(255,255,255,0.85)"}}),
            json!({"x": [0.5, 0.5], "y": [0.0, -0.55], "mode": "lines+markers", "name": "E_H",
                   "line": {"color": "#a6e22e", "width": 4}, "marker": {"size": 6}}),
        ],
        merge_layout(
            base_layout("Direction diagram: I, B, Lorentz force, Hall field"),
            json!({
                "margin": {"l": 40, "r": 20, "t": 40, "b": 40},
                "xaxis": {"range": [-0.2, 1.2], "showgrid": false, "zeroline": false, "visible": false},
                "yaxis": {"range": [-1.0, 1.0], "showgrid": false, "zeroline": false, "visible": false,
                          "scaleanchor": "x"},
                "showlegend": false,
                "shapes": [{"type": "rect", "x0": 0.15, "x1": 0.85, "y0": -0.35, "y1": 0.35,
                            "line": {"color": "rgba(255,255,255,0.18)"},
                            "fillcolor": "rgba(255,255,255,0.04)"}],
                "annotations": [
                    {"x": 0.9, "y": 0.0, "text": "I →", "showarrow": false,
                     "font": {"size": 12, "color": "rgba(255,255,255,0.75)"}},
                    {"x": 0.55, "y": 0.95, "text": "B out of screen (⊙)", "showarrow": false,
                     "font": {"size": 12, "color": "rgba(255,255,255,0.75)"}},
                ],
            }),
        ),
    );

    let pitfalls_html = "<ul>\n\
        <li>\"The Hall voltage does not depend on B\": in the ideal model \
        <code>V_H ∝ B</code>.</li>\n\
        <li>\"Larger n gives a larger Hall voltage\": the opposite, \
        <code>V_H ∝ 1/n</code>.</li>\n\
        <li>\"The sign is unimportant\": the sign of V_H identifies the dominant \
        carrier type.</li>\n</ul>"
        .to_string();

    let questions_html = "<details open>\n<summary>Guiding questions</summary>\n<ol>\n\
        <li><b>Predict</b>: double I — what happens to V_H? Double t?</li>\n\
        <li><b>Verify</b>: switch the carrier type; what happens to the F_L and E_H \
        arrows in the diagram?</li>\n\
        <li><b>Explain</b>: derive V_H from the balance <code>qE_H = qvB</code>.</li>\n\
        </ol>\n</details>"
        .to_string();

    ModuleBundle {
        id: MODULE_ID,
        title: "Hall effect (carrier sign and V_H)".to_string(),
        intro_html,
        controls_html,
        figures: vec![fig_vh, fig_dir],
        data_payload: json!({
            "defaults": {"I": 1.0, "B": 0.08, "n": 4.0, "t": 1.0, "type": "electron"},
            "consts": {"e": E_CHARGE},
        }),
        js: bind_js(JS, MODULE_ID),
        pitfalls_html,
        questions_html,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundle_shape() {
        let b = build();
        assert_eq!(b.id, "hall_effect");
        assert_eq!(b.figures.len(), 2);
        assert!(b.controls_html.contains("hall_effect-type"));
        assert!(b.controls_html.contains("selected"));
        assert!(b.js.contains("hallVoltage"));
    }

    #[test]
    fn select_listens_on_change() {
        let b = build();
        assert!(b.js.contains("el.tagName === \"SELECT\""));
    }
}
