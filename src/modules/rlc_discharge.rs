//! RLC discharge module: damped oscillation and the energy-exchange view.
//!
//! Closed-form solution of the series RLC free discharge, recomputed in the
//! browser per drag; no precomputed data beyond the defaults.

use serde_json::json;

use crate::figure::{Figure, base_layout, merge_layout};
use crate::html::controls::{ButtonStyle, buttons, slider};
use crate::modules::{ModuleBundle, bind_js};

/// Stable module id.
pub const MODULE_ID: &str = "rlc_discharge";

const JS: &str = r##"
function init___ID__(){
  const id = "__ID__";
  const root = document.getElementById("section-"+id);
  const data = flGetJSON("data-"+id);
  const els = {
    V0: root.querySelector("#__ID__-V0"),
    R: root.querySelector("#__ID__-R"),
    L: root.querySelector("#__ID__-L"),
    C: root.querySelector("#__ID__-C"),
    reset: root.querySelector("#__ID__-reset"),
  };

  flBindValue(root, "__ID__-V0", " V", 0);
  flBindValue(root, "__ID__-R", " Ω", 2);
  flBindValue(root, "__ID__-L", " mH", 0);
  flBindValue(root, "__ID__-C", " mF", 1);

  const figIV = document.getElementById("fig-__ID__-0");
  const figE = document.getElementById("fig-__ID__-1");

  const readouts = root.querySelector("#readouts-"+id);
  flMakeReadouts(readouts, [
    {key:"ω0, damping α", id:"__ID__-ro-w", value:"—"},
    {key:"Q (approx.)", id:"__ID__-ro-q", value:"—"},
    {key:"damping regime", id:"__ID__-ro-reg", value:"—"},
  ]);

  function update(){
    const V0 = flNum(els.V0.value);
    const R = Math.max(0, flNum(els.R.value));
    const L = 1e-3*Math.max(1e-6, flNum(els.L.value));
    const C = 1e-3*Math.max(1e-9, flNum(els.C.value));

    const w0 = 1/Math.sqrt(L*C);
    const alpha = R/(2*L);
    const Q = (R>1e-12) ? (1/R)*Math.sqrt(L/C) : 1e9;

    let regime = "underdamped";
    if(Math.abs(alpha-w0)/w0 < 1e-3) regime = "critically damped";
    else if(alpha > w0) regime = "overdamped";
    root.querySelector("#__ID__-ro-w").textContent = "ω0≈"+flFmt(w0,1)+" rad/s, α≈"+flFmt(alpha,1);
    root.querySelector("#__ID__-ro-q").textContent = flFmt(Q,2);
    root.querySelector("#__ID__-ro-reg").textContent = regime;

    // time axis: several periods or a few decay times, whichever is shorter
    const T0 = 2*Math.PI/Math.max(1e-9, w0);
    const tMax = Math.min(0.08, Math.max(6*T0, 6/Math.max(1e-9,alpha)));
    const N = 1000;
    const t = new Array(N);
    const Vc = new Array(N);
    const I = new Array(N);

    const dt = tMax/(N-1);
    if(alpha < w0*(1-1e-6)) {
      const wd = Math.sqrt(w0*w0 - alpha*alpha);
      for(let i=0;i<N;i++) {
        const tt = i*dt;
        t[i] = 1000*tt;
        const env = Math.exp(-alpha*tt);
        Vc[i] = V0*env*(Math.cos(wd*tt) + (alpha/wd)*Math.sin(wd*tt));
        I[i] = (V0/(L*wd))*env*Math.sin(wd*tt);
      }
    } else if(Math.abs(alpha-w0)/w0 < 1e-3) {
      for(let i=0;i<N;i++) {
        const tt = i*dt;
        t[i] = 1000*tt;
        const env = Math.exp(-alpha*tt);
        Vc[i] = V0*env*(1 + alpha*tt);
        I[i] = (V0/L)*tt*env;
      }
    } else {
      const beta = Math.sqrt(alpha*alpha - w0*w0);
      const s1 = -alpha + beta;
      const s2 = -alpha - beta;
      for(let i=0;i<N;i++) {
        const tt = i*dt;
        t[i] = 1000*tt;
        Vc[i] = V0*(s2*Math.exp(s1*tt) - s1*Math.exp(s2*tt))/(s2-s1);
        I[i] = (V0/L)*(Math.exp(s1*tt) - Math.exp(s2*tt))/(s1-s2);
      }
    }

    // energies: capacitor, inductor, accumulated heat
    const Ec = new Array(N);
    const El = new Array(N);
    const Er = new Array(N);
    Er[0]=0;
    for(let i=0;i<N;i++) {
      Ec[i] = 0.5*C*Vc[i]*Vc[i];
      El[i] = 0.5*L*I[i]*I[i];
      if(i>0) {
        const i2a = I[i-1]*I[i-1], i2b = I[i]*I[i];
        Er[i] = Er[i-1] + 0.5*(i2a+i2b)*R*dt;
      }
    }

    Plotly.restyle(figIV, {x:[t,t], y:[I,Vc]}, [0,1]);
    Plotly.restyle(figE, {x:[t,t,t], y:[Ec,El,Er]}, [0,1,2]);
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
    el.addEventListener("input", update);
  });
  els.reset.addEventListener("click", reset);
  update();
}
"##;

/// Build the RLC discharge bundle.
#[must_use]
pub fn build() -> ModuleBundle {
    let intro_html = "<p>\n\
        The RLC oscillation makes circuit energy visible: capacitor energy \
        <code>E_C=½CV²</code> and inductor energy <code>E_L=½LI²</code> swap back \
        and forth while the resistor dissipates the total as Joule heat. Larger \
        damping (larger R) means faster decay and a lower Q.\n</p>"
        .to_string();

    let controls_html = [
        slider(
            &format!("{MODULE_ID}-V0"),
            "Initial voltage V0 (V)",
            1.0,
            50.0,
            1.0,
            20.0,
            "",
        ),
        slider(
            &format!("{MODULE_ID}-R"),
            "Resistance R (Ω)",
            0.0,
            50.0,
            0.2,
            4.0,
            "",
        ),
        slider(
            &format!("{MODULE_ID}-L"),
            "Inductance L (mH)",
            1.0,
            200.0,
            1.0,
            40.0,
            "",
        ),
        slider(
            &format!("{MODULE_ID}-C"),
            "Capacitance C (mF)",
            0.1,
            10.0,
            0.1,
            2.0,
            "",
        ),
        buttons(&[(
            &format!("{MODULE_ID}-reset"),
            "Reset parameters",
            ButtonStyle::Primary,
        )]),
    ]
    .join("\n");

    let fig_iv = Figure::new(
        vec![
            json!({"x": [0, 1], "y": [0, 0], "mode": "lines", "name": "I(t)",
                   "line": {"color": "#66d9ef", "width": 2}}),
            json!({"x": [0, 1], "y": [0, 0], "mode": "lines", "name": "V_C(t)",
                   "line": {"color": "#a6e22e", "width": 2}, "yaxis": "y2"}),
        ],
        merge_layout(
            base_layout("RLC discharge: current and capacitor voltage"),
            json!({
                "xaxis": {"title": "t (ms)"},
                "yaxis": {"title": "I (A)"},
                "yaxis2": {"title": "V (V)", "overlaying": "y", "side": "right", "showgrid": false},
                "legend": {"orientation": "h", "yanchor": "bottom", "y": 1.02, "xanchor": "left", "x": 0},
            }),
        ),
    );

    let fig_e = Figure::new(
        vec![
            json!({"x": [0, 1], "y": [0, 0], "mode": "lines", "name": "E_C",
                   "line": {"color": "#66d9ef", "width": 2}}),
            json!({"x": [0, 1], "y": [0, 0], "mode": "lines", "name": "E_L",
                   "line": {"color": "#a6e22e", "width": 2}}),
            json!({"x": [0, 1], "y": [0, 0], "mode": "lines", "name": "E_R (heat)",
                   "line": {"color": "#ff6b6b", "width": 2}}),
        ],
        merge_layout(
            base_layout("Energy view: C ↔ L exchange + R dissipation"),
            json!({
                "xaxis": {"title": "t (ms)"},
                "yaxis": {"title": "energy (J)"},
                "legend": {"orientation": "h", "yanchor": "bottom", "y": 1.02, "xanchor": "left", "x": 0},
            }),
        ),
    );

    let pitfalls_html = "<ul>\n\
        <li>\"The inductor's energy vanishes in the resistor\": it does not vanish, \
        the current converts it to heat in R.</li>\n\
        <li>\"The oscillation frequency depends only on L or only on C\": the ideal \
        frequency is <code>ω0=1/√(LC)</code>; both matter, and R shifts the damped \
        frequency.</li>\n\
        <li>\"Higher Q means more dangerous\": Q describes relative loss, not \
        hazard; amplitudes still matter.</li>\n</ul>"
        .to_string();

    let questions_html = "<details open>\n<summary>Guiding questions</summary>\n<ol>\n\
        <li><b>Predict</b>: doubling C, does the period grow or shrink? Why?</li>\n\
        <li><b>Verify</b>: compare the energy curves for R near 0 and R large: how does \
        the growth of E_R differ?</li>\n\
        <li><b>Explain</b>: while energy swaps between E_C and E_L, why are I(t) and \
        V_C(t) out of phase?</li>\n</ol>\n</details>"
        .to_string();

    ModuleBundle {
        id: MODULE_ID,
        title: "RLC oscillation (energy exchange and damping)".to_string(),
        intro_html,
        controls_html,
        figures: vec![fig_iv, fig_e],
        data_payload: json!({"defaults": {"V0": 20, "R": 4.0, "L": 40.0, "C": 2.0}}),
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
        assert_eq!(b.id, "rlc_discharge");
        assert_eq!(b.figures.len(), 2);
        assert!(b.controls_html.contains("rlc_discharge-R"));
        assert!(b.js.contains("function init_rlc_discharge()"));
        assert!(b.js.contains("fig-rlc_discharge-0"));
    }

    #[test]
    fn defaults_match_slider_values() {
        let b = build();
        let d = &b.data_payload["defaults"];
        assert_eq!(d["V0"], 20);
        assert_eq!(d["R"], 4.0);
        assert!(b.controls_html.contains("value=\"20\""));
    }
}
