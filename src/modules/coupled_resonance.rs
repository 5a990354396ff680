//! Wireless power transfer module: two coupled resonant loops.
//!
//! Frequency-domain model of two series RLC loops coupled through a mutual
//! inductance M. The browser sweeps the drive frequency and solves the 2x2
//! complex system per point, so every control stays continuous.

use serde_json::json;

use crate::figure::{Figure, base_layout, merge_layout};
use crate::html::controls::{ButtonStyle, buttons, slider};
use crate::modules::{ModuleBundle, bind_js};

/// Stable module id.
pub const MODULE_ID: &str = "coupled_resonance";

const JS: &str = r##"
function init___ID__(){
  const id = "__ID__";
  const root = document.getElementById("section-"+id);
  const data = flGetJSON("data-"+id);

  const els = {
    k: root.querySelector("#__ID__-k"),
    Q1: root.querySelector("#__ID__-Q1"),
    Q2: root.querySelector("#__ID__-Q2"),
    RL: root.querySelector("#__ID__-RL"),
    detune: root.querySelector("#__ID__-detune"),
    reset: root.querySelector("#__ID__-reset"),
  };

  flBindValue(root, "__ID__-k", "", 2);
  flBindValue(root, "__ID__-Q1", "", 0);
  flBindValue(root, "__ID__-Q2", "", 0);
  flBindValue(root, "__ID__-RL", " Ω", 0);
  flBindValue(root, "__ID__-detune", "×f0", 2);

  const figEta = document.getElementById("fig-__ID__-0");
  const figI = document.getElementById("fig-__ID__-1");

  const readouts = root.querySelector("#readouts-"+id);
  flMakeReadouts(readouts, [
    {key:"η_peak", id:"__ID__-ro-eta", value:"—"},
    {key:"peak frequency", id:"__ID__-ro-f", value:"—"},
    {key:"hint", id:"__ID__-ro-tip", value:"—"},
  ]);

  // minimal complex helpers
  function c(re, im){ return {re:re, im:im}; }
  function csub(a,b){ return c(a.re-b.re, a.im-b.im); }
  function cadd(a,b){ return c(a.re+b.re, a.im+b.im); }
  function cmul(a,b){ return c(a.re*b.re - a.im*b.im, a.re*b.im + a.im*b.re); }
  function cdiv(a,b){ const d=b.re*b.re+b.im*b.im; return c((a.re*b.re+a.im*b.im)/d, (a.im*b.re-a.re*b.im)/d); }
  function conj(a){ return c(a.re, -a.im); }
  function cabs(a){ return Math.hypot(a.re, a.im); }

  function update(){
    const k = Math.max(0, flNum(els.k.value));
    const Q1 = Math.max(1, flNum(els.Q1.value));
    const Q2 = Math.max(1, flNum(els.Q2.value));
    const RL = Math.max(0.1, flNum(els.RL.value));
    const det = flNum(els.detune.value);

    const f0 = 100e3;
    const w0 = 2*Math.PI*f0;
    const L1 = 100e-6, L2 = 100e-6;
    const C1 = 1/(w0*w0*L1);
    const w02 = w0*(1+det);
    const C2 = 1/(w02*w02*L2);
    const R1 = w0*L1/Q1;
    const R2 = w0*L2/Q2;
    const M = k*Math.sqrt(L1*L2);
    const Vs = 10.0;

    const N = 620;
    const fr = new Array(N);
    const eta = new Array(N);
    const I1m = new Array(N);
    const I2m = new Array(N);

    let best = -1, bestF = 1.0;
    for(let i=0;i<N;i++) {
      const r = 0.6 + 0.8*i/(N-1);
      fr[i] = r;
      const w = w0*r;

      const Z1 = cadd(cadd(c(R1,0), c(0,w*L1)), c(0, -1/(w*C1)));
      const Z2 = cadd(cadd(c(R2+RL,0), c(0,w*L2)), c(0, -1/(w*C2)));
      const jwM = c(0, w*M);

      // solve the coupled pair:
      //   Z1 I1 + jwM I2 = Vs
      //   jwM I1 + Z2 I2 = 0
      const den = csub(cmul(Z1, Z2), cmul(jwM, jwM));
      const I1 = cdiv(cmul(c(Vs,0), Z2), den);
      const I2 = cdiv(cmul(c(-Vs,0), jwM), den);

      const I1abs = cabs(I1);
      const I2abs = cabs(I2);
      I1m[i] = I1abs;
      I2m[i] = I2abs;

      const Pin = 0.5 * (Vs * conj(I1).re);
      const PL = 0.5 * I2abs*I2abs * RL;
      const et = (Pin>1e-12) ? (PL/Pin) : 0;
      eta[i] = Math.max(0, Math.min(1.0, et));
      if(eta[i] > best) { best = eta[i]; bestF = r; }
    }

    Plotly.restyle(figEta, {x:[fr], y:[eta]}, [0]);
    Plotly.restyle(figI, {x:[fr, fr], y:[I1m, I2m]}, [0,1]);

    root.querySelector("#__ID__-ro-eta").textContent = flFmt(best, 3);
    root.querySelector("#__ID__-ro-f").textContent = "≈"+flFmt(bestF,3)+" f0";
    root.querySelector("#__ID__-ro-tip").textContent =
      (Math.abs(det)>0.05) ? "clearly detuned: peak drops/shifts" : "near resonance";
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

/// Build the coupled-resonance bundle.
#[must_use]
pub fn build() -> ModuleBundle {
    let intro_html = "<p>\n\
        The vocabulary of wireless charging: <b>coupling coefficient k</b>, \
        <b>resonant frequency</b>, <b>Q factor</b> and <b>detuning</b>. Two resonant \
        loops couple through a mutual inductance; energy transfers efficiently only \
        when the frequency matches, losses are small (large Q), and the coupling is \
        moderate.\n</p>\n<p>\n\
        The page computes the efficiency curve η(f) from a two-loop frequency-domain \
        model, swept entirely in the browser (O(N) per drag).\n</p>"
        .to_string();

    let controls_html = [
        slider(
            &format!("{MODULE_ID}-k"),
            "Coupling coefficient k",
            0.0,
            0.6,
            0.01,
            0.20,
            "",
        ),
        slider(
            &format!("{MODULE_ID}-Q1"),
            "Transmitter Q1 (higher = lower loss)",
            10.0,
            400.0,
            5.0,
            120.0,
            "",
        ),
        slider(
            &format!("{MODULE_ID}-Q2"),
            "Receiver Q2",
            10.0,
            400.0,
            5.0,
            120.0,
            "",
        ),
        slider(
            &format!("{MODULE_ID}-RL"),
            "Load resistance R_L (Ω)",
            1.0,
            80.0,
            1.0,
            12.0,
            "",
        ),
        slider(
            &format!("{MODULE_ID}-detune"),
            "Detuning (receiver resonance offset)",
            -0.25,
            0.25,
            0.01,
            0.0,
            "+0.10 means the receiver resonates about 10% above the transmitter.",
        ),
        buttons(&[(
            &format!("{MODULE_ID}-reset"),
            "Reset parameters",
            ButtonStyle::Primary,
        )]),
    ]
    .join("\n");

    let fig_eta = Figure::new(
        vec![json!({"x": [0.6, 1.4], "y": [0.1, 0.2], "mode": "lines", "name": "η(f)",
                    "line": {"color": "#66d9ef", "width": 2}})],
        merge_layout(
            base_layout("Transfer efficiency η vs normalized frequency f/f0"),
            json!({
                "xaxis": {"title": "f/f0"},
                "yaxis": {"title": "η", "range": [0, 1.05]},
                "showlegend": false,
            }),
        ),
    );

    let fig_i = Figure::new(
        vec![
            json!({"x": [0.6, 1.4], "y": [1, 2], "mode": "lines", "name": "|I1|",
                   "line": {"color": "#a6e22e", "width": 2}}),
            json!({"x": [0.6, 1.4], "y": [0.5, 1.0], "mode": "lines", "name": "|I2|",
                   "line": {"color": "#ff6b6b", "width": 2}}),
        ],
        merge_layout(
            base_layout("Current magnitudes |I1| and |I2| (frequency domain)"),
            json!({
                "xaxis": {"title": "f/f0"},
                "yaxis": {"title": "|I| (arb.)"},
                "legend": {"orientation": "h", "yanchor": "bottom", "y": 1.02, "xanchor": "left", "x": 0},
            }),
        ),
    );

    let pitfalls_html = "<ul>\n\
        <li>\"Larger k always means higher efficiency\": not necessarily; strong \
        coupling splits the response into two peaks and can mismatch the load.</li>\n\
        <li>\"Just tune to resonance and you are done\": detuning degrades efficiency \
        sharply, and distance, alignment and load all move the optimum.</li>\n\
        <li>\"Larger Q is always better\": large Q means low loss but narrow bandwidth, \
        so the link becomes more sensitive to detuning.</li>\n</ul>"
        .to_string();

    let questions_html = "<details open>\n<summary>Guiding questions</summary>\n<ol>\n\
        <li><b>Predict</b>: moving detune from 0 to +0.15, which way does the peak \
        move, and does it rise or fall?</li>\n\
        <li><b>Verify</b>: at very large Q, does the curve get sharper or wider? What \
        does that mean for robustness?</li>\n\
        <li><b>Explain</b>: why does strong coupling produce a double peak? (Hint: \
        normal modes of two coupled oscillators.)</li>\n</ol>\n</details>"
        .to_string();

    ModuleBundle {
        id: MODULE_ID,
        title: "Wireless power (coupled resonance)".to_string(),
        intro_html,
        controls_html,
        figures: vec![fig_eta, fig_i],
        data_payload: json!({"defaults": {"k": 0.20, "Q1": 120, "Q2": 120, "RL": 12, "detune": 0.0}}),
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
        assert_eq!(b.id, "coupled_resonance");
        assert_eq!(b.figures.len(), 2);
        assert!(b.js.contains("function init_coupled_resonance()"));
        assert!(b.js.contains("cdiv"));
    }

    #[test]
    fn efficiency_axis_clamped() {
        let b = build();
        assert_eq!(b.figures[0].layout["yaxis"]["range"], json!([0, 1.05]));
    }
}
