//! Induction heating module: eddy currents and the skin effect.

use serde_json::json;

use crate::figure::{Figure, base_layout, merge_layout};
use crate::html::controls::{ButtonStyle, buttons, slider};
use crate::modules::{ModuleBundle, bind_js};
use crate::physics::MU_0;

/// Stable module id.
pub const MODULE_ID: &str = "induction_heating";

const JS: &str = r##"
function init___ID__(){
  const id = "__ID__";
  const root = document.getElementById("section-"+id);
  const data = flGetJSON("data-"+id);
  const els = {
    f: root.querySelector("#__ID__-f"),
    B: root.querySelector("#__ID__-B"),
    rho: root.querySelector("#__ID__-rho"),
    t: root.querySelector("#__ID__-t"),
    play: root.querySelector("#__ID__-play"),
    reset: root.querySelector("#__ID__-reset"),
  };

  flBindValue(root, "__ID__-f", " kHz", 1);
  flBindValue(root, "__ID__-B", " mT", 1);
  flBindValue(root, "__ID__-rho", "", 0);
  flBindValue(root, "__ID__-t", " mm", 1);

  const figD = document.getElementById("fig-__ID__-0");
  const figP = document.getElementById("fig-__ID__-1");

  const readouts = root.querySelector("#readouts-"+id);
  flMakeReadouts(readouts, [
    {key:"current δ", id:"__ID__-ro-d", value:"—"},
    {key:"current P_rel", id:"__ID__-ro-p", value:"—"},
    {key:"hint", id:"__ID__-ro-tip", value:"—"},
  ]);

  const mu0 = data.consts.mu0;

  // frequency auto-sweep; stops when the section loses focus
  let timer = null;
  let dir = 1;
  function stopPlay(){ if(timer){ clearInterval(timer); timer=null; } }
  function tick(){
    const el = els.f;
    if(!el) return;
    const vmin = flNum(el.min);
    const vmax = flNum(el.max);
    const step = Math.max(1e-12, flNum(el.step || 1));
    let v = flNum(el.value);
    const factor = 1.04;
    v = (dir > 0) ? (v*factor) : (v/factor);
    if(v >= vmax){ v=vmax; dir=-1; }
    if(v <= vmin){ v=vmin; dir=1; }
    v = vmin + Math.round((v-vmin)/step)*step;
    v = Math.max(vmin, Math.min(vmax, v));
    el.value = v.toString();
  }
  function togglePlay(){
    if(timer){ stopPlay(); return; }
    timer = setInterval(() => {
      if(!root.classList.contains("active")) { stopPlay(); return; }
      tick();
      flRefreshBoundValues(root);
      update();
    }, 150);
  }

  function skinDepth(fHz, rho){
    const w = 2*Math.PI*fHz;
    return Math.sqrt(2*rho/(Math.max(1e-12,w*mu0)));
  }

  function powerRel(fHz, B, rho, t){
    // teaching indicator: P ~ (ω^2 B^2 / ρ) * (1 - exp(-t/δ))
    const w = 2*Math.PI*fHz;
    const d = skinDepth(fHz, rho);
    const fill = 1 - Math.exp(-t/Math.max(1e-12,d));
    return (w*w*B*B/Math.max(1e-18,rho)) * fill;
  }

  function update(){
    const f = 1e3*Math.max(1e-6, flNum(els.f.value)); // Hz
    const B = 1e-3*Math.max(0, flNum(els.B.value)); // T
    const rho = 1e-8*Math.max(1e-6, flNum(els.rho.value)); // Ω·m
    const t = 1e-3*Math.max(1e-6, flNum(els.t.value)); // m

    const d = skinDepth(f, rho);
    const P = powerRel(f, B, rho, t);

    root.querySelector("#__ID__-ro-d").textContent = flFmt(1000*d, 3) + " mm";
    root.querySelector("#__ID__-ro-p").textContent = flFmt(P/1e6, 3) + "×10⁶ (arb.)";
    root.querySelector("#__ID__-ro-tip").textContent =
      (t > 3*d) ? "t≫δ: heating stays near the surface" : "t~δ: the bulk participates";

    const fmin = 0.5, fmax = 200.0;
    const N = 240;
    const fk = new Array(N);
    const ds = new Array(N);
    const ps = new Array(N);
    for(let i=0;i<N;i++) {
      const ffk = fmin*Math.pow(fmax/fmin, i/(N-1));
      fk[i] = ffk;
      const fHz = 1e3*ffk;
      ds[i] = 1000*skinDepth(fHz, rho);
      ps[i] = powerRel(fHz, B, rho, t)/1e6;
    }
    Plotly.restyle(figD, {x:[fk, [f/1000]], y:[ds, [1000*d]]}, [0,1]);
    Plotly.restyle(figP, {x:[fk, [f/1000]], y:[ps, [P/1e6]]}, [0,1]);
  }

  function reset(){
    stopPlay();
    dir = 1;
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
  els.play.addEventListener("click", togglePlay);
  els.reset.addEventListener("click", reset);
  update();
}
"##;

/// Build the induction heating bundle.
#[must_use]
pub fn build() -> ModuleBundle {
    let intro_html = "<p>\n\
        The intuition chain of induction heating: an alternating magnetic field \
        induces an electric field inside the metal, which drives eddy currents, \
        which dissipate Joule heat. At high frequency the <b>skin effect</b> \
        appears: current concentrates in a surface layer of thickness \
        <code>δ ≈ √(2ρ/(ωμ))</code> with ρ the resistivity and μ the \
        permeability.\n</p>\n<p>\n\
        The page uses a teaching approximation to show δ(f) and a relative \
        heating-power indicator versus frequency. It deliberately gives no \
        device-construction guidance.\n</p>"
        .to_string();

    let controls_html = [
        slider(
            &format!("{MODULE_ID}-f"),
            "Frequency f (kHz)",
            0.5,
            200.0,
            0.5,
            50.0,
            "",
        ),
        slider(
            &format!("{MODULE_ID}-B"),
            "Field amplitude B (mT)",
            0.5,
            80.0,
            0.5,
            20.0,
            "Power climbs quickly with B (qualitatively: induced EMF ∝ ωB).",
        ),
        slider(
            &format!("{MODULE_ID}-rho"),
            "Resistivity ρ (×10⁻⁸ Ω·m)",
            1.0,
            200.0,
            1.0,
            20.0,
            "Larger ρ means smaller currents, so the power usually drops, but δ grows \
             and deeper material participates.",
        ),
        slider(
            &format!("{MODULE_ID}-t"),
            "Material thickness t (mm)",
            0.2,
            20.0,
            0.2,
            5.0,
            "",
        ),
        buttons(&[
            (
                &format!("{MODULE_ID}-play"),
                "Play / pause",
                ButtonStyle::Primary,
            ),
            (
                &format!("{MODULE_ID}-reset"),
                "Reset parameters",
                ButtonStyle::Plain,
            ),
        ]),
    ]
    .join("\n");

    let fig_delta = Figure::new(
        vec![
            json!({"x": [0.5, 200], "y": [10, 2], "mode": "lines", "name": "δ(f)",
                   "line": {"color": "#66d9ef", "width": 2}}),
            json!({"x": [50], "y": [3], "mode": "markers", "name": "current",
                   "marker": {"size": 10, "color": "#ff6b6b"}}),
        ],
        merge_layout(
            base_layout("Skin depth δ vs frequency (teaching approximation)"),
            json!({
                "xaxis": {"title": "f (kHz)", "type": "log"},
                "yaxis": {"title": "δ (mm)"},
                "legend": {"orientation": "h", "yanchor": "bottom", "y": 1.02, "xanchor": "left", "x": 0},
            }),
        ),
    );

    let fig_power = Figure::new(
        vec![
            json!({"x": [0.5, 200], "y": [0.1, 0.8], "mode": "lines", "name": "P_rel(f)",
                   "line": {"color": "#a6e22e", "width": 2}}),
            json!({"x": [50], "y": [0.5], "mode": "markers", "name": "current",
                   "marker": {"size": 10, "color": "#ff6b6b"}}),
        ],
        merge_layout(
            base_layout("Relative heating power P_rel vs frequency (trend)"),
            json!({
                "xaxis": {"title": "f (kHz)", "type": "log"},
                "yaxis": {"title": "P_rel (arb.)"},
                "legend": {"orientation": "h", "yanchor": "bottom", "y": 1.02, "xanchor": "left", "x": 0},
            }),
        ),
    );

    let pitfalls_html = "<ul>\n\
        <li>\"Higher frequency means larger δ\": the opposite, <code>δ ∝ 1/√f</code>; \
        higher frequency means a thinner skin.</li>\n\
        <li>\"Higher resistivity heats more easily\": the general trend is power \
        falling with 1/ρ, though δ also grows and the effective volume changes \
        (the page uses a simplified indicator).</li>\n\
        <li>\"Any field heats strongly\": power grows with ω and B; at low \
        frequency or weak field the heating is feeble.</li>\n</ul>"
        .to_string();

    let questions_html = "<details open>\n<summary>Guiding questions</summary>\n<ol>\n\
        <li><b>Predict</b>: raise f by 4×; what does δ become? (Hint: δ∝1/√f.)</li>\n\
        <li><b>Verify</b>: grow t from 2 mm to 10 mm; once t≫δ, does the power \
        still increase noticeably with t?</li>\n\
        <li><b>Explain</b>: using \"induced EMF ∝ dΦ/dt ∝ ωB\", why is the power \
        so sensitive to frequency?</li>\n</ol>\n</details>"
        .to_string();

    ModuleBundle {
        id: MODULE_ID,
        title: "Induction heating (eddy currents and skin effect)".to_string(),
        intro_html,
        controls_html,
        figures: vec![fig_delta, fig_power],
        data_payload: json!({
            "defaults": {"f": 50.0, "B": 20.0, "rho": 20.0, "t": 5.0},
            "consts": {"mu0": MU_0},
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
        assert_eq!(b.id, "induction_heating");
        assert_eq!(b.figures.len(), 2);
        assert!(b.js.contains("skinDepth"));
        assert!(b.js.contains("togglePlay"));
        assert!(b.controls_html.contains("induction_heating-play"));
    }

    #[test]
    fn log_axes() {
        let b = build();
        assert_eq!(b.figures[0].layout["xaxis"]["type"], "log");
        assert_eq!(b.figures[1].layout["xaxis"]["type"], "log");
    }
}
