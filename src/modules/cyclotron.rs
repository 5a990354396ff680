//! Cyclotron module: resonance, detuning and the relativistic limit.
//!
//! Half-turn stepped simulation in the browser. Each pass through the gap
//! adds `q V_gap sin(phase)`; the half-turn time comes from the current
//! cyclotron frequency (optionally with the relativistic gamma).

use serde_json::json;

use crate::figure::{Figure, base_layout, merge_layout};
use crate::html::controls::{ButtonStyle, buttons, select, slider};
use crate::modules::{ModuleBundle, bind_js};
use crate::physics::{C_LIGHT, E_CHARGE, M_P};

/// Stable module id.
pub const MODULE_ID: &str = "cyclotron";

const JS: &str = r##"
function init___ID__(){
  const id = "__ID__";
  const root = document.getElementById("section-"+id);
  const data = flGetJSON("data-"+id);
  const els = {
    particle: root.querySelector("#__ID__-particle"),
    B: root.querySelector("#__ID__-B"),
    Vgap: root.querySelector("#__ID__-Vgap"),
    frf: root.querySelector("#__ID__-frf"),
    rel: root.querySelector("#__ID__-rel"),
    reset: root.querySelector("#__ID__-reset"),
  };

  flBindValue(root, "__ID__-B", " T", 3);
  flBindValue(root, "__ID__-Vgap", " V", 0);
  flBindValue(root, "__ID__-frf", " MHz", 2);

  const figTraj = document.getElementById("fig-__ID__-0");
  const figK = document.getElementById("fig-__ID__-1");

  const readouts = root.querySelector("#readouts-"+id);
  flMakeReadouts(readouts, [
    {key:"theoretical f_c", id:"__ID__-ro-fc", value:"—"},
    {key:"detuning Δf = f_rf - f_c", id:"__ID__-ro-df", value:"—"},
    {key:"final energy K_end", id:"__ID__-ro-K", value:"—"},
  ]);

  const e = data.consts.e;
  const mp = data.consts.mp;
  const c = data.consts.c;

  function particleQM(kind){
    if(kind === "alpha") return {q: 2*e, m: 4*mp};
    return {q: 1*e, m: 1*mp};
  }

  function simulate(q, m, B, Vgap, frf, relOn){
    const wRF = 2*Math.PI*frf;
    const nSteps = 140; // half-turns
    let t = 0;
    let K = 0; // J
    let theta = 0;
    const xs = [];
    const ys = [];
    const ks = [];
    const phs = [];

    function gammaFromK(K){
      return 1 + K/(m*c*c);
    }
    for(let n=0;n<nSteps;n++) {
      const gam = relOn ? gammaFromK(K) : 1.0;
      const wC = Math.abs(q)*B/(gam*m);
      const dtHalf = Math.PI/Math.max(1e-9, wC);
      const phase = wRF*t;
      const dK = q*Vgap*Math.sin(phase);
      K = Math.max(0, K + dK);

      const gam2 = relOn ? gammaFromK(K) : 1.0;
      const v = relOn ? (c*Math.sqrt(1 - 1/(gam2*gam2))) : Math.sqrt(Math.max(0, 2*K/m));
      const r = (gam2*m*v)/(Math.abs(q)*Math.max(1e-9,B));

      // arc points for this half-turn
      const nSeg = 18;
      for(let i=0;i<=nSeg;i++) {
        const a = theta + Math.PI*i/nSeg;
        xs.push(r*Math.cos(a));
        ys.push(r*Math.sin(a));
      }
      theta += Math.PI;
      t += dtHalf;
      ks.push(K/1e3/e); // keV
      phs.push(((phase%(2*Math.PI))+2*Math.PI)%(2*Math.PI)/Math.PI); // phase/pi in [0,2)
    }
    return {xs, ys, ks, phs};
  }

  function update(){
    const part = els.particle.value;
    const B = flNum(els.B.value);
    const Vgap = flNum(els.Vgap.value);
    const frfMHz = flNum(els.frf.value);
    const frf = frfMHz*1e6;
    const relOn = (els.rel.value === "on");

    const qm = particleQM(part);
    const fc = Math.abs(qm.q)*B/(2*Math.PI*qm.m); // Hz (non-rel)
    root.querySelector("#__ID__-ro-fc").textContent = flFmt(fc/1e6, 3) + " MHz";
    root.querySelector("#__ID__-ro-df").textContent = flFmt((frf-fc)/1e6, 3) + " MHz";

    const sim = simulate(qm.q, qm.m, B, Vgap, frf, relOn);
    Plotly.restyle(figTraj, {x:[sim.xs], y:[sim.ys]}, [0]);

    const n = sim.ks.length;
    const idx = Array.from({length:n}, (_,i)=>i);
    Plotly.restyle(figK, {x:[idx, idx], y:[sim.ks, sim.phs]}, [0,1]);

    const Kend = sim.ks[n-1];
    root.querySelector("#__ID__-ro-K").textContent = flFmt(Kend, 2) + " keV";
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

/// Build the cyclotron bundle.
#[must_use]
pub fn build() -> ModuleBundle {
    let intro_html = "<p>\n\
        The key idea of the cyclotron is <b>resonance</b>: in a uniform magnetic \
        field a charged particle circles at <code>ω_c = |q|B/m</code> \
        (non-relativistic). Each pass through the gap gains \
        <code>ΔK = q V_gap · sin(phase)</code> from the RF field. When the RF \
        frequency matches the cyclotron frequency the particle keeps gaining \
        energy on an outward spiral; detune it, or enter the relativistic \
        regime, and the kicks start cancelling.\n</p>"
        .to_string();

    let controls_html = [
        select(
            &format!("{MODULE_ID}-particle"),
            "Particle (positive charge)",
            &[("p", "proton p⁺"), ("alpha", "alpha particle (He²⁺)")],
            "p",
            "",
        ),
        slider(
            &format!("{MODULE_ID}-B"),
            "Magnetic field B (T)",
            0.02,
            0.20,
            0.001,
            0.10,
            "",
        ),
        slider(
            &format!("{MODULE_ID}-Vgap"),
            "Gap voltage amplitude V_gap (V)",
            0.0,
            800.0,
            10.0,
            200.0,
            "",
        ),
        slider(
            &format!("{MODULE_ID}-frf"),
            "RF frequency f_rf (MHz)",
            0.2,
            3.0,
            0.01,
            1.52,
            "Tune f_rf close to the theoretical f_c and watch the trajectory and energy change.",
        ),
        select(
            &format!("{MODULE_ID}-rel"),
            "Relativistic correction (optional)",
            &[
                ("off", "off: ωc=|q|B/m"),
                ("on", "on: ωc=|q|B/(γm)"),
            ],
            "off",
            "With the correction on, rising energy raises γ, lowers the cyclotron \
             frequency and detunes the machine.",
        ),
        buttons(&[(
            &format!("{MODULE_ID}-reset"),
            "Reset parameters",
            ButtonStyle::Primary,
        )]),
    ]
    .join("\n");

    let fig_traj = Figure::new(
        vec![json!({"x": [0], "y": [0], "mode": "lines", "name": "trajectory",
                    "line": {"color": "#66d9ef", "width": 2}})],
        merge_layout(
            base_layout("Trajectory (outward spiral, degraded when detuned)"),
            json!({
                "margin": {"l": 50, "r": 20, "t": 40, "b": 45},
                "xaxis": {"title": "x (m)", "scaleanchor": "y", "scaleratio": 1,
                          "showgrid": true, "gridcolor": "rgba(255,255,255,0.06)"},
                "yaxis": {"title": "y (m)", "showgrid": true, "gridcolor": "rgba(255,255,255,0.06)"},
                "showlegend": false,
            }),
        ),
    );

    let fig_k = Figure::new(
        vec![
            json!({"x": [0, 1], "y": [0, 0], "mode": "lines", "name": "K (keV)",
                   "line": {"color": "#a6e22e", "width": 2}}),
            json!({"x": [0, 1], "y": [0, 0], "mode": "lines", "name": "phase (π)",
                   "line": {"color": "#ff6b6b", "width": 1.5}, "yaxis": "y2"}),
        ],
        merge_layout(
            base_layout("Energy growth and phase (resonance vs detuning)"),
            json!({
                "xaxis": {"title": "half-turn n"},
                "yaxis": {"title": "K (keV)"},
                "yaxis2": {"title": "phase/π", "overlaying": "y", "side": "right", "showgrid": false},
                "legend": {"orientation": "h", "yanchor": "bottom", "y": 1.02, "xanchor": "left", "x": 0},
            }),
        ),
    );

    let pitfalls_html = "<ul>\n\
        <li>\"Higher RF frequency is always better\": no, it must match the \
        cyclotron frequency; detuning makes the acceleration phase drift and can \
        even decelerate the particle.</li>\n\
        <li>\"B only sets the radius\": B also sets the resonance via \
        <code>ω_c=|q|B/m</code>.</li>\n\
        <li>\"Relativity never matters\": at high energy γ grows, the frequency \
        drops and a classical cyclotron falls out of resonance.</li>\n</ul>"
        .to_string();

    let questions_html = "<details open>\n<summary>Guiding questions</summary>\n<ol>\n\
        <li><b>Predict</b>: increase B; how does the theoretical f_c change, and the \
        radius at fixed energy?</li>\n\
        <li><b>Verify</b>: set f_rf slightly above and below f_c; what happens to the \
        energy curve? Does the phase drift?</li>\n\
        <li><b>Extend</b>: with the relativistic switch on, why is detuning easier \
        at higher energy?</li>\n</ol>\n</details>"
        .to_string();

    ModuleBundle {
        id: MODULE_ID,
        title: "Cyclotron (resonance and detuning)".to_string(),
        intro_html,
        controls_html,
        figures: vec![fig_traj, fig_k],
        data_payload: json!({
            "defaults": {"particle": "p", "B": 0.10, "Vgap": 200, "frf": 1.52, "rel": "off"},
            "consts": {"e": E_CHARGE, "mp": M_P, "c": C_LIGHT},
        }),
        js: bind_js(JS, MODULE_ID),
        pitfalls_html,
        questions_html,
    }
}
