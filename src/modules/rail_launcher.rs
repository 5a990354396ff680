//! Idealized rail launcher module: RLC discharge + I² force + energy bars.
//!
//! The only module with a heavyweight precomputed payload. Normalized (V0=1)
//! discharge series are tabulated over an (R, C) grid for each discrete L
//! option at build time; the browser bilinearly interpolates over the grid
//! and rescales by the actual V0, so drags stay O(N) with no solver in JS.

use serde_json::json;

use crate::figure::{Figure, base_layout, merge_layout};
use crate::html::controls::{ButtonStyle, buttons, select, slider};
use crate::modules::{ModuleBundle, bind_js};
use crate::numeric::linspace;
use crate::physics::{G, SeriesRlc};

/// Stable module id.
pub const MODULE_ID: &str = "rail_launcher";

const T_MAX: f64 = 0.020;
const N_T: usize = 520;
const L_OPTS_UH: [u32; 3] = [10, 30, 60];
const R_GRID_N: usize = 12;
const C_GRID_N: usize = 12;

const JS: &str = r##"
function init___ID__(){
  const id = "__ID__";
  const root = document.getElementById("section-"+id);
  const data = flGetJSON("data-"+id);

  const els = {
    V0: root.querySelector("#__ID__-V0"),
    Rm: root.querySelector("#__ID__-R_mOhm"),
    Cm: root.querySelector("#__ID__-C_mF"),
    Lu: root.querySelector("#__ID__-L_uH"),
    Lp: root.querySelector("#__ID__-Lprime_uHpm"),
    m: root.querySelector("#__ID__-m"),
    mu: root.querySelector("#__ID__-mu"),
    len: root.querySelector("#__ID__-len"),
    reset: root.querySelector("#__ID__-reset"),
  };

  flBindValue(root, "__ID__-V0", " V", 0);
  flBindValue(root, "__ID__-R_mOhm", " mΩ", 1);
  flBindValue(root, "__ID__-C_mF", " mF", 2);
  flBindValue(root, "__ID__-Lprime_uHpm", " µH/m", 2);
  flBindValue(root, "__ID__-m", " kg", 2);
  flBindValue(root, "__ID__-mu", "", 2);
  flBindValue(root, "__ID__-len", " m", 2);

  const figI = document.getElementById("fig-__ID__-0");
  const figXV = document.getElementById("fig-__ID__-1");
  const figE = document.getElementById("fig-__ID__-2");

  const readouts = root.querySelector("#readouts-"+id);
  flMakeReadouts(readouts, [
    {key:"peak current I_peak", id:"__ID__-ro-Ipk", value:"—"},
    {key:"exit speed v_exit", id:"__ID__-ro-v", value:"—"},
    {key:"energy split (end)", id:"__ID__-ro-eff", value:"—"},
  ]);

  const g = data.consts.g;

  function pickLIndex(LuH){
    const Ls = data.L_opts_uH || [];
    const idx = Ls.indexOf(parseInt(LuH,10));
    return Math.max(0, idx);
  }

  function scale1d(arr, s){
    const out = new Array(arr.length);
    for(let i=0;i<arr.length;i++) out[i] = arr[i]*s;
    return out;
  }

  function update(){
    const V0 = flNum(els.V0.value);
    const R = 1e-3 * flNum(els.Rm.value);
    const C = 1e-3 * flNum(els.Cm.value);
    const L_uH = els.Lu.value;
    const Lidx = pickLIndex(L_uH);
    const L = (parseInt(L_uH,10))*1e-6;
    const Lp = 1e-6 * flNum(els.Lp.value); // H/m
    const m = Math.max(1e-6, flNum(els.m.value));
    const mu = Math.max(0, flNum(els.mu.value));
    const xMax = Math.max(0.05, flNum(els.len.value));

    // interpolate the normalized series from the grid (R, C are continuous)
    const wave = (data.wave && data.wave[Lidx]) ? data.wave[Lidx] : null;
    const Rg = data.R_grid || [];
    const Cg = data.C_grid || [];
    if(!wave) return;

    const In = flBilinearSeries(wave.I, Rg, Cg, R, C);
    const Qn = flBilinearSeries(wave.Q, Rg, Cg, R, C);
    const J1n = flBilinearSeries(wave.J1, Rg, Cg, R, C);

    const t = data.t || [];
    const N = t.length;
    if(N < 2) return;
    const dt = t[1]-t[0];

    // rescale to the actual V0 (linear system)
    const I = scale1d(In, V0);
    const Q = scale1d(Qn, V0);

    const Vc = new Array(N);
    for(let i=0;i<N;i++){
      Vc[i] = V0 - Q[i]/Math.max(1e-12, C);
    }

    // kinematics from the I^2 integrals (with a simple friction clamp)
    const v = new Array(N);
    const x = new Array(N);
    v[0]=0; x[0]=0;
    const aFac = 0.5*Lp/m;
    for(let i=1;i<N;i++){
      const vraw = aFac*(V0*V0*J1n[i]) - mu*g*t[i];
      v[i] = Math.max(0, vraw);
      x[i] = x[i-1] + 0.5*(v[i-1]+v[i])*dt;
      if(x[i] >= xMax){
        x[i] = xMax;
        // freeze after exit
        for(let k=i+1;k<N;k++){ x[k]=xMax; v[k]=v[i]; }
        break;
      }
    }

    const E0 = 0.5*C*V0*V0;
    const Ec = new Array(N);
    const El = new Array(N);
    const Er = new Array(N);
    const Ek = new Array(N);
    const Ef = new Array(N);
    for(let i=0;i<N;i++){
      Ec[i] = 0.5*C*Vc[i]*Vc[i];
      El[i] = 0.5*L*I[i]*I[i];
      Er[i] = R*(V0*V0*J1n[i]);
      Ek[i] = 0.5*m*v[i]*v[i];
      Ef[i] = mu*m*g*x[i];
    }

    const tms = t.map(tt => 1000*tt);
    Plotly.restyle(figI, {
      x:[tms, tms],
      y:[I.map(ii=>ii/1000.0), Vc.map(vv=>vv/1000.0)]
    }, [0,1]);

    Plotly.restyle(figXV, {
      x:[tms, tms],
      y:[x, v]
    }, [0,1]);

    Plotly.restyle(figE, {
      x:[tms,tms,tms,tms,tms],
      y:[Ec, El, Er, Ek, Ef]
    }, [0,1,2,3,4]);

    const Ipk = Math.max(...I.map(vv=>Math.abs(vv)));
    const vExit = v[v.length-1];
    const EkEnd = Ek[Ek.length-1];
    const ErEnd = Er[Er.length-1] + Ef[Ef.length-1];
    const fracK = (E0>1e-9) ? (EkEnd/E0) : 0;
    root.querySelector("#__ID__-ro-Ipk").textContent = flFmt(Ipk/1000.0, 2) + " kA";
    root.querySelector("#__ID__-ro-v").textContent = flFmt(vExit, 2) + " m/s";
    root.querySelector("#__ID__-ro-eff").textContent =
      "kinetic " + flFmt(100*fracK,1) + "%, loss/heat " + flFmt(100*ErEnd/Math.max(1e-9,E0),1) + "%";
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

/// Precomputed normalized waveforms for every (L, R, C) grid point.
fn wave_payload(t: &[f64], r_grid: &[f64], c_grid: &[f64]) -> Vec<serde_json::Value> {
    L_OPTS_UH
        .iter()
        .map(|&l_uh| {
            let l = f64::from(l_uh) * 1e-6;
            let mut i_grid = Vec::with_capacity(r_grid.len());
            let mut q_grid = Vec::with_capacity(r_grid.len());
            let mut j1_grid = Vec::with_capacity(r_grid.len());
            let mut j2_grid = Vec::with_capacity(r_grid.len());
            for &r in r_grid {
                let mut i_row = Vec::with_capacity(c_grid.len());
                let mut q_row = Vec::with_capacity(c_grid.len());
                let mut j1_row = Vec::with_capacity(c_grid.len());
                let mut j2_row = Vec::with_capacity(c_grid.len());
                for &c in c_grid {
                    let rlc = SeriesRlc { r, l, c };
                    let (i, q, j1, j2) = rlc.normalized_discharge(t);
                    i_row.push(i);
                    q_row.push(q);
                    j1_row.push(j1);
                    j2_row.push(j2);
                }
                i_grid.push(i_row);
                q_grid.push(q_row);
                j1_grid.push(j1_row);
                j2_grid.push(j2_row);
            }
            json!({"I": i_grid, "Q": q_grid, "J1": j1_grid, "J2": j2_grid})
        })
        .collect()
}

/// Build the rail launcher bundle.
#[must_use]
pub fn build() -> ModuleBundle {
    let intro_html = "<p style=\"border-left:3px solid rgba(255,107,107,0.55);padding-left:10px\">\n\
        <b>Scope note:</b> this module is an <b>idealized circuit and mechanics \
        simulation</b> for classroom discussion (RLC discharge waveform, energy \
        bookkeeping, I² force approximation). It contains no construction, \
        material or assembly guidance.\n</p>\n<p>\n\
        Idealized model: the capacitor starts with <code>E0=½CV0²</code>; the \
        discharge current follows the series RLC; the force uses the common \
        energy-method approximation <code>F ≈ ½·L'·I²</code> with the inductance \
        gradient L' taken as a given constant. Integrating gives speed and \
        position, and an energy-bar chart tracks \"capacitor energy → kinetic / \
        heat / residual\".\n</p>"
        .to_string();

    let t = linspace(0.0, T_MAX, N_T);
    let r_grid = linspace(2e-3, 30e-3, R_GRID_N);
    let c_grid = linspace(0.5e-3, 5.0e-3, C_GRID_N);
    let wave = wave_payload(&t, &r_grid, &c_grid);

    let controls_html = [
        slider(
            &format!("{MODULE_ID}-V0"),
            "Initial voltage V0 (V)",
            500.0,
            5000.0,
            50.0,
            2000.0,
            "",
        ),
        slider(
            &format!("{MODULE_ID}-R_mOhm"),
            "Loop resistance R (mΩ)",
            2.0,
            30.0,
            0.5,
            8.0,
            "Larger R lowers the peak current; more energy becomes Joule heat and \
             less becomes kinetic energy (qualitatively).",
        ),
        slider(
            &format!("{MODULE_ID}-C_mF"),
            "Capacitance C (mF)",
            0.5,
            5.0,
            0.05,
            2.0,
            "",
        ),
        select(
            &format!("{MODULE_ID}-L_uH"),
            "Inductance L (µH)",
            &[("10", "10"), ("30", "30"), ("60", "60")],
            "30",
            "L is a discrete option so the precomputed grid keeps the offline \
             interaction fast.",
        ),
        slider(
            &format!("{MODULE_ID}-Lprime_uHpm"),
            "Inductance gradient L' (µH/m)",
            0.2,
            5.0,
            0.05,
            1.2,
            "L' is a given parameter with no structural discussion; F≈½·L'·I².",
        ),
        slider(
            &format!("{MODULE_ID}-m"),
            "Mass m (kg)",
            0.02,
            0.50,
            0.01,
            0.10,
            "",
        ),
        slider(
            &format!("{MODULE_ID}-mu"),
            "Friction coefficient μ (optional)",
            0.0,
            0.30,
            0.01,
            0.05,
            "",
        ),
        slider(
            &format!("{MODULE_ID}-len"),
            "Rail length (m)",
            0.2,
            2.0,
            0.05,
            0.8,
            "",
        ),
        buttons(&[(
            &format!("{MODULE_ID}-reset"),
            "Reset parameters",
            ButtonStyle::Primary,
        )]),
    ]
    .join("\n");

    let fig_i = Figure::new(
        vec![
            json!({"x": [0, 1], "y": [0, 0], "mode": "lines", "name": "I(t)",
                   "line": {"color": "#66d9ef", "width": 2}}),
            json!({"x": [0, 1], "y": [0, 0], "mode": "lines", "name": "V_C(t)",
                   "line": {"color": "#a6e22e", "width": 2}, "yaxis": "y2"}),
        ],
        merge_layout(
            base_layout("RLC discharge: current I(t) and capacitor voltage Vc(t)"),
            json!({
                "xaxis": {"title": "t (ms)"},
                "yaxis": {"title": "I (kA)"},
                "yaxis2": {"title": "Vc (kV)", "overlaying": "y", "side": "right", "showgrid": false},
                "legend": {"orientation": "h", "yanchor": "bottom", "y": 1.02, "xanchor": "left", "x": 0},
            }),
        ),
    );

    let fig_xv = Figure::new(
        vec![
            json!({"x": [0, 1], "y": [0, 0], "mode": "lines", "name": "x(t)",
                   "line": {"color": "#66d9ef", "width": 2}}),
            json!({"x": [0, 1], "y": [0, 0], "mode": "lines", "name": "v(t)",
                   "line": {"color": "#a6e22e", "width": 2}, "yaxis": "y2"}),
        ],
        merge_layout(
            base_layout("Kinematics: position x(t) and speed v(t) (idealized)"),
            json!({
                "xaxis": {"title": "t (ms)"},
                "yaxis": {"title": "x (m)"},
                "yaxis2": {"title": "v (m/s)", "overlaying": "y", "side": "right", "showgrid": false},
                "legend": {"orientation": "h", "yanchor": "bottom", "y": 1.02, "xanchor": "left", "x": 0},
            }),
        ),
    );

    let fig_e = Figure::new(
        vec![
            json!({"x": [0, 1], "y": [0, 0], "mode": "lines", "name": "E_C", "stackgroup": "one",
                   "line": {"width": 0.5}, "fillcolor": "rgba(102,217,239,0.35)"}),
            json!({"x": [0, 1], "y": [0, 0], "mode": "lines", "name": "E_L", "stackgroup": "one",
                   "line": {"width": 0.5}, "fillcolor": "rgba(166,226,46,0.35)"}),
            json!({"x": [0, 1], "y": [0, 0], "mode": "lines", "name": "E_R (heat)", "stackgroup": "one",
                   "line": {"width": 0.5}, "fillcolor": "rgba(255,107,107,0.35)"}),
            json!({"x": [0, 1], "y": [0, 0], "mode": "lines", "name": "E_K (kinetic)", "stackgroup": "one",
                   "line": {"width": 0.5}, "fillcolor": "rgba(255,255,255,0.25)"}),
            json!({"x": [0, 1], "y": [0, 0], "mode": "lines", "name": "friction loss", "stackgroup": "one",
                   "line": {"width": 0.5}, "fillcolor": "rgba(255,255,255,0.12)"}),
        ],
        merge_layout(
            base_layout("Energy bars (cumulative over time, idealized)"),
            json!({
                "xaxis": {"title": "t (ms)"},
                "yaxis": {"title": "energy (J)"},
                "legend": {"orientation": "h", "yanchor": "bottom", "y": 1.02, "xanchor": "left", "x": 0},
            }),
        ),
    );

    let pitfalls_html = "<ul>\n\
        <li>\"Bigger peak current always means a bigger exit speed\": no, the exit \
        speed depends on the <b>energy conversion</b> shaped by the waveform, R \
        losses and friction.</li>\n\
        <li>\"The electromagnetic force creates energy\": it does not; the energy \
        comes from the capacitor's initial <code>½CV0²</code> and is divided \
        between the circuit and the motion.</li>\n\
        <li>\"Just raise V0 without limit\": in the ideal model v grows quickly \
        with V0², but real systems hit breakdown, heating and structural limits \
        (not covered here).</li>\n</ul>"
        .to_string();

    let questions_html = "<details open>\n<summary>Guiding questions</summary>\n<ol>\n\
        <li><b>Predict</b>: double V0; how does the peak of I(t) change? Do x(t) and \
        v(t) scale more like ×2 or ×4?</li>\n\
        <li><b>Verify</b>: fix C and L, vary R up and down, and compare the heat vs \
        kinetic shares in the energy bars.</li>\n\
        <li><b>Explain</b>: why does I(t) rise then decay (or even oscillate)? Use the \
        RLC energy exchange.</li>\n\
        <li><b>Extend</b>: with a finite rail length, why does a larger peak current \
        not necessarily yield a larger exit speed?</li>\n</ol>\n</details>"
        .to_string();

    ModuleBundle {
        id: MODULE_ID,
        title: "Idealized rail launcher (RLC discharge + I² force)".to_string(),
        intro_html,
        controls_html,
        figures: vec![fig_i, fig_xv, fig_e],
        data_payload: json!({
            "t": t,
            "t_max": T_MAX,
            "R_grid": r_grid,
            "C_grid": c_grid,
            "L_opts_uH": L_OPTS_UH,
            "wave": wave,
            "consts": {"g": G},
            "defaults": {
                "V0": 2000,
                "R_mOhm": 8,
                "C_mF": 2.0,
                "L_uH": "30",
                "Lprime_uHpm": 1.2,
                "m": 0.10,
                "mu": 0.05,
                "len": 0.8,
            },
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
        assert_eq!(b.id, "rail_launcher");
        assert_eq!(b.figures.len(), 3);
        assert!(b.js.contains("flBilinearSeries"));
        assert!(b.controls_html.contains("rail_launcher-L_uH"));
    }

    #[test]
    fn payload_grid_dimensions() {
        let b = build();
        let d = &b.data_payload;
        assert_eq!(d["t"].as_array().unwrap().len(), N_T);
        assert_eq!(d["R_grid"].as_array().unwrap().len(), R_GRID_N);
        assert_eq!(d["C_grid"].as_array().unwrap().len(), C_GRID_N);
        let wave = d["wave"].as_array().unwrap();
        assert_eq!(wave.len(), L_OPTS_UH.len());
        for w in wave {
            let i_grid = w["I"].as_array().unwrap();
            assert_eq!(i_grid.len(), R_GRID_N);
            assert_eq!(i_grid[0].as_array().unwrap().len(), C_GRID_N);
            assert_eq!(i_grid[0][0].as_array().unwrap().len(), N_T);
        }
    }

    #[test]
    fn payload_is_finite() {
        let b = build();
        fn walk(v: &serde_json::Value) {
            match v {
                serde_json::Value::Number(n) => {
                    assert!(n.as_f64().is_some_and(f64::is_finite));
                }
                serde_json::Value::Array(a) => a.iter().for_each(walk),
                serde_json::Value::Object(o) => o.values().for_each(walk),
                _ => {}
            }
        }
        walk(&b.data_payload["wave"]);
    }
}
