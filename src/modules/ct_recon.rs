//! CT reconstruction module: projections, sinogram, BP and FBP.
//!
//! All reconstructions are precomputed here over the discrete (angle count,
//! noise level) options so the page works offline with no solver in the
//! browser. The Radon transform and backprojection both ride on a bilinear
//! image rotation; the ramp filter uses the closed-form spatial kernel
//! instead of an FFT.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;

use crate::figure::{Figure, base_layout, merge_layout};
use crate::html::controls::{ButtonStyle, buttons, select, slider};
use crate::modules::{ModuleBundle, bind_js};
use crate::physics::deg_to_rad;

/// Stable module id.
pub const MODULE_ID: &str = "ct_recon";

const SIZE: usize = 64;
const ANGLES_OPTS: [usize; 4] = [30, 60, 90, 180];
const SIGMA_OPTS: [f64; 4] = [0.0, 0.02, 0.05, 0.10];
const NOISE_SEED: u64 = 123;

type Image = Vec<Vec<f64>>;

/// Shepp-Logan-style phantom: a few overlapping ellipses, clipped to [0, 1].
fn make_phantom(n: usize) -> Image {
    let mut img = vec![vec![0.0; n]; n];
    let ellipses: [(f64, f64, f64, f64, f64, f64); 5] = [
        (0.0, 0.0, 0.85, 0.65, 0.0, 0.9),
        (-0.25, 0.10, 0.25, 0.12, 20.0, 0.25),
        (0.25, 0.18, 0.20, 0.10, -35.0, 0.22),
        (0.18, -0.25, 0.18, 0.14, 10.0, 0.18),
        (-0.15, -0.28, 0.18, 0.10, -10.0, 0.15),
    ];
    #[allow(clippy::cast_precision_loss)]
    let scale = 2.0 / (n - 1) as f64;
    for (row, img_row) in img.iter_mut().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let y = -1.0 + row as f64 * scale;
        for (col, px) in img_row.iter_mut().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let x = -1.0 + col as f64 * scale;
            for &(x0, y0, a, b, angle_deg, value) in &ellipses {
                let ang = deg_to_rad(angle_deg);
                let xr = (x - x0) * ang.cos() + (y - y0) * ang.sin();
                let yr = -(x - x0) * ang.sin() + (y - y0) * ang.cos();
                if (xr / a).powi(2) + (yr / b).powi(2) <= 1.0 {
                    *px += value;
                }
            }
            *px = px.clamp(0.0, 1.0);
        }
    }
    img
}

/// Rotate an image about its center by `angle_deg` (counterclockwise),
/// sampling bilinearly; out-of-frame samples read as zero.
fn rotate_bilinear(img: &Image, angle_deg: f64) -> Image {
    let n = img.len();
    #[allow(clippy::cast_precision_loss)]
    let center = (n - 1) as f64 / 2.0;
    let ang = deg_to_rad(angle_deg);
    let (sin, cos) = ang.sin_cos();

    let sample = |r: f64, c: f64| -> f64 {
        if r < 0.0 || c < 0.0 {
            return 0.0;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let r0 = r.floor() as usize;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let c0 = c.floor() as usize;
        if r0 + 1 >= n || c0 + 1 >= n {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let tr = r - r0 as f64;
        #[allow(clippy::cast_precision_loss)]
        let tc = c - c0 as f64;
        let top = img[r0][c0] * (1.0 - tc) + img[r0][c0 + 1] * tc;
        let bot = img[r0 + 1][c0] * (1.0 - tc) + img[r0 + 1][c0 + 1] * tc;
        top * (1.0 - tr) + bot * tr
    };

    let mut out = vec![vec![0.0; n]; n];
    for (row, out_row) in out.iter_mut().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let dy = row as f64 - center;
        for (col, px) in out_row.iter_mut().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let dx = col as f64 - center;
            // inverse map: rotate the output coordinate back into the input
            let src_c = center + dx * cos - dy * sin;
            let src_r = center + dx * sin + dy * cos;
            *px = sample(src_r, src_c);
        }
    }
    out
}

/// Parallel-beam Radon transform: rotate, then sum columns.
/// Returns `sino[detector][angle]`.
fn radon(img: &Image, angles_deg: &[f64]) -> Image {
    let n = img.len();
    let mut sino = vec![vec![0.0; angles_deg.len()]; n];
    for (a, &ang) in angles_deg.iter().enumerate() {
        let rot = rotate_bilinear(img, ang);
        for det in 0..n {
            let mut sum = 0.0;
            for row in &rot {
                sum += row[det];
            }
            sino[det][a] = sum;
        }
    }
    sino
}

/// Apply the ramp filter along the detector axis using the closed-form
/// spatial kernel: h(0)=1/4, h(k)=0 for even k, h(k)=-1/(πk)² for odd k.
fn ramp_filter(sino: &Image) -> Image {
    let n = sino.len();
    let n_angles = sino[0].len();

    let mut kernel = vec![0.0; n];
    kernel[0] = 0.25;
    for (k, h) in kernel.iter_mut().enumerate().skip(1).step_by(2) {
        #[allow(clippy::cast_precision_loss)]
        let fk = k as f64;
        *h = -1.0 / (std::f64::consts::PI * fk).powi(2);
    }

    let mut out = vec![vec![0.0; n_angles]; n];
    for a in 0..n_angles {
        for d in 0..n {
            let mut acc = 0.0;
            for (k, row) in sino.iter().enumerate() {
                let lag = d.abs_diff(k);
                acc += kernel[lag] * row[a];
            }
            out[d][a] = acc;
        }
    }
    out
}

/// Backprojection: smear each projection across the image, rotate it into
/// place and accumulate. `filtered` selects FBP over plain BP.
fn iradon(sino: &Image, angles_deg: &[f64], filtered: bool) -> Image {
    let n = sino.len();
    let proj = if filtered {
        ramp_filter(sino)
    } else {
        sino.clone()
    };

    let mut recon = vec![vec![0.0; n]; n];
    for (a, &ang) in angles_deg.iter().enumerate() {
        let smear: Image = (0..n)
            .map(|_| (0..n).map(|det| proj[det][a]).collect())
            .collect();
        let back = rotate_bilinear(&smear, -ang);
        for (rec_row, back_row) in recon.iter_mut().zip(&back) {
            for (px, &b) in rec_row.iter_mut().zip(back_row) {
                *px += b;
            }
        }
    }

    #[allow(clippy::cast_precision_loss)]
    let scale = std::f64::consts::PI / (2.0 * angles_deg.len() as f64);
    for row in &mut recon {
        for px in row {
            *px = (*px * scale).max(0.0);
        }
    }
    recon
}

/// Evenly spaced projection angles over [0, 180), endpoint excluded.
fn projection_angles(count: usize) -> Vec<f64> {
    #[allow(clippy::cast_precision_loss)]
    (0..count).map(|i| 180.0 * i as f64 / count as f64).collect()
}

/// Standard-normal sample via Box-Muller.
fn gaussian(rng: &mut StdRng) -> f64 {
    let u1: f64 = rng.gen_range(f64::MIN_POSITIVE..1.0);
    let u2: f64 = rng.r#gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

struct ReconTables {
    sinograms: Vec<Vec<Image>>,
    recon_bp: Vec<Vec<Image>>,
    recon_fbp: Vec<Vec<Image>>,
}

fn precompute(phantom: &Image) -> ReconTables {
    let mut rng = StdRng::seed_from_u64(NOISE_SEED);
    let mut sinograms = Vec::with_capacity(ANGLES_OPTS.len());
    let mut recon_bp = Vec::with_capacity(ANGLES_OPTS.len());
    let mut recon_fbp = Vec::with_capacity(ANGLES_OPTS.len());

    for &na in &ANGLES_OPTS {
        let angles = projection_angles(na);
        let clean = radon(phantom, &angles);
        let maxv = clean
            .iter()
            .flatten()
            .copied()
            .fold(0.0_f64, f64::max)
            .max(1e-12);

        let mut sino_for_na = Vec::with_capacity(SIGMA_OPTS.len());
        let mut bp_for_na = Vec::with_capacity(SIGMA_OPTS.len());
        let mut fbp_for_na = Vec::with_capacity(SIGMA_OPTS.len());
        for &sig in &SIGMA_OPTS {
            let sino: Image = clean
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|&v| v + sig * maxv * gaussian(&mut rng))
                        .collect()
                })
                .collect();
            bp_for_na.push(iradon(&sino, &angles, false));
            fbp_for_na.push(iradon(&sino, &angles, true));
            sino_for_na.push(sino);
        }
        sinograms.push(sino_for_na);
        recon_bp.push(bp_for_na);
        recon_fbp.push(fbp_for_na);
    }
    ReconTables {
        sinograms,
        recon_bp,
        recon_fbp,
    }
}

const JS: &str = r##"
function init___ID__(){
  const id = "__ID__";
  const root = document.getElementById("section-"+id);
  const data = flGetJSON("data-"+id);
  const els = {
    N: root.querySelector("#__ID__-N"),
    sigma: root.querySelector("#__ID__-sigma"),
    kVp: root.querySelector("#__ID__-kVp"),
    py: root.querySelector("#__ID__-py"),
    diff: root.querySelector("#__ID__-diff"),
    reset: root.querySelector("#__ID__-reset"),
  };

  flBindValue(root, "__ID__-kVp", " kVp", 0);
  flBindValue(root, "__ID__-py", "", 0);

  const figP = document.getElementById("fig-__ID__-0");
  const figS = document.getElementById("fig-__ID__-1");
  const figBP = document.getElementById("fig-__ID__-2");
  const figFBP = document.getElementById("fig-__ID__-3");
  const figD = document.getElementById("fig-__ID__-4");
  const figProf = document.getElementById("fig-__ID__-5");

  const readouts = root.querySelector("#readouts-"+id);
  flMakeReadouts(readouts, [
    {key:"N_angles", id:"__ID__-ro-N", value:"—"},
    {key:"σ", id:"__ID__-ro-s", value:"—"},
    {key:"kVp mapping", id:"__ID__-ro-k", value:"—"},
    {key:"quality: NRMSE(BP)", id:"__ID__-ro-bp", value:"—"},
    {key:"quality: NRMSE(FBP)", id:"__ID__-ro-fbp", value:"—"},
    {key:"profile row y", id:"__ID__-ro-y", value:"—"},
  ]);

  function scale2d(z, s){
    const out = new Array(z.length);
    for(let i=0;i<z.length;i++){
      const row = z[i];
      const r2 = new Array(row.length);
      for(let j=0;j<row.length;j++) r2[j] = row[j]*s;
      out[i]=r2;
    }
    return out;
  }

  function diff2d(a, b, mode){
    const out = new Array(a.length);
    for(let i=0;i<a.length;i++){
      const ra = a[i], rb = b[i];
      const r2 = new Array(ra.length);
      for(let j=0;j<ra.length;j++) {
        const d = (rb[j]-ra[j]);
        r2[j] = (mode === "abs") ? Math.abs(d) : d;
      }
      out[i]=r2;
    }
    return out;
  }

  function nrmse(ref, img){
    let s = 0, sr = 0, n = 0;
    for(let i=0;i<ref.length;i++){
      const rr = ref[i], ii = img[i];
      for(let j=0;j<rr.length;j++) {
        const d = (ii[j]-rr[j]);
        s += d*d;
        sr += rr[j]*rr[j];
        n += 1;
      }
    }
    const rmse = Math.sqrt(s/Math.max(1,n));
    const r0 = Math.sqrt(sr/Math.max(1,n));
    return rmse / Math.max(1e-12, r0);
  }

  function update(){
    const N = parseInt(els.N.value, 10);
    const sigma = parseFloat(els.sigma.value);
    const kVp = flNum(els.kVp.value);
    const py = Math.max(0, Math.min((data.size||64)-1, Math.round(flNum(els.py.value))));
    const diffMode = els.diff.value;

    const aIdx = (data.angles_opts || []).indexOf(N);
    const sIdx = (data.sigma_opts || []).findIndex(v => Math.abs(v - sigma) < 1e-9);
    const ref = flNum(data.kVp_ref || 80);
    let scale = ref / Math.max(1e-6, kVp);
    scale = Math.max(0.4, Math.min(1.6, Math.pow(scale, 0.8)));

    const phantom = data.phantom || [];
    const sino = (data.sinograms && data.sinograms[aIdx] && data.sinograms[aIdx][sIdx]) ? data.sinograms[aIdx][sIdx] : [];
    const bp = (data.recon_bp && data.recon_bp[aIdx] && data.recon_bp[aIdx][sIdx]) ? data.recon_bp[aIdx][sIdx] : [];
    const fbp = (data.recon_fbp && data.recon_fbp[aIdx] && data.recon_fbp[aIdx][sIdx]) ? data.recon_fbp[aIdx][sIdx] : [];
    const dimg = diff2d(bp, fbp, diffMode);

    Plotly.restyle(figP, {z:[scale2d(phantom, scale)]}, [0]);
    Plotly.restyle(figS, {z:[scale2d(sino, scale)]}, [0]);
    Plotly.restyle(figBP, {z:[scale2d(bp, scale)]}, [0]);
    Plotly.restyle(figFBP, {z:[scale2d(fbp, scale)]}, [0]);
    if(diffMode === "abs"){
      Plotly.restyle(figD, {z:[scale2d(dimg, scale)], colorscale:["Viridis"], zmid:[null]}, [0]);
    } else {
      Plotly.restyle(figD, {z:[scale2d(dimg, scale)], colorscale:["RdBu"], zmid:[0]}, [0]);
    }

    // profile line at row py
    const npx = (data.size||64);
    const x = Array.from({length:npx}, (_,i)=>i);
    const pRow = phantom[py] || [];
    const bpRow = bp[py] || [];
    const fbpRow = fbp[py] || [];
    Plotly.restyle(figProf, {x:[x,x,x], y:[pRow.map(v=>v*scale), bpRow.map(v=>v*scale), fbpRow.map(v=>v*scale)]}, [0,1,2]);

    root.querySelector("#__ID__-ro-N").textContent = N.toString();
    root.querySelector("#__ID__-ro-s").textContent = sigma.toFixed(2);
    root.querySelector("#__ID__-ro-k").textContent = "μ×"+flFmt(scale, 3)+" (teaching approximation)";
    root.querySelector("#__ID__-ro-y").textContent = py.toString();
    if(phantom.length && bp.length) {
      root.querySelector("#__ID__-ro-bp").textContent = flFmt(nrmse(phantom, bp), 3);
      root.querySelector("#__ID__-ro-fbp").textContent = flFmt(nrmse(phantom, fbp), 3);
    }
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

/// Build the CT reconstruction bundle.
#[must_use]
pub fn build() -> ModuleBundle {
    let intro_html = "<p>\n\
        X-ray CT organizes line-integral <b>projections</b> from many angles \
        into a <b>sinogram</b>, then reconstructs the cross section \
        mathematically. Intuition: more angles bring the reconstruction closer \
        to the original; too few angles produce streak artifacts.\n</p>\n<p>\n\
        The page demonstrates the chain with a simplified model: phantom → \
        Radon projection → sinogram → backprojection / filtered backprojection \
        (FBP). The reconstructions are precomputed over the discrete options so \
        the interaction stays fast offline.\n</p>"
        .to_string();

    let phantom = make_phantom(SIZE);
    let tables = precompute(&phantom);

    // default selection shown before the script first runs: N=90, sigma=0.02
    let default_a = 2;
    let default_s = 1;
    let sino0 = &tables.sinograms[default_a][default_s];
    let bp0 = &tables.recon_bp[default_a][default_s];
    let fbp0 = &tables.recon_fbp[default_a][default_s];
    let diff0: Image = bp0
        .iter()
        .zip(fbp0)
        .map(|(b_row, f_row)| b_row.iter().zip(f_row).map(|(b, f)| f - b).collect())
        .collect();

    let angle_options: Vec<(String, String)> = ANGLES_OPTS
        .iter()
        .map(|v| (v.to_string(), v.to_string()))
        .collect();
    let angle_options_ref: Vec<(&str, &str)> = angle_options
        .iter()
        .map(|(a, b)| (a.as_str(), b.as_str()))
        .collect();
    let sigma_options: Vec<(String, String)> = SIGMA_OPTS
        .iter()
        .map(|v| (format!("{v:.2}"), format!("{v:.2}")))
        .collect();
    let sigma_options_ref: Vec<(&str, &str)> = sigma_options
        .iter()
        .map(|(a, b)| (a.as_str(), b.as_str()))
        .collect();

    #[allow(clippy::cast_precision_loss)]
    let py_max = (SIZE - 1) as f64;
    #[allow(clippy::cast_precision_loss)]
    let py_default = (SIZE / 2) as f64;

    let controls_html = [
        select(
            &format!("{MODULE_ID}-N"),
            "Projection angle count N_angles",
            &angle_options_ref,
            "90",
            "More angles reconstruct better, at higher acquisition and compute cost.",
        ),
        select(
            &format!("{MODULE_ID}-sigma"),
            "Noise level σ (relative)",
            &sigma_options_ref,
            "0.02",
            "Larger σ speckles the sinogram; reconstruction noise and artifacts grow.",
        ),
        slider(
            &format!("{MODULE_ID}-kVp"),
            "Tube voltage kVp (simplified attenuation mapping)",
            60.0,
            120.0,
            1.0,
            80.0,
            "Only a global attenuation rescale here: higher kVp, lower effective attenuation.",
        ),
        slider(
            &format!("{MODULE_ID}-py"),
            "Profile row y (pixel)",
            0.0,
            py_max,
            1.0,
            py_default,
            "Drives the profile plot: phantom, BP and FBP intensities along the same row.",
        ),
        select(
            &format!("{MODULE_ID}-diff"),
            "Difference display",
            &[("signed", "FBP - BP (signed)"), ("abs", "|FBP - BP|")],
            "signed",
            "",
        ),
        buttons(&[(
            &format!("{MODULE_ID}-reset"),
            "Reset parameters",
            ButtonStyle::Primary,
        )]),
    ]
    .join("\n");

    let hidden_axes = json!({
        "xaxis": {"showgrid": false, "zeroline": false, "visible": false},
        "yaxis": {"showgrid": false, "zeroline": false, "visible": false, "scaleanchor": "x"},
    });

    let fig_phantom = Figure::new(
        vec![json!({"type": "heatmap", "z": phantom, "colorscale": "Gray", "showscale": false})],
        merge_layout(
            base_layout("Phantom (simplified cross-section attenuation μ)"),
            merge_layout(
                json!({"margin": {"l": 30, "r": 10, "t": 40, "b": 30}}),
                hidden_axes.clone(),
            ),
        ),
    );

    let fig_sino = Figure::new(
        vec![json!({"type": "heatmap", "z": sino0, "colorscale": "Viridis",
                    "colorbar": {"title": "∫μds"}})],
        merge_layout(
            base_layout("Sinogram (projection data)"),
            json!({
                "margin": {"l": 50, "r": 10, "t": 40, "b": 45},
                "xaxis": {"title": "angle index"},
                "yaxis": {"title": "detector index"},
            }),
        ),
    );

    let fig_bp = Figure::new(
        vec![json!({"type": "heatmap", "z": bp0, "colorscale": "Gray", "showscale": false})],
        merge_layout(
            base_layout("Reconstruction: plain backprojection (BP)"),
            merge_layout(
                json!({"margin": {"l": 30, "r": 10, "t": 40, "b": 30}}),
                hidden_axes.clone(),
            ),
        ),
    );

    let fig_fbp = Figure::new(
        vec![json!({"type": "heatmap", "z": fbp0, "colorscale": "Gray", "showscale": false})],
        merge_layout(
            base_layout("Reconstruction: filtered backprojection (FBP)"),
            merge_layout(
                json!({"margin": {"l": 30, "r": 10, "t": 40, "b": 30}}),
                hidden_axes.clone(),
            ),
        ),
    );

    let fig_diff = Figure::new(
        vec![json!({"type": "heatmap", "z": diff0, "colorscale": "RdBu", "zmid": 0,
                    "colorbar": {"title": "Δ"}})],
        merge_layout(
            base_layout("Difference: FBP - BP (edges and artifacts)"),
            merge_layout(
                json!({"margin": {"l": 40, "r": 10, "t": 40, "b": 30}}),
                hidden_axes,
            ),
        ),
    );

    let x_idx: Vec<usize> = (0..SIZE).collect();
    let mid = SIZE / 2;
    let fig_prof = Figure::new(
        vec![
            json!({"x": x_idx, "y": phantom[mid], "mode": "lines", "name": "phantom",
                   "line": {"color": "#ffffff", "width": 2}}),
            json!({"x": x_idx, "y": bp0[mid], "mode": "lines", "name": "BP",
                   "line": {"color": "#66d9ef", "width": 2}}),
            json!({"x": x_idx, "y": fbp0[mid], "mode": "lines", "name": "FBP",
                   "line": {"color": "#a6e22e", "width": 2}}),
        ],
        merge_layout(
            base_layout("Profile comparison (intensity along one row y)"),
            json!({
                "xaxis": {"title": "pixel x"},
                "yaxis": {"title": "μ (relative)"},
                "legend": {"orientation": "h", "yanchor": "bottom", "y": 1.02, "xanchor": "left", "x": 0},
            }),
        ),
    );

    let pitfalls_html = "<ul>\n\
        <li>\"CT just stacks many photographs\": no, the core is <b>projection \
        data</b> plus <b>mathematical reconstruction</b> (the Radon transform \
        idea).</li>\n\
        <li>\"Enough angles removes all noise\": more angles reduce undersampling \
        artifacts, but noise still propagates through the reconstruction.</li>\n\
        <li>\"FBP is magic\": FBP simply filters the projections before \
        backprojecting, compensating BP's low-frequency excess.</li>\n</ul>"
        .to_string();

    let questions_html = "<details open>\n<summary>Guiding questions</summary>\n<ol>\n\
        <li><b>Predict</b>: moving N_angles from 30 to 180, does the sinogram get \
        denser or sparser? What happens to the reconstruction streaks?</li>\n\
        <li><b>Verify</b>: at fixed σ, compare BP and FBP. Which has sharper edges, \
        and why is the filter needed?</li>\n\
        <li><b>Explain</b>: in the language of line integrals, why does a single \
        point trace a sine-like curve across the sinogram?</li>\n\
        <li><b>Extend</b>: what else degrades real CT reconstructions? (Scatter, \
        beam hardening, motion, finite detectors…)</li>\n</ol>\n</details>"
        .to_string();

    ModuleBundle {
        id: MODULE_ID,
        title: "CT: projection → sinogram → reconstruction".to_string(),
        intro_html,
        controls_html,
        figures: vec![fig_phantom, fig_sino, fig_bp, fig_fbp, fig_diff, fig_prof],
        data_payload: json!({
            "size": SIZE,
            "angles_opts": ANGLES_OPTS,
            "sigma_opts": SIGMA_OPTS,
            "kVp_ref": 80,
            "phantom": phantom,
            "sinograms": tables.sinograms,
            "recon_bp": tables.recon_bp,
            "recon_fbp": tables.recon_fbp,
            "defaults": {"N": "90", "sigma": "0.02", "kVp": 80, "py": mid, "diff": "signed"},
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
    fn phantom_values_in_range() {
        let p = make_phantom(SIZE);
        assert_eq!(p.len(), SIZE);
        assert!(p.iter().flatten().all(|&v| (0.0..=1.0).contains(&v)));
        // the central ellipse covers the midpoint
        assert!(p[SIZE / 2][SIZE / 2] > 0.5);
        // corners lie outside every ellipse
        assert!(p[0][0].abs() < 1e-12);
    }

    #[test]
    fn rotation_identity_at_zero() {
        let p = make_phantom(16);
        let r = rotate_bilinear(&p, 0.0);
        for (a, b) in p.iter().flatten().zip(r.iter().flatten()) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn rotation_preserves_mass_roughly() {
        let p = make_phantom(32);
        let total: f64 = p.iter().flatten().sum();
        let rot = rotate_bilinear(&p, 30.0);
        let total_rot: f64 = rot.iter().flatten().sum();
        // interpolation and frame clipping lose a little
        assert!((total - total_rot).abs() / total < 0.15);
    }

    #[test]
    fn radon_projections_have_equal_mass() {
        let p = make_phantom(32);
        let angles = projection_angles(4);
        let sino = radon(&p, &angles);
        // every projection of the same image integrates to roughly the same value
        let sums: Vec<f64> = (0..angles.len())
            .map(|a| sino.iter().map(|row| row[a]).sum())
            .collect();
        for s in &sums {
            assert!((s - sums[0]).abs() / sums[0] < 0.2);
        }
    }

    #[test]
    fn ramp_kernel_zeroes_dc() {
        // the ramp kernel sums to ~0, so constant projections filter to ~0
        let n = 32;
        let sino = vec![vec![1.0; 3]; n];
        let f = ramp_filter(&sino);
        let center = &f[n / 2];
        assert!(center.iter().all(|&v| v.abs() < 0.05));
    }

    #[test]
    fn fbp_beats_bp_on_clean_data() {
        let p = make_phantom(32);
        let angles = projection_angles(60);
        let sino = radon(&p, &angles);
        let bp = iradon(&sino, &angles, false);
        let fbp = iradon(&sino, &angles, true);

        let nrmse = |img: &Image| -> f64 {
            let mut s = 0.0;
            let mut sr = 0.0;
            for (pr, ir) in p.iter().zip(img) {
                for (&pv, &iv) in pr.iter().zip(ir) {
                    s += (iv - pv) * (iv - pv);
                    sr += pv * pv;
                }
            }
            (s / sr).sqrt()
        };
        assert!(nrmse(&fbp) < nrmse(&bp));
    }

    #[test]
    fn noise_is_deterministic() {
        let mut a = StdRng::seed_from_u64(NOISE_SEED);
        let mut b = StdRng::seed_from_u64(NOISE_SEED);
        for _ in 0..100 {
            assert!((gaussian(&mut a) - gaussian(&mut b)).abs() < 1e-15);
        }
    }

    #[test]
    fn bundle_shape() {
        let b = build();
        assert_eq!(b.id, "ct_recon");
        assert_eq!(b.figures.len(), 6);
        let d = &b.data_payload;
        assert_eq!(d["sinograms"].as_array().unwrap().len(), ANGLES_OPTS.len());
        assert_eq!(
            d["recon_fbp"][0].as_array().unwrap().len(),
            SIGMA_OPTS.len()
        );
        assert!(b.js.contains("nrmse"));
    }
}
