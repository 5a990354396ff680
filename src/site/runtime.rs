//! Shared client-side runtime.
//!
//! Every module script leans on these helpers: payload access, numeric
//! formatting, slider value binding, grid interpolation and the readouts
//! strip. The nav/init wiring lives in [`boot_js`], appended after the
//! module scripts so `init_<id>` functions are defined before dispatch.

/// Helper functions shipped once per page, ahead of the module scripts.
pub const RUNTIME_JS: &str = r##"
// ------- Common helpers -------
function flGetJSON(id){
  const el = document.getElementById(id);
  if(!el) return {};
  return JSON.parse(el.textContent);
}
function flNum(x){ return (typeof x === "number") ? x : parseFloat(x); }
function flFmt(x, digits){
  const d = (digits === undefined) ? 3 : digits;
  if(!isFinite(x)) return "—";
  const ax = Math.abs(x);
  if(ax >= 1000 || (ax > 0 && ax < 1e-3)) return x.toExponential(2);
  return x.toFixed(d);
}
function flBindValue(root, inputId, unit, digits){
  const input = root.querySelector("#"+inputId);
  const span = root.querySelector("#"+inputId+"-val");
  if(!input || !span) return;
  input.dataset.flBound = "1";
  input.dataset.flUnit = unit || "";
  input.dataset.flDigits = (digits === undefined) ? "" : String(digits);
  const update = () => { span.textContent = flFmt(flNum(input.value), digits) + (unit || ""); };
  input.addEventListener("input", update);
  update();
}
function flRefreshBoundValues(root){
  if(!root) return;
  const inputs = root.querySelectorAll('input[data-fl-bound="1"]');
  inputs.forEach(input => {
    if(!input.id) return;
    const span = root.querySelector("#"+input.id+"-val");
    if(!span) return;
    const unit = input.dataset.flUnit || "";
    const dr = input.dataset.flDigits;
    const digits = (dr === undefined || dr === "") ? undefined : parseFloat(dr);
    span.textContent = flFmt(flNum(input.value), digits) + unit;
  });
}
function flFindBracket(arr, x){
  // arr: increasing numeric list
  const n = arr.length;
  if(n < 2) return {i0:0, i1:0, t:0};
  if(x <= arr[0]) return {i0:0, i1:1, t:0};
  if(x >= arr[n-1]) return {i0:n-2, i1:n-1, t:1};
  let lo = 0, hi = n-1;
  while(hi - lo > 1){
    const mid = (lo + hi) >> 1;
    if(arr[mid] <= x) lo = mid; else hi = mid;
  }
  const a = arr[lo], b = arr[hi];
  const t = (x - a) / (b - a);
  return {i0: lo, i1: hi, t: t};
}
function flBilinearInterp4(a00, a01, a10, a11, tx, ty){
  const a0 = a00*(1-ty) + a01*ty;
  const a1 = a10*(1-ty) + a11*ty;
  return a0*(1-tx) + a1*tx;
}
function flBilinearSeries(grid, xs, ys, x, y){
  // grid: [nx][ny][n] numeric arrays
  const bx = flFindBracket(xs, x);
  const by = flFindBracket(ys, y);
  const g00 = grid[bx.i0][by.i0];
  const g01 = grid[bx.i0][by.i1];
  const g10 = grid[bx.i1][by.i0];
  const g11 = grid[bx.i1][by.i1];
  const n = g00.length;
  const out = new Array(n);
  for(let k=0;k<n;k++){
    out[k] = flBilinearInterp4(g00[k], g01[k], g10[k], g11[k], bx.t, by.t);
  }
  return out;
}
function flMakeReadouts(rootEl, items){
  // items: [{key, id, value}]
  rootEl.innerHTML = items.map(it => (
    '<div class="readout"><div class="k">'+it.key+'</div><div class="v" id="'+it.id+'">'+it.value+'</div></div>'
  )).join('');
}
function flResizeActive(){
  const active = document.querySelector("section.module.active");
  if(!active) return;
  const divs = active.querySelectorAll(".js-plotly-plot");
  divs.forEach(d => { try{ Plotly.Plots.resize(d); }catch(e){} });
}
"##;

/// Navigation, snapshot export and `init_<id>()` dispatch. `module_ids_json`
/// is a JSON array literal of the module ids in nav order.
#[must_use]
pub fn boot_js(module_ids_json: &str) -> String {
    format!(
        r##"
// ------- Navigation + init -------
const flModules = {module_ids_json};
function flShow(moduleId){{
  flModules.forEach(id => {{
    const sec = document.getElementById("section-"+id);
    const btn = document.getElementById("nav-"+id);
    if(sec) sec.classList.toggle("active", id === moduleId);
    if(btn) btn.classList.toggle("active", id === moduleId);
  }});
  setTimeout(flResizeActive, 80);
}}
document.addEventListener("DOMContentLoaded", () => {{
  flModules.forEach(id => {{
    const btn = document.getElementById("nav-"+id);
    if(btn){{
      btn.addEventListener("click", () => flShow(id));
    }}
  }});
  // snapshot buttons export the first figure of the section
  flModules.forEach(id => {{
    const btn = document.getElementById("snap-"+id);
    if(!btn) return;
    btn.addEventListener("click", () => {{
      const fig = document.getElementById("fig-"+id+"-0");
      if(!fig || typeof Plotly === "undefined") return;
      const ts = new Date().toISOString().slice(0,19).replace(/[:T]/g,"-");
      Plotly.downloadImage(fig, {{format:"png", filename:"fieldlab_"+id+"_"+ts, width: 1100, height: 700}});
    }});
  }});
  flModules.forEach(id => {{
    const fn = window["init_"+id];
    if(typeof fn === "function") fn();
  }});
  if(flModules.length) flShow(flModules[0]);
  window.addEventListener("resize", () => setTimeout(flResizeActive, 100));
}});
"##
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_defines_all_helpers() {
        for name in [
            "flGetJSON",
            "flNum",
            "flFmt",
            "flBindValue",
            "flRefreshBoundValues",
            "flFindBracket",
            "flBilinearInterp4",
            "flBilinearSeries",
            "flMakeReadouts",
            "flResizeActive",
        ] {
            assert!(
                RUNTIME_JS.contains(&format!("function {name}(")),
                "missing {name}"
            );
        }
    }

    #[test]
    fn boot_embeds_module_ids() {
        let js = boot_js("[\"rlc_discharge\",\"hall_effect\"]");
        assert!(js.contains("const flModules = [\"rlc_discharge\",\"hall_effect\"];"));
        assert!(js.contains("window[\"init_\"+id]"));
        assert!(js.contains("flShow(flModules[0])"));
    }
}
