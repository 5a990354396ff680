//! Module builders.
//!
//! Each teaching widget lives in its own file and exposes
//! `build() -> ModuleBundle`: everything the assembler needs to embed the
//! widget into the page. The registry below fixes the navigation order.

pub mod coupled_resonance;
pub mod ct_recon;
pub mod cyclotron;
pub mod hall_effect;
pub mod induction_heating;
pub mod rail_launcher;
pub mod rlc_discharge;

use serde_json::Value;

use crate::figure::Figure;

/// The assembled output of one module builder, ready for embedding.
#[derive(Debug, Clone)]
pub struct ModuleBundle {
    /// Stable module id (used in element ids, nav and formula sections).
    pub id: &'static str,
    /// Navigation / section title.
    pub title: String,
    /// Introductory HTML shown above the controls.
    pub intro_html: String,
    /// Rendered control column.
    pub controls_html: String,
    /// Figure definitions, rendered in order.
    pub figures: Vec<Figure>,
    /// JSON payload embedded next to the section (`data-<id>`).
    pub data_payload: Value,
    /// Client-side `init_<id>()` script fragment.
    pub js: String,
    /// "Common pitfalls" card HTML.
    pub pitfalls_html: String,
    /// "Guiding questions" card HTML.
    pub questions_html: String,
}

/// A module builder function.
pub type Builder = fn() -> ModuleBundle;

/// All registered builders in navigation order.
#[must_use]
pub fn builders() -> Vec<Builder> {
    vec![
        rlc_discharge::build,
        rail_launcher::build,
        coupled_resonance::build,
        hall_effect::build,
        cyclotron::build,
        induction_heating::build,
        ct_recon::build,
    ]
}

/// Ids of all registered modules in navigation order.
#[must_use]
pub fn registered_ids() -> Vec<&'static str> {
    vec![
        rlc_discharge::MODULE_ID,
        rail_launcher::MODULE_ID,
        coupled_resonance::MODULE_ID,
        hall_effect::MODULE_ID,
        cyclotron::MODULE_ID,
        induction_heating::MODULE_ID,
        ct_recon::MODULE_ID,
    ]
}

/// Substitute the module id into a client-side script template.
///
/// Module JS is authored as a raw template with `__ID__` placeholders so
/// element lookups stay namespaced per module.
#[must_use]
pub fn bind_js(template: &str, module_id: &str) -> String {
    template.replace("__ID__", module_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn registered_ids_match_builders() {
        let ids = registered_ids();
        let built: Vec<&str> = builders().iter().map(|b| b().id).collect();
        assert_eq!(ids, built);
    }

    #[test]
    fn module_ids_are_unique() {
        let ids = registered_ids();
        let set: HashSet<_> = ids.iter().collect();
        assert_eq!(set.len(), ids.len());
    }

    #[test]
    fn every_bundle_is_complete() {
        for bundle in builders().iter().map(|b| b()) {
            assert!(!bundle.title.is_empty(), "{}: empty title", bundle.id);
            assert!(!bundle.intro_html.is_empty(), "{}: empty intro", bundle.id);
            assert!(
                !bundle.controls_html.is_empty(),
                "{}: empty controls",
                bundle.id
            );
            assert!(!bundle.figures.is_empty(), "{}: no figures", bundle.id);
            assert!(
                bundle.js.contains(&format!("function init_{}()", bundle.id)),
                "{}: js missing init function",
                bundle.id
            );
            assert!(
                !bundle.js.contains("__ID__"),
                "{}: unexpanded js template",
                bundle.id
            );
            assert!(
                bundle.data_payload.get("defaults").is_some(),
                "{}: payload missing defaults",
                bundle.id
            );
        }
    }

    #[test]
    fn payload_constants_match_the_si_values() {
        use crate::physics;
        let cases: [(&str, &[(&str, f64)]); 4] = [
            ("hall_effect", &[("e", physics::E_CHARGE)]),
            (
                "cyclotron",
                &[
                    ("e", physics::E_CHARGE),
                    ("mp", physics::M_P),
                    ("c", physics::C_LIGHT),
                ],
            ),
            ("induction_heating", &[("mu0", physics::MU_0)]),
            ("rail_launcher", &[("g", physics::G)]),
        ];
        for bundle in builders().iter().map(|b| b()) {
            let Some((_, wants)) = cases.iter().find(|(id, _)| *id == bundle.id) else {
                continue;
            };
            for (key, value) in *wants {
                assert_eq!(
                    bundle.data_payload["consts"][*key].as_f64(),
                    Some(*value),
                    "{}.{key}",
                    bundle.id
                );
            }
        }
    }

    #[test]
    fn bind_js_replaces_all_occurrences() {
        let js = bind_js("init___ID__ #__ID__-x", "hall_effect");
        assert_eq!(js, "init_hall_effect #hall_effect-x");
    }
}
