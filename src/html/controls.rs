//! Control fragment builders.
//!
//! Each control renders as a labeled block with a module-namespaced id and
//! an optional help line. Sliders and numbers get a live value span wired
//! up by the page runtime (`flBindValue`).

use crate::html::escape;

/// Visual weight of a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonStyle {
    /// Neutral.
    #[default]
    Plain,
    /// Highlighted primary action.
    Primary,
    /// Destructive action.
    Danger,
}

impl ButtonStyle {
    const fn class_suffix(self) -> &'static str {
        match self {
            Self::Plain => "",
            Self::Primary => "primary",
            Self::Danger => "danger",
        }
    }
}

fn help_block(help_text: &str) -> String {
    if help_text.is_empty() {
        String::new()
    } else {
        format!("<div class=\"help\">{}</div>", escape(help_text))
    }
}

/// A range slider with a live value readout.
#[must_use]
pub fn slider(
    cid: &str,
    label: &str,
    vmin: f64,
    vmax: f64,
    step: f64,
    value: f64,
    help_text: &str,
) -> String {
    format!(
        "<div class=\"control\">\n\
         <label for=\"{id}\">{label}</label>\n\
         <div class=\"control-row\">\n\
         <input type=\"range\" id=\"{id}\" min=\"{vmin}\" max=\"{vmax}\" step=\"{step}\" value=\"{value}\">\n\
         <span class=\"value\" id=\"{id}-val\"></span>\n\
         </div>\n\
         {help}\n\
         </div>",
        id = escape(cid),
        label = escape(label),
        help = help_block(help_text),
    )
}

/// A numeric input field.
#[must_use]
pub fn number(
    cid: &str,
    label: &str,
    value: f64,
    vmin: Option<f64>,
    vmax: Option<f64>,
    step: Option<f64>,
    unit: &str,
    help_text: &str,
) -> String {
    let mut attrs = vec![
        format!("id=\"{}\"", escape(cid)),
        format!("value=\"{value}\""),
        "type=\"number\"".to_string(),
    ];
    if let Some(v) = vmin {
        attrs.push(format!("min=\"{v}\""));
    }
    if let Some(v) = vmax {
        attrs.push(format!("max=\"{v}\""));
    }
    if let Some(v) = step {
        attrs.push(format!("step=\"{v}\""));
    }
    format!(
        "<div class=\"control\">\n\
         <label for=\"{id}\">{label}</label>\n\
         <div class=\"control-row\">\n\
         <input {attrs}>\n\
         <span class=\"value\" id=\"{id}-val\">{unit}</span>\n\
         </div>\n\
         {help}\n\
         </div>",
        id = escape(cid),
        label = escape(label),
        attrs = attrs.join(" "),
        unit = escape(unit),
        help = help_block(help_text),
    )
}

/// A select dropdown. `options` are `(value, text)` pairs.
#[must_use]
pub fn select(cid: &str, label: &str, options: &[(&str, &str)], value: &str, help_text: &str) -> String {
    let opts = options
        .iter()
        .map(|(v, t)| {
            format!(
                "<option value=\"{}\"{}>{}</option>",
                escape(v),
                if *v == value { " selected" } else { "" },
                escape(t)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "<div class=\"control\">\n\
         <label for=\"{id}\">{label}</label>\n\
         <select id=\"{id}\">\n{opts}\n</select>\n\
         {help}\n\
         </div>",
        id = escape(cid),
        label = escape(label),
        help = help_block(help_text),
    )
}

/// A row of buttons. Entries are `(id, label, style)`.
#[must_use]
pub fn buttons(entries: &[(&str, &str, ButtonStyle)]) -> String {
    let btns = entries
        .iter()
        .map(|(cid, label, style)| {
            format!(
                "<button class=\"btn {}\" id=\"{}\" type=\"button\">{}</button>",
                style.class_suffix(),
                escape(cid),
                escape(label)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    format!("<div class=\"btnrow\">{btns}</div>")
}
