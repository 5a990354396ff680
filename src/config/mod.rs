//! Site configuration.
//!
//! An optional YAML file customizes the generated page and the plotly
//! embedding. Every field has a default, so `fieldlab build` works with no
//! config at all; CLI flags override file values field by field.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How plotly.js reaches the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    /// Inline a local plotly.min.js bundle; the output works fully offline.
    #[default]
    Release,
    /// Reference the CDN; smaller output, needs network on first view.
    Debug,
}

/// Root site configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct SiteConfig {
    /// Page identity shown in the sidebar brand block.
    #[serde(default)]
    pub site: SiteMeta,

    /// Plotly embedding settings.
    #[serde(default)]
    pub plotly: PlotlySettings,

    /// Path to the formulas Markdown document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formulas: Option<PathBuf>,

    /// Module ids excluded from the build.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skip: Vec<String>,
}

/// Sidebar brand metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct SiteMeta {
    /// Page and brand title.
    #[serde(default = "default_title")]
    pub title: String,

    /// Brand subtitle line.
    #[serde(default = "default_subtitle")]
    pub subtitle: String,

    /// `lang` attribute of the generated document.
    #[serde(default = "default_lang")]
    pub lang: String,
}

impl Default for SiteMeta {
    fn default() -> Self {
        Self {
            title: default_title(),
            subtitle: default_subtitle(),
            lang: default_lang(),
        }
    }
}

/// Plotly embedding settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct PlotlySettings {
    /// Release inlines the bundle, debug references the CDN.
    #[serde(default)]
    pub mode: BuildMode,

    /// Local plotly.min.js used for inlining (and CDN version sniffing).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle: Option<PathBuf>,

    /// CDN URL override for debug mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cdn_url: Option<String>,
}

fn default_title() -> String {
    "FieldLab".to_string()
}

fn default_subtitle() -> String {
    "Single-file offline interactive physics lab".to_string()
}

fn default_lang() -> String {
    "en".to_string()
}

impl SiteConfig {
    /// Load a config file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingFile` if the path cannot be read and
    /// `ConfigError::ParseError` on malformed YAML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;
        // UTF-8 BOM would otherwise break the first key
        let raw = raw.strip_prefix('\u{feff}').unwrap_or(&raw);
        serde_yaml::from_str(raw).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Validate skip entries against the known module ids.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first unknown id.
    pub fn validate_skip(&self, known_ids: &[&str]) -> Result<(), ConfigError> {
        for id in &self.skip {
            if !known_ids.contains(&id.as_str()) {
                return Err(ConfigError::InvalidValue {
                    field: "skip".to_string(),
                    value: id.clone(),
                    expected: format!("one of: {}", known_ids.join(", ")),
                });
            }
        }
        Ok(())
    }
}
