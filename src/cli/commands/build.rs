//! `build` command: render the site to disk.

use tracing::info;

use crate::cli::args::BuildArgs;
use crate::config::SiteConfig;
use crate::error::Result;
use crate::site::{self, SiteOptions};

/// Render the site and write the output HTML file.
///
/// Config file values are loaded first (defaults if no `--config`), then
/// CLI flags override field by field.
///
/// # Errors
///
/// Returns a config error for an unreadable config or formulas file, a
/// render error from site assembly, and an I/O error if the output cannot
/// be written.
pub fn run(args: &BuildArgs) -> Result<()> {
    let cfg = match &args.config {
        Some(path) => SiteConfig::load(path)?,
        None => SiteConfig::default(),
    };
    // unknown ids in the config file fail as a config error; unknown ids
    // from --skip surface later as a render error
    cfg.validate_skip(&crate::modules::registered_ids())?;

    let mut options = SiteOptions::from_config(&cfg);
    if let Some(mode) = args.mode {
        options.mode = mode;
    }
    if let Some(ref plotly) = args.plotly {
        options.plotly_bundle = Some(plotly.clone());
    }
    if let Some(ref formulas) = args.formulas {
        options.formulas = Some(formulas.clone());
    }
    for id in &args.skip {
        if !options.skip.contains(id) {
            options.skip.push(id.clone());
        }
    }

    let html = site::build_site(&options)?;

    if let Some(parent) = args.out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(&args.out, &html)?;
    info!(out = %args.out.display(), bytes = html.len(), "site written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BuildMode;
    use std::path::PathBuf;

    fn base_args(out: PathBuf) -> BuildArgs {
        BuildArgs {
            out,
            config: None,
            mode: Some(BuildMode::Debug),
            plotly: None,
            skip: Vec::new(),
            formulas: None,
        }
    }

    #[test]
    fn writes_output_and_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested/site.html");
        run(&base_args(out.clone())).unwrap();
        let html = std::fs::read_to_string(out).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn cli_skip_merges_with_config_skip() {
        let dir = tempfile::tempdir().unwrap();
        let cfg_path = dir.path().join("site.yaml");
        std::fs::write(&cfg_path, "skip:\n  - ct_recon\n").unwrap();
        let out = dir.path().join("site.html");
        let mut args = base_args(out.clone());
        args.config = Some(cfg_path);
        args.skip = vec!["ct_recon".to_string(), "cyclotron".to_string()];
        run(&args).unwrap();
        let html = std::fs::read_to_string(out).unwrap();
        assert!(!html.contains("id=\"section-ct_recon\""));
        assert!(!html.contains("id=\"section-cyclotron\""));
    }

    #[test]
    fn unknown_skip_in_config_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let cfg_path = dir.path().join("site.yaml");
        std::fs::write(&cfg_path, "skip:\n  - warp_drive\n").unwrap();
        let mut args = base_args(dir.path().join("site.html"));
        args.config = Some(cfg_path);
        let err = run(&args).unwrap_err();
        assert!(matches!(
            err,
            crate::error::FieldLabError::Config(crate::error::ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = base_args(dir.path().join("site.html"));
        args.config = Some(PathBuf::from("/nonexistent/site.yaml"));
        assert!(run(&args).is_err());
    }
}
