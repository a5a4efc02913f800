// src/config/validate.rs

use globset::Glob;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, SitepipeError};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::SitepipeError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_project(cfg)?;
    validate_watch(cfg)?;
    validate_globs(cfg)?;
    validate_style(cfg)?;
    validate_js(cfg)?;
    Ok(())
}

fn validate_project(cfg: &RawConfigFile) -> Result<()> {
    if cfg.project.src_dir.trim().is_empty() {
        return Err(SitepipeError::Config(
            "[project].src_dir must not be empty".to_string(),
        ));
    }
    if cfg.project.out_dir.trim().is_empty() {
        return Err(SitepipeError::Config(
            "[project].out_dir must not be empty".to_string(),
        ));
    }
    if cfg.project.src_dir == cfg.project.out_dir {
        return Err(SitepipeError::Config(
            "[project].src_dir and out_dir must differ".to_string(),
        ));
    }
    Ok(())
}

fn validate_watch(cfg: &RawConfigFile) -> Result<()> {
    if cfg.watch.debounce_ms == 0 {
        return Err(SitepipeError::Config(
            "[watch].debounce_ms must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

/// Compile every configured glob once so bad patterns surface at startup
/// instead of at first task run.
fn validate_globs(cfg: &RawConfigFile) -> Result<()> {
    check_glob("[html].pages", &cfg.html.pages)?;
    check_glob("[style].sources", &cfg.style.sources)?;
    check_glob("[js].watch", &cfg.js.watch)?;

    if cfg.assets.patterns.is_empty() {
        return Err(SitepipeError::Config(
            "[assets].patterns must list at least one pattern".to_string(),
        ));
    }
    for pat in &cfg.assets.patterns {
        check_glob("[assets].patterns", pat)?;
    }
    Ok(())
}

fn validate_style(cfg: &RawConfigFile) -> Result<()> {
    if cfg.style.min_suffix.trim().is_empty() {
        return Err(SitepipeError::Config(
            "[style].min_suffix must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_js(cfg: &RawConfigFile) -> Result<()> {
    if cfg.js.entry.trim().is_empty() {
        return Err(SitepipeError::Config(
            "[js].entry must not be empty".to_string(),
        ));
    }
    if cfg.js.min_suffix.trim().is_empty() {
        return Err(SitepipeError::Config(
            "[js].min_suffix must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn check_glob(field: &str, pattern: &str) -> Result<()> {
    if pattern.trim().is_empty() {
        return Err(SitepipeError::Config(format!(
            "{field} must not be empty"
        )));
    }
    Glob::new(pattern).map_err(|e| {
        SitepipeError::Config(format!("{field}: invalid glob {pattern:?}: {e}"))
    })?;
    Ok(())
}
