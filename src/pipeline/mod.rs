// src/pipeline/mod.rs

//! Per-task build pipelines.
//!
//! Every task follows the same shape: expand its input file-set, run the
//! transformation collaborators fully in memory, then write outputs and
//! (for content the browser displays) notify the reload channel. Nothing
//! is written until the whole transform succeeded, so a malformed input
//! never leaves partial output behind.
//!
//! Tasks that only copy or concatenate bytes ([`assets`], the vendor
//! bundles in [`vendor`]) have no transform stage.

pub mod assets;
pub mod filter;
pub mod html;
pub mod icons;
pub mod scripts;
pub mod style;
pub mod vendor;

use std::path::{Path, PathBuf};

use crate::config::ConfigFile;
use crate::errors::Result;
use crate::serve::ReloadHub;

/// Shared context handed to every task body.
///
/// This is the explicit value the composer passes around instead of a
/// global task registry: configuration plus the reload channel.
#[derive(Debug, Clone)]
pub struct PipelineCtx {
    pub cfg: ConfigFile,
    pub reload: ReloadHub,
}

impl PipelineCtx {
    pub fn new(cfg: ConfigFile, reload: ReloadHub) -> Self {
        Self { cfg, reload }
    }

    pub fn src_dir(&self) -> PathBuf {
        PathBuf::from(&self.cfg.project.src_dir)
    }

    pub fn out_dir(&self) -> PathBuf {
        PathBuf::from(&self.cfg.project.out_dir)
    }
}

/// Write one output file, creating parent directories as needed.
pub async fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, bytes).await?;
    Ok(())
}

/// Insert a suffix before the file extension: `main.css` + `.min` ->
/// `main.min.css`. Extensionless names get the suffix appended.
pub fn min_name(file_name: &str, suffix: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) => format!("{stem}{suffix}.{ext}"),
        None => format!("{file_name}{suffix}"),
    }
}
