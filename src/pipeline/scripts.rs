// src/pipeline/scripts.rs

//! Script build.
//!
//! The designated entry script is piped through the configured transpile
//! filter and then the configured minify filter. Unconfigured stages are
//! identity passes. Both artifacts are computed before either is
//! written.

use tracing::info;

use crate::errors::{Result, SitepipeError};
use crate::pipeline::{PipelineCtx, min_name, write_output};
use crate::serve::ReloadSignal;

use super::filter::run_filter;

const TASK: &str = "js";

pub async fn run(ctx: &PipelineCtx) -> Result<()> {
    let entry = ctx.src_dir().join(&ctx.cfg.js.entry);
    if !entry.is_file() {
        return Err(SitepipeError::MissingInput(entry));
    }

    let source = tokio::fs::read(&entry).await?;

    let transpiled = match &ctx.cfg.js.transpile {
        Some(cmd) => run_filter(TASK, &entry, cmd, source).await?,
        None => source,
    };

    let minified = match &ctx.cfg.js.minify {
        Some(cmd) => run_filter(TASK, &entry, cmd, transpiled.clone()).await?,
        None => transpiled.clone(),
    };

    let file_name = entry
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| SitepipeError::MissingInput(entry.clone()))?;

    let out_js = ctx.out_dir().join("js");
    write_output(&out_js.join(&file_name), &transpiled).await?;
    write_output(
        &out_js.join(min_name(&file_name, &ctx.cfg.js.min_suffix)),
        &minified,
    )
    .await?;

    info!(entry = ?entry, bytes = transpiled.len(), "built script");
    ctx.reload.notify(ReloadSignal::Reload);
    Ok(())
}
