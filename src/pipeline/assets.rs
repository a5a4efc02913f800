// src/pipeline/assets.rs

//! Static asset copy.
//!
//! Mirrors every file matched by the `[assets].patterns` globs from the
//! source root into the output root, preserving relative paths exactly:
//! `app/images/a/b.png` lands at `dist/images/a/b.png`. One coalesced
//! reload is sent per invocation, not one per file.

use tracing::info;

use crate::errors::{Result, SitepipeError};
use crate::fileset;
use crate::pipeline::PipelineCtx;
use crate::serve::ReloadSignal;

pub async fn run(ctx: &PipelineCtx) -> Result<()> {
    let src = ctx.src_dir();
    let out = ctx.out_dir();

    let set = fileset::build_globset(&ctx.cfg.assets.patterns)?;
    let desc = ctx.cfg.assets.patterns.join(", ");
    let files = fileset::collect(&src, &set, &desc)?;

    let mut copied = 0usize;
    for file in &files {
        let rel = fileset::relative_str(&src, file)
            .ok_or_else(|| SitepipeError::MissingInput(file.clone()))?;
        let dest = out.join(&rel);
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::copy(file, &dest).await?;
        copied += 1;
    }

    info!(copied, "copied static assets");
    ctx.reload.notify(ReloadSignal::Reload);
    Ok(())
}
