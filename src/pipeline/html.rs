// src/pipeline/html.rs

//! Template build: render handlebars pages into mirrored `.html` files.
//!
//! Files whose name starts with `_` are registered as partials (named by
//! their stem without the underscore) and are not rendered on their own.
//! Pages render against the optional `[html].data` table.

use std::path::Path;

use handlebars::Handlebars;
use tracing::{debug, info};

use crate::errors::{Result, SitepipeError};
use crate::fileset;
use crate::pipeline::{PipelineCtx, write_output};
use crate::serve::ReloadSignal;

const TASK: &str = "html";

pub async fn run(ctx: &PipelineCtx) -> Result<()> {
    let src = ctx.src_dir();
    let out = ctx.out_dir();
    let pages_glob = &ctx.cfg.html.pages;
    let base = fileset::glob_base(pages_glob);

    let files = fileset::collect_pattern(&src, pages_glob)?;
    let (partials, pages): (Vec<_>, Vec<_>) =
        files.into_iter().partition(|f| fileset::is_partial(f));

    let mut registry = Handlebars::new();

    for partial in &partials {
        let name = partial_name(partial);
        registry
            .register_template_file(&name, partial)
            .map_err(|e| transform_err(partial, e.to_string()))?;
        debug!(partial = %name, "registered template partial");
    }

    let data = template_data(&ctx.cfg.html.data)?;

    // Render everything before writing anything.
    let mut rendered = Vec::with_capacity(pages.len());
    for page in &pages {
        let rel = fileset::rel_under_base(&src, &base, page)
            .ok_or_else(|| SitepipeError::MissingInput(page.clone()))?;
        registry
            .register_template_file(&rel, page)
            .map_err(|e| transform_err(page, e.to_string()))?;
        let html = registry
            .render(&rel, &data)
            .map_err(|e| transform_err(page, e.to_string()))?;

        let out_rel = swap_extension(&rel, "html");
        rendered.push((out.join(out_rel), html));
    }

    if rendered.is_empty() {
        return Err(SitepipeError::EmptyFileSet {
            pattern: pages_glob.clone(),
            root: src,
        });
    }

    for (path, html) in &rendered {
        write_output(path, html.as_bytes()).await?;
    }

    info!(pages = rendered.len(), partials = partials.len(), "rendered templates");
    ctx.reload.notify(ReloadSignal::Reload);
    Ok(())
}

fn transform_err(path: &Path, message: String) -> SitepipeError {
    SitepipeError::Transform {
        task: TASK,
        path: path.to_path_buf(),
        message,
    }
}

/// `_header.hbs` -> `header`.
fn partial_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.trim_start_matches('_').to_string())
        .unwrap_or_default()
}

fn swap_extension(rel: &str, ext: &str) -> String {
    match rel.rsplit_once('.') {
        Some((stem, _)) => format!("{stem}.{ext}"),
        None => format!("{rel}.{ext}"),
    }
}

fn template_data(data: &Option<toml::Value>) -> Result<serde_json::Value> {
    match data {
        Some(value) => serde_json::to_value(value).map_err(|e| {
            SitepipeError::Config(format!("[html].data is not renderable: {e}"))
        }),
        None => Ok(serde_json::Value::Object(serde_json::Map::new())),
    }
}
