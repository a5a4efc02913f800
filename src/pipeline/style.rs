// src/pipeline/style.rs

//! Stylesheet build.
//!
//! Each non-partial stylesheet under the sources glob is bundled
//! (`@import`s inlined), downleveled and vendor-prefixed for the
//! configured browser targets, and written twice: expanded and minified
//! with the configured suffix. Both artifacts are produced from the same
//! in-memory stylesheet, so the minified one can never be larger.

use std::path::{Path, PathBuf};

use lightningcss::bundler::{Bundler, FileProvider};
use lightningcss::printer::PrinterOptions;
use lightningcss::stylesheet::{MinifyOptions, ParserOptions};
use lightningcss::targets::{Browsers, Targets};
use tracing::{debug, info};

use crate::errors::{Result, SitepipeError};
use crate::fileset;
use crate::pipeline::{PipelineCtx, min_name, write_output};
use crate::serve::ReloadSignal;

const TASK: &str = "style";

pub async fn run(ctx: &PipelineCtx) -> Result<()> {
    let src = ctx.src_dir();
    let out_css = ctx.out_dir().join("css");
    let sources_glob = ctx.cfg.style.sources.clone();
    let base = fileset::glob_base(&sources_glob);
    let suffix = ctx.cfg.style.min_suffix.clone();

    let files = fileset::collect_pattern(&src, &sources_glob)?;
    let entries: Vec<PathBuf> =
        files.into_iter().filter(|f| !fileset::is_partial(f)).collect();
    if entries.is_empty() {
        return Err(SitepipeError::EmptyFileSet {
            pattern: sources_glob,
            root: src,
        });
    }

    let browsers = browser_targets(&ctx.cfg.style.targets)?;

    // Compile every entry before writing anything.
    let mut outputs: Vec<(PathBuf, String)> = Vec::new();
    let mut touched: Vec<String> = Vec::new();
    for entry in &entries {
        let rel = fileset::rel_under_base(&src, &base, entry)
            .ok_or_else(|| SitepipeError::MissingInput(entry.clone()))?;

        let compiled = {
            let entry = entry.clone();
            let browsers = browsers.clone();
            tokio::task::spawn_blocking(move || compile_entry(&entry, browsers))
                .await
                .map_err(|e| SitepipeError::Other(anyhow::anyhow!(e)))??
        };

        let expanded_rel = format!("css/{rel}");
        let minified_rel = format!("css/{}", min_rel(&rel, &suffix));
        outputs.push((out_css.join(&rel), compiled.expanded));
        outputs.push((out_css.join(min_rel(&rel, &suffix)), compiled.minified));
        touched.push(expanded_rel);
        touched.push(minified_rel);
        debug!(entry = ?entry, "compiled stylesheet");
    }

    for (path, css) in &outputs {
        write_output(path, css.as_bytes()).await?;
    }

    info!(entries = entries.len(), "built stylesheets");
    ctx.reload.notify(ReloadSignal::Inject { paths: touched });
    Ok(())
}

struct CompiledCss {
    expanded: String,
    minified: String,
}

/// Bundle, transform, and print one stylesheet entry. All the borrowed
/// lightningcss state stays inside this function; errors leave as owned
/// strings.
fn compile_entry(entry: &Path, browsers: Option<Browsers>) -> Result<CompiledCss> {
    let provider = FileProvider::new();
    let mut bundler = Bundler::new(&provider, None, ParserOptions::default());

    let mut stylesheet = bundler
        .bundle(entry)
        .map_err(|e| transform_err(entry, e.to_string()))?;

    stylesheet
        .minify(MinifyOptions {
            targets: targets_for(browsers.clone()),
            ..MinifyOptions::default()
        })
        .map_err(|e| transform_err(entry, e.to_string()))?;

    let expanded = stylesheet
        .to_css(PrinterOptions {
            targets: targets_for(browsers.clone()),
            ..PrinterOptions::default()
        })
        .map_err(|e| transform_err(entry, e.to_string()))?
        .code;

    let minified = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            targets: targets_for(browsers),
            ..PrinterOptions::default()
        })
        .map_err(|e| transform_err(entry, e.to_string()))?
        .code;

    Ok(CompiledCss { expanded, minified })
}

/// Resolve `[style].targets` browserslist queries once per task run.
pub fn browser_targets(queries: &[String]) -> Result<Option<Browsers>> {
    if queries.is_empty() {
        return Ok(None);
    }
    Browsers::from_browserslist(queries.iter().map(|s| s.as_str()))
        .map_err(|e| SitepipeError::Config(format!("[style].targets: {e}")))
}

fn targets_for(browsers: Option<Browsers>) -> Targets {
    Targets {
        browsers,
        ..Targets::default()
    }
}

fn min_rel(rel: &str, suffix: &str) -> String {
    match rel.rsplit_once('/') {
        Some((dir, name)) => format!("{dir}/{}", min_name(name, suffix)),
        None => min_name(rel, suffix),
    }
}

fn transform_err(path: &Path, message: String) -> SitepipeError {
    SitepipeError::Transform {
        task: TASK,
        path: path.to_path_buf(),
        message,
    }
}
