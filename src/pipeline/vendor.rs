// src/pipeline/vendor.rs

//! Third-party bundles.
//!
//! `style-libs` concatenates the configured vendor stylesheets and
//! minifies the result into one file; `js-libs` concatenates the
//! configured vendor scripts as-is (they ship pre-minified). Input order
//! is the config list order. Neither task notifies the reload channel --
//! vendor bundles are regenerated manually.

use std::path::Path;

use lightningcss::printer::PrinterOptions;
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, StyleSheet};
use tracing::info;

use crate::errors::{Result, SitepipeError};
use crate::fileset;
use crate::pipeline::{PipelineCtx, write_output};

pub async fn style_libs(ctx: &PipelineCtx) -> Result<()> {
    let libs = &ctx.cfg.style.libs;
    if libs.files.is_empty() {
        return Err(SitepipeError::Config(
            "[style.libs].files is empty; nothing to bundle".to_string(),
        ));
    }

    let files = fileset::resolve_listed(Path::new("."), &libs.files)?;
    let mut concatenated = String::new();
    for file in &files {
        concatenated.push_str(&tokio::fs::read_to_string(file).await?);
        concatenated.push('\n');
    }

    let out = ctx.out_dir().join("css").join(&libs.out);
    let out_name = libs.out.clone();
    let minified = tokio::task::spawn_blocking(move || {
        minify_concatenated(&out_name, &concatenated)
    })
    .await
    .map_err(|e| SitepipeError::Other(anyhow::anyhow!(e)))??;

    write_output(&out, minified.as_bytes()).await?;
    info!(files = files.len(), out = ?out, "bundled vendor stylesheets");
    Ok(())
}

pub async fn js_libs(ctx: &PipelineCtx) -> Result<()> {
    let libs = &ctx.cfg.js.libs;
    if libs.files.is_empty() {
        return Err(SitepipeError::Config(
            "[js.libs].files is empty; nothing to bundle".to_string(),
        ));
    }

    let files = fileset::resolve_listed(Path::new("."), &libs.files)?;
    let mut concatenated = Vec::new();
    for file in &files {
        concatenated.extend_from_slice(&tokio::fs::read(file).await?);
        concatenated.push(b'\n');
    }

    let out = ctx.out_dir().join("js").join(&libs.out);
    write_output(&out, &concatenated).await?;
    info!(files = files.len(), out = ?out, "bundled vendor scripts");
    Ok(())
}

fn minify_concatenated(name: &str, css: &str) -> Result<String> {
    let options = ParserOptions {
        filename: name.to_string(),
        ..ParserOptions::default()
    };
    let mut stylesheet = StyleSheet::parse(css, options)
        .map_err(|e| vendor_css_err(name, e.to_string()))?;
    stylesheet
        .minify(MinifyOptions::default())
        .map_err(|e| vendor_css_err(name, e.to_string()))?;
    let minified = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .map_err(|e| vendor_css_err(name, e.to_string()))?
        .code;
    Ok(minified)
}

fn vendor_css_err(name: &str, message: String) -> SitepipeError {
    SitepipeError::Transform {
        task: "style-libs",
        path: name.into(),
        message,
    }
}
