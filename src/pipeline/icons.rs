// src/pipeline/icons.rs

//! Icon sprite and icon-font generation.
//!
//! Both tasks read the SVG files under `[icons].dir` in sorted order and
//! write their outputs back into the *source* tree, so the copy and
//! style tasks pick them up on the next build. Neither task is watched;
//! both are regenerated manually.
//!
//! The sprite task is pure assembly: each icon becomes a `<symbol>` in
//! one sprite SVG, plus a stylesheet partial naming the symbols. Font
//! rasterization is delegated to the configured external command; this
//! module assigns the codepoints, writes the glyph-map JSON the command
//! consumes, and generates the stylesheet partial from the same map.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::errors::{Result, SitepipeError};
use crate::fileset;
use crate::pipeline::{PipelineCtx, write_output};

use super::filter::run_generator;

const SPRITE_TASK: &str = "svg-sprite";
const FONT_TASK: &str = "icon-fonts";

pub async fn sprite(ctx: &PipelineCtx) -> Result<()> {
    let src = ctx.src_dir();
    let icons = collect_icons(ctx)?;

    let mut symbols = String::new();
    for icon in &icons {
        let name = icon_name(icon)?;
        let svg = tokio::fs::read_to_string(icon).await?;
        let symbol = symbol_from_svg(&name, &svg)
            .map_err(|message| SitepipeError::Transform {
                task: SPRITE_TASK,
                path: icon.clone(),
                message,
            })?;
        symbols.push_str(&symbol);
        symbols.push('\n');
    }

    let sprite = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" \
         xmlns:xlink=\"http://www.w3.org/1999/xlink\" style=\"display:none\">\n{symbols}</svg>\n"
    );

    let partial = sprite_partial(&ctx.cfg.icons.sprite_svg, &icons)?;

    write_output(&src.join(&ctx.cfg.icons.sprite_svg), sprite.as_bytes()).await?;
    write_output(&src.join(&ctx.cfg.icons.sprite_partial), partial.as_bytes()).await?;

    info!(icons = icons.len(), "built svg sprite");
    Ok(())
}

pub async fn fonts(ctx: &PipelineCtx) -> Result<()> {
    let cmd = ctx.cfg.icons.font_cmd.clone().ok_or_else(|| {
        SitepipeError::Config(
            "[icons].font_cmd is not configured; cannot generate icon fonts".to_string(),
        )
    })?;

    let src = ctx.src_dir();
    let icons = collect_icons(ctx)?;
    let font_name = &ctx.cfg.icons.font_name;

    let glyphs: Vec<Glyph> = icons
        .iter()
        .enumerate()
        .map(|(i, icon)| {
            Ok(Glyph {
                name: icon_name(icon)?,
                codepoint: format!("{:x}", 0xE001 + i as u32),
                src: icon.to_string_lossy().replace('\\', "/"),
            })
        })
        .collect::<Result<_>>()?;

    let map = GlyphMap {
        family: font_name.clone(),
        glyphs,
    };
    let map_json = serde_json::to_string_pretty(&map)
        .map_err(|e| SitepipeError::Config(format!("serializing glyph map: {e}")))?;

    let font_dir = src.join(&ctx.cfg.icons.font_dir);
    let map_path = font_dir.join("glyphs.json");
    write_output(&map_path, map_json.as_bytes()).await?;

    let env = [
        ("SITEPIPE_ICONS_DIR", path_str(&src.join(&ctx.cfg.icons.dir))),
        ("SITEPIPE_FONT_DIR", path_str(&font_dir)),
        ("SITEPIPE_GLYPHS", path_str(&map_path)),
    ];
    run_generator(FONT_TASK, &map_path, &cmd, &env).await?;

    let partial = font_partial(&ctx.cfg.icons.font_dir, font_name, &map.glyphs);
    write_output(&src.join(&ctx.cfg.icons.font_partial), partial.as_bytes()).await?;

    info!(glyphs = map.glyphs.len(), family = %font_name, "built icon font");
    Ok(())
}

#[derive(Debug, Serialize)]
struct GlyphMap {
    family: String,
    glyphs: Vec<Glyph>,
}

#[derive(Debug, Serialize)]
struct Glyph {
    name: String,
    codepoint: String,
    src: String,
}

fn collect_icons(ctx: &PipelineCtx) -> Result<Vec<PathBuf>> {
    let dir = ctx.src_dir().join(&ctx.cfg.icons.dir);
    fileset::collect_pattern(&dir, "*.svg")
}

fn icon_name(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .ok_or_else(|| SitepipeError::MissingInput(path.to_path_buf()))
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Wrap one icon's markup in a `<symbol>` carrying its viewBox.
fn symbol_from_svg(name: &str, svg: &str) -> std::result::Result<String, String> {
    let open_start = svg
        .find("<svg")
        .ok_or_else(|| "no <svg> element found".to_string())?;
    let open_end = svg[open_start..]
        .find('>')
        .map(|i| open_start + i)
        .ok_or_else(|| "unterminated <svg> tag".to_string())?;
    let close = svg
        .rfind("</svg>")
        .ok_or_else(|| "no closing </svg> tag".to_string())?;
    if close < open_end {
        return Err("malformed svg document".to_string());
    }

    let opening_tag = &svg[open_start..=open_end];
    let inner = svg[open_end + 1..close].trim();

    let view_box = attribute(opening_tag, "viewBox");
    match view_box {
        Some(vb) => Ok(format!("<symbol id=\"{name}\" viewBox=\"{vb}\">{inner}</symbol>")),
        None => Ok(format!("<symbol id=\"{name}\">{inner}</symbol>")),
    }
}

fn attribute<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    let marker = format!("{name}=\"");
    let start = tag.find(&marker)? + marker.len();
    let end = tag[start..].find('"')? + start;
    Some(&tag[start..end])
}

fn sprite_partial(sprite_rel: &str, icons: &[PathBuf]) -> Result<String> {
    let mut css = String::from(
        "/* Generated by sitepipe (svg-sprite). Do not edit. */\n\n\
         .icon {\n  display: inline-block;\n  width: 1em;\n  height: 1em;\n  fill: currentColor;\n}\n",
    );
    for icon in icons {
        let name = icon_name(icon)?;
        css.push_str(&format!(
            "\n.icon-{name} {{\n  background-image: url(\"/{sprite_rel}#{name}\");\n}}\n"
        ));
    }
    Ok(css)
}

fn font_partial(font_dir: &str, family: &str, glyphs: &[Glyph]) -> String {
    let mut css = format!(
        "/* Generated by sitepipe (icon-fonts). Do not edit. */\n\n\
         @font-face {{\n  font-family: \"{family}\";\n  src: url(\"/{font_dir}/{family}.woff2\") format(\"woff2\"),\n    url(\"/{font_dir}/{family}.woff\") format(\"woff\"),\n    url(\"/{font_dir}/{family}.ttf\") format(\"truetype\");\n  font-weight: normal;\n  font-style: normal;\n}}\n\n\
         [class^=\"icon-\"]::before,\n[class*=\" icon-\"]::before {{\n  font-family: \"{family}\";\n  font-style: normal;\n  font-weight: normal;\n  line-height: 1;\n}}\n"
    );
    for glyph in glyphs {
        css.push_str(&format!(
            "\n.icon-{}::before {{\n  content: \"\\{}\";\n}}\n",
            glyph.name, glyph.codepoint
        ));
    }
    css
}
