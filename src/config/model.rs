// src/config/model.rs

use serde::Deserialize;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [project]
/// src_dir = "app"
/// out_dir = "dist"
///
/// [style]
/// sources = "styles/**/*.css"
/// targets = ["last 10 versions"]
///
/// [style.libs]
/// files = ["vendor/swiper.css"]
///
/// [js]
/// entry = "js/main.js"
/// ```
///
/// All sections are optional and have defaults matching the conventional
/// `app/` -> `dist/` project layout.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub project: ProjectSection,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub watch: WatchSection,

    #[serde(default)]
    pub html: HtmlSection,

    #[serde(default)]
    pub style: StyleSection,

    #[serde(default)]
    pub js: JsSection,

    #[serde(default)]
    pub assets: AssetsSection,

    #[serde(default)]
    pub icons: IconsSection,
}

/// Validated configuration.
///
/// Constructed from [`RawConfigFile`] via `TryFrom` in `config::validate`;
/// the rest of the application only ever sees this type.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub project: ProjectSection,
    pub server: ServerSection,
    pub watch: WatchSection,
    pub html: HtmlSection,
    pub style: StyleSection,
    pub js: JsSection,
    pub assets: AssetsSection,
    pub icons: IconsSection,
}

impl ConfigFile {
    /// Construct without validation. Only `config::validate` should call
    /// this; everyone else goes through `load_and_validate`.
    pub(crate) fn new_unchecked(raw: RawConfigFile) -> Self {
        Self {
            project: raw.project,
            server: raw.server,
            watch: raw.watch,
            html: raw.html,
            style: raw.style,
            js: raw.js,
            assets: raw.assets,
            icons: raw.icons,
        }
    }
}

/// `[project]` section: source and output roots.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectSection {
    #[serde(default = "default_src_dir")]
    pub src_dir: String,

    #[serde(default = "default_out_dir")]
    pub out_dir: String,
}

fn default_src_dir() -> String {
    "app".to_string()
}

fn default_out_dir() -> String {
    "dist".to_string()
}

impl Default for ProjectSection {
    fn default() -> Self {
        Self {
            src_dir: default_src_dir(),
            out_dir: default_out_dir(),
        }
    }
}

/// `[server]` section.
///
/// The dev server is always headless: there is deliberately no UI and no
/// desktop-notification toggle to configure.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSection {
    /// Debounce window in milliseconds. Rapid events within this window
    /// coalesce into one batch per task.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_debounce_ms() -> u64 {
    300
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

/// `[html]` section: template build.
#[derive(Debug, Clone, Deserialize)]
pub struct HtmlSection {
    /// Glob (relative to `src_dir`) matching template pages. Files whose
    /// name starts with `_` are registered as partials instead of being
    /// rendered.
    #[serde(default = "default_pages")]
    pub pages: String,

    /// Optional data table handed to every rendered page.
    #[serde(default)]
    pub data: Option<toml::Value>,
}

fn default_pages() -> String {
    "**/*.hbs".to_string()
}

impl Default for HtmlSection {
    fn default() -> Self {
        Self {
            pages: default_pages(),
            data: None,
        }
    }
}

/// `[style]` section: stylesheet build.
#[derive(Debug, Clone, Deserialize)]
pub struct StyleSection {
    /// Glob (relative to `src_dir`) matching stylesheet entry points.
    /// Files whose name starts with `_` are partials reachable only via
    /// `@import`.
    #[serde(default = "default_style_sources")]
    pub sources: String,

    /// Browserslist-style target queries used for syntax downleveling and
    /// vendor prefixing. Empty means "no downleveling".
    #[serde(default = "default_style_targets")]
    pub targets: Vec<String>,

    /// Filename suffix inserted before the extension on the minified
    /// artifact (`main.css` -> `main.min.css`).
    #[serde(default = "default_min_suffix")]
    pub min_suffix: String,

    /// `[style.libs]`: third-party stylesheet bundle.
    #[serde(default = "default_style_libs")]
    pub libs: VendorSection,
}

fn default_style_sources() -> String {
    "styles/**/*.css".to_string()
}

fn default_style_targets() -> Vec<String> {
    vec!["last 10 versions".to_string()]
}

fn default_min_suffix() -> String {
    ".min".to_string()
}

fn default_style_libs() -> VendorSection {
    VendorSection {
        files: Vec::new(),
        out: "lib.min.css".to_string(),
    }
}

impl Default for StyleSection {
    fn default() -> Self {
        Self {
            sources: default_style_sources(),
            targets: default_style_targets(),
            min_suffix: default_min_suffix(),
            libs: default_style_libs(),
        }
    }
}

/// `[js]` section: script build.
#[derive(Debug, Clone, Deserialize)]
pub struct JsSection {
    /// The designated entry script, relative to `src_dir`.
    #[serde(default = "default_js_entry")]
    pub entry: String,

    /// Glob (relative to `src_dir`) that re-triggers the script build.
    #[serde(default = "default_js_watch")]
    pub watch: String,

    /// Optional external transpiler, run as a stdin/stdout filter.
    #[serde(default)]
    pub transpile: Option<String>,

    /// Optional external minifier, run as a stdin/stdout filter.
    #[serde(default)]
    pub minify: Option<String>,

    /// Filename suffix for the minified artifact.
    #[serde(default = "default_min_suffix")]
    pub min_suffix: String,

    /// `[js.libs]`: third-party script bundle.
    #[serde(default = "default_js_libs")]
    pub libs: VendorSection,
}

fn default_js_entry() -> String {
    "js/main.js".to_string()
}

fn default_js_watch() -> String {
    "js/**/*.js".to_string()
}

fn default_js_libs() -> VendorSection {
    VendorSection {
        files: Vec::new(),
        out: "lib.min.js".to_string(),
    }
}

impl Default for JsSection {
    fn default() -> Self {
        Self {
            entry: default_js_entry(),
            watch: default_js_watch(),
            transpile: None,
            minify: None,
            min_suffix: default_min_suffix(),
            libs: default_js_libs(),
        }
    }
}

/// A third-party bundle: an ordered list of input files and the name of
/// the single concatenated output.
#[derive(Debug, Clone, Deserialize)]
pub struct VendorSection {
    /// Input files in concatenation order, relative to the project root
    /// (not `src_dir` -- vendor files usually live outside the source
    /// tree).
    #[serde(default)]
    pub files: Vec<String>,

    /// Output file name under `out_dir`'s `css/` or `js/` subtree.
    pub out: String,
}

/// `[assets]` section: static asset copy.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetsSection {
    /// Globs (relative to `src_dir`) for files mirrored into `out_dir`.
    #[serde(default = "default_asset_patterns")]
    pub patterns: Vec<String>,
}

fn default_asset_patterns() -> Vec<String> {
    vec!["fonts/**/*".to_string(), "images/**/*".to_string()]
}

impl Default for AssetsSection {
    fn default() -> Self {
        Self {
            patterns: default_asset_patterns(),
        }
    }
}

/// `[icons]` section: SVG sprite and icon-font generation.
///
/// Outputs land in the *source* tree so the copy and style tasks pick them
/// up on the next build. Icon tasks are manual-run only and never watched.
#[derive(Debug, Clone, Deserialize)]
pub struct IconsSection {
    /// Directory (relative to `src_dir`) holding the source SVG icons.
    #[serde(default = "default_icons_dir")]
    pub dir: String,

    /// Sprite output, relative to `src_dir`.
    #[serde(default = "default_sprite_svg")]
    pub sprite_svg: String,

    /// Generated stylesheet partial for the sprite, relative to `src_dir`.
    #[serde(default = "default_sprite_partial")]
    pub sprite_partial: String,

    /// Directory (relative to `src_dir`) the font generator writes into.
    #[serde(default = "default_font_dir")]
    pub font_dir: String,

    /// Generated stylesheet partial for the icon font, relative to
    /// `src_dir`.
    #[serde(default = "default_font_partial")]
    pub font_partial: String,

    /// Font family / file base name.
    #[serde(default = "default_font_name")]
    pub font_name: String,

    /// External font generator command. Receives `SITEPIPE_ICONS_DIR`,
    /// `SITEPIPE_FONT_DIR` and `SITEPIPE_GLYPHS` in its environment.
    #[serde(default)]
    pub font_cmd: Option<String>,
}

fn default_icons_dir() -> String {
    "icons".to_string()
}

fn default_sprite_svg() -> String {
    "images/sprite.svg".to_string()
}

fn default_sprite_partial() -> String {
    "styles/_sprite.css".to_string()
}

fn default_font_dir() -> String {
    "fonts".to_string()
}

fn default_font_partial() -> String {
    "styles/_icons.css".to_string()
}

fn default_font_name() -> String {
    "icons".to_string()
}

impl Default for IconsSection {
    fn default() -> Self {
        Self {
            dir: default_icons_dir(),
            sprite_svg: default_sprite_svg(),
            sprite_partial: default_sprite_partial(),
            font_dir: default_font_dir(),
            font_partial: default_font_partial(),
            font_name: default_font_name(),
            font_cmd: None,
        }
    }
}

impl Default for RawConfigFile {
    fn default() -> Self {
        Self {
            project: ProjectSection::default(),
            server: ServerSection::default(),
            watch: WatchSection::default(),
            html: HtmlSection::default(),
            style: StyleSection::default(),
            js: JsSection::default(),
            assets: AssetsSection::default(),
            icons: IconsSection::default(),
        }
    }
}
