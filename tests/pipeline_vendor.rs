use std::error::Error;
use std::path::Path;

use sitepipe::config::ConfigFile;
use sitepipe::config::model::RawConfigFile;
use sitepipe::errors::SitepipeError;
use sitepipe::pipeline::{PipelineCtx, vendor};
use sitepipe::serve::ReloadHub;
use tokio::sync::broadcast::error::TryRecvError;

type TestResult = Result<(), Box<dyn Error>>;

fn ctx_for(root: &Path, extra: &str) -> PipelineCtx {
    let toml = format!(
        r#"
        [project]
        src_dir = "{src}"
        out_dir = "{out}"
        {extra}
        "#,
        src = root.join("app").display(),
        out = root.join("dist").display(),
    );
    let raw: RawConfigFile = toml::from_str(&toml).unwrap();
    let cfg = ConfigFile::try_from(raw).unwrap();
    PipelineCtx::new(cfg, ReloadHub::new())
}

fn write(path: &Path, contents: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}

#[tokio::test]
async fn style_libs_concatenates_and_minifies() -> TestResult {
    let dir = tempfile::tempdir()?;
    let a = dir.path().join("vendor/slider.css");
    let b = dir.path().join("vendor/lightbox.css");
    write(&a, ".slider {\n  color: red;\n}\n");
    write(&b, ".lightbox {\n  color: blue;\n}\n");

    let extra = format!(
        "[style.libs]\nfiles = [\"{}\", \"{}\"]\nout = \"lib.min.css\"",
        a.display(),
        b.display()
    );
    let ctx = ctx_for(dir.path(), &extra);
    vendor::style_libs(&ctx).await?;

    let bundled = std::fs::read_to_string(dir.path().join("dist/css/lib.min.css"))?;
    assert!(bundled.contains(".slider"));
    assert!(bundled.contains(".lightbox"));
    // Concatenation order follows the config list.
    assert!(bundled.find(".slider").unwrap() < bundled.find(".lightbox").unwrap());
    // Minified: smaller than the raw concatenation.
    let raw_len = std::fs::read(&a)?.len() + std::fs::read(&b)?.len();
    assert!(bundled.len() < raw_len);

    Ok(())
}

#[tokio::test]
async fn js_libs_concatenates_in_list_order() -> TestResult {
    let dir = tempfile::tempdir()?;
    let a = dir.path().join("vendor/first.js");
    let b = dir.path().join("vendor/second.js");
    write(&a, "var first = 1;");
    write(&b, "var second = 2;");

    let extra = format!(
        "[js.libs]\nfiles = [\"{}\", \"{}\"]\nout = \"lib.min.js\"",
        a.display(),
        b.display()
    );
    let ctx = ctx_for(dir.path(), &extra);
    vendor::js_libs(&ctx).await?;

    let bundled = std::fs::read_to_string(dir.path().join("dist/js/lib.min.js"))?;
    assert!(bundled.find("first").unwrap() < bundled.find("second").unwrap());

    Ok(())
}

#[tokio::test]
async fn vendor_bundles_do_not_notify_the_reload_channel() -> TestResult {
    let dir = tempfile::tempdir()?;
    let a = dir.path().join("vendor/lib.js");
    write(&a, "var lib = 0;");

    let extra = format!("[js.libs]\nfiles = [\"{}\"]\nout = \"lib.min.js\"", a.display());
    let ctx = ctx_for(dir.path(), &extra);
    let mut rx = ctx.reload.subscribe();
    vendor::js_libs(&ctx).await?;

    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    Ok(())
}

#[tokio::test]
async fn missing_vendor_file_is_an_error() -> TestResult {
    let dir = tempfile::tempdir()?;
    let extra = format!(
        "[style.libs]\nfiles = [\"{}\"]\nout = \"lib.min.css\"",
        dir.path().join("vendor/nope.css").display()
    );
    let ctx = ctx_for(dir.path(), &extra);

    let err = vendor::style_libs(&ctx).await.unwrap_err();
    assert!(matches!(err, SitepipeError::MissingInput(_)));

    Ok(())
}

#[tokio::test]
async fn empty_vendor_list_is_a_config_error() -> TestResult {
    let dir = tempfile::tempdir()?;
    let ctx = ctx_for(dir.path(), "");

    let err = vendor::js_libs(&ctx).await.unwrap_err();
    assert!(matches!(err, SitepipeError::Config(_)));

    Ok(())
}
