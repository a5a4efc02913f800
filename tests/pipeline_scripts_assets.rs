use std::error::Error;
use std::path::Path;

use sitepipe::config::ConfigFile;
use sitepipe::config::model::RawConfigFile;
use sitepipe::errors::SitepipeError;
use sitepipe::pipeline::{PipelineCtx, assets, scripts};
use sitepipe::serve::{ReloadHub, ReloadSignal};
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
async fn unconfigured_filters_are_identity_passes() -> TestResult {
    let dir = tempfile::tempdir()?;
    write(&dir.path().join("app/js/main.js"), "const x = 1;\n");

    let ctx = ctx_for(dir.path(), "");
    scripts::run(&ctx).await?;

    let plain = std::fs::read(dir.path().join("dist/js/main.js"))?;
    let min = std::fs::read(dir.path().join("dist/js/main.min.js"))?;
    assert_eq!(plain, b"const x = 1;\n");
    assert_eq!(min, plain);

    Ok(())
}

#[tokio::test]
async fn minify_filter_shrinks_the_suffixed_artifact() -> TestResult {
    let dir = tempfile::tempdir()?;
    write(&dir.path().join("app/js/main.js"), "const  x  =  1 ;\n");

    let ctx = ctx_for(dir.path(), "[js]\nminify = \"tr -d ' '\"");
    scripts::run(&ctx).await?;

    let plain = std::fs::read(dir.path().join("dist/js/main.js"))?;
    let min = std::fs::read(dir.path().join("dist/js/main.min.js"))?;
    assert_eq!(min, b"constx=1;\n");
    assert!(min.len() <= plain.len());

    Ok(())
}

#[tokio::test]
async fn failing_filter_writes_nothing() -> TestResult {
    let dir = tempfile::tempdir()?;
    write(&dir.path().join("app/js/main.js"), "const x = 1;\n");

    // `false` exits non-zero without output.
    let ctx = ctx_for(dir.path(), "[js]\ntranspile = \"false\"");
    let err = scripts::run(&ctx).await.unwrap_err();
    assert!(err.is_transform(), "expected a transform error, got: {err}");
    assert!(!dir.path().join("dist/js/main.js").exists());
    assert!(!dir.path().join("dist/js/main.min.js").exists());

    Ok(())
}

#[tokio::test]
async fn missing_entry_script_is_an_error() -> TestResult {
    let dir = tempfile::tempdir()?;
    std::fs::create_dir_all(dir.path().join("app"))?;

    let ctx = ctx_for(dir.path(), "");
    let err = scripts::run(&ctx).await.unwrap_err();
    assert!(matches!(err, SitepipeError::MissingInput(_)));

    Ok(())
}

#[tokio::test]
async fn copy_mirrors_relative_paths_exactly() -> TestResult {
    let dir = tempfile::tempdir()?;
    write(&dir.path().join("app/images/a/b.png"), "png-bytes");
    write(&dir.path().join("app/fonts/body.woff2"), "woff-bytes");

    let ctx = ctx_for(dir.path(), "");
    assets::run(&ctx).await?;

    assert_eq!(
        std::fs::read_to_string(dir.path().join("dist/images/a/b.png"))?,
        "png-bytes"
    );
    assert_eq!(
        std::fs::read_to_string(dir.path().join("dist/fonts/body.woff2"))?,
        "woff-bytes"
    );

    Ok(())
}

#[tokio::test]
async fn copy_sends_one_coalesced_reload_per_invocation() -> TestResult {
    let dir = tempfile::tempdir()?;
    write(&dir.path().join("app/images/a.png"), "a");
    write(&dir.path().join("app/images/b.png"), "b");
    write(&dir.path().join("app/fonts/c.woff"), "c");

    let ctx = ctx_for(dir.path(), "");
    let mut rx = ctx.reload.subscribe();
    assets::run(&ctx).await?;

    assert_eq!(rx.try_recv()?, ReloadSignal::Reload);
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));

    Ok(())
}

#[tokio::test]
async fn copy_with_no_matching_assets_is_an_error() -> TestResult {
    let dir = tempfile::tempdir()?;
    std::fs::create_dir_all(dir.path().join("app"))?;

    let ctx = ctx_for(dir.path(), "");
    let err = assets::run(&ctx).await.unwrap_err();
    assert!(matches!(err, SitepipeError::EmptyFileSet { .. }));

    Ok(())
}
