use std::error::Error;

use sitepipe::config::ConfigFile;
use sitepipe::config::model::RawConfigFile;
use sitepipe::watch::{build_bindings, tasks_for_batch};

type TestResult = Result<(), Box<dyn Error>>;

fn default_cfg() -> ConfigFile {
    ConfigFile::try_from(RawConfigFile::default()).unwrap()
}

#[test]
fn standard_bindings_cover_content_pipelines_only() -> TestResult {
    let bindings = build_bindings(&default_cfg())?;

    let tasks: Vec<_> = bindings.iter().map(|b| b.task()).collect();
    assert_eq!(tasks, vec!["html", "style", "js", "copy"]);

    Ok(())
}

#[test]
fn paths_match_their_bound_task() -> TestResult {
    let bindings = build_bindings(&default_cfg())?;

    assert_eq!(tasks_for_batch(&bindings, ["index.hbs"]), vec!["html"]);
    assert_eq!(tasks_for_batch(&bindings, ["sub/about.hbs"]), vec!["html"]);
    assert_eq!(tasks_for_batch(&bindings, ["styles/main.css"]), vec!["style"]);
    assert_eq!(
        tasks_for_batch(&bindings, ["styles/nested/part.css"]),
        vec!["style"]
    );
    assert_eq!(tasks_for_batch(&bindings, ["js/main.js"]), vec!["js"]);
    assert_eq!(tasks_for_batch(&bindings, ["images/a/b.png"]), vec!["copy"]);
    assert_eq!(tasks_for_batch(&bindings, ["fonts/body.woff2"]), vec!["copy"]);

    Ok(())
}

#[test]
fn generated_style_partials_refire_the_style_binding() -> TestResult {
    let bindings = build_bindings(&default_cfg())?;

    // The sprite task writes styles/_sprite.css into the source tree;
    // the style task picks it up like any other stylesheet change.
    assert_eq!(
        tasks_for_batch(&bindings, ["styles/_sprite.css"]),
        vec!["style"]
    );

    Ok(())
}

#[test]
fn a_batch_triggers_each_task_at_most_once() -> TestResult {
    let bindings = build_bindings(&default_cfg())?;

    // Many rapid saves of stylesheet files coalesce to one style run.
    let batch = ["styles/a.css", "styles/b.css", "styles/c.css"];
    assert_eq!(tasks_for_batch(&bindings, batch), vec!["style"]);

    Ok(())
}

#[test]
fn a_mixed_batch_triggers_tasks_in_binding_order() -> TestResult {
    let bindings = build_bindings(&default_cfg())?;

    let batch = ["js/app.js", "styles/a.css", "images/logo.png"];
    assert_eq!(
        tasks_for_batch(&bindings, batch),
        vec!["style", "js", "copy"]
    );

    Ok(())
}

#[test]
fn unbound_paths_trigger_nothing() -> TestResult {
    let bindings = build_bindings(&default_cfg())?;

    assert!(tasks_for_batch(&bindings, ["README.md"]).is_empty());
    // Vendor bundles and icon sources are not watched.
    assert!(tasks_for_batch(&bindings, ["icons/home.svg"]).is_empty());

    Ok(())
}

#[test]
fn bindings_follow_config_overrides() -> TestResult {
    let raw: RawConfigFile = toml::from_str(
        r#"
        [html]
        pages = "pages/**/*.hbs"

        [js]
        watch = "scripts/**/*.js"
        "#,
    )
    .unwrap();
    let cfg = ConfigFile::try_from(raw)?;
    let bindings = build_bindings(&cfg)?;

    assert_eq!(tasks_for_batch(&bindings, ["pages/index.hbs"]), vec!["html"]);
    assert!(tasks_for_batch(&bindings, ["index.hbs"]).is_empty());
    assert_eq!(tasks_for_batch(&bindings, ["scripts/a.js"]), vec!["js"]);

    Ok(())
}
