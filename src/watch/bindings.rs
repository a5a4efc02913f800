// src/watch/bindings.rs

use std::fmt;

use globset::GlobSet;

use crate::config::ConfigFile;
use crate::errors::Result;
use crate::fileset::build_globset;

/// Compiled watch binding: a glob set and the task it re-runs.
///
/// The patterns are relative to the source root; the watcher passes
/// root-relative `/`-separated paths into [`matches`](Self::matches).
#[derive(Clone)]
pub struct WatchBinding {
    task: &'static str,
    patterns: Vec<String>,
    set: GlobSet,
}

impl fmt::Debug for WatchBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchBinding")
            .field("task", &self.task)
            .field("patterns", &self.patterns)
            .finish_non_exhaustive()
    }
}

impl WatchBinding {
    fn new(task: &'static str, patterns: Vec<String>) -> Result<Self> {
        let set = build_globset(&patterns)?;
        Ok(Self { task, patterns, set })
    }

    pub fn task(&self) -> &'static str {
        self.task
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn matches(&self, rel_path: &str) -> bool {
        self.set.is_match(rel_path)
    }
}

/// Build the standard watch bindings from config.
///
/// Only the content pipelines that track the source tree are bound:
/// templates, stylesheets, scripts, and static assets. Vendor bundles
/// and icon generation are regenerated manually and never watched.
pub fn build_bindings(cfg: &ConfigFile) -> Result<Vec<WatchBinding>> {
    Ok(vec![
        WatchBinding::new("html", vec![cfg.html.pages.clone()])?,
        WatchBinding::new("style", vec![cfg.style.sources.clone()])?,
        WatchBinding::new("js", vec![cfg.js.watch.clone()])?,
        WatchBinding::new("copy", cfg.assets.patterns.clone())?,
    ])
}

/// Tasks to trigger for one debounced event batch: each bound task at
/// most once per batch, in binding order, if any path in the batch
/// matches it.
pub fn tasks_for_batch<'a, I>(bindings: &[WatchBinding], rel_paths: I) -> Vec<&'static str>
where
    I: IntoIterator<Item = &'a str>,
{
    let paths: Vec<&str> = rel_paths.into_iter().collect();
    bindings
        .iter()
        .filter(|b| paths.iter().any(|p| b.matches(p)))
        .map(|b| b.task())
        .collect()
}
