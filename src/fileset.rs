// src/fileset.rs

//! Glob compilation and file-set collection.
//!
//! A file-set is the ephemeral, ordered list of paths a task reads at
//! invocation time. Collection walks the given root, matches relative
//! paths (with `/` separators) against a compiled [`GlobSet`], and sorts
//! the result so repeated runs see the same order.

use std::path::{Path, PathBuf};

use anyhow::Context;
use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::errors::{Result, SitepipeError};

/// Build a `GlobSet` from simple string patterns.
pub fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat)
            .with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build().map_err(anyhow::Error::from)?)
}

/// Normalise a path relative to `root` into a `/`-separated string, or
/// `None` if the path is outside `root`.
pub fn relative_str(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    Some(rel.to_string_lossy().replace('\\', "/"))
}

/// Collect all files under `root` whose root-relative path matches `set`.
///
/// Returns absolute paths, sorted. Fails if `root` does not exist; an
/// empty result is reported via [`SitepipeError::EmptyFileSet`] with the
/// given pattern description, since every task here treats a glob miss as
/// a failure rather than a silent no-op.
pub fn collect(root: &Path, set: &GlobSet, pattern_desc: &str) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(SitepipeError::MissingInput(root.to_path_buf()));
    }

    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_dir() {
                stack.push(path);
            } else if path.is_file() {
                if let Some(rel) = relative_str(root, &path) {
                    if set.is_match(&rel) {
                        files.push(path);
                    }
                }
            }
        }
    }

    if files.is_empty() {
        return Err(SitepipeError::EmptyFileSet {
            pattern: pattern_desc.to_string(),
            root: root.to_path_buf(),
        });
    }

    files.sort();
    Ok(files)
}

/// Convenience for a single-pattern collection.
pub fn collect_pattern(root: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let set = build_globset(std::slice::from_ref(&pattern.to_string()))?;
    collect(root, &set, pattern)
}

/// Resolve an explicit ordered file list against a base directory,
/// failing on the first missing entry. Order is preserved; this is what
/// the vendor bundle tasks use.
pub fn resolve_listed(base: &Path, files: &[String]) -> Result<Vec<PathBuf>> {
    let mut resolved = Vec::with_capacity(files.len());
    for file in files {
        let path = base.join(file);
        if !path.is_file() {
            return Err(SitepipeError::MissingInput(path));
        }
        resolved.push(path);
    }
    Ok(resolved)
}

/// The static directory prefix of a glob pattern: the leading components
/// that contain no glob metacharacters. Outputs mirror input paths
/// relative to this base, the way `styles/**/*.css` maps
/// `styles/a/b.css` to `a/b.css`.
pub fn glob_base(pattern: &str) -> String {
    let mut parts = Vec::new();
    for part in pattern.split('/') {
        if part.contains(['*', '?', '[', '{']) {
            break;
        }
        parts.push(part);
    }
    parts.join("/")
}

/// Path of `file` relative to `root`/`base`, `/`-separated.
pub fn rel_under_base(root: &Path, base: &str, file: &Path) -> Option<String> {
    let full_base = if base.is_empty() {
        root.to_path_buf()
    } else {
        root.join(base)
    };
    relative_str(&full_base, file)
}

/// Whether a file name marks a partial (leading underscore), i.e. an
/// input that is included by other files rather than built on its own.
pub fn is_partial(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('_'))
        .unwrap_or(false)
}
