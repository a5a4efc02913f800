// src/errors.rs

//! Crate-wide error type and helpers.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SitepipeError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown task: {0}")]
    UnknownTask(String),

    #[error("no files matched {pattern:?} under {root:?}")]
    EmptyFileSet { pattern: String, root: PathBuf },

    #[error("missing input file: {0:?}")]
    MissingInput(PathBuf),

    /// A transformation collaborator rejected its input. During watch mode
    /// these are absorbed at the pipeline boundary; in one-shot runs they
    /// abort the run like any other error.
    #[error("{task}: transform failed for {path:?}: {message}")]
    Transform {
        task: &'static str,
        path: PathBuf,
        message: String,
    },

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SitepipeError {
    /// Whether this error came from a transformation collaborator (as
    /// opposed to missing inputs, IO, or config problems).
    pub fn is_transform(&self) -> bool {
        matches!(self, SitepipeError::Transform { .. })
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, SitepipeError>;
