// src/config/mod.rs

//! Configuration loading and validation.
//!
//! - [`model`] holds the serde TOML model (`RawConfigFile`) and the
//!   validated [`model::ConfigFile`] the rest of the crate works with.
//! - [`loader`] reads the file.
//! - [`validate`] turns raw config into validated config.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, load_or_default};
pub use model::ConfigFile;
