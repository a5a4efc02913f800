// src/watch/mod.rs

//! File watching and task re-triggering.
//!
//! This module is responsible for:
//! - compiling the (pattern set -> task) watch bindings from config,
//! - wiring up a debounced cross-platform filesystem watcher,
//! - re-running the bound tasks once per debounced event batch.
//!
//! It does **not** know how tasks build their outputs; it only turns
//! filesystem changes into task invocations.

pub mod bindings;
pub mod watcher;

pub use bindings::{WatchBinding, build_bindings, tasks_for_batch};
pub use watcher::run;
