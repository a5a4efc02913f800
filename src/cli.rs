// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `sitepipe`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "sitepipe",
    version,
    about = "Build front-end assets, watch sources, and serve with live reload.",
    long_about = None
)]
pub struct CliArgs {
    /// Tasks to run, in order. Known names: html, style, style-libs, js,
    /// js-libs, copy, svg-sprite, icon-fonts, build, watch, serve, default.
    #[arg(value_name = "TASK", default_values_t = vec!["default".to_string()])]
    pub tasks: Vec<String>,

    /// Path to the config file (TOML).
    ///
    /// Default: `Sitepipe.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Sitepipe.toml")]
    pub config: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SITEPIPE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the resolved task table, but don't run
    /// anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
