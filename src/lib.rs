// src/lib.rs

pub mod cli;
pub mod compose;
pub mod config;
pub mod errors;
pub mod fileset;
pub mod logging;
pub mod pipeline;
pub mod serve;
pub mod watch;

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::cli::CliArgs;
use crate::compose::{Node, RegistryRunner, TaskRegistry, TaskRunner, run_node};
use crate::config::ConfigFile;
use crate::pipeline::PipelineCtx;
use crate::serve::ReloadHub;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the task registry and composition tree for the requested tasks
/// - the shared pipeline context (config + reload channel)
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = config::load_or_default(&args.config)?;
    let registry = TaskRegistry::standard();

    if args.dry_run {
        print_dry_run(&cfg, &registry);
        return Ok(());
    }

    let mut nodes = Vec::with_capacity(args.tasks.len());
    for name in &args.tasks {
        nodes.push(registry.resolve(name)?);
    }
    let node = match nodes.len() {
        1 => nodes.remove(0),
        _ => Node::Sequence(nodes),
    };

    let ctx = Arc::new(PipelineCtx::new(cfg, ReloadHub::new()));
    let runner: Arc<dyn TaskRunner> = Arc::new(RegistryRunner);

    // Ctrl-C -> graceful shutdown. Long-running tasks (watch, serve)
    // have no terminal state of their own.
    tokio::select! {
        result = run_node(node, ctx, runner) => result.map_err(Into::into),
        _ = tokio::signal::ctrl_c() => {
            info!("interrupt received; shutting down");
            Ok(())
        }
    }
}

/// Simple dry-run output: print the resolved config and task table.
fn print_dry_run(cfg: &ConfigFile, registry: &TaskRegistry) {
    println!("sitepipe dry-run");
    println!("  project.src_dir = {}", cfg.project.src_dir);
    println!("  project.out_dir = {}", cfg.project.out_dir);
    println!("  server = {}:{}", cfg.server.host, cfg.server.port);
    println!("  watch.debounce_ms = {}", cfg.watch.debounce_ms);
    println!();

    println!("tasks ({}):", registry.specs().len());
    for spec in registry.specs() {
        println!("  - {:<12} {}", spec.name, spec.summary);
    }
    println!();

    println!("watch bindings:");
    match watch::build_bindings(cfg) {
        Ok(bindings) => {
            for binding in &bindings {
                println!("  {:?} -> {}", binding.patterns(), binding.task());
            }
        }
        Err(err) => println!("  (invalid: {err})"),
    }
}
