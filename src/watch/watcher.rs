// src/watch/watcher.rs

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use notify::RecursiveMode;
use notify_debouncer_mini::{DebouncedEventKind, new_debouncer};
use tracing::{debug, error, info, warn};

use crate::compose::registry::run_task;
use crate::errors::Result;
use crate::fileset::relative_str;
use crate::pipeline::PipelineCtx;
use crate::watch::bindings::{build_bindings, tasks_for_batch};

/// Run the watch orchestrator until the process is terminated.
///
/// One recursive debounced subscription on the source root; every
/// debounced batch is matched against the bindings and each matched
/// task runs exactly once per batch. Task failures are logged and
/// watching continues -- the operator fixes the source file, which
/// re-fires the binding.
pub async fn run(ctx: Arc<PipelineCtx>) -> Result<()> {
    let bindings = build_bindings(&ctx.cfg)?;
    let root = ctx.src_dir();
    // Canonicalize once so event paths relativize cleanly.
    let root = root.canonicalize().unwrap_or(root);

    let debounce = Duration::from_millis(ctx.cfg.watch.debounce_ms);

    // Channel from the debouncer's thread into the async world.
    let (batch_tx, mut batch_rx) =
        tokio::sync::mpsc::unbounded_channel::<Vec<PathBuf>>();
    let (event_tx, event_rx) = std::sync::mpsc::channel();

    let mut debouncer =
        new_debouncer(debounce, event_tx).context("creating file watcher")?;
    debouncer
        .watcher()
        .watch(&root, RecursiveMode::Recursive)
        .with_context(|| format!("watching {root:?}"))?;

    info!(root = ?root, debounce_ms = debounce.as_millis() as u64, "file watcher started");

    std::thread::spawn(move || {
        while let Ok(result) = event_rx.recv() {
            match result {
                Ok(events) => {
                    let paths: Vec<PathBuf> = events
                        .into_iter()
                        .filter(|e| matches!(e.kind, DebouncedEventKind::Any))
                        .map(|e| e.path)
                        .collect();
                    if paths.is_empty() {
                        continue;
                    }
                    if batch_tx.send(paths).is_err() {
                        // Orchestrator is gone; stop forwarding.
                        break;
                    }
                }
                Err(errors) => {
                    warn!(?errors, "file watch error");
                }
            }
        }
        debug!("watch event bridge finished");
    });

    while let Some(paths) = batch_rx.recv().await {
        let rels: Vec<String> = paths
            .iter()
            .filter_map(|p| relative_str(&root, p))
            .collect();
        debug!(?rels, "debounced event batch");

        let tasks = tasks_for_batch(&bindings, rels.iter().map(|s| s.as_str()));
        if tasks.is_empty() {
            continue;
        }

        for task in tasks {
            debug!(task, "watch match; re-running task");
            if let Err(err) = Box::pin(run_task(task.to_string(), Arc::clone(&ctx))).await {
                if err.is_transform() {
                    warn!(task, %err, "transform failed; watching continues");
                } else {
                    error!(task, %err, "task failed; watching continues");
                }
            }
        }
    }

    // Keep the debouncer alive for the whole loop.
    drop(debouncer);
    info!("watch event channel closed; watcher exiting");
    Ok(())
}
