// src/compose/mod.rs

//! Task graph composition.
//!
//! Tasks are composed into an explicit tree of [`Node`]s with two
//! operators: [`Node::AllOf`] runs its children concurrently and
//! completes when all complete; [`Node::Sequence`] runs children in
//! strict order, each starting only after the previous one finished
//! successfully. The tree is executed by [`run_node`] against a
//! [`TaskRunner`], which production code implements by dispatching into
//! the pipeline registry and tests can replace with a recording fake.
//!
//! Failure semantics: a `Sequence` stops at the first failing child; an
//! `AllOf` fails as soon as any child fails (remaining siblings are
//! dropped at their next await point). Nothing is retried.

pub mod registry;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

use tokio::task::JoinSet;
use tracing::{error, info};

use crate::errors::Result;
use crate::pipeline::PipelineCtx;

pub use registry::{RegistryRunner, TaskRegistry, TaskSpec, run_task};

/// Canonical task name type used throughout the composer.
pub type TaskName = String;

/// A composition tree over named tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Task(TaskName),
    /// Run all children concurrently; complete when all complete.
    AllOf(Vec<Node>),
    /// Run children in strict order.
    Sequence(Vec<Node>),
}

/// Trait abstracting how a named task is executed.
///
/// Production code uses [`RegistryRunner`]; tests can provide their own
/// implementation that records invocations instead of building assets.
pub trait TaskRunner: Send + Sync + 'static {
    fn run(
        &self,
        task: TaskName,
        ctx: Arc<PipelineCtx>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send>>;
}

/// Execute a composition tree.
pub fn run_node(
    node: Node,
    ctx: Arc<PipelineCtx>,
    runner: Arc<dyn TaskRunner>,
) -> Pin<Box<dyn Future<Output = Result<()>> + Send>> {
    Box::pin(async move {
        match node {
            Node::Task(name) => {
                info!(task = %name, "task starting");
                let started = Instant::now();
                match runner.run(name.clone(), ctx).await {
                    Ok(()) => {
                        info!(
                            task = %name,
                            elapsed_ms = started.elapsed().as_millis() as u64,
                            "task finished"
                        );
                        Ok(())
                    }
                    Err(err) => {
                        error!(task = %name, %err, "task failed");
                        Err(err)
                    }
                }
            }
            Node::Sequence(children) => {
                for child in children {
                    run_node(child, Arc::clone(&ctx), Arc::clone(&runner)).await?;
                }
                Ok(())
            }
            Node::AllOf(children) => {
                let mut set = JoinSet::new();
                for child in children {
                    set.spawn(run_node(child, Arc::clone(&ctx), Arc::clone(&runner)));
                }
                while let Some(joined) = set.join_next().await {
                    let result = joined
                        .map_err(|e| anyhow::anyhow!("task panicked: {e}"))
                        .map_err(crate::errors::SitepipeError::from)?;
                    // Fail fast: dropping the JoinSet aborts the
                    // remaining siblings.
                    result?;
                }
                Ok(())
            }
        }
    })
}
