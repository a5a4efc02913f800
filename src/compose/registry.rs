// src/compose/registry.rs

//! The task registry: every invokable task name, its dispatch into the
//! pipeline modules, and the standard composition graphs.
//!
//! The registry is an explicit value created at startup and handed to
//! the composer; there is no ambient global task table.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::compose::{Node, TaskName, TaskRunner};
use crate::errors::{Result, SitepipeError};
use crate::pipeline::{self, PipelineCtx};
use crate::serve;
use crate::watch;

/// Static description of one invokable task.
#[derive(Debug, Clone, Copy)]
pub struct TaskSpec {
    pub name: &'static str,
    pub summary: &'static str,
}

/// Content-producing tasks, in the order the default graph lists them.
pub const CONTENT_TASKS: [&str; 6] =
    ["html", "style", "js", "style-libs", "js-libs", "copy"];

const SPECS: [TaskSpec; 12] = [
    TaskSpec { name: "html", summary: "render templates into the output root" },
    TaskSpec { name: "style", summary: "build stylesheets (expanded + minified)" },
    TaskSpec { name: "js", summary: "build the entry script (plain + minified)" },
    TaskSpec { name: "style-libs", summary: "concatenate + minify vendor stylesheets" },
    TaskSpec { name: "js-libs", summary: "concatenate vendor scripts" },
    TaskSpec { name: "copy", summary: "mirror static assets into the output root" },
    TaskSpec { name: "svg-sprite", summary: "assemble the icon sprite + partial" },
    TaskSpec { name: "icon-fonts", summary: "generate icon fonts + partial" },
    TaskSpec { name: "watch", summary: "re-run tasks on source changes" },
    TaskSpec { name: "serve", summary: "serve the output root with live reload" },
    TaskSpec { name: "build", summary: "all content tasks, concurrently" },
    TaskSpec { name: "default", summary: "build, then watch + serve" },
];

/// Registry of invokable tasks.
#[derive(Debug, Clone)]
pub struct TaskRegistry {
    specs: Vec<TaskSpec>,
}

impl TaskRegistry {
    pub fn standard() -> Self {
        Self {
            specs: SPECS.to_vec(),
        }
    }

    pub fn specs(&self) -> &[TaskSpec] {
        &self.specs
    }

    pub fn contains(&self, name: &str) -> bool {
        self.specs.iter().any(|s| s.name == name)
    }

    /// Resolve a CLI task name into a composition node. The composite
    /// names expand into their graphs; everything else becomes a single
    /// task node.
    pub fn resolve(&self, name: &str) -> Result<Node> {
        match name {
            "build" => Ok(build_graph()),
            "default" => Ok(default_graph()),
            n if self.contains(n) => Ok(Node::Task(n.to_string())),
            other => Err(SitepipeError::UnknownTask(other.to_string())),
        }
    }
}

/// All content-producing tasks, concurrently.
pub fn build_graph() -> Node {
    Node::AllOf(
        CONTENT_TASKS
            .iter()
            .map(|t| Node::Task(t.to_string()))
            .collect(),
    )
}

/// The default entry point: every content task concurrently, and only
/// once all of them completed, the watch orchestrator and dev server
/// concurrently.
pub fn default_graph() -> Node {
    Node::Sequence(vec![
        build_graph(),
        Node::AllOf(vec![
            Node::Task("watch".to_string()),
            Node::Task("serve".to_string()),
        ]),
    ])
}

/// Dispatch one task by name. This is the single point the composer and
/// the watch orchestrator both invoke tasks through.
pub async fn run_task(name: TaskName, ctx: Arc<PipelineCtx>) -> Result<()> {
    match name.as_str() {
        "html" => pipeline::html::run(&ctx).await,
        "style" => pipeline::style::run(&ctx).await,
        "js" => pipeline::scripts::run(&ctx).await,
        "style-libs" => pipeline::vendor::style_libs(&ctx).await,
        "js-libs" => pipeline::vendor::js_libs(&ctx).await,
        "copy" => pipeline::assets::run(&ctx).await,
        "svg-sprite" => pipeline::icons::sprite(&ctx).await,
        "icon-fonts" => pipeline::icons::fonts(&ctx).await,
        "watch" => watch::run(ctx.clone()).await,
        "serve" => {
            let host = ctx.cfg.server.host.clone();
            let port = ctx.cfg.server.port;
            serve::run(&host, port, ctx.out_dir(), ctx.reload.clone()).await
        }
        other => Err(SitepipeError::UnknownTask(other.to_string())),
    }
}

/// Production [`TaskRunner`] backed by [`run_task`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistryRunner;

impl TaskRunner for RegistryRunner {
    fn run(
        &self,
        task: TaskName,
        ctx: Arc<PipelineCtx>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send>> {
        Box::pin(run_task(task, ctx))
    }
}
