use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use sitepipe::compose::registry::{CONTENT_TASKS, build_graph, default_graph};
use sitepipe::compose::{Node, TaskName, TaskRegistry, TaskRunner, run_node};
use sitepipe::config::model::RawConfigFile;
use sitepipe::config::ConfigFile;
use sitepipe::errors::{Result as PipeResult, SitepipeError};
use sitepipe::pipeline::PipelineCtx;
use sitepipe::serve::ReloadHub;

fn test_ctx() -> Arc<PipelineCtx> {
    let cfg = ConfigFile::try_from(RawConfigFile::default()).unwrap();
    Arc::new(PipelineCtx::new(cfg, ReloadHub::new()))
}

/// Runner that records start/end events instead of building anything.
struct RecordingRunner {
    events: Arc<Mutex<Vec<String>>>,
    fail: Option<&'static str>,
}

impl TaskRunner for RecordingRunner {
    fn run(
        &self,
        task: TaskName,
        _ctx: Arc<PipelineCtx>,
    ) -> Pin<Box<dyn Future<Output = PipeResult<()>> + Send>> {
        let events = Arc::clone(&self.events);
        let fail = self.fail;
        Box::pin(async move {
            events.lock().unwrap().push(format!("start:{task}"));
            tokio::time::sleep(Duration::from_millis(10)).await;
            events.lock().unwrap().push(format!("end:{task}"));
            if fail == Some(task.as_str()) {
                return Err(SitepipeError::Config(format!("{task} was told to fail")));
            }
            Ok(())
        })
    }
}

#[test]
fn default_graph_is_build_then_watch_and_serve() {
    let expected = Node::Sequence(vec![
        Node::AllOf(
            CONTENT_TASKS
                .iter()
                .map(|t| Node::Task(t.to_string()))
                .collect(),
        ),
        Node::AllOf(vec![
            Node::Task("watch".to_string()),
            Node::Task("serve".to_string()),
        ]),
    ]);

    assert_eq!(default_graph(), expected);
}

#[test]
fn registry_resolves_composites_and_rejects_unknown_names() {
    let registry = TaskRegistry::standard();

    assert_eq!(registry.resolve("build").unwrap(), build_graph());
    assert_eq!(
        registry.resolve("style").unwrap(),
        Node::Task("style".to_string())
    );

    let err = registry.resolve("stylez").unwrap_err();
    assert!(matches!(err, SitepipeError::UnknownTask(name) if name == "stylez"));
}

#[tokio::test]
async fn sequence_phase_starts_only_after_concurrent_group_completes() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let runner = Arc::new(RecordingRunner {
        events: Arc::clone(&events),
        fail: None,
    });

    let node = Node::Sequence(vec![
        Node::AllOf(vec![
            Node::Task("a".to_string()),
            Node::Task("b".to_string()),
            Node::Task("c".to_string()),
        ]),
        Node::Task("late".to_string()),
    ]);

    run_node(node, test_ctx(), runner).await.unwrap();

    let events = events.lock().unwrap();
    let late_start = events
        .iter()
        .position(|e| e == "start:late")
        .expect("late task ran");
    for task in ["a", "b", "c"] {
        let end = events
            .iter()
            .position(|e| e == &format!("end:{task}"))
            .expect("group task finished");
        assert!(
            end < late_start,
            "{task} must finish before the next phase starts ({events:?})"
        );
    }
}

#[tokio::test]
async fn failing_child_fails_the_group_and_stops_the_sequence() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let runner = Arc::new(RecordingRunner {
        events: Arc::clone(&events),
        fail: Some("b"),
    });

    let node = Node::Sequence(vec![
        Node::AllOf(vec![
            Node::Task("a".to_string()),
            Node::Task("b".to_string()),
        ]),
        Node::Task("late".to_string()),
    ]);

    let err = run_node(node, test_ctx(), runner).await.unwrap_err();
    assert!(err.to_string().contains("told to fail"));

    let events = events.lock().unwrap();
    assert!(
        !events.iter().any(|e| e == "start:late"),
        "sequence must stop after a failed group ({events:?})"
    );
}

#[tokio::test]
async fn sequence_runs_children_in_order() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let runner = Arc::new(RecordingRunner {
        events: Arc::clone(&events),
        fail: None,
    });

    let node = Node::Sequence(vec![
        Node::Task("one".to_string()),
        Node::Task("two".to_string()),
    ]);

    run_node(node, test_ctx(), runner).await.unwrap();

    let events = events.lock().unwrap();
    assert_eq!(
        *events,
        vec![
            "start:one".to_string(),
            "end:one".to_string(),
            "start:two".to_string(),
            "end:two".to_string(),
        ]
    );
}
