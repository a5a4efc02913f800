use std::error::Error;

use sitepipe::serve::{ReloadHub, ReloadSignal};

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn signals_serialize_to_the_wire_shape() -> TestResult {
    assert_eq!(
        serde_json::to_string(&ReloadSignal::Reload)?,
        r#"{"kind":"reload"}"#
    );
    assert_eq!(
        serde_json::to_string(&ReloadSignal::Inject {
            paths: vec!["css/main.css".to_string()]
        })?,
        r#"{"kind":"inject","paths":["css/main.css"]}"#
    );
    Ok(())
}

#[tokio::test]
async fn every_subscriber_receives_each_signal() -> TestResult {
    let hub = ReloadHub::new();
    let mut first = hub.subscribe();
    let mut second = hub.subscribe();

    hub.notify(ReloadSignal::Reload);

    assert_eq!(first.recv().await?, ReloadSignal::Reload);
    assert_eq!(second.recv().await?, ReloadSignal::Reload);
    Ok(())
}

#[test]
fn notifying_without_subscribers_is_a_no_op() {
    let hub = ReloadHub::new();
    // Must not panic or error; the signal is just dropped.
    hub.notify(ReloadSignal::Inject { paths: Vec::new() });
    assert_eq!(hub.receiver_count(), 0);
}

#[tokio::test]
async fn late_subscribers_miss_earlier_signals() -> TestResult {
    let hub = ReloadHub::new();
    hub.notify(ReloadSignal::Reload);

    let mut rx = hub.subscribe();
    hub.notify(ReloadSignal::Inject {
        paths: vec!["css/a.css".to_string()],
    });

    // Only the signal published after subscribing arrives.
    assert_eq!(
        rx.recv().await?,
        ReloadSignal::Inject {
            paths: vec!["css/a.css".to_string()]
        }
    );
    assert!(rx.try_recv().is_err());
    Ok(())
}
