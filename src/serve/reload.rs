// src/serve/reload.rs

//! The reload channel between pipelines and connected browsers.
//!
//! Pipelines publish a [`ReloadSignal`] when they finish writing output;
//! the dev server forwards each signal to every connected WebSocket
//! client. Stylesheet builds publish [`ReloadSignal::Inject`] so browsers
//! can swap the affected `<link>`s in place; everything else publishes a
//! full [`ReloadSignal::Reload`].

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

/// Signal pushed to connected browser clients, serialized as JSON on the
/// WebSocket.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ReloadSignal {
    /// Full page reload.
    Reload,
    /// In-place stylesheet swap for the given out_dir-relative paths.
    Inject { paths: Vec<String> },
}

/// Fan-out hub backed by a broadcast channel.
///
/// Cheap to clone; pipelines hold one end, each WebSocket session
/// subscribes its own receiver. Publishing with no connected clients is
/// fine (the signal is simply dropped).
#[derive(Debug, Clone)]
pub struct ReloadHub {
    tx: broadcast::Sender<ReloadSignal>,
}

impl ReloadHub {
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(64);
        Self { tx }
    }

    /// Publish a signal to all connected clients.
    pub fn notify(&self, signal: ReloadSignal) {
        let receivers = self.tx.receiver_count();
        debug!(?signal, receivers, "publishing reload signal");
        // Err just means nobody is listening right now.
        let _ = self.tx.send(signal);
    }

    /// Subscribe a new client session.
    pub fn subscribe(&self) -> broadcast::Receiver<ReloadSignal> {
        self.tx.subscribe()
    }

    /// Number of currently connected client sessions.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ReloadHub {
    fn default() -> Self {
        Self::new()
    }
}
