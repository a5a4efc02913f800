// src/serve/mod.rs

//! Development server.
//!
//! Serves `out_dir` as static content and pushes reload signals from the
//! [`ReloadHub`] to connected browsers over a WebSocket at
//! `/__livereload`. Headless: no UI, no desktop notifications. A bind
//! failure is fatal and terminates the run.

pub mod client;
pub mod reload;

use std::path::PathBuf;

use anyhow::Context;
use axum::Router;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use tokio::sync::broadcast::error::RecvError;
use tower_http::services::ServeDir;
use tracing::{debug, info, warn};

use crate::errors::Result;
pub use reload::{ReloadHub, ReloadSignal};

/// Run the dev server until the process is terminated.
///
/// `out_dir` is served at `/`; the reload channel lives on
/// `/__livereload` with the client snippet at `/__livereload.js`.
pub async fn run(host: &str, port: u16, out_dir: PathBuf, hub: ReloadHub) -> Result<()> {
    let app = Router::new()
        .route("/__livereload", get(ws_handler))
        .route("/__livereload.js", get(client_js))
        .fallback_service(ServeDir::new(&out_dir))
        .with_state(hub);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding dev server to {addr}"))?;

    info!(%addr, out_dir = ?out_dir, "dev server listening");

    axum::serve(listener, app)
        .await
        .context("dev server failed")?;

    Ok(())
}

async fn client_js() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        client::CLIENT_JS,
    )
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(hub): State<ReloadHub>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| client_session(socket, hub))
}

/// One connected browser. Forwards hub signals until the socket closes;
/// a lagged receiver just skips to the newest signal.
async fn client_session(mut socket: WebSocket, hub: ReloadHub) {
    let mut rx = hub.subscribe();
    debug!(clients = hub.receiver_count(), "reload client connected");

    loop {
        tokio::select! {
            signal = rx.recv() => {
                let signal = match signal {
                    Ok(s) => s,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "reload client lagged; skipping signals");
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                };
                let payload = match serde_json::to_string(&signal) {
                    Ok(p) => p,
                    Err(err) => {
                        warn!(%err, "failed to serialize reload signal");
                        continue;
                    }
                };
                if socket.send(Message::Text(payload.into())).await.is_err() {
                    break;
                }
            }
            incoming = socket.recv() => {
                // Clients don't send anything meaningful; any close or
                // error ends the session.
                match incoming {
                    Some(Ok(_)) => continue,
                    _ => break,
                }
            }
        }
    }

    debug!("reload client disconnected");
}
