use std::io;
use std::panic::AssertUnwindSafe;
use std::sync::{mpsc, Arc};
use std::thread;

use finder_logging::{finder_error, finder_info, finder_warn};
use futures_util::FutureExt;

use crate::search::JobSearchClient;
use crate::{EngineEvent, FailureKind, RequestId, SearchError};

enum EngineCommand {
    Search { request_id: RequestId, query: String },
}

/// Runs searches on a background tokio runtime.
///
/// Requests run concurrently and are never cancelled; each one produces
/// exactly one `EngineEvent::SearchCompleted`, in completion order.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(client: Arc<dyn JobSearchClient>) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;

        thread::Builder::new()
            .name("finder-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let client = client.clone();
                    let event_tx = event_tx.clone();
                    runtime.spawn(async move {
                        handle_command(client.as_ref(), command, event_tx).await;
                    });
                }
            })?;

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn search(&self, request_id: RequestId, query: impl Into<String>) {
        let command = EngineCommand::Search {
            request_id,
            query: query.into(),
        };
        if self.cmd_tx.send(command).is_err() {
            finder_warn!("Search {} dropped: engine thread has stopped", request_id);
        }
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: std::time::Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_command(
    client: &dyn JobSearchClient,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Search { request_id, query } => {
            finder_info!(
                "Search {} started query_len={} query={}",
                request_id,
                query.len(),
                finder_logging::clip_for_log(&query, 64)
            );
            let result = AssertUnwindSafe(client.search(&query))
                .catch_unwind()
                .await
                .unwrap_or_else(|panic| {
                    let message = panic_message(panic.as_ref());
                    finder_error!("Search {} panicked: {}", request_id, message);
                    Err(SearchError::new(FailureKind::Internal, message))
                });
            if let Err(err) = &result {
                finder_warn!("Search {} failed: {}", request_id, err);
            }
            let _ = event_tx.send(EngineEvent::SearchCompleted { request_id, result });
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "search task panicked".to_string()
    }
}
