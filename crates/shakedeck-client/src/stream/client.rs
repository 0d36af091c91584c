//! Background SSE connection for a task's live log stream.
//!
//! A [`LogStream`] owns one HTTP request. A background task reads the body,
//! decodes SSE frames and forwards [`TransportEvent`]s through a bounded
//! channel. The transport never reconnects on its own: after `Failed` the
//! task exits and the owner decides what happens next.
//!
//! ```text
//! GET /logs/task/{id}/stream ──▶ bytes_stream ──▶ SseDecoder ──▶ event_rx
//! ```

use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CACHE_CONTROL};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use url::Url;

use shakedeck_core::prelude::*;
use shakedeck_core::TransportEvent;

use super::sse::SseDecoder;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Capacity of the event channel (bounded, log bursts are common).
const EVENT_CHANNEL_CAPACITY: usize = 256;

// ---------------------------------------------------------------------------
// LogStream
// ---------------------------------------------------------------------------

/// A live connection to one task's log stream.
///
/// Dropping the stream aborts the background task, which closes the HTTP
/// connection.
pub struct LogStream {
    event_rx: mpsc::Receiver<TransportEvent>,
    task: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for LogStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogStream")
            .field("running", &self.task.as_ref().map(|t| !t.is_finished()))
            .finish()
    }
}

impl LogStream {
    /// Start streaming from `url` using `http`.
    ///
    /// Returns immediately; the outcome of the request is reported as the
    /// first event (`Opened` or `Failed`). `http` must not carry an overall
    /// request timeout or long-lived streams would be cut off.
    pub fn connect(http: reqwest::Client, url: Url) -> Self {
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let task = tokio::spawn(run_stream_task(http, url, event_tx));
        Self {
            event_rx,
            task: Some(task),
        }
    }

    /// Wrap an existing receiver. Lets callers script a transport in tests.
    #[cfg(any(test, feature = "test-helpers"))]
    pub fn from_receiver(event_rx: mpsc::Receiver<TransportEvent>) -> Self {
        Self {
            event_rx,
            task: None,
        }
    }

    /// Wait for the next transport event. `None` once the stream is closed
    /// and drained.
    pub async fn recv(&mut self) -> Option<TransportEvent> {
        self.event_rx.recv().await
    }

    /// Stop the background task and drop the connection.
    pub fn close(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.event_rx.close();
    }
}

impl Drop for LogStream {
    fn drop(&mut self) {
        self.close();
    }
}

// ---------------------------------------------------------------------------
// Background task
// ---------------------------------------------------------------------------

async fn run_stream_task(http: reqwest::Client, url: Url, event_tx: mpsc::Sender<TransportEvent>) {
    debug!("Log stream: connecting to {}", url);

    let response = match http
        .get(url.clone())
        .header(ACCEPT, "text/event-stream")
        .header(CACHE_CONTROL, "no-cache")
        .send()
        .await
    {
        Ok(response) => response,
        Err(err) => {
            warn!("Log stream: request to {} failed: {}", url, err);
            let _ = event_tx.send(TransportEvent::Failed(err.to_string())).await;
            return;
        }
    };

    let status = response.status();
    if !status.is_success() {
        warn!("Log stream: server answered {} for {}", status, url);
        let _ = event_tx
            .send(TransportEvent::Failed(format!("server answered {status}")))
            .await;
        return;
    }

    if event_tx.send(TransportEvent::Opened).await.is_err() {
        return;
    }
    info!("Log stream: connected to {}", url);

    let mut decoder = SseDecoder::new();
    let mut body = response.bytes_stream();

    loop {
        match body.next().await {
            Some(Ok(chunk)) => {
                for frame in decoder.push(&chunk) {
                    if !frame.is_message() {
                        trace!("Log stream: ignoring named event {:?}", frame.event);
                        continue;
                    }
                    if event_tx.send(TransportEvent::Message(frame.data)).await.is_err() {
                        debug!("Log stream: receiver dropped, stopping");
                        return;
                    }
                }
            }
            Some(Err(err)) => {
                warn!("Log stream: read error: {}", err);
                let _ = event_tx.send(TransportEvent::Failed(err.to_string())).await;
                return;
            }
            None => {
                debug!("Log stream: server closed the stream");
                let _ = event_tx
                    .send(TransportEvent::Failed("stream closed by server".to_string()))
                    .await;
                return;
            }
        }
    }
}
