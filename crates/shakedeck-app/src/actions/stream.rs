//! Executes live log session commands: stream workers and reconnect timers.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use shakedeck_client::LogStream;
use shakedeck_core::prelude::*;
use shakedeck_core::{TaskId, TransportEvent};

use super::{SharedGateway, TaskRegistry};
use crate::log_stream::{SessionId, StreamCommand, StreamToken};
use crate::message::Message;

/// Forwards one transport connection into the message loop
#[derive(Debug)]
pub(crate) struct StreamWorker {
    session_id: SessionId,
    handle: JoinHandle<()>,
}

impl StreamWorker {
    /// Aborting drops the [`LogStream`], which closes the connection.
    pub(crate) fn stop(self) {
        self.handle.abort();
    }
}

/// Pending reconnect for one session
#[derive(Debug)]
pub(crate) struct ReconnectTimer {
    session_id: SessionId,
    handle: JoinHandle<()>,
}

impl ReconnectTimer {
    pub(crate) fn cancel(self) {
        self.handle.abort();
    }
}

pub(crate) fn execute<G: SharedGateway>(
    command: StreamCommand,
    msg_tx: &mpsc::Sender<Message>,
    gateway: &G,
    registry: &mut TaskRegistry,
) {
    match command {
        StreamCommand::Connect { token, task_id } => {
            connect(token, &task_id, msg_tx, gateway, registry)
        }
        StreamCommand::Disconnect { session_id } => disconnect(session_id, registry),
        StreamCommand::ScheduleReconnect { token, delay } => {
            schedule_reconnect(token, delay, msg_tx, registry)
        }
    }
}

fn connect<G: SharedGateway>(
    token: StreamToken,
    task_id: &TaskId,
    msg_tx: &mpsc::Sender<Message>,
    gateway: &G,
    registry: &mut TaskRegistry,
) {
    // one live connection at a time
    if let Some(previous) = registry.stream.take() {
        previous.stop();
    }
    if registry
        .reconnect_timer
        .as_ref()
        .is_some_and(|t| t.session_id == token.session_id)
    {
        if let Some(timer) = registry.reconnect_timer.take() {
            timer.cancel();
        }
    }

    match gateway.open_log_stream(task_id) {
        Ok(stream) => {
            debug!(
                "Opening log stream for task {} (session {}, epoch {})",
                task_id, token.session_id, token.epoch
            );
            let handle = tokio::spawn(forward_events(stream, token, msg_tx.clone()));
            registry.stream = Some(StreamWorker {
                session_id: token.session_id,
                handle,
            });
        }
        Err(e) => {
            // report through the normal failure path so the session retries
            warn!("Could not open log stream for task {}: {}", task_id, e);
            let msg_tx = msg_tx.clone();
            let handle = tokio::spawn(async move {
                let _ = msg_tx
                    .send(Message::LogStreamTransport {
                        token,
                        event: TransportEvent::Failed(e.to_string()),
                    })
                    .await;
            });
            registry.stream = Some(StreamWorker {
                session_id: token.session_id,
                handle,
            });
        }
    }
}

async fn forward_events(mut stream: LogStream, token: StreamToken, msg_tx: mpsc::Sender<Message>) {
    loop {
        let event = stream
            .recv()
            .await
            .unwrap_or_else(|| TransportEvent::Failed("stream closed".to_string()));
        let last = matches!(event, TransportEvent::Failed(_));
        if msg_tx
            .send(Message::LogStreamTransport { token, event })
            .await
            .is_err()
        {
            // engine shutting down
            return;
        }
        if last {
            return;
        }
    }
}

fn disconnect(session_id: SessionId, registry: &mut TaskRegistry) {
    if registry
        .stream
        .as_ref()
        .is_some_and(|w| w.session_id == session_id)
    {
        if let Some(worker) = registry.stream.take() {
            debug!("Closing log stream of session {}", session_id);
            worker.stop();
        }
    }
    if registry
        .reconnect_timer
        .as_ref()
        .is_some_and(|t| t.session_id == session_id)
    {
        if let Some(timer) = registry.reconnect_timer.take() {
            debug!("Cancelling reconnect timer of session {}", session_id);
            timer.cancel();
        }
    }
}

fn schedule_reconnect(
    token: StreamToken,
    delay: Duration,
    msg_tx: &mpsc::Sender<Message>,
    registry: &mut TaskRegistry,
) {
    if let Some(previous) = registry.reconnect_timer.take() {
        previous.cancel();
    }
    info!(
        "Log stream session {} reconnecting in {}ms",
        token.session_id,
        delay.as_millis()
    );
    let msg_tx = msg_tx.clone();
    let handle = tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let _ = msg_tx.send(Message::LogStreamReconnectDue { token }).await;
    });
    registry.reconnect_timer = Some(ReconnectTimer {
        session_id: token.session_id,
        handle,
    });
}
