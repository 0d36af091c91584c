//! One-shot server requests and file exports

use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::mpsc;

use shakedeck_client::user_message;
use shakedeck_core::prelude::*;
use shakedeck_core::{LogQuery, TaskId, TaskInput};

use super::SharedGateway;
use crate::log_stream::{write_export, LogExport};
use crate::message::{Message, TaskOp};

/// Pause between stopping a running task and deleting it, giving the server
/// time to reap the process.
pub const STOP_THEN_DELETE_DELAY: Duration = Duration::from_secs(1);

fn failed(context: impl Into<String>, err: &Error) -> Message {
    Message::RequestFailed {
        context: context.into(),
        message: user_message(err),
    }
}

async fn deliver(msg_tx: &mpsc::Sender<Message>, msg: Message) {
    if msg_tx.send(msg).await.is_err() {
        trace!("Message channel closed; dropping request result");
    }
}

pub(crate) fn spawn_load_tasks<G: SharedGateway>(gateway: G, msg_tx: mpsc::Sender<Message>) {
    tokio::spawn(async move {
        let msg = match gateway.list_tasks().await {
            Ok(tasks) => Message::TasksLoaded { tasks },
            Err(e) => failed("Loading tasks", &e),
        };
        deliver(&msg_tx, msg).await;
    });
}

pub(crate) fn spawn_load_statistics<G: SharedGateway>(gateway: G, msg_tx: mpsc::Sender<Message>) {
    tokio::spawn(async move {
        let msg = match gateway.statistics().await {
            Ok(statistics) => Message::StatisticsLoaded { statistics },
            Err(e) => failed("Loading statistics", &e),
        };
        deliver(&msg_tx, msg).await;
    });
}

pub(crate) fn spawn_load_task<G: SharedGateway>(
    gateway: G,
    msg_tx: mpsc::Sender<Message>,
    task_id: TaskId,
) {
    tokio::spawn(async move {
        let msg = match gateway.get_task(&task_id).await {
            Ok(task) => Message::TaskLoaded { task },
            Err(e) => failed(format!("Loading task {task_id}"), &e),
        };
        deliver(&msg_tx, msg).await;
    });
}

pub(crate) fn spawn_load_realtime_status<G: SharedGateway>(
    gateway: G,
    msg_tx: mpsc::Sender<Message>,
    task_id: TaskId,
) {
    tokio::spawn(async move {
        match gateway.realtime_status(&task_id).await {
            Ok(status) => {
                deliver(&msg_tx, Message::RealtimeStatusLoaded { task_id, status }).await
            }
            // the status port is often not up yet right after start
            Err(e) => debug!("Realtime status for task {} unavailable: {}", task_id, e),
        }
    });
}

pub(crate) fn spawn_load_logs<G: SharedGateway>(
    gateway: G,
    msg_tx: mpsc::Sender<Message>,
    query: LogQuery,
) {
    tokio::spawn(async move {
        let msg = match gateway.list_logs(&query).await {
            Ok(logs) => Message::LogsLoaded { logs },
            Err(e) => failed("Loading logs", &e),
        };
        deliver(&msg_tx, msg).await;
    });
}

pub(crate) fn spawn_save_task<G: SharedGateway>(
    gateway: G,
    msg_tx: mpsc::Sender<Message>,
    task_id: Option<TaskId>,
    input: TaskInput,
) {
    tokio::spawn(async move {
        let msg = match &task_id {
            None => match gateway.create_task(&input).await {
                Ok(task) => Message::TaskSaved {
                    task,
                    created: true,
                },
                Err(e) => failed("Creating task", &e),
            },
            Some(id) => match gateway.update_task(id, &input).await {
                Ok(task) => Message::TaskSaved {
                    task,
                    created: false,
                },
                Err(e) => failed(format!("Updating task {id}"), &e),
            },
        };
        deliver(&msg_tx, msg).await;
    });
}

pub(crate) fn spawn_task_op<G: SharedGateway>(
    gateway: G,
    msg_tx: mpsc::Sender<Message>,
    task_id: TaskId,
    op: TaskOp,
) {
    tokio::spawn(async move {
        let result = run_task_op(&gateway, &task_id, op).await;
        let msg = match result {
            Ok(message) => Message::TaskOpCompleted {
                task_id,
                op,
                message,
            },
            Err(e) => failed(format!("Task {} {}", task_id, op.verb()), &e),
        };
        deliver(&msg_tx, msg).await;
    });
}

async fn run_task_op<G: SharedGateway>(gateway: &G, task_id: &str, op: TaskOp) -> Result<String> {
    match op {
        TaskOp::Start => gateway.start_task(task_id).await,
        TaskOp::Stop => gateway.stop_task(task_id).await,
        TaskOp::Delete => gateway.delete_task(task_id).await,
        TaskOp::StopThenDelete => {
            let stopped = gateway.stop_task(task_id).await?;
            debug!("Task {}: {}; deleting shortly", task_id, stopped);
            tokio::time::sleep(STOP_THEN_DELETE_DELAY).await;
            gateway.delete_task(task_id).await
        }
    }
}

pub(crate) fn spawn_clear_logs<G: SharedGateway>(
    gateway: G,
    msg_tx: mpsc::Sender<Message>,
    task_id: Option<TaskId>,
) {
    tokio::spawn(async move {
        let result = match &task_id {
            Some(id) => gateway.clear_task_logs(id).await,
            None => gateway.clear_logs().await,
        };
        let msg = match result {
            Ok(message) => Message::LogsCleared { task_id, message },
            Err(e) => failed("Clearing logs", &e),
        };
        deliver(&msg_tx, msg).await;
    });
}

pub(crate) fn spawn_export(msg_tx: mpsc::Sender<Message>, export: LogExport, directory: PathBuf) {
    tokio::spawn(async move {
        let line_count = export.line_count;
        let result =
            tokio::task::spawn_blocking(move || write_export(&directory, &export)).await;
        let msg = match result {
            Ok(Ok(path)) => Message::LogExported { path, line_count },
            Ok(Err(e)) => Message::LogExportFailed {
                message: e.to_string(),
            },
            Err(e) => Message::LogExportFailed {
                message: format!("export task failed: {e}"),
            },
        };
        deliver(&msg_tx, msg).await;
    });
}
