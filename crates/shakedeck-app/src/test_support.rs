//! In-memory gateway for engine and action tests

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::mpsc;

use shakedeck_client::{LogStream, TaskGateway};
use shakedeck_core::prelude::*;
use shakedeck_core::{
    LogQuery, RealtimeStatus, SyncTask, TaskInput, TaskLog, TaskStatistics, TaskStatus,
    TransportEvent,
};

pub fn task(id: &str, name: &str, status: TaskStatus) -> SyncTask {
    SyncTask {
        id: id.to_string(),
        name: name.to_string(),
        custom_config: shakedeck_core::task_config::DEFAULT_TEMPLATE.to_string(),
        status,
        ..Default::default()
    }
}

pub fn running_task(id: &str, name: &str) -> SyncTask {
    task(id, name, TaskStatus::Running)
}

pub fn stopped_task(id: &str, name: &str) -> SyncTask {
    task(id, name, TaskStatus::Stopped)
}

#[derive(Default)]
struct Inner {
    tasks: Vec<SyncTask>,
    logs: Vec<TaskLog>,
    calls: Vec<String>,
    failures: HashMap<&'static str, String>,
    streams: VecDeque<mpsc::Receiver<TransportEvent>>,
    next_id: u32,
}

/// Scripted server. Records every call by method name.
#[derive(Clone, Default)]
pub struct FakeGateway {
    inner: Arc<Mutex<Inner>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }

    pub fn set_tasks(&self, tasks: Vec<SyncTask>) {
        self.lock().tasks = tasks;
    }

    pub fn set_logs(&self, logs: Vec<TaskLog>) {
        self.lock().logs = logs;
    }

    /// Make the next call to `method` fail with a 400 carrying `message`.
    pub fn fail_next(&self, method: &'static str, message: &str) {
        self.lock().failures.insert(method, message.to_string());
    }

    /// Queue a transport for the next `open_log_stream` call.
    pub fn script_stream(&self) -> mpsc::Sender<TransportEvent> {
        let (tx, rx) = mpsc::channel(32);
        self.lock().streams.push_back(rx);
        tx
    }

    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    pub fn calls_named(&self, method: &str) -> usize {
        self.lock().calls.iter().filter(|c| *c == method).count()
    }

    fn record(&self, method: &'static str) -> Result<()> {
        let mut inner = self.lock();
        inner.calls.push(method.to_string());
        match inner.failures.remove(method) {
            Some(message) => Err(Error::api(400, message)),
            None => Ok(()),
        }
    }

    fn find(&self, task_id: &str) -> Result<SyncTask> {
        self.lock()
            .tasks
            .iter()
            .find(|t| t.id == task_id)
            .cloned()
            .ok_or_else(|| Error::api(404, "Task not found"))
    }

    fn set_status(&self, task_id: &str, status: TaskStatus) -> Result<()> {
        let mut inner = self.lock();
        let task = inner
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or_else(|| Error::api(404, "Task not found"))?;
        task.status = status;
        Ok(())
    }
}

impl TaskGateway for FakeGateway {
    async fn list_tasks(&self) -> Result<Vec<SyncTask>> {
        self.record("list_tasks")?;
        Ok(self.lock().tasks.clone())
    }

    async fn get_task(&self, task_id: &str) -> Result<SyncTask> {
        self.record("get_task")?;
        self.find(task_id)
    }

    async fn create_task(&self, input: &TaskInput) -> Result<SyncTask> {
        self.record("create_task")?;
        let mut inner = self.lock();
        inner.next_id += 1;
        let created = SyncTask {
            id: format!("new-{}", inner.next_id),
            name: input.name.clone().unwrap_or_default(),
            custom_config: input.custom_config.clone().unwrap_or_default(),
            ..Default::default()
        };
        inner.tasks.push(created.clone());
        Ok(created)
    }

    async fn update_task(&self, task_id: &str, input: &TaskInput) -> Result<SyncTask> {
        self.record("update_task")?;
        let mut inner = self.lock();
        let task = inner
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or_else(|| Error::api(404, "Task not found"))?;
        if let Some(name) = &input.name {
            task.name = name.clone();
        }
        if let Some(config) = &input.custom_config {
            task.custom_config = config.clone();
        }
        Ok(task.clone())
    }

    async fn delete_task(&self, task_id: &str) -> Result<String> {
        self.record("delete_task")?;
        self.lock().tasks.retain(|t| t.id != task_id);
        Ok("Task deleted".to_string())
    }

    async fn start_task(&self, task_id: &str) -> Result<String> {
        self.record("start_task")?;
        self.set_status(task_id, TaskStatus::Running)?;
        Ok("Task started".to_string())
    }

    async fn stop_task(&self, task_id: &str) -> Result<String> {
        self.record("stop_task")?;
        self.set_status(task_id, TaskStatus::Stopped)?;
        Ok("Task stopped".to_string())
    }

    async fn statistics(&self) -> Result<TaskStatistics> {
        self.record("statistics")?;
        let inner = self.lock();
        let count = |status: TaskStatus| {
            inner.tasks.iter().filter(|t| t.status == status).count() as u64
        };
        Ok(TaskStatistics {
            total: inner.tasks.len() as u64,
            running: count(TaskStatus::Running),
            stopped: count(TaskStatus::Stopped),
            failed: count(TaskStatus::Failed),
            ..Default::default()
        })
    }

    async fn realtime_status(&self, task_id: &str) -> Result<RealtimeStatus> {
        self.record("realtime_status")?;
        self.find(task_id)?;
        Ok(RealtimeStatus::default())
    }

    async fn list_logs(&self, query: &LogQuery) -> Result<Vec<TaskLog>> {
        self.record("list_logs")?;
        Ok(self
            .lock()
            .logs
            .iter()
            .filter(|log| query.matches(log))
            .cloned()
            .collect())
    }

    async fn task_logs(&self, task_id: &str, _limit: Option<u32>) -> Result<Vec<TaskLog>> {
        self.record("task_logs")?;
        Ok(self
            .lock()
            .logs
            .iter()
            .filter(|log| log.task_id == task_id)
            .cloned()
            .collect())
    }

    async fn search_logs(&self, keyword: &str, _limit: Option<u32>) -> Result<Vec<TaskLog>> {
        self.record("search_logs")?;
        Ok(self
            .lock()
            .logs
            .iter()
            .filter(|log| log.message.contains(keyword))
            .cloned()
            .collect())
    }

    async fn clear_logs(&self) -> Result<String> {
        self.record("clear_logs")?;
        self.lock().logs.clear();
        Ok("Logs cleared".to_string())
    }

    async fn clear_task_logs(&self, task_id: &str) -> Result<String> {
        self.record("clear_task_logs")?;
        self.lock().logs.retain(|log| log.task_id != task_id);
        Ok("Task logs cleared".to_string())
    }

    fn open_log_stream(&self, _task_id: &str) -> Result<LogStream> {
        self.record("open_log_stream")?;
        let rx = match self.lock().streams.pop_front() {
            Some(rx) => rx,
            // unscripted: a transport that closes immediately
            None => mpsc::channel(1).1,
        };
        Ok(LogStream::from_receiver(rx))
    }
}
