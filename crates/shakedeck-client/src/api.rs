//! REST gateway for the sync task server
//!
//! [`ApiClient`] wraps a `reqwest::Client` and maps every endpoint of the
//! `/api/v1` surface onto a typed method. Responses are normalised through
//! [`ApiResponse`]; failures become a single [`Error`] carrying the best
//! human-readable message the server provided.

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use url::Url;

use shakedeck_core::prelude::*;
use shakedeck_core::{
    LogQuery, RealtimeStatus, SyncTask, TaskInput, TaskLog, TaskStatistics,
};

use crate::envelope::{extract_error_message, ApiResponse};
use crate::stream::LogStream;

/// Prefix shared by every endpoint.
pub const API_PREFIX: &str = "api/v1";

/// Characters escaped inside a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Time allowed to establish a TCP connection for streams.
const STREAM_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Gateway trait
// ---------------------------------------------------------------------------

/// Operations the application performs against the server.
///
/// Implemented by [`ApiClient`]; tests substitute in-memory fakes. Implement
/// the `Send` variant ([`TaskGateway`]) so futures can be spawned.
#[trait_variant::make(TaskGateway: Send)]
pub trait LocalTaskGateway {
    async fn list_tasks(&self) -> Result<Vec<SyncTask>>;

    async fn get_task(&self, task_id: &str) -> Result<SyncTask>;

    async fn create_task(&self, input: &TaskInput) -> Result<SyncTask>;

    async fn update_task(&self, task_id: &str, input: &TaskInput) -> Result<SyncTask>;

    /// Returns the server's confirmation message.
    async fn delete_task(&self, task_id: &str) -> Result<String>;

    async fn start_task(&self, task_id: &str) -> Result<String>;

    async fn stop_task(&self, task_id: &str) -> Result<String>;

    async fn statistics(&self) -> Result<TaskStatistics>;

    async fn realtime_status(&self, task_id: &str) -> Result<RealtimeStatus>;

    async fn list_logs(&self, query: &LogQuery) -> Result<Vec<TaskLog>>;

    async fn task_logs(&self, task_id: &str, limit: Option<u32>) -> Result<Vec<TaskLog>>;

    async fn search_logs(&self, keyword: &str, limit: Option<u32>) -> Result<Vec<TaskLog>>;

    async fn clear_logs(&self) -> Result<String>;

    async fn clear_task_logs(&self, task_id: &str) -> Result<String>;

    /// Open the live log stream for a task. Never blocks; connection
    /// failures surface as transport events.
    fn open_log_stream(&self, task_id: &str) -> Result<LogStream>;
}

// ---------------------------------------------------------------------------
// ApiClient
// ---------------------------------------------------------------------------

/// HTTP implementation of [`TaskGateway`]. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    /// Separate client without a total timeout for long-lived streams.
    stream_http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    /// Build a client for `base_url` (scheme + host, optional path prefix).
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidUrl`] if `base_url` is not an absolute http(s) URL.
    /// - [`Error::Transport`] if the TLS backend cannot be initialised.
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self> {
        let mut base = Url::parse(base_url.trim())
            .map_err(|e| Error::invalid_url(base_url, e.to_string()))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(Error::invalid_url(base_url, "scheme must be http or https"));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| Error::transport(e.to_string()))?;
        let stream_http = reqwest::Client::builder()
            .connect_timeout(STREAM_CONNECT_TIMEOUT)
            .build()
            .map_err(|e| Error::transport(e.to_string()))?;

        Ok(Self {
            http,
            stream_http,
            base,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Resolve an endpoint. `segments` are escaped individually; a trailing
    /// slash is kept for collection routes.
    pub fn endpoint(&self, segments: &[&str], collection: bool) -> Result<Url> {
        let mut path = String::from(API_PREFIX);
        for segment in segments {
            path.push('/');
            path.extend(utf8_percent_encode(segment, PATH_SEGMENT));
        }
        if collection {
            path.push('/');
        }
        self.base
            .join(&path)
            .map_err(|e| Error::invalid_url(path, e.to_string()))
    }

    pub fn log_stream_url(&self, task_id: &str) -> Result<Url> {
        self.endpoint(&["logs", "task", task_id, "stream"], false)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        trace!("{} {}", method, url);
        self.http.request(method, url)
    }

    /// Send a request and decode the envelope.
    async fn execute<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<ApiResponse<T>> {
        let response = req.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;

        if !status.is_success() {
            let message = serde_json::from_slice::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| extract_error_message(&v))
                .unwrap_or_else(|| format!("request failed with status code {}", status.as_u16()));
            debug!("Server rejected request ({}): {}", status, message);
            return Err(Error::api(status.as_u16(), message));
        }

        let envelope: ApiResponse<T> = serde_json::from_slice(&body)
            .map_err(|e| Error::protocol(format!("unexpected response body: {e}")))?;
        if !envelope.success {
            return Err(Error::api(
                status.as_u16(),
                envelope.message_or(crate::envelope::DEFAULT_FAILURE_MESSAGE),
            ));
        }
        Ok(envelope)
    }

    /// Send a request whose payload is required.
    async fn fetch<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
        self.execute::<T>(req)
            .await?
            .data
            .ok_or_else(|| Error::protocol("response carried no data"))
    }

    /// Send a request where only the confirmation message matters.
    async fn acknowledge(&self, req: RequestBuilder, fallback: &str) -> Result<String> {
        Ok(self
            .execute::<serde_json::Value>(req)
            .await?
            .message_or(fallback))
    }
}

impl TaskGateway for ApiClient {
    async fn list_tasks(&self) -> Result<Vec<SyncTask>> {
        let url = self.endpoint(&["tasks"], true)?;
        self.fetch(self.request(Method::GET, url)).await
    }

    async fn get_task(&self, task_id: &str) -> Result<SyncTask> {
        let url = self.endpoint(&["tasks", task_id], false)?;
        self.fetch(self.request(Method::GET, url)).await
    }

    async fn create_task(&self, input: &TaskInput) -> Result<SyncTask> {
        let url = self.endpoint(&["tasks"], true)?;
        self.fetch(self.request(Method::POST, url).json(input)).await
    }

    async fn update_task(&self, task_id: &str, input: &TaskInput) -> Result<SyncTask> {
        let url = self.endpoint(&["tasks", task_id], false)?;
        self.fetch(self.request(Method::PUT, url).json(input)).await
    }

    async fn delete_task(&self, task_id: &str) -> Result<String> {
        let url = self.endpoint(&["tasks", task_id], false)?;
        self.acknowledge(self.request(Method::DELETE, url), "Task deleted")
            .await
    }

    async fn start_task(&self, task_id: &str) -> Result<String> {
        let url = self.endpoint(&["tasks", task_id, "start"], false)?;
        self.acknowledge(self.request(Method::POST, url), "Task started")
            .await
    }

    async fn stop_task(&self, task_id: &str) -> Result<String> {
        let url = self.endpoint(&["tasks", task_id, "stop"], false)?;
        self.acknowledge(self.request(Method::POST, url), "Task stopped")
            .await
    }

    async fn statistics(&self) -> Result<TaskStatistics> {
        let url = self.endpoint(&["tasks", "statistics", "overview"], false)?;
        self.fetch(self.request(Method::GET, url)).await
    }

    async fn realtime_status(&self, task_id: &str) -> Result<RealtimeStatus> {
        let url = self.endpoint(&["tasks", task_id, "realtime-status"], false)?;
        self.fetch(self.request(Method::GET, url)).await
    }

    async fn list_logs(&self, query: &LogQuery) -> Result<Vec<TaskLog>> {
        let url = self.endpoint(&["logs"], true)?;
        let logs: Vec<TaskLog> = self
            .fetch(self.request(Method::GET, url).query(&query.to_pairs()))
            .await?;
        // the server ignores filters it doesn't support; apply them here too
        Ok(logs.into_iter().filter(|log| query.matches(log)).collect())
    }

    async fn task_logs(&self, task_id: &str, limit: Option<u32>) -> Result<Vec<TaskLog>> {
        let url = self.endpoint(&["logs", "task", task_id], false)?;
        let mut req = self.request(Method::GET, url);
        if let Some(limit) = limit {
            req = req.query(&[("limit", limit)]);
        }
        self.fetch(req).await
    }

    async fn search_logs(&self, keyword: &str, limit: Option<u32>) -> Result<Vec<TaskLog>> {
        let url = self.endpoint(&["logs", "search"], false)?;
        let mut req = self.request(Method::GET, url).query(&[("keyword", keyword)]);
        if let Some(limit) = limit {
            req = req.query(&[("limit", limit)]);
        }
        self.fetch(req).await
    }

    async fn clear_logs(&self) -> Result<String> {
        let url = self.endpoint(&["logs"], true)?;
        self.acknowledge(self.request(Method::DELETE, url), "Logs cleared")
            .await
    }

    async fn clear_task_logs(&self, task_id: &str) -> Result<String> {
        let url = self.endpoint(&["logs", "task", task_id], false)?;
        self.acknowledge(self.request(Method::DELETE, url), "Task logs cleared")
            .await
    }

    fn open_log_stream(&self, task_id: &str) -> Result<LogStream> {
        let url = self.log_stream_url(task_id)?;
        Ok(LogStream::connect(self.stream_http.clone(), url))
    }
}

fn map_transport_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::timeout(err.to_string())
    } else {
        Error::transport(err.to_string())
    }
}
