//! Application state (Model in TEA pattern)

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use shakedeck_core::{
    task_config, LogLevel, LogQuery, OpsHistory, RealtimeStatus, SyncTask, TaskId, TaskInput,
    TaskLog, TaskStatistics,
};

use crate::actions::PollKind;
use crate::config::Settings;
use crate::log_stream::LogStreamHost;
use crate::message::Message;
use crate::scroll_state::ScrollState;
use crate::text_input::{TextArea, TextInput};

/// How long a toast stays on screen
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(4);

/// Default number of records requested by the log history view
pub const DEFAULT_LOG_LIMIT: u32 = 200;

// ─────────────────────────────────────────────────────────────────────────────
// Views and modes
// ─────────────────────────────────────────────────────────────────────────────

/// Top-level tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Dashboard,
    Tasks,
    Logs,
}

impl View {
    pub const ALL: [View; 3] = [View::Dashboard, View::Tasks, View::Logs];

    pub fn title(&self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::Tasks => "Tasks",
            View::Logs => "Log History",
        }
    }

    pub fn next(&self) -> View {
        match self {
            View::Dashboard => View::Tasks,
            View::Tasks => View::Logs,
            View::Logs => View::Dashboard,
        }
    }

    pub fn previous(&self) -> View {
        match self {
            View::Dashboard => View::Logs,
            View::Tasks => View::Dashboard,
            View::Logs => View::Tasks,
        }
    }
}

/// Which overlay currently receives keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UiMode {
    #[default]
    Normal,
    TaskForm,
    LogFilter,
    ConfirmDialog,
}

// ─────────────────────────────────────────────────────────────────────────────
// Notifications
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub expires_at: Instant,
}

// ─────────────────────────────────────────────────────────────────────────────
// Confirm dialog
// ─────────────────────────────────────────────────────────────────────────────

/// Yes/no prompt. `confirm` is dispatched when the user accepts.
#[derive(Debug, Clone)]
pub struct ConfirmDialogState {
    pub title: String,
    pub message: String,
    pub confirm_label: String,
    pub confirm: Message,
}

impl ConfirmDialogState {
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        confirm_label: impl Into<String>,
        confirm: Message,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            confirm_label: confirm_label.into(),
            confirm,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Task form
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Name,
    Config,
}

/// Create/edit form for a task
#[derive(Debug, Clone)]
pub struct TaskFormState {
    /// `None` when creating
    pub editing: Option<TaskId>,
    pub name: TextInput,
    pub config: TextArea,
    pub focus: FormField,
    /// Validation problems from the last submit attempt
    pub problems: Vec<String>,
    pub submitting: bool,
}

impl TaskFormState {
    pub fn create() -> Self {
        Self {
            editing: None,
            name: TextInput::default(),
            config: TextArea::new(task_config::DEFAULT_TEMPLATE),
            focus: FormField::Name,
            problems: Vec::new(),
            submitting: false,
        }
    }

    pub fn edit(task: &SyncTask) -> Self {
        Self {
            editing: Some(task.id.clone()),
            name: TextInput::new(task.name.clone()),
            config: TextArea::new(&task.custom_config),
            focus: FormField::Name,
            problems: Vec::new(),
            submitting: false,
        }
    }

    pub fn title(&self) -> &'static str {
        if self.editing.is_some() {
            "Edit Task"
        } else {
            "New Task"
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            FormField::Name => FormField::Config,
            FormField::Config => FormField::Name,
        };
    }

    /// Check the form and build the request payload.
    pub fn validate(&self) -> std::result::Result<TaskInput, Vec<String>> {
        let mut problems = Vec::new();
        let name = self.name.non_empty();
        if name.is_none() {
            problems.push("task name is required".to_string());
        }
        let config = self.config.text();
        problems.extend(task_config::check(&config));

        if problems.is_empty() {
            Ok(TaskInput {
                name,
                custom_config: Some(config),
            })
        } else {
            Err(problems)
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Log history filter form
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterField {
    #[default]
    Keyword,
    TaskId,
    Level,
    StartTime,
    EndTime,
    Limit,
}

impl FilterField {
    pub const ALL: [FilterField; 6] = [
        FilterField::Keyword,
        FilterField::TaskId,
        FilterField::Level,
        FilterField::StartTime,
        FilterField::EndTime,
        FilterField::Limit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FilterField::Keyword => "Keyword",
            FilterField::TaskId => "Task ID",
            FilterField::Level => "Level",
            FilterField::StartTime => "From",
            FilterField::EndTime => "To",
            FilterField::Limit => "Limit",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LogFilterForm {
    pub keyword: TextInput,
    pub task_id: TextInput,
    pub level: Option<LogLevel>,
    pub start_time: TextInput,
    pub end_time: TextInput,
    pub limit: TextInput,
    pub focus: FilterField,
}

impl LogFilterForm {
    pub fn from_query(query: &LogQuery) -> Self {
        Self {
            keyword: TextInput::new(query.keyword.clone().unwrap_or_default()),
            task_id: TextInput::new(query.task_id.clone().unwrap_or_default()),
            level: query.level,
            start_time: TextInput::new(query.start_time.clone().unwrap_or_default()),
            end_time: TextInput::new(query.end_time.clone().unwrap_or_default()),
            limit: TextInput::new(query.limit.map(|l| l.to_string()).unwrap_or_default()),
            focus: FilterField::Keyword,
        }
    }

    pub fn focus_next(&mut self) {
        let idx = FilterField::ALL
            .iter()
            .position(|f| *f == self.focus)
            .unwrap_or(0);
        self.focus = FilterField::ALL[(idx + 1) % FilterField::ALL.len()];
    }

    pub fn focus_previous(&mut self) {
        let idx = FilterField::ALL
            .iter()
            .position(|f| *f == self.focus)
            .unwrap_or(0);
        let len = FilterField::ALL.len();
        self.focus = FilterField::ALL[(idx + len - 1) % len];
    }

    /// None → DEBUG → ... → FATAL → None
    pub fn cycle_level(&mut self) {
        self.level = match self.level {
            None => Some(LogLevel::ALL[0]),
            Some(level) => LogLevel::ALL
                .iter()
                .position(|l| *l == level)
                .and_then(|i| LogLevel::ALL.get(i + 1).copied()),
        };
    }

    pub fn focused_input(&mut self) -> Option<&mut TextInput> {
        match self.focus {
            FilterField::Keyword => Some(&mut self.keyword),
            FilterField::TaskId => Some(&mut self.task_id),
            FilterField::Level => None,
            FilterField::StartTime => Some(&mut self.start_time),
            FilterField::EndTime => Some(&mut self.end_time),
            FilterField::Limit => Some(&mut self.limit),
        }
    }

    /// Build a query; an unparsable limit falls back to the default.
    pub fn to_query(&self) -> LogQuery {
        LogQuery {
            task_id: self.task_id.non_empty(),
            level: self.level,
            keyword: self.keyword.non_empty(),
            start_time: self.start_time.non_empty(),
            end_time: self.end_time.non_empty(),
            limit: Some(
                self.limit
                    .non_empty()
                    .and_then(|l| l.parse().ok())
                    .unwrap_or(DEFAULT_LOG_LIMIT),
            ),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Task detail
// ─────────────────────────────────────────────────────────────────────────────

/// Detail panel for one task, with realtime replication status while it runs
#[derive(Debug, Clone)]
pub struct TaskDetailState {
    pub task_id: TaskId,
    pub realtime: Option<RealtimeStatus>,
    pub history: OpsHistory,
    /// Whether a realtime status poller is running for this task
    pub polling: bool,
}

impl TaskDetailState {
    pub fn new(task_id: TaskId, history_len: usize) -> Self {
        Self {
            task_id,
            realtime: None,
            history: OpsHistory::new(history_len),
            polling: false,
        }
    }

    pub fn record(&mut self, status: RealtimeStatus) {
        self.history.push(status.sample());
        self.realtime = Some(status);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// AppState
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct AppState {
    pub settings: Settings,
    pub view: View,
    pub ui_mode: UiMode,

    // Tasks
    pub tasks: Vec<SyncTask>,
    pub tasks_loaded: bool,
    pub selected_task: usize,
    pub detail: Option<TaskDetailState>,
    pub form: Option<TaskFormState>,

    // Dashboard
    pub statistics: Option<TaskStatistics>,

    // Log history
    pub logs: Vec<TaskLog>,
    pub log_query: LogQuery,
    pub log_filter: LogFilterForm,
    pub log_scroll: ScrollState,

    // Live log modal
    pub live_log: LogStreamHost,
    pub live_log_scroll: ScrollState,

    pub confirm_dialog: Option<ConfirmDialogState>,
    pub notifications: VecDeque<Notification>,
    /// Last background refresh failure, cleared by the next success
    pub poll_error: Option<(PollKind, String)>,

    quit: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_settings(Settings::default())
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        let live_log =
            LogStreamHost::new(settings.stream.reconnect_delay(), settings.ui.auto_scroll);
        let log_query = LogQuery {
            limit: Some(DEFAULT_LOG_LIMIT),
            ..Default::default()
        };
        Self {
            settings,
            view: View::default(),
            ui_mode: UiMode::default(),
            tasks: Vec::new(),
            tasks_loaded: false,
            selected_task: 0,
            detail: None,
            form: None,
            statistics: None,
            logs: Vec::new(),
            log_filter: LogFilterForm::from_query(&log_query),
            log_query,
            log_scroll: ScrollState::new(),
            live_log,
            live_log_scroll: ScrollState::new(),
            confirm_dialog: None,
            notifications: VecDeque::new(),
            poll_error: None,
            quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn request_quit(&mut self) {
        self.quit = true;
    }

    // ─────────────────────────────────────────────────────────
    // Tasks
    // ─────────────────────────────────────────────────────────

    pub fn selected_task(&self) -> Option<&SyncTask> {
        self.tasks.get(self.selected_task)
    }

    pub fn task(&self, task_id: &str) -> Option<&SyncTask> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    /// The task the detail panel shows, if it is known.
    pub fn detail_task(&self) -> Option<&SyncTask> {
        self.detail.as_ref().and_then(|d| self.task(&d.task_id))
    }

    /// Replace the task list, keeping the selection on the same task.
    pub fn set_tasks(&mut self, tasks: Vec<SyncTask>) {
        let selected_id = self.selected_task().map(|t| t.id.clone());
        self.tasks = tasks;
        self.tasks_loaded = true;
        self.selected_task = selected_id
            .and_then(|id| self.tasks.iter().position(|t| t.id == id))
            .unwrap_or(0)
            .min(self.tasks.len().saturating_sub(1));
    }

    /// Insert or replace a single task.
    pub fn upsert_task(&mut self, task: SyncTask) {
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => *existing = task,
            None => self.tasks.insert(0, task),
        }
    }

    pub fn remove_task(&mut self, task_id: &str) {
        self.tasks.retain(|t| t.id != task_id);
        self.selected_task = self.selected_task.min(self.tasks.len().saturating_sub(1));
    }

    pub fn select_next_task(&mut self) {
        if !self.tasks.is_empty() {
            self.selected_task = (self.selected_task + 1).min(self.tasks.len() - 1);
        }
    }

    pub fn select_previous_task(&mut self) {
        self.selected_task = self.selected_task.saturating_sub(1);
    }

    // ─────────────────────────────────────────────────────────
    // Notifications
    // ─────────────────────────────────────────────────────────

    pub fn notify(&mut self, kind: NotificationKind, message: impl Into<String>) {
        self.notifications.push_back(Notification {
            kind,
            message: message.into(),
            expires_at: Instant::now() + NOTIFICATION_TTL,
        });
        // keep the stack short
        while self.notifications.len() > 3 {
            self.notifications.pop_front();
        }
    }

    pub fn notify_success(&mut self, message: impl Into<String>) {
        self.notify(NotificationKind::Success, message);
    }

    pub fn notify_error(&mut self, message: impl Into<String>) {
        self.notify(NotificationKind::Error, message);
    }

    pub fn expire_notifications(&mut self, now: Instant) {
        self.notifications.retain(|n| n.expires_at > now);
    }

    // ─────────────────────────────────────────────────────────
    // Dialogs
    // ─────────────────────────────────────────────────────────

    pub fn show_confirm_dialog(&mut self, dialog: ConfirmDialogState) {
        self.confirm_dialog = Some(dialog);
        self.ui_mode = UiMode::ConfirmDialog;
    }

    pub fn hide_confirm_dialog(&mut self) {
        self.confirm_dialog = None;
        self.ui_mode = self.base_mode();
    }

    pub fn show_task_form(&mut self, form: TaskFormState) {
        self.form = Some(form);
        self.ui_mode = UiMode::TaskForm;
    }

    pub fn hide_task_form(&mut self) {
        self.form = None;
        self.ui_mode = self.base_mode();
    }

    pub fn show_log_filter(&mut self) {
        self.log_filter = LogFilterForm::from_query(&self.log_query);
        self.ui_mode = UiMode::LogFilter;
    }

    pub fn hide_log_filter(&mut self) {
        self.ui_mode = self.base_mode();
    }

    /// The mode to return to when an overlay closes.
    fn base_mode(&self) -> UiMode {
        if self.form.is_some() {
            UiMode::TaskForm
        } else {
            UiMode::Normal
        }
    }

    /// Whether the live log modal is showing.
    pub fn live_log_visible(&self) -> bool {
        self.live_log.is_open()
    }
}
