//! Custom widget components

mod confirm_dialog;
mod dashboard;
mod filter_form;
mod header;
mod input;
mod live_log;
mod log_table;
pub mod modal_overlay;
mod notifications;
mod status_bar;
mod tabs;
mod task_detail;
mod task_form;
mod task_table;

pub use confirm_dialog::ConfirmDialog;
pub use dashboard::Dashboard;
pub use filter_form::FilterForm;
pub use header::MainHeader;
pub use live_log::{entry_line, LiveLogModal};
pub use log_table::{filter_summary, LogTable};
pub use notifications::Notifications;
pub use status_bar::{key_hints, StatusBar};
pub use tabs::{truncate_name, ViewTabs};
pub use task_detail::TaskDetail;
pub use task_form::TaskForm;
pub use task_table::TaskTable;
