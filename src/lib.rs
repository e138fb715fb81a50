pub mod billing;
pub mod db;
pub mod errors;
pub mod folders;
pub mod identity;
pub mod models;
pub mod notifications;
pub mod persistence;
pub mod planner;
pub mod tasks;
pub mod views;

pub use crate::errors::{AppError, AppResult};
pub use crate::identity::{GuestIdentityProvider, IdentityProvider, StaticIdentityProvider};
pub use crate::models::{
    AccountSummary, CheckoutSession, Folder, FolderDraft, FolderSummary, MainTaskDraft,
    Notification, NotificationSeverity, SubtaskDraft, Task, TaskDraft, TaskTab, ThemePreference,
    UserIdentity,
};
pub use crate::planner::PlannerCore;

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;

static LOG_GUARD: std::sync::OnceLock<WorkerGuard> = std::sync::OnceLock::new();

/// Routes tracing output to daily-rolled JSON files under
/// `<app_data_dir>/logs`. Call once at startup; later calls are no-ops
/// as far as the writer guard is concerned.
pub fn init_tracing(app_data_dir: &Path) -> Result<(), String> {
    let log_dir = app_data_dir.join("logs");
    std::fs::create_dir_all(&log_dir).map_err(|error| error.to_string())?;
    let file_appender = tracing_appender::rolling::daily(log_dir, "planner.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let _ = LOG_GUARD.set(guard);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .json()
        .with_writer(non_blocking)
        .try_init()
        .map_err(|error| error.to_string())
}
