use crate::billing::BillingClient;
use crate::db::Database;
use crate::errors::{AppError, AppResult};
use crate::folders::FolderStore;
use crate::identity::IdentityProvider;
use crate::models::{
    AccountSummary, CheckoutSession, Folder, FolderDraft, FolderSummary, Notification,
    NotificationSeverity, Task, TaskDraft, TaskTab, ThemePreference, UserIdentity,
    DEFAULT_FOLDER_ID,
};
use crate::notifications::NotificationCenter;
use crate::persistence::{CollectionStore, Partition};
use crate::tasks::TaskStore;
use crate::views;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Application root. Owns the stores and the storage partition, and is the
/// single place where cross-store rules (folder deletion, identity
/// switches) are coordinated. Constructed explicitly and passed to
/// consumers; there is no ambient instance.
pub struct PlannerCore {
    store: CollectionStore,
    tasks: TaskStore,
    folders: FolderStore,
    identity: Arc<dyn IdentityProvider>,
    partition: Partition,
    theme: ThemePreference,
    billing: Option<BillingClient>,
    notifications: NotificationCenter,
}

impl PlannerCore {
    pub fn new(app_data_dir: PathBuf, identity: Arc<dyn IdentityProvider>) -> AppResult<Self> {
        let db_path = app_data_dir.join("planner.sqlite");
        let db = Arc::new(Database::new(&db_path)?);
        let store = CollectionStore::new(db);

        // Until the provider reports ready, data lives in the guest
        // partition; refresh_identity picks up the real one later.
        let partition = if identity.is_loaded() {
            Partition::for_user(identity.current_user().as_ref())
        } else {
            Partition::guest()
        };

        let tasks = TaskStore::load(store.clone(), partition.clone())?;
        let folders = FolderStore::load(store.clone(), partition.clone())?;
        let theme = store.load_theme()?;

        tracing::info!(partition = %partition.name(), "planner core initialized");

        Ok(Self {
            store,
            tasks,
            folders,
            identity,
            partition,
            theme,
            billing: None,
            notifications: NotificationCenter::new(),
        })
    }

    // --- tasks ---

    pub fn add_task(&mut self, draft: TaskDraft) -> AppResult<Task> {
        let task = self.tasks.add_task(draft)?;
        self.notifications.notify(
            "Task added",
            "Your task has been added",
            NotificationSeverity::Normal,
        );
        Ok(task)
    }

    pub fn update_task(&mut self, task_id: &str, patch: serde_json::Value) -> AppResult<Option<Task>> {
        self.tasks.update_task(task_id, patch)
    }

    pub fn delete_task(&mut self, task_id: &str) -> AppResult<usize> {
        let removed = self.tasks.delete_task(task_id)?;
        if removed > 0 {
            self.notifications.notify(
                "Task deleted",
                "Your task has been removed",
                NotificationSeverity::Normal,
            );
        }
        Ok(removed)
    }

    pub fn toggle_task(&mut self, task_id: &str) -> AppResult<Option<Task>> {
        self.tasks.toggle_task(task_id)
    }

    pub fn tasks(&self) -> &[Task] {
        self.tasks.tasks()
    }

    pub fn main_tasks(&self) -> Vec<Task> {
        self.tasks.main_tasks()
    }

    pub fn subtasks(&self, parent_id: &str) -> Vec<Task> {
        self.tasks.subtasks(parent_id)
    }

    pub fn tasks_by_date(&self, date: NaiveDate) -> Vec<Task> {
        self.tasks.tasks_by_date(date)
    }

    pub fn tasks_by_tab(&self, tab: TaskTab) -> Vec<Task> {
        self.tasks.tasks_by_tab(tab)
    }

    pub fn calendar(&self) -> BTreeMap<String, Vec<Task>> {
        views::calendar(self.tasks.tasks())
            .into_iter()
            .map(|(date, tasks)| {
                (
                    date.to_string(),
                    tasks.into_iter().cloned().collect::<Vec<_>>(),
                )
            })
            .collect()
    }

    // --- folders ---

    pub fn add_folder(&mut self, draft: FolderDraft) -> AppResult<Folder> {
        let folder = self.folders.add_folder(draft)?;
        self.notifications.notify(
            "Folder created",
            "Your new folder has been created",
            NotificationSeverity::Normal,
        );
        Ok(folder)
    }

    pub fn update_folder(&mut self, folder_id: &str, patch: serde_json::Value) -> AppResult<Option<Folder>> {
        let updated = self.folders.update_folder(folder_id, patch)?;
        if updated.is_some() {
            self.notifications.notify(
                "Folder updated",
                "Your folder has been updated",
                NotificationSeverity::Normal,
            );
        }
        Ok(updated)
    }

    /// Deleting a folder first moves its tasks to the default bucket,
    /// then drops the record. The default folder itself is untouchable.
    pub fn delete_folder(&mut self, folder_id: &str) -> AppResult<bool> {
        if folder_id == DEFAULT_FOLDER_ID {
            return Ok(false);
        }
        self.tasks.reassign_folder(folder_id, DEFAULT_FOLDER_ID)?;
        let removed = self.folders.delete_folder(folder_id)?;
        if removed {
            self.notifications.notify(
                "Folder deleted",
                "Your folder has been deleted",
                NotificationSeverity::Normal,
            );
        }
        Ok(removed)
    }

    pub fn folders(&self) -> &[Folder] {
        self.folders.folders()
    }

    pub fn folder_summaries(&self) -> Vec<FolderSummary> {
        views::folder_summaries(self.folders.folders(), self.tasks.tasks())
    }

    // --- identity ---

    /// Re-reads the identity provider. When the active partition changed
    /// (sign-in or sign-out), both collections are reloaded under the new
    /// key, replacing in-memory state. Returns whether a switch happened.
    pub fn refresh_identity(&mut self) -> AppResult<bool> {
        if !self.identity.is_loaded() {
            return Ok(false);
        }
        let next = Partition::for_user(self.identity.current_user().as_ref());
        if next == self.partition {
            return Ok(false);
        }

        self.tasks.reload(next.clone())?;
        self.folders.reload(next.clone())?;
        self.partition = next;
        tracing::info!(partition = %self.partition.name(), "switched storage partition");
        Ok(true)
    }

    pub fn active_user(&self) -> Option<UserIdentity> {
        self.identity.current_user()
    }

    pub fn is_premium(&self) -> bool {
        self.identity
            .current_user()
            .map(|user| user.premium)
            .unwrap_or(false)
    }

    pub fn account_summary(&self) -> Option<AccountSummary> {
        let user = self.identity.current_user()?;
        let status_label = if user.premium { "Premium" } else { "Free" };
        Some(AccountSummary {
            email: user.email,
            member_since: user.member_since,
            premium: user.premium,
            status_label: status_label.to_string(),
        })
    }

    // --- billing ---

    pub fn configure_billing(&mut self, base_url: impl Into<String>) {
        self.billing = Some(BillingClient::new(base_url));
    }

    /// Starts a hosted checkout. Failures surface as a destructive
    /// notification and as the returned error; task and folder state is
    /// never involved.
    pub fn start_checkout(&mut self) -> AppResult<CheckoutSession> {
        let result = match self.billing.as_ref() {
            Some(billing) => billing.create_checkout_session(),
            None => {
                return Err(AppError::Policy(
                    "no payment provider configured".to_string(),
                ))
            }
        };
        if result.is_err() {
            self.notifications.notify(
                "Error",
                "Failed to initiate payment",
                NotificationSeverity::Destructive,
            );
        }
        result
    }

    pub fn cancel_subscription(&mut self) -> AppResult<()> {
        let result = match self.billing.as_ref() {
            Some(billing) => billing.cancel_subscription(),
            None => {
                return Err(AppError::Policy(
                    "no payment provider configured".to_string(),
                ))
            }
        };
        match result {
            Ok(()) => {
                self.notifications.notify(
                    "Success",
                    "Your subscription has been cancelled",
                    NotificationSeverity::Normal,
                );
                Ok(())
            }
            Err(error) => {
                self.notifications.notify(
                    "Error",
                    "Failed to cancel subscription",
                    NotificationSeverity::Destructive,
                );
                Err(error)
            }
        }
    }

    // --- preferences & surface ---

    pub fn theme(&self) -> ThemePreference {
        self.theme
    }

    pub fn set_theme(&mut self, theme: ThemePreference) -> AppResult<()> {
        self.store.save_theme(theme)?;
        self.theme = theme;
        Ok(())
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.recent()
    }

    pub fn clear_notifications(&mut self) {
        self.notifications.clear();
    }
}
