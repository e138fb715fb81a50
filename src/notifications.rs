use crate::models::{Notification, NotificationSeverity};
use chrono::Utc;
use std::collections::VecDeque;

const MAX_RETAINED_NOTIFICATIONS: usize = 32;

/// Fire-and-forget presentation surface. Keeps the most recent entries so
/// an embedder can render them; every entry also lands in the log.
pub struct NotificationCenter {
    entries: VecDeque<Notification>,
    capacity: usize,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::with_capacity(MAX_RETAINED_NOTIFICATIONS)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn notify(&mut self, title: &str, description: &str, severity: NotificationSeverity) {
        let notification = Notification {
            title: title.to_string(),
            description: description.to_string(),
            severity,
            created_at: Utc::now(),
        };

        match severity {
            NotificationSeverity::Normal => {
                tracing::info!(title = %notification.title, description = %notification.description, "notification");
            }
            NotificationSeverity::Destructive => {
                tracing::warn!(title = %notification.title, description = %notification.description, "notification");
            }
        }

        self.entries.push_back(notification);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    pub fn recent(&self) -> Vec<Notification> {
        self.entries.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new()
    }
}
