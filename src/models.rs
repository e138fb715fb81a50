use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

pub const DEFAULT_FOLDER_ID: &str = "default";
pub const DEFAULT_FOLDER_NAME: &str = "Default";
pub const DEFAULT_FOLDER_COLOR: &str = "#3b82f6";

/// Scheduling dates are plain `yyyy-MM-dd` strings compared by equality.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub date: Option<String>,
    pub time: Option<String>,
    pub completed: bool,
    pub is_main_task: bool,
    pub parent_task_id: Option<String>,
    pub folder_id: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: String,
    pub name: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
}

impl Folder {
    /// The permanent fallback bucket seeded on first initialization.
    pub fn default_folder() -> Self {
        Self {
            id: DEFAULT_FOLDER_ID.to_string(),
            name: DEFAULT_FOLDER_NAME.to_string(),
            color: DEFAULT_FOLDER_COLOR.to_string(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MainTaskDraft {
    pub title: String,
    pub date: Option<String>,
    pub time: Option<String>,
    pub notes: Option<String>,
    pub folder_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtaskDraft {
    pub title: String,
    pub parent_task_id: String,
    pub date: Option<String>,
    pub time: Option<String>,
    pub notes: Option<String>,
}

/// Creation payload. The subtask variant carries only a parent id, so a
/// chain deeper than one level cannot be expressed at the type level.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TaskDraft {
    Main(MainTaskDraft),
    Subtask(SubtaskDraft),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderDraft {
    pub name: String,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskTab {
    All,
    Today,
    Upcoming,
    Completed,
}

impl TaskTab {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Today => "today",
            Self::Upcoming => "upcoming",
            Self::Completed => "completed",
        }
    }
}

impl Default for TaskTab {
    fn default() -> Self {
        Self::All
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThemePreference {
    Light,
    Dark,
}

impl ThemePreference {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Stored values other than `dark` read as the light theme.
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "dark" => Self::Dark,
            _ => Self::Light,
        }
    }
}

impl Default for ThemePreference {
    fn default() -> Self {
        Self::Light
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderSummary {
    pub folder: Folder,
    pub task_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub email: Option<String>,
    pub member_since: Option<DateTime<Utc>>,
    pub premium: bool,
    pub status_label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSession {
    pub id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationSeverity {
    Normal,
    Destructive,
}

impl NotificationSeverity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Destructive => "destructive",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: NotificationSeverity,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    pub id: String,
    pub email: Option<String>,
    pub premium: bool,
    pub member_since: Option<DateTime<Utc>>,
}

static TIME_OPTIONS: Lazy<Vec<String>> = Lazy::new(|| {
    (0..48)
        .map(|slot| {
            let hour = slot / 2;
            let minute = (slot % 2) * 30;
            let period = if hour >= 12 { "PM" } else { "AM" };
            let display_hour = if hour % 12 == 0 { 12 } else { hour % 12 };
            format!("{}:{:02} {}", display_hour, minute, period)
        })
        .collect()
});

/// Half-hour schedule suggestions, `12:00 AM` through `11:30 PM`. The
/// `time` field itself stays free-form.
pub fn time_options() -> &'static [String] {
    &TIME_OPTIONS
}

/// Suggested display color for a new folder.
pub fn random_folder_color() -> String {
    let value: u32 = rand::random();
    format!("#{:06x}", value & 0x00ff_ffff)
}
