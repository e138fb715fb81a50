use crate::db::Database;
use crate::errors::AppResult;
use crate::models::{Folder, Task, ThemePreference, UserIdentity, DEFAULT_FOLDER_ID};
use std::sync::Arc;

const THEME_KEY: &str = "theme";

/// Per-identity namespace under which collections are stored. Signed-out
/// sessions fall back to the shared guest partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    suffix: String,
}

impl Partition {
    pub fn guest() -> Self {
        Self {
            suffix: "guest".to_string(),
        }
    }

    pub fn for_user(user: Option<&UserIdentity>) -> Self {
        match user {
            Some(user) => Self {
                suffix: user.id.clone(),
            },
            None => Self::guest(),
        }
    }

    pub fn name(&self) -> &str {
        &self.suffix
    }

    pub fn tasks_key(&self) -> String {
        format!("tasks_{}", self.suffix)
    }

    pub fn folders_key(&self) -> String {
        format!("folders_{}", self.suffix)
    }
}

/// Loads and saves whole entity collections, one JSON array per partition
/// key. Unreadable stored data falls back to the collection's initial
/// state; it is never a hard failure.
#[derive(Clone)]
pub struct CollectionStore {
    db: Arc<Database>,
}

impl CollectionStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn load_tasks(&self, partition: &Partition) -> AppResult<Vec<Task>> {
        let key = partition.tasks_key();
        match self.db.get_value(&key)? {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(tasks) => Ok(tasks),
                Err(error) => {
                    tracing::warn!(error = %error, key = %key, "stored tasks unreadable, starting empty");
                    Ok(Vec::new())
                }
            },
            None => Ok(Vec::new()),
        }
    }

    pub fn save_tasks(&self, partition: &Partition, tasks: &[Task]) -> AppResult<()> {
        let serialized = serde_json::to_string(tasks)?;
        self.db.set_value(&partition.tasks_key(), &serialized)
    }

    pub fn load_folders(&self, partition: &Partition) -> AppResult<Vec<Folder>> {
        let key = partition.folders_key();
        let folders = match self.db.get_value(&key)? {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(folders) => folders,
                Err(error) => {
                    tracing::warn!(error = %error, key = %key, "stored folders unreadable, reseeding defaults");
                    vec![Folder::default_folder()]
                }
            },
            None => vec![Folder::default_folder()],
        };
        Ok(ensure_default_folder(folders))
    }

    pub fn save_folders(&self, partition: &Partition, folders: &[Folder]) -> AppResult<()> {
        let serialized = serde_json::to_string(folders)?;
        self.db.set_value(&partition.folders_key(), &serialized)
    }

    pub fn load_theme(&self) -> AppResult<ThemePreference> {
        match self.db.get_value(THEME_KEY)? {
            Some(raw) => Ok(ThemePreference::from_raw(&raw)),
            None => Ok(ThemePreference::default()),
        }
    }

    pub fn save_theme(&self, theme: ThemePreference) -> AppResult<()> {
        self.db.set_value(THEME_KEY, theme.as_str())
    }
}

/// The default folder must exist at all times, even when stored data was
/// edited behind the store's back.
fn ensure_default_folder(mut folders: Vec<Folder>) -> Vec<Folder> {
    if !folders.iter().any(|folder| folder.id == DEFAULT_FOLDER_ID) {
        folders.insert(0, Folder::default_folder());
    }
    folders
}
