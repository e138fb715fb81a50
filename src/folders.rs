use crate::errors::AppResult;
use crate::models::{Folder, FolderDraft, DEFAULT_FOLDER_COLOR, DEFAULT_FOLDER_ID};
use crate::persistence::{CollectionStore, Partition};
use crate::tasks::merge_json;
use chrono::Utc;
use uuid::Uuid;

const IMMUTABLE_FOLDER_FIELDS: [&str; 2] = ["id", "createdAt"];

/// Owns the folder collection for the active partition. The default
/// folder is guaranteed present after load and survives every delete.
pub struct FolderStore {
    folders: Vec<Folder>,
    partition: Partition,
    store: CollectionStore,
}

impl FolderStore {
    pub fn load(store: CollectionStore, partition: Partition) -> AppResult<Self> {
        let folders = store.load_folders(&partition)?;
        Ok(Self {
            folders,
            partition,
            store,
        })
    }

    pub fn reload(&mut self, partition: Partition) -> AppResult<()> {
        self.folders = self.store.load_folders(&partition)?;
        self.partition = partition;
        Ok(())
    }

    pub fn add_folder(&mut self, draft: FolderDraft) -> AppResult<Folder> {
        let folder = Folder {
            id: Uuid::new_v4().to_string(),
            name: draft.name,
            color: draft.color.unwrap_or_else(|| DEFAULT_FOLDER_COLOR.to_string()),
            created_at: Utc::now(),
        };
        self.folders.push(folder.clone());
        self.persist()?;
        Ok(folder)
    }

    /// Shallow merge; unknown ids are a silent no-op. Renaming or
    /// recoloring the default folder is allowed, deleting it is not.
    pub fn update_folder(&mut self, folder_id: &str, mut patch: serde_json::Value) -> AppResult<Option<Folder>> {
        let Some(index) = self.folders.iter().position(|folder| folder.id == folder_id) else {
            return Ok(None);
        };

        if let serde_json::Value::Object(map) = &mut patch {
            for field in IMMUTABLE_FOLDER_FIELDS {
                map.remove(field);
            }
        }

        let mut merged = serde_json::to_value(&self.folders[index])?;
        merge_json(&mut merged, patch);
        let updated: Folder = serde_json::from_value(merged)?;
        self.folders[index] = updated.clone();
        self.persist()?;
        Ok(Some(updated))
    }

    /// Removes the record. Returns false without touching anything for
    /// the default folder or an unknown id. Reassigning the folder's
    /// tasks is the caller's job and must happen first.
    pub fn delete_folder(&mut self, folder_id: &str) -> AppResult<bool> {
        if folder_id == DEFAULT_FOLDER_ID {
            return Ok(false);
        }
        let before = self.folders.len();
        self.folders.retain(|folder| folder.id != folder_id);
        if self.folders.len() == before {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    pub fn get(&self, folder_id: &str) -> Option<&Folder> {
        self.folders.iter().find(|folder| folder.id == folder_id)
    }

    fn persist(&self) -> AppResult<()> {
        self.store.save_folders(&self.partition, &self.folders)
    }
}
