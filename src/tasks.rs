use crate::errors::{AppError, AppResult};
use crate::models::{Task, TaskDraft, TaskTab, DATE_FORMAT, DEFAULT_FOLDER_ID};
use crate::persistence::{CollectionStore, Partition};
use crate::views;
use chrono::{Local, NaiveDate, Utc};
use uuid::Uuid;

/// Patch keys that can never change after creation.
const IMMUTABLE_TASK_FIELDS: [&str; 4] = ["id", "createdAt", "isMainTask", "parentTaskId"];

/// Owns the task collection for the active partition and persists it
/// wholesale after every mutation.
pub struct TaskStore {
    tasks: Vec<Task>,
    partition: Partition,
    store: CollectionStore,
}

impl TaskStore {
    pub fn load(store: CollectionStore, partition: Partition) -> AppResult<Self> {
        let tasks = store.load_tasks(&partition)?;
        Ok(Self {
            tasks,
            partition,
            store,
        })
    }

    /// Replace the in-memory collection with whatever the new partition
    /// holds. Used on sign-in/sign-out; never merges.
    pub fn reload(&mut self, partition: Partition) -> AppResult<()> {
        self.tasks = self.store.load_tasks(&partition)?;
        self.partition = partition;
        Ok(())
    }

    pub fn add_task(&mut self, draft: TaskDraft) -> AppResult<Task> {
        let task = match draft {
            TaskDraft::Main(draft) => Task {
                id: Uuid::new_v4().to_string(),
                title: draft.title,
                date: draft.date,
                time: draft.time,
                completed: false,
                is_main_task: true,
                parent_task_id: None,
                folder_id: draft
                    .folder_id
                    .unwrap_or_else(|| DEFAULT_FOLDER_ID.to_string()),
                notes: draft.notes,
                created_at: Utc::now(),
            },
            TaskDraft::Subtask(draft) => {
                let parent = self
                    .tasks
                    .iter()
                    .find(|task| task.id == draft.parent_task_id)
                    .ok_or_else(|| {
                        AppError::NotFound(format!(
                            "parent task {} does not exist",
                            draft.parent_task_id
                        ))
                    })?;
                if !parent.is_main_task {
                    return Err(AppError::Policy(
                        "subtasks cannot be nested under another subtask".to_string(),
                    ));
                }
                Task {
                    id: Uuid::new_v4().to_string(),
                    title: draft.title,
                    date: draft.date,
                    time: draft.time,
                    completed: false,
                    is_main_task: false,
                    parent_task_id: Some(parent.id.clone()),
                    folder_id: parent.folder_id.clone(),
                    notes: draft.notes,
                    created_at: Utc::now(),
                }
            }
        };

        self.tasks.push(task.clone());
        self.persist()?;
        Ok(task)
    }

    /// Shallow-merges `patch` into the matching record. Unknown ids are a
    /// silent no-op. Immutable keys in the patch are ignored. Completion
    /// set through here never cascades; cascading belongs to
    /// `toggle_task`.
    pub fn update_task(&mut self, task_id: &str, mut patch: serde_json::Value) -> AppResult<Option<Task>> {
        let Some(index) = self.tasks.iter().position(|task| task.id == task_id) else {
            return Ok(None);
        };

        if let serde_json::Value::Object(map) = &mut patch {
            for field in IMMUTABLE_TASK_FIELDS {
                map.remove(field);
            }
        }

        let mut merged = serde_json::to_value(&self.tasks[index])?;
        merge_json(&mut merged, patch);
        let updated: Task = serde_json::from_value(merged)?;
        self.tasks[index] = updated.clone();
        self.persist()?;
        Ok(Some(updated))
    }

    /// Removes the task and its direct subtasks, exactly one level deep.
    /// Returns how many records went away; zero means the id was unknown.
    pub fn delete_task(&mut self, task_id: &str) -> AppResult<usize> {
        let child_ids: Vec<String> = self
            .tasks
            .iter()
            .filter(|task| task.parent_task_id.as_deref() == Some(task_id))
            .map(|task| task.id.clone())
            .collect();

        let before = self.tasks.len();
        self.tasks
            .retain(|task| task.id != task_id && !child_ids.contains(&task.id));
        let removed = before - self.tasks.len();

        if removed > 0 {
            self.persist()?;
        }
        Ok(removed)
    }

    /// Flips `completed`. Completing a main task marks its direct
    /// subtasks completed too; un-completing leaves them alone.
    pub fn toggle_task(&mut self, task_id: &str) -> AppResult<Option<Task>> {
        let Some(index) = self.tasks.iter().position(|task| task.id == task_id) else {
            return Ok(None);
        };

        let now_completed = !self.tasks[index].completed;
        self.tasks[index].completed = now_completed;
        let toggled = self.tasks[index].clone();

        if now_completed && toggled.is_main_task {
            for task in self.tasks.iter_mut() {
                if task.parent_task_id.as_deref() == Some(task_id) {
                    task.completed = true;
                }
            }
        }

        self.persist()?;
        Ok(Some(toggled))
    }

    /// Rewrites `folder_id` for every task assigned to `from`. Folder
    /// deletion routes through here before the folder record is dropped.
    pub fn reassign_folder(&mut self, from: &str, to: &str) -> AppResult<usize> {
        let mut changed = 0;
        for task in self.tasks.iter_mut() {
            if task.folder_id == from {
                task.folder_id = to.to_string();
                changed += 1;
            }
        }
        if changed > 0 {
            self.persist()?;
        }
        Ok(changed)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn main_tasks(&self) -> Vec<Task> {
        views::main_tasks(&self.tasks).into_iter().cloned().collect()
    }

    pub fn subtasks(&self, parent_id: &str) -> Vec<Task> {
        views::subtasks_of(&self.tasks, parent_id)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn tasks_by_date(&self, date: NaiveDate) -> Vec<Task> {
        let key = date.format(DATE_FORMAT).to_string();
        views::tasks_on(&self.tasks, &key).into_iter().cloned().collect()
    }

    pub fn tasks_by_tab(&self, tab: TaskTab) -> Vec<Task> {
        views::tasks_for_tab(&self.tasks, tab, Local::now().date_naive())
            .into_iter()
            .cloned()
            .collect()
    }

    fn persist(&self) -> AppResult<()> {
        self.store.save_tasks(&self.partition, &self.tasks)
    }
}

pub(crate) fn merge_json(target: &mut serde_json::Value, update: serde_json::Value) {
    match (target, update) {
        (serde_json::Value::Object(target_map), serde_json::Value::Object(update_map)) => {
            for (key, value) in update_map {
                merge_json(target_map.entry(key).or_insert(serde_json::Value::Null), value);
            }
        }
        (target, update) => {
            *target = update;
        }
    }
}
