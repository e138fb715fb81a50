//! Pure derivations over the task and folder collections. Nothing here
//! owns state or persists; callers pass the current slices and, for tab
//! filters, the date to treat as today.

use crate::models::{Folder, FolderSummary, Task, TaskTab, DATE_FORMAT};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Top-level tasks eligible to own subtasks, in collection order.
pub fn main_tasks(tasks: &[Task]) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|task| task.is_main_task && task.parent_task_id.is_none())
        .collect()
}

/// Direct children of `parent_id`, in collection order. Unknown ids yield
/// an empty list.
pub fn subtasks_of<'a>(tasks: &'a [Task], parent_id: &str) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|task| task.parent_task_id.as_deref() == Some(parent_id))
        .collect()
}

/// Exact `yyyy-MM-dd` string match; undated tasks never match.
pub fn tasks_on<'a>(tasks: &'a [Task], date: &str) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|task| task.date.as_deref() == Some(date))
        .collect()
}

/// Tab filters. Completed shows every completed task regardless of date;
/// the other tabs exclude completed tasks.
pub fn tasks_for_tab(tasks: &[Task], tab: TaskTab, today: NaiveDate) -> Vec<&Task> {
    let today_str = today.format(DATE_FORMAT).to_string();
    tasks
        .iter()
        .filter(|task| match tab {
            TaskTab::Completed => task.completed,
            TaskTab::All => !task.completed,
            TaskTab::Today => !task.completed && task.date.as_deref() == Some(today_str.as_str()),
            TaskTab::Upcoming => !task.completed && is_strictly_after(task.date.as_deref(), today),
        })
        .collect()
}

fn is_strictly_after(date: Option<&str>, today: NaiveDate) -> bool {
    date.and_then(|raw| NaiveDate::parse_from_str(raw, DATE_FORMAT).ok())
        .map(|parsed| parsed > today)
        .unwrap_or(false)
}

/// Calendar aggregation: date string to the tasks scheduled on it, dates
/// in ascending order. Undated tasks are excluded.
pub fn calendar(tasks: &[Task]) -> BTreeMap<&str, Vec<&Task>> {
    let mut by_date: BTreeMap<&str, Vec<&Task>> = BTreeMap::new();
    for task in tasks {
        if let Some(date) = task.date.as_deref() {
            by_date.entry(date).or_default().push(task);
        }
    }
    by_date
}

/// One summary per folder, in folder order, counting the tasks assigned
/// to it.
pub fn folder_summaries(folders: &[Folder], tasks: &[Task]) -> Vec<FolderSummary> {
    folders
        .iter()
        .map(|folder| FolderSummary {
            folder: folder.clone(),
            task_count: tasks.iter().filter(|task| task.folder_id == folder.id).count(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{calendar, folder_summaries, main_tasks, subtasks_of, tasks_for_tab, tasks_on};
    use crate::models::{random_folder_color, time_options, Folder, Task, TaskTab, DEFAULT_FOLDER_ID};
    use chrono::{NaiveDate, Utc};

    fn task(id: &str, date: Option<&str>, completed: bool) -> Task {
        Task {
            id: id.to_string(),
            title: format!("task {id}"),
            date: date.map(str::to_string),
            time: None,
            completed,
            is_main_task: true,
            parent_task_id: None,
            folder_id: DEFAULT_FOLDER_ID.to_string(),
            notes: None,
            created_at: Utc::now(),
        }
    }

    fn subtask(id: &str, parent: &str) -> Task {
        Task {
            id: id.to_string(),
            title: format!("sub {id}"),
            date: None,
            time: None,
            completed: false,
            is_main_task: false,
            parent_task_id: Some(parent.to_string()),
            folder_id: DEFAULT_FOLDER_ID.to_string(),
            notes: None,
            created_at: Utc::now(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).expect("valid date")
    }

    #[test]
    fn main_tasks_exclude_subtasks() {
        let tasks = vec![task("a", None, false), subtask("b", "a"), task("c", None, false)];
        let mains = main_tasks(&tasks);
        assert_eq!(mains.len(), 2);
        assert_eq!(mains[0].id, "a");
        assert_eq!(mains[1].id, "c");
    }

    #[test]
    fn subtasks_keep_insertion_order_and_unknown_parent_is_empty() {
        let tasks = vec![
            task("p", None, false),
            subtask("s1", "p"),
            task("q", None, false),
            subtask("s2", "p"),
        ];
        let children = subtasks_of(&tasks, "p");
        assert_eq!(children.iter().map(|t| t.id.as_str()).collect::<Vec<_>>(), ["s1", "s2"]);
        assert!(subtasks_of(&tasks, "nope").is_empty());
    }

    #[test]
    fn today_tab_matches_exact_date_and_skips_completed() {
        let tasks = vec![
            task("today", Some("2026-03-10"), false),
            task("done-today", Some("2026-03-10"), true),
            task("tomorrow", Some("2026-03-11"), false),
            task("undated", None, false),
        ];
        let hits = tasks_for_tab(&tasks, TaskTab::Today, today());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "today");
    }

    #[test]
    fn upcoming_tab_requires_a_parseable_future_date() {
        let tasks = vec![
            task("tomorrow", Some("2026-03-11"), false),
            task("today", Some("2026-03-10"), false),
            task("past", Some("2026-03-01"), false),
            task("garbled", Some("next tuesday"), false),
            task("done-future", Some("2026-04-01"), true),
            task("undated", None, false),
        ];
        let hits = tasks_for_tab(&tasks, TaskTab::Upcoming, today());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "tomorrow");
    }

    #[test]
    fn completed_tab_ignores_dates_and_all_excludes_completed() {
        let tasks = vec![
            task("open", Some("2026-03-10"), false),
            task("done-old", Some("2020-01-01"), true),
            task("done-undated", None, true),
        ];
        let completed = tasks_for_tab(&tasks, TaskTab::Completed, today());
        assert_eq!(completed.len(), 2);

        let all = tasks_for_tab(&tasks, TaskTab::All, today());
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, "open");
    }

    #[test]
    fn exact_date_filter_and_calendar_agree() {
        let tasks = vec![
            task("a", Some("2026-03-10"), false),
            task("b", Some("2026-03-11"), false),
            task("c", Some("2026-03-10"), true),
            task("d", None, false),
        ];
        assert_eq!(tasks_on(&tasks, "2026-03-10").len(), 2);

        let grouped = calendar(&tasks);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped["2026-03-10"].len(), 2);
        assert_eq!(grouped["2026-03-11"].len(), 1);
        let dates: Vec<_> = grouped.keys().copied().collect();
        assert_eq!(dates, ["2026-03-10", "2026-03-11"]);
    }

    #[test]
    fn folder_summaries_count_assigned_tasks() {
        let work = Folder {
            id: "work".to_string(),
            name: "Work".to_string(),
            color: "#ff0000".to_string(),
            created_at: Utc::now(),
        };
        let folders = vec![Folder::default_folder(), work];
        let mut in_work = task("a", None, false);
        in_work.folder_id = "work".to_string();
        let tasks = vec![in_work, task("b", None, false)];

        let summaries = folder_summaries(&folders, &tasks);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].folder.id, DEFAULT_FOLDER_ID);
        assert_eq!(summaries[0].task_count, 1);
        assert_eq!(summaries[1].task_count, 1);
    }

    #[test]
    fn time_options_cover_the_day_in_half_hours() {
        let options = time_options();
        assert_eq!(options.len(), 48);
        assert_eq!(options[0], "12:00 AM");
        assert_eq!(options[1], "12:30 AM");
        assert_eq!(options[25], "12:30 PM");
        assert_eq!(options[47], "11:30 PM");
    }

    #[test]
    fn random_colors_look_like_hex() {
        for _ in 0..16 {
            let color = random_folder_color();
            assert_eq!(color.len(), 7);
            assert!(color.starts_with('#'));
            assert!(color[1..].chars().all(|c| c.is_ascii_hexdigit()));
        }
    }
}
