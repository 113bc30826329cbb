use jiff::Timestamp;
use jiff::Zoned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::stats::{self, TaskStats};
use crate::models::task::{Category, Priority, Task, TaskUpdate};

/// Owns the authoritative in-memory task collection.
///
/// Tasks are kept newest-first: `add_task` prepends. All mutation goes
/// through the operations below, and operations on an unknown id are
/// silent no-ops that return `None` rather than errors.
#[derive(Serialize, Deserialize, Default)]
pub struct Store {
    pub tasks: Vec<Task>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend a task so the newest entry is always first.
    ///
    /// The store does not validate the task; callers are expected to
    /// guard against empty titles before submitting.
    pub fn add_task(&mut self, task: Task) {
        self.tasks.insert(0, task);
    }

    pub fn get_task(&self, task_id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    /// Flip a task between pending and completed.
    ///
    /// Sets `completed_at` on the false→true transition and clears it on
    /// true→false, so the two fields never disagree. A prior completion
    /// timestamp is not restored by toggling back and forth.
    pub fn toggle_task(&mut self, task_id: Uuid, now: Timestamp) -> Option<&Task> {
        let task = self.tasks.iter_mut().find(|t| t.id == task_id)?;
        task.completed = !task.completed;
        task.completed_at = if task.completed { Some(now) } else { None };
        Some(task)
    }

    /// Remove a task, returning it. Deletion is immediate and final.
    pub fn delete_task(&mut self, task_id: Uuid) -> Option<Task> {
        let index = self.tasks.iter().position(|t| t.id == task_id)?;
        Some(self.tasks.remove(index))
    }

    /// Merge the provided fields into an existing task, leaving the rest
    /// untouched. Completion state is not reachable through this path;
    /// see [`TaskUpdate`].
    pub fn edit_task(&mut self, task_id: Uuid, update: TaskUpdate) -> Option<&Task> {
        let task = self.tasks.iter_mut().find(|t| t.id == task_id)?;
        if let Some(title) = update.title {
            task.title = title;
        }
        if let Some(description) = update.description {
            task.description = description;
        }
        if let Some(category) = update.category {
            task.category = category;
        }
        if let Some(priority) = update.priority {
            task.priority = priority;
        }
        if let Some(due_date) = update.due_date {
            task.due_date = due_date;
        }
        Some(task)
    }

    pub fn get_tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn get_pending_tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| !t.completed)
    }

    pub fn get_completed_tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| t.completed)
    }

    pub fn get_tasks_by_category(&self, category: Category) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(move |t| t.category == category)
    }

    pub fn get_tasks_by_priority(&self, priority: Priority) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(move |t| t.priority == priority)
    }

    /// Compute a fresh stats snapshot from the current collection.
    /// Pure function of the current state, safe to call repeatedly.
    pub fn stats(&self, now: &Zoned) -> TaskStats {
        stats::task_stats(&self.tasks, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;
    use jiff::tz::TimeZone;

    fn ts(year: i16, month: i8, day: i8) -> Timestamp {
        date(year, month, day)
            .at(10, 0, 0, 0)
            .to_zoned(TimeZone::UTC)
            .unwrap()
            .timestamp()
    }

    fn task(title: &str, category: Category, priority: Priority) -> Task {
        Task {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: None,
            completed: false,
            category,
            priority,
            created_at: ts(2025, 6, 1),
            completed_at: None,
            due_date: None,
        }
    }

    #[test]
    fn add_task_prepends() {
        let mut store = Store::new();
        store.add_task(task("first", Category::Work, Priority::Low));
        store.add_task(task("second", Category::Personal, Priority::High));

        assert_eq!(store.tasks.len(), 2);
        assert_eq!(store.tasks[0].title, "second");
        assert_eq!(store.tasks[1].title, "first");
    }

    #[test]
    fn toggle_task_sets_and_clears_completed_at() {
        let mut store = Store::new();
        store.add_task(task("demo", Category::Work, Priority::Medium));
        let id = store.tasks[0].id;

        let toggled = store.toggle_task(id, ts(2025, 6, 2)).unwrap();
        assert!(toggled.completed);
        assert_eq!(toggled.completed_at, Some(ts(2025, 6, 2)));

        let toggled = store.toggle_task(id, ts(2025, 6, 3)).unwrap();
        assert!(!toggled.completed);
        assert_eq!(toggled.completed_at, None);
    }

    #[test]
    fn toggle_twice_restores_state_but_not_old_timestamp() {
        let mut store = Store::new();
        let mut completed = task("done once", Category::Health, Priority::Low);
        completed.completed = true;
        completed.completed_at = Some(ts(2025, 6, 1));
        store.add_task(completed);
        let id = store.tasks[0].id;

        store.toggle_task(id, ts(2025, 6, 5));
        store.toggle_task(id, ts(2025, 6, 6));

        let restored = store.get_task(id).unwrap();
        assert!(restored.completed);
        // The round trip keeps the flag but stamps a fresh timestamp.
        assert_eq!(restored.completed_at, Some(ts(2025, 6, 6)));
    }

    #[test]
    fn toggle_task_unknown_id_is_a_noop() {
        let mut store = Store::new();
        store.add_task(task("demo", Category::Work, Priority::Medium));

        assert!(store.toggle_task(Uuid::new_v4(), ts(2025, 6, 2)).is_none());
        assert!(!store.tasks[0].completed);
    }

    #[test]
    fn delete_task_removes_matching_task() {
        let mut store = Store::new();
        store.add_task(task("keep", Category::Work, Priority::Low));
        store.add_task(task("drop", Category::Work, Priority::Low));
        let id = store.tasks[0].id;

        let removed = store.delete_task(id).unwrap();
        assert_eq!(removed.title, "drop");
        assert_eq!(store.tasks.len(), 1);
        assert_eq!(store.tasks[0].title, "keep");
    }

    #[test]
    fn delete_task_unknown_id_leaves_collection_unchanged() {
        let mut store = Store::new();
        store.add_task(task("a", Category::Work, Priority::Low));
        store.add_task(task("b", Category::Health, Priority::High));
        let ids_before: Vec<_> = store.tasks.iter().map(|t| t.id).collect();

        assert!(store.delete_task(Uuid::new_v4()).is_none());

        let ids_after: Vec<_> = store.tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids_before, ids_after);
    }

    #[test]
    fn edit_task_merges_only_provided_fields() {
        let mut store = Store::new();
        let mut original = task("old title", Category::Work, Priority::Low);
        original.description = Some("old description".to_string());
        original.due_date = Some(ts(2025, 6, 10));
        store.add_task(original);
        let id = store.tasks[0].id;

        let update = TaskUpdate {
            title: Some("new title".to_string()),
            priority: Some(Priority::High),
            ..TaskUpdate::default()
        };
        let edited = store.edit_task(id, update).unwrap();

        assert_eq!(edited.title, "new title");
        assert_eq!(edited.priority, Priority::High);
        // Untouched fields survive the merge.
        assert_eq!(edited.description, Some("old description".to_string()));
        assert_eq!(edited.category, Category::Work);
        assert_eq!(edited.due_date, Some(ts(2025, 6, 10)));
    }

    #[test]
    fn edit_task_can_clear_optional_fields() {
        let mut store = Store::new();
        let mut original = task("demo", Category::Work, Priority::Low);
        original.description = Some("to be cleared".to_string());
        original.due_date = Some(ts(2025, 6, 10));
        store.add_task(original);
        let id = store.tasks[0].id;

        let update = TaskUpdate {
            description: Some(None),
            due_date: Some(None),
            ..TaskUpdate::default()
        };
        let edited = store.edit_task(id, update).unwrap();

        assert_eq!(edited.description, None);
        assert_eq!(edited.due_date, None);
    }

    #[test]
    fn edit_task_never_touches_completion_state() {
        let mut store = Store::new();
        let mut completed = task("done", Category::Work, Priority::Low);
        completed.completed = true;
        completed.completed_at = Some(ts(2025, 6, 2));
        store.add_task(completed);
        let id = store.tasks[0].id;

        let update = TaskUpdate {
            title: Some("still done".to_string()),
            ..TaskUpdate::default()
        };
        let edited = store.edit_task(id, update).unwrap();

        assert!(edited.completed);
        assert_eq!(edited.completed_at, Some(ts(2025, 6, 2)));
    }

    #[test]
    fn category_filter_preserves_collection_order() {
        let mut store = Store::new();
        store.add_task(task("health one", Category::Health, Priority::Low));
        store.add_task(task("work", Category::Work, Priority::Low));
        store.add_task(task("health two", Category::Health, Priority::Low));

        let titles: Vec<_> = store
            .get_tasks_by_category(Category::Health)
            .map(|t| t.title.as_str())
            .collect();
        // Newest-first collection order, gaps skipped.
        assert_eq!(titles, vec!["health two", "health one"]);
    }

    #[test]
    fn pending_and_completed_filters_split_on_flag() {
        let mut store = Store::new();
        store.add_task(task("pending", Category::Work, Priority::Low));
        let mut done = task("done", Category::Work, Priority::Low);
        done.completed = true;
        done.completed_at = Some(ts(2025, 6, 2));
        store.add_task(done);

        assert_eq!(store.get_pending_tasks().count(), 1);
        assert_eq!(store.get_completed_tasks().count(), 1);
        assert_eq!(store.get_pending_tasks().next().unwrap().title, "pending");
        assert_eq!(store.get_completed_tasks().next().unwrap().title, "done");
    }
}
