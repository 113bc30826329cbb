use jiff::Timestamp;
use jiff::Zoned;
use jiff::civil::Date;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    clock::Clock,
    models::{
        store::Store,
        task::{Category, Priority, Task, TaskUpdate},
    },
};

#[derive(Debug, Error)]
pub enum ResolveTaskError {
    #[error("Task '{0}' not found")]
    TaskNotFound(String),

    #[error("Task reference is ambiguous. Multiple tasks found: {}", .0.join(", "))]
    AmbiguousTask(Vec<String>),
}

/// Resolve a user-supplied reference to a task id.
///
/// Accepts a full id, a unique id prefix, or a case-insensitive
/// substring of the title. The store itself only speaks ids; this is
/// the surface-facing lookup with explicit not-found/ambiguity signals.
pub fn resolve_task(store: &Store, reference: &str) -> Result<Uuid, ResolveTaskError> {
    let reference = reference.trim();
    if reference.is_empty() {
        return Err(ResolveTaskError::TaskNotFound(reference.to_string()));
    }

    // 1. Try matching against ids first (full id or unique prefix)
    let reference_lower = reference.to_lowercase();
    let id_matches: Vec<_> = store
        .get_tasks()
        .filter(|t| t.id.to_string().starts_with(&reference_lower))
        .collect();

    match id_matches.len() {
        1 => return Ok(id_matches[0].id),
        n if n > 1 => {
            let titles: Vec<String> = id_matches.iter().map(|t| t.title.clone()).collect();
            return Err(ResolveTaskError::AmbiguousTask(titles));
        }
        _ => {}
    }

    // 2. Fall back to fuzzy matching by title
    let title_matches: Vec<_> = store
        .get_tasks()
        .filter(|t| t.title.to_lowercase().contains(&reference_lower))
        .collect();

    match title_matches.len() {
        0 => Err(ResolveTaskError::TaskNotFound(reference.to_string())),
        1 => Ok(title_matches[0].id),
        _ => {
            let titles: Vec<String> = title_matches.iter().map(|t| t.title.clone()).collect();
            Err(ResolveTaskError::AmbiguousTask(titles))
        }
    }
}

/// Parse a `YYYY-MM-DD` due date as local midnight.
fn parse_due_date(date_str: &str, now: &Zoned) -> Result<Timestamp, String> {
    let date = date_str.parse::<Date>().map_err(|e| e.to_string())?;
    let zoned = date
        .at(0, 0, 0, 0)
        .to_zoned(now.time_zone().clone())
        .map_err(|e| e.to_string())?;
    Ok(zoned.timestamp())
}

#[derive(Debug, Error)]
pub enum AddTaskError {
    #[error("Invalid due date '{0}': {1}")]
    InvalidDueDate(String, String),
}

pub struct AddTaskParameters {
    pub title: String,
    pub description: Option<String>,
    pub category: Category,
    pub priority: Priority,
    pub due_date: Option<String>,
}

pub fn add_task(
    store: &mut Store,
    clock: &impl Clock,
    parameters: AddTaskParameters,
) -> Result<Task, AddTaskError> {
    let now = clock.now();

    // 1. Parse the due date if provided
    let due_date = match parameters.due_date {
        Some(date_str) => Some(
            parse_due_date(&date_str, &now)
                .map_err(|e| AddTaskError::InvalidDueDate(date_str, e))?,
        ),
        None => None,
    };

    // 2. Mount the task. An empty title is accepted here on purpose: the
    //    surface calling in owns that check.
    let task = Task {
        id: Uuid::new_v4(),
        title: parameters.title,
        description: parameters.description,
        completed: false,
        category: parameters.category,
        priority: parameters.priority,
        created_at: now.timestamp(),
        completed_at: None,
        due_date,
    };

    let task_id = task.id;

    // 3. Prepend to the store (newest-first)
    store.add_task(task);

    // 4. Return the created task
    Ok(store.get_task(task_id).unwrap().clone())
}

pub struct ToggleTaskParameters {
    pub reference: String,
}

pub fn toggle_task(
    store: &mut Store,
    clock: &impl Clock,
    parameters: ToggleTaskParameters,
) -> Result<Task, ResolveTaskError> {
    let task_id = resolve_task(store, &parameters.reference)?;
    let now = clock.now().timestamp();

    // The id was just resolved, so the store-level toggle cannot miss.
    Ok(store.toggle_task(task_id, now).unwrap().clone())
}

pub struct DeleteTaskParameters {
    pub reference: String,
}

pub fn delete_task(
    store: &mut Store,
    parameters: DeleteTaskParameters,
) -> Result<Task, ResolveTaskError> {
    let task_id = resolve_task(store, &parameters.reference)?;
    Ok(store.delete_task(task_id).unwrap())
}

#[derive(Debug, Error)]
pub enum EditTaskError {
    #[error(transparent)]
    Resolve(#[from] ResolveTaskError),

    #[error("Invalid due date '{0}': {1}")]
    InvalidDueDate(String, String),
}

pub struct EditTaskParameters {
    pub reference: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub clear_description: bool,
    pub category: Option<Category>,
    pub priority: Option<Priority>,
    pub due_date: Option<String>,
    pub clear_due_date: bool,
}

pub fn edit_task(
    store: &mut Store,
    clock: &impl Clock,
    parameters: EditTaskParameters,
) -> Result<Task, EditTaskError> {
    let task_id = resolve_task(store, &parameters.reference)?;
    let now = clock.now();

    let due_date = if parameters.clear_due_date {
        Some(None)
    } else {
        match parameters.due_date {
            Some(date_str) => Some(Some(
                parse_due_date(&date_str, &now)
                    .map_err(|e| EditTaskError::InvalidDueDate(date_str, e))?,
            )),
            None => None,
        }
    };

    let description = if parameters.clear_description {
        Some(None)
    } else {
        parameters.description.map(Some)
    };

    let update = TaskUpdate {
        title: parameters.title,
        description,
        category: parameters.category,
        priority: parameters.priority,
        due_date,
    };

    Ok(store.edit_task(task_id, update).unwrap().clone())
}
