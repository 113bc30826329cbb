use std::fmt;

use clap::ValueEnum;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Closed set of task categories.
///
/// Kept as an enum rather than free text so the display color/label
/// tables can never go out of sync with the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Work,
    Personal,
    Health,
    Learning,
    Shopping,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Work,
        Category::Personal,
        Category::Health,
        Category::Learning,
        Category::Shopping,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Work => "Work",
            Category::Personal => "Personal",
            Category::Health => "Health",
            Category::Learning => "Learning",
            Category::Shopping => "Shopping",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Closed set of task priorities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Task {
    /// UUID to identify the task
    pub id: Uuid,
    /// Title of the task
    pub title: String,
    /// Optional free-form description
    pub description: Option<String>,
    /// Whether the task is done. Always in lockstep with `completed_at`.
    pub completed: bool,
    /// Category of the task
    pub category: Category,
    /// Priority of the task
    pub priority: Priority,
    /// When the task was created. Never mutated afterwards.
    pub created_at: Timestamp,
    /// Set exactly when `completed` flips to true, cleared when it flips back
    pub completed_at: Option<Timestamp>,
    /// Optional caller-supplied due date
    pub due_date: Option<Timestamp>,
}

/// Partial update applied by the edit operation. `None` leaves a field
/// untouched; for optional fields, `Some(None)` clears the value.
///
/// Completion state is deliberately absent: `completed` and
/// `completed_at` only ever change together, through the toggle
/// operation, so an edit can never leave the two fields disagreeing.
#[derive(Debug, Default, Clone)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub category: Option<Category>,
    pub priority: Option<Priority>,
    pub due_date: Option<Option<Timestamp>>,
}
