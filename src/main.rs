use std::io::{self, BufRead, Write};

use clap::{Parser, Subcommand};
use colored::*;

use crate::{
    clock::{Clock, SystemClock},
    models::{
        store::Store,
        task::{Category, Priority, Task},
    },
    services::tasks::{
        AddTaskError, AddTaskParameters, DeleteTaskParameters, EditTaskError, EditTaskParameters,
        ResolveTaskError, ToggleTaskParameters, add_task, delete_task, edit_task, toggle_task,
    },
};

mod clock;
mod models;
mod services;
mod ui;

#[derive(Parser)]
#[command(
    name = "tally",
    about = "A minimal session-based task tracker with streaks for your terminal"
)]
struct Cli {
    /// Start with an empty list instead of the demo tasks
    #[arg(long)]
    empty: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Inner parser for interactive session lines
#[derive(Parser)]
#[command(name = "tally", no_binary_name = true)]
struct SessionLine {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        /// Task title
        title: String,

        /// Longer description
        #[arg(short = 'n', long)]
        description: Option<String>,

        /// Category (defaults to personal)
        #[arg(short, long, value_enum)]
        category: Option<Category>,

        /// Priority (defaults to medium)
        #[arg(short, long, value_enum)]
        priority: Option<Priority>,

        /// Due date (YYYY-MM-DD)
        #[arg(short, long)]
        due: Option<String>,
    },

    /// List tasks, newest first
    List {
        /// Only tasks in this category
        #[arg(short, long, value_enum)]
        category: Option<Category>,

        /// Only tasks with this priority
        #[arg(short, long, value_enum)]
        priority: Option<Priority>,

        /// Only pending tasks
        #[arg(long, conflicts_with = "completed")]
        pending: bool,

        /// Only completed tasks
        #[arg(long)]
        completed: bool,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Toggle a task between pending and completed
    Done {
        /// Task id (or unique prefix), or part of the title
        task: String,
    },

    /// Delete a task
    Delete {
        /// Task id (or unique prefix), or part of the title
        task: String,
    },

    /// Edit a task's fields (completion is only ever changed via `done`)
    Edit {
        /// Task id (or unique prefix), or part of the title
        task: String,

        /// New title
        #[arg(short, long)]
        title: Option<String>,

        /// New description
        #[arg(short = 'n', long)]
        description: Option<String>,

        /// Remove the description
        #[arg(long, conflicts_with = "description")]
        clear_description: bool,

        /// New category
        #[arg(short, long, value_enum)]
        category: Option<Category>,

        /// New priority
        #[arg(short, long, value_enum)]
        priority: Option<Priority>,

        /// New due date (YYYY-MM-DD)
        #[arg(short, long)]
        due: Option<String>,

        /// Remove the due date
        #[arg(long, conflicts_with = "due")]
        clear_due: bool,
    },

    /// Show statistics: counts, completion rate, today's completions, streak
    Stats {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Leave the session
    #[command(alias = "exit")]
    Quit,
}

enum CommandOutcome {
    Continue,
    Quit,
    Failed,
}

fn main() {
    let cli = Cli::parse();

    let clock = SystemClock;
    let mut store = Store::new();
    if !cli.empty {
        seed_demo_tasks(&mut store, &clock);
    }

    match cli.command {
        Some(command) => {
            if let CommandOutcome::Failed = run_command(&mut store, &clock, command) {
                std::process::exit(1);
            }
        }
        None => run_session(&mut store, &clock),
    }
}

/// Interactive loop. State lives for the session and resets on exit.
fn run_session(store: &mut Store, clock: &impl Clock) {
    println!(
        "{}",
        "Session-only task list: state resets on exit".dimmed()
    );
    println!("{}", "Type 'help' for commands, 'quit' to leave".dimmed());

    let stdin = io::stdin();
    loop {
        print!("{} ", "tally>".cyan().bold());
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error: Failed to read input: {}", e);
                break;
            }
        }

        let tokens = split_line(line.trim());
        if tokens.is_empty() {
            continue;
        }

        match SessionLine::try_parse_from(tokens.iter().map(String::as_str)) {
            Ok(session) => {
                if let CommandOutcome::Quit = run_command(store, clock, session.command) {
                    break;
                }
            }
            Err(e) => {
                let _ = e.print();
            }
        }
    }
}

fn run_command(store: &mut Store, clock: &impl Clock, command: Commands) -> CommandOutcome {
    match command {
        Commands::Add {
            title,
            description,
            category,
            priority,
            due,
        } => {
            // The store accepts anything; the empty-title check lives
            // here at the surface.
            if title.trim().is_empty() {
                eprintln!("Error: Title cannot be empty");
                return CommandOutcome::Failed;
            }

            let params = AddTaskParameters {
                title,
                description,
                category: category.unwrap_or(Category::Personal),
                priority: priority.unwrap_or(Priority::Medium),
                due_date: due,
            };

            match add_task(store, clock, params) {
                Ok(task) => {
                    let short_id: String = task.id.to_string().chars().take(8).collect();
                    println!("✓ Task added: {}", task.title);
                    println!("  {}", short_id.dimmed());
                    CommandOutcome::Continue
                }
                Err(AddTaskError::InvalidDueDate(date_str, error)) => {
                    eprintln!("Error: Invalid due date '{}': {}", date_str, error);
                    eprintln!("\nExpected format: YYYY-MM-DD (e.g., 2025-03-01)");
                    CommandOutcome::Failed
                }
            }
        }

        Commands::List {
            category,
            priority,
            pending,
            completed,
            json,
        } => {
            let now = clock.now();

            // Narrow through the store's view first, then apply any
            // remaining filters on top.
            let tasks: Vec<&Task> = if pending {
                store.get_pending_tasks().collect()
            } else if completed {
                store.get_completed_tasks().collect()
            } else if let Some(category) = category {
                store.get_tasks_by_category(category).collect()
            } else if let Some(priority) = priority {
                store.get_tasks_by_priority(priority).collect()
            } else {
                store.get_tasks().collect()
            };
            let tasks: Vec<&Task> = tasks
                .into_iter()
                .filter(|t| category.is_none_or(|c| t.category == c))
                .filter(|t| priority.is_none_or(|p| t.priority == p))
                .collect();

            if json {
                match serde_json::to_string_pretty(&tasks) {
                    Ok(output) => println!("{}", output),
                    Err(e) => {
                        eprintln!("Error: Failed to serialize tasks: {}", e);
                        return CommandOutcome::Failed;
                    }
                }
                return CommandOutcome::Continue;
            }

            if tasks.is_empty() {
                println!("No tasks found");
                return CommandOutcome::Continue;
            }

            let title = if let Some(category) = category {
                category.label().to_string()
            } else if let Some(priority) = priority {
                format!("{} priority", priority.label())
            } else if pending {
                "Pending".to_string()
            } else if completed {
                "Completed".to_string()
            } else {
                "Tasks".to_string()
            };

            ui::render_view_header(&title, tasks.len());
            for task in &tasks {
                ui::render_task_line(task, &now);
            }
            CommandOutcome::Continue
        }

        Commands::Done { task } => {
            match toggle_task(store, clock, ToggleTaskParameters { reference: task }) {
                Ok(task) => {
                    if task.completed {
                        println!("✓ Task completed: {}", task.title);
                    } else {
                        println!("○ Task reopened: {}", task.title);
                    }
                    CommandOutcome::Continue
                }
                Err(e) => report_resolve_error(e),
            }
        }

        Commands::Delete { task } => {
            match delete_task(store, DeleteTaskParameters { reference: task }) {
                Ok(task) => {
                    println!("✓ Task deleted: {}", task.title);
                    CommandOutcome::Continue
                }
                Err(e) => report_resolve_error(e),
            }
        }

        Commands::Edit {
            task,
            title,
            description,
            clear_description,
            category,
            priority,
            due,
            clear_due,
        } => {
            if title.as_deref().is_some_and(|t| t.trim().is_empty()) {
                eprintln!("Error: Title cannot be empty");
                return CommandOutcome::Failed;
            }

            let params = EditTaskParameters {
                reference: task,
                title,
                description,
                clear_description,
                category,
                priority,
                due_date: due,
                clear_due_date: clear_due,
            };

            match edit_task(store, clock, params) {
                Ok(task) => {
                    println!("✓ Task updated: {}", task.title);
                    CommandOutcome::Continue
                }
                Err(EditTaskError::Resolve(e)) => report_resolve_error(e),
                Err(EditTaskError::InvalidDueDate(date_str, error)) => {
                    eprintln!("Error: Invalid due date '{}': {}", date_str, error);
                    eprintln!("\nExpected format: YYYY-MM-DD (e.g., 2025-03-01)");
                    CommandOutcome::Failed
                }
            }
        }

        Commands::Stats { json } => {
            let now = clock.now();
            let stats = store.stats(&now);

            if json {
                match serde_json::to_string_pretty(&stats) {
                    Ok(output) => println!("{}", output),
                    Err(e) => {
                        eprintln!("Error: Failed to serialize stats: {}", e);
                        return CommandOutcome::Failed;
                    }
                }
                return CommandOutcome::Continue;
            }

            ui::render_stats(&stats);
            ui::render_category_breakdown(store);
            CommandOutcome::Continue
        }

        Commands::Quit => CommandOutcome::Quit,
    }
}

fn report_resolve_error(error: ResolveTaskError) -> CommandOutcome {
    match error {
        ResolveTaskError::TaskNotFound(reference) => {
            eprintln!("Error: Task '{}' not found", reference);
        }
        ResolveTaskError::AmbiguousTask(titles) => {
            eprintln!("Error: Task reference is ambiguous. Multiple tasks found:");
            for title in titles {
                eprintln!("  - {}", title);
            }
            eprintln!("\nPlease be more specific or use the task id.");
        }
    }
    CommandOutcome::Failed
}

/// A few starter tasks so a fresh session has something to look at
fn seed_demo_tasks(store: &mut Store, clock: &impl Clock) {
    let now = clock.now();
    let tomorrow = now.date().tomorrow().map(|d| d.to_string()).ok();

    let starters = [
        (
            "Buy groceries",
            Some("Milk, bread, fruit"),
            Category::Shopping,
            Priority::Low,
            None,
        ),
        (
            "Read a book chapter",
            Some("Keep going with the current one"),
            Category::Learning,
            Priority::Medium,
            None,
        ),
        (
            "Work out",
            Some("30 minutes of cardio"),
            Category::Health,
            Priority::Medium,
            None,
        ),
        (
            "Finish the project deck",
            Some("Slides for Monday's meeting"),
            Category::Work,
            Priority::High,
            tomorrow.as_deref(),
        ),
    ];

    for (title, description, category, priority, due) in starters {
        let _ = add_task(
            store,
            clock,
            AddTaskParameters {
                title: title.to_string(),
                description: description.map(str::to_string),
                category,
                priority,
                due_date: due.map(str::to_string),
            },
        );
    }

    // One finished task, so the session starts with a live streak.
    let workout_id = store
        .get_tasks()
        .find(|t| t.category == Category::Health)
        .map(|t| t.id);
    if let Some(id) = workout_id {
        store.toggle_task(id, now.timestamp());
    }
}

/// Split a session line into argv-style tokens, honoring double quotes
fn split_line(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}
