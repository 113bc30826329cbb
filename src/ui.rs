use colored::*;
use jiff::{Timestamp, Zoned};

use crate::models::{
    stats::TaskStats,
    store::Store,
    task::{Category, Priority, Task},
};

/// Get the terminal width, defaulting to 80 if unavailable
fn get_terminal_width() -> usize {
    term_size::dimensions().map(|(w, _)| w).unwrap_or(80)
}

/// Get the appropriate status glyph for a task
pub fn get_status_glyph(task: &Task, is_overdue: bool) -> ColoredString {
    if task.completed {
        "✓".dimmed()
    } else if is_overdue {
        "●".red()
    } else {
        "○".normal()
    }
}

/// Display color for a category. One arm per variant, so a new category
/// cannot ship without a color.
pub fn category_color(category: Category) -> Color {
    match category {
        Category::Work => Color::Blue,
        Category::Personal => Color::Magenta,
        Category::Health => Color::Green,
        Category::Learning => Color::Yellow,
        Category::Shopping => Color::Cyan,
    }
}

pub fn priority_marker(priority: Priority) -> ColoredString {
    match priority {
        Priority::High => "!!!".red(),
        Priority::Medium => "!!".yellow(),
        Priority::Low => "!".dimmed(),
    }
}

/// Check if a task is past its due date (pending tasks only)
pub fn is_overdue(task: &Task, now: &Zoned) -> bool {
    if task.completed {
        return false;
    }

    match task.due_date {
        Some(due) => due.to_zoned(now.time_zone().clone()).date() < now.date(),
        None => false,
    }
}

/// Render a single task line: short id, glyph, priority marker, title,
/// and right-aligned category/due metadata. The description, if any,
/// goes on an indented second line.
pub fn render_task_line(task: &Task, now: &Zoned) {
    let terminal_width = get_terminal_width();

    let short_id: String = task.id.to_string().chars().take(8).collect();
    let overdue = is_overdue(task, now);
    let glyph = get_status_glyph(task, overdue);
    let marker = priority_marker(task.priority);

    let styled_title = if task.completed {
        task.title.dimmed()
    } else {
        task.title.bold()
    };

    // Build the right-aligned metadata: category, then due/completion day
    let mut meta_plain = vec![task.category.label().to_string()];
    let mut meta_styled = vec![
        task.category
            .label()
            .color(category_color(task.category))
            .to_string(),
    ];
    if let Some(completed_at) = task.completed_at {
        let day = format_day(completed_at, now);
        meta_plain.push(day.clone());
        meta_styled.push(day.dimmed().to_string());
    } else if let Some(due) = task.due_date {
        let day = format!("due {}", format_day(due, now));
        meta_plain.push(day.clone());
        if overdue {
            meta_styled.push(day.red().to_string());
        } else {
            meta_styled.push(day.dimmed().to_string());
        }
    }

    let marker_plain = match task.priority {
        Priority::High => "!!!",
        Priority::Medium => "!!",
        Priority::Low => "!",
    };
    let left_visible_len = format!("  {}  {}  {} {}", short_id, " ", task.title, marker_plain)
        .chars()
        .count();
    let right_visible_len = meta_plain.join(" · ").chars().count();

    let left = format!("  {}  {}  {} {}", short_id.dimmed(), glyph, styled_title, marker);
    let right = meta_styled.join(&format!(" {} ", "·".dimmed()));

    if left_visible_len + right_visible_len + 4 < terminal_width {
        let padding = terminal_width - left_visible_len - right_visible_len - 2;
        println!("{}{}{}", left, " ".repeat(padding), right);
    } else {
        // Not enough space for right alignment, just print normally
        println!("{}", left);
    }

    if let Some(description) = &task.description {
        println!("              {}", description.dimmed());
    }
}

/// Format a timestamp's calendar day for display (e.g., "Today",
/// "Yesterday", "Jun 20")
fn format_day(timestamp: Timestamp, now: &Zoned) -> String {
    let date = timestamp.to_zoned(now.time_zone().clone()).date();
    let today = now.date();

    if date == today {
        "Today".to_string()
    } else if today.yesterday().map(|y| date == y).unwrap_or(false) {
        "Yesterday".to_string()
    } else if today.tomorrow().map(|t| date == t).unwrap_or(false) {
        "Tomorrow".to_string()
    } else {
        date.strftime("%b %d").to_string()
    }
}

/// Render a view header with title and count
pub fn render_view_header(title: &str, count: usize) {
    let task_word = if count == 1 { "task" } else { "tasks" };
    println!("\n  {} ({} {})\n", title.cyan().bold(), count, task_word);
}

/// Render a section header (e.g., "By category")
pub fn render_section_header(title: &str) {
    println!("\n  ─── {} ───\n", title.bold());
}

/// Render the stats snapshot: counts, completion rate bar, today's
/// completions, and the current streak.
pub fn render_stats(stats: &TaskStats) {
    render_view_header("Statistics", stats.total_tasks);

    println!("  {:<16} {}", "Completed".dimmed(), stats.completed_tasks);
    println!("  {:<16} {}", "Pending".dimmed(), stats.pending_tasks);

    let filled = ((stats.completion_rate / 10.0).round() as usize).min(10);
    let bar = format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled));
    println!(
        "  {:<16} {} {:.0}%",
        "Completion".dimmed(),
        bar.green(),
        stats.completion_rate
    );

    println!("  {:<16} {}", "Done today".dimmed(), stats.today_completed);

    let day_word = if stats.current_streak == 1 { "day" } else { "days" };
    println!(
        "  {:<16} {} {}",
        "Streak".dimmed(),
        stats.current_streak.to_string().bold(),
        day_word
    );
}

/// Render per-category task counts, preserving the fixed category order
pub fn render_category_breakdown(store: &Store) {
    render_section_header("By category");

    for category in Category::ALL {
        let total = store.get_tasks_by_category(category).count();
        let completed = store
            .get_tasks_by_category(category)
            .filter(|t| t.completed)
            .count();

        println!(
            "  {} {:<10} {}",
            "•".color(category_color(category)),
            category.label(),
            format!("{}/{} done", completed, total).dimmed()
        );
    }
}
