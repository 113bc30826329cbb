use jiff::Zoned;
use jiff::civil::Date;
use serde::Serialize;

use crate::models::task::Task;

/// Point-in-time snapshot of the collection, recomputed on every call
/// and never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskStats {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub pending_tasks: usize,
    /// Percentage in [0, 100]. Defined as 0 for an empty collection.
    pub completion_rate: f64,
    /// Tasks completed within the current local calendar day.
    pub today_completed: usize,
    /// Consecutive completed days ending today or yesterday.
    pub current_streak: u32,
}

pub fn task_stats(tasks: &[Task], now: &Zoned) -> TaskStats {
    let total_tasks = tasks.len();
    let completed_tasks = tasks.iter().filter(|t| t.completed).count();
    let pending_tasks = total_tasks - completed_tasks;
    let completion_rate = if total_tasks > 0 {
        completed_tasks as f64 / total_tasks as f64 * 100.0
    } else {
        0.0
    };

    let today = now.date();
    let today_completed = tasks
        .iter()
        .filter(|t| t.completed)
        .filter_map(|t| t.completed_at)
        .filter(|completed_at| completed_at.to_zoned(now.time_zone().clone()).date() == today)
        .count();

    TaskStats {
        total_tasks,
        completed_tasks,
        pending_tasks,
        completion_rate,
        today_completed,
        current_streak: current_streak(tasks, now),
    }
}

/// Count consecutive calendar days with at least one completion, walking
/// backward from the most recent completed day.
///
/// The streak only counts when the most recent completed day is today or
/// yesterday; otherwise it is considered broken and yields 0. A gap
/// anywhere further back stops the walk there rather than erroring, so
/// history before the gap is simply unreachable.
pub fn current_streak(tasks: &[Task], now: &Zoned) -> u32 {
    let time_zone = now.time_zone();
    let mut days: Vec<Date> = tasks
        .iter()
        .filter(|t| t.completed)
        .filter_map(|t| t.completed_at)
        .map(|completed_at| completed_at.to_zoned(time_zone.clone()).date())
        .collect();

    // One entry per calendar day, most recent first.
    days.sort_unstable_by(|a, b| b.cmp(a));
    days.dedup();

    let Some(&most_recent) = days.first() else {
        return 0;
    };

    let today = now.date();
    let streak_alive = most_recent == today
        || today.yesterday().map(|y| most_recent == y).unwrap_or(false);
    if !streak_alive {
        return 0;
    }

    let mut streak = 1;
    for pair in days.windows(2) {
        match pair[0].yesterday() {
            Ok(previous_day) if pair[1] == previous_day => streak += 1,
            _ => break,
        }
    }

    streak
}
