use chrono::{Duration, NaiveDateTime};
use crate::models::{Task, TaskStatus};

/// Returns `true` when the task has a deadline, `now` is strictly past it,
/// and the task is not done.
///
/// Always evaluate against a fresh `now`; the answer changes as time passes.
pub fn is_overdue(task: &Task, now: NaiveDateTime) -> bool {
    match task.deadline {
        Some(deadline) => !task.done && now > deadline,
        None => false,
    }
}

/// Classifies a task for display. Completion wins over lateness.
pub fn status(task: &Task, now: NaiveDateTime) -> TaskStatus {
    if task.done {
        TaskStatus::Done
    } else if is_overdue(task, now) {
        TaskStatus::Overdue
    } else {
        TaskStatus::Pending
    }
}

/// Short human label for the distance between `now` and the deadline,
/// e.g. `3d overdue` or `5h left`. Empty for done tasks and tasks without
/// a deadline.
pub fn time_left(task: &Task, now: NaiveDateTime) -> String {
    let deadline = match task.deadline {
        Some(d) if !task.done => d,
        _ => return String::new(),
    };
    let delta = deadline - now;
    if delta == Duration::zero() {
        return "due now".to_string();
    }
    let (span, suffix) = if delta < Duration::zero() {
        (-delta, "overdue")
    } else {
        (delta, "left")
    };
    if span.num_days() > 0 {
        format!("{}d {}", span.num_days(), suffix)
    } else if span.num_hours() > 0 {
        format!("{}h {}", span.num_hours(), suffix)
    } else {
        // round partial minutes up so "left" never reads 0m
        let minutes = (span.num_seconds() + 59) / 60;
        format!("{}m {}", minutes, suffix)
    }
}
