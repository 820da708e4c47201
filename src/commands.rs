use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use tracing::info;

use crate::action::Action;
use crate::clock::{format_deadline, parse_deadline, Clock, FixedClock, SystemClock};
use crate::error::TaskError;
use crate::models::{Task, TaskStatus};
use crate::overdue::{status, time_left};
use crate::store::{Snapshot, TaskStore};

/// An action from a replay script that the store rejected.
#[derive(Debug, PartialEq)]
pub struct Rejected {
    /// Zero-based position of the action in the script.
    pub index: usize,
    pub error: TaskError,
}

/// Reads a JSON array of [`Action`]s from `path`.
pub fn load_actions(path: &Path) -> Result<Vec<Action>> {
    let s = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let actions = serde_json::from_str(&s)
        .with_context(|| format!("Failed to parse actions in {}", path.display()))?;
    Ok(actions)
}

/// Dispatches `actions` in order against a fresh store.
///
/// Rejected actions are skipped and reported; the rest still apply.
pub fn replay(actions: Vec<Action>, clock: &dyn Clock) -> (TaskStore, Vec<Rejected>) {
    let mut store = TaskStore::new(clock.now());
    let mut rejected = Vec::new();
    for (index, action) in actions.into_iter().enumerate() {
        if let Err(error) = store.dispatch(action, clock.now()) {
            rejected.push(Rejected { index, error });
        }
    }
    (store, rejected)
}

/// Builds the printable table for a task list as seen at `now`.
pub fn task_table(tasks: &[Task], now: NaiveDateTime) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Task").add_attribute(Attribute::Bold),
            Cell::new("Deadline").add_attribute(Attribute::Bold),
            Cell::new("Time Left").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
        ]);

    for t in tasks {
        let st = status(t, now);
        let color = match st {
            TaskStatus::Done => Color::Green,
            TaskStatus::Overdue => Color::Red,
            TaskStatus::Pending => Color::Reset,
        };
        let mut text = Cell::new(&t.text);
        if st == TaskStatus::Done {
            text = text.add_attribute(Attribute::CrossedOut);
        }
        table.add_row(vec![
            Cell::new(t.id),
            text,
            Cell::new(t.deadline.as_ref().map(format_deadline).unwrap_or_default()),
            Cell::new(time_left(t, now)),
            Cell::new(st).fg(color),
        ]);
    }
    table
}

/// Pretty JSON of the whole store state, drafts included.
pub fn snapshot_json(snapshot: &Snapshot) -> Result<String> {
    serde_json::to_string_pretty(snapshot).context("Failed to serialise snapshot")
}

/// Replays the actions stored in `path` and prints the resulting list.
///
/// `now` pins the clock (any accepted deadline format); otherwise the
/// system clock is used. With `json` the final snapshot is printed as JSON
/// instead of a table.
pub fn cmd_replay(path: &Path, now: Option<String>, json: bool, silent: bool) -> Result<()> {
    let actions = load_actions(path)?;
    let total = actions.len();

    let clock: Box<dyn Clock> = match now {
        Some(s) => {
            let pinned = parse_deadline(&s)?.context("--now must not be empty")?;
            Box::new(FixedClock(pinned))
        }
        None => Box::new(SystemClock),
    };
    let (store, rejected) = replay(actions, clock.as_ref());
    info!(total, rejected = rejected.len(), "replay finished");

    if silent {
        return Ok(());
    }
    for r in &rejected {
        eprintln!("Action {} skipped: {}", r.index, r.error);
    }
    if json {
        println!("{}", snapshot_json(&store.snapshot())?);
        return Ok(());
    }
    let now = clock.now();
    if store.tasks().is_empty() {
        println!("No tasks.");
    } else {
        println!("{}", task_table(store.tasks(), now));
    }
    Ok(())
}
