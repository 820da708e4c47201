//! Plain data carried by the store: tasks, their ids and the two kinds of
//! unsaved draft.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Identifier of a task, unique for the lifetime of a [`TaskStore`](crate::store::TaskStore).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Represents a single entry in the task list.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Task {
    /// Unique identifier for the task.
    pub id: TaskId,
    /// What needs doing, as typed by the user.
    pub text: String,
    /// Point in time the task should be finished by, if any.
    pub deadline: Option<NaiveDateTime>,
    /// Whether the task has been completed.
    pub done: bool,
}

/// Unsaved contents of the "new task" form.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct AddDraft {
    pub text: String,
    pub deadline: Option<NaiveDateTime>,
}

/// Unsaved contents of the in-place editor for the task `id`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct EditDraft {
    pub id: TaskId,
    pub text: String,
    pub deadline: Option<NaiveDateTime>,
}

impl EditDraft {
    /// Seeds an editor from the task's current values.
    pub fn from_task(task: &Task) -> Self {
        Self {
            id: task.id,
            text: task.text.clone(),
            deadline: task.deadline,
        }
    }
}

/// How a task should be presented at a given moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Done,
    Overdue,
    Pending,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskStatus::Done => "Done",
            TaskStatus::Overdue => "Overdue",
            TaskStatus::Pending => "Pending",
        };
        f.write_str(s)
    }
}
