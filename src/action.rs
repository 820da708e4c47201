//! User intents as data, for [`TaskStore::dispatch`](crate::store::TaskStore::dispatch)
//! and replay scripts.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::clock::deserialize_deadline;
use crate::models::TaskId;

/// A single user intent, as raised by a shell and dispatched into the
/// [`TaskStore`](crate::store::TaskStore).
///
/// Serialised with an `action` tag, so a replay script reads like
/// `{"action": "toggle", "id": 1}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Add a task directly, bypassing the form.
    Add {
        text: String,
        #[serde(default, deserialize_with = "deserialize_deadline")]
        deadline: Option<NaiveDateTime>,
    },
    /// Text typed into the add form.
    SetDraftText { text: String },
    /// Deadline picked in the add form.
    SetDraftDeadline {
        #[serde(default, deserialize_with = "deserialize_deadline")]
        deadline: Option<NaiveDateTime>,
    },
    /// Press "add" on the form.
    SubmitDraft,
    Toggle { id: TaskId },
    Delete { id: TaskId },
    StartEdit { id: TaskId },
    SetEditText { text: String },
    SetEditDeadline {
        #[serde(default, deserialize_with = "deserialize_deadline")]
        deadline: Option<NaiveDateTime>,
    },
    SaveEdit { id: TaskId },
    CancelEdit,
}
