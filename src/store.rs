//! The in-memory task list and its drafts.
//!
//! Every operation is a synchronous mutation on the list. Operations that
//! change state notify subscribers with a fresh [`Snapshot`]; operations
//! that are rejected return an error and leave the store untouched.

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::debug;

use crate::action::Action;
use crate::error::{Result, TaskError};
use crate::models::{AddDraft, EditDraft, Task, TaskId};

/// Immutable copy of the store state handed to subscribers.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub tasks: Vec<Task>,
    pub draft: AddDraft,
    pub editing: Option<EditDraft>,
}

impl Snapshot {
    /// Id of the task currently open in the editor.
    pub fn editing_id(&self) -> Option<TaskId> {
        self.editing.as_ref().map(|e| e.id)
    }
}

/// Handle returned by [`TaskStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&Snapshot)>;

/// Owns the task list, the add-form draft and the single edit draft, and
/// hands out task ids from a counter that never goes back.
pub struct TaskStore {
    tasks: Vec<Task>,
    next_id: u64,
    draft: AddDraft,
    editing: Option<EditDraft>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl TaskStore {
    /// Creates an empty store whose add form defaults its deadline to `now`.
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 1,
            draft: AddDraft {
                text: String::new(),
                deadline: Some(now),
            },
            editing: None,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn draft(&self) -> &AddDraft {
        &self.draft
    }

    pub fn editing(&self) -> Option<&EditDraft> {
        self.editing.as_ref()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tasks: self.tasks.clone(),
            draft: self.draft.clone(),
            editing: self.editing.clone(),
        }
    }

    /// Registers `f` to be called with a snapshot after every change.
    pub fn subscribe(&mut self, f: impl FnMut(&Snapshot) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(f)));
        id
    }

    /// Drops a subscriber. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    fn emit(&mut self) {
        if self.subscribers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(&snapshot);
        }
    }

    fn task_mut(&mut self, id: TaskId) -> Result<&mut Task> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(TaskError::NotFound(id))
    }

    /// Appends a new task and resets the add form.
    ///
    /// Text that is empty once trimmed is rejected with
    /// [`TaskError::InvalidInput`]. The text itself is stored as typed.
    pub fn add(
        &mut self,
        text: &str,
        deadline: Option<NaiveDateTime>,
        now: NaiveDateTime,
    ) -> Result<Task> {
        if text.trim().is_empty() {
            return Err(TaskError::InvalidInput("task text is empty".into()));
        }
        let task = Task {
            id: TaskId(self.next_id),
            text: text.to_string(),
            deadline,
            done: false,
        };
        self.next_id += 1;
        self.tasks.push(task.clone());
        self.draft = AddDraft {
            text: String::new(),
            deadline: Some(now),
        };
        debug!(id = %task.id, "task added");
        self.emit();
        Ok(task)
    }

    /// Adds a task from the current add-form contents.
    pub fn submit_draft(&mut self, now: NaiveDateTime) -> Result<Task> {
        let AddDraft { text, deadline } = self.draft.clone();
        self.add(&text, deadline, now)
    }

    pub fn set_draft_text(&mut self, text: impl Into<String>) {
        self.draft.text = text.into();
        self.emit();
    }

    pub fn set_draft_deadline(&mut self, deadline: Option<NaiveDateTime>) {
        self.draft.deadline = deadline;
        self.emit();
    }

    /// Flips the completion flag of the task `id`.
    pub fn toggle(&mut self, id: TaskId) -> Result<()> {
        let task = self.task_mut(id)?;
        task.done = !task.done;
        self.emit();
        Ok(())
    }

    /// Removes the task `id`, closing the editor if it was open on it.
    pub fn delete(&mut self, id: TaskId) -> Result<()> {
        let idx = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(TaskError::NotFound(id))?;
        self.tasks.remove(idx);
        if self.editing.as_ref().is_some_and(|e| e.id == id) {
            self.editing = None;
        }
        debug!(%id, "task deleted");
        self.emit();
        Ok(())
    }

    /// Opens the editor on task `id`, replacing any edit in progress.
    pub fn start_edit(&mut self, id: TaskId) -> Result<()> {
        let draft = self
            .get(id)
            .map(EditDraft::from_task)
            .ok_or(TaskError::NotFound(id))?;
        self.editing = Some(draft);
        self.emit();
        Ok(())
    }

    pub fn set_edit_text(&mut self, text: impl Into<String>) {
        if let Some(edit) = self.editing.as_mut() {
            edit.text = text.into();
            self.emit();
        }
    }

    pub fn set_edit_deadline(&mut self, deadline: Option<NaiveDateTime>) {
        if let Some(edit) = self.editing.as_mut() {
            edit.deadline = deadline;
            self.emit();
        }
    }

    /// Writes the editor contents back into task `id` and closes the editor.
    ///
    /// Fails with [`TaskError::NotFound`] unless `id` is the task being
    /// edited and still exists.
    pub fn save_edit(&mut self, id: TaskId) -> Result<()> {
        let draft = match &self.editing {
            Some(edit) if edit.id == id => edit.clone(),
            _ => return Err(TaskError::NotFound(id)),
        };
        let task = self.task_mut(id)?;
        task.text = draft.text;
        task.deadline = draft.deadline;
        self.editing = None;
        self.emit();
        Ok(())
    }

    /// Closes the editor without touching any task.
    pub fn cancel_edit(&mut self) {
        if self.editing.take().is_some() {
            self.emit();
        }
    }

    /// Routes an [`Action`] to the matching operation.
    pub fn dispatch(&mut self, action: Action, now: NaiveDateTime) -> Result<()> {
        match action {
            Action::Add { text, deadline } => self.add(&text, deadline, now).map(|_| ()),
            Action::SetDraftText { text } => {
                self.set_draft_text(text);
                Ok(())
            }
            Action::SetDraftDeadline { deadline } => {
                self.set_draft_deadline(deadline);
                Ok(())
            }
            Action::SubmitDraft => self.submit_draft(now).map(|_| ()),
            Action::Toggle { id } => self.toggle(id),
            Action::Delete { id } => self.delete(id),
            Action::StartEdit { id } => self.start_edit(id),
            Action::SetEditText { text } => {
                self.set_edit_text(text);
                Ok(())
            }
            Action::SetEditDeadline { deadline } => {
                self.set_edit_deadline(deadline);
                Ok(())
            }
            Action::SaveEdit { id } => self.save_edit(id),
            Action::CancelEdit => {
                self.cancel_edit();
                Ok(())
            }
        }
    }
}
