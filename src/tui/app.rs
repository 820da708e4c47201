use std::cell::{Cell, RefCell};
use std::rc::Rc;

use chrono::NaiveDateTime;
use ratatui::widgets::TableState;
use tracing::debug;

use crate::clock::{format_deadline, parse_deadline, Clock};
use crate::error::Result;
use crate::models::{Task, TaskId};
use crate::store::{Snapshot, TaskStore};
use super::input::InputField;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    Adding,
    Editing,
}

/// Which line of the add form or editor has focus.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormField {
    Text,
    Deadline,
}

pub struct App {
    pub store: TaskStore,
    /// Latest state published by the store.
    pub view: Rc<RefCell<Snapshot>>,
    dirty: Rc<Cell<bool>>,
    pub state: TableState,
    pub input_mode: InputMode,
    pub field: FormField,
    pub text_input: InputField,
    pub deadline_input: InputField,
    clock: Box<dyn Clock>,
}

fn deadline_text(deadline: Option<NaiveDateTime>) -> String {
    deadline.as_ref().map(format_deadline).unwrap_or_default()
}

impl App {
    /// Creates a new App with an empty list, subscribed to its store.
    pub fn new(clock: Box<dyn Clock>) -> App {
        let mut store = TaskStore::new(clock.now());
        let view = Rc::new(RefCell::new(store.snapshot()));
        let dirty = Rc::new(Cell::new(true));
        store.subscribe({
            let view = view.clone();
            let dirty = dirty.clone();
            move |snapshot| {
                *view.borrow_mut() = snapshot.clone();
                dirty.set(true);
            }
        });

        App {
            store,
            view,
            dirty,
            state: TableState::default(),
            input_mode: InputMode::Normal,
            field: FormField::Text,
            text_input: InputField::new(),
            deadline_input: InputField::new(),
            clock,
        }
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    /// Returns whether a redraw is pending and clears the flag.
    pub fn take_dirty(&self) -> bool {
        self.dirty.replace(false)
    }

    pub fn mark_dirty(&self) {
        self.dirty.set(true);
    }

    /// Selects the next task, wrapping around.
    pub fn next(&mut self) {
        let len = self.view.borrow().tasks.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    /// Selects the previous task, wrapping around.
    pub fn previous(&mut self) {
        let len = self.view.borrow().tasks.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn selected_task(&self) -> Option<Task> {
        let i = self.state.selected()?;
        self.view.borrow().tasks.get(i).cloned()
    }

    fn selected_id(&self) -> Option<TaskId> {
        self.selected_task().map(|t| t.id)
    }

    /// Keeps the selection on a valid row after the list changed.
    fn sync_selection(&mut self) {
        let len = self.view.borrow().tasks.len();
        if len == 0 {
            self.state.select(None);
        } else if let Some(i) = self.state.selected() {
            if i >= len {
                self.state.select(Some(len - 1));
            }
        } else {
            self.state.select(Some(0));
        }
    }

    /// Rejections are silent for the user; they only reach the log.
    fn ignore<T>(&self, result: Result<T>) -> Option<T> {
        match result {
            Ok(v) => Some(v),
            Err(e) => {
                debug!("ignored: {}", e);
                None
            }
        }
    }

    /// Marks the selected task done, or not done again.
    pub fn toggle_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            let res = self.store.toggle(id);
            self.ignore(res);
        }
    }

    pub fn delete_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            let res = self.store.delete(id);
            self.ignore(res);
            self.sync_selection();
        }
    }

    /// Focuses the add form, loading the current draft into the inputs.
    pub fn start_add(&mut self) {
        let draft = self.store.draft().clone();
        self.text_input = InputField::with_value(&draft.text);
        self.deadline_input = InputField::with_value(&deadline_text(draft.deadline));
        self.field = FormField::Text;
        self.input_mode = InputMode::Adding;
    }

    /// Opens the in-place editor on the selected task.
    pub fn start_edit(&mut self) {
        let Some(id) = self.selected_id() else { return };
        let res = self.store.start_edit(id);
        if self.ignore(res).is_none() {
            return;
        }
        if let Some(edit) = self.store.editing() {
            self.text_input = InputField::with_value(&edit.text);
            self.deadline_input = InputField::with_value(&deadline_text(edit.deadline));
        }
        self.field = FormField::Text;
        self.input_mode = InputMode::Editing;
    }

    pub fn switch_field(&mut self) {
        self.field = match self.field {
            FormField::Text => FormField::Deadline,
            FormField::Deadline => FormField::Text,
        };
    }

    fn focused_input(&mut self) -> &mut InputField {
        match self.field {
            FormField::Text => &mut self.text_input,
            FormField::Deadline => &mut self.deadline_input,
        }
    }

    /// Applies an edit to the focused input and forwards it to the store's
    /// draft. A deadline is forwarded only while it parses; a half-typed
    /// value leaves the last good one in place.
    pub fn edit_input(&mut self, f: impl FnOnce(&mut InputField)) {
        f(self.focused_input());
        match self.field {
            FormField::Text => {
                let text = self.text_input.value.clone();
                match self.input_mode {
                    InputMode::Adding => self.store.set_draft_text(text),
                    InputMode::Editing => self.store.set_edit_text(text),
                    InputMode::Normal => {}
                }
            }
            FormField::Deadline => self.sync_deadline(),
        }
    }

    fn sync_deadline(&mut self) {
        let Ok(deadline) = parse_deadline(&self.deadline_input.value) else { return };
        match self.input_mode {
            InputMode::Adding => self.store.set_draft_deadline(deadline),
            InputMode::Editing => self.store.set_edit_deadline(deadline),
            InputMode::Normal => {}
        }
    }

    /// Enter in a form: add the task or save the edit.
    pub fn submit(&mut self) {
        let res = parse_deadline(&self.deadline_input.value);
        let Some(deadline) = self.ignore(res) else { return };
        match self.input_mode {
            InputMode::Adding => {
                self.store.set_draft_deadline(deadline);
                let res = self.store.submit_draft(self.clock.now());
                if self.ignore(res).is_some() {
                    self.input_mode = InputMode::Normal;
                    let len = self.view.borrow().tasks.len();
                    self.state.select(Some(len - 1));
                }
            }
            InputMode::Editing => {
                let Some(id) = self.store.editing().map(|e| e.id) else { return };
                self.store.set_edit_deadline(deadline);
                let res = self.store.save_edit(id);
                self.ignore(res);
                self.input_mode = InputMode::Normal;
            }
            InputMode::Normal => {}
        }
    }

    /// Esc in a form. The add draft is kept; an edit is discarded.
    pub fn leave_form(&mut self) {
        match self.input_mode {
            InputMode::Adding => self.sync_deadline(),
            InputMode::Editing => self.store.cancel_edit(),
            InputMode::Normal => {}
        }
        self.input_mode = InputMode::Normal;
    }
}
