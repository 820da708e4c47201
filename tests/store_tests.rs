use chrono::{NaiveDate, NaiveDateTime};
use todolist::error::TaskError;
use todolist::models::TaskId;
use todolist::overdue::is_overdue;
use todolist::store::TaskStore;

fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, 0, 0).unwrap()
}

fn now() -> NaiveDateTime {
    at(2024, 1, 1, 8)
}

#[test]
fn test_add_appends_fresh_task() {
    let mut store = TaskStore::new(now());
    let deadline = Some(at(2024, 1, 5, 12));
    let a = store.add("Write report", deadline, now()).unwrap();
    let b = store.add("Write report", None, now()).unwrap();

    assert_eq!(store.tasks().len(), 2);
    assert_ne!(a.id, b.id);
    assert_eq!(store.tasks()[0].text, "Write report");
    assert_eq!(store.tasks()[0].deadline, deadline);
    assert!(!store.tasks()[0].done);
}

#[test]
fn test_add_resets_draft() {
    let mut store = TaskStore::new(at(2024, 1, 1, 0));
    assert_eq!(store.draft().deadline, Some(at(2024, 1, 1, 0)));
    store.set_draft_text("Pay rent");
    store.set_draft_deadline(Some(at(2024, 2, 1, 0)));

    let later = at(2024, 1, 1, 9);
    let task = store.submit_draft(later).unwrap();
    assert_eq!(task.text, "Pay rent");
    assert_eq!(task.deadline, Some(at(2024, 2, 1, 0)));
    assert_eq!(store.draft().text, "");
    assert_eq!(store.draft().deadline, Some(later));
}

#[test]
fn test_blank_text_is_rejected() {
    let mut store = TaskStore::new(now());
    store.add("A", None, now()).unwrap();
    let before = store.snapshot();

    assert!(matches!(store.add("", None, now()), Err(TaskError::InvalidInput(_))));
    assert!(matches!(store.add("   ", None, now()), Err(TaskError::InvalidInput(_))));
    store.set_draft_text(" \t ");
    assert!(store.submit_draft(now()).is_err());

    assert_eq!(store.tasks(), before.tasks.as_slice());
    assert_eq!(store.draft().text, " \t ");
}

#[test]
fn test_toggle_twice_restores_done() {
    let mut store = TaskStore::new(now());
    let a = store.add("A", None, now()).unwrap();
    store.toggle(a.id).unwrap();
    assert!(store.get(a.id).unwrap().done);
    store.toggle(a.id).unwrap();
    assert!(!store.get(a.id).unwrap().done);
}

#[test]
fn test_operations_after_delete_are_noops() {
    let mut store = TaskStore::new(now());
    let a = store.add("A", None, now()).unwrap();
    let b = store.add("B", None, now()).unwrap();
    store.delete(a.id).unwrap();
    let before = store.snapshot();

    assert_eq!(store.delete(a.id), Err(TaskError::NotFound(a.id)));
    assert_eq!(store.toggle(a.id), Err(TaskError::NotFound(a.id)));
    assert_eq!(store.start_edit(a.id), Err(TaskError::NotFound(a.id)));
    assert_eq!(store.save_edit(a.id), Err(TaskError::NotFound(a.id)));
    assert_eq!(store.snapshot(), before);
    assert_eq!(store.tasks()[0].id, b.id);
}

#[test]
fn test_ids_are_not_reused() {
    let mut store = TaskStore::new(now());
    let a = store.add("A", None, now()).unwrap();
    let b = store.add("B", None, now()).unwrap();
    store.delete(b.id).unwrap();
    let c = store.add("C", None, now()).unwrap();
    assert_ne!(c.id, a.id);
    assert_ne!(c.id, b.id);
}

#[test]
fn test_deleting_edited_task_closes_editor() {
    let mut store = TaskStore::new(now());
    let a = store.add("A", None, now()).unwrap();
    store.start_edit(a.id).unwrap();
    store.delete(a.id).unwrap();
    assert!(store.editing().is_none());
}

#[test]
fn test_buy_milk_scenario() {
    let mut store = TaskStore::new(now());
    let deadline = at(2024, 1, 1, 10);
    let task = store.add("Buy milk", Some(deadline), now()).unwrap();

    assert_eq!(store.tasks().len(), 1);
    assert_eq!(store.tasks()[0].text, "Buy milk");
    assert_eq!(store.tasks()[0].deadline, Some(deadline));
    assert!(!store.tasks()[0].done);

    let next_day = at(2024, 1, 2, 0);
    assert!(is_overdue(&store.tasks()[0], next_day));
    store.toggle(task.id).unwrap();
    assert!(!is_overdue(&store.tasks()[0], next_day));
}

#[test]
fn test_insertion_order_survives_toggle() {
    let mut store = TaskStore::new(now());
    let a = store.add("A", None, now()).unwrap();
    store.add("B", None, now()).unwrap();
    store.toggle(a.id).unwrap();

    let texts: Vec<&str> = store.tasks().iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, ["A", "B"]);
}

#[test]
fn test_edit_and_save() {
    let mut store = TaskStore::new(now());
    store.add("A", None, now()).unwrap();
    let b = store.add("B", None, now()).unwrap();
    let new_deadline = Some(at(2024, 3, 1, 17));

    store.start_edit(b.id).unwrap();
    assert_eq!(store.editing().unwrap().text, "B");
    store.set_edit_text("B2");
    store.set_edit_deadline(new_deadline);
    store.save_edit(b.id).unwrap();

    let texts: Vec<&str> = store.tasks().iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, ["A", "B2"]);
    assert_eq!(store.get(b.id).unwrap().deadline, new_deadline);
    assert!(store.editing().is_none());
    assert_eq!(store.snapshot().editing_id(), None);
}

#[test]
fn test_edit_and_cancel() {
    let mut store = TaskStore::new(now());
    store.add("A", None, now()).unwrap();
    let deadline = Some(at(2024, 1, 9, 9));
    let b = store.add("B", deadline, now()).unwrap();

    store.start_edit(b.id).unwrap();
    assert_eq!(store.snapshot().editing_id(), Some(b.id));
    store.set_edit_text("B2");
    store.set_edit_deadline(None);
    store.cancel_edit();

    let task = store.get(b.id).unwrap();
    assert_eq!(task.text, "B");
    assert_eq!(task.deadline, deadline);
    assert!(store.editing().is_none());
}

#[test]
fn test_unknown_id_never_panics() {
    let mut store = TaskStore::new(now());
    let ghost = TaskId(99);
    assert!(store.toggle(ghost).is_err());
    assert!(store.delete(ghost).is_err());
    assert!(store.start_edit(ghost).is_err());
    assert!(store.save_edit(ghost).is_err());
    store.cancel_edit();
    assert!(store.tasks().is_empty());
}
