//! A deadline-aware task list.
//!
//! [`store::TaskStore`] holds the tasks and the unsaved form contents,
//! publishes a [`store::Snapshot`] to subscribers after every change, and
//! accepts user intents as [`action::Action`] values. Overdue status is
//! never stored: ask [`overdue::is_overdue`] with the current time.

pub mod action;
pub mod clock;
pub mod commands;
pub mod error;
pub mod models;
pub mod overdue;
pub mod store;
pub mod tui;
