//! Why a store operation was refused. None of these are fatal; the shells
//! log them and carry on.

use thiserror::Error;

use crate::models::TaskId;

#[derive(Debug, Error, PartialEq)]
pub enum TaskError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Task not found: {0}")]
    NotFound(TaskId),

    #[error("Unrecognised deadline '{0}'. Use DD/MM/YYYY HH:MM or YYYY-MM-DD HH:MM.")]
    InvalidDeadline(String),
}

pub type Result<T> = std::result::Result<T, TaskError>;
