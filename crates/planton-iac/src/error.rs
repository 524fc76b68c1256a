//! IaC engine error types

use thiserror::Error;

/// Errors raised while running a stack
#[derive(Error, Debug)]
pub enum IacError {
    #[error("Duplicate resource URN: {0}")]
    DuplicateResource(String),

    #[error("Duplicate stack output: {0}")]
    DuplicateOutput(String),

    #[error("Invalid resource {name}: {reason}")]
    InvalidResource { name: String, reason: String },

    #[error("Engine error: {0}")]
    Engine(String),

    #[error("State file error: {0}")]
    StateError(String),

    #[error("Lock acquisition failed: {0}")]
    LockError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, IacError>;
