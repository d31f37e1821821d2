use thiserror::Error;

use crate::core::types::{Kind, RecordId};
use crate::tokenizer::SyntaxError;

#[derive(Error, Debug)]
pub enum LegendsError {
    #[error("Syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No world loaded")]
    NotLoaded,

    #[error("No {kind} with id {id}")]
    NotFound { kind: Kind, id: RecordId },

    #[error("A load is already in progress")]
    LoadInProgress,

    #[error("Unknown record kind: {0}")]
    UnknownKind(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Load task failed: {0}")]
    TaskFailed(String),
}

pub type Result<T> = std::result::Result<T, LegendsError>;
