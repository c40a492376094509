//! Event journal errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EventError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid record in {path} at line {line}: {reason}")]
    InvalidLine {
        path: String,
        line: usize,
        reason: String,
    },

    #[error("Journal lock poisoned")]
    Poisoned,
}
