//! Boundary errors
//!
//! Detection itself never fails; these cover decoding the host's inputs and
//! encoding the results handed back to it.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DetectError {
    #[error("{0} is null")]
    NullPointer(&'static str),

    #[error("Invalid UTF-8 in {0}")]
    InvalidUtf8(&'static str),

    #[error("Failed to parse request JSON: {0}")]
    InvalidRequest(#[source] serde_json::Error),

    #[error("Failed to parse layout snapshot: {0}")]
    InvalidSnapshot(#[source] serde_json::Error),

    #[error("Failed to parse records JSON: {0}")]
    InvalidRecords(#[source] serde_json::Error),

    #[error("Failed to serialize result: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Result contains null bytes")]
    NulByte,
}

pub type Result<T> = std::result::Result<T, DetectError>;
