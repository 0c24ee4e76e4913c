// src/error.rs

use thiserror::Error;

/// Everything that can go wrong between a raw document and a stored report.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The document could not be read as text (corrupt, not a PDF, or
    /// scanned/image-only). Nothing is decoded or stored.
    #[error("could not extract text from document: {0}")]
    Extraction(String),

    /// The extracted text did not contain enough numeric tokens to decode
    /// even a partial report. The previously stored report is untouched.
    #[error("insufficient numeric data: found {found} tokens, need at least {min}")]
    InsufficientData { found: usize, min: usize },

    /// An edit referenced a channel slot that does not exist. This is a
    /// caller bug, not a user-recoverable condition.
    #[error("channel index {index} out of range ({len} channels)")]
    ChannelIndex { index: usize, len: usize },

    #[error("report store: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("report store path: {0}")]
    StorePath(#[from] std::io::Error),

    #[error("report serialization: {0}")]
    Serialize(#[from] serde_json::Error),
}
