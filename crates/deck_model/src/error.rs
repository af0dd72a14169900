//! Error types for document access

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeckError {
    #[error("Document provider unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to open document {path}: {reason}")]
    OpenFailed { path: PathBuf, reason: String },

    #[error("Slide {index} out of range (document has {count} slides)")]
    SlideOutOfRange { index: usize, count: usize },

    #[error("Shape not found: slide {slide}, shape {index}")]
    ShapeNotFound { slide: usize, index: usize },

    #[error("Unsupported operation on shape {name}: {operation}")]
    Unsupported { name: String, operation: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot format error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DeckError>;
