//! Error types for storage operations

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Failed to write TOML: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to read image {path}: {reason}")]
    Image { path: PathBuf, reason: String },

    #[error("Missing configuration key [{section}] {key}")]
    MissingKey { section: String, key: String },

    #[error("Unknown configuration key [{section}] {key}")]
    UnknownKey { section: String, key: String },

    #[error("Invalid value for [{section}] {key}: {value}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
    },

    #[error("Reference image set not found: {0}")]
    ReferenceSetMissing(PathBuf),

    #[error("Layout error: {0}")]
    Layout(#[from] layout_engine::LayoutError),

    #[error("Grading error: {0}")]
    Grade(#[from] grading::GradeError),
}

pub type Result<T> = std::result::Result<T, StoreError>;
