//! Error types for grading

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GradeError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Grading is undefined for a deck with {slides} slide(s); at least 2 are required")]
    UnsupportedDocument { slides: usize },

    #[error("Document error: {0}")]
    Deck(#[from] deck_model::DeckError),

    #[error("Layout error: {0}")]
    Layout(#[from] layout_engine::LayoutError),

    #[error("Failed to hash picture {shape}: {reason}")]
    Hash { shape: String, reason: String },
}

pub type Result<T> = std::result::Result<T, GradeError>;
