//! Error types for layout engine

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Invalid zone descriptor {descriptor:?}: {reason}")]
    InvalidDescriptor { descriptor: String, reason: String },

    #[error("Invalid zone key {0:?}: expected <title|text|images>_<2|3>")]
    InvalidZoneKey(String),

    #[error("Numerator {0:?} outside the supported range 1..=9")]
    NumeratorOutOfRange(String),

    #[error("Document error: {0}")]
    Deck(#[from] deck_model::DeckError),
}

pub type Result<T> = std::result::Result<T, LayoutError>;
