//! Deck Model - Slide deck snapshots and the document provider capability
//!
//! This crate defines what the grading core can ask of an open slide deck:
//! page setup, slides, shapes with their raw point geometry, and the few
//! reversible mutations needed to measure text and picture scale. It also
//! ships a JSON snapshot provider so decks can be graded without a host
//! application.

mod deck;
mod error;
mod memory;
mod provider;
mod shape;

pub use deck::*;
pub use error::*;
pub use memory::*;
pub use provider::*;
pub use shape::*;
