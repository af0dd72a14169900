//! Layout Engine - Shape geometry, collisions, and layout template matching
//!
//! This crate turns raw shape geometry into pixel bounding boxes, classifies
//! each shape's role on its slide, and infers which registered layout
//! template a deck's body slides follow.

mod classify;
mod error;
mod geometry;
mod matcher;
mod resolver;
mod template;

pub use classify::*;
pub use error::*;
pub use geometry::*;
pub use matcher::*;
pub use resolver::*;
pub use template::*;
