//! Grading Engine
//!
//! This crate turns a deck into a grade. It provides:
//! - The rubric the deck is held against
//! - Rubric rules grouped by category, evaluated by [`Grader`]
//! - Grade aggregation into 0, 1 or 2
//! - Picture originality and distortion checks
//! - Advisory warnings that never affect the grade

mod error;
mod grade;
mod images;
mod report;
mod rubric;
mod rules;
mod warnings;

pub use error::*;
pub use grade::*;
pub use images::*;
pub use report::*;
pub use rubric::*;
pub use rules::*;
pub use warnings::*;
