//! Store - Configuration files, reference images, and report export
//!
//! This crate handles everything the grader reads from or writes to disk:
//! the rubric file, the layout template file, the reference image set and
//! its perceptual hashes, and CSV reports.

mod error;
mod layouts;
mod reference_images;
mod report;
mod rubric;

pub use error::*;
pub use layouts::*;
pub use reference_images::*;
pub use report::*;
pub use rubric::*;
