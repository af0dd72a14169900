//! Where the grader keeps its files

use std::path::PathBuf;

const APP_DIR: &str = "deck-grader";

/// Paths of the rubric, layout file and reference image set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    root: PathBuf,
}

impl AppPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The platform config directory, or `.deck-grader` when there is none
    pub fn from_platform() -> Self {
        let root = dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .unwrap_or_else(|| PathBuf::from(format!(".{}", APP_DIR)));
        Self::new(root)
    }

    pub fn rubric(&self) -> PathBuf {
        self.root.join("rubric.toml")
    }

    pub fn layouts(&self) -> PathBuf {
        self.root.join("layouts.toml")
    }

    pub fn references(&self) -> PathBuf {
        self.root.join("original_images")
    }
}
