//! Layout template file
//!
//! One TOML table per template, in registration order. Keys name a zone
//! kind and body slide, values list zone rectangles:
//!
//! ```toml
//! [DEFAULT]
//! title_2 = "0-e,0-e,1-w,4-h"
//! images_3 = "0-e,0-e,3-w,2-h|3-w,2-h,3-w,2-h"
//! ```

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use layout_engine::{LayoutRegistry, LayoutTemplate};

use crate::Result;

type Zones = IndexMap<String, String>;

/// Templates shipped with the grader
const DEFAULT_LAYOUTS: &[(&str, &[(&str, &str)])] = &[
    (
        "DEFAULT",
        &[
            ("title_2", "0-e,0-e,1-w,4-h"),
            ("images_2", "0-e,0-e,2-w,1-h"),
            ("text_2", "2-w,0-e,2-w,1-h"),
            ("title_3", "0-e,0-e,1-w,4-h"),
            ("images_3", "0-e,0-e,3-w,2-h|3-w,2-h,3-w,2-h|3*2-w,0-e,3-w,2-h"),
            ("text_3", "0-e,2-h,3-w,2-h|3-w,0-e,3-w,2-h|3*2-w,2-h,3-w,2-h"),
        ],
    ),
    (
        "MIRRORED",
        &[
            ("title_2", "0-e,0-e,1-w,4-h"),
            ("images_2", "2-w,0-e,2-w,1-h"),
            ("text_2", "0-e,0-e,2-w,1-h"),
            ("title_3", "0-e,0-e,1-w,4-h"),
            ("images_3", "0-e,2-h,3-w,2-h|3-w,0-e,3-w,2-h|3*2-w,2-h,3-w,2-h"),
            ("text_3", "0-e,0-e,3-w,2-h|3-w,2-h,3-w,2-h|3*2-w,0-e,3-w,2-h"),
        ],
    ),
];

/// Layout file manager for loading, extending, and saving templates
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutStore {
    path: PathBuf,
    layouts: IndexMap<String, Zones>,
}

impl LayoutStore {
    /// A store at `path` holding the built-in templates
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let layouts = DEFAULT_LAYOUTS
            .iter()
            .map(|(name, zones)| {
                let zones = zones.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
                (name.to_string(), zones)
            })
            .collect();
        Self {
            path: path.into(),
            layouts,
        }
    }

    /// Load the layout file, or the built-in templates if it doesn't exist
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            tracing::debug!("No layouts at {}, using built-in templates", path.display());
            return Ok(Self::new(path));
        }
        let content = std::fs::read_to_string(&path)?;
        let layouts = toml::from_str(&content)?;
        Ok(Self { path, layouts })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Save the templates to disk
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(&self.layouts)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.layouts.keys().map(String::as_str)
    }

    /// Parse every template, in file order
    pub fn registry(&self) -> Result<LayoutRegistry> {
        let mut registry = LayoutRegistry::new();
        for (name, zones) in &self.layouts {
            let template = LayoutTemplate::from_entries(
                name.as_str(),
                zones.iter().map(|(k, v)| (k.as_str(), v.as_str())),
            )?;
            registry.register(template);
        }
        Ok(registry)
    }

    /// Add a template. Zone keys of an existing template with the same name
    /// are replaced; its other keys stay.
    pub fn add_layout(&mut self, template: &LayoutTemplate) {
        let zones = self.layouts.entry(template.name().to_string()).or_default();
        for (key, value) in template.entries() {
            zones.insert(key, value);
        }
        tracing::info!("Added layout {}", template.name());
    }
}
