//! Rubric file
//!
//! The rubric lives in a TOML file with two tables. `[analyze]` holds the
//! expected values graded against, `[constants]` the measurement
//! calibration:
//!
//! ```toml
//! [analyze]
//! slides = 3
//! aspect_ratio = "16/9"
//! text_blocks_1 = 2
//! images_1 = 0
//! font_sizes_1 = "40,24"
//!
//! [constants]
//! text_out_of_bounds = 0
//! text_dimensions_average = 7
//! ```

use std::path::{Path, PathBuf};

use grading::{parse_font_sizes, AspectRatio, Rubric, SlideExpectation};
use indexmap::IndexMap;
use layout_engine::Calibration;
use toml::Value;

use crate::{Result, StoreError};

pub const ANALYZE_SECTION: &str = "analyze";
pub const CONSTANTS_SECTION: &str = "constants";

type Section = IndexMap<String, Value>;

/// Rubric file manager for loading, updating, and saving the rubric
#[derive(Debug, Clone, PartialEq)]
pub struct RubricStore {
    path: PathBuf,
    sections: IndexMap<String, Section>,
}

impl RubricStore {
    /// A store at `path` holding the default rubric
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sections: default_sections(),
        }
    }

    /// Load the rubric file, or the defaults if it doesn't exist
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            tracing::debug!("No rubric at {}, using defaults", path.display());
            return Ok(Self::new(path));
        }
        let content = std::fs::read_to_string(&path)?;
        let sections = toml::from_str(&content)?;
        Ok(Self { path, sections })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Save the rubric to disk
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(&self.sections)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&Value> {
        self.sections.get(section).and_then(|s| s.get(key))
    }

    /// Set one key from its textual form.
    ///
    /// Only keys the rubric reads are accepted. The change is rejected, and
    /// the previous value kept, when it leaves the rubric or calibration
    /// unreadable.
    pub fn set(&mut self, section: &str, key: &str, raw: &str) -> Result<()> {
        let known = default_sections()
            .get(section)
            .is_some_and(|values| values.contains_key(key));
        if !known {
            return Err(StoreError::UnknownKey {
                section: section.to_string(),
                key: key.to_string(),
            });
        }

        let previous = self
            .sections
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), parse_value(raw));

        if let Err(e) = self.rubric().and_then(|_| self.calibration()) {
            if let Some(values) = self.sections.get_mut(section) {
                match previous {
                    Some(value) => {
                        values.insert(key.to_string(), value);
                    }
                    None => {
                        values.shift_remove(key);
                    }
                }
            }
            return Err(e);
        }
        tracing::debug!("Set [{}] {} = {}", section, key, raw);
        Ok(())
    }

    /// Set one key and save
    pub fn update(&mut self, section: &str, key: &str, raw: &str) -> Result<()> {
        self.set(section, key, raw)?;
        self.save()
    }

    /// The rubric described by the `[analyze]` table
    pub fn rubric(&self) -> Result<Rubric> {
        let aspect_ratio = self.text(ANALYZE_SECTION, "aspect_ratio")?;
        let aspect_ratio: AspectRatio = aspect_ratio
            .parse()
            .map_err(|_| invalid(ANALYZE_SECTION, "aspect_ratio", &aspect_ratio))?;

        Ok(Rubric {
            slide_count: self.integer(ANALYZE_SECTION, "slides")?,
            aspect_ratio,
            slides: [self.slide(1)?, self.slide(2)?, self.slide(3)?],
        })
    }

    /// The calibration described by the `[constants]` table
    pub fn calibration(&self) -> Result<Calibration> {
        Ok(Calibration {
            text_offset: self.number(CONSTANTS_SECTION, "text_dimensions_average")?,
            text_out_of_bounds: self.number(CONSTANTS_SECTION, "text_out_of_bounds")?,
        })
    }

    fn slide(&self, index: usize) -> Result<SlideExpectation> {
        let key = format!("font_sizes_{}", index);
        let sizes = self.text(ANALYZE_SECTION, &key)?;
        let font_sizes = parse_font_sizes(&sizes).map_err(|_| invalid(ANALYZE_SECTION, &key, &sizes))?;
        Ok(SlideExpectation {
            text_blocks: self.integer(ANALYZE_SECTION, &format!("text_blocks_{}", index))?,
            images: self.integer(ANALYZE_SECTION, &format!("images_{}", index))?,
            font_sizes,
        })
    }

    fn value(&self, section: &str, key: &str) -> Result<&Value> {
        self.get(section, key).ok_or_else(|| StoreError::MissingKey {
            section: section.to_string(),
            key: key.to_string(),
        })
    }

    fn integer(&self, section: &str, key: &str) -> Result<usize> {
        let value = self.value(section, key)?;
        let n = match value {
            Value::Integer(n) => usize::try_from(*n).ok(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        n.ok_or_else(|| invalid(section, key, value))
    }

    fn number(&self, section: &str, key: &str) -> Result<f64> {
        let value = self.value(section, key)?;
        let n = match value {
            Value::Integer(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        n.ok_or_else(|| invalid(section, key, value))
    }

    fn text(&self, section: &str, key: &str) -> Result<String> {
        match self.value(section, key)? {
            Value::String(s) => Ok(s.clone()),
            Value::Integer(n) => Ok(n.to_string()),
            Value::Float(n) => Ok(n.to_string()),
            other => Err(invalid(section, key, other)),
        }
    }
}

fn invalid(section: &str, key: &str, value: impl ToString) -> StoreError {
    StoreError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
    }
}

/// Typed TOML value for a raw command-line string
pub fn parse_value(raw: &str) -> Value {
    let raw = raw.trim();
    if let Ok(n) = raw.parse::<i64>() {
        Value::Integer(n)
    } else if let Ok(n) = raw.parse::<f64>() {
        Value::Float(n)
    } else {
        Value::String(raw.to_string())
    }
}

fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 {
        Value::Integer(n as i64)
    } else {
        Value::Float(n)
    }
}

fn default_sections() -> IndexMap<String, Section> {
    let rubric = Rubric::default();
    let calibration = Calibration::default();

    let mut analyze = Section::new();
    analyze.insert("slides".into(), Value::Integer(rubric.slide_count as i64));
    analyze.insert("aspect_ratio".into(), Value::String(rubric.aspect_ratio.to_string()));
    for (i, slide) in rubric.slides.iter().enumerate() {
        let n = i + 1;
        let sizes: Vec<String> = slide.font_sizes.iter().map(f64::to_string).collect();
        analyze.insert(format!("text_blocks_{}", n), Value::Integer(slide.text_blocks as i64));
        analyze.insert(format!("images_{}", n), Value::Integer(slide.images as i64));
        analyze.insert(format!("font_sizes_{}", n), Value::String(sizes.join(",")));
    }

    let mut constants = Section::new();
    constants.insert("text_out_of_bounds".into(), number_value(calibration.text_out_of_bounds));
    constants.insert("text_dimensions_average".into(), number_value(calibration.text_offset));

    IndexMap::from([
        (ANALYZE_SECTION.to_string(), analyze),
        (CONSTANTS_SECTION.to_string(), constants),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_rubric_defaults() {
        let store = RubricStore::new("rubric.toml");
        assert_eq!(store.rubric().unwrap(), Rubric::default());
        assert_eq!(store.calibration().unwrap(), Calibration::default());
        assert_eq!(store.get(ANALYZE_SECTION, "font_sizes_3").and_then(Value::as_str), Some("32,18,18,18"));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let store = RubricStore::load(temp_dir.path().join("rubric.toml")).unwrap();
        assert_eq!(store.rubric().unwrap(), Rubric::default());
    }

    #[test]
    fn test_update_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config").join("rubric.toml");
        let mut store = RubricStore::load(&path).unwrap();

        store.update(ANALYZE_SECTION, "slides", "4").unwrap();
        store.update(ANALYZE_SECTION, "aspect_ratio", "4/3").unwrap();
        store.update(ANALYZE_SECTION, "font_sizes_2", "36, 20").unwrap();
        store.update(CONSTANTS_SECTION, "text_dimensions_average", "6.5").unwrap();

        let reloaded = RubricStore::load(&path).unwrap();
        let rubric = reloaded.rubric().unwrap();
        assert_eq!(rubric.slide_count, 4);
        assert_eq!(rubric.aspect_ratio, AspectRatio::new(4, 3));
        assert_eq!(rubric.slides[1].font_sizes, vec![36.0, 20.0]);
        assert_eq!(reloaded.calibration().unwrap().text_offset, 6.5);
    }

    #[test]
    fn test_single_font_size_stored_as_integer() {
        let mut store = RubricStore::new("rubric.toml");
        store.set(ANALYZE_SECTION, "font_sizes_1", "40").unwrap();
        assert_eq!(store.rubric().unwrap().slides[0].font_sizes, vec![40.0]);
    }

    #[test]
    fn test_invalid_value_is_rejected_and_reverted() {
        let mut store = RubricStore::new("rubric.toml");
        let err = store.set(ANALYZE_SECTION, "aspect_ratio", "wide").unwrap_err();
        assert!(matches!(err, StoreError::InvalidValue { .. }));
        assert_eq!(store.rubric().unwrap().aspect_ratio, AspectRatio::new(16, 9));

        assert!(store.set(ANALYZE_SECTION, "slides", "-1").is_err());
        assert_eq!(store.rubric().unwrap().slide_count, 3);
    }

    #[test]
    fn test_unknown_section_or_key_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("rubric.toml");
        let mut store = RubricStore::load(&path).unwrap();

        let err = store.update("analyse", "slides", "4").unwrap_err();
        assert!(matches!(err, StoreError::UnknownKey { .. }));
        assert!(store.set(ANALYZE_SECTION, "slide", "4").is_err());
        assert!(store.set(CONSTANTS_SECTION, "slides", "4").is_err());

        assert!(store.get("analyse", "slides").is_none());
        assert!(!path.exists());
        assert_eq!(store, RubricStore::new(&path));
    }

    #[test]
    fn test_missing_key() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("rubric.toml");
        std::fs::write(&path, "[analyze]\nslides = 3\n\n[constants]\n").unwrap();

        let store = RubricStore::load(&path).unwrap();
        match store.rubric().unwrap_err() {
            StoreError::MissingKey { section, key } => {
                assert_eq!(section, "analyze");
                assert_eq!(key, "aspect_ratio");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("rubric.toml");
        std::fs::write(&path, "[analyze\nslides = 3").unwrap();
        assert!(matches!(RubricStore::load(&path), Err(StoreError::TomlParse(_))));
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("3"), Value::Integer(3));
        assert_eq!(parse_value("6.5"), Value::Float(6.5));
        assert_eq!(parse_value("16/9"), Value::String("16/9".into()));
        assert_eq!(parse_value("24,18"), Value::String("24,18".into()));
    }
}
