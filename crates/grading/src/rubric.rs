//! Rubric expectations

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::GradeError;

/// Slides that carry per-slide expectations
pub const RUBRIC_SLIDES: usize = 3;

/// Allowed difference between the deck's and the expected width/height ratio
pub const ASPECT_RATIO_TOLERANCE: f64 = 0.01;

/// Expected width/height ratio, written `W/H`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectRatio {
    pub width: u32,
    pub height: u32,
}

impl AspectRatio {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    /// Whether a page of `width` x `height` has this ratio
    pub fn matches(&self, width: f64, height: f64) -> bool {
        height > 0.0 && (width / height - self.ratio()).abs() < ASPECT_RATIO_TOLERANCE
    }
}

impl FromStr for AspectRatio {
    type Err = GradeError;

    fn from_str(s: &str) -> Result<Self, GradeError> {
        let invalid = || GradeError::Configuration(format!("invalid aspect ratio {:?}, expected W/H", s));
        let (width, height) = s.split_once('/').ok_or_else(invalid)?;
        let width: u32 = width.trim().parse().map_err(|_| invalid())?;
        let height: u32 = height.trim().parse().map_err(|_| invalid())?;
        if width == 0 || height == 0 {
            return Err(invalid());
        }
        Ok(Self { width, height })
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.width, self.height)
    }
}

/// What one slide is expected to contain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideExpectation {
    /// Text blocks, counting title and subtitle placeholders
    pub text_blocks: usize,
    pub images: usize,
    /// Font sizes in enumeration order, title slots first
    pub font_sizes: Vec<f64>,
}

impl SlideExpectation {
    pub fn new(text_blocks: usize, images: usize, font_sizes: Vec<f64>) -> Self {
        Self {
            text_blocks,
            images,
            font_sizes,
        }
    }
}

/// Parse a comma-separated list of font sizes such as `24,18`
pub fn parse_font_sizes(s: &str) -> Result<Vec<f64>, GradeError> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<f64>()
                .map_err(|_| GradeError::Configuration(format!("invalid font size {:?}", part)))
        })
        .collect()
}

/// Expected values for every graded rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rubric {
    pub slide_count: usize,
    pub aspect_ratio: AspectRatio,
    /// Expectations for slides 1, 2 and 3
    pub slides: [SlideExpectation; RUBRIC_SLIDES],
}

impl Rubric {
    /// Expectations for slide `index` (1-based)
    pub fn slide(&self, index: usize) -> Option<&SlideExpectation> {
        index.checked_sub(1).and_then(|i| self.slides.get(i))
    }
}

impl Default for Rubric {
    fn default() -> Self {
        Self {
            slide_count: 3,
            aspect_ratio: AspectRatio::new(16, 9),
            slides: [
                SlideExpectation::new(2, 0, vec![40.0, 24.0]),
                SlideExpectation::new(2, 1, vec![32.0, 18.0]),
                SlideExpectation::new(4, 3, vec![32.0, 18.0, 18.0, 18.0]),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aspect_ratio() {
        let ratio: AspectRatio = "16/9".parse().unwrap();
        assert_eq!(ratio, AspectRatio::new(16, 9));
        assert_eq!(ratio.to_string(), "16/9");
        assert!(" 4 / 3 ".trim().parse::<AspectRatio>().is_ok());
    }

    #[test]
    fn test_parse_aspect_ratio_errors() {
        assert!("16:9".parse::<AspectRatio>().is_err());
        assert!("16/0".parse::<AspectRatio>().is_err());
        assert!("wide".parse::<AspectRatio>().is_err());
    }

    #[test]
    fn test_aspect_ratio_matches_page() {
        let ratio = AspectRatio::new(16, 9);
        assert!(ratio.matches(960.0, 540.0));
        assert!(!ratio.matches(720.0, 540.0));
        assert!(!ratio.matches(960.0, 0.0));
    }

    #[test]
    fn test_parse_font_sizes() {
        assert_eq!(parse_font_sizes("24,18").unwrap(), vec![24.0, 18.0]);
        assert_eq!(parse_font_sizes(" 24 , 18.5 ").unwrap(), vec![24.0, 18.5]);
        assert!(parse_font_sizes("").unwrap().is_empty());
        assert!(parse_font_sizes("24,big").is_err());
    }

    #[test]
    fn test_slide_lookup() {
        let rubric = Rubric::default();
        assert_eq!(rubric.slide(1).unwrap().text_blocks, 2);
        assert_eq!(rubric.slide(3).unwrap().images, 3);
        assert!(rubric.slide(0).is_none());
        assert!(rubric.slide(4).is_none());
    }
}
