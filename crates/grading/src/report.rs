//! Human-readable grade report

use serde::Serialize;

use crate::{Grade, RuleResults, Rubric};

pub const PASSED: &str = "Passed";
pub const FAILED: &str = "Failed";

/// One labelled rule outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Check {
    pub label: String,
    pub passed: bool,
}

impl Check {
    pub fn new(label: impl Into<String>, passed: bool) -> Self {
        Self {
            label: label.into(),
            passed,
        }
    }
}

/// Labelled outcomes for one rule category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryReport {
    pub checks: Vec<Check>,
}

impl CategoryReport {
    pub fn new(checks: Vec<Check>) -> Self {
        Self { checks }
    }

    pub fn failures(&self) -> usize {
        self.checks.iter().filter(|c| !c.passed).count()
    }

    /// `label: Passed` lines, one per check
    pub fn summary(&self) -> String {
        self.checks
            .iter()
            .map(|c| format!("{}: {}", c.label, if c.passed { PASSED } else { FAILED }))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Category reports, matched layout and grade of one deck
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GradeReport {
    pub presentation: CategoryReport,
    pub structure: CategoryReport,
    pub fonts: CategoryReport,
    pub images: CategoryReport,
    pub layout: Option<String>,
    pub grade: Grade,
}

impl GradeReport {
    pub fn new(rubric: &Rubric, results: &RuleResults, grade: Grade) -> Self {
        let ratio = rubric.aspect_ratio;
        let presentation = CategoryReport::new(vec![
            Check::new(
                format!("Aspect ratio {}:{}", ratio.width, ratio.height),
                results.presentation.aspect_ratio,
            ),
            Check::new("Landscape orientation", results.presentation.landscape),
        ]);

        let s = &results.structure;
        let structure = CategoryReport::new(vec![
            Check::new(format!("{} slides in the presentation", rubric.slide_count), s.slide_count),
            Check::new("Follows a layout", s.layout_found),
            Check::new("Titles on slides", s.titles),
            Check::new("Subtitle on the first slide", s.subtitle),
            Check::new("Elements do not overlap", s.no_overlap),
            Check::new("Text blocks on slides 2 and 3", s.text_blocks),
            Check::new("Images on slides 2 and 3", s.image_blocks),
        ]);

        let fonts = CategoryReport::new(vec![
            Check::new("Single typeface", results.fonts.single_typeface),
            Check::new("Font sizes", results.fonts.font_sizes),
        ]);

        let images = CategoryReport::new(vec![
            Check::new("Original images", results.images.original),
            Check::new("Images are not distorted", results.images.undistorted),
        ]);

        Self {
            presentation,
            structure,
            fonts,
            images,
            layout: results.layout.clone(),
            grade,
        }
    }
}
