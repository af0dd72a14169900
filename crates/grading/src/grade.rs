//! Grade aggregation

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::RuleResults;

/// Final outcome of a grading run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Grade {
    Fail = 0,
    Partial = 1,
    Full = 2,
}

impl From<Grade> for u8 {
    fn from(grade: Grade) -> u8 {
        grade as u8
    }
}

impl TryFrom<u8> for Grade {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, String> {
        match value {
            0 => Ok(Grade::Fail),
            1 => Ok(Grade::Partial),
            2 => Ok(Grade::Full),
            other => Err(format!("invalid grade {}", other)),
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u8)
    }
}

/// Derive the grade from rule outcomes.
///
/// Decks with fewer than two slides have no grade. A two-slide deck earns 1
/// when structure has exactly one failure and fonts and images have none,
/// and 0 otherwise. Larger decks earn 2 when every rule passes, 1 when the
/// failures are a single rule in a single category, and 0 otherwise.
pub fn aggregate(slide_count: usize, results: &RuleResults) -> Option<Grade> {
    let [presentation, structure, fonts, images] = results.category_failures();
    match slide_count {
        0 | 1 => None,
        2 => {
            if structure == 1 && fonts == 0 && images == 0 {
                Some(Grade::Partial)
            } else {
                Some(Grade::Fail)
            }
        }
        _ => {
            if results.all_passed() {
                return Some(Grade::Full);
            }
            let failing: Vec<usize> = [presentation, structure, fonts, images]
                .into_iter()
                .filter(|&n| n > 0)
                .collect();
            if failing == [1] {
                Some(Grade::Partial)
            } else {
                Some(Grade::Fail)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FontRules, ImageRules, PresentationRules, StructureRules};
    use proptest::prelude::*;

    fn passing() -> RuleResults {
        RuleResults {
            presentation: PresentationRules {
                aspect_ratio: true,
                landscape: true,
            },
            structure: StructureRules {
                slide_count: true,
                layout_found: true,
                titles: true,
                subtitle: true,
                no_overlap: true,
                text_blocks: true,
                image_blocks: true,
            },
            fonts: FontRules {
                single_typeface: true,
                font_sizes: true,
            },
            images: ImageRules {
                original: true,
                undistorted: true,
            },
            layout: Some("DEFAULT".to_string()),
        }
    }

    #[test]
    fn test_everything_passing_is_full() {
        assert_eq!(aggregate(3, &passing()), Some(Grade::Full));
    }

    #[test]
    fn test_single_font_size_failure_is_partial() {
        let mut results = passing();
        results.fonts.font_sizes = false;
        assert_eq!(aggregate(3, &results), Some(Grade::Partial));
    }

    #[test]
    fn test_two_font_failures_is_fail() {
        let mut results = passing();
        results.fonts.font_sizes = false;
        results.fonts.single_typeface = false;
        assert_eq!(aggregate(3, &results), Some(Grade::Fail));
    }

    #[test]
    fn test_failures_in_two_categories_is_fail() {
        let mut results = passing();
        results.structure.titles = false;
        results.images.undistorted = false;
        assert_eq!(aggregate(3, &results), Some(Grade::Fail));
    }

    #[test]
    fn test_single_presentation_failure_is_partial() {
        let mut results = passing();
        results.presentation.landscape = false;
        assert_eq!(aggregate(4, &results), Some(Grade::Partial));
    }

    #[test]
    fn test_layout_name_does_not_affect_grade() {
        let mut results = passing();
        results.layout = None;
        assert_eq!(aggregate(3, &results), Some(Grade::Full));
    }

    #[test]
    fn test_two_slides_single_structure_failure_is_partial() {
        let mut results = passing();
        results.structure.slide_count = false;
        assert_eq!(aggregate(2, &results), Some(Grade::Partial));
    }

    #[test]
    fn test_two_slides_with_font_or_image_failure_is_fail() {
        let mut results = passing();
        results.structure.slide_count = false;
        results.fonts.single_typeface = false;
        assert_eq!(aggregate(2, &results), Some(Grade::Fail));

        let mut results = passing();
        results.structure.slide_count = false;
        results.images.original = false;
        assert_eq!(aggregate(2, &results), Some(Grade::Fail));
    }

    #[test]
    fn test_two_slides_never_full() {
        assert_eq!(aggregate(2, &passing()), Some(Grade::Fail));
    }

    #[test]
    fn test_fewer_than_two_slides_has_no_grade() {
        assert_eq!(aggregate(0, &passing()), None);
        assert_eq!(aggregate(1, &passing()), None);
    }

    #[test]
    fn test_grade_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&Grade::Partial).unwrap(), "1");
        assert_eq!(serde_json::from_str::<Grade>("2").unwrap(), Grade::Full);
        assert!(serde_json::from_str::<Grade>("3").is_err());
    }

    fn with_failures(mask: u16) -> RuleResults {
        let bit = |n: u16| mask & (1 << n) == 0;
        let mut results = passing();
        results.presentation.aspect_ratio = bit(0);
        results.presentation.landscape = bit(1);
        results.structure.slide_count = bit(2);
        results.structure.layout_found = bit(3);
        results.structure.titles = bit(4);
        results.structure.subtitle = bit(5);
        results.structure.no_overlap = bit(6);
        results.structure.text_blocks = bit(7);
        results.structure.image_blocks = bit(8);
        results.fonts.single_typeface = bit(9);
        results.fonts.font_sizes = bit(10);
        results.images.original = bit(11);
        results.images.undistorted = bit(12);
        results
    }

    proptest! {
        #[test]
        fn prop_full_only_without_failures(mask in 0u16..(1 << 13), slides in 3usize..8) {
            let grade = aggregate(slides, &with_failures(mask));
            prop_assert_eq!(grade == Some(Grade::Full), mask == 0);
        }

        #[test]
        fn prop_partial_means_exactly_one_failure(mask in 0u16..(1 << 13), slides in 3usize..8) {
            let grade = aggregate(slides, &with_failures(mask));
            prop_assert_eq!(grade == Some(Grade::Partial), mask.count_ones() == 1);
        }
    }
}
