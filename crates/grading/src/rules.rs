//! Rubric rules
//!
//! Every rule is a plain boolean grouped into one record per category.
//! Rules that look at individual slides pass only when they pass on every
//! slide they apply to.

use std::collections::{BTreeSet, HashSet};

use deck_model::{Deck, Orientation};
use layout_engine::{
    px, Calibration, ClassifiedShape, GeometryResolver, LayoutMatcher, LayoutRegistry, ShapeRole,
    TextState, BODY_SLIDES,
};
use serde::{Deserialize, Serialize};

use crate::images::{is_distorted, is_original, PerceptualHasher, ReferenceImages};
use crate::{aggregate, GradeError, GradeReport, Result, Rubric, SlideExpectation, RUBRIC_SLIDES};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationRules {
    pub aspect_ratio: bool,
    pub landscape: bool,
}

impl PresentationRules {
    pub fn failures(&self) -> usize {
        count_failed(&[self.aspect_ratio, self.landscape])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureRules {
    pub slide_count: bool,
    pub layout_found: bool,
    /// Every slide carries a title
    pub titles: bool,
    /// The first slide carries a subtitle
    pub subtitle: bool,
    pub no_overlap: bool,
    pub text_blocks: bool,
    pub image_blocks: bool,
}

impl StructureRules {
    pub fn failures(&self) -> usize {
        count_failed(&[
            self.slide_count,
            self.layout_found,
            self.titles,
            self.subtitle,
            self.no_overlap,
            self.text_blocks,
            self.image_blocks,
        ])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontRules {
    pub single_typeface: bool,
    pub font_sizes: bool,
}

impl FontRules {
    pub fn failures(&self) -> usize {
        count_failed(&[self.single_typeface, self.font_sizes])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRules {
    pub original: bool,
    pub undistorted: bool,
}

impl ImageRules {
    pub fn failures(&self) -> usize {
        count_failed(&[self.original, self.undistorted])
    }
}

/// Outcome of every rule for one deck
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleResults {
    pub presentation: PresentationRules,
    pub structure: StructureRules,
    pub fonts: FontRules,
    pub images: ImageRules,
    /// Name of the matched layout template; informational only
    pub layout: Option<String>,
}

impl RuleResults {
    /// Failure counts for presentation, structure, fonts and images
    pub fn category_failures(&self) -> [usize; 4] {
        [
            self.presentation.failures(),
            self.structure.failures(),
            self.fonts.failures(),
            self.images.failures(),
        ]
    }

    pub fn all_passed(&self) -> bool {
        self.category_failures().iter().all(|&n| n == 0)
    }
}

fn count_failed(rules: &[bool]) -> usize {
    rules.iter().filter(|passed| !**passed).count()
}

// =============================================================================
// Per-slide rules
// =============================================================================

/// Title, body text and picture counts on one slide
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockCount {
    /// Title-role shapes taking a text slot, capped per slide
    pub titles: usize,
    pub text: usize,
    pub images: usize,
}

/// Title-role shapes that take a text slot on `slide`: title and subtitle
/// on the first slide, a single title elsewhere
pub fn title_slots(slide: usize) -> usize {
    if slide == 1 {
        2
    } else {
        1
    }
}

/// Count blocks on a classified slide. Title-role shapes beyond the slide's
/// slots are ignored.
pub fn count_blocks(slide: usize, shapes: &[ClassifiedShape]) -> BlockCount {
    let cap = title_slots(slide);
    let mut count = BlockCount::default();
    for shape in shapes {
        match shape.role {
            ShapeRole::Title => count.titles = (count.titles + 1).min(cap),
            ShapeRole::Text => count.text += 1,
            ShapeRole::Image => count.images += 1,
            ShapeRole::Unrecognized => {}
        }
    }
    count
}

/// Whether observed body font sizes match the configured ones.
///
/// The configured list covers every text slot on the slide, so its length
/// must equal `text_blocks`. The first `consumed` entries belong to title
/// slots and are skipped.
pub fn font_sizes_match(expected: &[f64], observed: &[f64], text_blocks: usize, consumed: usize) -> bool {
    if expected.len() != text_blocks || consumed > expected.len() {
        return false;
    }
    expected[consumed..] == *observed
}

/// Whether every pair of shapes agrees on colliding or not.
///
/// Slides with fewer than two shapes have no pairs and fail.
pub fn overlap_free(shapes: &[ClassifiedShape]) -> bool {
    let mut outcomes = BTreeSet::new();
    for (i, first) in shapes.iter().enumerate() {
        for second in &shapes[i + 1..] {
            outcomes.insert(first.bbox.collides(&second.bbox));
        }
    }
    outcomes.len() == 1
}

/// Whether all text is set in one typeface, or in faces of one family.
///
/// The family is the first word of the font name. No text fails.
pub fn single_typeface<'a>(fonts: impl IntoIterator<Item = &'a str>) -> bool {
    let names: HashSet<&str> = fonts.into_iter().collect();
    if names.len() == 1 {
        return true;
    }
    let families: HashSet<&str> = names
        .iter()
        .map(|name| name.split_whitespace().next().unwrap_or(*name))
        .collect();
    families.len() == 1
}

/// Rule outcomes for one slide
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideRules {
    pub title: bool,
    /// First slide only
    pub subtitle: Option<bool>,
    pub no_overlap: bool,
    pub font_sizes: bool,
    /// Body slides only
    pub text_blocks: Option<bool>,
    /// Body slides only
    pub image_blocks: Option<bool>,
}

/// Evaluate the per-slide rules for slide `index`
pub fn evaluate_slide(index: usize, shapes: &[ClassifiedShape], expected: &SlideExpectation) -> SlideRules {
    let count = count_blocks(index, shapes);
    let observed: Vec<f64> = shapes
        .iter()
        .filter(|s| s.role == ShapeRole::Text)
        .filter_map(|s| s.info.font().map(|f| f.size))
        .collect();
    let font_sizes = font_sizes_match(&expected.font_sizes, &observed, expected.text_blocks, count.titles);
    let text_ok = count.text + count.titles == expected.text_blocks;

    if index == 1 {
        // Accepted: no title slots, title only, or title and subtitle.
        // Text in place of both still counts as a title page.
        SlideRules {
            title: text_ok,
            subtitle: Some(text_ok && count.titles != 1),
            no_overlap: overlap_free(shapes),
            font_sizes,
            text_blocks: None,
            image_blocks: None,
        }
    } else {
        SlideRules {
            title: count.titles >= 1,
            subtitle: None,
            no_overlap: overlap_free(shapes),
            font_sizes,
            text_blocks: Some(text_ok),
            image_blocks: Some(count.images == expected.images),
        }
    }
}

// =============================================================================
// Grader
// =============================================================================

/// Evaluates decks against a rubric
pub struct Grader {
    rubric: Rubric,
    registry: LayoutRegistry,
    resolver: GeometryResolver,
    references: Option<(ReferenceImages, Box<dyn PerceptualHasher>)>,
}

impl Grader {
    pub fn new(rubric: Rubric, registry: LayoutRegistry, calibration: Calibration) -> Self {
        Self {
            rubric,
            registry,
            resolver: GeometryResolver::new(calibration),
            references: None,
        }
    }

    /// Enable the originality rule against `references`
    pub fn with_references(mut self, references: ReferenceImages, hasher: Box<dyn PerceptualHasher>) -> Self {
        self.references = Some((references, hasher));
        self
    }

    pub fn rubric(&self) -> &Rubric {
        &self.rubric
    }

    pub fn resolver(&self) -> &GeometryResolver {
        &self.resolver
    }

    /// Evaluate every rule. Decks with fewer than two slides are rejected.
    pub fn evaluate<D: Deck + ?Sized>(&self, deck: &mut D) -> Result<RuleResults> {
        let slide_count = deck.slide_count()?;
        if slide_count < 2 {
            return Err(GradeError::UnsupportedDocument { slides: slide_count });
        }
        let page = deck.page_setup()?;

        let mut slides = Vec::with_capacity(slide_count);
        for index in 1..=slide_count {
            let slide = deck.slide(index)?;
            slides.push((index, self.resolver.classify_slide(deck, &slide)?));
        }

        let presentation = PresentationRules {
            aspect_ratio: self.rubric.aspect_ratio.matches(page.width, page.height),
            landscape: page.orientation == Orientation::Horizontal,
        };

        let body: Vec<_> = slides
            .iter()
            .filter(|(index, _)| BODY_SLIDES.contains(index))
            .cloned()
            .collect();
        let layout = LayoutMatcher::new(&self.registry, &self.resolver)
            .first_match(&body, px(page.width), px(page.height))
            .map(str::to_string);

        let mut structure = StructureRules {
            slide_count: slide_count == self.rubric.slide_count,
            layout_found: layout.is_some(),
            titles: true,
            subtitle: true,
            no_overlap: true,
            text_blocks: true,
            image_blocks: true,
        };
        let mut font_sizes = true;
        for (index, shapes) in slides.iter().take(RUBRIC_SLIDES) {
            let Some(expected) = self.rubric.slide(*index) else {
                continue;
            };
            let rules = evaluate_slide(*index, shapes, expected);
            tracing::debug!("Slide {}: {:?}", index, rules);
            structure.titles &= rules.title;
            structure.no_overlap &= rules.no_overlap;
            structure.subtitle &= rules.subtitle.unwrap_or(true);
            structure.text_blocks &= rules.text_blocks.unwrap_or(true);
            structure.image_blocks &= rules.image_blocks.unwrap_or(true);
            font_sizes &= rules.font_sizes;
        }

        let fonts = FontRules {
            single_typeface: single_typeface(
                slides
                    .iter()
                    .flat_map(|(_, shapes)| shapes)
                    .filter(|s| s.text == TextState::Present)
                    .filter_map(|s| s.info.font().map(|f| f.name.as_str())),
            ),
            font_sizes,
        };

        let original = match &self.references {
            Some((references, hasher)) => is_original(&*deck, references, hasher.as_ref())?,
            None => {
                tracing::warn!("No reference images, skipping originality check");
                true
            }
        };
        let images = ImageRules {
            original,
            undistorted: !is_distorted(deck)?,
        };

        let results = RuleResults {
            presentation,
            structure,
            fonts,
            images,
            layout,
        };
        if !results.all_passed() {
            tracing::info!("{} failed rules: {:?}", deck.name(), results);
        }
        Ok(results)
    }

    /// Evaluate every rule and derive the grade
    pub fn grade<D: Deck + ?Sized>(&self, deck: &mut D) -> Result<GradeReport> {
        let results = self.evaluate(deck)?;
        let slide_count = deck.slide_count()?;
        let grade = aggregate(slide_count, &results).ok_or(GradeError::UnsupportedDocument { slides: slide_count })?;
        tracing::info!("{} graded {}", deck.name(), grade);
        Ok(GradeReport::new(&self.rubric, &results, grade))
    }
}
