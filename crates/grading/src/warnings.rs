//! Advisory warnings
//!
//! Warnings point a reviewer at things worth a second look. They never
//! affect the grade.

use deck_model::{Crop, Deck};
use layout_engine::{px, ClassifiedShape, GeometryResolver, TextState};
use serde::Serialize;

use crate::{Result, RUBRIC_SLIDES};

/// Warnings bucketed into the whole deck and slides 1 to 3
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Warnings {
    pub global: Vec<String>,
    pub slides: [Vec<String>; RUBRIC_SLIDES],
}

impl Warnings {
    /// Warnings for slide `index` (1-based)
    pub fn slide(&self, index: usize) -> &[String] {
        index
            .checked_sub(1)
            .and_then(|i| self.slides.get(i))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.global.is_empty() && self.slides.iter().all(Vec::is_empty)
    }
}

/// Crop amounts in pixels, or `None` when nothing is cropped
pub fn crop_px(crop: &Crop) -> Option<[f64; 4]> {
    let values = [px(crop.left), px(crop.right), px(crop.top), px(crop.bottom)];
    values.iter().any(|v| *v != 0.0).then_some(values)
}

/// Scans a deck for advisory warnings
#[derive(Debug, Clone, Copy)]
pub struct WarningsCollector<'a> {
    resolver: &'a GeometryResolver,
}

impl<'a> WarningsCollector<'a> {
    pub fn new(resolver: &'a GeometryResolver) -> Self {
        Self { resolver }
    }

    pub fn collect<D: Deck + ?Sized>(&self, deck: &mut D) -> Result<Warnings> {
        let mut warnings = Warnings::default();
        let mut animations = 0;

        for index in 1..=deck.slide_count()? {
            let slide = deck.slide(index)?;
            animations += slide.animation_count;
            if slide.has_transition {
                warnings.global.push(format!("Slide transition on slide {}.", index));
            }
            if index > RUBRIC_SLIDES {
                continue;
            }

            let shapes = self.resolver.classify_slide(deck, &slide)?;
            warnings.slides[index - 1] = if index == 1 {
                title_slide_warnings(&shapes)
            } else {
                body_slide_warnings(&shapes)
            };
        }

        if animations > 0 {
            warnings.global.push(format!("Animations on objects: {}.", animations));
        }
        tracing::debug!("{}: {} global warnings", deck.name(), warnings.global.len());
        Ok(warnings)
    }
}

fn title_slide_warnings(shapes: &[ClassifiedShape]) -> Vec<String> {
    let mut out = Vec::new();
    let mut text_blocks = 0;
    for shape in shapes {
        let (name, id) = (shape.name(), shape.info.id);
        if shape.is_picture() {
            out.push(format!("Image {} with ID {}", name, id));
        } else {
            match shape.text {
                TextState::Present => text_blocks += 1,
                TextState::EmptyIndeterminate => out.push(format!("Empty text block {}, {}", name, id)),
                TextState::Absent => out.push(format!("Unknown object {}, {}", name, id)),
            }
        }
    }
    if text_blocks > 2 {
        out.push("More than two text blocks on the slide.".to_string());
    }
    out
}

fn body_slide_warnings(shapes: &[ClassifiedShape]) -> Vec<String> {
    let mut out = Vec::new();
    for shape in shapes {
        let (name, id) = (shape.name(), shape.info.id);
        match shape.text {
            TextState::EmptyIndeterminate => out.push(format!("Empty text block {}, {}", name, id)),
            TextState::Absent if !shape.is_picture() => out.push(format!("Unknown object {}, {}", name, id)),
            _ => {}
        }
        if !shape.is_picture() {
            continue;
        }
        if let Some([left, right, top, bottom]) = crop_px(&shape.info.crop) {
            out.push(format!(
                "Object {}, {} cropped {}:{}::{}:{}",
                name, id, left, right, top, bottom
            ));
        }
    }
    out
}
