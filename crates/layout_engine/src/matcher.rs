//! Layout matching
//!
//! A template matches when every shape on the body slides collides with at
//! least one zone reserved for its role. Shapes are compared as a set of
//! names, so enumeration order never matters. The first matching template
//! in registration order wins.

use std::collections::HashSet;

use deck_model::Deck;

use crate::{px, ClassifiedShape, GeometryResolver, LayoutRegistry, ResolvedLayout, Result, BODY_SLIDES};

/// Picks the registered template a deck follows
#[derive(Debug, Clone, Copy)]
pub struct LayoutMatcher<'a> {
    registry: &'a LayoutRegistry,
    resolver: &'a GeometryResolver,
}

impl<'a> LayoutMatcher<'a> {
    pub fn new(registry: &'a LayoutRegistry, resolver: &'a GeometryResolver) -> Self {
        Self { registry, resolver }
    }

    /// Name of the first template the deck's body slides fit, if any
    pub fn which_layout<D: Deck + ?Sized>(&self, deck: &mut D) -> Result<Option<&'a str>> {
        let page = deck.page_setup()?;
        let (width, height) = (px(page.width), px(page.height));
        let slide_count = deck.slide_count()?;

        let mut body = Vec::new();
        for index in BODY_SLIDES.into_iter().filter(|&i| i <= slide_count) {
            let slide = deck.slide(index)?;
            body.push((index, self.resolver.classify_slide(deck, &slide)?));
        }

        Ok(self.first_match(&body, width, height))
    }

    /// First template matching already classified body slides
    pub fn first_match(
        &self,
        body: &[(usize, Vec<ClassifiedShape>)],
        slide_width: f64,
        slide_height: f64,
    ) -> Option<&'a str> {
        for template in self.registry.iter() {
            let resolved = template.resolve(slide_width, slide_height);
            if fits(&resolved, body) {
                tracing::debug!("Deck follows layout {}", template.name());
                return Some(template.name());
            }
            tracing::debug!("Layout {} rejected", template.name());
        }
        None
    }
}

/// Whether every shape collides with a zone of its role
pub fn fits(layout: &ResolvedLayout, body: &[(usize, Vec<ClassifiedShape>)]) -> bool {
    let mut seen = HashSet::new();
    let mut matched = HashSet::new();

    for (slide, shapes) in body {
        for shape in shapes {
            seen.insert(shape.name());
            let Some(kind) = shape.role.zone_kind() else {
                continue;
            };
            if layout
                .zones(*slide, kind)
                .iter()
                .any(|zone| shape.bbox.collides(zone))
            {
                matched.insert(shape.name());
            }
        }
    }

    seen == matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LayoutTemplate;
    use deck_model::{
        Font, Geometry, MemoryDeck, PageSetup, PlaceholderKind, ShapeInfo, ShapeKind,
        ShapeSnapshot, SlideSnapshot, TextFrame,
    };
    use proptest::prelude::*;

    // 960x540pt = 1280x720px
    fn page() -> PageSetup {
        PageSetup::new(960.0, 540.0)
    }

    fn registry() -> LayoutRegistry {
        let mut registry = LayoutRegistry::new();
        // Picture on the right, text on the left
        registry.register(
            LayoutTemplate::from_entries(
                "TEXT_LEFT",
                [
                    ("title_2", "0-e,0-e,1-w,4-h"),
                    ("text_2", "0-e,4-h,2-w,4*3-h"),
                    ("images_2", "2-w,4-h,2-w,4*3-h"),
                ],
            )
            .unwrap(),
        );
        // Picture on the left, text on the right
        registry.register(
            LayoutTemplate::from_entries(
                "TEXT_RIGHT",
                [
                    ("title_2", "0-e,0-e,1-w,4-h"),
                    ("text_2", "2-w,4-h,2-w,4*3-h"),
                    ("images_2", "0-e,4-h,2-w,4*3-h"),
                ],
            )
            .unwrap(),
        );
        registry
    }

    fn title(name: &str) -> ShapeSnapshot {
        ShapeInfo::new(
            name,
            1,
            ShapeKind::Placeholder(PlaceholderKind::Title),
            Geometry::new(30.0, 20.0, 900.0, 80.0),
        )
        .into()
    }

    fn text(name: &str, left: f64) -> ShapeSnapshot {
        ShapeSnapshot::from(
            ShapeInfo::new(name, 2, ShapeKind::TextBox, Geometry::new(left, 200.0, 400.0, 200.0))
                .with_text(TextFrame::new("Body", Font::new("Arial", 18.0))),
        )
        .with_text_bounds(Geometry::new(left, 200.0, 400.0, 200.0))
    }

    fn picture(name: &str, left: f64) -> ShapeSnapshot {
        ShapeInfo::new(name, 3, ShapeKind::Picture, Geometry::new(left, 200.0, 400.0, 250.0)).into()
    }

    fn deck(slide_two: SlideSnapshot) -> MemoryDeck {
        MemoryDeck::new("deck", page())
            .with_slide(SlideSnapshot::new().with_shape(title("Title 1")))
            .with_slide(slide_two)
    }

    fn which(deck: &mut MemoryDeck) -> Option<String> {
        let registry = registry();
        let resolver = GeometryResolver::default();
        LayoutMatcher::new(&registry, &resolver)
            .which_layout(deck)
            .unwrap()
            .map(str::to_string)
    }

    #[test]
    fn test_matches_first_fitting_template() {
        let mut deck = deck(
            SlideSnapshot::new()
                .with_shape(title("Title 2"))
                .with_shape(text("Text 2", 20.0))
                .with_shape(picture("Picture 2", 520.0)),
        );
        assert_eq!(which(&mut deck).as_deref(), Some("TEXT_LEFT"));
    }

    #[test]
    fn test_matches_second_template() {
        let mut deck = deck(
            SlideSnapshot::new()
                .with_shape(title("Title 2"))
                .with_shape(text("Text 2", 520.0))
                .with_shape(picture("Picture 2", 20.0)),
        );
        assert_eq!(which(&mut deck).as_deref(), Some("TEXT_RIGHT"));
    }

    #[test]
    fn test_unrecognized_shape_prevents_match() {
        let arrow: ShapeSnapshot =
            ShapeInfo::new("Arrow", 9, ShapeKind::AutoShape, Geometry::new(20.0, 200.0, 50.0, 50.0)).into();
        let mut deck = deck(
            SlideSnapshot::new()
                .with_shape(title("Title 2"))
                .with_shape(text("Text 2", 20.0))
                .with_shape(arrow),
        );
        assert_eq!(which(&mut deck), None);
    }

    #[test]
    fn test_both_templates_fit_first_registered_wins() {
        // A full-width picture touches both halves
        let mut deck = deck(
            SlideSnapshot::new()
                .with_shape(title("Title 2"))
                .with_shape(picture("Picture 2", 100.0)),
        );
        assert_eq!(which(&mut deck).as_deref(), Some("TEXT_LEFT"));
    }

    #[test]
    fn test_empty_registry_has_no_layout() {
        let registry = LayoutRegistry::new();
        let resolver = GeometryResolver::default();
        let mut deck = deck(SlideSnapshot::new().with_shape(title("Title 2")));
        let result = LayoutMatcher::new(&registry, &resolver)
            .which_layout(&mut deck)
            .unwrap();
        assert_eq!(result, None);
    }

    proptest! {
        #[test]
        fn prop_matching_ignores_shape_order(
            shapes in Just(vec![
                title("Title 2"),
                text("Text 2", 520.0),
                picture("Picture 2", 20.0),
                text("Caption", 700.0),
            ]).prop_shuffle()
        ) {
            let mut ordered = deck(
                SlideSnapshot::new()
                    .with_shape(title("Title 2"))
                    .with_shape(text("Text 2", 520.0))
                    .with_shape(picture("Picture 2", 20.0))
                    .with_shape(text("Caption", 700.0)),
            );
            let mut slide = SlideSnapshot::new();
            for shape in shapes {
                slide = slide.with_shape(shape);
            }
            let mut shuffled = deck(slide);
            let expected = which(&mut ordered);
            prop_assert_eq!(expected.as_deref(), Some("TEXT_RIGHT"));
            prop_assert_eq!(which(&mut shuffled), expected);
        }
    }
}
