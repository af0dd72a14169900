//! Shape role and text state classification

use deck_model::{Deck, ShapeInfo, ShapeRef, SlideInfo};

use crate::{BoundingBox, GeometryResolver, Result, ZoneKind};

/// Whether a shape counts as text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextState {
    /// Visible text inside the slide bounds
    Present,
    /// No text frame, or the shape is hidden
    Absent,
    /// A text frame that is empty, or whose text sits out of bounds
    EmptyIndeterminate,
}

/// Functional role of a shape on a slide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeRole {
    /// Title, centered title, or subtitle placeholder
    Title,
    /// Body text
    Text,
    Image,
    Unrecognized,
}

impl ShapeRole {
    /// Zone kind this role is matched against, if any
    pub fn zone_kind(&self) -> Option<ZoneKind> {
        match self {
            ShapeRole::Title => Some(ZoneKind::Title),
            ShapeRole::Text => Some(ZoneKind::Text),
            ShapeRole::Image => Some(ZoneKind::Images),
            ShapeRole::Unrecognized => None,
        }
    }
}

/// Text state of a shape given its resolved box
pub fn text_state(info: &ShapeInfo, bbox: &BoundingBox, out_of_bounds: f64) -> TextState {
    if !info.visible || info.text_frame.is_none() {
        return TextState::Absent;
    }
    if info.text().is_none() {
        return TextState::EmptyIndeterminate;
    }
    if bbox.left < out_of_bounds || bbox.top < out_of_bounds {
        return TextState::EmptyIndeterminate;
    }
    TextState::Present
}

/// Role of a shape. Title placeholders win over text, text over pictures.
pub fn shape_role(info: &ShapeInfo, text: TextState) -> ShapeRole {
    if info.kind.is_title_placeholder() {
        ShapeRole::Title
    } else if text == TextState::Present {
        ShapeRole::Text
    } else if info.kind.is_picture() {
        ShapeRole::Image
    } else {
        ShapeRole::Unrecognized
    }
}

/// A shape with everything derived from it for one analysis pass
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedShape {
    pub shape: ShapeRef,
    pub info: ShapeInfo,
    pub bbox: BoundingBox,
    pub text: TextState,
    pub role: ShapeRole,
}

impl ClassifiedShape {
    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn is_picture(&self) -> bool {
        self.info.kind.is_picture()
    }
}

impl GeometryResolver {
    /// Classify every shape on `slide`, in enumeration order
    pub fn classify_slide<D: Deck + ?Sized>(
        &self,
        deck: &mut D,
        slide: &SlideInfo,
    ) -> Result<Vec<ClassifiedShape>> {
        let out_of_bounds = self.calibration().text_out_of_bounds;
        let mut shapes = Vec::with_capacity(slide.shapes.len());

        for (shape, info) in slide.shape_refs() {
            let bbox = self.bounding_box(deck, shape, info)?;
            let text = text_state(info, &bbox, out_of_bounds);
            shapes.push(ClassifiedShape {
                shape,
                info: info.clone(),
                bbox,
                text,
                role: shape_role(info, text),
            });
        }

        Ok(shapes)
    }
}
