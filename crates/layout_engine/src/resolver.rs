//! Shape bounding box resolution
//!
//! Shapes without text use their declared geometry. For text-bearing shapes
//! the host's rendered text range is the better fit, but trailing breaks and
//! spaces inflate it; those are cut off for the measurement and put back
//! before returning, whatever the measurement result.

use deck_model::{Deck, Geometry, ShapeInfo, ShapeRef, TextFrame};
use serde::{Deserialize, Serialize};

use crate::{px, BoundingBox, Result};

/// Trailing characters excluded from text measurement
const MEASURE_TRIM: [char; 4] = ['\r', '\u{b}', '\n', ' '];

/// Empirical corrections applied to measured text
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    /// Pixels added to top/left and removed from width/height of a text box
    pub text_offset: f64,
    /// Text boxes whose left or top falls below this (px) are not counted as text
    pub text_out_of_bounds: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            text_offset: 7.0,
            text_out_of_bounds: 0.0,
        }
    }
}

/// Resolves shapes to pixel bounding boxes
#[derive(Debug, Clone, Copy, Default)]
pub struct GeometryResolver {
    calibration: Calibration,
}

impl GeometryResolver {
    pub fn new(calibration: Calibration) -> Self {
        Self { calibration }
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Bounding box of `info`, which must be the current snapshot of `shape`
    pub fn bounding_box<D: Deck + ?Sized>(
        &self,
        deck: &mut D,
        shape: ShapeRef,
        info: &ShapeInfo,
    ) -> Result<BoundingBox> {
        match &info.text_frame {
            Some(frame) if frame.has_text() => self.text_box(deck, shape, frame),
            _ => Ok(BoundingBox::from_points(info.geometry)),
        }
    }

    fn text_box<D: Deck + ?Sized>(
        &self,
        deck: &mut D,
        shape: ShapeRef,
        frame: &TextFrame,
    ) -> Result<BoundingBox> {
        let bounds = measure_trimmed(deck, shape, trailing_tail(&frame.text))?;
        let k = self.calibration.text_offset;
        let margins = frame.margins;

        Ok(BoundingBox {
            left: px(bounds.left) - px(margins.left) + k,
            top: px(bounds.top) - px(margins.top) + k,
            width: px(bounds.width) - px(margins.right) - k,
            height: px(bounds.height) - px(margins.bottom) - k,
        })
    }
}

/// The run of trailing breaks and spaces at the end of `text`
fn trailing_tail(text: &str) -> &str {
    let kept = text.trim_end_matches(&MEASURE_TRIM[..]).len();
    &text[kept..]
}

/// Measure the text range with `tail` removed, then restore it
fn measure_trimmed<D: Deck + ?Sized>(deck: &mut D, shape: ShapeRef, tail: &str) -> Result<Geometry> {
    if tail.is_empty() {
        return Ok(deck.text_bounds(shape)?);
    }

    let tail_chars = tail.chars().count();
    deck.remove_text_tail(shape, tail_chars)?;
    let measured = deck.text_bounds(shape);

    if let Err(e) = deck.append_text(shape, tail) {
        tracing::warn!(
            "Failed to restore {} trailing characters on slide {} shape {}: {}",
            tail_chars,
            shape.slide,
            shape.index,
            e
        );
        return Err(e.into());
    }

    Ok(measured?)
}
