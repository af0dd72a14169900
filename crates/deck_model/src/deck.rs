//! The open-document capability consumed by the grading core
//!
//! A [`Deck`] is one open document inside a provider session. Reads return
//! snapshots; the few mutating calls exist only so callers can measure a
//! shape and then put it back exactly as it was.

use serde::{Deserialize, Serialize};

use crate::{Geometry, Result, ShapeInfo, Size};

/// Page orientation of the deck
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

/// Page setup of the deck, in points
///
/// A snapshot without an `orientation` gets the one its size implies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawPageSetup")]
pub struct PageSetup {
    pub width: f64,
    pub height: f64,
    pub orientation: Orientation,
}

impl PageSetup {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            orientation: Orientation::from_size(width, height),
        }
    }
}

impl Orientation {
    /// Horizontal unless the page is taller than wide
    pub fn from_size(width: f64, height: f64) -> Self {
        if width >= height {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        }
    }
}

#[derive(Deserialize)]
struct RawPageSetup {
    width: f64,
    height: f64,
    #[serde(default)]
    orientation: Option<Orientation>,
}

impl From<RawPageSetup> for PageSetup {
    fn from(raw: RawPageSetup) -> Self {
        Self {
            width: raw.width,
            height: raw.height,
            orientation: raw
                .orientation
                .unwrap_or_else(|| Orientation::from_size(raw.width, raw.height)),
        }
    }
}

/// Address of a shape: 1-based slide index and 0-based position on the slide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeRef {
    pub slide: usize,
    pub index: usize,
}

impl ShapeRef {
    pub fn new(slide: usize, index: usize) -> Self {
        Self { slide, index }
    }
}

/// A slide as read from the provider
#[derive(Debug, Clone, PartialEq)]
pub struct SlideInfo {
    /// 1-based slide index
    pub index: usize,
    pub shapes: Vec<ShapeInfo>,
    /// Whether the slide has an entry transition effect
    pub has_transition: bool,
    /// Number of effects in the slide's main animation sequence
    pub animation_count: usize,
}

impl SlideInfo {
    /// Shapes paired with their addresses, in enumeration order
    pub fn shape_refs(&self) -> impl Iterator<Item = (ShapeRef, &ShapeInfo)> {
        let slide = self.index;
        self.shapes
            .iter()
            .enumerate()
            .map(move |(index, shape)| (ShapeRef::new(slide, index), shape))
    }
}

/// An open document
pub trait Deck {
    /// Display name of the document (file stem)
    fn name(&self) -> &str;

    fn page_setup(&self) -> Result<PageSetup>;

    fn slide_count(&self) -> Result<usize>;

    /// Read slide `index` (1-based)
    fn slide(&self, index: usize) -> Result<SlideInfo>;

    /// Rendered bound box of the shape's current text range, in points
    fn text_bounds(&self, shape: ShapeRef) -> Result<Geometry>;

    /// Remove the last `count` characters of the shape's text
    fn remove_text_tail(&mut self, shape: ShapeRef, count: usize) -> Result<()>;

    /// Append `text` to the end of the shape's text
    fn append_text(&mut self, shape: ShapeRef, text: &str) -> Result<()>;

    /// Current rendered size of the shape, in points
    fn size(&self, shape: ShapeRef) -> Result<Size>;

    /// Scale the shape back to 100% of its natural size, anchored top-left
    fn reset_scale(&mut self, shape: ShapeRef) -> Result<()>;

    /// Set the rendered size of the shape, anchored top-left
    fn resize(&mut self, shape: ShapeRef, size: Size) -> Result<()>;

    /// Encoded bytes of a picture shape
    fn picture_bytes(&self, shape: ShapeRef) -> Result<Vec<u8>>;
}
