//! In-memory decks and the JSON snapshot provider
//!
//! A snapshot is what an automation bridge exports for an open deck: page
//! setup, slides, shapes, plus the values only a renderer knows (measured
//! text bounds, natural picture sizes) and the picture files themselves.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

use crate::{
    Deck, DeckError, DocumentProvider, Geometry, PageSetup, Result, ShapeInfo, ShapeRef, Size,
    SlideInfo, TextFrame,
};

/// Characters the host renders as an extra empty line at the end of a range
const LINE_BREAKS: [char; 3] = ['\r', '\n', '\u{b}'];

/// Line height relative to font size used for trailing empty lines
const LINE_SPACING: f64 = 1.2;

// =============================================================================
// Snapshot format
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckSnapshot {
    #[serde(default)]
    pub name: String,
    pub page: PageSetup,
    #[serde(default)]
    pub slides: Vec<SlideSnapshot>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlideSnapshot {
    #[serde(default)]
    pub transition: bool,
    #[serde(default)]
    pub animations: usize,
    #[serde(default)]
    pub shapes: Vec<ShapeSnapshot>,
}

impl SlideSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shape(mut self, shape: impl Into<ShapeSnapshot>) -> Self {
        self.shapes.push(shape.into());
        self
    }

    pub fn with_transition(mut self) -> Self {
        self.transition = true;
        self
    }

    pub fn with_animations(mut self, count: usize) -> Self {
        self.animations = count;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeSnapshot {
    #[serde(flatten)]
    pub info: ShapeInfo,
    /// Bound box of the text range without trailing breaks, in points
    #[serde(default)]
    pub text_bounds: Option<Geometry>,
    /// Unscaled size of a picture, in points
    #[serde(default)]
    pub natural_size: Option<Size>,
    /// Picture file, relative to the snapshot file
    #[serde(default)]
    pub picture: Option<PathBuf>,
}

impl ShapeSnapshot {
    pub fn with_text_bounds(mut self, bounds: Geometry) -> Self {
        self.text_bounds = Some(bounds);
        self
    }

    pub fn with_natural_size(mut self, size: Size) -> Self {
        self.natural_size = Some(size);
        self
    }

    pub fn with_picture(mut self, path: impl Into<PathBuf>) -> Self {
        self.picture = Some(path.into());
        self
    }
}

impl From<ShapeInfo> for ShapeSnapshot {
    fn from(info: ShapeInfo) -> Self {
        Self {
            info,
            text_bounds: None,
            natural_size: None,
            picture: None,
        }
    }
}

// =============================================================================
// MemoryDeck
// =============================================================================

/// A deck held entirely in memory
#[derive(Debug, Clone)]
pub struct MemoryDeck {
    snapshot: DeckSnapshot,
    base_dir: Option<PathBuf>,
    edits: usize,
}

impl MemoryDeck {
    pub fn new(name: impl Into<String>, page: PageSetup) -> Self {
        Self::from_snapshot(DeckSnapshot {
            name: name.into(),
            page,
            slides: Vec::new(),
        })
    }

    pub fn from_snapshot(snapshot: DeckSnapshot) -> Self {
        Self {
            snapshot,
            base_dir: None,
            edits: 0,
        }
    }

    /// Parse a JSON snapshot; picture paths resolve against `base_dir`
    pub fn from_json(json: &str, base_dir: Option<PathBuf>) -> Result<Self> {
        let snapshot: DeckSnapshot = serde_json::from_str(json)?;
        Ok(Self {
            snapshot,
            base_dir,
            edits: 0,
        })
    }

    pub fn with_slide(mut self, slide: SlideSnapshot) -> Self {
        self.snapshot.slides.push(slide);
        self
    }

    pub fn snapshot(&self) -> &DeckSnapshot {
        &self.snapshot
    }

    /// Number of mutating calls made against this deck
    pub fn edit_count(&self) -> usize {
        self.edits
    }

    fn slide_snapshot(&self, index: usize) -> Result<&SlideSnapshot> {
        let count = self.snapshot.slides.len();
        index
            .checked_sub(1)
            .and_then(|i| self.snapshot.slides.get(i))
            .ok_or(DeckError::SlideOutOfRange { index, count })
    }

    fn shape(&self, shape: ShapeRef) -> Result<&ShapeSnapshot> {
        self.slide_snapshot(shape.slide)?
            .shapes
            .get(shape.index)
            .ok_or(DeckError::ShapeNotFound {
                slide: shape.slide,
                index: shape.index,
            })
    }

    fn shape_mut(&mut self, shape: ShapeRef) -> Result<&mut ShapeSnapshot> {
        let count = self.snapshot.slides.len();
        let snapshot = shape
            .slide
            .checked_sub(1)
            .and_then(|i| self.snapshot.slides.get_mut(i))
            .ok_or(DeckError::SlideOutOfRange {
                index: shape.slide,
                count,
            })?
            .shapes
            .get_mut(shape.index)
            .ok_or(DeckError::ShapeNotFound {
                slide: shape.slide,
                index: shape.index,
            })?;
        self.edits += 1;
        Ok(snapshot)
    }
}

fn unsupported(shape: &ShapeSnapshot, operation: &str) -> DeckError {
    DeckError::Unsupported {
        name: shape.info.name.clone(),
        operation: operation.to_string(),
    }
}

fn frame_mut<'a>(shape: &'a mut ShapeSnapshot, operation: &str) -> Result<&'a mut TextFrame> {
    let name = shape.info.name.clone();
    shape
        .info
        .text_frame
        .as_mut()
        .ok_or_else(|| DeckError::Unsupported {
            name,
            operation: operation.to_string(),
        })
}

impl Deck for MemoryDeck {
    fn name(&self) -> &str {
        &self.snapshot.name
    }

    fn page_setup(&self) -> Result<PageSetup> {
        Ok(self.snapshot.page)
    }

    fn slide_count(&self) -> Result<usize> {
        Ok(self.snapshot.slides.len())
    }

    fn slide(&self, index: usize) -> Result<SlideInfo> {
        let slide = self.slide_snapshot(index)?;
        Ok(SlideInfo {
            index,
            shapes: slide.shapes.iter().map(|s| s.info.clone()).collect(),
            has_transition: slide.transition,
            animation_count: slide.animations,
        })
    }

    fn text_bounds(&self, shape: ShapeRef) -> Result<Geometry> {
        let snapshot = self.shape(shape)?;
        let frame = snapshot
            .info
            .text_frame
            .as_ref()
            .ok_or_else(|| unsupported(snapshot, "text_bounds"))?;
        let mut bounds = snapshot.text_bounds.unwrap_or(snapshot.info.geometry);

        // Trailing breaks render as empty lines below the text
        let trailing_breaks = frame
            .text
            .chars()
            .rev()
            .take_while(|c| LINE_BREAKS.contains(c))
            .count();
        bounds.height += trailing_breaks as f64 * frame.font.size * LINE_SPACING;
        Ok(bounds)
    }

    fn remove_text_tail(&mut self, shape: ShapeRef, count: usize) -> Result<()> {
        let frame = frame_mut(self.shape_mut(shape)?, "remove_text_tail")?;
        let keep = frame.text.chars().count().saturating_sub(count);
        frame.text = frame.text.chars().take(keep).collect();
        Ok(())
    }

    fn append_text(&mut self, shape: ShapeRef, text: &str) -> Result<()> {
        let frame = frame_mut(self.shape_mut(shape)?, "append_text")?;
        frame.text.push_str(text);
        Ok(())
    }

    fn size(&self, shape: ShapeRef) -> Result<Size> {
        Ok(self.shape(shape)?.info.geometry.size())
    }

    fn reset_scale(&mut self, shape: ShapeRef) -> Result<()> {
        let snapshot = self.shape_mut(shape)?;
        let natural = snapshot
            .natural_size
            .unwrap_or_else(|| snapshot.info.geometry.size());
        snapshot.info.geometry.width = natural.width;
        snapshot.info.geometry.height = natural.height;
        Ok(())
    }

    fn resize(&mut self, shape: ShapeRef, size: Size) -> Result<()> {
        let snapshot = self.shape_mut(shape)?;
        snapshot.info.geometry.width = size.width;
        snapshot.info.geometry.height = size.height;
        Ok(())
    }

    fn picture_bytes(&self, shape: ShapeRef) -> Result<Vec<u8>> {
        let snapshot = self.shape(shape)?;
        let path = snapshot
            .picture
            .as_ref()
            .ok_or_else(|| unsupported(snapshot, "picture_bytes"))?;
        let path = match &self.base_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.clone(),
        };
        Ok(std::fs::read(path)?)
    }
}

// =============================================================================
// JsonDeckProvider
// =============================================================================

/// Opens JSON deck snapshots from disk
#[derive(Debug, Default)]
pub struct JsonDeckProvider {
    open_documents: AtomicUsize,
}

impl JsonDeckProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently open through this provider
    pub fn open_documents(&self) -> usize {
        self.open_documents.load(Ordering::SeqCst)
    }
}

impl DocumentProvider for JsonDeckProvider {
    type Deck = MemoryDeck;

    fn open(&self, path: &Path) -> Result<MemoryDeck> {
        let json = std::fs::read_to_string(path).map_err(|e| DeckError::OpenFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let mut deck = MemoryDeck::from_json(&json, path.parent().map(Path::to_path_buf))
            .map_err(|e| DeckError::OpenFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        if deck.snapshot.name.is_empty() {
            deck.snapshot.name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("presentation")
                .to_string();
        }
        self.open_documents.fetch_add(1, Ordering::SeqCst);
        Ok(deck)
    }

    fn close(&self, _deck: &mut MemoryDeck) -> Result<()> {
        self.open_documents.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}
