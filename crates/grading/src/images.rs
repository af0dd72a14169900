//! Picture originality and distortion checks

use deck_model::{Deck, ShapeInfo, ShapeRef};
use thiserror::Error;

use crate::{GradeError, Result};

/// Largest allowed gap between width and height scale, in percentage points
pub const DISTORTION_TOLERANCE: i64 = 10;

/// A perceptual hash; equal hashes mean the same picture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageHash(pub u64);

#[derive(Debug, Error)]
#[error("{0}")]
pub struct HashError(pub String);

/// Computes perceptual hashes of encoded pictures
pub trait PerceptualHasher {
    fn hash(&self, bytes: &[u8]) -> std::result::Result<ImageHash, HashError>;
}

/// Hashes of the original pictures students were given
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceImages {
    hashes: Vec<ImageHash>,
}

impl ReferenceImages {
    pub fn new(hashes: Vec<ImageHash>) -> Self {
        Self { hashes }
    }

    pub fn hashes(&self) -> &[ImageHash] {
        &self.hashes
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}

/// Every picture shape in the deck, slide by slide
pub fn picture_shapes<D: Deck + ?Sized>(deck: &D) -> Result<Vec<(ShapeRef, ShapeInfo)>> {
    let mut pictures = Vec::new();
    for index in 1..=deck.slide_count()? {
        let slide = deck.slide(index)?;
        pictures.extend(
            slide
                .shape_refs()
                .filter(|(_, info)| info.kind.is_picture())
                .map(|(r, info)| (r, info.clone())),
        );
    }
    Ok(pictures)
}

/// Whether the deck's pictures are covered by the reference set.
///
/// Each reference counts once if any deck picture has its hash. The check
/// passes when that count equals the number of picture shapes; a single deck
/// picture may satisfy several references.
pub fn is_original<D: Deck + ?Sized>(
    deck: &D,
    references: &ReferenceImages,
    hasher: &dyn PerceptualHasher,
) -> Result<bool> {
    let pictures = picture_shapes(deck)?;
    let mut extracted = Vec::with_capacity(pictures.len());
    for (shape, info) in &pictures {
        let bytes = deck.picture_bytes(*shape)?;
        let hash = hasher.hash(&bytes).map_err(|e| GradeError::Hash {
            shape: info.name.clone(),
            reason: e.0,
        })?;
        extracted.push(hash);
    }

    let matched = references
        .hashes()
        .iter()
        .filter(|reference| extracted.contains(reference))
        .count();
    tracing::debug!(
        "{} of {} references matched {} pictures",
        matched,
        references.len(),
        pictures.len()
    );
    Ok(matched == pictures.len())
}

/// Rendered width and height scale of a shape, in whole percent.
///
/// The shape is scaled back to its natural size to read it, then restored.
/// Returns `None` when the natural size is degenerate.
pub fn scale_percent<D: Deck + ?Sized>(deck: &mut D, shape: ShapeRef) -> Result<Option<(i64, i64)>> {
    let current = deck.size(shape)?;
    deck.reset_scale(shape)?;
    let natural = deck.size(shape);
    deck.resize(shape, current)?;
    let natural = natural?;

    if natural.width <= 0.0 || natural.height <= 0.0 {
        return Ok(None);
    }
    let width = (current.width / natural.width * 100.0).round() as i64;
    let height = (current.height / natural.height * 100.0).round() as i64;
    Ok(Some((width, height)))
}

/// Whether any picture is stretched more along one axis than the other
pub fn is_distorted<D: Deck + ?Sized>(deck: &mut D) -> Result<bool> {
    for (shape, info) in picture_shapes(&*deck)? {
        if let Some((width, height)) = scale_percent(deck, shape)? {
            if (width - height).abs() > DISTORTION_TOLERANCE {
                tracing::debug!("{} is distorted: {}% x {}%", info.name, width, height);
                return Ok(true);
            }
        }
    }
    Ok(false)
}
