//! Reference image set
//!
//! The originals students were given live in a directory of PNG and JPEG
//! files. Each is reduced to a 64-bit average hash for comparison with the
//! pictures found in a deck.

use std::path::{Path, PathBuf};

use grading::{HashError, ImageHash, PerceptualHasher, ReferenceImages};
use image::imageops::FilterType;
use image::DynamicImage;

use crate::{Result, StoreError};

/// File extensions accepted into the reference set
pub const REFERENCE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Side of the grayscale thumbnail the hash is computed from
const HASH_SIDE: u32 = 8;

/// Average hash: each bit marks a thumbnail pixel brighter than the mean
#[derive(Debug, Clone, Copy, Default)]
pub struct AverageHasher;

impl AverageHasher {
    pub fn hash_image(&self, image: &DynamicImage) -> ImageHash {
        let thumbnail = image::imageops::resize(&image.to_luma8(), HASH_SIDE, HASH_SIDE, FilterType::Lanczos3);
        let pixels: Vec<u64> = thumbnail.pixels().map(|p| u64::from(p.0[0])).collect();
        let mean = pixels.iter().sum::<u64>() / pixels.len() as u64;

        let bits = pixels
            .iter()
            .fold(0u64, |bits, &pixel| (bits << 1) | u64::from(pixel > mean));
        ImageHash(bits)
    }
}

impl PerceptualHasher for AverageHasher {
    fn hash(&self, bytes: &[u8]) -> std::result::Result<ImageHash, HashError> {
        let image = image::load_from_memory(bytes).map_err(|e| HashError(e.to_string()))?;
        Ok(self.hash_image(&image))
    }
}

/// Whether `path` has a reference image extension
pub fn is_reference_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| REFERENCE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

fn reference_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_reference_image(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Hash every reference image in `dir`.
///
/// A missing directory is reported as [`StoreError::ReferenceSetMissing`],
/// which callers treat as "skip the originality check".
pub fn load_reference_images(dir: &Path, hasher: &dyn PerceptualHasher) -> Result<ReferenceImages> {
    if !dir.is_dir() {
        return Err(StoreError::ReferenceSetMissing(dir.to_path_buf()));
    }

    let mut hashes = Vec::new();
    for path in reference_files(dir)? {
        let bytes = std::fs::read(&path)?;
        let hash = hasher.hash(&bytes).map_err(|e| StoreError::Image {
            path: path.clone(),
            reason: e.0,
        })?;
        hashes.push(hash);
    }
    tracing::debug!("Loaded {} reference images from {}", hashes.len(), dir.display());
    Ok(ReferenceImages::new(hashes))
}

/// Replace the reference set in `into` with the images found in `from`.
///
/// Returns `false`, leaving `into` untouched, when `from` is not a directory.
pub fn import_reference_images(from: &Path, into: &Path) -> Result<bool> {
    if !from.is_dir() {
        return Ok(false);
    }
    if into.exists() {
        std::fs::remove_dir_all(into)?;
    }
    std::fs::create_dir_all(into)?;

    let files = reference_files(from)?;
    for path in &files {
        if let Some(name) = path.file_name() {
            std::fs::copy(path, into.join(name))?;
        }
    }
    tracing::info!("Imported {} reference images into {}", files.len(), into.display());
    Ok(true)
}
