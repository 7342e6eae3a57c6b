// SPDX-License-Identifier: MPL-2.0
//! Image decoding for the stage.

use crate::error::RenderError;
use iced::widget::image;
use image_rs::GenericImageView;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Decoded image ready to be drawn.
#[derive(Debug, Clone)]
pub struct ImageData {
    pub handle: image::Handle,
    pub width: u32,
    pub height: u32,
    /// Decoded pixels, shared with cache entries.
    rgba_bytes: Arc<Vec<u8>>,
}

impl PartialEq for ImageData {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && Arc::ptr_eq(&self.rgba_bytes, &other.rgba_bytes)
    }
}

impl ImageData {
    /// Creates a new `ImageData` from RGBA pixels.
    #[must_use]
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        let rgba_bytes = Arc::new(pixels);
        let handle = image::Handle::from_rgba(width, height, rgba_bytes.to_vec());
        Self {
            handle,
            width,
            height,
            rgba_bytes,
        }
    }

    #[must_use]
    pub fn rgba_bytes(&self) -> &[u8] {
        &self.rgba_bytes
    }

    /// Memory held by the decoded pixels (4 bytes per pixel).
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        (self.width as usize) * (self.height as usize) * 4
    }
}

/// Decodes encoded image bytes (PNG, JPEG, ...).
///
/// # Errors
///
/// Returns [`RenderError::Malformed`] if the format is unknown or the data is corrupted.
pub fn decode(bytes: &[u8]) -> Result<ImageData, RenderError> {
    let img = image_rs::load_from_memory(bytes)?;
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(RenderError::Malformed(format!(
            "invalid dimensions {width}x{height}"
        )));
    }
    Ok(ImageData::from_rgba(width, height, img.to_rgba8().into_vec()))
}

/// Loads and decodes the image at `path`.
///
/// # Errors
///
/// Returns [`RenderError::Io`] if the file cannot be read and
/// [`RenderError::Malformed`] if it cannot be decoded.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<ImageData, RenderError> {
    let bytes = std::fs::read(path)?;
    decode(&bytes)
}

/// Decodes the image at `path` on the blocking thread pool.
pub async fn load_image_async(path: PathBuf) -> Result<ImageData, RenderError> {
    tokio::task::spawn_blocking(move || load_image(&path))
        .await
        .unwrap_or_else(|e| Err(RenderError::Host(format!("decode task failed: {e}"))))
}
