// SPDX-License-Identifier: MPL-2.0
//! Stage content: decoded images and extracted markup text.

pub mod image;
pub mod markup;

pub use image::{decode, load_image, load_image_async, ImageData};
pub use markup::{extract_text, BlockKind, RenderedDocument, TextBlock};

/// Content held by a stage buffer.
#[derive(Debug, Clone, PartialEq)]
pub enum StageMedia {
    Image(ImageData),
    Document(RenderedDocument),
}
