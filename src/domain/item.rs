// SPDX-License-Identifier: MPL-2.0
//! Collection entries.
//!
//! Items are immutable once received from the host and are shared as
//! `Arc<GalleryItem>`; the gallery never copies them.

use chrono::{DateTime, Local};
use std::fmt;

/// Media type prefixes whose content goes through the host renderer instead
/// of being decoded as an image.
pub const RENDERED_CONTENT_PREFIXES: &[&str] = &["text/html", "application/xhtml+xml"];

/// Stable identifier of an item, unique across all pages.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(String);

impl ItemId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One file attached to an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    /// MIME type, e.g. `image/jpeg` or `text/html; charset=utf-8`.
    pub media_type: String,
}

impl MediaFile {
    #[must_use]
    pub fn new(media_type: impl Into<String>) -> Self {
        Self {
            media_type: media_type.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemMetadata {
    /// Attached files; the first one is the primary file.
    pub files: Vec<MediaFile>,
}

/// How the stage obtains an item's full-size content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// Decoded from the `full` URL.
    Image,
    /// Produced asynchronously by the host renderer.
    Rendered,
}

/// A single entry of the gallery collection.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryItem {
    pub id: ItemId,
    pub title: String,
    /// Thumbnail used in the thumbnails layout and as the stage fallback.
    pub thumb: String,
    /// Very small preview used in list rows.
    pub tiny: String,
    /// Full-resolution source shown on the stage.
    pub full: String,
    pub metadata: Option<ItemMetadata>,
    pub modified: Option<DateTime<Local>>,
    pub size_bytes: Option<u64>,
}

impl GalleryItem {
    /// Creates an item whose thumbnail, tiny preview and full source share one URL.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>, url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            id: ItemId::new(id),
            title: title.into(),
            thumb: url.clone(),
            tiny: url.clone(),
            full: url,
            metadata: None,
            modified: None,
            size_bytes: None,
        }
    }

    /// Attaches a primary file with the given media type.
    #[must_use]
    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.metadata
            .get_or_insert_with(ItemMetadata::default)
            .files
            .push(MediaFile::new(media_type));
        self
    }

    #[must_use]
    pub fn primary_media_type(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|meta| meta.files.first())
            .map(|file| file.media_type.as_str())
    }

    /// Decides whether the stage decodes this item or asks the renderer for it.
    #[must_use]
    pub fn content_kind(&self) -> ContentKind {
        match self.primary_media_type() {
            Some(media_type) if is_rendered_media_type(media_type) => ContentKind::Rendered,
            _ => ContentKind::Image,
        }
    }
}

fn is_rendered_media_type(media_type: &str) -> bool {
    let media_type = media_type.trim_start().to_ascii_lowercase();
    RENDERED_CONTENT_PREFIXES
        .iter()
        .any(|prefix| media_type.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_without_metadata_is_image() {
        let item = GalleryItem::new("a", "A", "/tmp/a.png");
        assert_eq!(item.content_kind(), ContentKind::Image);
        assert!(item.primary_media_type().is_none());
    }

    #[test]
    fn html_primary_file_is_rendered() {
        let item = GalleryItem::new("a", "A", "/tmp/a.html").with_media_type("text/html");
        assert_eq!(item.content_kind(), ContentKind::Rendered);
    }

    #[test]
    fn media_type_match_is_a_case_insensitive_prefix() {
        let item = GalleryItem::new("a", "A", "/tmp/a.html")
            .with_media_type("Text/HTML; charset=utf-8");
        assert_eq!(item.content_kind(), ContentKind::Rendered);

        let xhtml = GalleryItem::new("b", "B", "/tmp/b.xhtml")
            .with_media_type("application/xhtml+xml");
        assert_eq!(xhtml.content_kind(), ContentKind::Rendered);
    }

    #[test]
    fn only_primary_file_decides_routing() {
        let item = GalleryItem::new("a", "A", "/tmp/a.jpg")
            .with_media_type("image/jpeg")
            .with_media_type("text/html");
        assert_eq!(item.content_kind(), ContentKind::Image);
    }

    #[test]
    fn empty_files_list_is_image() {
        let mut item = GalleryItem::new("a", "A", "/tmp/a.jpg");
        item.metadata = Some(ItemMetadata::default());
        assert_eq!(item.content_kind(), ContentKind::Image);
    }
}
