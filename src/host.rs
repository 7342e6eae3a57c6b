// SPDX-License-Identifier: MPL-2.0
//! Ports the embedding application implements.
//!
//! The gallery never reads the collection or media sources itself. It asks
//! the host for pages, decoded images and rendered documents through these
//! traits and drives the returned futures as iced tasks.

use crate::domain::{Direction, GalleryItem, Page};
use crate::error::{FetchError, RenderError};
use crate::media::{ImageData, RenderedDocument};
use futures_util::future::BoxFuture;
use std::fmt;
use std::sync::Arc;

/// Supplies pages of the collection.
pub trait PageSource: Send + Sync {
    /// Fetches `page`, merging it at the `direction` end of the host collection.
    ///
    /// The returned page carries fresh pagination metadata; the host collection
    /// may have grown or shrunk since the last delivery.
    fn fetch_page(&self, direction: Direction, page: usize)
        -> BoxFuture<'static, Result<Page, FetchError>>;
}

/// Decodes an item's full-size image.
pub trait ImageLoader: Send + Sync {
    fn load(&self, item: &GalleryItem) -> BoxFuture<'static, Result<ImageData, RenderError>>;
}

/// Renders non-image content (markup documents).
///
/// The future resolves exactly once, when the rendered content is safe to reveal.
pub trait ContentRenderer: Send + Sync {
    fn render(
        &self,
        item: &GalleryItem,
        width: f32,
        height: f32,
    ) -> BoxFuture<'static, Result<RenderedDocument, RenderError>>;
}

/// The host collaborators handed to the gallery.
#[derive(Clone)]
pub struct Host {
    pub pages: Arc<dyn PageSource>,
    pub images: Arc<dyn ImageLoader>,
    pub renderer: Arc<dyn ContentRenderer>,
}

impl Host {
    #[must_use]
    pub fn new(
        pages: Arc<dyn PageSource>,
        images: Arc<dyn ImageLoader>,
        renderer: Arc<dyn ContentRenderer>,
    ) -> Self {
        Self {
            pages,
            images,
            renderer,
        }
    }
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host").finish_non_exhaustive()
    }
}
