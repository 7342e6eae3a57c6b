// SPDX-License-Identifier: MPL-2.0
//! Pagination metadata exchanged with the host.

use super::item::GalleryItem;
use std::sync::Arc;

/// Which edge of the loaded window a page extends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards later pages (the trailing edge).
    Forward,
    /// Towards earlier pages (the leading edge).
    Backward,
}

/// Page metadata supplied by the host with every delivered page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    /// Page the delivery belongs to (the starting page on first render).
    pub page: usize,
    /// Total number of pages currently known to the host.
    pub total_pages: usize,
}

impl PageInfo {
    #[must_use]
    pub fn new(page: usize, total_pages: usize) -> Self {
        Self { page, total_pages }
    }

    /// Whether `page` is a valid index for this collection.
    #[must_use]
    pub fn contains(&self, page: usize) -> bool {
        page < self.total_pages
    }
}

/// A page of items returned by the host.
#[derive(Debug, Clone)]
pub struct Page {
    pub info: PageInfo,
    pub items: Vec<Arc<GalleryItem>>,
}

impl Page {
    #[must_use]
    pub fn new(info: PageInfo, items: Vec<Arc<GalleryItem>>) -> Self {
        Self { info, items }
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.info.page
    }
}
