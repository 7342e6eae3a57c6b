// SPDX-License-Identifier: MPL-2.0
//! Ordered store of the items rendered so far.
//!
//! Forward pages are appended, backward pages are prepended, so the store
//! always holds one contiguous run of pages in collection order. Items already
//! present (same id) are not inserted twice.

use crate::domain::{Direction, GalleryItem, ItemId, Page};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct Collection {
    items: Vec<Arc<GalleryItem>>,
    pages: HashMap<ItemId, usize>,
}

impl Collection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges a delivered page at the end named by `direction`.
    ///
    /// `None` (the initial page) appends. Returns the number of items inserted.
    pub fn merge(&mut self, page: &Page, direction: Option<Direction>) -> usize {
        let fresh: Vec<Arc<GalleryItem>> = page
            .items
            .iter()
            .filter(|item| !self.pages.contains_key(&item.id))
            .cloned()
            .collect();
        let inserted = fresh.len();
        if inserted < page.items.len() {
            tracing::debug!(
                page = page.index(),
                duplicates = page.items.len() - inserted,
                "skipping items already in collection"
            );
        }

        for item in &fresh {
            self.pages.insert(item.id.clone(), page.index());
        }
        match direction {
            Some(Direction::Backward) => {
                self.items.splice(0..0, fresh);
            }
            Some(Direction::Forward) | None => self.items.extend(fresh),
        }
        inserted
    }

    #[must_use]
    pub fn items(&self) -> &[Arc<GalleryItem>] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: &ItemId) -> bool {
        self.pages.contains_key(id)
    }

    #[must_use]
    pub fn position(&self, id: &ItemId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }

    #[must_use]
    pub fn get(&self, id: &ItemId) -> Option<&Arc<GalleryItem>> {
        self.position(id).map(|index| &self.items[index])
    }

    /// Page the item was delivered with.
    #[must_use]
    pub fn page_of(&self, id: &ItemId) -> Option<usize> {
        self.pages.get(id).copied()
    }

    /// Item after `id`, or `None` at the end of the loaded window.
    #[must_use]
    pub fn next_after(&self, id: &ItemId) -> Option<&Arc<GalleryItem>> {
        self.position(id).and_then(|index| self.items.get(index + 1))
    }

    /// Item before `id`, or `None` at the start of the loaded window.
    #[must_use]
    pub fn previous_before(&self, id: &ItemId) -> Option<&Arc<GalleryItem>> {
        self.position(id)
            .and_then(|index| index.checked_sub(1))
            .and_then(|index| self.items.get(index))
    }

    /// Relative position of `id` in the loaded window, from 0.0 to 1.0.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn relative_position(&self, id: &ItemId) -> Option<f32> {
        let index = self.position(id)?;
        if self.items.len() <= 1 {
            return Some(0.0);
        }
        Some(index as f32 / (self.items.len() - 1) as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PageInfo;

    fn page(index: usize, ids: &[&str]) -> Page {
        let items = ids
            .iter()
            .map(|id| Arc::new(GalleryItem::new(*id, *id, format!("/m/{id}.png"))))
            .collect();
        Page::new(PageInfo::new(index, 5), items)
    }

    fn ids(collection: &Collection) -> Vec<&str> {
        collection.items().iter().map(|item| item.id.as_str()).collect()
    }

    #[test]
    fn forward_pages_append_backward_pages_prepend() {
        let mut collection = Collection::new();
        collection.merge(&page(2, &["e", "f"]), None);
        collection.merge(&page(3, &["g"]), Some(Direction::Forward));
        collection.merge(&page(1, &["c", "d"]), Some(Direction::Backward));

        assert_eq!(ids(&collection), vec!["c", "d", "e", "f", "g"]);
        assert_eq!(collection.page_of(&ItemId::new("c")), Some(1));
        assert_eq!(collection.page_of(&ItemId::new("g")), Some(3));
    }

    #[test]
    fn duplicate_items_are_skipped() {
        let mut collection = Collection::new();
        collection.merge(&page(0, &["a", "b"]), None);
        let inserted = collection.merge(&page(1, &["b", "c"]), Some(Direction::Forward));

        assert_eq!(inserted, 1);
        assert_eq!(ids(&collection), vec!["a", "b", "c"]);
        assert_eq!(collection.page_of(&ItemId::new("b")), Some(0));
    }

    #[test]
    fn siblings_stop_at_window_edges() {
        let mut collection = Collection::new();
        collection.merge(&page(0, &["a", "b", "c"]), None);

        let b = ItemId::new("b");
        assert_eq!(collection.next_after(&b).map(|i| i.id.as_str()), Some("c"));
        assert_eq!(collection.previous_before(&b).map(|i| i.id.as_str()), Some("a"));
        assert!(collection.next_after(&ItemId::new("c")).is_none());
        assert!(collection.previous_before(&ItemId::new("a")).is_none());
        assert!(collection.next_after(&ItemId::new("zzz")).is_none());
    }

    #[test]
    fn relative_position_spans_window() {
        let mut collection = Collection::new();
        collection.merge(&page(0, &["a", "b", "c"]), None);
        assert_eq!(collection.relative_position(&ItemId::new("a")), Some(0.0));
        assert_eq!(collection.relative_position(&ItemId::new("c")), Some(1.0));
        assert_eq!(collection.relative_position(&ItemId::new("x")), None);
    }

    #[test]
    fn items_are_shared_not_copied() {
        let delivered = page(0, &["a"]);
        let mut collection = Collection::new();
        collection.merge(&delivered, None);
        assert!(Arc::ptr_eq(&delivered.items[0], &collection.items()[0]));
    }
}
