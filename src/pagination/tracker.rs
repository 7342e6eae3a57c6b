// SPDX-License-Identifier: MPL-2.0
//! Request bookkeeping for a window of pages that grows at both ends.
//!
//! The tracker never stores items. It decides which page to ask the host for
//! when a sentinel reports proximity to an edge, and remembers what has been
//! requested so repeated proximity signals never duplicate a fetch.
//!
//! # Invariants
//!
//! - A page moves `unrequested → loading → loaded` and never back. A failed
//!   fetch is the only way out of `loading` other than delivery, and a failed
//!   page may be requested again.
//! - At most one fetch is in flight per edge. Both edges may have one each.
//! - Fetches are always computed from the tracked edge, never from the host's
//!   current page, so forward pages are requested strictly in increasing order
//!   and backward pages strictly in decreasing order.

use crate::domain::{Direction, PageInfo};
use crate::error::FetchError;
use std::collections::BTreeMap;

/// Bookkeeping state of a single page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStatus {
    /// A fetch is in flight. `direction` is `None` for the initial page.
    Loading { direction: Option<Direction> },
    /// The host merged the page into the collection.
    Loaded,
    /// The fetch failed; the edge re-arms for this page.
    Failed { direction: Option<Direction> },
}

/// A page the host should fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    pub direction: Direction,
    pub page: usize,
    /// Pagination metadata at the time of the request.
    pub snapshot: PageInfo,
}

/// Pagination window tracker.
#[derive(Debug, Clone)]
pub struct PaginationTracker {
    info: PageInfo,
    pages: BTreeMap<usize, PageStatus>,
    left_edge: usize,
    right_edge: usize,
    first_page_loaded: bool,
}

impl PaginationTracker {
    /// Creates a tracker for a collection opened at `info.page`.
    ///
    /// The starting page is registered as loading: the host is expected to
    /// deliver it through [`on_page_delivered`](Self::on_page_delivered).
    #[must_use]
    pub fn new(info: PageInfo) -> Self {
        let start = info.page.min(info.total_pages.saturating_sub(1));
        let mut pages = BTreeMap::new();
        if info.total_pages > 0 {
            pages.insert(start, PageStatus::Loading { direction: None });
        }
        Self {
            info: PageInfo::new(start, info.total_pages),
            pages,
            left_edge: start,
            right_edge: start,
            first_page_loaded: false,
        }
    }

    /// Trailing sentinel became visible.
    ///
    /// Returns the forward fetch to issue, if any. The page is marked as
    /// loading before returning so that repeated signals are no-ops.
    pub fn on_approaching_end(&mut self) -> Option<FetchRequest> {
        let next = self.right_edge + 1;
        if next >= self.info.total_pages {
            return None;
        }
        if self.in_flight(Direction::Forward).is_some() || !self.is_requestable(next) {
            return None;
        }
        Some(self.issue(Direction::Forward, next))
    }

    /// Leading sentinel became visible.
    ///
    /// Symmetric to [`on_approaching_end`](Self::on_approaching_end); stops
    /// once page 0 has been loaded.
    pub fn on_approaching_start(&mut self) -> Option<FetchRequest> {
        if self.first_page_loaded || self.left_edge == 0 {
            return None;
        }
        let previous = self.left_edge - 1;
        if self.in_flight(Direction::Backward).is_some() || !self.is_requestable(previous) {
            return None;
        }
        Some(self.issue(Direction::Backward, previous))
    }

    /// The host merged `page` into the rendered collection.
    ///
    /// Returns `true` if the page was not already loaded. Pages outside the
    /// known range are ignored.
    pub fn on_page_delivered(&mut self, page: usize) -> bool {
        if !self.info.contains(page) {
            tracing::warn!(
                page,
                total_pages = self.info.total_pages,
                "ignoring delivery of out-of-range page"
            );
            return false;
        }

        let previous = self.pages.insert(page, PageStatus::Loaded);
        if page == 0 {
            self.first_page_loaded = true;
        }
        self.right_edge = self.right_edge.max(page);
        self.left_edge = self.left_edge.min(page);

        let newly_loaded = previous != Some(PageStatus::Loaded);
        if newly_loaded {
            tracing::debug!(
                page,
                left_edge = self.left_edge,
                right_edge = self.right_edge,
                "page delivered"
            );
        }
        newly_loaded
    }

    /// The host could not fetch `page`.
    ///
    /// Returns `true` if a fetch for that page was in flight.
    pub fn on_fetch_failed(&mut self, page: usize, error: &FetchError) -> bool {
        match self.pages.get(&page).copied() {
            Some(PageStatus::Loading { direction }) => {
                tracing::warn!(page, %error, "page fetch failed");
                self.pages.insert(page, PageStatus::Failed { direction });
                true
            }
            _ => false,
        }
    }

    /// Applies pagination metadata supplied by the host with a render pass.
    ///
    /// When the collection shrinks, edges are clamped and every page that no
    /// longer exists is forgotten, so it can be requested again if the
    /// collection grows back.
    pub fn update_info(&mut self, info: PageInfo) {
        self.info = info;
        if info.total_pages == 0 {
            self.pages.clear();
            self.left_edge = 0;
            self.right_edge = 0;
            return;
        }

        let last = info.total_pages - 1;
        self.pages.retain(|&page, _| page <= last);
        self.right_edge = self.right_edge.min(last);
        self.left_edge = self.left_edge.min(self.right_edge);
    }

    /// Page of the fetch in flight for `direction`, if any.
    #[must_use]
    pub fn in_flight(&self, direction: Direction) -> Option<usize> {
        self.pages.iter().find_map(|(&page, status)| match status {
            PageStatus::Loading {
                direction: Some(dir),
            } if *dir == direction => Some(page),
            _ => None,
        })
    }

    #[must_use]
    pub fn status(&self, page: usize) -> Option<PageStatus> {
        self.pages.get(&page).copied()
    }

    #[must_use]
    pub fn is_loading(&self, page: usize) -> bool {
        matches!(self.status(page), Some(PageStatus::Loading { .. }))
    }

    #[must_use]
    pub fn is_loaded(&self, page: usize) -> bool {
        matches!(self.status(page), Some(PageStatus::Loaded))
    }

    /// Pages confirmed rendered, in ascending order.
    #[must_use]
    pub fn loaded_pages(&self) -> Vec<usize> {
        self.pages_where(|status| matches!(status, PageStatus::Loaded))
    }

    /// Pages with a fetch in flight, in ascending order.
    #[must_use]
    pub fn loading_pages(&self) -> Vec<usize> {
        self.pages_where(|status| matches!(status, PageStatus::Loading { .. }))
    }

    /// Pages whose last fetch failed, in ascending order.
    #[must_use]
    pub fn failed_pages(&self) -> Vec<usize> {
        self.pages_where(|status| matches!(status, PageStatus::Failed { .. }))
    }

    /// Every page the tracker knows about: loading, loaded or failed.
    #[must_use]
    pub fn requested_pages(&self) -> Vec<usize> {
        self.pages.keys().copied().collect()
    }

    /// Number of fetches still in flight.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.pages
            .values()
            .filter(|status| matches!(status, PageStatus::Loading { .. }))
            .count()
    }

    #[must_use]
    pub fn left_edge(&self) -> usize {
        self.left_edge
    }

    #[must_use]
    pub fn right_edge(&self) -> usize {
        self.right_edge
    }

    #[must_use]
    pub fn first_page_loaded(&self) -> bool {
        self.first_page_loaded
    }

    #[must_use]
    pub fn has_more_after(&self) -> bool {
        self.right_edge + 1 < self.info.total_pages
    }

    #[must_use]
    pub fn has_more_before(&self) -> bool {
        !self.first_page_loaded && self.left_edge > 0
    }

    #[must_use]
    pub fn current_page(&self) -> usize {
        self.info.page
    }

    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.info.total_pages
    }

    #[must_use]
    pub fn snapshot(&self) -> PageInfo {
        self.info
    }

    fn is_requestable(&self, page: usize) -> bool {
        matches!(self.status(page), None | Some(PageStatus::Failed { .. }))
    }

    fn issue(&mut self, direction: Direction, page: usize) -> FetchRequest {
        let retry = matches!(self.status(page), Some(PageStatus::Failed { .. }));
        self.pages.insert(
            page,
            PageStatus::Loading {
                direction: Some(direction),
            },
        );
        tracing::debug!(page, ?direction, retry, "requesting page");
        FetchRequest {
            direction,
            page,
            snapshot: self.info,
        }
    }

    fn pages_where(&self, predicate: impl Fn(&PageStatus) -> bool) -> Vec<usize> {
        self.pages
            .iter()
            .filter(|(_, status)| predicate(status))
            .map(|(&page, _)| page)
            .collect()
    }
}
