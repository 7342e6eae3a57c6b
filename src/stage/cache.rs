// SPDX-License-Identifier: MPL-2.0
//! Decoded image cache for the stage.
//!
//! Returning to a recently shown item reuses its decoded pixels instead of
//! decoding the full source again.
//!
//! - **LRU eviction**: least recently shown images go first
//! - **Memory-bounded**: total size limited by a byte budget and an image count
//! - **Item-keyed**: entries are indexed by [`ItemId`]

use crate::config::{
    DEFAULT_STAGE_CACHE_BYTES, DEFAULT_STAGE_CACHE_IMAGES, MAX_STAGE_CACHE_BYTES,
    MAX_STAGE_CACHE_IMAGES, MIN_STAGE_CACHE_BYTES, MIN_STAGE_CACHE_IMAGES,
};
use crate::domain::ItemId;
use crate::media::ImageData;
use lru::LruCache;
use std::num::NonZeroUsize;

/// Bounds of the stage image cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheLimits {
    pub max_bytes: usize,
    pub max_images: usize,
}

impl Default for CacheLimits {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_STAGE_CACHE_BYTES,
            max_images: DEFAULT_STAGE_CACHE_IMAGES,
        }
    }
}

impl CacheLimits {
    /// Creates limits clamped to the supported ranges.
    #[must_use]
    pub fn new(max_bytes: usize, max_images: usize) -> Self {
        Self {
            max_bytes: max_bytes.clamp(MIN_STAGE_CACHE_BYTES, MAX_STAGE_CACHE_BYTES),
            max_images: max_images.clamp(MIN_STAGE_CACHE_IMAGES, MAX_STAGE_CACHE_IMAGES),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    pub image_count: usize,
    pub total_bytes: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

impl CacheStats {
    /// Hit rate as a percentage (0.0 - 100.0).
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

pub struct StageImageCache {
    cache: LruCache<ItemId, ImageData>,
    limits: CacheLimits,
    current_bytes: usize,
    stats: CacheStats,
}

impl Default for StageImageCache {
    fn default() -> Self {
        Self::new(CacheLimits::default())
    }
}

impl StageImageCache {
    #[must_use]
    pub fn new(limits: CacheLimits) -> Self {
        let capacity = NonZeroUsize::new(limits.max_images).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::new(capacity),
            limits,
            current_bytes: 0,
            stats: CacheStats::default(),
        }
    }

    /// Stores a decoded image.
    ///
    /// Images larger than half the byte budget are not cached; returns `false`
    /// in that case.
    pub fn insert(&mut self, id: ItemId, image: ImageData) -> bool {
        let size = image.size_bytes();
        if size > self.limits.max_bytes / 2 {
            tracing::debug!(item = %id, size, "image too large for stage cache");
            return false;
        }

        if let Some(existing) = self.cache.pop(&id) {
            self.current_bytes = self.current_bytes.saturating_sub(existing.size_bytes());
        }

        while self.current_bytes + size > self.limits.max_bytes {
            let Some((_, evicted)) = self.cache.pop_lru() else {
                break;
            };
            self.current_bytes = self.current_bytes.saturating_sub(evicted.size_bytes());
            self.stats.evictions += 1;
        }

        // `push` evicts on the count bound and hands the entry back.
        if let Some((evicted_id, evicted)) = self.cache.push(id.clone(), image) {
            if evicted_id != id {
                self.current_bytes = self.current_bytes.saturating_sub(evicted.size_bytes());
                self.stats.evictions += 1;
            }
        }

        self.current_bytes += size;
        self.stats.image_count = self.cache.len();
        self.stats.total_bytes = self.current_bytes;
        true
    }

    /// Looks up an image and marks it as most recently used.
    pub fn get(&mut self, id: &ItemId) -> Option<ImageData> {
        match self.cache.get(id) {
            Some(image) => {
                self.stats.hits += 1;
                Some(image.clone())
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    #[must_use]
    pub fn contains(&self, id: &ItemId) -> bool {
        self.cache.contains(id)
    }

    pub fn clear(&mut self) {
        self.cache.clear();
        self.current_bytes = 0;
        self.stats.image_count = 0;
        self.stats.total_bytes = 0;
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    #[must_use]
    pub fn memory_usage(&self) -> usize {
        self.current_bytes
    }

    #[must_use]
    pub fn limits(&self) -> CacheLimits {
        self.limits
    }
}

impl std::fmt::Debug for StageImageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageImageCache")
            .field("image_count", &self.cache.len())
            .field("memory_usage", &self.current_bytes)
            .field("limits", &self.limits)
            .field("stats", &self.stats)
            .finish()
    }
}
