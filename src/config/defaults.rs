// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the gallery. Constants are organized by category.
//!
//! # Categories
//!
//! - **Gallery**: Page size and thumbnail dimensions
//! - **Pagination**: Loading reconciliation and edge proximity
//! - **Stage**: Render timeout, activation debounce and decoded image cache

// ==========================================================================
// Gallery Defaults
// ==========================================================================

/// Default number of items per page requested from the host.
pub const DEFAULT_PAGE_SIZE: usize = 48;

/// Minimum page size.
pub const MIN_PAGE_SIZE: usize = 1;

/// Maximum page size.
pub const MAX_PAGE_SIZE: usize = 500;

/// Default thumbnail edge length in logical pixels.
pub const DEFAULT_THUMBNAIL_SIZE: u32 = 160;

/// Minimum thumbnail edge length.
pub const MIN_THUMBNAIL_SIZE: u32 = 48;

/// Maximum thumbnail edge length.
pub const MAX_THUMBNAIL_SIZE: u32 = 512;

// ==========================================================================
// Pagination Defaults
// ==========================================================================

/// Delay between two loading reconciliation checks (in milliseconds).
pub const DEFAULT_RECONCILE_INTERVAL_MS: u64 = 2_000;

/// Minimum reconciliation delay.
pub const MIN_RECONCILE_INTERVAL_MS: u64 = 100;

/// Maximum reconciliation delay.
pub const MAX_RECONCILE_INTERVAL_MS: u64 = 30_000;

/// Fraction of the scroll range at either end treated as "sentinel visible".
pub const DEFAULT_EDGE_THRESHOLD: f32 = 0.05;

/// Minimum edge threshold.
pub const MIN_EDGE_THRESHOLD: f32 = 0.0;

/// Maximum edge threshold.
pub const MAX_EDGE_THRESHOLD: f32 = 0.5;

// ==========================================================================
// Stage Defaults
// ==========================================================================

/// Time a stage load may stay pending before the placeholder is shown (seconds).
pub const DEFAULT_RENDER_TIMEOUT_SECS: u64 = 10;

/// Minimum render timeout.
pub const MIN_RENDER_TIMEOUT_SECS: u64 = 1;

/// Maximum render timeout.
pub const MAX_RENDER_TIMEOUT_SECS: u64 = 120;

/// Delay before a mode switch into slide view activates the selection (milliseconds).
pub const DEFAULT_ACTIVATION_DEBOUNCE_MS: u64 = 100;

/// Maximum activation debounce.
pub const MAX_ACTIVATION_DEBOUNCE_MS: u64 = 2_000;

/// Two clicks on the same item within this window count as a double click.
pub const DOUBLE_CLICK_THRESHOLD_MS: u64 = 350;

/// Default number of decoded stage images kept in memory.
pub const DEFAULT_STAGE_CACHE_IMAGES: usize = 8;

/// Minimum number of cached stage images.
pub const MIN_STAGE_CACHE_IMAGES: usize = 1;

/// Maximum number of cached stage images.
pub const MAX_STAGE_CACHE_IMAGES: usize = 64;

/// Default byte budget for decoded stage images (64 MB).
pub const DEFAULT_STAGE_CACHE_BYTES: usize = 64 * 1024 * 1024;

/// Minimum byte budget for decoded stage images (8 MB).
pub const MIN_STAGE_CACHE_BYTES: usize = 8 * 1024 * 1024;

/// Maximum byte budget for decoded stage images (512 MB).
pub const MAX_STAGE_CACHE_BYTES: usize = 512 * 1024 * 1024;
