// SPDX-License-Identifier: MPL-2.0
//! The slide-mode stage: two stacked buffers that swap roles once new
//! content is ready.

pub mod buffer;
pub mod cache;
pub mod swapper;

pub use buffer::{BufferSlot, LoadToken, Slot, SlotPresentation, StageContent, PENDING_OPACITY};
pub use cache::{CacheLimits, CacheStats, StageImageCache};
pub use swapper::{RenderTimeout, StageLoad, StageSwapper, SwapOutcome};
