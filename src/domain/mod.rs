// SPDX-License-Identifier: MPL-2.0
//! Domain layer - gallery data types with no presentation dependencies.
//!
//! Nothing in here knows about iced; the pagination tracker, the stage
//! swapper and the selection coordinator are all built on these types.
//!
//! # Modules
//!
//! - [`item`]: Collection entries ([`GalleryItem`], [`ItemId`], [`ContentKind`])
//! - [`page`]: Pagination metadata ([`PageInfo`], [`Page`], [`Direction`])
//! - [`mode`]: Layouts ([`DisplayMode`])

pub mod item;
pub mod mode;
pub mod page;

pub use item::{ContentKind, GalleryItem, ItemId, ItemMetadata, MediaFile};
pub use mode::DisplayMode;
pub use page::{Direction, Page, PageInfo};
