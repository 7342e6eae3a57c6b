// SPDX-License-Identifier: MPL-2.0
//! Bidirectional pagination of the gallery window.
//!
//! ```text
//! sentinel ──proximity──▶ tracker ──FetchRequest──▶ host
//!                            ▲                        │
//!                            └──── on_page_delivered ─┘
//! monitor ── polls tracker until no fetch is outstanding
//! ```

pub mod monitor;
pub mod sentinel;
pub mod tracker;

pub use monitor::{Check, LoadingMonitor, ReconcileInterval};
pub use sentinel::{EdgeProximity, EdgeThreshold, ScrollMetrics};
pub use tracker::{FetchRequest, PageStatus, PaginationTracker};
