// SPDX-License-Identifier: MPL-2.0
//! Edge proximity detection.
//!
//! The leading and trailing sentinels of the loaded window are considered
//! visible when the scroll position is within a fraction of the scroll range
//! from the respective end.

use crate::config::{DEFAULT_EDGE_THRESHOLD, MAX_EDGE_THRESHOLD, MIN_EDGE_THRESHOLD};

/// Fraction of the scroll range at either end that counts as "at the edge".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeThreshold(f32);

impl EdgeThreshold {
    /// Creates a threshold, clamping to `0.0..=0.5`. Non-finite values fall back to the default.
    #[must_use]
    pub fn new(value: f32) -> Self {
        if value.is_finite() {
            Self(value.clamp(MIN_EDGE_THRESHOLD, MAX_EDGE_THRESHOLD))
        } else {
            Self::default()
        }
    }

    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }
}

impl Default for EdgeThreshold {
    fn default() -> Self {
        Self(DEFAULT_EDGE_THRESHOLD)
    }
}

/// Scroll geometry along the paging axis, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    /// Offset of the viewport from the start of the content.
    pub offset: f32,
    /// Length of the visible viewport.
    pub viewport: f32,
    /// Length of the whole content.
    pub content: f32,
}

impl ScrollMetrics {
    #[must_use]
    pub fn new(offset: f32, viewport: f32, content: f32) -> Self {
        Self {
            offset,
            viewport,
            content,
        }
    }

    /// Scrollable distance; zero when the content fits the viewport.
    #[must_use]
    pub fn range(&self) -> f32 {
        (self.content - self.viewport).max(0.0)
    }

    /// Whether all content is visible without scrolling.
    #[must_use]
    pub fn fits(&self) -> bool {
        self.range() <= f32::EPSILON
    }
}

/// Which sentinels are visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EdgeProximity {
    pub start: bool,
    pub end: bool,
}

impl EdgeProximity {
    #[must_use]
    pub fn any(self) -> bool {
        self.start || self.end
    }
}

/// Determines sentinel visibility from scroll geometry.
#[must_use]
pub fn detect(metrics: ScrollMetrics, threshold: EdgeThreshold) -> EdgeProximity {
    if metrics.fits() {
        return EdgeProximity {
            start: true,
            end: true,
        };
    }

    let relative = (metrics.offset / metrics.range()).clamp(0.0, 1.0);
    EdgeProximity {
        start: relative <= threshold.value(),
        end: relative >= 1.0 - threshold.value(),
    }
}
