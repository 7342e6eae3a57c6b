// SPDX-License-Identifier: MPL-2.0
//! The two stage buffers and what they hold.

use crate::domain::{ContentKind, ItemId};
use crate::error::RenderError;

/// Opacity of a loading buffer's previous contents while a render is pending.
pub const PENDING_OPACITY: f32 = 0.4;

/// One of the two stage buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    A,
    B,
}

impl Slot {
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Slot::A => Slot::B,
            Slot::B => Slot::A,
        }
    }

    #[must_use]
    pub(crate) fn index(self) -> usize {
        match self {
            Slot::A => 0,
            Slot::B => 1,
        }
    }
}

/// Generation of a stage load.
///
/// Every load gets a fresh token; completions carrying any other token are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct LoadToken(u64);

impl LoadToken {
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }

    #[must_use]
    pub(crate) fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// What a buffer displays.
#[derive(Debug, Clone, PartialEq)]
pub enum StageContent<C> {
    /// Content produced by the image loader or the renderer.
    Ready(C),
    /// Shown instead of content that failed or timed out.
    Placeholder {
        title: String,
        /// Thumbnail URL the view may show in place of the full content.
        thumb: String,
        error: RenderError,
    },
}

impl<C> StageContent<C> {
    #[must_use]
    pub fn ready(&self) -> Option<&C> {
        match self {
            StageContent::Ready(content) => Some(content),
            StageContent::Placeholder { .. } => None,
        }
    }

    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        matches!(self, StageContent::Placeholder { .. })
    }
}

/// State of a single buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct BufferSlot<C> {
    pub(crate) content: Option<StageContent<C>>,
    pub(crate) item: Option<ItemId>,
    pub(crate) kind: Option<ContentKind>,
    pub(crate) token: LoadToken,
}

impl<C> Default for BufferSlot<C> {
    fn default() -> Self {
        Self {
            content: None,
            item: None,
            kind: None,
            token: LoadToken::default(),
        }
    }
}

impl<C> BufferSlot<C> {
    #[must_use]
    pub fn content(&self) -> Option<&StageContent<C>> {
        self.content.as_ref()
    }

    /// Item whose content this buffer holds.
    #[must_use]
    pub fn source_item(&self) -> Option<&ItemId> {
        self.item.as_ref()
    }

    #[must_use]
    pub fn kind(&self) -> Option<ContentKind> {
        self.kind
    }

    /// Token of the last load that targeted this buffer.
    #[must_use]
    pub fn token(&self) -> LoadToken {
        self.token
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_none()
    }
}

/// How the view draws a buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotPresentation {
    pub opacity: f32,
    /// Pending treatment over stale contents.
    pub dimmed: bool,
    /// Drawn above the other buffer.
    pub raised: bool,
}

impl SlotPresentation {
    pub(crate) const VISIBLE: Self = Self {
        opacity: 1.0,
        dimmed: false,
        raised: true,
    };

    pub(crate) const HIDDEN: Self = Self {
        opacity: 0.0,
        dimmed: false,
        raised: false,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn other_slot_alternates() {
        assert_eq!(Slot::A.other(), Slot::B);
        assert_eq!(Slot::B.other(), Slot::A);
        assert_eq!(Slot::A.other().other(), Slot::A);
    }

    #[test]
    fn tokens_increase() {
        let first = LoadToken::default();
        assert!(first.next() > first);
        assert_eq!(first.next().value(), 1);
    }

    #[test]
    fn placeholder_has_no_ready_content() {
        let content: StageContent<u8> = StageContent::Placeholder {
            title: "t".into(),
            thumb: "/t.png".into(),
            error: RenderError::Timeout { secs: 1 },
        };
        assert!(content.is_placeholder());
        assert!(content.ready().is_none());
        assert_eq!(StageContent::Ready(3u8).ready(), Some(&3));
    }
}
