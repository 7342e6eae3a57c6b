// SPDX-License-Identifier: MPL-2.0
//! Double-buffered stage transitions.
//!
//! The visible buffer is never written while a transition is in progress.
//! New content is loaded into the hidden buffer; once it is ready the roles
//! flip in a single step, so the stage never shows a blank, partial or wrong
//! frame.
//!
//! ```text
//!            begin(item)                 complete(token, Ok)
//!   Idle ─────────────────▶ Loading ─────────────────────────▶ Idle (roles swapped)
//!    ▲                        │  │ complete(token, Err) / on_timeout(token)
//!    │                        │  └──────────────────────────▶ Idle (placeholder swapped in)
//!    └── begin(active item) ──┘  begin(other) keeps Loading with a fresh token
//! ```
//!
//! # Policies
//!
//! - **Latest selection wins.** A `begin` while a load is pending retargets the
//!   same hidden buffer with a new token; the superseded completion is stale.
//! - **Never hang.** A failed or timed-out load swaps in a placeholder for the
//!   selected item instead of leaving the old item on stage.

use super::buffer::{BufferSlot, LoadToken, Slot, SlotPresentation, StageContent, PENDING_OPACITY};
use crate::config::{DEFAULT_RENDER_TIMEOUT_SECS, MAX_RENDER_TIMEOUT_SECS, MIN_RENDER_TIMEOUT_SECS};
use crate::domain::{ContentKind, GalleryItem, ItemId};
use crate::error::RenderError;
use std::sync::Arc;
use std::time::Duration;

/// Time a stage load may stay pending before the placeholder is shown.
///
/// # Example
///
/// ```
/// use iced_gallery::stage::RenderTimeout;
///
/// assert_eq!(RenderTimeout::from_secs(5).value(), 5);
/// assert_eq!(RenderTimeout::from_secs(0).value(), 1); // Clamped to min
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTimeout(u64);

impl RenderTimeout {
    #[must_use]
    pub fn from_secs(secs: u64) -> Self {
        Self(secs.clamp(MIN_RENDER_TIMEOUT_SECS, MAX_RENDER_TIMEOUT_SECS))
    }

    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }

    #[must_use]
    pub fn as_duration(self) -> Duration {
        Duration::from_secs(self.0)
    }
}

impl Default for RenderTimeout {
    fn default() -> Self {
        Self(DEFAULT_RENDER_TIMEOUT_SECS)
    }
}

/// A load the orchestrator must perform and report back with its token.
#[derive(Debug, Clone, PartialEq)]
pub struct StageLoad {
    pub slot: Slot,
    pub token: LoadToken,
    pub item: Arc<GalleryItem>,
    pub kind: ContentKind,
}

#[derive(Debug, Clone, PartialEq)]
enum Phase {
    Idle,
    Loading(StageLoad),
}

/// Result of reporting a completion to the swapper.
#[derive(Debug, Clone, PartialEq)]
pub enum SwapOutcome {
    /// The loaded buffer became the visible one.
    Swapped { slot: Slot, item: ItemId },
    /// The load failed; a placeholder for the item became visible.
    FellBack {
        slot: Slot,
        item: Arc<GalleryItem>,
        error: RenderError,
    },
    /// The completion belonged to a superseded load and was discarded.
    Stale { token: LoadToken },
}

/// Stage double-buffer swapper.
#[derive(Debug, Clone)]
pub struct StageSwapper<C> {
    slots: [BufferSlot<C>; 2],
    active: Slot,
    phase: Phase,
    last_token: LoadToken,
    timeout: RenderTimeout,
}

impl<C> Default for StageSwapper<C> {
    fn default() -> Self {
        Self::new(RenderTimeout::default())
    }
}

impl<C> StageSwapper<C> {
    #[must_use]
    pub fn new(timeout: RenderTimeout) -> Self {
        Self {
            slots: [BufferSlot::default(), BufferSlot::default()],
            active: Slot::A,
            phase: Phase::Idle,
            last_token: LoadToken::default(),
            timeout,
        }
    }

    /// Starts a transition to `item`.
    ///
    /// Returns the load to perform, or `None` when the stage already shows or
    /// is already loading that item. Selecting the visible item while another
    /// load is pending cancels that load.
    pub fn begin(&mut self, item: Arc<GalleryItem>) -> Option<StageLoad> {
        let shows_item = self.slot(self.active).item.as_ref() == Some(&item.id);

        match &self.phase {
            Phase::Loading(pending) if pending.item.id == item.id => return None,
            Phase::Loading(pending) if shows_item => {
                tracing::debug!(
                    token = pending.token.value(),
                    item = %item.id,
                    "pending stage load cancelled, item already visible"
                );
                self.phase = Phase::Idle;
                return None;
            }
            Phase::Loading(pending) => {
                tracing::debug!(
                    superseded = pending.token.value(),
                    item = %item.id,
                    "stage load superseded"
                );
            }
            Phase::Idle if shows_item => return None,
            Phase::Idle => {}
        }

        self.last_token = self.last_token.next();
        let slot = self.active.other();
        let kind = item.content_kind();
        let load = StageLoad {
            slot,
            token: self.last_token,
            item,
            kind,
        };

        self.slots[slot.index()].token = load.token;
        tracing::debug!(
            token = load.token.value(),
            ?slot,
            ?kind,
            item = %load.item.id,
            "stage load started"
        );
        self.phase = Phase::Loading(load.clone());
        Some(load)
    }

    /// Reports the end of a load.
    ///
    /// A completion for the pending token flips the buffers; anything else
    /// is stale and leaves the stage untouched.
    pub fn complete(
        &mut self,
        token: LoadToken,
        result: Result<C, RenderError>,
    ) -> SwapOutcome {
        let pending = match &self.phase {
            Phase::Loading(pending) if pending.token == token => pending.clone(),
            _ => {
                tracing::debug!(token = token.value(), "discarding stale stage completion");
                return SwapOutcome::Stale { token };
            }
        };

        let StageLoad {
            slot, item, kind, ..
        } = pending;
        let (content, outcome) = match result {
            Ok(content) => (
                StageContent::Ready(content),
                SwapOutcome::Swapped {
                    slot,
                    item: item.id.clone(),
                },
            ),
            Err(error) => {
                tracing::warn!(item = %item.id, %error, "stage load failed, showing placeholder");
                (
                    StageContent::Placeholder {
                        title: item.title.clone(),
                        thumb: item.thumb.clone(),
                        error: error.clone(),
                    },
                    SwapOutcome::FellBack {
                        slot,
                        item: Arc::clone(&item),
                        error,
                    },
                )
            }
        };

        let buffer = &mut self.slots[slot.index()];
        buffer.content = Some(content);
        buffer.item = Some(item.id.clone());
        buffer.kind = Some(kind);

        self.active = slot;
        self.phase = Phase::Idle;
        tracing::debug!(token = token.value(), ?slot, item = %item.id, "stage swapped");
        outcome
    }

    /// The timeout scheduled for `token` elapsed.
    ///
    /// Returns `None` if that load already finished or was superseded.
    pub fn on_timeout(&mut self, token: LoadToken) -> Option<SwapOutcome> {
        match &self.phase {
            Phase::Loading(pending) if pending.token == token => Some(self.complete(
                token,
                Err(RenderError::Timeout {
                    secs: self.timeout.value(),
                }),
            )),
            _ => None,
        }
    }

    #[must_use]
    pub fn active(&self) -> Slot {
        self.active
    }

    #[must_use]
    pub fn slot(&self, slot: Slot) -> &BufferSlot<C> {
        &self.slots[slot.index()]
    }

    #[must_use]
    pub fn is_active(&self, slot: Slot) -> bool {
        self.active == slot
    }

    /// Item shown by the visible buffer.
    #[must_use]
    pub fn active_item(&self) -> Option<&ItemId> {
        self.slot(self.active).source_item()
    }

    #[must_use]
    pub fn active_content(&self) -> Option<&StageContent<C>> {
        self.slot(self.active).content()
    }

    #[must_use]
    pub fn pending(&self) -> Option<&StageLoad> {
        match &self.phase {
            Phase::Loading(pending) => Some(pending),
            Phase::Idle => None,
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending().is_some()
    }

    #[must_use]
    pub fn timeout(&self) -> RenderTimeout {
        self.timeout
    }

    /// How the view should draw `slot` right now.
    #[must_use]
    pub fn presentation(&self, slot: Slot) -> SlotPresentation {
        match &self.phase {
            Phase::Loading(pending)
                if pending.slot == slot && pending.kind == ContentKind::Rendered =>
            {
                let has_stale_content = !self.slot(slot).is_empty();
                SlotPresentation {
                    opacity: if has_stale_content { PENDING_OPACITY } else { 0.0 },
                    dimmed: has_stale_content,
                    raised: true,
                }
            }
            Phase::Loading(pending) if self.active == slot => SlotPresentation {
                raised: pending.kind != ContentKind::Rendered,
                ..SlotPresentation::VISIBLE
            },
            _ if self.active == slot => SlotPresentation::VISIBLE,
            _ => SlotPresentation::HIDDEN,
        }
    }

    /// Buffers in drawing order, bottom first.
    #[must_use]
    pub fn layers(&self) -> [Slot; 2] {
        if self.presentation(Slot::A).raised {
            [Slot::B, Slot::A]
        } else {
            [Slot::A, Slot::B]
        }
    }
}
