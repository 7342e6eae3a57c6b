// SPDX-License-Identifier: MPL-2.0
//! Selection and layout coordinator.
//!
//! Maps clicks, display mode changes and next/previous keys onto the selected
//! item and the display mode. It never touches the stage or the tracker
//! directly; the gallery component turns the returned [`Effect`]s into stage
//! transitions and page fetches.
//!
//! Stage transitions are only ever requested in slide mode. Switching into
//! slide mode does not start one immediately: a short debounce elapses first
//! and only the latest scheduled activation is honored.

use crate::config::DOUBLE_CLICK_THRESHOLD_MS;
use crate::domain::{Direction, DisplayMode, GalleryItem, ItemId};
use std::sync::Arc;
use std::time::{Duration, Instant};

const DOUBLE_CLICK_THRESHOLD: Duration = Duration::from_millis(DOUBLE_CLICK_THRESHOLD_MS);

/// Click multiplicity on a single item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickKind {
    Single,
    Double,
}

/// Generation of a scheduled slide activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Activation(u64);

#[derive(Debug, Clone)]
pub struct State {
    selected: Option<Arc<GalleryItem>>,
    mode: DisplayMode,
    info_open: bool,
    last_click: Option<(ItemId, Instant)>,
    activation: Activation,
    debounce: Duration,
}

impl Default for State {
    fn default() -> Self {
        Self::new(DisplayMode::default(), Duration::ZERO)
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    ItemClicked {
        item: Arc<GalleryItem>,
        at: Instant,
    },
    ModeSelected(DisplayMode),
    /// A scheduled slide activation elapsed.
    ActivationElapsed(Activation),
    /// Next/previous key. `sibling` is the neighbour in the loaded window,
    /// `None` at its edge.
    Step {
        direction: Direction,
        sibling: Option<Arc<GalleryItem>>,
    },
    ToggleInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    /// An item was selected. `stage` asks for a stage transition to it.
    Selected {
        item: Arc<GalleryItem>,
        changed: bool,
        stage: bool,
    },
    /// Schedule `activation` to elapse after `delay`.
    ScheduleActivation {
        activation: Activation,
        delay: Duration,
    },
    /// A debounced slide activation fired for the current selection.
    Activate(Arc<GalleryItem>),
    /// Navigation hit the edge of the loaded window.
    EdgeReached(Direction),
}

impl State {
    #[must_use]
    pub fn new(mode: DisplayMode, debounce: Duration) -> Self {
        Self {
            selected: None,
            mode,
            info_open: false,
            last_click: None,
            activation: Activation::default(),
            debounce,
        }
    }

    pub fn handle(&mut self, msg: Message) -> Effect {
        match msg {
            Message::ItemClicked { item, at } => self.handle_click(item, at),
            Message::ModeSelected(mode) => self.set_mode(mode),
            Message::ActivationElapsed(activation) => {
                if activation != self.activation || !self.mode.is_slide() {
                    return Effect::None;
                }
                match &self.selected {
                    Some(item) => Effect::Activate(Arc::clone(item)),
                    None => Effect::None,
                }
            }
            Message::Step { direction, sibling } => {
                if !self.mode.is_slide() || self.selected.is_none() {
                    return Effect::None;
                }
                match sibling {
                    Some(item) => self.select(item, true),
                    None => Effect::EdgeReached(direction),
                }
            }
            Message::ToggleInfo => {
                self.info_open = !self.info_open;
                Effect::None
            }
        }
    }

    fn handle_click(&mut self, item: Arc<GalleryItem>, at: Instant) -> Effect {
        match self.click_kind(&item.id, at) {
            ClickKind::Single => {
                self.info_open = true;
                let stage = self.mode.is_slide();
                self.select(item, stage)
            }
            ClickKind::Double => {
                if !self.mode.is_slide() {
                    tracing::debug!(item = %item.id, "double click, entering slide mode");
                    self.mode = DisplayMode::Slide;
                    // The transition starts now; drop any pending activation.
                    self.invalidate_activation();
                }
                self.select(item, true)
            }
        }
    }

    /// Classifies a click and records it for the next one.
    fn click_kind(&mut self, id: &ItemId, at: Instant) -> ClickKind {
        let double = self.last_click.as_ref().is_some_and(|(last_id, last_at)| {
            last_id == id && at.saturating_duration_since(*last_at) <= DOUBLE_CLICK_THRESHOLD
        });
        if double {
            self.last_click = None;
            ClickKind::Double
        } else {
            self.last_click = Some((id.clone(), at));
            ClickKind::Single
        }
    }

    fn select(&mut self, item: Arc<GalleryItem>, stage: bool) -> Effect {
        let changed = self.selected.as_ref().map(|s| &s.id) != Some(&item.id);
        if changed {
            tracing::debug!(item = %item.id, "selection changed");
        }
        self.selected = Some(Arc::clone(&item));
        Effect::Selected {
            item,
            changed,
            stage,
        }
    }

    fn set_mode(&mut self, mode: DisplayMode) -> Effect {
        if mode == self.mode {
            return Effect::None;
        }
        tracing::debug!(from = %self.mode, to = %mode, "display mode changed");
        self.mode = mode;
        self.invalidate_activation();

        if mode.is_slide() && self.selected.is_some() {
            Effect::ScheduleActivation {
                activation: self.activation,
                delay: self.debounce,
            }
        } else {
            Effect::None
        }
    }

    fn invalidate_activation(&mut self) {
        self.activation = Activation(self.activation.0.wrapping_add(1));
    }

    #[must_use]
    pub fn selected(&self) -> Option<&Arc<GalleryItem>> {
        self.selected.as_ref()
    }

    #[must_use]
    pub fn selected_id(&self) -> Option<&ItemId> {
        self.selected.as_ref().map(|item| &item.id)
    }

    #[must_use]
    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    #[must_use]
    pub fn info_open(&self) -> bool {
        self.info_open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEBOUNCE: Duration = Duration::from_millis(100);

    fn item(id: &str) -> Arc<GalleryItem> {
        Arc::new(GalleryItem::new(id, id, format!("/m/{id}.png")))
    }

    fn click(state: &mut State, item: &Arc<GalleryItem>, at: Instant) -> Effect {
        state.handle(Message::ItemClicked {
            item: Arc::clone(item),
            at,
        })
    }

    #[test]
    fn single_click_selects_and_opens_info() {
        let mut state = State::new(DisplayMode::Thumbnails, DEBOUNCE);
        let a = item("a");
        let effect = click(&mut state, &a, Instant::now());

        assert_eq!(
            effect,
            Effect::Selected {
                item: Arc::clone(&a),
                changed: true,
                stage: false
            }
        );
        assert!(state.info_open());
        assert_eq!(state.mode(), DisplayMode::Thumbnails);
    }

    #[test]
    fn single_click_in_slide_mode_requests_stage() {
        let mut state = State::new(DisplayMode::Slide, DEBOUNCE);
        let effect = click(&mut state, &item("a"), Instant::now());
        assert!(matches!(effect, Effect::Selected { stage: true, .. }));
    }

    #[test]
    fn double_click_enters_slide_mode() {
        let mut state = State::new(DisplayMode::List, DEBOUNCE);
        let a = item("a");
        let start = Instant::now();
        click(&mut state, &a, start);
        let effect = click(&mut state, &a, start + Duration::from_millis(200));

        assert!(matches!(
            effect,
            Effect::Selected {
                changed: false,
                stage: true,
                ..
            }
        ));
        assert_eq!(state.mode(), DisplayMode::Slide);
    }

    #[test]
    fn slow_second_click_is_single() {
        let mut state = State::new(DisplayMode::List, DEBOUNCE);
        let a = item("a");
        let start = Instant::now();
        click(&mut state, &a, start);
        click(&mut state, &a, start + Duration::from_millis(800));
        assert_eq!(state.mode(), DisplayMode::List);
    }

    #[test]
    fn quick_clicks_on_different_items_are_single() {
        let mut state = State::new(DisplayMode::List, DEBOUNCE);
        let start = Instant::now();
        click(&mut state, &item("a"), start);
        click(&mut state, &item("b"), start + Duration::from_millis(50));
        assert_eq!(state.mode(), DisplayMode::List);
        assert_eq!(state.selected_id(), Some(&ItemId::new("b")));
    }

    #[test]
    fn triple_click_does_not_count_twice() {
        let mut state = State::new(DisplayMode::List, DEBOUNCE);
        let a = item("a");
        let start = Instant::now();
        click(&mut state, &a, start);
        click(&mut state, &a, start + Duration::from_millis(100));
        state.handle(Message::ModeSelected(DisplayMode::List));
        let third = click(&mut state, &a, start + Duration::from_millis(200));

        assert!(matches!(third, Effect::Selected { stage: false, .. }));
        assert_eq!(state.mode(), DisplayMode::List);
    }

    #[test]
    fn entering_slide_mode_schedules_debounced_activation() {
        let mut state = State::new(DisplayMode::Thumbnails, DEBOUNCE);
        click(&mut state, &item("a"), Instant::now());

        let Effect::ScheduleActivation { activation, delay } =
            state.handle(Message::ModeSelected(DisplayMode::Slide))
        else {
            panic!("expected scheduled activation");
        };
        assert_eq!(delay, DEBOUNCE);

        let fired = state.handle(Message::ActivationElapsed(activation));
        assert!(matches!(fired, Effect::Activate(ref i) if i.id.as_str() == "a"));
    }

    #[test]
    fn leaving_slide_mode_cancels_pending_activation() {
        let mut state = State::new(DisplayMode::Thumbnails, DEBOUNCE);
        click(&mut state, &item("a"), Instant::now());
        let Effect::ScheduleActivation { activation, .. } =
            state.handle(Message::ModeSelected(DisplayMode::Slide))
        else {
            panic!("expected scheduled activation");
        };
        state.handle(Message::ModeSelected(DisplayMode::List));

        assert_eq!(state.handle(Message::ActivationElapsed(activation)), Effect::None);
    }

    #[test]
    fn only_latest_activation_fires() {
        let mut state = State::new(DisplayMode::Thumbnails, DEBOUNCE);
        click(&mut state, &item("a"), Instant::now());
        let Effect::ScheduleActivation { activation: old, .. } =
            state.handle(Message::ModeSelected(DisplayMode::Slide))
        else {
            panic!("expected scheduled activation");
        };
        state.handle(Message::ModeSelected(DisplayMode::Details));
        let Effect::ScheduleActivation { activation: new, .. } =
            state.handle(Message::ModeSelected(DisplayMode::Slide))
        else {
            panic!("expected scheduled activation");
        };

        assert_eq!(state.handle(Message::ActivationElapsed(old)), Effect::None);
        assert!(matches!(
            state.handle(Message::ActivationElapsed(new)),
            Effect::Activate(_)
        ));
    }

    #[test]
    fn slide_mode_without_selection_schedules_nothing() {
        let mut state = State::new(DisplayMode::List, DEBOUNCE);
        assert_eq!(state.handle(Message::ModeSelected(DisplayMode::Slide)), Effect::None);
    }

    #[test]
    fn mode_switch_keeps_selection() {
        let mut state = State::new(DisplayMode::List, DEBOUNCE);
        click(&mut state, &item("a"), Instant::now());
        for mode in DisplayMode::ALL {
            state.handle(Message::ModeSelected(mode));
            assert_eq!(state.selected_id(), Some(&ItemId::new("a")));
        }
    }

    #[test]
    fn step_selects_sibling_or_reports_edge() {
        let mut state = State::new(DisplayMode::Slide, DEBOUNCE);
        click(&mut state, &item("a"), Instant::now());

        let effect = state.handle(Message::Step {
            direction: Direction::Forward,
            sibling: Some(item("b")),
        });
        assert!(matches!(effect, Effect::Selected { stage: true, changed: true, .. }));

        let effect = state.handle(Message::Step {
            direction: Direction::Forward,
            sibling: None,
        });
        assert_eq!(effect, Effect::EdgeReached(Direction::Forward));
    }

    #[test]
    fn step_without_selection_is_ignored() {
        let mut state = State::new(DisplayMode::Slide, DEBOUNCE);
        let effect = state.handle(Message::Step {
            direction: Direction::Forward,
            sibling: None,
        });
        assert_eq!(effect, Effect::None);
    }

    #[test]
    fn step_outside_slide_mode_is_ignored() {
        let mut state = State::new(DisplayMode::Thumbnails, DEBOUNCE);
        let effect = state.handle(Message::Step {
            direction: Direction::Backward,
            sibling: Some(item("b")),
        });
        assert_eq!(effect, Effect::None);
        assert!(state.selected().is_none());
    }
}
