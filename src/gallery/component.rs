// SPDX-License-Identifier: MPL-2.0
//! Gallery component encapsulating state and update logic.
//!
//! The component owns the pagination tracker, the loading monitor, the
//! selection coordinator and the stage swapper, and wires them to the host
//! ports. Every asynchronous step (page fetch, image decode, document render,
//! delays) runs as an iced task whose result comes back as a [`Message`].

use crate::collection::Collection;
use crate::config::Config;
use crate::domain::{ContentKind, Direction, DisplayMode, GalleryItem, ItemId, Page, PageInfo};
use crate::error::{FetchError, RenderError};
use crate::host::Host;
use crate::media::StageMedia;
use crate::pagination::{
    sentinel, Check, EdgeThreshold, FetchRequest, LoadingMonitor, PaginationTracker,
    ScrollMetrics,
};
use crate::selection;
use crate::stage::{LoadToken, StageImageCache, StageLoad, StageSwapper, SwapOutcome};
use iced::widget::scrollable::RelativeOffset;
use iced::widget::{operation, Id};
use iced::{event, keyboard, window, Element, Size, Subscription, Task};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Identifier of the scrollable holding the item layouts.
pub const SCROLLABLE_ID: &str = "gallery-items";

/// Stage size assumed until the window reports its own.
const DEFAULT_STAGE_SIZE: Size = Size::new(1024.0, 768.0);

pub type Stage = StageSwapper<StageMedia>;

#[derive(Debug, Clone)]
pub enum Message {
    PageLoaded {
        page: usize,
        direction: Option<Direction>,
        result: Result<Page, FetchError>,
    },
    Scrolled(ScrollMetrics),
    ApproachingEdge(Direction),
    ReconcileTick,
    ItemClicked(Arc<GalleryItem>),
    ModeSelected(DisplayMode),
    Navigate(Direction),
    ToggleInfo,
    Selection(selection::Message),
    StageLoaded {
        token: LoadToken,
        item: ItemId,
        result: Result<StageMedia, RenderError>,
    },
    StageTimedOut(LoadToken),
    WindowResized(Size),
}

/// Notifications for the embedding application.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    /// A page fetch was issued.
    LoadMoreRequested(FetchRequest),
    /// The selected item changed.
    SelectionChanged(Arc<GalleryItem>),
    /// A page fetch failed; the edge will ask again on the next approach.
    PageFailed { page: usize, error: FetchError },
    /// The stage shows a placeholder because the item's content failed.
    StageFailed { item: ItemId, reason: RenderError },
}

#[derive(Debug)]
pub struct State {
    host: Host,
    tracker: PaginationTracker,
    monitor: LoadingMonitor,
    collection: Collection,
    selection: selection::State,
    stage: Stage,
    cache: StageImageCache,
    edge_threshold: EdgeThreshold,
    thumbnail_size: u32,
    stage_size: Size,
    scroll: ScrollMetrics,
}

impl State {
    /// Creates the gallery opened at `info.page` and starts fetching that page.
    pub fn new(config: &Config, host: Host, info: PageInfo) -> (Self, Task<Message>) {
        let mut state = Self {
            host,
            tracker: PaginationTracker::new(info),
            monitor: LoadingMonitor::new(config.reconcile_interval()),
            collection: Collection::new(),
            selection: selection::State::new(config.display_mode(), config.activation_debounce()),
            stage: StageSwapper::new(config.render_timeout()),
            cache: StageImageCache::new(config.cache_limits()),
            edge_threshold: config.edge_threshold(),
            thumbnail_size: config.thumbnail_size(),
            stage_size: DEFAULT_STAGE_SIZE,
            scroll: ScrollMetrics::default(),
        };

        let task = match state.tracker.loading_pages().first() {
            Some(&start) => {
                tracing::info!(page = start, total_pages = info.total_pages, "opening gallery");
                Task::batch([state.fetch(None, start), state.arm_monitor()])
            }
            None => Task::none(),
        };
        (state, task)
    }

    pub fn handle_message(&mut self, message: Message) -> (Effect, Task<Message>) {
        match message {
            Message::PageLoaded {
                page,
                direction,
                result,
            } => self.handle_page_loaded(page, direction, result),
            Message::Scrolled(metrics) => {
                self.scroll = metrics;
                let proximity = sentinel::detect(metrics, self.edge_threshold);
                match (proximity.end, proximity.start) {
                    (true, true) => {
                        let (effect, task) = self.approach(Direction::Forward);
                        let backward = Task::done(Message::ApproachingEdge(Direction::Backward));
                        (effect, Task::batch([task, backward]))
                    }
                    (true, false) => self.approach(Direction::Forward),
                    (false, true) => self.approach(Direction::Backward),
                    (false, false) => (Effect::None, Task::none()),
                }
            }
            Message::ApproachingEdge(direction) => self.approach(direction),
            Message::ReconcileTick => match self.monitor.check(&self.tracker) {
                Check::Rearm(delay) => (Effect::None, after(delay, Message::ReconcileTick)),
                Check::Settled | Check::Idle => (Effect::None, Task::none()),
            },
            Message::ItemClicked(item) => self.handle_selection(selection::Message::ItemClicked {
                item,
                at: Instant::now(),
            }),
            Message::ModeSelected(mode) => {
                let (effect, task) =
                    self.handle_selection(selection::Message::ModeSelected(mode));
                (effect, Task::batch([task, self.scroll_to_selection()]))
            }
            Message::Navigate(direction) => {
                let sibling = self.selection.selected_id().and_then(|id| match direction {
                    Direction::Forward => self.collection.next_after(id),
                    Direction::Backward => self.collection.previous_before(id),
                });
                let sibling = sibling.cloned();
                self.handle_selection(selection::Message::Step { direction, sibling })
            }
            Message::ToggleInfo => self.handle_selection(selection::Message::ToggleInfo),
            Message::Selection(message) => self.handle_selection(message),
            Message::StageLoaded {
                token,
                item,
                result,
            } => {
                let image = match &result {
                    Ok(StageMedia::Image(image)) => Some(image.clone()),
                    _ => None,
                };
                let outcome = self.stage.complete(token, result);
                if let (SwapOutcome::Swapped { .. }, Some(image)) = (&outcome, image) {
                    if !self.cache.contains(&item) {
                        self.cache.insert(item, image);
                    }
                }
                (stage_effect(outcome), Task::none())
            }
            Message::StageTimedOut(token) => {
                let effect = self
                    .stage
                    .on_timeout(token)
                    .map_or(Effect::None, stage_effect);
                (effect, Task::none())
            }
            Message::WindowResized(size) => {
                self.stage_size = size;
                (Effect::None, Task::none())
            }
        }
    }

    fn handle_page_loaded(
        &mut self,
        requested: usize,
        direction: Option<Direction>,
        result: Result<Page, FetchError>,
    ) -> (Effect, Task<Message>) {
        match result {
            Ok(page) => {
                self.collection.merge(&page, direction);
                self.tracker.update_info(page.info);
                self.tracker.on_page_delivered(page.index());
                if page.index() != requested {
                    tracing::warn!(
                        requested,
                        delivered = page.index(),
                        "host delivered a different page than requested"
                    );
                    let error = FetchError::Host(format!(
                        "requested page {requested}, received page {}",
                        page.index()
                    ));
                    self.tracker.on_fetch_failed(requested, &error);
                }
                (Effect::None, self.scroll_to_selection())
            }
            Err(error) => {
                if !self.tracker.on_fetch_failed(requested, &error) {
                    tracing::debug!(page = requested, %error, "ignoring failure for page not in flight");
                    return (Effect::None, Task::none());
                }
                (
                    Effect::PageFailed {
                        page: requested,
                        error,
                    },
                    Task::none(),
                )
            }
        }
    }

    /// A sentinel signalled proximity to an edge of the loaded window.
    fn approach(&mut self, direction: Direction) -> (Effect, Task<Message>) {
        let request = match direction {
            Direction::Forward => self.tracker.on_approaching_end(),
            Direction::Backward => self.tracker.on_approaching_start(),
        };
        let Some(request) = request else {
            return (Effect::None, Task::none());
        };

        let task = Task::batch([
            self.fetch(Some(request.direction), request.page),
            self.arm_monitor(),
        ]);
        (Effect::LoadMoreRequested(request), task)
    }

    fn handle_selection(&mut self, message: selection::Message) -> (Effect, Task<Message>) {
        match self.selection.handle(message) {
            selection::Effect::None => (Effect::None, Task::none()),
            selection::Effect::Selected {
                item,
                changed,
                stage,
            } => {
                let task = if stage {
                    self.begin_stage(Arc::clone(&item))
                } else {
                    Task::none()
                };
                let effect = if changed {
                    Effect::SelectionChanged(item)
                } else {
                    Effect::None
                };
                (effect, task)
            }
            selection::Effect::ScheduleActivation { activation, delay } => (
                Effect::None,
                after(
                    delay,
                    Message::Selection(selection::Message::ActivationElapsed(activation)),
                ),
            ),
            selection::Effect::Activate(item) => (Effect::None, self.begin_stage(item)),
            selection::Effect::EdgeReached(direction) => self.approach(direction),
        }
    }

    /// Starts a stage transition to `item` and its timeout.
    fn begin_stage(&mut self, item: Arc<GalleryItem>) -> Task<Message> {
        let Some(load) = self.stage.begin(item) else {
            return Task::none();
        };
        let timeout = after(
            self.stage.timeout().as_duration(),
            Message::StageTimedOut(load.token),
        );
        Task::batch([self.load_stage_content(&load), timeout])
    }

    fn load_stage_content(&mut self, load: &StageLoad) -> Task<Message> {
        let token = load.token;
        let id = load.item.id.clone();

        match load.kind {
            ContentKind::Image => {
                if let Some(image) = self.cache.get(&id) {
                    tracing::debug!(item = %id, "stage image cache hit");
                    return Task::done(Message::StageLoaded {
                        token,
                        item: id,
                        result: Ok(StageMedia::Image(image)),
                    });
                }
                Task::perform(self.host.images.load(&load.item), move |result| {
                    Message::StageLoaded {
                        token,
                        item: id.clone(),
                        result: result.map(StageMedia::Image),
                    }
                })
            }
            ContentKind::Rendered => {
                let future = self.host.renderer.render(
                    &load.item,
                    self.stage_size.width,
                    self.stage_size.height,
                );
                Task::perform(future, move |result| Message::StageLoaded {
                    token,
                    item: id.clone(),
                    result: result.map(StageMedia::Document),
                })
            }
        }
    }

    fn fetch(&self, direction: Option<Direction>, page: usize) -> Task<Message> {
        let future = self
            .host
            .pages
            .fetch_page(direction.unwrap_or(Direction::Forward), page);
        Task::perform(future, move |result| Message::PageLoaded {
            page,
            direction,
            result,
        })
    }

    fn arm_monitor(&mut self) -> Task<Message> {
        match self.monitor.arm() {
            Some(delay) => after(delay, Message::ReconcileTick),
            None => Task::none(),
        }
    }

    /// Scrolls the item layouts so the selection is in view.
    ///
    /// Suppressed once page loading has settled, and in slide mode.
    fn scroll_to_selection(&self) -> Task<Message> {
        if !self.monitor.allows_scroll_to_selection() || self.selection.mode().is_slide() {
            return Task::none();
        }
        let Some(y) = self
            .selection
            .selected_id()
            .and_then(|id| self.collection.relative_position(id))
        else {
            return Task::none();
        };
        operation::snap_to(Id::new(SCROLLABLE_ID), RelativeOffset { x: 0.0, y })
    }

    pub fn view(&self) -> Element<'_, Message> {
        super::view::gallery(self)
    }

    /// Window resizes and, in slide mode, arrow/escape keys.
    pub fn subscription(&self) -> Subscription<Message> {
        if self.selection.mode().is_slide() {
            event::listen_with(|event, status, _window| match (event, status) {
                (event::Event::Window(window::Event::Resized(size)), _) => {
                    Some(Message::WindowResized(size))
                }
                (
                    event::Event::Keyboard(keyboard::Event::KeyPressed { key, .. }),
                    event::Status::Ignored,
                ) => slide_key(&key),
                _ => None,
            })
        } else {
            event::listen_with(|event, _status, _window| match event {
                event::Event::Window(window::Event::Resized(size)) => {
                    Some(Message::WindowResized(size))
                }
                _ => None,
            })
        }
    }

    #[must_use]
    pub fn tracker(&self) -> &PaginationTracker {
        &self.tracker
    }

    #[must_use]
    pub fn monitor(&self) -> &LoadingMonitor {
        &self.monitor
    }

    #[must_use]
    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    #[must_use]
    pub fn selection(&self) -> &selection::State {
        &self.selection
    }

    #[must_use]
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    #[must_use]
    pub fn cache(&self) -> &StageImageCache {
        &self.cache
    }

    #[must_use]
    pub fn thumbnail_size(&self) -> u32 {
        self.thumbnail_size
    }

    #[must_use]
    pub fn scroll(&self) -> ScrollMetrics {
        self.scroll
    }
}

fn slide_key(key: &keyboard::Key) -> Option<Message> {
    use keyboard::key::Named;
    match key {
        keyboard::Key::Named(Named::ArrowRight | Named::ArrowDown | Named::PageDown) => {
            Some(Message::Navigate(Direction::Forward))
        }
        keyboard::Key::Named(Named::ArrowLeft | Named::ArrowUp | Named::PageUp) => {
            Some(Message::Navigate(Direction::Backward))
        }
        keyboard::Key::Named(Named::Escape) => {
            Some(Message::ModeSelected(DisplayMode::Thumbnails))
        }
        keyboard::Key::Character(c) if c.as_str() == "i" => Some(Message::ToggleInfo),
        _ => None,
    }
}

fn stage_effect(outcome: SwapOutcome) -> Effect {
    match outcome {
        SwapOutcome::FellBack { item, error, .. } => Effect::StageFailed {
            item: item.id.clone(),
            reason: error,
        },
        SwapOutcome::Swapped { .. } | SwapOutcome::Stale { .. } => Effect::None,
    }
}

/// Emits `message` once `delay` has elapsed.
fn after(delay: Duration, message: Message) -> Task<Message> {
    Task::perform(
        async move { tokio::time::sleep(delay).await },
        move |()| message.clone(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{ContentRenderer, ImageLoader, PageSource};
    use crate::media::{ImageData, RenderedDocument};
    use crate::stage::Slot;
    use futures_util::future::{self, BoxFuture, FutureExt};

    struct NoPages;

    impl PageSource for NoPages {
        fn fetch_page(
            &self,
            _direction: Direction,
            page: usize,
        ) -> BoxFuture<'static, Result<Page, FetchError>> {
            future::ready(Err(FetchError::OutOfRange {
                page,
                total_pages: 0,
            }))
            .boxed()
        }
    }

    struct BlankImages;

    impl ImageLoader for BlankImages {
        fn load(&self, _item: &GalleryItem) -> BoxFuture<'static, Result<ImageData, RenderError>> {
            future::ready(Ok(ImageData::from_rgba(1, 1, vec![0, 0, 0, 255]))).boxed()
        }
    }

    struct EmptyDocuments;

    impl ContentRenderer for EmptyDocuments {
        fn render(
            &self,
            _item: &GalleryItem,
            _width: f32,
            _height: f32,
        ) -> BoxFuture<'static, Result<RenderedDocument, RenderError>> {
            future::ready(Ok(RenderedDocument::default())).boxed()
        }
    }

    fn host() -> Host {
        Host::new(
            Arc::new(NoPages),
            Arc::new(BlankImages),
            Arc::new(EmptyDocuments),
        )
    }

    fn gallery(page: usize, total_pages: usize, mode: DisplayMode) -> State {
        let mut config = Config::default();
        config.gallery.display_mode = Some(mode);
        State::new(&config, host(), PageInfo::new(page, total_pages)).0
    }

    fn items(ids: &[&str]) -> Vec<Arc<GalleryItem>> {
        ids.iter()
            .map(|id| Arc::new(GalleryItem::new(*id, *id, format!("/m/{id}.png"))))
            .collect()
    }

    fn deliver(state: &mut State, page: usize, total: usize, direction: Option<Direction>, ids: &[&str]) {
        state.handle_message(Message::PageLoaded {
            page,
            direction,
            result: Ok(Page::new(PageInfo::new(page, total), items(ids))),
        });
    }

    fn scrolled_to_bottom() -> Message {
        Message::Scrolled(ScrollMetrics::new(4_500.0, 500.0, 5_000.0))
    }

    #[test]
    fn new_registers_start_page_and_arms_monitor() {
        let state = gallery(1, 3, DisplayMode::Thumbnails);
        assert_eq!(state.tracker().loading_pages(), vec![1]);
        assert!(state.monitor().is_loading());
    }

    #[test]
    fn scrolling_to_end_requests_next_page_once() {
        let mut state = gallery(1, 3, DisplayMode::Thumbnails);
        deliver(&mut state, 1, 3, None, &["a", "b"]);

        let (effect, _) = state.handle_message(scrolled_to_bottom());
        let Effect::LoadMoreRequested(request) = effect else {
            panic!("expected a fetch request, got {effect:?}");
        };
        assert_eq!(request.page, 2);
        assert_eq!(request.direction, Direction::Forward);

        let (effect, _) = state.handle_message(scrolled_to_bottom());
        assert_eq!(effect, Effect::None);

        deliver(&mut state, 2, 3, Some(Direction::Forward), &["c"]);
        assert_eq!(state.tracker().loaded_pages(), vec![1, 2]);
        assert_eq!(state.tracker().right_edge(), 2);
        assert_eq!(state.collection().len(), 3);
    }

    #[test]
    fn fetch_failure_is_reported_and_retried() {
        let mut state = gallery(0, 2, DisplayMode::List);
        deliver(&mut state, 0, 2, None, &["a"]);
        state.handle_message(scrolled_to_bottom());

        let (effect, _) = state.handle_message(Message::PageLoaded {
            page: 1,
            direction: Some(Direction::Forward),
            result: Err(FetchError::Host("offline".into())),
        });
        assert!(matches!(effect, Effect::PageFailed { page: 1, .. }));

        let (effect, _) = state.handle_message(scrolled_to_bottom());
        assert!(matches!(effect, Effect::LoadMoreRequested(FetchRequest { page: 1, .. })));
    }

    #[test]
    fn mismatched_delivery_releases_the_requested_page() {
        let mut state = gallery(0, 4, DisplayMode::List);
        deliver(&mut state, 0, 4, None, &["a"]);
        state.handle_message(scrolled_to_bottom());
        assert_eq!(state.tracker().loading_pages(), vec![1]);

        state.handle_message(Message::PageLoaded {
            page: 1,
            direction: Some(Direction::Forward),
            result: Ok(Page::new(PageInfo::new(2, 4), items(&["c"]))),
        });
        assert_eq!(state.tracker().outstanding(), 0);
        assert_eq!(state.tracker().failed_pages(), vec![1]);
        assert_eq!(state.tracker().in_flight(Direction::Forward), None);

        let (effect, _) = state.handle_message(scrolled_to_bottom());
        assert!(matches!(effect, Effect::LoadMoreRequested(FetchRequest { page: 3, .. })));

        deliver(&mut state, 3, 4, Some(Direction::Forward), &["d"]);
        state.handle_message(Message::ReconcileTick);
        assert!(state.monitor().loading_complete());
    }

    #[test]
    fn failure_for_page_not_in_flight_is_ignored() {
        let mut state = gallery(0, 2, DisplayMode::List);
        deliver(&mut state, 0, 2, None, &["a"]);

        let (effect, _) = state.handle_message(Message::PageLoaded {
            page: 1,
            direction: Some(Direction::Forward),
            result: Err(FetchError::Host("late".into())),
        });
        assert_eq!(effect, Effect::None);
        assert!(state.tracker().failed_pages().is_empty());
    }

    #[test]
    fn backward_pages_are_prepended() {
        let mut state = gallery(2, 4, DisplayMode::List);
        deliver(&mut state, 2, 4, None, &["e", "f"]);

        let (effect, _) =
            state.handle_message(Message::Scrolled(ScrollMetrics::new(0.0, 500.0, 5_000.0)));
        assert!(matches!(
            effect,
            Effect::LoadMoreRequested(FetchRequest {
                page: 1,
                direction: Direction::Backward,
                ..
            })
        ));
        deliver(&mut state, 1, 4, Some(Direction::Backward), &["c", "d"]);

        let first = state.collection().items().first().map(|i| i.id.as_str());
        assert_eq!(first, Some("c"));
        assert_eq!(state.tracker().left_edge(), 1);
    }

    #[test]
    fn click_reports_selection_change() {
        let mut state = gallery(0, 1, DisplayMode::Thumbnails);
        deliver(&mut state, 0, 1, None, &["a"]);
        let item = Arc::clone(&state.collection().items()[0]);

        let (effect, _) = state.handle_message(Message::ItemClicked(Arc::clone(&item)));
        assert_eq!(effect, Effect::SelectionChanged(item));
        assert!(!state.stage().is_pending());
    }

    #[test]
    fn click_in_slide_mode_begins_stage_transition() {
        let mut state = gallery(0, 1, DisplayMode::Slide);
        deliver(&mut state, 0, 1, None, &["a"]);
        let item = Arc::clone(&state.collection().items()[0]);

        state.handle_message(Message::ItemClicked(item));
        let pending = state.stage().pending().expect("stage load pending");
        assert_eq!(pending.kind, ContentKind::Image);

        let token = pending.token;
        state.handle_message(Message::StageLoaded {
            token,
            item: ItemId::new("a"),
            result: Ok(StageMedia::Image(ImageData::from_rgba(1, 1, vec![0; 4]))),
        });
        assert_eq!(state.stage().active_item(), Some(&ItemId::new("a")));
        assert_eq!(state.stage().active(), Slot::B);
        assert!(state.cache().contains(&ItemId::new("a")));
    }

    #[test]
    fn superseded_image_is_not_cached() {
        let mut state = gallery(0, 1, DisplayMode::Slide);
        deliver(&mut state, 0, 1, None, &["a", "b"]);
        let a = Arc::clone(&state.collection().items()[0]);
        let b = Arc::clone(&state.collection().items()[1]);

        state.handle_message(Message::ItemClicked(a));
        let stale = state.stage().pending().expect("pending a").token;
        state.handle_message(Message::ItemClicked(b));

        let (effect, _) = state.handle_message(Message::StageLoaded {
            token: stale,
            item: ItemId::new("a"),
            result: Ok(StageMedia::Image(ImageData::from_rgba(1, 1, vec![0; 4]))),
        });
        assert_eq!(effect, Effect::None);
        assert!(!state.cache().contains(&ItemId::new("a")));
        assert!(state.cache().is_empty());
    }

    #[test]
    fn stage_timeout_reports_failure() {
        let mut state = gallery(0, 1, DisplayMode::Slide);
        deliver(&mut state, 0, 1, None, &["a"]);
        let item = Arc::clone(&state.collection().items()[0]);
        state.handle_message(Message::ItemClicked(item));
        let token = state.stage().pending().expect("pending").token;

        let (effect, _) = state.handle_message(Message::StageTimedOut(token));
        assert!(matches!(
            effect,
            Effect::StageFailed { ref item, ref reason } if item.as_str() == "a" && reason.is_timeout()
        ));
        assert!(!state.stage().is_pending());
    }

    #[test]
    fn navigation_at_window_edge_requests_page() {
        let mut state = gallery(0, 2, DisplayMode::Slide);
        deliver(&mut state, 0, 2, None, &["a", "b"]);
        let last = Arc::clone(&state.collection().items()[1]);
        state.handle_message(Message::ItemClicked(last));

        let (effect, _) = state.handle_message(Message::Navigate(Direction::Forward));
        assert!(matches!(effect, Effect::LoadMoreRequested(FetchRequest { page: 1, .. })));

        let (effect, _) = state.handle_message(Message::Navigate(Direction::Backward));
        assert!(matches!(effect, Effect::SelectionChanged(ref item) if item.id.as_str() == "a"));
    }

    #[test]
    fn reconcile_tick_settles_after_delivery() {
        let mut state = gallery(0, 1, DisplayMode::List);
        state.handle_message(Message::ReconcileTick);
        assert!(state.monitor().is_loading());

        deliver(&mut state, 0, 1, None, &["a"]);
        state.handle_message(Message::ReconcileTick);
        assert!(!state.monitor().is_loading());
        assert!(state.monitor().loading_complete());
    }
}
