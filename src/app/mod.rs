// SPDX-License-Identifier: MPL-2.0
//! Desktop host: shows the media files of one directory in the gallery.
//!
//! The `App` owns the gallery component, supplies it with directory-backed
//! host ports and turns gallery effects into log lines and a status line.

pub mod flags;
pub mod fs_source;

pub use flags::{Flags, Parsed, USAGE};
pub use fs_source::{FileImageLoader, FsPageSource, HtmlRenderer};

use crate::config::{self, Config};
use crate::domain::PageInfo;
use crate::gallery::{self, Effect};
use crate::host::Host;
use iced::widget::{Column, Container, Text};
use iced::{window, Element, Length, Subscription, Task, Theme};
use std::fmt;
use std::sync::Arc;

pub const WINDOW_DEFAULT_WIDTH: f32 = 1100.0;
pub const WINDOW_DEFAULT_HEIGHT: f32 = 720.0;
pub const MIN_WINDOW_WIDTH: f32 = 480.0;
pub const MIN_WINDOW_HEIGHT: f32 = 360.0;

#[derive(Debug, Clone)]
pub enum Message {
    Gallery(gallery::Message),
}

pub struct App {
    gallery: gallery::State,
    flags: Flags,
    /// Last failure or config warning shown under the gallery.
    status: Option<String>,
    selected_title: Option<String>,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("directory", &self.flags.directory)
            .field("items", &self.gallery.collection().len())
            .field("status", &self.status)
            .finish()
    }
}

pub fn window_settings() -> window::Settings {
    window::Settings {
        size: iced::Size::new(WINDOW_DEFAULT_WIDTH, WINDOW_DEFAULT_HEIGHT),
        min_size: Some(iced::Size::new(MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT)),
        ..window::Settings::default()
    }
}

/// Entry point used by `main.rs` to launch the iced application loop.
pub fn run(flags: Flags) -> iced::Result {
    use std::cell::RefCell;

    // iced requires a `Fn` boot function; flags are consumed on the first call.
    let boot_state = RefCell::new(Some(flags));
    let boot = move || {
        let flags = boot_state.borrow_mut().take().unwrap_or_default();
        App::new(flags)
    };

    iced::application(boot, App::update, App::view)
        .title(App::title)
        .theme(App::theme)
        .window(window_settings())
        .subscription(App::subscription)
        .run()
}

impl App {
    /// Loads the settings file and opens the gallery on `flags.directory`.
    fn new(flags: Flags) -> (Self, Task<Message>) {
        let (config, warning) = config::load();
        let (mut app, task) = Self::with_config(flags, config);
        if let Some(warning) = warning {
            tracing::warn!(%warning, "using default settings");
            app.status.get_or_insert(warning);
        }
        (app, task)
    }

    /// Opens the gallery with explicit settings.
    pub fn with_config(flags: Flags, mut config: Config) -> (Self, Task<Message>) {
        if let Some(page_size) = flags.page_size {
            config.gallery.page_size = Some(page_size);
        }

        let source = FsPageSource::new(flags.directory.clone(), config.page_size());
        let (info, status) = match source.page_info(flags.start_page) {
            Ok(info) => (info, None),
            Err(error) => {
                tracing::error!(directory = %flags.directory.display(), %error, "cannot open directory");
                (PageInfo::new(0, 0), Some(error.to_string()))
            }
        };

        let host = Host::new(
            Arc::new(source),
            Arc::new(FileImageLoader),
            Arc::new(HtmlRenderer),
        );
        let (gallery, task) = gallery::State::new(&config, host, info);

        let app = Self {
            gallery,
            flags,
            status,
            selected_title: None,
        };
        (app, task.map(Message::Gallery))
    }

    fn title(&self) -> String {
        let directory = self
            .flags
            .directory
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.flags.directory.display().to_string());
        match &self.selected_title {
            Some(title) => format!("{title} - {directory} - Iced Gallery"),
            None => format!("{directory} - Iced Gallery"),
        }
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn subscription(&self) -> Subscription<Message> {
        self.gallery.subscription().map(Message::Gallery)
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Gallery(message) => {
                let (effect, task) = self.gallery.handle_message(message);
                self.handle_effect(effect);
                task.map(Message::Gallery)
            }
        }
    }

    fn handle_effect(&mut self, effect: Effect) {
        match effect {
            Effect::None => {}
            Effect::LoadMoreRequested(request) => {
                tracing::info!(
                    page = request.page,
                    direction = ?request.direction,
                    total_pages = request.snapshot.total_pages,
                    "loading more items"
                );
            }
            Effect::SelectionChanged(item) => {
                tracing::info!(item = %item.id, "selected");
                self.selected_title = Some(item.title.clone());
                self.status = None;
            }
            Effect::PageFailed { page, error } => {
                self.status = Some(format!("Page {} could not be loaded: {error}", page + 1));
            }
            Effect::StageFailed { item, reason } => {
                tracing::warn!(%item, %reason, "showing placeholder");
                self.status = Some(format!("{item}: {reason}"));
            }
        }
    }

    fn view(&self) -> Element<'_, Message> {
        let mut column = Column::new()
            .push(self.gallery.view().map(Message::Gallery))
            .width(Length::Fill)
            .height(Length::Fill);
        if let Some(status) = &self.status {
            column = column.push(Container::new(Text::new(status.as_str()).size(13)).padding(6));
        }
        column.into()
    }

    #[must_use]
    pub fn gallery(&self) -> &gallery::State {
        &self.gallery
    }

    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}
