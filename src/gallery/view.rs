// SPDX-License-Identifier: MPL-2.0
//! Gallery layouts: list, details, thumbnails and the slide stage.

use super::component::{Message, State, SCROLLABLE_ID};
use crate::domain::{Direction, DisplayMode, GalleryItem};
use crate::media::{BlockKind, RenderedDocument, StageMedia};
use crate::pagination::ScrollMetrics;
use crate::stage::{Slot, SlotPresentation, StageContent, PENDING_OPACITY};
use iced::widget::scrollable::Viewport;
use iced::widget::{
    button, container, image, mouse_area, Column, Container, Id, Row, Scrollable, Stack, Text,
};
use iced::{Background, Color, ContentFit, Element, Length, Theme};
use std::sync::Arc;

const INFO_PANEL_WIDTH: f32 = 280.0;
const LIST_ICON_SIZE: f32 = 24.0;

pub fn gallery(state: &State) -> Element<'_, Message> {
    let body = match state.selection().mode() {
        DisplayMode::Slide => slide(state),
        mode => items(state, mode),
    };

    Column::new()
        .push(toolbar(state))
        .push(body)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

fn toolbar(state: &State) -> Element<'_, Message> {
    let current = state.selection().mode();
    let mut bar = Row::new().spacing(4).padding(6);
    for mode in DisplayMode::ALL {
        let style = if mode == current {
            button::primary
        } else {
            button::secondary
        };
        bar = bar.push(
            button(Text::new(mode.to_string()))
                .on_press(Message::ModeSelected(mode))
                .style(style),
        );
    }

    let tracker = state.tracker();
    let status = if state.monitor().is_loading() {
        "Loading…".to_string()
    } else {
        format!(
            "{} items · pages {}–{} of {}",
            state.collection().len(),
            tracker.left_edge() + 1,
            tracker.right_edge() + 1,
            tracker.total_pages()
        )
    };
    bar = bar.push(Text::new(status).size(13));

    let failed = tracker.failed_pages();
    if !failed.is_empty() {
        let notice = format!("{} page(s) failed, scroll to retry", failed.len());
        bar = bar.push(Text::new(notice).size(13));
    }
    bar.into()
}

/// Scrollable item layouts with loading indicators at the edges in flight.
fn items(state: &State, mode: DisplayMode) -> Element<'_, Message> {
    let tracker = state.tracker();
    let mut content = Column::new().spacing(4).padding(8).width(Length::Fill);

    if tracker.in_flight(Direction::Backward).is_some() {
        content = content.push(Text::new("Loading earlier items…").size(13));
    }

    content = match mode {
        DisplayMode::Thumbnails => content.push(thumbnails(state)),
        DisplayMode::Details => state
            .collection()
            .items()
            .iter()
            .fold(content, |column, item| column.push(details_row(state, item))),
        DisplayMode::List | DisplayMode::Slide => state
            .collection()
            .items()
            .iter()
            .fold(content, |column, item| column.push(list_row(state, item))),
    };

    if tracker.in_flight(Direction::Forward).is_some() {
        content = content.push(Text::new("Loading more items…").size(13));
    }

    Scrollable::new(content)
        .id(Id::new(SCROLLABLE_ID))
        .width(Length::Fill)
        .height(Length::Fill)
        .on_scroll(|viewport: Viewport| {
            Message::Scrolled(ScrollMetrics::new(
                viewport.absolute_offset().y,
                viewport.bounds().height,
                viewport.content_bounds().height,
            ))
        })
        .into()
}

fn is_selected(state: &State, item: &GalleryItem) -> bool {
    state.selection().selected_id() == Some(&item.id)
}

fn item_button<'a>(
    state: &State,
    item: &Arc<GalleryItem>,
    content: impl Into<Element<'a, Message>>,
) -> Element<'a, Message> {
    let style = if is_selected(state, item) {
        button::primary
    } else {
        button::text
    };
    button(content)
        .on_press(Message::ItemClicked(Arc::clone(item)))
        .style(style)
        .width(Length::Fill)
        .into()
}

fn list_row<'a>(state: &State, item: &'a Arc<GalleryItem>) -> Element<'a, Message> {
    let row = Row::new()
        .spacing(8)
        .push(
            image(image::Handle::from_path(&item.tiny))
                .width(LIST_ICON_SIZE)
                .height(LIST_ICON_SIZE),
        )
        .push(Text::new(item.title.as_str()));
    item_button(state, item, row)
}

fn details_row<'a>(state: &State, item: &'a Arc<GalleryItem>) -> Element<'a, Message> {
    let modified = item
        .modified
        .map(|date| date.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();
    let size = item.size_bytes.map(format_size).unwrap_or_default();

    let row = Row::new()
        .spacing(16)
        .push(Text::new(item.title.as_str()).width(Length::FillPortion(3)))
        .push(Text::new(modified).width(Length::FillPortion(2)))
        .push(Text::new(size).width(Length::FillPortion(1)));
    item_button(state, item, row)
}

fn thumbnails(state: &State) -> Element<'_, Message> {
    #[allow(clippy::cast_precision_loss)]
    let edge = state.thumbnail_size() as f32;
    let tiles = state.collection().items().iter().map(|item| {
        let tile = Column::new()
            .spacing(4)
            .width(edge)
            .push(
                image(image::Handle::from_path(&item.thumb))
                    .width(edge)
                    .height(edge)
                    .content_fit(ContentFit::Cover),
            )
            .push(Text::new(item.title.as_str()).size(12));
        let tile = mouse_area(tile).on_press(Message::ItemClicked(Arc::clone(item)));
        let selected = is_selected(state, item);
        Container::new(tile)
            .padding(4)
            .style(move |theme: &Theme| highlight(theme, selected))
            .into()
    });

    Row::with_children(tiles).spacing(8).wrap().into()
}

fn highlight(theme: &Theme, selected: bool) -> container::Style {
    if selected {
        container::Style {
            background: Some(Background::Color(theme.extended_palette().primary.weak.color)),
            ..Default::default()
        }
    } else {
        container::Style::default()
    }
}

/// Stage with both buffers stacked in drawing order, plus the info panel.
fn slide(state: &State) -> Element<'_, Message> {
    let stage = state.stage();
    let layers = stage
        .layers()
        .into_iter()
        .filter_map(|slot| buffer_layer(state, slot));
    let stage_view = Stack::with_children(layers)
        .width(Length::Fill)
        .height(Length::Fill);

    let stage_area = mouse_area(
        Container::new(stage_view)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(|_theme: &Theme| container::Style {
                background: Some(Background::Color(Color::BLACK)),
                ..Default::default()
            }),
    )
    .on_press(Message::ToggleInfo);

    let mut row = Row::new().push(stage_area).height(Length::Fill);
    if state.selection().info_open() {
        row = row.push(info_panel(state));
    }
    row.into()
}

fn buffer_layer(state: &State, slot: Slot) -> Option<Element<'_, Message>> {
    let stage = state.stage();
    let presentation = stage.presentation(slot);
    if presentation.opacity <= 0.0 {
        return None;
    }
    let content = stage.slot(slot).content()?;

    let body: Element<'_, Message> = match content {
        StageContent::Ready(StageMedia::Image(data)) => image(data.handle.clone())
            .width(Length::Fill)
            .height(Length::Fill)
            .content_fit(ContentFit::Contain)
            .opacity(presentation.opacity)
            .into(),
        StageContent::Ready(StageMedia::Document(document)) => rendered_document(document),
        StageContent::Placeholder {
            title,
            thumb,
            error,
        } => Column::new()
            .spacing(8)
            .padding(24)
            .push(
                image(image::Handle::from_path(thumb))
                    .width(Length::Fill)
                    .height(Length::FillPortion(4))
                    .content_fit(ContentFit::Contain),
            )
            .push(Text::new(title.as_str()).size(18).color(Color::WHITE))
            .push(Text::new(error.to_string()).size(13).color(Color::WHITE))
            .into(),
    };

    Some(dimmed(body, presentation))
}

/// Overlays the pending treatment on a buffer's stale contents.
fn dimmed<'a>(body: Element<'a, Message>, presentation: SlotPresentation) -> Element<'a, Message> {
    if !presentation.dimmed {
        return body;
    }
    let veil = Container::new(Text::new("Loading…").color(Color::WHITE))
        .center(Length::Fill)
        .style(|_theme: &Theme| container::Style {
            background: Some(Background::Color(Color {
                a: 1.0 - PENDING_OPACITY,
                ..Color::BLACK
            })),
            ..Default::default()
        });
    Stack::new().push(body).push(veil).into()
}

fn rendered_document(document: &RenderedDocument) -> Element<'_, Message> {
    let mut column = Column::new().spacing(10).padding(32).max_width(900);
    if let Some(title) = &document.title {
        column = column.push(Text::new(title.as_str()).size(30).color(Color::WHITE));
    }
    for block in &document.blocks {
        let text = Text::new(block.text.as_str()).color(Color::WHITE);
        let text = match block.kind {
            BlockKind::Heading(level) => text.size(28.0 - 2.0 * f32::from(level)),
            BlockKind::ListItem => Text::new(format!("• {}", block.text)).color(Color::WHITE),
            BlockKind::Paragraph | BlockKind::Preformatted => text.size(16),
        };
        column = column.push(text);
    }
    Scrollable::new(Container::new(column).center_x(Length::Fill))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

fn info_panel(state: &State) -> Element<'_, Message> {
    let mut panel = Column::new().spacing(8).padding(12).width(INFO_PANEL_WIDTH);
    match state.selection().selected() {
        Some(item) => {
            panel = panel.push(Text::new(item.title.as_str()).size(18));
            if let Some(media_type) = item.primary_media_type() {
                panel = panel.push(Text::new(media_type).size(13));
            }
            if let Some(modified) = item.modified {
                panel = panel.push(
                    Text::new(modified.format("%Y-%m-%d %H:%M").to_string()).size(13),
                );
            }
            if let Some(size) = item.size_bytes {
                panel = panel.push(Text::new(format_size(size)).size(13));
            }
            panel = panel.push(Text::new(item.id.as_str()).size(11));
        }
        None => panel = panel.push(Text::new("Nothing selected")),
    }
    panel.into()
}

/// Human readable byte count.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}
