use iced::widget::{button, checkbox, column, container, row, scrollable, stack, text, text_input};
use iced::{Alignment, Color, Element, Fill, Length, Subscription, Theme};
use shelfcore_filter::ShelfTab;
use shelfcore_intake::DroppedFile;
use shelfcore_model::{AppMode, ShelfApp};

use crate::{App, Message, META_FONT_SIZE, NAME_FONT_SIZE, POLL_INTERVAL, STATUS_FONT_SIZE};

pub(crate) fn view(app: &App) -> Element<'_, Message> {
    let mut tabs = row![].spacing(6);
    for tab in ShelfTab::ORDER {
        let selected = app.filter.tab == tab;
        tabs = tabs.push(
            button(text(tab_title(tab)).size(STATUS_FONT_SIZE))
                .on_press(Message::TabSelected(tab))
                .style(if selected {
                    button::primary
                } else {
                    button::text
                })
                .padding([4, 10]),
        );
    }

    let mut search = row![text_input("Search apps...", app.keywords_line.draft())
        .on_input(Message::KeywordsEdited)
        .padding(8)
        .size(15)
        .width(Fill)]
    .spacing(8)
    .align_y(Alignment::Center);
    if !app.keywords_line.draft().is_empty() {
        search = search.push(
            button(text("clear").size(META_FONT_SIZE))
                .on_press(Message::KeywordsCleared)
                .style(button::text),
        );
    }
    search = search.push(
        checkbox(app.filter.created_by_me)
            .label("Created by me")
            .on_toggle(Message::MineToggled),
    );

    let draft_tags = app.tags_line.draft();
    let mut tag_row = row![text("Tags:").size(STATUS_FONT_SIZE)]
        .spacing(6)
        .align_y(Alignment::Center);
    for tag in &app.tag_vocabulary {
        let active = draft_tags.contains(tag);
        tag_row = tag_row.push(
            button(text(tag.as_str()).size(META_FONT_SIZE))
                .on_press(Message::TagToggled(tag.clone()))
                .style(if active {
                    button::primary
                } else {
                    button::secondary
                })
                .padding([2, 8]),
        );
    }
    if !draft_tags.is_empty() {
        tag_row = tag_row.push(
            button(text("clear tags").size(META_FONT_SIZE))
                .on_press(Message::TagsCleared)
                .style(button::text),
        );
    }

    let mut listed = column![];
    for record in app.coordinator.records() {
        listed = listed.push(shelf_row(record));
    }
    listed = listed.push(list_footer(app));

    let list = scrollable(listed)
        .id(app.list_scroll_id.clone())
        .on_scroll(Message::Scrolled)
        .height(Length::Fill)
        .width(Fill);

    let status = text(format!(
        "TAB: {} | RESULTS: {}/{} | {}",
        app.filter.tab.label(),
        app.coordinator.records().count(),
        app.coordinator.total().unwrap_or(0),
        app.last_action
    ))
    .size(STATUS_FONT_SIZE);

    let content = column![tabs, search, tag_row, status, list]
        .spacing(10)
        .padding(12);

    let mut surface: Element<'_, Message> = container(content).width(Fill).height(Length::Fill).into();

    if app.intake.is_dragging() {
        surface = stack![surface, drop_overlay()].into();
    }
    if let Some(file) = &app.pending_import {
        surface = stack![surface, import_modal(file)].into();
    }

    surface
}

fn shelf_row(record: &ShelfApp) -> Element<'_, Message> {
    container(
        row![
            text(record.mode.label())
                .color(mode_color(record.mode))
                .size(META_FONT_SIZE)
                .width(Length::Fixed(110.0)),
            column![
                text(record.name.as_str()).size(NAME_FONT_SIZE),
                text(record.description.as_str())
                    .color(Color::from_rgb8(145, 150, 160))
                    .size(META_FONT_SIZE),
            ]
            .spacing(2)
            .width(Length::FillPortion(5)),
            text(record.tag_ids.join(", "))
                .color(Color::from_rgb8(120, 140, 170))
                .size(META_FONT_SIZE)
                .width(Length::FillPortion(2)),
        ]
        .align_y(Alignment::Center)
        .spacing(10)
        .padding(6),
    )
    .width(Fill)
    .into()
}

fn list_footer(app: &App) -> Element<'_, Message> {
    if let Some(error) = app.coordinator.error() {
        return container(
            row![
                text(error.to_string())
                    .color(Color::from_rgb8(235, 72, 72))
                    .size(STATUS_FONT_SIZE),
                button(text("Retry").size(STATUS_FONT_SIZE))
                    .on_press(Message::RetryPage)
                    .padding([4, 12]),
            ]
            .spacing(10)
            .align_y(Alignment::Center),
        )
        .padding(10)
        .center_x(Fill)
        .into();
    }

    let caption = if app.coordinator.is_loading() {
        "Loading more..."
    } else if app.coordinator.pages().is_empty() {
        "No apps match the current filters"
    } else if app.coordinator.has_more() {
        // Sentinel row: scrolled into the margin, the trigger fires.
        ""
    } else {
        "End of shelf"
    };

    container(
        text(caption)
            .color(Color::from_rgb8(100, 105, 112))
            .size(STATUS_FONT_SIZE),
    )
    .id(app.sentinel_id.clone())
    .padding(10)
    .center_x(Fill)
    .into()
}

fn drop_overlay() -> Element<'static, Message> {
    container(
        column![
            text("Drop to create an app").size(30),
            text("One .yml or .yaml bundle, first file wins").size(STATUS_FONT_SIZE),
        ]
        .spacing(8)
        .align_x(Alignment::Center),
    )
    .width(Fill)
    .height(Length::Fill)
    .style(|_theme| container::Style {
        background: Some(Color::from_rgba8(30, 60, 110, 0.85).into()),
        ..container::Style::default()
    })
    .center_x(Fill)
    .center_y(Fill)
    .into()
}

fn import_modal(file: &DroppedFile) -> Element<'_, Message> {
    container(
        container(
            column![
                text("Create app from file").size(20),
                text(file.path.display().to_string()).size(STATUS_FONT_SIZE),
                row![
                    button(text("Import"))
                        .on_press(Message::ImportConfirmed)
                        .style(button::primary)
                        .padding([6, 12]),
                    button(text("Cancel"))
                        .on_press(Message::ImportCancelled)
                        .style(button::secondary)
                        .padding([6, 12]),
                ]
                .spacing(10),
            ]
            .spacing(12),
        )
        .padding(14)
        .width(Length::Fixed(520.0))
        .style(container::bordered_box),
    )
    .width(Fill)
    .height(Length::Fill)
    .style(|_theme| container::Style {
        background: Some(Color::from_rgba8(8, 10, 14, 0.65).into()),
        ..container::Style::default()
    })
    .center_x(Fill)
    .center_y(Fill)
    .into()
}

fn mode_color(mode: AppMode) -> Color {
    match mode {
        AppMode::Workflow => Color::from_rgb8(255, 153, 85),
        AppMode::AdvancedChat => Color::from_rgb8(99, 179, 237),
        AppMode::Chat => Color::from_rgb8(104, 211, 145),
        AppMode::AgentChat => Color::from_rgb8(180, 178, 255),
        AppMode::Completion => Color::from_rgb8(184, 184, 184),
    }
}

fn tab_title(tab: ShelfTab) -> &'static str {
    match tab {
        ShelfTab::All => "All",
        ShelfTab::Workflow => "Workflow",
        ShelfTab::AdvancedChat => "Advanced Chat",
        ShelfTab::Chat => "Chat",
        ShelfTab::AgentChat => "Agent Chat",
        ShelfTab::Completion => "Completion",
    }
}

pub(crate) fn theme(_app: &App) -> Theme {
    Theme::TokyoNight
}

pub(crate) fn subscription(_app: &App) -> Subscription<Message> {
    Subscription::batch(vec![
        iced::time::every(POLL_INTERVAL).map(|_| Message::Poll),
        iced::event::listen().map(Message::Platform),
    ])
}
