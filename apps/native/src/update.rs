use std::time::Instant;

use iced::widget::selector;
use iced::{window, Task};
use shelfcore_model::{PageRequest, PageTransport};
use shelfcore_pager::PageKey;
use shelfd::{Begin, Completion, FetchCoordinator};
use tracing::info;

use crate::{storage, App, Message, ScrollMetrics};

pub(crate) fn update(app: &mut App, message: Message) -> Task<Message> {
    match message {
        Message::KeywordsEdited(value) => {
            app.keywords_line.edit(value, Instant::now());
            Task::none()
        }
        Message::KeywordsCleared => {
            app.filter.keywords = app.keywords_line.commit_now(String::new());
            commit_filters(app)
        }
        Message::TagToggled(tag_id) => {
            let mut draft = app.tags_line.draft().clone();
            if !draft.remove(&tag_id) {
                draft.insert(tag_id);
            }
            app.tags_line.edit(draft, Instant::now());
            Task::none()
        }
        Message::TagsCleared => {
            app.filter.tag_ids = app.tags_line.commit_now(Default::default());
            commit_filters(app)
        }
        Message::TabSelected(tab) => {
            if app.filter.tab == tab {
                return Task::none();
            }
            app.filter.tab = tab;
            storage::persist_sticky_tab(tab);
            commit_filters(app)
        }
        Message::MineToggled(value) => {
            app.filter.created_by_me = value;
            commit_filters(app)
        }
        Message::Poll => poll(app),
        Message::SentinelSighted(bounds) => {
            if bounds.is_none() {
                return Task::none();
            }
            app.coordinator.note_sentinel();
            drive_fetch(app)
        }
        Message::Scrolled(viewport) => {
            app.last_scroll = Some(ScrollMetrics {
                content_height: viewport.content_bounds().height,
                offset_y: viewport.absolute_offset().y,
                viewport_height: viewport.bounds().height,
            });
            advance_if_near(app)
        }
        Message::PageResolved(key, result) => match app.coordinator.complete(key, result) {
            Completion::Stored { .. } => {
                app.last_action = format!(
                    "{} of {} apps loaded",
                    app.coordinator.records().count(),
                    app.coordinator.total().unwrap_or(0)
                );
                // The viewport may still be hungry after the new rows land.
                advance_if_near(app)
            }
            Completion::Retry(request) => perform_fetch(app, key, request),
            Completion::Failed(error) => {
                app.last_action = error.to_string();
                Task::none()
            }
            Completion::Stale => Task::none(),
        },
        Message::RetryPage => {
            if app.coordinator.retry_failed().is_some() {
                app.last_action = "Retrying...".to_string();
                drive_fetch(app)
            } else {
                Task::none()
            }
        }
        Message::Platform(event) => {
            platform_event(app, event);
            Task::none()
        }
        Message::ImportConfirmed => {
            let Some(file) = app.pending_import.take() else {
                return Task::none();
            };
            app.importing = true;
            app.last_action = format!("Importing {}", file.path.display());
            let catalog = app.catalog.clone();
            Task::perform(
                async move { catalog.import_bundle(file.path).await },
                Message::ImportFinished,
            )
        }
        Message::ImportCancelled => {
            app.pending_import = None;
            Task::none()
        }
        Message::ImportFinished(result) => {
            app.importing = false;
            match result {
                Ok(name) => {
                    info!(%name, "bundle imported");
                    app.last_action = format!("Imported \"{name}\"");
                    shelfd::raise_refresh();
                }
                Err(err) => app.last_action = format!("Import failed: {err}"),
            }
            Task::none()
        }
    }
}

/// Tick handler: commits due debounce lines, consumes the process-wide
/// refresh signal, and keeps the fetch pipeline moving.
fn poll(app: &mut App) -> Task<Message> {
    let now = Instant::now();
    let mut dirty = false;

    if let Some(keywords) = app.keywords_line.poll(now) {
        app.filter.keywords = keywords;
        dirty = true;
    }
    if let Some(tag_ids) = app.tags_line.poll(now) {
        app.filter.tag_ids = tag_ids;
        dirty = true;
    }
    if dirty {
        return commit_filters(app);
    }

    if shelfd::consume_refresh() {
        app.coordinator.force_refresh();
        app.last_action = "Shelf changed elsewhere, reloading".to_string();
        return drive_fetch(app);
    }

    let drive = drive_fetch(app);
    if !sentinel_watch_needed(&app.coordinator) {
        return drive;
    }

    // Scroll events cover the usual case, but content that fits the
    // viewport never produces one. The footer visibility query picks up
    // that gap, and window resizes with it.
    let sighting = selector::find(app.sentinel_id.clone())
        .map(|target| Message::SentinelSighted(target.and_then(|t| t.visible_bounds())));
    Task::batch(vec![drive, sighting])
}

/// Whether the poll tick still needs to look for the sentinel. Mirrors the
/// coordinator's advance gate so idle ticks skip the widget traversal.
fn sentinel_watch_needed(coordinator: &FetchCoordinator) -> bool {
    coordinator.has_more() && !coordinator.is_loading() && coordinator.error().is_none()
}

/// Persist the shareable form and let the coordinator observe the (maybe
/// changed) signature before anything renders against it.
fn commit_filters(app: &mut App) -> Task<Message> {
    storage::persist_shareable_filters(&app.filter);
    if app.coordinator.adopt(app.filter.signature()) {
        app.last_action = "Filters changed, reloading".to_string();
        drive_fetch(app)
    } else {
        Task::none()
    }
}

fn advance_if_near(app: &mut App) -> Task<Message> {
    let near = app
        .last_scroll
        .map(|metrics| {
            app.probe.near(
                metrics.content_height,
                metrics.offset_y,
                metrics.viewport_height,
            )
        })
        .unwrap_or(false);

    if near {
        app.coordinator.note_sentinel();
    }
    drive_fetch(app)
}

pub(crate) fn drive_fetch(app: &mut App) -> Task<Message> {
    let Some(index) = app.coordinator.next_wanted_index() else {
        return Task::none();
    };

    match app.coordinator.begin(index, &app.filter, Instant::now()) {
        Begin::Fetch(key, request) => perform_fetch(app, key, request),
        Begin::Cached | Begin::InFlight | Begin::Stop => Task::none(),
    }
}

fn perform_fetch(app: &App, key: PageKey, request: PageRequest) -> Task<Message> {
    let catalog = app.catalog.clone();
    Task::perform(async move { catalog.fetch_page(request).await }, move |result| {
        Message::PageResolved(key, result)
    })
}

fn platform_event(app: &mut App, event: iced::Event) {
    let iced::Event::Window(event) = event else {
        return;
    };

    match event {
        window::Event::FileHovered(_) => app.intake.on_hover(),
        window::Event::FilesHoveredLeft => app.intake.on_leave(),
        window::Event::FileDropped(path) => {
            if app.pending_import.is_some() || app.importing {
                // The creation workflow owns its lifecycle; a second drop
                // while it is open just cancels the gesture.
                app.intake.on_leave();
                return;
            }
            if let Some(file) = app.intake.on_drop(&[path]) {
                app.last_action = format!("Create app from {}", file.path.display());
                app.pending_import = Some(file);
            }
        }
        _ => {}
    }
}
