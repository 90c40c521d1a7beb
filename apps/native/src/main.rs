mod service;
mod storage;
mod ui;
mod update;

use std::collections::BTreeSet;
use std::env;
use std::sync::Arc;
use std::time::Duration;

use iced::widget::{self, scrollable};
use iced::{window, Rectangle, Size};
use shelfcore_filter::{decode_shareable, DebounceLine, FilterState, ShelfTab};
use shelfcore_intake::{DragIntake, DroppedFile};
use shelfcore_model::{PageResponse, TransportError};
use shelfcore_pager::PageKey;
use shelfd::{FetchCoordinator, SentinelProbe};
use tracing_subscriber::EnvFilter;

use service::FixtureCatalog;
use ui::{subscription, theme, view};
use update::{drive_fetch, update};

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const FILTER_DEBOUNCE_DELAY: Duration = Duration::from_millis(500);
const NAME_FONT_SIZE: u32 = 15;
const META_FONT_SIZE: u32 = 12;
const STATUS_FONT_SIZE: u32 = 13;

fn main() -> iced::Result {
    init_tracing();

    iced::application(
        || {
            let mut app = App::default();
            let warm_up = drive_fetch(&mut app);
            (app, warm_up)
        },
        update,
        view,
    )
    .title("Shelfmini")
    .theme(theme)
    .window(native_window_settings())
    .subscription(subscription)
    .run()
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("SHELFMINI_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn native_window_settings() -> window::Settings {
    window::Settings {
        size: Size::new(960.0, 680.0),
        min_size: Some(Size::new(640.0, 480.0)),
        ..window::Settings::default()
    }
}

fn read_only_from_args() -> bool {
    env::args().any(|arg| arg == "--read-only")
}

fn startup_filters_override_from_args() -> Option<FilterState> {
    for arg in env::args() {
        let Some(value) = arg.strip_prefix("--filters=") else {
            continue;
        };
        return Some(decode_shareable(value));
    }

    None
}

#[derive(Debug, Clone)]
enum Message {
    TabSelected(ShelfTab),
    MineToggled(bool),
    KeywordsEdited(String),
    KeywordsCleared,
    TagToggled(String),
    TagsCleared,
    Poll,
    Scrolled(scrollable::Viewport),
    SentinelSighted(Option<Rectangle>),
    PageResolved(PageKey, Result<PageResponse, TransportError>),
    RetryPage,
    Platform(iced::Event),
    ImportConfirmed,
    ImportCancelled,
    ImportFinished(Result<String, TransportError>),
}

#[derive(Debug, Clone, Copy)]
struct ScrollMetrics {
    content_height: f32,
    offset_y: f32,
    viewport_height: f32,
}

struct App {
    filter: FilterState,
    keywords_line: DebounceLine<String>,
    tags_line: DebounceLine<BTreeSet<String>>,
    coordinator: FetchCoordinator,
    probe: SentinelProbe,
    last_scroll: Option<ScrollMetrics>,
    catalog: Arc<FixtureCatalog>,
    tag_vocabulary: Vec<String>,
    intake: DragIntake,
    pending_import: Option<DroppedFile>,
    importing: bool,
    last_action: String,
    list_scroll_id: widget::Id,
    sentinel_id: widget::Id,
}

impl Default for App {
    fn default() -> Self {
        let read_only = read_only_from_args();
        let mut filter = startup_filters_override_from_args()
            .or_else(storage::load_shareable_filters)
            .unwrap_or_default();

        // Tab stickiness beats the link-encoded default, first load only.
        if let Some(tab) = storage::load_sticky_tab() {
            filter.tab = tab;
        }

        let catalog = Arc::new(FixtureCatalog::new());

        Self {
            coordinator: FetchCoordinator::new(filter.signature()),
            keywords_line: DebounceLine::new(filter.keywords.clone(), FILTER_DEBOUNCE_DELAY),
            tags_line: DebounceLine::new(filter.tag_ids.clone(), FILTER_DEBOUNCE_DELAY),
            probe: SentinelProbe::default(),
            last_scroll: None,
            tag_vocabulary: catalog.tag_vocabulary(),
            catalog,
            intake: DragIntake::new(!read_only),
            pending_import: None,
            importing: false,
            last_action: "Loading shelf...".to_string(),
            list_scroll_id: widget::Id::new("shelf-scroll"),
            sentinel_id: widget::Id::new("shelf-sentinel"),
            filter,
        }
    }
}
