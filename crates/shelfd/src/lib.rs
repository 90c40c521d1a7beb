mod coordinator;
mod refresh;
mod trigger;

pub use coordinator::{
    Begin, Completion, FetchCoordinator, PageError, DEDUPE_WINDOW, FETCH_ATTEMPT_LIMIT,
};
pub use refresh::{consume as consume_refresh, raise as raise_refresh};
pub use trigger::{SentinelProbe, SENTINEL_MARGIN};
