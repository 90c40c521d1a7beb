use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

use shelfcore_filter::{FilterSignature, FilterState};
use shelfcore_model::{PageRequest, PageResponse, ShelfApp, TransportError};
use shelfcore_pager::{derive_request, PageKey};
use tracing::{debug, trace, warn};

/// Total calls allowed per page key, first attempt included. Flat count,
/// no backoff; the transport owns timeout semantics.
pub const FETCH_ATTEMPT_LIMIT: u32 = 3;

/// Span during which a repeated `begin` for the same unresolved key attaches
/// to the earlier call instead of issuing a duplicate.
pub const DEDUPE_WINDOW: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("page {index} failed after {attempts} attempts: {message}")]
pub struct PageError {
    pub index: u32,
    pub attempts: u32,
    pub message: String,
}

/// Decision handed back from `begin`. The caller performs the actual
/// transport call for `Fetch` and routes the completion back in.
#[derive(Debug, Clone, PartialEq)]
pub enum Begin {
    /// Page already cached for the current signature; no network call.
    Cached,
    /// An identical call is unresolved (in flight, buffered for contiguity,
    /// or issued inside the dedupe window); attach to it.
    InFlight,
    /// Derivation halted: previous page said no more, or the signature has
    /// an unresolved error.
    Stop,
    Fetch(PageKey, PageRequest),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// Result stored; `pages_applied` counts cache entries that became
    /// contiguous (the completed page plus any drained stash entries).
    Stored { pages_applied: usize },
    /// Completion for a superseded signature or an unknown key. Not an
    /// error; dropped silently.
    Stale,
    /// Attempt failed but the budget allows another call for the same key.
    Retry(PageRequest),
    Failed(PageError),
}

#[derive(Debug)]
struct InFlightEntry {
    attempts: u32,
    request: PageRequest,
}

/// Client-side request/cache lifecycle for one filter signature at a time.
/// All mutation happens on the driving event loop; network completions come
/// back as messages, which is why superseded results are discarded here at
/// the decision point rather than aborted on the wire.
#[derive(Debug)]
pub struct FetchCoordinator {
    signature: FilterSignature,
    pages: Vec<PageResponse>,
    stash: BTreeMap<u32, PageResponse>,
    in_flight: HashMap<PageKey, InFlightEntry>,
    last_issue: HashMap<PageKey, Instant>,
    requested_pages: u32,
    error: Option<PageError>,
}

impl FetchCoordinator {
    pub fn new(signature: FilterSignature) -> Self {
        Self {
            signature,
            pages: Vec::new(),
            stash: BTreeMap::new(),
            in_flight: HashMap::new(),
            last_issue: HashMap::new(),
            requested_pages: 1,
            error: None,
        }
    }

    pub fn signature(&self) -> FilterSignature {
        self.signature
    }

    pub fn pages(&self) -> &[PageResponse] {
        &self.pages
    }

    pub fn records(&self) -> impl Iterator<Item = &ShelfApp> {
        self.pages.iter().flat_map(|page| page.data.iter())
    }

    pub fn total(&self) -> Option<u64> {
        self.pages.first().map(|page| page.total)
    }

    pub fn requested_pages(&self) -> u32 {
        self.requested_pages
    }

    pub fn is_loading(&self) -> bool {
        !self.in_flight.is_empty()
    }

    pub fn error(&self) -> Option<&PageError> {
        self.error.as_ref()
    }

    /// Last known page reported more data. False until page 0 resolves.
    pub fn has_more(&self) -> bool {
        self.pages.last().map(|page| page.has_more).unwrap_or(false)
    }

    /// Adopt a possibly changed filter signature. On change the cache,
    /// stash, in-flight set and error are discarded wholesale and the
    /// requested page count resets to 1 so page 0 gets revalidated.
    pub fn adopt(&mut self, signature: FilterSignature) -> bool {
        if signature == self.signature {
            return false;
        }

        debug!(
            from = self.signature.value(),
            to = signature.value(),
            "filter signature changed, cache discarded"
        );
        self.signature = signature;
        self.reset();
        true
    }

    /// Same wholesale discard without a signature change: the data is
    /// stale (import elsewhere, workflow success), not differently keyed.
    pub fn force_refresh(&mut self) {
        debug!(signature = self.signature.value(), "forced refresh");
        self.reset();
    }

    fn reset(&mut self) {
        self.pages.clear();
        self.stash.clear();
        self.in_flight.clear();
        self.last_issue.clear();
        self.requested_pages = 1;
        self.error = None;
    }

    /// Next cache index that is requested but not yet contiguous, if any.
    pub fn next_wanted_index(&self) -> Option<u32> {
        let next = self.pages.len() as u32;
        (next < self.requested_pages).then_some(next)
    }

    /// Sentinel came within the pre-arrival margin. Bumps the requested
    /// page count when nothing is in flight, the last page reported more
    /// data, and no unresolved error gates this signature.
    pub fn note_sentinel(&mut self) -> bool {
        if self.is_loading() || self.error.is_some() || !self.has_more() {
            return false;
        }
        if (self.pages.len() as u32) < self.requested_pages {
            return false;
        }

        self.requested_pages += 1;
        trace!(requested = self.requested_pages, "sentinel advanced paging");
        true
    }

    pub fn begin(&mut self, index: u32, filter: &FilterState, now: Instant) -> Begin {
        let key = PageKey::new(index, self.signature);

        if (index as usize) < self.pages.len() {
            return Begin::Cached;
        }
        if self.in_flight.contains_key(&key) || self.stash.contains_key(&index) {
            return Begin::InFlight;
        }
        if self.error.is_some() {
            return Begin::Stop;
        }
        if let Some(issued_at) = self.last_issue.get(&key) {
            if now.duration_since(*issued_at) < DEDUPE_WINDOW {
                return Begin::InFlight;
            }
        }

        let previous = index
            .checked_sub(1)
            .and_then(|prev| self.pages.get(prev as usize));
        let Some(request) = derive_request(index, previous, filter) else {
            return Begin::Stop;
        };

        self.in_flight.insert(
            key,
            InFlightEntry {
                attempts: 1,
                request: request.clone(),
            },
        );
        self.last_issue.insert(key, now);
        debug!(index, signature = self.signature.value(), "page fetch issued");
        Begin::Fetch(key, request)
    }

    /// Clear the terminal error and forget the failed key's issue record so
    /// an explicit retry affordance can re-run the fetch at once.
    pub fn retry_failed(&mut self) -> Option<u32> {
        let failed = self.error.take()?;
        let key = PageKey::new(failed.index, self.signature);
        self.last_issue.remove(&key);
        Some(failed.index)
    }

    pub fn complete(
        &mut self,
        key: PageKey,
        result: Result<PageResponse, TransportError>,
    ) -> Completion {
        if key.signature != self.signature {
            trace!(
                index = key.index,
                stale = key.signature.value(),
                "completion for superseded signature dropped"
            );
            return Completion::Stale;
        }

        let Some(entry) = self.in_flight.get_mut(&key) else {
            // A discard raced the completion (force_refresh between issue
            // and resolve). Same policy as a superseded signature.
            trace!(index = key.index, "completion for unknown key dropped");
            return Completion::Stale;
        };

        match result {
            Ok(page) => {
                self.in_flight.remove(&key);
                Completion::Stored {
                    pages_applied: self.apply(key.index, page),
                }
            }
            Err(err) => {
                if entry.attempts < FETCH_ATTEMPT_LIMIT {
                    entry.attempts += 1;
                    warn!(
                        index = key.index,
                        attempt = entry.attempts,
                        error = %err,
                        "page fetch failed, retrying"
                    );
                    return Completion::Retry(entry.request.clone());
                }

                let attempts = entry.attempts;
                self.in_flight.remove(&key);
                let error = PageError {
                    index: key.index,
                    attempts,
                    message: err.to_string(),
                };
                warn!(index = key.index, attempts, "page fetch gave up");
                self.error = Some(error.clone());
                Completion::Failed(error)
            }
        }
    }

    /// Store a resolved page, draining any stashed successors that become
    /// contiguous. Out-of-order completions wait in the stash; the cache
    /// itself never grows a gap. An occupied slot can never resolve here:
    /// `begin` serves it from cache without re-issuing, and revalidation
    /// always goes through a wholesale discard first.
    fn apply(&mut self, index: u32, page: PageResponse) -> usize {
        if index as usize != self.pages.len() {
            self.stash.insert(index, page);
            return 0;
        }

        self.pages.push(page);
        let mut applied = 1;
        while let Some(next) = self.stash.remove(&(self.pages.len() as u32)) {
            self.pages.push(next);
            applied += 1;
        }
        applied
    }
}
