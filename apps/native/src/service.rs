use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use shelfcore_model::{
    AppMode, PageFuture, PageRequest, PageResponse, PageTransport, ShelfApp, TransportError,
};
use tracing::debug;

const FETCH_LATENCY: Duration = Duration::from_millis(120);
const IMPORT_LATENCY: Duration = Duration::from_millis(250);

const TAG_VOCABULARY: [&str; 6] = ["assistant", "automation", "billing", "docs", "ops", "support"];

// In-process stand-in for the catalog service so the browsing engine runs
// end to end. HTTP, signing and base URLs live behind the PageTransport
// seam, outside this crate. SHELFMINI_FLAKY=1 fails every fifth call to
// exercise the retry path by hand.
pub(crate) struct FixtureCatalog {
    records: Mutex<Vec<ShelfApp>>,
    calls: AtomicU64,
    flaky: bool,
}

impl FixtureCatalog {
    pub(crate) fn new() -> Self {
        Self {
            records: Mutex::new(seed_records()),
            calls: AtomicU64::new(0),
            flaky: std::env::var("SHELFMINI_FLAKY").ok().as_deref() == Some("1"),
        }
    }

    pub(crate) fn tag_vocabulary(&self) -> Vec<String> {
        TAG_VOCABULARY.iter().map(|tag| tag.to_string()).collect()
    }

    pub(crate) async fn import_bundle(&self, path: PathBuf) -> Result<String, TransportError> {
        tokio::time::sleep(IMPORT_LATENCY).await;

        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("imported app")
            .replace(['-', '_'], " ");

        let mut records = self
            .records
            .lock()
            .map_err(|_| TransportError::Unreachable("catalog lock poisoned".to_string()))?;
        let record = ShelfApp {
            id: format!("imported-{}", records.len()),
            name: name.clone(),
            mode: AppMode::Workflow,
            description: format!("Imported from {}", path.display()),
            tag_ids: vec!["automation".to_string()],
            created_by_me: true,
            updated_at_unix_ms: 0,
        };
        records.insert(0, record);

        Ok(name)
    }
}

impl PageTransport for FixtureCatalog {
    fn fetch_page(&self, request: PageRequest) -> PageFuture {
        if self.flaky && self.calls.fetch_add(1, Ordering::Relaxed) % 5 == 4 {
            return Box::pin(async move {
                tokio::time::sleep(FETCH_LATENCY).await;
                Err(TransportError::Unreachable("injected flake".to_string()))
            });
        }

        let matches: Result<Vec<ShelfApp>, TransportError> = self
            .records
            .lock()
            .map(|records| {
                records
                    .iter()
                    .filter(|record| record_matches(record, &request))
                    .cloned()
                    .collect()
            })
            .map_err(|_| TransportError::Unreachable("catalog lock poisoned".to_string()));

        Box::pin(async move {
            tokio::time::sleep(FETCH_LATENCY).await;
            let matches = matches?;

            let total = matches.len() as u64;
            let limit = request.limit.max(1) as usize;
            let start = request.page.saturating_sub(1) as usize * limit;
            let end = (start + limit).min(matches.len());
            let data = if start < matches.len() {
                matches[start..end].to_vec()
            } else {
                Vec::new()
            };

            debug!(
                page = request.page,
                total,
                returned = data.len(),
                "fixture page served"
            );
            Ok(PageResponse {
                data,
                total,
                has_more: end < matches.len(),
            })
        })
    }
}

fn record_matches(record: &ShelfApp, request: &PageRequest) -> bool {
    if let Some(mode) = request.mode {
        if record.mode != mode {
            return false;
        }
    }
    if request.is_created_by_me && !record.created_by_me {
        return false;
    }
    if let Some(tag_ids) = &request.tag_ids {
        let any_match = tag_ids
            .iter()
            .any(|tag| record.tag_ids.iter().any(|have| have == tag));
        if !any_match {
            return false;
        }
    }

    request.name.is_empty() || contains_ascii_case_insensitive(&record.name, &request.name)
}

fn contains_ascii_case_insensitive(haystack: &str, needle: &str) -> bool {
    let h = haystack.as_bytes();
    let n = needle.as_bytes();
    if n.is_empty() {
        return true;
    }
    if n.len() > h.len() {
        return false;
    }

    (0..=h.len() - n.len()).any(|start| {
        h[start..start + n.len()]
            .iter()
            .zip(n)
            .all(|(a, b)| a.eq_ignore_ascii_case(b))
    })
}

fn seed_records() -> Vec<ShelfApp> {
    const NOUNS: [&str; 12] = [
        "Invoice", "Ticket", "Roadmap", "Contract", "Meeting", "Release", "Onboarding", "Expense",
        "Incident", "Survey", "Catalog", "Handbook",
    ];
    const JOBS: [&str; 6] = [
        "Triage", "Summarizer", "Planner", "Assistant", "Review", "Digest",
    ];
    const MODES: [AppMode; 5] = [
        AppMode::Workflow,
        AppMode::AdvancedChat,
        AppMode::Chat,
        AppMode::AgentChat,
        AppMode::Completion,
    ];

    let mut records = Vec::with_capacity(NOUNS.len() * JOBS.len());
    for (i, noun) in NOUNS.iter().enumerate() {
        for (j, job) in JOBS.iter().enumerate() {
            let serial = i * JOBS.len() + j;
            let mode = MODES[serial % MODES.len()];
            let tags = vec![
                TAG_VOCABULARY[serial % TAG_VOCABULARY.len()].to_string(),
                TAG_VOCABULARY[(serial + 2) % TAG_VOCABULARY.len()].to_string(),
            ];

            records.push(ShelfApp {
                id: format!("fixture-{serial:03}"),
                name: format!("{noun} {job}"),
                mode,
                description: format!("{} helper for the {} team", job, tags[0]),
                tag_ids: tags,
                created_by_me: serial % 3 == 0,
                updated_at_unix_ms: 1_700_000_000_000 + serial as i64 * 86_400_000,
            });
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_match_ignores_case() {
        assert!(contains_ascii_case_insensitive("Invoice Triage", "triage"));
        assert!(!contains_ascii_case_insensitive("Invoice Triage", "digest"));
    }

    #[test]
    fn fixture_paginates_with_a_stable_total() {
        let request = |page| PageRequest {
            page,
            limit: 30,
            name: String::new(),
            is_created_by_me: false,
            mode: None,
            tag_ids: None,
        };

        let records = seed_records();
        let first: Vec<_> = records
            .iter()
            .filter(|record| record_matches(record, &request(1)))
            .collect();
        assert_eq!(first.len(), 72);
    }
}
