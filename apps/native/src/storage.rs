use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use shelfcore_filter::{decode_shareable, encode_shareable, FilterState, ShelfTab};
use tracing::warn;

// Sticky tab lives apart from the shareable filter line: a shared link
// carries no tab, the local short-term store does.
#[derive(Serialize, Deserialize)]
struct StickyTab {
    tab: ShelfTab,
}

pub(crate) fn load_sticky_tab() -> Option<ShelfTab> {
    let content = read_state_file("tab.json").ok()?;
    serde_json::from_str::<StickyTab>(&content)
        .ok()
        .map(|sticky| sticky.tab)
}

pub(crate) fn persist_sticky_tab(tab: ShelfTab) {
    let Ok(encoded) = serde_json::to_string(&StickyTab { tab }) else {
        return;
    };
    if let Err(err) = write_state_file("tab.json", &encoded) {
        warn!(error = %err, "failed to persist sticky tab");
    }
}

pub(crate) fn load_shareable_filters() -> Option<FilterState> {
    let content = read_state_file("filters.txt").ok()?;
    Some(decode_shareable(content.trim()))
}

pub(crate) fn persist_shareable_filters(filter: &FilterState) {
    if let Err(err) = write_state_file("filters.txt", &encode_shareable(filter)) {
        warn!(error = %err, "failed to persist filters");
    }
}

fn read_state_file(name: &str) -> Result<String> {
    let path = state_dir().join(name);
    std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))
}

fn write_state_file(name: &str, content: &str) -> Result<()> {
    let dir = state_dir();
    std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
    let path = dir.join(name);
    std::fs::write(&path, content).with_context(|| format!("writing {}", path.display()))
}

fn state_dir() -> PathBuf {
    if let Ok(base) = env::var("SHELFMINI_STATE_DIR") {
        return PathBuf::from(base);
    }

    let base = env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(base)
        .join(".local")
        .join("state")
        .join("shelfmini")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sticky_tab_round_trips_as_tab_json() {
        let dir = std::env::temp_dir().join(format!("shelfmini-sticky-{}", std::process::id()));
        env::set_var("SHELFMINI_STATE_DIR", &dir);

        persist_sticky_tab(ShelfTab::AgentChat);
        assert!(dir.join("tab.json").exists());
        assert_eq!(load_sticky_tab(), Some(ShelfTab::AgentChat));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
