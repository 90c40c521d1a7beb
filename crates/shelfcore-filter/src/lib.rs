mod debounce;
mod shareable;

use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use shelfcore_model::AppMode;

pub use debounce::DebounceLine;
pub use shareable::{decode_shareable, encode_shareable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShelfTab {
    All,
    Workflow,
    AdvancedChat,
    Chat,
    AgentChat,
    Completion,
}

impl ShelfTab {
    pub const ORDER: [ShelfTab; 6] = [
        Self::All,
        Self::Workflow,
        Self::AdvancedChat,
        Self::Chat,
        Self::AgentChat,
        Self::Completion,
    ];

    /// The wire mode filter; `All` means no mode filter at all.
    pub fn mode(self) -> Option<AppMode> {
        match self {
            Self::All => None,
            Self::Workflow => Some(AppMode::Workflow),
            Self::AdvancedChat => Some(AppMode::AdvancedChat),
            Self::Chat => Some(AppMode::Chat),
            Self::AgentChat => Some(AppMode::AgentChat),
            Self::Completion => Some(AppMode::Completion),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "all",
            other => other.mode().map(AppMode::label).unwrap_or("all"),
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        if value == "all" {
            return Some(Self::All);
        }
        AppMode::from_label(value).map(|mode| match mode {
            AppMode::Workflow => Self::Workflow,
            AppMode::AdvancedChat => Self::AdvancedChat,
            AppMode::Chat => Self::Chat,
            AppMode::AgentChat => Self::AgentChat,
            AppMode::Completion => Self::Completion,
        })
    }
}

/// The four filter dimensions the whole engine keys on. Tag ids live in a
/// `BTreeSet`, so selection order can never leak into the signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub tab: ShelfTab,
    pub created_by_me: bool,
    pub tag_ids: BTreeSet<String>,
    pub keywords: String,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            tab: ShelfTab::All,
            created_by_me: false,
            tag_ids: BTreeSet::new(),
            keywords: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FilterSignature(u64);

impl FilterSignature {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl FilterState {
    /// Identity of the cached page run. Any dimension change changes it.
    pub fn signature(&self) -> FilterSignature {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        self.tab.label().hash(&mut hasher);
        self.created_by_me.hash(&mut hasher);
        for id in &self.tag_ids {
            id.hash(&mut hasher);
        }
        self.keywords.hash(&mut hasher);
        FilterSignature(hasher.finish())
    }

    pub fn with_tab(mut self, tab: ShelfTab) -> Self {
        self.tab = tab;
        self
    }

    pub fn toggle_tag(&mut self, tag_id: &str) {
        if !self.tag_ids.remove(tag_id) {
            self.tag_ids.insert(tag_id.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_order_never_changes_the_signature() {
        let mut first = FilterState::default();
        first.toggle_tag("ops");
        first.toggle_tag("billing");

        let mut second = FilterState::default();
        second.toggle_tag("billing");
        second.toggle_tag("ops");

        assert_eq!(first.signature(), second.signature());
    }

    #[test]
    fn every_dimension_feeds_the_signature() {
        let base = FilterState::default();
        let tab = base.clone().with_tab(ShelfTab::Workflow);
        let mine = FilterState {
            created_by_me: true,
            ..base.clone()
        };
        let keyed = FilterState {
            keywords: "bots".to_string(),
            ..base.clone()
        };
        let mut tagged = base.clone();
        tagged.toggle_tag("ops");

        for changed in [&tab, &mine, &keyed, &tagged] {
            assert_ne!(base.signature(), changed.signature());
        }
    }

    #[test]
    fn tab_labels_round_trip() {
        for tab in ShelfTab::ORDER {
            assert_eq!(ShelfTab::from_label(tab.label()), Some(tab));
        }
        assert_eq!(ShelfTab::from_label("garbage"), None);
    }
}
