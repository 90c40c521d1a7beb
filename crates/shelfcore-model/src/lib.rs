use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

pub type AppId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppMode {
    Workflow,
    AdvancedChat,
    Chat,
    AgentChat,
    Completion,
}

impl AppMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Workflow => "workflow",
            Self::AdvancedChat => "advanced-chat",
            Self::Chat => "chat",
            Self::AgentChat => "agent-chat",
            Self::Completion => "completion",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match value {
            "workflow" => Some(Self::Workflow),
            "advanced-chat" => Some(Self::AdvancedChat),
            "chat" => Some(Self::Chat),
            "agent-chat" => Some(Self::AgentChat),
            "completion" => Some(Self::Completion),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShelfApp {
    pub id: AppId,
    pub name: String,
    pub mode: AppMode,
    pub description: String,
    pub tag_ids: Vec<String>,
    pub created_by_me: bool,
    pub updated_at_unix_ms: i64,
}

/// One page request as it goes over the wire. `page` is 1-indexed; `mode`
/// and `tag_ids` are omitted entirely when absent, `name` is always sent
/// and an empty string means "no keyword filter".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
    pub name: String,
    pub is_created_by_me: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<AppMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_ids: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse {
    pub data: Vec<ShelfApp>,
    pub total: u64,
    pub has_more: bool,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    #[error("catalog unreachable: {0}")]
    Unreachable(String),
    #[error("malformed page payload: {0}")]
    Malformed(String),
}

pub type PageFuture = Pin<Box<dyn Future<Output = Result<PageResponse, TransportError>> + Send>>;

/// Seam to whatever actually serves pages. Signing, base URLs and timeouts
/// live behind this trait, not in front of it.
pub trait PageTransport: Send + Sync {
    fn fetch_page(&self, request: PageRequest) -> PageFuture;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_labels_round_trip() {
        for mode in [
            AppMode::Workflow,
            AppMode::AdvancedChat,
            AppMode::Chat,
            AppMode::AgentChat,
            AppMode::Completion,
        ] {
            assert_eq!(AppMode::from_label(mode.label()), Some(mode));
        }
        assert_eq!(AppMode::from_label("all"), None);
    }

    #[test]
    fn empty_optional_fields_stay_off_the_wire() {
        let request = PageRequest {
            page: 1,
            limit: 30,
            name: String::new(),
            is_created_by_me: false,
            mode: None,
            tag_ids: None,
        };

        let encoded = serde_json::to_string(&request).unwrap();
        assert!(!encoded.contains("mode"));
        assert!(!encoded.contains("tag_ids"));
        assert!(encoded.contains("\"name\":\"\""));
    }

    #[test]
    fn mode_serializes_kebab_case() {
        let encoded = serde_json::to_string(&AppMode::AgentChat).unwrap();
        assert_eq!(encoded, "\"agent-chat\"");
    }
}
