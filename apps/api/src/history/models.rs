use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Prompt,
    Bundle,
    Workflow,
    Collection,
    Search,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewHistoryEntry {
    pub id: Uuid,
    pub user_id: String,
    pub resource_type: ResourceType,
    pub resource_id: Option<String>,
    pub search_query: Option<String>,
    pub source: Option<String>,
    pub viewed_at: DateTime<Utc>,
    /// Seconds spent on the resource, as reported by the client.
    pub duration: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordViewInput {
    pub user_id: String,
    pub resource_type: ResourceType,
    #[serde(default)]
    pub resource_id: Option<String>,
    #[serde(default)]
    pub search_query: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    /// RFC 3339. Anything unparseable falls back to the current time.
    #[serde(default)]
    pub viewed_at: Option<String>,
    #[serde(default)]
    pub duration: Option<u64>,
}

impl RecordViewInput {
    pub fn validate(&self) -> Result<(), String> {
        if self.user_id.trim().is_empty() {
            return Err("userId is required".to_string());
        }
        match self.resource_type {
            ResourceType::Search => {
                if self
                    .search_query
                    .as_deref()
                    .map_or(true, |q| q.trim().is_empty())
                {
                    return Err("searchQuery is required for search views".to_string());
                }
            }
            _ => {
                if self
                    .resource_id
                    .as_deref()
                    .map_or(true, |id| id.trim().is_empty())
                {
                    return Err("resourceId is required".to_string());
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct HistoryQuery {
    pub user_id: String,
    pub resource_type: Option<ResourceType>,
    pub limit: usize,
}

pub const DEFAULT_HISTORY_LIMIT: usize = 20;
pub const MAX_HISTORY_LIMIT: usize = 100;

/// Dedupe window and retention applied by the history store.
#[derive(Debug, Clone, Copy)]
pub struct HistoryPolicy {
    pub dedupe_window: Duration,
    pub retention: Duration,
}

impl Default for HistoryPolicy {
    fn default() -> Self {
        Self {
            dedupe_window: Duration::minutes(5),
            retention: Duration::days(30),
        }
    }
}
