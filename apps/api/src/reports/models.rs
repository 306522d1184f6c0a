use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MAX_REPORT_DETAILS: usize = 1000;
pub const DEFAULT_REPORT_LIMIT: usize = 50;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Prompt,
    Review,
    Bundle,
    Collection,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReportReason {
    Spam,
    Offensive,
    Copyright,
    Misleading,
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pending,
    Reviewed,
    Actioned,
    Dismissed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: Uuid,
    pub content_type: ContentType,
    pub content_id: String,
    pub content_title: Option<String>,
    pub reason: ReportReason,
    pub details: Option<String>,
    pub reporter_id: Option<String>,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub reviewed_by: Option<String>,
    pub action_note: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportInput {
    pub content_type: ContentType,
    pub content_id: String,
    #[serde(default)]
    pub content_title: Option<String>,
    pub reason: ReportReason,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub reporter_id: Option<String>,
}

impl ReportInput {
    pub fn validate(&self) -> Result<(), String> {
        if self.content_id.trim().is_empty() {
            return Err("contentId is required".to_string());
        }
        let details = self.details.as_deref().map(str::trim).unwrap_or_default();
        if details.chars().count() > MAX_REPORT_DETAILS {
            return Err(format!(
                "details must be at most {MAX_REPORT_DETAILS} characters"
            ));
        }
        if self.reason == ReportReason::Other && details.is_empty() {
            return Err("details are required when the reason is 'other'".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDecision {
    pub status: ReportStatus,
    pub reviewed_by: String,
    #[serde(default)]
    pub action_note: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    pub status: Option<ReportStatus>,
    pub content_type: Option<ContentType>,
    pub limit: usize,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub pending: usize,
    pub reviewed: usize,
    pub actioned: usize,
    pub dismissed: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQueue {
    pub reports: Vec<Report>,
    pub counts: StatusCounts,
}
