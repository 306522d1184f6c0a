use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FeatureStatus {
    UnderReview,
    Planned,
    InProgress,
    Shipped,
    Declined,
}

impl FeatureStatus {
    pub const ALL: [FeatureStatus; 5] = [
        FeatureStatus::UnderReview,
        FeatureStatus::Planned,
        FeatureStatus::InProgress,
        FeatureStatus::Shipped,
        FeatureStatus::Declined,
    ];
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureRequest {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub use_case: Option<String>,
    pub status: FeatureStatus,
    pub vote_count: u32,
    pub comment_count: u32,
    pub submitted_by: Option<String>,
    pub submitted_by_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub shipped_at: Option<DateTime<Utc>>,
    pub status_note: Option<String>,
    pub planned_quarter: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureVote {
    pub feature_id: Uuid,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureComment {
    pub id: Uuid,
    pub feature_id: Uuid,
    pub user_id: String,
    pub user_name: Option<String>,
    pub content: String,
    pub is_official: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFeatureInput {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub use_case: Option<String>,
    #[serde(default)]
    pub submitted_by: Option<String>,
    #[serde(default)]
    pub submitted_by_name: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl SubmitFeatureInput {
    pub fn validate(&self) -> Result<(), String> {
        let title = self.title.trim().chars().count();
        if !(3..=120).contains(&title) {
            return Err("title must be between 3 and 120 characters".to_string());
        }
        let description = self.description.trim().chars().count();
        if !(10..=2000).contains(&description) {
            return Err("description must be between 10 and 2000 characters".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCommentInput {
    pub user_id: String,
    #[serde(default)]
    pub user_name: Option<String>,
    pub content: String,
    /// Only honored on the admin path; the public handler forces `false`.
    #[serde(default)]
    pub is_official: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub status: FeatureStatus,
    #[serde(default)]
    pub status_note: Option<String>,
    #[serde(default)]
    pub planned_quarter: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FeatureSort {
    #[default]
    Votes,
    Newest,
}

/// All features partitioned into the five status buckets.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapByStatus {
    pub under_review: Vec<FeatureRequest>,
    pub planned: Vec<FeatureRequest>,
    pub in_progress: Vec<FeatureRequest>,
    pub shipped: Vec<FeatureRequest>,
    pub declined: Vec<FeatureRequest>,
}

impl RoadmapByStatus {
    pub fn bucket_mut(&mut self, status: FeatureStatus) -> &mut Vec<FeatureRequest> {
        match status {
            FeatureStatus::UnderReview => &mut self.under_review,
            FeatureStatus::Planned => &mut self.planned,
            FeatureStatus::InProgress => &mut self.in_progress,
            FeatureStatus::Shipped => &mut self.shipped,
            FeatureStatus::Declined => &mut self.declined,
        }
    }
}
