use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MAX_REVIEW_CONTENT: usize = 2000;
pub const DEFAULT_REVIEW_LIMIT: usize = 10;
pub const MAX_REVIEW_LIMIT: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub prompt_id: String,
    pub user_id: String,
    pub user_name: Option<String>,
    pub rating: u8,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub helpful_count: u32,
    pub not_helpful_count: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewInput {
    pub prompt_id: String,
    pub user_id: String,
    #[serde(default)]
    pub user_name: Option<String>,
    pub rating: u8,
    #[serde(default)]
    pub content: String,
}

impl ReviewInput {
    pub fn validate(&self) -> Result<(), String> {
        if self.user_id.trim().is_empty() {
            return Err("userId is required".to_string());
        }
        if !(1..=5).contains(&self.rating) {
            return Err("rating must be between 1 and 5".to_string());
        }
        if self.content.trim().chars().count() > MAX_REVIEW_CONTENT {
            return Err(format!(
                "content must be at most {MAX_REVIEW_CONTENT} characters"
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReviewSort {
    #[default]
    Newest,
    Helpful,
    RatingHigh,
    RatingLow,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    pub average_rating: f64,
    pub total_reviews: usize,
    /// Counts for ratings 1 through 5, in that order.
    pub distribution: [usize; 5],
}
