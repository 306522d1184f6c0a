use std::collections::HashMap;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::reviews::models::{RatingSummary, Review, ReviewInput, ReviewSort};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReviewError {
    #[error("Review not found")]
    NotFound,
    #[error("Only the author can delete this review")]
    NotAuthor,
    #[error("You cannot vote on your own review")]
    OwnReview,
}

impl From<ReviewError> for AppError {
    fn from(e: ReviewError) -> Self {
        match e {
            ReviewError::NotFound => AppError::NotFound(e.to_string()),
            ReviewError::NotAuthor => AppError::Forbidden,
            ReviewError::OwnReview => AppError::Validation(e.to_string()),
        }
    }
}

/// Prompt reviews, one per (prompt, user), with helpful/not-helpful votes.
#[derive(Debug, Default)]
pub struct ReviewStore {
    reviews: HashMap<Uuid, Review>,
    by_author: HashMap<(String, String), Uuid>,
    /// (review, voter) -> helpful?
    votes: HashMap<(Uuid, String), bool>,
}

impl ReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the user's review of a prompt, or updates the existing one.
    pub fn upsert_review(&mut self, input: ReviewInput, now: DateTime<Utc>) -> Review {
        let key = (input.prompt_id.clone(), input.user_id.clone());
        let content = input.content.trim().to_string();

        let existing = match self.by_author.get(&key) {
            Some(id) => self.reviews.get_mut(id),
            None => None,
        };
        if let Some(review) = existing {
            review.rating = input.rating;
            review.content = content;
            if input.user_name.is_some() {
                review.user_name = input.user_name;
            }
            review.updated_at = now;
            debug!("Updated review {} on {}", review.id, review.prompt_id);
            return review.clone();
        }

        let review = Review {
            id: Uuid::new_v4(),
            prompt_id: input.prompt_id,
            user_id: input.user_id,
            user_name: input.user_name,
            rating: input.rating,
            content,
            created_at: now,
            updated_at: now,
            helpful_count: 0,
            not_helpful_count: 0,
        };
        debug!("Created review {} on {}", review.id, review.prompt_id);
        self.by_author.insert(key, review.id);
        self.reviews.insert(review.id, review.clone());
        review
    }

    pub fn list_reviews(
        &self,
        prompt_id: &str,
        sort: ReviewSort,
        limit: usize,
        offset: usize,
    ) -> Vec<Review> {
        let mut reviews: Vec<_> = self
            .reviews
            .values()
            .filter(|r| r.prompt_id == prompt_id)
            .cloned()
            .collect();
        reviews.sort_by(|a, b| {
            let primary = match sort {
                ReviewSort::Newest => std::cmp::Ordering::Equal,
                ReviewSort::Helpful => b.helpful_count.cmp(&a.helpful_count),
                ReviewSort::RatingHigh => b.rating.cmp(&a.rating),
                ReviewSort::RatingLow => a.rating.cmp(&b.rating),
            };
            primary.then_with(|| b.created_at.cmp(&a.created_at))
        });
        reviews.into_iter().skip(offset).take(limit).collect()
    }

    pub fn summary(&self, prompt_id: &str) -> RatingSummary {
        let mut distribution = [0usize; 5];
        let mut total = 0usize;
        let mut sum = 0u64;
        for review in self.reviews.values().filter(|r| r.prompt_id == prompt_id) {
            if let Some(slot) = distribution.get_mut(usize::from(review.rating.saturating_sub(1))) {
                *slot += 1;
            }
            total += 1;
            sum += u64::from(review.rating);
        }
        let average_rating = if total == 0 {
            0.0
        } else {
            (sum as f64 / total as f64 * 10.0).round() / 10.0
        };
        RatingSummary {
            average_rating,
            total_reviews: total,
            distribution,
        }
    }

    pub fn delete_review(&mut self, review_id: Uuid, user_id: &str) -> Result<(), ReviewError> {
        let review = self.reviews.get(&review_id).ok_or(ReviewError::NotFound)?;
        if review.user_id != user_id {
            return Err(ReviewError::NotAuthor);
        }
        let key = (review.prompt_id.clone(), review.user_id.clone());
        self.by_author.remove(&key);
        self.reviews.remove(&review_id);
        self.votes.retain(|(id, _), _| *id != review_id);
        Ok(())
    }

    /// Records a helpful/not-helpful vote; a repeat vote replaces the last one.
    pub fn vote_review(
        &mut self,
        review_id: Uuid,
        user_id: &str,
        helpful: bool,
    ) -> Result<Review, ReviewError> {
        let review = self
            .reviews
            .get_mut(&review_id)
            .ok_or(ReviewError::NotFound)?;
        if review.user_id == user_id {
            return Err(ReviewError::OwnReview);
        }

        match self.votes.insert((review_id, user_id.to_string()), helpful) {
            Some(previous) if previous == helpful => {}
            Some(previous) => {
                adjust(review, previous, false);
                adjust(review, helpful, true);
            }
            None => adjust(review, helpful, true),
        }
        Ok(review.clone())
    }
}

fn adjust(review: &mut Review, helpful: bool, add: bool) {
    let counter = if helpful {
        &mut review.helpful_count
    } else {
        &mut review.not_helpful_count
    };
    *counter = if add {
        *counter + 1
    } else {
        counter.saturating_sub(1)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap()
    }

    fn input(prompt: &str, user: &str, rating: u8) -> ReviewInput {
        ReviewInput {
            prompt_id: prompt.to_string(),
            user_id: user.to_string(),
            user_name: None,
            rating,
            content: "Useful prompt".to_string(),
        }
    }

    #[test]
    fn test_resubmission_updates_in_place() {
        let mut store = ReviewStore::new();
        let first = store.upsert_review(input("p1", "u1", 3), t0());
        let second = store.upsert_review(input("p1", "u1", 5), t0() + Duration::hours(1));
        assert_eq!(first.id, second.id);
        assert_eq!(second.rating, 5);
        assert_eq!(second.created_at, t0());
        assert_eq!(store.list_reviews("p1", ReviewSort::Newest, 10, 0).len(), 1);
    }

    #[test]
    fn test_summary_average_and_distribution() {
        let mut store = ReviewStore::new();
        store.upsert_review(input("p1", "a", 5), t0());
        store.upsert_review(input("p1", "b", 4), t0());
        store.upsert_review(input("p1", "c", 4), t0());
        store.upsert_review(input("p2", "a", 1), t0());

        let summary = store.summary("p1");
        assert_eq!(summary.total_reviews, 3);
        assert_eq!(summary.average_rating, 4.3);
        assert_eq!(summary.distribution, [0, 0, 0, 2, 1]);
        assert_eq!(store.summary("none").average_rating, 0.0);
    }

    #[test]
    fn test_sorting_and_paging() {
        let mut store = ReviewStore::new();
        store.upsert_review(input("p1", "a", 2), t0());
        store.upsert_review(input("p1", "b", 5), t0() + Duration::minutes(1));
        store.upsert_review(input("p1", "c", 3), t0() + Duration::minutes(2));

        let newest = store.list_reviews("p1", ReviewSort::Newest, 10, 0);
        assert_eq!(newest[0].user_id, "c");
        let high = store.list_reviews("p1", ReviewSort::RatingHigh, 10, 0);
        assert_eq!(high[0].rating, 5);
        let low = store.list_reviews("p1", ReviewSort::RatingLow, 10, 0);
        assert_eq!(low[0].rating, 2);
        let page = store.list_reviews("p1", ReviewSort::Newest, 1, 1);
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].user_id, "b");
    }

    #[test]
    fn test_votes_switch_and_refuse_own_review() {
        let mut store = ReviewStore::new();
        let review = store.upsert_review(input("p1", "author", 4), t0());

        assert_eq!(
            store.vote_review(review.id, "author", true).unwrap_err(),
            ReviewError::OwnReview
        );

        let r = store.vote_review(review.id, "v", true).unwrap();
        assert_eq!((r.helpful_count, r.not_helpful_count), (1, 0));
        let r = store.vote_review(review.id, "v", true).unwrap();
        assert_eq!((r.helpful_count, r.not_helpful_count), (1, 0));
        let r = store.vote_review(review.id, "v", false).unwrap();
        assert_eq!((r.helpful_count, r.not_helpful_count), (0, 1));

        let sorted = store.list_reviews("p1", ReviewSort::Helpful, 10, 0);
        assert_eq!(sorted[0].not_helpful_count, 1);
    }

    #[test]
    fn test_only_author_can_delete() {
        let mut store = ReviewStore::new();
        let review = store.upsert_review(input("p1", "author", 4), t0());
        assert_eq!(store.delete_review(review.id, "other"), Err(ReviewError::NotAuthor));
        assert_eq!(store.delete_review(review.id, "author"), Ok(()));
        assert_eq!(store.delete_review(review.id, "author"), Err(ReviewError::NotFound));

        // The author may review the prompt again afterwards.
        let again = store.upsert_review(input("p1", "author", 2), t0());
        assert_ne!(again.id, review.id);
    }

    #[test]
    fn test_input_validation() {
        assert!(input("p1", "u", 0).validate().is_err());
        assert!(input("p1", "u", 6).validate().is_err());
        assert!(input("p1", "", 3).validate().is_err());
        let mut long = input("p1", "u", 3);
        long.content = "x".repeat(2001);
        assert!(long.validate().is_err());
        assert!(input("p1", "u", 5).validate().is_ok());
    }
}
