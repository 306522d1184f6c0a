use std::collections::HashMap;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::roadmap::models::{
    AddCommentInput, FeatureComment, FeatureRequest, FeatureSort, FeatureStatus, FeatureVote,
    RoadmapByStatus, StatusUpdate, SubmitFeatureInput,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VoteError {
    #[error("Feature not found")]
    FeatureNotFound,
    #[error("You have already voted for this feature")]
    AlreadyVoted,
    #[error("You have not voted for this feature")]
    NotVoted,
}

/// Feature requests, their votes and comments.
///
/// `vote_count` is kept as a counter next to the vote records. Seeded
/// features carry historical counts with no records behind them.
#[derive(Debug, Default)]
pub struct RoadmapStore {
    features: HashMap<Uuid, FeatureRequest>,
    votes: HashMap<(Uuid, String), FeatureVote>,
    comments: HashMap<Uuid, Vec<FeatureComment>>,
}

impl RoadmapStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_features(features: Vec<FeatureRequest>) -> Self {
        let mut store = Self::new();
        for feature in features {
            store.features.insert(feature.id, feature);
        }
        store
    }

    pub fn submit_feature(&mut self, input: SubmitFeatureInput, now: DateTime<Utc>) -> FeatureRequest {
        let feature = FeatureRequest {
            id: Uuid::new_v4(),
            title: input.title.trim().to_string(),
            description: input.description.trim().to_string(),
            use_case: input.use_case.filter(|u| !u.trim().is_empty()),
            status: FeatureStatus::UnderReview,
            vote_count: 1,
            comment_count: 0,
            submitted_by: input.submitted_by,
            submitted_by_name: input.submitted_by_name,
            created_at: now,
            updated_at: now,
            shipped_at: None,
            status_note: None,
            planned_quarter: None,
            tags: input.tags,
        };

        if let Some(user_id) = &feature.submitted_by {
            self.votes.insert(
                (feature.id, user_id.clone()),
                FeatureVote {
                    feature_id: feature.id,
                    user_id: user_id.clone(),
                    created_at: now,
                },
            );
        }

        info!("Feature request {} submitted: {}", feature.id, feature.title);
        self.features.insert(feature.id, feature.clone());
        feature
    }

    pub fn get_feature(&self, id: Uuid) -> Option<&FeatureRequest> {
        self.features.get(&id)
    }

    pub fn list_features(&self, status: Option<FeatureStatus>, sort: FeatureSort) -> Vec<FeatureRequest> {
        let mut features: Vec<_> = self
            .features
            .values()
            .filter(|f| status.map_or(true, |s| f.status == s))
            .cloned()
            .collect();
        match sort {
            FeatureSort::Votes => sort_by_votes(&mut features),
            FeatureSort::Newest => features.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        }
        features
    }

    pub fn vote_for_feature(
        &mut self,
        feature_id: Uuid,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<u32, VoteError> {
        let feature = self
            .features
            .get_mut(&feature_id)
            .ok_or(VoteError::FeatureNotFound)?;
        let key = (feature_id, user_id.to_string());
        if self.votes.contains_key(&key) {
            return Err(VoteError::AlreadyVoted);
        }
        self.votes.insert(
            key,
            FeatureVote {
                feature_id,
                user_id: user_id.to_string(),
                created_at: now,
            },
        );
        feature.vote_count += 1;
        debug!("User {user_id} voted for feature {feature_id}");
        Ok(feature.vote_count)
    }

    pub fn unvote_feature(&mut self, feature_id: Uuid, user_id: &str) -> Result<u32, VoteError> {
        let feature = self
            .features
            .get_mut(&feature_id)
            .ok_or(VoteError::FeatureNotFound)?;
        if self
            .votes
            .remove(&(feature_id, user_id.to_string()))
            .is_none()
        {
            return Err(VoteError::NotVoted);
        }
        feature.vote_count = feature.vote_count.saturating_sub(1);
        debug!("User {user_id} withdrew their vote for feature {feature_id}");
        Ok(feature.vote_count)
    }

    pub fn has_user_voted(&self, feature_id: Uuid, user_id: &str) -> bool {
        self.votes.contains_key(&(feature_id, user_id.to_string()))
    }

    /// Appends a comment. `None` when the feature does not exist.
    pub fn add_comment(
        &mut self,
        feature_id: Uuid,
        input: AddCommentInput,
        now: DateTime<Utc>,
    ) -> Option<FeatureComment> {
        let feature = self.features.get_mut(&feature_id)?;
        let comment = FeatureComment {
            id: Uuid::new_v4(),
            feature_id,
            user_id: input.user_id,
            user_name: input.user_name,
            content: input.content.trim().to_string(),
            is_official: input.is_official,
            created_at: now,
        };
        feature.comment_count += 1;
        self.comments
            .entry(feature_id)
            .or_default()
            .push(comment.clone());
        Some(comment)
    }

    pub fn get_comments(&self, feature_id: Uuid) -> Vec<FeatureComment> {
        self.comments.get(&feature_id).cloned().unwrap_or_default()
    }

    /// Moves a feature to any status. `shipped_at` is stamped only on the
    /// transition into `Shipped`.
    pub fn update_feature_status(
        &mut self,
        feature_id: Uuid,
        update: StatusUpdate,
        now: DateTime<Utc>,
    ) -> Option<FeatureRequest> {
        let feature = self.features.get_mut(&feature_id)?;
        let previous = feature.status;
        if update.status == FeatureStatus::Shipped && previous != FeatureStatus::Shipped {
            feature.shipped_at = Some(now);
        }
        feature.status = update.status;
        if update.status_note.is_some() {
            feature.status_note = update.status_note;
        }
        if update.planned_quarter.is_some() {
            feature.planned_quarter = update.planned_quarter;
        }
        feature.updated_at = now;
        info!(
            "Feature {} status {:?} -> {:?}",
            feature_id, previous, feature.status
        );
        Some(feature.clone())
    }

    pub fn get_roadmap_by_status(&self) -> RoadmapByStatus {
        let mut roadmap = RoadmapByStatus::default();
        for feature in self.features.values() {
            roadmap.bucket_mut(feature.status).push(feature.clone());
        }
        for status in FeatureStatus::ALL {
            sort_by_votes(roadmap.bucket_mut(status));
        }
        roadmap
    }
}

fn sort_by_votes(features: &mut [FeatureRequest]) {
    features.sort_by(|a, b| {
        b.vote_count
            .cmp(&a.vote_count)
            .then_with(|| a.created_at.cmp(&b.created_at))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 1, 9, 0, 0).unwrap()
    }

    fn submission(title: &str, by: Option<&str>) -> SubmitFeatureInput {
        SubmitFeatureInput {
            title: title.to_string(),
            description: "A reasonably detailed description".to_string(),
            use_case: None,
            submitted_by: by.map(str::to_string),
            submitted_by_name: None,
            tags: vec![],
        }
    }

    #[test]
    fn test_submit_starts_under_review_with_one_vote() {
        let mut store = RoadmapStore::new();
        let f = store.submit_feature(submission("Dark mode", Some("alice")), t0());
        assert_eq!(f.status, FeatureStatus::UnderReview);
        assert_eq!(f.vote_count, 1);
        assert!(store.has_user_voted(f.id, "alice"));
        assert_eq!(store.vote_for_feature(f.id, "alice", t0()), Err(VoteError::AlreadyVoted));
    }

    #[test]
    fn test_anonymous_submission_has_no_vote_record() {
        let mut store = RoadmapStore::new();
        let f = store.submit_feature(submission("Exports", None), t0());
        assert_eq!(f.vote_count, 1);
        assert_eq!(store.unvote_feature(f.id, "anyone"), Err(VoteError::NotVoted));
    }

    #[test]
    fn test_double_vote_fails_once() {
        let mut store = RoadmapStore::new();
        let f = store.submit_feature(submission("Dark mode", Some("alice")), t0());
        assert_eq!(store.vote_for_feature(f.id, "bob", t0()), Ok(2));
        assert_eq!(store.vote_for_feature(f.id, "bob", t0()), Err(VoteError::AlreadyVoted));
        assert_eq!(store.get_feature(f.id).map(|f| f.vote_count), Some(2));
    }

    #[test]
    fn test_unvote_restores_count() {
        let mut store = RoadmapStore::new();
        let f = store.submit_feature(submission("Dark mode", Some("alice")), t0());
        let before = store.get_feature(f.id).map(|f| f.vote_count);
        store.vote_for_feature(f.id, "bob", t0()).unwrap();
        assert_eq!(store.unvote_feature(f.id, "bob"), Ok(1));
        assert_eq!(store.get_feature(f.id).map(|f| f.vote_count), before);
        assert!(!store.has_user_voted(f.id, "bob"));
    }

    #[test]
    fn test_unvote_clamps_at_zero() {
        let mut store = RoadmapStore::new();
        let f = store.submit_feature(submission("Dark mode", Some("alice")), t0());
        // Counter and records drift apart, e.g. after a manual correction.
        store.features.get_mut(&f.id).unwrap().vote_count = 0;
        assert_eq!(store.unvote_feature(f.id, "alice"), Ok(0));
    }

    #[test]
    fn test_vote_on_missing_feature() {
        let mut store = RoadmapStore::new();
        let missing = Uuid::new_v4();
        assert_eq!(store.vote_for_feature(missing, "u", t0()), Err(VoteError::FeatureNotFound));
        assert_eq!(store.unvote_feature(missing, "u"), Err(VoteError::FeatureNotFound));
    }

    #[test]
    fn test_comments_append_in_order() {
        let mut store = RoadmapStore::new();
        let f = store.submit_feature(submission("Dark mode", None), t0());
        for (i, text) in ["first", "second"].iter().enumerate() {
            let c = store.add_comment(
                f.id,
                AddCommentInput {
                    user_id: "u".to_string(),
                    user_name: None,
                    content: text.to_string(),
                    is_official: false,
                },
                t0() + Duration::minutes(i as i64),
            );
            assert!(c.is_some());
        }
        let comments = store.get_comments(f.id);
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].content, "first");
        assert_eq!(store.get_feature(f.id).map(|f| f.comment_count), Some(2));
    }

    #[test]
    fn test_comment_on_missing_feature_is_none() {
        let mut store = RoadmapStore::new();
        let input = AddCommentInput {
            user_id: "u".to_string(),
            user_name: None,
            content: "hello".to_string(),
            is_official: false,
        };
        assert!(store.add_comment(Uuid::new_v4(), input, t0()).is_none());
    }

    #[test]
    fn test_status_update_sets_shipped_at_only_on_ship() {
        let mut store = RoadmapStore::new();
        let f = store.submit_feature(submission("Dark mode", None), t0());

        let planned = store
            .update_feature_status(
                f.id,
                StatusUpdate {
                    status: FeatureStatus::Planned,
                    status_note: Some("Queued".to_string()),
                    planned_quarter: Some("Q3 2026".to_string()),
                },
                t0() + Duration::days(1),
            )
            .unwrap();
        assert!(planned.shipped_at.is_none());
        assert_eq!(planned.planned_quarter.as_deref(), Some("Q3 2026"));

        let ship_time = t0() + Duration::days(10);
        let shipped = store
            .update_feature_status(
                f.id,
                StatusUpdate {
                    status: FeatureStatus::Shipped,
                    status_note: None,
                    planned_quarter: None,
                },
                ship_time,
            )
            .unwrap();
        assert_eq!(shipped.shipped_at, Some(ship_time));
        assert_eq!(shipped.status_note.as_deref(), Some("Queued"));

        // Any status may follow any other.
        let declined = store
            .update_feature_status(
                f.id,
                StatusUpdate {
                    status: FeatureStatus::Declined,
                    status_note: None,
                    planned_quarter: None,
                },
                ship_time + Duration::days(1),
            )
            .unwrap();
        assert_eq!(declined.status, FeatureStatus::Declined);
        assert!(store
            .update_feature_status(
                Uuid::new_v4(),
                StatusUpdate {
                    status: FeatureStatus::Planned,
                    status_note: None,
                    planned_quarter: None,
                },
                t0(),
            )
            .is_none());
    }

    #[test]
    fn test_roadmap_buckets_sorted_by_votes() {
        let mut store = RoadmapStore::new();
        let a = store.submit_feature(submission("Feature A", None), t0());
        let b = store.submit_feature(submission("Feature B", None), t0() + Duration::seconds(1));
        store.vote_for_feature(b.id, "x", t0()).unwrap();
        store.vote_for_feature(b.id, "y", t0()).unwrap();
        let c = store.submit_feature(submission("Feature C", None), t0());
        store
            .update_feature_status(
                c.id,
                StatusUpdate {
                    status: FeatureStatus::InProgress,
                    status_note: None,
                    planned_quarter: None,
                },
                t0(),
            )
            .unwrap();

        let roadmap = store.get_roadmap_by_status();
        let ids: Vec<_> = roadmap.under_review.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![b.id, a.id]);
        assert_eq!(roadmap.in_progress.len(), 1);
        assert!(roadmap.planned.is_empty());
        assert!(roadmap.shipped.is_empty());
        assert!(roadmap.declined.is_empty());
    }

    #[test]
    fn test_list_features_filters_and_sorts() {
        let mut store = RoadmapStore::new();
        let old = store.submit_feature(submission("Older", None), t0());
        let new = store.submit_feature(submission("Newer", None), t0() + Duration::hours(1));
        store.vote_for_feature(old.id, "x", t0()).unwrap();

        let by_votes = store.list_features(None, FeatureSort::Votes);
        assert_eq!(by_votes[0].id, old.id);
        let newest = store.list_features(None, FeatureSort::Newest);
        assert_eq!(newest[0].id, new.id);
        assert!(store
            .list_features(Some(FeatureStatus::Shipped), FeatureSort::Votes)
            .is_empty());
    }

    #[test]
    fn test_submission_validation() {
        assert!(submission("Ok title", None).validate().is_ok());
        assert!(submission("no", None).validate().is_err());
        let mut short = submission("Fine title", None);
        short.description = "too short".to_string();
        assert!(short.validate().is_err());
    }
}
