use std::collections::HashMap;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::reports::models::{
    Report, ReportDecision, ReportFilter, ReportInput, ReportQueue, ReportStatus, StatusCounts,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportError {
    #[error("You already have a pending report for this content")]
    Duplicate,
    #[error("A report cannot be moved back to pending")]
    InvalidDecision,
}

impl From<ReportError> for AppError {
    fn from(e: ReportError) -> Self {
        match e {
            ReportError::Duplicate => AppError::Conflict(e.to_string()),
            ReportError::InvalidDecision => AppError::Validation(e.to_string()),
        }
    }
}

/// Content reports and the admin moderation queue.
#[derive(Debug, Default)]
pub struct ReportStore {
    reports: HashMap<Uuid, Report>,
}

impl ReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit_report(&mut self, input: ReportInput, now: DateTime<Utc>) -> Result<Report, ReportError> {
        let content_id = input.content_id.trim().to_string();

        if let Some(reporter) = input.reporter_id.as_deref() {
            let duplicate = self.reports.values().any(|r| {
                r.status == ReportStatus::Pending
                    && r.content_type == input.content_type
                    && r.content_id == content_id
                    && r.reporter_id.as_deref() == Some(reporter)
            });
            if duplicate {
                return Err(ReportError::Duplicate);
            }
        }

        let report = Report {
            id: Uuid::new_v4(),
            content_type: input.content_type,
            content_id,
            content_title: input.content_title,
            reason: input.reason,
            details: input
                .details
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            reporter_id: input.reporter_id,
            status: ReportStatus::Pending,
            created_at: now,
            reviewed_at: None,
            reviewed_by: None,
            action_note: None,
        };
        info!(
            "Report {} filed against {:?} {} ({:?})",
            report.id, report.content_type, report.content_id, report.reason
        );
        self.reports.insert(report.id, report.clone());
        Ok(report)
    }

    /// Newest-first reports matching the filter, plus counts over all reports.
    pub fn list_reports(&self, filter: &ReportFilter) -> ReportQueue {
        let mut reports: Vec<_> = self
            .reports
            .values()
            .filter(|r| filter.status.map_or(true, |s| r.status == s))
            .filter(|r| filter.content_type.map_or(true, |t| r.content_type == t))
            .cloned()
            .collect();
        reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        reports.truncate(filter.limit);

        let mut counts = StatusCounts::default();
        for report in self.reports.values() {
            match report.status {
                ReportStatus::Pending => counts.pending += 1,
                ReportStatus::Reviewed => counts.reviewed += 1,
                ReportStatus::Actioned => counts.actioned += 1,
                ReportStatus::Dismissed => counts.dismissed += 1,
            }
        }

        ReportQueue { reports, counts }
    }

    /// Records an admin decision. `Ok(None)` when the report does not exist.
    pub fn review_report(
        &mut self,
        id: Uuid,
        decision: ReportDecision,
        now: DateTime<Utc>,
    ) -> Result<Option<Report>, ReportError> {
        if decision.status == ReportStatus::Pending {
            return Err(ReportError::InvalidDecision);
        }
        let Some(report) = self.reports.get_mut(&id) else {
            return Ok(None);
        };
        report.status = decision.status;
        report.reviewed_by = Some(decision.reviewed_by);
        report.reviewed_at = Some(now);
        if decision.action_note.is_some() {
            report.action_note = decision.action_note;
        }
        info!("Report {id} marked {:?}", report.status);
        Ok(Some(report.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::models::{ContentType, ReportReason};
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 7, 1, 8, 0, 0).unwrap()
    }

    fn spam(content: &str, reporter: Option<&str>) -> ReportInput {
        ReportInput {
            content_type: ContentType::Prompt,
            content_id: content.to_string(),
            content_title: None,
            reason: ReportReason::Spam,
            details: None,
            reporter_id: reporter.map(str::to_string),
        }
    }

    fn all() -> ReportFilter {
        ReportFilter {
            limit: 50,
            ..Default::default()
        }
    }

    #[test]
    fn test_duplicate_pending_report_is_refused() {
        let mut store = ReportStore::new();
        store.submit_report(spam("p1", Some("u1")), t0()).unwrap();
        assert_eq!(
            store.submit_report(spam("p1", Some("u1")), t0()).unwrap_err(),
            ReportError::Duplicate
        );
        // Other reporters and anonymous reports are accepted.
        assert!(store.submit_report(spam("p1", Some("u2")), t0()).is_ok());
        assert!(store.submit_report(spam("p1", None), t0()).is_ok());
        assert!(store.submit_report(spam("p1", None), t0()).is_ok());
    }

    #[test]
    fn test_reviewed_report_allows_new_one() {
        let mut store = ReportStore::new();
        let first = store.submit_report(spam("p1", Some("u1")), t0()).unwrap();
        store
            .review_report(
                first.id,
                ReportDecision {
                    status: ReportStatus::Dismissed,
                    reviewed_by: "mod".to_string(),
                    action_note: None,
                },
                t0(),
            )
            .unwrap();
        assert!(store.submit_report(spam("p1", Some("u1")), t0()).is_ok());
    }

    #[test]
    fn test_queue_filters_sorts_and_counts() {
        let mut store = ReportStore::new();
        let old = store.submit_report(spam("p1", None), t0()).unwrap();
        let new = store
            .submit_report(spam("p2", None), t0() + Duration::minutes(5))
            .unwrap();
        store
            .review_report(
                old.id,
                ReportDecision {
                    status: ReportStatus::Actioned,
                    reviewed_by: "mod".to_string(),
                    action_note: Some("Removed".to_string()),
                },
                t0() + Duration::minutes(10),
            )
            .unwrap();

        let queue = store.list_reports(&all());
        assert_eq!(queue.reports[0].id, new.id);
        assert_eq!(
            queue.counts,
            StatusCounts {
                pending: 1,
                actioned: 1,
                ..Default::default()
            }
        );

        let pending = store.list_reports(&ReportFilter {
            status: Some(ReportStatus::Pending),
            ..all()
        });
        assert_eq!(pending.reports.len(), 1);
        assert_eq!(pending.reports[0].id, new.id);
    }

    #[test]
    fn test_review_rejects_pending_and_missing() {
        let mut store = ReportStore::new();
        let r = store.submit_report(spam("p1", None), t0()).unwrap();
        let back_to_pending = ReportDecision {
            status: ReportStatus::Pending,
            reviewed_by: "mod".to_string(),
            action_note: None,
        };
        assert_eq!(
            store.review_report(r.id, back_to_pending, t0()).unwrap_err(),
            ReportError::InvalidDecision
        );
        let decision = ReportDecision {
            status: ReportStatus::Reviewed,
            reviewed_by: "mod".to_string(),
            action_note: None,
        };
        assert!(store
            .review_report(Uuid::new_v4(), decision, t0())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_other_reason_needs_details() {
        let mut input = spam("p1", None);
        input.reason = ReportReason::Other;
        assert!(input.validate().is_err());
        input.details = Some("Copied from my blog".to_string());
        assert!(input.validate().is_ok());
        input.details = Some("x".repeat(1001));
        assert!(input.validate().is_err());
    }
}
