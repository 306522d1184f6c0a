use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::roadmap::models::{FeatureRequest, FeatureStatus};

struct SeedFeature {
    title: &'static str,
    description: &'static str,
    status: FeatureStatus,
    votes: u32,
    age_days: i64,
    quarter: Option<&'static str>,
    note: Option<&'static str>,
    tags: &'static [&'static str],
}

const SEED: &[SeedFeature] = &[
    SeedFeature {
        title: "Prompt version history",
        description: "Show earlier revisions of a prompt and let me diff or restore them.",
        status: FeatureStatus::UnderReview,
        votes: 48,
        age_days: 12,
        quarter: None,
        note: None,
        tags: &["prompts", "history"],
    },
    SeedFeature {
        title: "Team workspaces",
        description: "Share private prompt collections with teammates under a single workspace.",
        status: FeatureStatus::Planned,
        votes: 87,
        age_days: 40,
        quarter: Some("Q3 2026"),
        note: Some("Scoping permissions model"),
        tags: &["collaboration"],
    },
    SeedFeature {
        title: "Variable presets",
        description: "Save named sets of variable values and reuse them when rendering a prompt.",
        status: FeatureStatus::InProgress,
        votes: 63,
        age_days: 55,
        quarter: Some("Q2 2026"),
        note: None,
        tags: &["variables", "render"],
    },
    SeedFeature {
        title: "Command-line sync",
        description: "Keep saved prompts in sync between the website and the CLI.",
        status: FeatureStatus::Shipped,
        votes: 120,
        age_days: 90,
        quarter: Some("Q1 2026"),
        note: Some("Available in CLI 0.4"),
        tags: &["cli", "sync"],
    },
    SeedFeature {
        title: "Auto-generate prompts from chat logs",
        description: "Paste a conversation and have a reusable prompt extracted automatically.",
        status: FeatureStatus::Declined,
        votes: 15,
        age_days: 70,
        quarter: None,
        note: Some("Out of scope for the library"),
        tags: &["ai"],
    },
];

/// The fixed roadmap catalog loaded at startup.
pub fn seed_features(now: DateTime<Utc>) -> Vec<FeatureRequest> {
    SEED.iter()
        .map(|s| {
            let created_at = now - Duration::days(s.age_days);
            FeatureRequest {
                id: Uuid::new_v4(),
                title: s.title.to_string(),
                description: s.description.to_string(),
                use_case: None,
                status: s.status,
                vote_count: s.votes,
                comment_count: 0,
                submitted_by: None,
                submitted_by_name: None,
                created_at,
                updated_at: created_at,
                shipped_at: (s.status == FeatureStatus::Shipped)
                    .then(|| created_at + Duration::days(s.age_days / 2)),
                status_note: s.note.map(str::to_string),
                planned_quarter: s.quarter.map(str::to_string),
                tags: s.tags.iter().map(|t| t.to_string()).collect(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_covers_every_status() {
        let features = seed_features(Utc::now());
        for status in FeatureStatus::ALL {
            assert!(features.iter().any(|f| f.status == status), "{status:?}");
        }
    }

    #[test]
    fn test_only_shipped_seeds_have_shipped_at() {
        for f in seed_features(Utc::now()) {
            assert_eq!(f.shipped_at.is_some(), f.status == FeatureStatus::Shipped);
        }
    }
}
