use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::history::models::{
    HistoryPolicy, HistoryQuery, RecordViewInput, ResourceType, ViewHistoryEntry,
};

/// Per-user view history with a dedupe window and lazy TTL pruning.
///
/// Entries live in `entries`; `by_user` holds each user's ids ordered by
/// `viewed_at` descending.
#[derive(Debug, Default)]
pub struct HistoryStore {
    policy: HistoryPolicy,
    entries: HashMap<Uuid, ViewHistoryEntry>,
    by_user: HashMap<String, Vec<Uuid>>,
}

impl HistoryStore {
    pub fn new(policy: HistoryPolicy) -> Self {
        Self {
            policy,
            entries: HashMap::new(),
            by_user: HashMap::new(),
        }
    }

    /// Records a view, collapsing it into a matching entry seen inside the
    /// dedupe window. Returns the resulting entry.
    pub fn record_view(&mut self, input: RecordViewInput, now: DateTime<Utc>) -> ViewHistoryEntry {
        self.prune_user(&input.user_id, now);

        let viewed_at = input
            .viewed_at
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|ts| ts.with_timezone(&Utc))
            .unwrap_or(now);

        let resource_id = match input.resource_type {
            ResourceType::Search => None,
            _ => input.resource_id,
        };

        let ids = self.by_user.entry(input.user_id.clone()).or_default();

        let hit = ids.iter().position(|id| {
            self.entries.get(id).is_some_and(|existing| {
                (viewed_at - existing.viewed_at).abs() < self.policy.dedupe_window
                    && same_resource(
                        existing,
                        input.resource_type,
                        resource_id.as_deref(),
                        input.search_query.as_deref(),
                    )
            })
        });

        let existing = match hit {
            Some(pos) => {
                let id = ids.remove(pos);
                self.entries.get_mut(&id)
            }
            None => None,
        };

        let result = if let Some(existing) = existing {
            // A backdated view never pulls an entry's timestamp backwards.
            existing.viewed_at = existing.viewed_at.max(viewed_at);
            existing.source = input.source;
            existing.duration = input.duration;
            debug!("Refreshed view {} for user {}", existing.id, existing.user_id);
            existing.clone()
        } else {
            let entry = ViewHistoryEntry {
                id: Uuid::new_v4(),
                user_id: input.user_id.clone(),
                resource_type: input.resource_type,
                resource_id,
                search_query: input.search_query,
                source: input.source,
                viewed_at,
                duration: input.duration,
            };
            debug!("Recorded view {} for user {}", entry.id, entry.user_id);
            self.entries.insert(entry.id, entry.clone());
            entry
        };

        // Normally the front; a backdated view lands at its ordered position.
        let entries = &self.entries;
        let pos = ids
            .iter()
            .position(|other| {
                entries
                    .get(other)
                    .map_or(true, |e| e.viewed_at <= result.viewed_at)
            })
            .unwrap_or(ids.len());
        ids.insert(pos, result.id);

        result
    }

    /// Newest-first entries for a user, after pruning expired ones.
    pub fn list_history(&mut self, query: &HistoryQuery, now: DateTime<Utc>) -> Vec<ViewHistoryEntry> {
        self.prune_user(&query.user_id, now);

        let Some(ids) = self.by_user.get(&query.user_id) else {
            return Vec::new();
        };

        ids.iter()
            .filter_map(|id| self.entries.get(id))
            .filter(|e| query.resource_type.map_or(true, |t| e.resource_type == t))
            .take(query.limit)
            .cloned()
            .collect()
    }

    /// Drops every entry for the user. Returns how many were removed.
    pub fn clear_history(&mut self, user_id: &str) -> usize {
        let ids = self.by_user.remove(user_id).unwrap_or_default();
        for id in &ids {
            self.entries.remove(id);
        }
        ids.len()
    }

    fn prune_user(&mut self, user_id: &str, now: DateTime<Utc>) {
        let cutoff = now - self.policy.retention;
        let Some(ids) = self.by_user.get_mut(user_id) else {
            return;
        };
        let entries = &mut self.entries;
        ids.retain(|id| match entries.get(id) {
            Some(entry) if entry.viewed_at >= cutoff => true,
            Some(_) => {
                entries.remove(id);
                false
            }
            None => false,
        });
    }
}

fn same_resource(
    existing: &ViewHistoryEntry,
    resource_type: ResourceType,
    resource_id: Option<&str>,
    search_query: Option<&str>,
) -> bool {
    if existing.resource_type != resource_type {
        return false;
    }
    match resource_type {
        ResourceType::Search => match (existing.search_query.as_deref(), search_query) {
            (Some(a), Some(b)) => a.trim().to_lowercase() == b.trim().to_lowercase(),
            _ => false,
        },
        _ => existing.resource_id.as_deref() == resource_id,
    }
}
