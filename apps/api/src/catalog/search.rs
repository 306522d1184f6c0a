use std::collections::HashMap;

use serde::Serialize;

use crate::catalog::bundles::{Bundle, BundleDetail, BundleSummary};
use crate::catalog::models::{NameCount, Prompt, PromptFilter, PromptSummary};
use crate::catalog::tag_mappings::TagMappings;

pub const DEFAULT_SEARCH_LIMIT: usize = 20;
pub const MAX_SEARCH_LIMIT: usize = 100;

/// Field a search term matched, with its score contribution.
///
/// - Title: +10, +5 more when the title starts with the term
/// - ID: +8
/// - Description: +5
/// - Category: +3
/// - Tag: +2 per matching tag
/// - Content: +1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    Id,
    Title,
    Description,
    Category,
    Tag,
    Content,
}

impl SearchField {
    pub fn base_score(&self) -> f64 {
        match self {
            SearchField::Title => 10.0,
            SearchField::Id => 8.0,
            SearchField::Description => 5.0,
            SearchField::Category => 3.0,
            SearchField::Tag => 2.0,
            SearchField::Content => 1.0,
        }
    }
}

const TITLE_PREFIX_BONUS: f64 = 5.0;

#[derive(Debug, Clone, Serialize)]
pub struct SearchMatch {
    pub field: SearchField,
    pub term: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub prompt: PromptSummary,
    pub score: f64,
    pub matches: Vec<SearchMatch>,
}

/// Read-only prompt catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    prompts: Vec<Prompt>,
    bundles: Vec<Bundle>,
}

impl Catalog {
    pub fn new(prompts: Vec<Prompt>) -> Self {
        Self {
            prompts,
            bundles: Vec::new(),
        }
    }

    pub fn with_bundles(mut self, bundles: Vec<Bundle>) -> Self {
        self.bundles = bundles;
        self
    }

    /// Bundle listings count only members present in the catalog.
    pub fn list_bundles(&self) -> Vec<BundleSummary> {
        self.bundles
            .iter()
            .map(|b| BundleSummary {
                id: b.id.clone(),
                title: b.title.clone(),
                description: b.description.clone(),
                featured: b.featured,
                prompt_count: b.prompt_ids.iter().filter(|id| self.contains(id)).count(),
            })
            .collect()
    }

    pub fn get_bundle(&self, id: &str) -> Option<BundleDetail> {
        let b = self.bundles.iter().find(|b| b.id == id)?;
        Some(BundleDetail {
            id: b.id.clone(),
            title: b.title.clone(),
            description: b.description.clone(),
            featured: b.featured,
            prompts: b
                .prompt_ids
                .iter()
                .filter_map(|id| self.get_prompt(id))
                .map(PromptSummary::from)
                .collect(),
        })
    }

    pub fn get_prompt(&self, id: &str) -> Option<&Prompt> {
        self.prompts.iter().find(|p| p.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get_prompt(id).is_some()
    }

    pub fn list_prompts(&self, filter: &PromptFilter, tags: &TagMappings) -> Vec<PromptSummary> {
        let wanted_tag = filter.tag.as_deref().map(|t| tags.resolve(t));
        self.prompts
            .iter()
            .filter(|p| {
                filter
                    .category
                    .as_deref()
                    .map_or(true, |c| p.matches_category(c))
            })
            .filter(|p| filter.featured.map_or(true, |f| p.featured == f))
            .filter(|p| {
                wanted_tag
                    .as_deref()
                    .map_or(true, |want| p.tags.iter().any(|t| tags.resolve(t) == want))
            })
            .map(PromptSummary::from)
            .collect()
    }

    pub fn search(&self, query: &str, limit: usize, tags: &TagMappings) -> Vec<SearchResult> {
        let terms: Vec<String> = query
            .to_lowercase()
            .split_whitespace()
            .map(str::to_string)
            .collect();
        if terms.is_empty() {
            return Vec::new();
        }

        let mut results: Vec<SearchResult> = self
            .prompts
            .iter()
            .filter_map(|p| {
                let (score, matches) = score_prompt(p, &terms, tags);
                (score > 0.0).then(|| SearchResult {
                    prompt: PromptSummary::from(p),
                    score,
                    matches,
                })
            })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.prompt.id.cmp(&b.prompt.id))
        });
        results.truncate(limit);
        results
    }

    pub fn category_counts(&self) -> Vec<NameCount> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for category in self.prompts.iter().filter_map(|p| p.category.as_ref()) {
            *counts.entry(category.to_lowercase()).or_default() += 1;
        }
        sorted_counts(counts)
    }

    pub fn tag_counts(&self, tags: &TagMappings) -> Vec<NameCount> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for p in &self.prompts {
            let mut seen: Vec<String> = p.tags.iter().map(|t| tags.resolve(t)).collect();
            seen.sort();
            seen.dedup();
            for tag in seen {
                *counts.entry(tag).or_default() += 1;
            }
        }
        sorted_counts(counts)
    }
}

fn score_prompt(p: &Prompt, terms: &[String], tags: &TagMappings) -> (f64, Vec<SearchMatch>) {
    let title = p.title.to_lowercase();
    let id = p.id.to_lowercase();
    let description = p.description.as_deref().unwrap_or_default().to_lowercase();
    let category = p.category.as_deref().unwrap_or_default().to_lowercase();
    let content = p.content.to_lowercase();
    let resolved_tags: Vec<String> = p.tags.iter().map(|t| tags.resolve(t)).collect();

    let mut score = 0.0;
    let mut matches = Vec::new();
    let mut hit = |field: SearchField, term: &str, bonus: f64| {
        score += field.base_score() + bonus;
        matches.push(SearchMatch {
            field,
            term: term.to_string(),
        });
    };

    for term in terms {
        if title.contains(term.as_str()) {
            let bonus = if title.starts_with(term.as_str()) {
                TITLE_PREFIX_BONUS
            } else {
                0.0
            };
            hit(SearchField::Title, term, bonus);
        }
        if id.contains(term.as_str()) {
            hit(SearchField::Id, term, 0.0);
        }
        if description.contains(term.as_str()) {
            hit(SearchField::Description, term, 0.0);
        }
        if category.contains(term.as_str()) {
            hit(SearchField::Category, term, 0.0);
        }
        let term_tag = tags.resolve(term);
        for tag in &resolved_tags {
            if tag.contains(term.as_str()) || *tag == term_tag {
                hit(SearchField::Tag, term, 0.0);
            }
        }
        if content.contains(term.as_str()) {
            hit(SearchField::Content, term, 0.0);
        }
    }

    (score, matches)
}

fn sorted_counts(counts: HashMap<String, usize>) -> Vec<NameCount> {
    let mut out: Vec<NameCount> = counts
        .into_iter()
        .map(|(name, count)| NameCount { name, count })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    out
}
