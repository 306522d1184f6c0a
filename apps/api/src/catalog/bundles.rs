//! Curated prompt bundles served alongside the catalog.

use serde::Serialize;

use crate::catalog::models::PromptSummary;

#[derive(Debug, Clone)]
pub struct Bundle {
    pub id: String,
    pub title: String,
    pub description: String,
    pub featured: bool,
    pub prompt_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleSummary {
    pub id: String,
    pub title: String,
    pub description: String,
    pub featured: bool,
    pub prompt_count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleDetail {
    pub id: String,
    pub title: String,
    pub description: String,
    pub featured: bool,
    pub prompts: Vec<PromptSummary>,
}

fn bundle(id: &str, title: &str, description: &str, featured: bool, prompt_ids: &[&str]) -> Bundle {
    Bundle {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        featured,
        prompt_ids: prompt_ids.iter().map(|p| p.to_string()).collect(),
    }
}

pub fn bundled_bundles() -> Vec<Bundle> {
    vec![
        bundle(
            "getting-started",
            "Getting Started",
            "Essential prompts for new users",
            true,
            &["code-review", "explain-code", "bug-hunter"],
        ),
        bundle(
            "quality-essentials",
            "Quality Essentials",
            "Core prompts for code quality and refactoring",
            false,
            &["write-tests", "refactor-plan", "code-review"],
        ),
        bundle(
            "docs-and-design",
            "Docs & Design",
            "Prompts for documentation and design review",
            false,
            &["api-docs", "explain-code", "threat-model"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::catalog::registry::bundled_prompts;

    #[test]
    fn test_bundle_members_exist_in_registry() {
        let ids: HashSet<String> = bundled_prompts().into_iter().map(|p| p.id).collect();
        for b in bundled_bundles() {
            for id in &b.prompt_ids {
                assert!(ids.contains(id), "{} lists unknown prompt {id}", b.id);
            }
        }
    }
}
