use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Admin overrides mapping alias tags onto a canonical tag.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TagMappings {
    #[serde(default)]
    pub mappings: BTreeMap<String, String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_by: Option<String>,
}

pub fn normalize_tag(tag: &str) -> String {
    tag.trim().to_lowercase()
}

impl TagMappings {
    /// Single-hop alias resolution on the normalized tag.
    pub fn resolve(&self, tag: &str) -> String {
        let key = normalize_tag(tag);
        match self.mappings.get(&key) {
            Some(canonical) => canonical.clone(),
            None => key,
        }
    }

    /// Normalizes both sides and rejects empty or self-referencing entries.
    pub fn validated(raw: BTreeMap<String, String>) -> Result<BTreeMap<String, String>, String> {
        let mut out = BTreeMap::new();
        for (alias, canonical) in raw {
            let alias = normalize_tag(&alias);
            let canonical = normalize_tag(&canonical);
            if alias.is_empty() || canonical.is_empty() {
                return Err("tag mappings cannot contain empty tags".to_string());
            }
            if alias == canonical {
                return Err(format!("tag '{alias}' cannot map to itself"));
            }
            out.insert(alias, canonical);
        }
        Ok(out)
    }

    pub async fn load(path: &Path) -> Result<Self> {
        match tokio::fs::read(path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .with_context(|| format!("Malformed tag mappings file {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    /// Writes to a sibling temp file, then renames it over `path`.
    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let body = serde_json::to_vec_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, body)
            .await
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, path)
            .await
            .with_context(|| format!("Failed to replace {}", path.display()))?;
        info!(
            "Saved {} tag mappings to {}",
            self.mappings.len(),
            path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mappings(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(a, c)| (a.to_string(), c.to_string()))
            .collect()
    }

    #[test]
    fn test_resolve_is_single_hop_and_case_insensitive() {
        let tm = TagMappings {
            mappings: mappings(&[("tests", "testing"), ("testing", "qa")]),
            ..Default::default()
        };
        assert_eq!(tm.resolve(" Tests "), "testing");
        assert_eq!(tm.resolve("TESTING"), "qa");
        assert_eq!(tm.resolve("Rust"), "rust");
    }

    #[test]
    fn test_validated_normalizes_and_rejects_bad_entries() {
        let ok = TagMappings::validated(mappings(&[("  Debug ", "Debugging")])).unwrap();
        assert_eq!(ok.get("debug").map(String::as_str), Some("debugging"));

        assert!(TagMappings::validated(mappings(&[("", "x")])).is_err());
        assert!(TagMappings::validated(mappings(&[("Same", "same")])).is_err());
    }

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = TagMappings::load(&dir.path().join("absent.json")).await.unwrap();
        assert_eq!(loaded, TagMappings::default());
    }

    #[tokio::test]
    async fn test_save_then_load_preserves_mappings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("tag-mappings.json");
        let tm = TagMappings {
            mappings: mappings(&[("tests", "testing")]),
            updated_at: None,
            updated_by: Some("admin".to_string()),
        };
        tm.save(&path).await.unwrap();
        assert_eq!(TagMappings::load(&path).await.unwrap(), tm);
    }

    #[tokio::test]
    async fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        tokio::fs::write(&path, b"{ not json").await.unwrap();
        assert!(TagMappings::load(&path).await.is_err());
    }
}
