use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if a variable is present but malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Shared secret for `/api/admin/*`. Admin routes are closed when unset.
    pub admin_token: Option<String>,
    pub tag_mappings_path: PathBuf,
    pub history_dedupe_window_secs: i64,
    pub history_retention_days: i64,
    pub seed_roadmap: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            admin_token: std::env::var("ADMIN_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty()),
            tag_mappings_path: std::env::var("TAG_MAPPINGS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/tag-mappings.json")),
            history_dedupe_window_secs: parse_env("HISTORY_DEDUPE_WINDOW_SECS", 300)?,
            history_retention_days: parse_env("HISTORY_RETENTION_DAYS", 30)?,
            seed_roadmap: parse_env("SEED_ROADMAP", true)?,
        })
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    /// Config used by router tests; never touches the process environment.
    pub fn for_tests(tag_mappings_path: PathBuf) -> Self {
        Config {
            port: 0,
            rust_log: "debug".to_string(),
            admin_token: Some("test-admin-token".to_string()),
            tag_mappings_path,
            history_dedupe_window_secs: 300,
            history_retention_days: 30,
            seed_roadmap: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_falls_back_to_default_when_unset() {
        std::env::remove_var("PROMPTS_API_TEST_UNSET");
        assert_eq!(parse_env("PROMPTS_API_TEST_UNSET", 42u16).unwrap(), 42);
    }

    #[test]
    fn test_parse_env_reads_trimmed_value() {
        std::env::set_var("PROMPTS_API_TEST_PORT", " 9090 ");
        assert_eq!(parse_env("PROMPTS_API_TEST_PORT", 8080u16).unwrap(), 9090);
    }

    #[test]
    fn test_parse_env_malformed_value_names_variable() {
        std::env::set_var("PROMPTS_API_TEST_WINDOW", "five minutes");
        let err = parse_env("PROMPTS_API_TEST_WINDOW", 300i64).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("PROMPTS_API_TEST_WINDOW"), "{message}");
        assert!(message.contains("five minutes"), "{message}");
    }
}
