use serde::{Deserialize, Serialize};
use std::fmt;

use scorecard_core::Result;

pub const DEFAULT_TABLE: &str = "avaliacoes";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for a Supabase (PostgREST) project
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`
    pub url: String,
    /// Anonymous (public) API key
    pub api_key: String,
    pub table: String,
    pub timeout_secs: u64,
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            table: DEFAULT_TABLE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl SupabaseConfig {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty() && !self.api_key.trim().is_empty()
    }

    /// REST endpoint of the evaluations table.
    pub fn endpoint(&self) -> Result<String> {
        let base = self.url.trim().trim_end_matches('/');
        if base.is_empty() {
            return Err("Supabase URL is not configured".into());
        }
        if self.table.trim().is_empty() {
            return Err("Supabase table name is empty".into());
        }
        Ok(format!("{}/rest/v1/{}", base, self.table.trim()))
    }
}

// Keeps the key out of logs.
impl fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url)
            .field("api_key", &if self.api_key.is_empty() { "" } else { "***" })
            .field("table", &self.table)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let config = SupabaseConfig::new("https://demo.supabase.co/", "key");
        assert_eq!(
            config.endpoint().unwrap(),
            "https://demo.supabase.co/rest/v1/avaliacoes"
        );
    }

    #[test]
    fn test_missing_url_is_an_error() {
        let config = SupabaseConfig::default();
        assert!(!config.is_configured());
        assert!(config.endpoint().is_err());
    }

    #[test]
    fn test_partial_config_takes_defaults() {
        let config: SupabaseConfig =
            serde_json::from_str(r#"{"url": "http://localhost:54321", "api_key": "k"}"#).unwrap();
        assert_eq!(config.table, DEFAULT_TABLE);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(config.is_configured());
    }

    #[test]
    fn test_debug_hides_api_key() {
        let config = SupabaseConfig::new("http://localhost", "secret-key");
        assert!(!format!("{:?}", config).contains("secret-key"));
    }
}
