use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use scorecard::SyncConfig;
use scorecard_supabase::SupabaseConfig;

pub const API_KEY_ENV: &str = "SCORECARD_API_KEY";

/// Contents of `scorecard.yaml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub supabase: SupabaseConfig,
    pub sync: SyncConfig,
    /// Where the pending queue is stored. Defaults to `~/.config/scorecard`.
    pub data_dir: Option<PathBuf>,
    /// URL probed for reachability. Defaults to the Supabase URL.
    pub probe_url: Option<String>,
}

impl CliConfig {
    /// Load the config from a YAML file. A missing file yields the defaults;
    /// `SCORECARD_API_KEY` overrides the key either way.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            Self::load_from_file(path)?
        } else {
            debug!(
                "[CliConfig] {} not found, using defaults",
                path.display()
            );
            Self::default()
        };
        config.apply_api_key_override(std::env::var(API_KEY_ENV).ok());
        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file {}: {}", path.display(), e)
        })?;

        let config: CliConfig = serde_yaml::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse config YAML {}: {}", path.display(), e)
        })?;

        Ok(config)
    }

    pub fn apply_api_key_override(&mut self, api_key: Option<String>) {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.supabase.api_key = key;
        }
    }

    pub fn data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        match std::env::var_os("HOME") {
            Some(home) => {
                let mut path = PathBuf::from(home);
                path.push(".config");
                path.push("scorecard");
                path
            }
            None => PathBuf::from(".scorecard"),
        }
    }

    pub fn probe_url(&self) -> Option<String> {
        self.probe_url
            .clone()
            .or_else(|| (!self.supabase.url.trim().is_empty()).then(|| self.supabase.url.clone()))
    }

    /// Fail unless the remote store is fully configured.
    pub fn require_remote(&self) -> Result<&SupabaseConfig> {
        if !self.supabase.is_configured() {
            anyhow::bail!(
                "Supabase is not configured: set supabase.url and supabase.api_key in the config file (or {})",
                API_KEY_ENV
            );
        }
        Ok(&self.supabase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_yaml_with_partial_sections() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "supabase:\n  url: https://demo.supabase.co\n  api_key: from-file\nsync:\n  batch_size: 10\ndata_dir: /tmp/scorecard-data\n"
        )
        .unwrap();

        let config = CliConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.supabase.url, "https://demo.supabase.co");
        assert_eq!(config.supabase.table, "avaliacoes");
        assert_eq!(config.sync.batch_size, 10);
        assert_eq!(config.sync.queue_key, "@avaliacoes_pending");
        assert_eq!(config.data_dir(), PathBuf::from("/tmp/scorecard-data"));
        assert_eq!(
            config.probe_url().as_deref(),
            Some("https://demo.supabase.co")
        );
        assert!(config.require_remote().is_ok());
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "supabase: [not, a, map]").unwrap();
        assert!(CliConfig::load_from_file(file.path()).is_err());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = CliConfig::load(&dir.path().join("absent.yaml")).unwrap();
        assert_eq!(config.sync, SyncConfig::default());
        assert!(config.supabase.url.is_empty());
        assert!(config.require_remote().is_err());
    }

    #[test]
    fn test_api_key_override() {
        let mut config = CliConfig::default();
        config.supabase.api_key = "from-file".to_string();

        config.apply_api_key_override(Some("  ".to_string()));
        assert_eq!(config.supabase.api_key, "from-file");

        config.apply_api_key_override(Some("from-env".to_string()));
        assert_eq!(config.supabase.api_key, "from-env");
    }
}
