use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

/// One regional backend deployment.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Endpoint {
    /// Logical name, stamped onto merged provider records as `sourceApi`.
    pub name: String,
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    /// Regional deployments; the first entry is the primary (snapshot)
    /// source, all entries contribute to the provider catalog merge.
    pub endpoints: Vec<Endpoint>,
    /// Display currency all totals are normalized into.
    pub currency: String,
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

fn default_fetch_timeout_secs() -> u64 {
    DEFAULT_FETCH_TIMEOUT_SECS
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("app", "wealthlens", "wealthlens")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn primary_endpoint(&self) -> Result<&Endpoint> {
        self.endpoints
            .first()
            .context("No endpoints configured; run `wealthlens setup` first")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
endpoints:
  - name: "uae"
    base_url: "https://api.uae.wealthlens.app"
    api_key: "k-1"
  - name: "ksa"
    base_url: "https://api.ksa.wealthlens.app"
currency: "USD"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.endpoints.len(), 2);
        assert_eq!(config.endpoints[0].name, "uae");
        assert_eq!(config.endpoints[0].api_key.as_deref(), Some("k-1"));
        assert_eq!(config.endpoints[1].api_key, None);
        assert_eq!(config.currency, "USD");
        assert_eq!(config.fetch_timeout_secs, 10);
        assert_eq!(config.primary_endpoint().unwrap().name, "uae");
    }

    #[test]
    fn test_explicit_timeout_overrides_default() {
        let yaml_str = r#"
endpoints:
  - name: "uae"
    base_url: "http://localhost:9000"
currency: "AED"
fetch_timeout_secs: 3
"#;
        let config: AppConfig = serde_yaml::from_str(yaml_str).unwrap();
        assert_eq!(config.fetch_timeout_secs, 3);
    }

    #[test]
    fn test_empty_endpoint_list_has_no_primary() {
        let config: AppConfig = serde_yaml::from_str("endpoints: []\ncurrency: USD\n").unwrap();
        assert!(config.primary_endpoint().is_err());
    }
}
