use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const PLACEHOLDER_BASE_URL: &str = "https://YOUR_PROJECT.supabase.co/functions/v1/YOUR_FUNCTION";
const PLACEHOLDER_API_KEY: &str = "YOUR_ANON_KEY";

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    pub remote: RemoteConfig,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the key-value HTTP API lives and how to authenticate against it.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RemoteConfig {
    pub base_url: String,
    pub api_key: String,
    /// Per-request timeout; 0 leaves the transport default in place.
    #[serde(default)]
    pub timeout_seconds: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Density {
    Compact,
    #[default]
    Wide,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ViewConfig {
    #[serde(default = "default_page_size_compact")]
    pub page_size_compact: usize,
    #[serde(default = "default_page_size_wide")]
    pub page_size_wide: usize,
    #[serde(default)]
    pub density: Density,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct LoggingConfig {
    /// Daily-rolling log file; stderr when unset.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_page_size_compact() -> usize {
    12
}

fn default_page_size_wide() -> usize {
    15
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            page_size_compact: default_page_size_compact(),
            page_size_wide: default_page_size_wide(),
            density: Density::default(),
        }
    }
}

impl ViewConfig {
    pub fn page_size(&self, density: Density) -> usize {
        match density {
            Density::Compact => self.page_size_compact,
            Density::Wide => self.page_size_wide,
        }
    }

    pub fn default_page_size(&self) -> usize {
        self.page_size(self.density)
    }
}

impl RemoteConfig {
    pub fn placeholder() -> Self {
        Self {
            base_url: PLACEHOLDER_BASE_URL.to_string(),
            api_key: PLACEHOLDER_API_KEY.to_string(),
            timeout_seconds: 0,
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.base_url.is_empty()
            && self.base_url != PLACEHOLDER_BASE_URL
            && !self.api_key.is_empty()
            && self.api_key != PLACEHOLDER_API_KEY
    }
}

impl Config {
    /// A starter config with placeholder credentials, written by `config init`.
    pub fn template() -> Self {
        Self {
            remote: RemoteConfig::placeholder(),
            view: ViewConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    pub fn load_from_file(path: &PathBuf) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.remote.is_configured() {
            return Err(anyhow::anyhow!("remote.base_url and remote.api_key must be configured"));
        }

        let url = self.remote.base_url.as_str();
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(anyhow::anyhow!("remote.base_url must be an http(s) URL: {}", url));
        }

        if self.view.page_size_compact == 0 || self.view.page_size_wide == 0 {
            return Err(anyhow::anyhow!("view page sizes must be greater than zero"));
        }

        Ok(())
    }
}
