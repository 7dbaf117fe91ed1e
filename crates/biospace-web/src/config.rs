//! Configuration loading for the BioSpace web service.
//! Reads biospace.toml from the current directory or the path in the
//! BIOSPACE_CONFIG env var. A missing file means built-in defaults.

use std::path::Path;

use biospace_llm::LlmSettings;
use biospace_search::actions::{SearchOptions, DEFAULT_MODEL};
use biospace_search::DEFAULT_API_BASE_URL;
use serde::{Deserialize, Serialize};
use tracing::info;

pub const CONFIG_ENV_VAR: &str = "BIOSPACE_CONFIG";
pub const API_BASE_URL_ENV_VAR: &str = "BIOSPACE_API_BASE_URL";
const DEFAULT_CONFIG_PATH: &str = "biospace.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub llm: LlmSettings,
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16    { 3001 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    #[serde(default = "default_dataset_path")]
    pub path: String,
}

fn default_dataset_path() -> String { "data/publications.json".to_string() }

impl Default for DatasetConfig {
    fn default() -> Self {
        Self { path: default_dataset_path() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_base_url")]
    pub base_url: String,
}

fn default_api_base_url() -> String { DEFAULT_API_BASE_URL.to_string() }

impl Default for ApiConfig {
    fn default() -> Self {
        Self { base_url: default_api_base_url() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_num_results")]
    pub default_num_results: u32,
    #[serde(default = "default_search_model")]
    pub default_model: String,
}

fn default_num_results()  -> u32    { 10 }
fn default_search_model() -> String { DEFAULT_MODEL.to_string() }

impl Default for SearchConfig {
    fn default() -> Self {
        Self { default_num_results: default_num_results(), default_model: default_search_model() }
    }
}

impl Config {
    /// Load configuration, honouring `.env`, BIOSPACE_CONFIG and
    /// BIOSPACE_API_BASE_URL.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let path = std::env::var(CONFIG_ENV_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let config = Self::from_path(&path)?;
        Ok(config.with_overrides(|var| std::env::var(var).ok()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Apply environment overrides through `lookup`.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(API_BASE_URL_ENV_VAR).filter(|u| !u.trim().is_empty()) {
            self.api.base_url = url;
        }
        self
    }

    /// Default per-query search options. The API key is the one the flows
    /// use, so the remote service can call the same model.
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            num_results: self.search.default_num_results,
            use_llm: true,
            model_name: self.search.default_model.clone(),
            api_key: self.llm.resolve_api_key(),
        }
    }
}
