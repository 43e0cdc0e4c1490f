use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Application configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the board API
    pub base_url: String,

    /// Path of the count endpoint
    pub count_path: String,

    /// Path of the list endpoint
    pub list_path: String,

    /// Page size used when a list view activates
    pub default_page_size: usize,

    /// Ceiling for user-chosen page sizes
    pub max_page_size: usize,

    /// Rows revealed per scroll step
    pub reveal_chunk_size: usize,

    /// Maximum rows rendered for one page
    pub reveal_cap: usize,

    /// Distance from the bottom, in pixels, that counts as "near the end"
    pub scroll_threshold: f64,

    /// Timeout for each request to the board API
    pub request_timeout_secs: u64,

    /// Display name of the signed-in user
    pub user_name: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            count_path: "/api/posts/count".to_string(),
            list_path: "/api/posts".to_string(),
            default_page_size: 100,
            max_page_size: 1000,
            reveal_chunk_size: 50,
            reveal_cap: 500,
            scroll_threshold: 100.0,
            request_timeout_secs: 30,
            user_name: None,
        }
    }
}

impl Config {
    /// Initialize configuration from various sources
    pub async fn init(explicit_path: Option<&Path>) -> Result<Self> {
        debug!("Initializing configuration");

        let mut config = match explicit_path {
            Some(path) => Self::load_from_path(path).await?,
            None => Self::load_from_file().await?.unwrap_or_default(),
        };

        // Environment wins over files
        config.load_from_env();

        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(&mut self) {
        self.apply_env(|key| std::env::var(key).ok());
    }

    fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("BOARDLIST_BASE_URL") {
            self.base_url = url;
        }

        if let Some(size) = lookup("BOARDLIST_PAGE_SIZE").and_then(|s| s.parse().ok()) {
            self.default_page_size = size;
        }

        if let Some(size) = lookup("BOARDLIST_MAX_PAGE_SIZE").and_then(|s| s.parse().ok()) {
            self.max_page_size = size;
        }

        if let Some(chunk) = lookup("BOARDLIST_REVEAL_CHUNK").and_then(|s| s.parse().ok()) {
            self.reveal_chunk_size = chunk;
        }

        if let Some(cap) = lookup("BOARDLIST_REVEAL_CAP").and_then(|s| s.parse().ok()) {
            self.reveal_cap = cap;
        }

        if let Some(secs) = lookup("BOARDLIST_TIMEOUT").and_then(|s| s.parse().ok()) {
            self.request_timeout_secs = secs;
        }

        if let Some(user) = lookup("BOARDLIST_USER") {
            self.user_name = Some(user);
        }
    }

    /// Load configuration from the first boardlist.json found.
    ///
    /// `Ok(None)` means no file exists; a file that exists but does not parse
    /// is an error.
    pub async fn load_from_file() -> Result<Option<Self>> {
        // 1. ./.boardlist.json
        // 2. ./boardlist.json
        // 3. $CONFIG_DIR/boardlist/boardlist.json
        let mut config_paths = vec![
            PathBuf::from("./.boardlist.json"),
            PathBuf::from("./boardlist.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            config_paths.push(config_dir.join("boardlist").join("boardlist.json"));
        }

        Self::load_first_existing(&config_paths).await
    }

    async fn load_first_existing(paths: &[PathBuf]) -> Result<Option<Self>> {
        match paths.iter().find(|path| path.exists()) {
            Some(path) => Self::load_from_path(path).await.map(Some),
            None => {
                debug!("No configuration file found, using defaults");
                Ok(None)
            }
        }
    }

    /// Load configuration from a specific file
    pub async fn load_from_path(path: &Path) -> Result<Self> {
        debug!("Loading configuration from: {}", path.display());
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(anyhow::anyhow!("base_url is required"));
        }

        if self.max_page_size == 0 {
            return Err(anyhow::anyhow!("max_page_size must be greater than 0"));
        }

        if self.default_page_size == 0 || self.default_page_size > self.max_page_size {
            return Err(anyhow::anyhow!(
                "default_page_size must be between 1 and {}",
                self.max_page_size
            ));
        }

        if self.reveal_chunk_size == 0 {
            return Err(anyhow::anyhow!("reveal_chunk_size must be greater than 0"));
        }

        if self.reveal_cap == 0 {
            return Err(anyhow::anyhow!("reveal_cap must be greater than 0"));
        }

        if self.scroll_threshold.is_nan() || self.scroll_threshold < 0.0 {
            return Err(anyhow::anyhow!("scroll_threshold must not be negative"));
        }

        Ok(())
    }
}
