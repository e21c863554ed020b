use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use reader_engine::FetchSettings;
use reader_logging::reader_info;
use serde::{Deserialize, Serialize};

use crate::cli::Cli;

/// Looked up in the working directory when `--config` is not given.
pub const CONFIG_FILENAME: &str = "rssreader.ron";
pub const DEFAULT_FEED: &str = "https://blog.jetbrains.com/kotlin/feed/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub default_feeds: Vec<String>,
    pub cache_dir: PathBuf,
    pub cache_file: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_bytes: u64,
    /// Accepted response media types; an empty list accepts any.
    pub allowed_content_types: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let fetch = FetchSettings::default();
        Self {
            default_feeds: vec![DEFAULT_FEED.to_string()],
            cache_dir: PathBuf::from(".rssreader"),
            cache_file: "feed_cache.json".to_string(),
            connect_timeout_secs: fetch.connect_timeout.as_secs(),
            request_timeout_secs: fetch.request_timeout.as_secs(),
            max_bytes: fetch.max_bytes,
            allowed_content_types: fetch.allowed_content_types,
        }
    }
}

impl AppConfig {
    /// Reads `path`, or `./rssreader.ron` if it exists, or falls back to defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let implicit = PathBuf::from(CONFIG_FILENAME);
                if !implicit.exists() {
                    return Ok(Self::default());
                }
                implicit
            }
        };

        let content = fs::read_to_string(&path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = Self::from_ron(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        reader_info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn from_ron(content: &str) -> anyhow::Result<Self> {
        Ok(ron::from_str(content)?)
    }

    pub fn to_ron(&self) -> anyhow::Result<String> {
        let pretty = ron::ser::PrettyConfig::new();
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }

    /// Command-line flags win over file values.
    pub fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(dir) = &cli.cache_dir {
            self.cache_dir = dir.clone();
        }
        if !cli.default_feeds.is_empty() {
            self.default_feeds = cli.default_feeds.clone();
        }
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_bytes: self.max_bytes,
            allowed_content_types: self.allowed_content_types.clone(),
            ..FetchSettings::default()
        }
    }
}
