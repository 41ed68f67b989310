/// Runtime configuration resolved from the environment.
///
/// CLI flags override individual fields after resolution; see `main.rs`.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{ExplorerError, Result};

pub const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct Config {
    /// YouTube Data API key (`YOUTUBE_API_KEY`); only the fetch needs it
    pub api_key: Option<String>,
    /// API root (`YTC_API_BASE_URL`)
    pub api_base_url: String,
    /// Toxicity classifier endpoint (`YTC_TOXICITY_URL`); no classifier when unset
    pub toxicity_url: Option<String>,
    /// Directory for log files (`YTC_LOG_DIR`); stderr when unset
    pub log_dir: Option<PathBuf>,
    /// Comments per page (`YTC_PAGE_SIZE`)
    pub page_size: usize,
    pub http_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            toxicity_url: None,
            log_dir: None,
            page_size: DEFAULT_PAGE_SIZE,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }
}

impl Config {
    /// Builds the configuration from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Config::default();
        config.api_key = get("YOUTUBE_API_KEY");
        if let Some(base) = get("YTC_API_BASE_URL") {
            config.api_base_url = base.trim_end_matches('/').to_string();
        }
        config.toxicity_url = get("YTC_TOXICITY_URL");
        config.log_dir = get("YTC_LOG_DIR").map(PathBuf::from);
        if let Some(size) = get("YTC_PAGE_SIZE") {
            config.page_size = parse_page_size(&size)?;
        }

        Ok(config)
    }

    /// Returns the API key or an `UpstreamConfig` error when it is missing.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            ExplorerError::UpstreamConfig("YouTube API key is not configured".to_string())
        })
    }
}

fn parse_page_size(raw: &str) -> Result<usize> {
    match raw.parse::<usize>() {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(ExplorerError::Validation(format!(
            "Invalid YTC_PAGE_SIZE '{}': expected a positive integer",
            raw
        ))),
    }
}
