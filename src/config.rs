use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// Top-level scraper configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ScraperConfig {
    /// Page and image download settings
    #[serde(default)]
    pub fetch: FetchConfig,
    /// Image filtering and download limits
    #[serde(default)]
    pub images: ImageConfig,
}

/// Settings for outgoing HTTP requests
#[derive(Debug, Deserialize, Clone)]
pub struct FetchConfig {
    /// Page fetch timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Accept-Language header value
    #[serde(default = "default_accept_language")]
    pub accept_language: String,
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
        }
    }
}

/// Settings for image harvesting and downloading
#[derive(Debug, Deserialize, Clone)]
pub struct ImageConfig {
    /// Largest image accepted by the downloader, in bytes
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,
    /// Declared width/height below which a page image is ignored
    #[serde(default = "default_min_dimension")]
    pub min_dimension: u32,
    /// Stricter size floor used by the image picker listing
    #[serde(default = "default_candidate_min_dimension")]
    pub candidate_min_dimension: u32,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_bytes: default_max_bytes(),
            min_dimension: default_min_dimension(),
            candidate_min_dimension: default_candidate_min_dimension(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string()
}

fn default_accept_language() -> String {
    "en-US,en;q=0.9".to_string()
}

fn default_max_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_min_dimension() -> u32 {
    50
}

fn default_candidate_min_dimension() -> u32 {
    100
}

impl ScraperConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_SCRAPER__ prefix
    /// 2. recipe-scraper.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_SCRAPER__FETCH__TIMEOUT_SECS
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("recipe-scraper").required(false))
            .add_source(
                Environment::with_prefix("RECIPE_SCRAPER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}
