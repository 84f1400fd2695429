use serde::Deserialize;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB API key. Optional: without it the catalog endpoints still work,
    /// but enrichment endpoints report a missing-credential error.
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// TMDB poster image base URL
    #[serde(default = "default_tmdb_image_url")]
    pub tmdb_image_url: String,

    /// Path to the movie catalog CSV (columns: title, movie_id)
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Path to the JSON-serialized similarity matrix
    #[serde(default = "default_similarity_path")]
    pub similarity_path: String,

    /// Number of recommendations returned when the client does not ask for a count
    #[serde(default = "default_recommendation_count")]
    pub default_recommendation_count: usize,

    /// Per-request timeout for metadata fetches, in seconds
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Total attempts per metadata fetch (first try included)
    #[serde(default = "default_fetch_attempts")]
    pub fetch_attempts: u32,

    /// Initial backoff delay between fetch attempts, in seconds (doubles each retry)
    #[serde(default = "default_retry_base_delay_secs")]
    pub retry_base_delay_secs: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_url() -> String {
    "http://image.tmdb.org/t/p/w500".to_string()
}

fn default_catalog_path() -> String {
    "movie_info.csv".to_string()
}

fn default_similarity_path() -> String {
    "similarity.json".to_string()
}

fn default_recommendation_count() -> usize {
    10
}

fn default_fetch_timeout_secs() -> u64 {
    10
}

fn default_fetch_attempts() -> u32 {
    3
}

fn default_retry_base_delay_secs() -> u64 {
    2
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_secs(self.retry_base_delay_secs)
    }
}
