use crate::extract::InfoboxLabels;
use crate::extract::rating::RatingSite;
use crate::filter::default_category_prefixes;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Which fetch layer carries the crawl's requests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchBackend {
    /// Plain HTTP requests
    #[default]
    Http,
    /// A browser driven over WebDriver
    WebDriver,
}

/// Configuration for a crawl run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// Category page to start from
    #[serde(default = "default_start_url")]
    pub start_url: String,

    /// Maximum number of records to emit
    #[serde(default = "default_max_records")]
    pub max_records: usize,

    /// Whether to fetch a rating for every record that has an external id
    #[serde(default)]
    pub enrich_ratings: bool,

    /// Whether to descend into subcategories or only walk the start listing
    #[serde(default = "default_follow_subcategories")]
    pub follow_subcategories: bool,

    /// Maximum number of concurrent requests
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Minimum delay between request starts, in milliseconds
    #[serde(default = "default_download_delay_ms")]
    pub download_delay_ms: u64,

    /// Per-request timeout for the HTTP backend, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default)]
    pub backend: FetchBackend,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Site that ratings are fetched from
    #[serde(default)]
    pub rating: RatingSite,

    /// Infobox header labels per field
    #[serde(default)]
    pub labels: InfoboxLabels,

    /// Path prefixes of the category namespace
    #[serde(default = "default_category_prefixes")]
    pub category_prefixes: Vec<String>,

    /// Texts of the "next page" link on category listings
    #[serde(default = "default_next_page_labels")]
    pub next_page_labels: Vec<String>,
}

fn default_start_url() -> String {
    "https://ru.wikipedia.org/wiki/Категория:Фильмы_по_алфавиту".to_string()
}

fn default_max_records() -> usize {
    200
}

fn default_follow_subcategories() -> bool {
    true
}

fn default_max_concurrency() -> usize {
    4
}

fn default_download_delay_ms() -> u64 {
    700
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!(
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 ",
        "(KHTML, like Gecko) Chrome/120.0 Safari/537.36"
    )
    .to_string()
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_next_page_labels() -> Vec<String> {
    vec!["Следующая страница".to_string(), "next page".to_string()]
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self::new(&default_start_url())
    }
}

impl CrawlConfig {
    /// Create a new configuration with default values
    pub fn new(start_url: &str) -> Self {
        Self {
            start_url: start_url.to_string(),
            max_records: default_max_records(),
            enrich_ratings: false,
            follow_subcategories: default_follow_subcategories(),
            max_concurrency: default_max_concurrency(),
            download_delay_ms: default_download_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: default_user_agent(),
            backend: FetchBackend::default(),
            webdriver_url: default_webdriver_url(),
            rating: RatingSite::default(),
            labels: InfoboxLabels::default(),
            category_prefixes: default_category_prefixes(),
            next_page_labels: default_next_page_labels(),
        }
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, Box<dyn Error>> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }
}
