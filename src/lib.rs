// Re-export modules
pub mod config;
pub mod crawlers;
pub mod document;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod filter;
pub mod output;
pub mod results;
pub mod state;
pub mod utils;

// Re-export commonly used types for convenience
pub use error::{CrawlError, FetchError};
pub use results::Record;

use config::CrawlConfig;
use fetch::Fetcher;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Main builder for a movie crawl
pub struct Movies {
    config: CrawlConfig,
    fetcher: Option<Arc<dyn Fetcher>>,
}

impl Movies {
    /// Create a new builder starting at the given category page
    pub fn new(start_url: &str) -> Self {
        Self {
            config: CrawlConfig::new(start_url),
            fetcher: None,
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: CrawlConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a file
    pub fn with_config_file(
        self,
        path: impl AsRef<std::path::Path>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let config = CrawlConfig::from_file(path)?;
        Ok(self.with_config(config))
    }

    /// Load configuration from a string
    pub fn with_config_str(self, config_str: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config = CrawlConfig::from_json(config_str)?;
        Ok(self.with_config(config))
    }

    /// Set the maximum number of records to emit
    pub fn with_max_records(mut self, max_records: usize) -> Self {
        self.config.max_records = max_records;
        self
    }

    /// Enable or disable rating enrichment
    pub fn with_enrich_ratings(mut self, enrich: bool) -> Self {
        self.config.enrich_ratings = enrich;
        self
    }

    /// Set the maximum number of concurrent requests
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.config.max_concurrency = max_concurrency;
        self
    }

    /// Use a custom fetch layer instead of the configured backend
    pub fn with_fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    /// Start the crawler and get a receiver for records
    pub async fn generate(self) -> Result<mpsc::Receiver<Record>, CrawlError> {
        match self.fetcher {
            Some(fetcher) => crawlers::web::start_with_fetcher(&self.config, fetcher),
            None => crawlers::web::start(&self.config).await,
        }
    }
}
