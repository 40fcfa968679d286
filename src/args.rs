use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use wiki_movies::config::{CrawlConfig, FetchBackend};
use wiki_movies::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "wiki-movies")]
#[command(about = "Harvests movie records from a Wikipedia category tree")]
#[command(version)]
pub struct Args {
    /// Category page to start from (defaults to the Russian "films by alphabet" category)
    pub start_url: Option<String>,

    /// JSON configuration file; command-line options override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Maximum number of records to emit
    #[arg(short, long)]
    pub max_records: Option<usize>,

    /// Fetch an IMDb rating for every record that links to one
    #[arg(long)]
    pub enrich_ratings: bool,

    /// Only walk the start listing and its pagination
    #[arg(long)]
    pub no_subcategories: bool,

    /// Number of concurrent requests
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Delay between requests in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Fetch layer to use
    #[arg(short, long, value_enum)]
    pub backend: Option<BackendArg>,

    /// Write records here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format (defaults to csv for a .csv output file, jsonl otherwise)
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,

    /// Prefix CSV output with a UTF-8 byte order mark
    #[arg(long)]
    pub csv_bom: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Csv,
    Jsonl,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum BackendArg {
    Http,
    Webdriver,
}

impl Args {
    /// Output format: explicit flag first, then the output file extension
    pub fn output_format(&self) -> OutputFormat {
        match (self.format, &self.output) {
            (Some(FormatArg::Csv), _) => OutputFormat::Csv,
            (Some(FormatArg::Jsonl), _) => OutputFormat::JsonLines,
            (None, Some(path)) => OutputFormat::from_path(path),
            (None, None) => OutputFormat::JsonLines,
        }
    }

    /// Overlay the command-line options on a base configuration
    pub fn apply(&self, mut config: CrawlConfig) -> CrawlConfig {
        if let Some(url) = &self.start_url {
            config.start_url = url.clone();
        }
        if let Some(max) = self.max_records {
            config.max_records = max;
        }
        if self.enrich_ratings {
            config.enrich_ratings = true;
        }
        if self.no_subcategories {
            config.follow_subcategories = false;
        }
        if let Some(concurrency) = self.concurrency {
            config.max_concurrency = concurrency;
        }
        if let Some(delay) = self.delay_ms {
            config.download_delay_ms = delay;
        }
        if let Some(backend) = self.backend {
            config.backend = match backend {
                BackendArg::Http => FetchBackend::Http,
                BackendArg::Webdriver => FetchBackend::WebDriver,
            };
        }

        // Override the WebDriver URL with an environment variable if provided
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                config.webdriver_url = webdriver_url;
            }
        }
        config
    }
}
