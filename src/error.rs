use thiserror::Error;

/// Failure of a single page fetch
///
/// A fetch error never aborts the crawl; the target that produced it is
/// dropped (or, for enrichment, its carried record is emitted as is).
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("webdriver error: {0}")]
    WebDriver(String),

    #[error("no webdriver session available at {0}")]
    NoSession(String),

    #[error("invalid url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Errors that prevent a crawl from starting at all
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("invalid start url {url}: {source}")]
    InvalidStartUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("start url {0} has no host")]
    MissingHost(String),

    #[error("invalid link pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("failed to build fetcher: {0}")]
    Fetcher(#[from] FetchError),
}
