pub mod http;
pub mod webdriver;

use crate::error::FetchError;
use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::time::Duration;

pub use http::HttpFetcher;
pub use webdriver::WebDriverFetcher;

/// A single GET request issued by the crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl FetchRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Markup returned for a request
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final address after redirects
    pub url: String,
    pub body: String,
}

/// Anything that can turn a request into page markup
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchedPage, FetchError>;

    /// Release any held resources once the crawl is over
    async fn shutdown(&self) {}
}

/// Direct limiter that lets one request start per `delay`
///
/// A zero delay means requests are not spaced at all.
pub fn rate_limiter(delay: Duration) -> Option<DefaultDirectRateLimiter> {
    Quota::with_period(delay).map(RateLimiter::direct)
}
