use crate::error::FetchError;
use crate::fetch::{FetchRequest, FetchedPage, Fetcher, rate_limiter};
use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder};
use governor::DefaultDirectRateLimiter;
use std::time::Duration;
use tokio::sync::Mutex;

/// Endpoints tried when the configured WebDriver URL does not answer
const FALLBACK_WEBDRIVER_URLS: [&str; 4] = [
    "http://localhost:9515", // ChromeDriver default
    "http://localhost:4723", // Appium default
    "http://localhost:9222", // Chrome debug port default
    "http://127.0.0.1:4444",
];

/// Fetches pages through a browser driven over WebDriver
///
/// Sessions are opened lazily and pooled; each fetch borrows one session for
/// the duration of a navigation. WebDriver cannot set request headers, so
/// any headers on the request are ignored.
pub struct WebDriverFetcher {
    webdriver_url: String,
    sessions: Mutex<Vec<Client>>,
    rate_limiter: Option<DefaultDirectRateLimiter>,
}

impl WebDriverFetcher {
    pub fn new(webdriver_url: &str, delay: Duration) -> Self {
        Self {
            webdriver_url: webdriver_url.to_string(),
            sessions: Mutex::new(Vec::new()),
            rate_limiter: rate_limiter(delay),
        }
    }

    async fn checkout(&self) -> Result<Client, FetchError> {
        if let Some(client) = self.sessions.lock().await.pop() {
            return Ok(client);
        }
        connect_to_webdriver(&self.webdriver_url)
            .await
            .ok_or_else(|| FetchError::NoSession(self.webdriver_url.clone()))
    }

    async fn checkin(&self, client: Client) {
        self.sessions.lock().await.push(client);
    }
}

#[async_trait]
impl Fetcher for WebDriverFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchedPage, FetchError> {
        if !request.headers.is_empty() {
            ::log::debug!(
                "WebDriver ignores {} request header(s) for {}",
                request.headers.len(),
                request.url
            );
        }

        let client = self.checkout().await?;
        if let Some(limiter) = &self.rate_limiter {
            limiter.until_ready().await;
        }

        let result = navigate(&client, &request.url).await;
        match &result {
            Err(FetchError::WebDriver(message)) if message.contains("Unable to find session") => {
                ::log::warn!("Lost WebDriver session while loading {}", request.url);
            }
            _ => self.checkin(client).await,
        }
        result
    }

    async fn shutdown(&self) {
        let sessions = std::mem::take(&mut *self.sessions.lock().await);
        for client in sessions {
            if let Err(e) = client.close().await {
                ::log::warn!("Failed to close WebDriver session: {}", e);
            }
        }
    }
}

async fn navigate(client: &Client, url: &str) -> Result<FetchedPage, FetchError> {
    client
        .goto(url)
        .await
        .map_err(|e| FetchError::WebDriver(e.to_string()))?;
    let body = client
        .source()
        .await
        .map_err(|e| FetchError::WebDriver(e.to_string()))?;
    let final_url = match client.current_url().await {
        Ok(current) => current.to_string(),
        Err(_) => url.to_string(),
    };
    Ok(FetchedPage {
        url: final_url,
        body,
    })
}

/// Connects to the WebDriver instance, trying common alternatives on failure
async fn connect_to_webdriver(webdriver_url: &str) -> Option<Client> {
    match ClientBuilder::native().connect(webdriver_url).await {
        Ok(client) => {
            ::log::debug!("Connected to WebDriver at {}", webdriver_url);
            return Some(client);
        }
        Err(e) => {
            ::log::error!("Failed to connect to WebDriver at {}: {}", webdriver_url, e);
        }
    }

    for url in FALLBACK_WEBDRIVER_URLS {
        if url == webdriver_url {
            continue;
        }
        ::log::info!("Trying fallback WebDriver URL: {}", url);
        if let Ok(client) = ClientBuilder::native().connect(url).await {
            ::log::debug!("Connected to fallback WebDriver at {}", url);
            return Some(client);
        }
    }

    ::log::error!(
        "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
    );
    None
}
