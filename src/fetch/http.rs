use crate::error::FetchError;
use crate::fetch::{FetchRequest, FetchedPage, Fetcher, rate_limiter};
use async_trait::async_trait;
use governor::DefaultDirectRateLimiter;
use reqwest::Client;
use std::time::Duration;

/// Plain HTTP fetcher backed by a shared reqwest client
pub struct HttpFetcher {
    client: Client,
    rate_limiter: Option<DefaultDirectRateLimiter>,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration, delay: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            rate_limiter: rate_limiter(delay),
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchedPage, FetchError> {
        let url = reqwest::Url::parse(&request.url).map_err(|source| FetchError::InvalidUrl {
            url: request.url.clone(),
            source,
        })?;

        if let Some(limiter) = &self.rate_limiter {
            limiter.until_ready().await;
        }
        ::log::debug!("GET {}", url);

        let mut builder = self.client.get(url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: request.url.clone(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().to_string();
        let body = response.text().await?;
        Ok(FetchedPage {
            url: final_url,
            body,
        })
    }
}
