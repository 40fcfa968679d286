use crate::config::{CrawlConfig, FetchBackend};
use crate::crawlers::engine::{CrawlTarget, Engine, EngineOptions, TargetState};
use crate::error::CrawlError;
use crate::fetch::{Fetcher, HttpFetcher, WebDriverFetcher};
use crate::filter::{LinkFilter, LinkFilterConfig};
use crate::results::Record;
use crate::state::CrawlState;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use url::Url;

/// Starts an async crawl and returns a receiver that yields records as they complete.
///
/// The receiver closes once the cap is reached and in-flight work has
/// drained, or when the category tree is exhausted.
pub async fn start(config: &CrawlConfig) -> Result<mpsc::Receiver<Record>, CrawlError> {
    let fetcher = build_fetcher(config)?;
    start_with_fetcher(config, fetcher)
}

/// Same as [`start`], with a caller-supplied fetch layer
pub fn start_with_fetcher(
    config: &CrawlConfig,
    fetcher: Arc<dyn Fetcher>,
) -> Result<mpsc::Receiver<Record>, CrawlError> {
    ::log::info!("Starting crawl at: {}", config.start_url);

    let root_url = Url::parse(&config.start_url).map_err(|source| CrawlError::InvalidStartUrl {
        url: config.start_url.clone(),
        source,
    })?;
    let host = root_url
        .host_str()
        .ok_or_else(|| CrawlError::MissingHost(config.start_url.clone()))?
        .to_string();

    let filter = LinkFilter::new(LinkFilterConfig {
        required_host: Some(host),
        category_prefixes: config.category_prefixes.clone(),
        ..LinkFilterConfig::default()
    })?;
    let options = EngineOptions {
        enrich_ratings: config.enrich_ratings,
        follow_subcategories: config.follow_subcategories,
        next_page_labels: config.next_page_labels.clone(),
    };
    let engine = Arc::new(Engine::new(
        CrawlState::new(config.max_records),
        filter,
        config.labels.clone(),
        config.rating.clone(),
        options,
    ));

    let (result_tx, result_rx) = mpsc::channel::<Record>(1000);
    let semaphore = Arc::new(Semaphore::new(config.max_concurrency.max(1)));
    let seed = engine.seed(&root_url);

    tokio::spawn(dispatch(engine, fetcher, semaphore, result_tx, seed));

    Ok(result_rx)
}

/// Builds the fetch layer selected in the configuration
fn build_fetcher(config: &CrawlConfig) -> Result<Arc<dyn Fetcher>, CrawlError> {
    let delay = Duration::from_millis(config.download_delay_ms);
    let fetcher: Arc<dyn Fetcher> = match config.backend {
        FetchBackend::Http => Arc::new(HttpFetcher::new(
            &config.user_agent,
            Duration::from_secs(config.request_timeout_secs),
            delay,
        )?),
        FetchBackend::WebDriver => Arc::new(WebDriverFetcher::new(&config.webdriver_url, delay)),
    };
    Ok(fetcher)
}

/// Drives the crawl until no target is queued or in flight
///
/// Targets are spawned as soon as they are discovered; the semaphore bounds
/// how many of them fetch at the same time.
async fn dispatch(
    engine: Arc<Engine>,
    fetcher: Arc<dyn Fetcher>,
    semaphore: Arc<Semaphore>,
    result_tx: mpsc::Sender<Record>,
    seed: CrawlTarget,
) {
    let started = std::time::Instant::now();
    let mut queue = VecDeque::from([seed]);
    let mut in_flight = JoinSet::new();

    loop {
        while let Some(target) = queue.pop_front() {
            in_flight.spawn(process_target(
                Arc::clone(&engine),
                Arc::clone(&fetcher),
                Arc::clone(&semaphore),
                result_tx.clone(),
                target,
            ));
        }

        match in_flight.join_next().await {
            Some(Ok(discovered)) => queue.extend(discovered),
            Some(Err(e)) => ::log::error!("Crawl task failed: {}", e),
            None => break,
        }
    }

    fetcher.shutdown().await;
    ::log::info!(
        "Crawl complete - {} record(s) in {:.2} seconds",
        engine.state().emitted(),
        started.elapsed().as_secs_f64()
    );
    // result_tx drops here, closing the receiver
}

/// Fetches one target, runs its handler and returns the targets it produced
async fn process_target(
    engine: Arc<Engine>,
    fetcher: Arc<dyn Fetcher>,
    semaphore: Arc<Semaphore>,
    result_tx: mpsc::Sender<Record>,
    target: CrawlTarget,
) -> Vec<CrawlTarget> {
    let Ok(_permit) = semaphore.acquire().await else {
        return Vec::new();
    };
    if !engine.should_fetch(&target) {
        ::log::debug!("Cap reached, not fetching {}", target.url());
        return Vec::new();
    }

    let request = engine.request_for(&target);
    let step = match fetcher.fetch(&request).await {
        Ok(page) => engine.on_document(target, &page),
        Err(e) => engine.on_fetch_failure(target, &e),
    };

    ::log::trace!("Target finished as {:?}", step.state);
    if let Some(record) = step.record {
        if step.state == TargetState::Emitted {
            ::log::info!("Emitting record: {}", record.title);
        }
        if let Err(e) = result_tx.send(record).await {
            ::log::error!("Failed to send record: {}", e);
        }
    }
    step.targets
}
