use clap::Parser;
use std::error::Error;
use std::path::PathBuf;
use wiki_movies::Movies;
use wiki_movies::config::CrawlConfig;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to crawl configuration file (see demos/en_wiki.json)
    #[arg(short, long)]
    config: PathBuf,

    /// Override the record cap
    #[arg(short, long)]
    max_records: Option<usize>,

    /// Override max concurrency
    #[arg(short = 'n', long)]
    concurrency: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logger
    env_logger::init();

    // Parse command line arguments
    let args = Args::parse();

    // Load configuration from file
    let config = CrawlConfig::from_file(&args.config)?;

    println!("Crawl configuration:");
    println!("  Start URL: {}", config.start_url);
    println!("  Max records: {}", config.max_records);
    println!("  Max concurrency: {}", config.max_concurrency);
    println!("  Download delay: {}ms", config.download_delay_ms);
    println!("  Enrich ratings: {}", config.enrich_ratings);
    println!("  Backend: {:?}", config.backend);

    let mut movies_builder = Movies::new(&config.start_url).with_config(config);

    // Apply overrides if specified
    if let Some(max_records) = args.max_records {
        println!("Overriding max records: {}", max_records);
        movies_builder = movies_builder.with_max_records(max_records);
    }

    if let Some(concurrency) = args.concurrency {
        println!("Overriding max concurrency: {}", concurrency);
        movies_builder = movies_builder.with_max_concurrency(concurrency);
    }

    // Start the crawl
    let mut rx = movies_builder.generate().await?;

    let mut received = 0;
    let start_time = std::time::Instant::now();

    while let Some(record) = rx.recv().await {
        received += 1;
        println!("Received record {}: {:?}", received, record);
    }

    let duration = start_time.elapsed();
    println!(
        "Crawl complete. Received {} records in {:.2} seconds.",
        received,
        duration.as_secs_f64()
    );

    Ok(())
}
