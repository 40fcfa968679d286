use clap::Parser;
use std::error::Error;
use wiki_movies::Movies;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Category page to start from
    #[arg(short, long)]
    url: String,

    /// Maximum number of records to emit
    #[arg(short, long, default_value_t = 10)]
    max_records: usize,

    /// Maximum concurrency level
    #[arg(short, long)]
    concurrency: Option<usize>,

    /// Fetch IMDb ratings for the harvested movies
    #[arg(short, long)]
    ratings: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logger
    env_logger::init();

    // Parse command line arguments
    let args = Args::parse();

    println!("Starting crawl at category: {}", args.url);

    // Create a Movies builder for the category
    let mut movies_builder = Movies::new(&args.url)
        .with_max_records(args.max_records)
        .with_enrich_ratings(args.ratings);

    if let Some(concurrency) = args.concurrency {
        println!("Overriding max concurrency: {}", concurrency);
        movies_builder = movies_builder.with_max_concurrency(concurrency);
    }

    // Start the crawl
    let mut rx = movies_builder.generate().await?;

    // Process records as they come in
    let mut received = 0;
    let start_time = std::time::Instant::now();

    while let Some(record) = rx.recv().await {
        received += 1;
        println!(
            "Record {}: {} ({}) directed by {} rating {}",
            received,
            record.title,
            record.year,
            record.director,
            if record.rating.is_empty() { "-" } else { record.rating.as_str() }
        );
    }

    let duration = start_time.elapsed();
    println!(
        "Crawl complete. Received {} records in {:.2} seconds.",
        received,
        duration.as_secs_f64()
    );

    Ok(())
}
