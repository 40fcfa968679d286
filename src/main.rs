use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use wiki_movies::Movies;
use wiki_movies::config::CrawlConfig;
use wiki_movies::output::RecordWriter;

mod args;
use args::Args;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    let base = match &args.config {
        Some(path) => match CrawlConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                ::log::error!("Failed to load config {}: {}", path.display(), e);
                std::process::exit(2);
            }
        },
        None => CrawlConfig::default(),
    };
    let config = args.apply(base);

    ::log::info!(
        "Crawling {} (max {} records, ratings {})",
        config.start_url,
        config.max_records,
        if config.enrich_ratings { "on" } else { "off" }
    );

    let sink: Box<dyn Write> = match &args.output {
        Some(path) => match File::create(path) {
            Ok(file) => Box::new(BufWriter::new(file)),
            Err(e) => {
                ::log::error!("Failed to create {}: {}", path.display(), e);
                std::process::exit(2);
            }
        },
        None => Box::new(BufWriter::new(io::stdout())),
    };
    let mut writer = match RecordWriter::new(sink, args.output_format(), args.csv_bom) {
        Ok(writer) => writer,
        Err(e) => {
            ::log::error!("Failed to start output: {}", e);
            std::process::exit(2);
        }
    };

    let mut rx = match Movies::new(&config.start_url).with_config(config).generate().await {
        Ok(rx) => rx,
        Err(e) => {
            ::log::error!("Failed to start crawler: {}", e);
            std::process::exit(1);
        }
    };

    let mut written = 0usize;
    while let Some(record) = rx.recv().await {
        match writer.write(&record) {
            Ok(()) => written += 1,
            Err(e) => ::log::error!("Failed to write record {:?}: {}", record.title, e),
        }
    }
    if let Err(e) = writer.finish() {
        ::log::error!("Failed to flush output: {}", e);
    }

    ::log::info!("Wrote {} record(s)", written);
}
