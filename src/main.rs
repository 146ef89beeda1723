extern crate chrono;
extern crate diesel;
extern crate tokio;

use std::env;
use std::sync::Arc;

use anyhow::Result;
use log::info;

use renthunt::bot::notify::TelegramNotifier;
use renthunt::config::{self, Config};
use renthunt::db::seen_listing::SqliteDedupStore;
use renthunt::db::DedupStore;
use renthunt::logger::setup_logger;
use renthunt::scan;
use renthunt::scrapers;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger
    setup_logger()?;

    let config: Arc<Config> = Arc::new(config::read_config());

    match env::args().nth(1).as_deref() {
        None => {
            let store = SqliteDedupStore::open(&config.db_path)?;
            let sources = scrapers::all_sources(&config);
            let notifier = TelegramNotifier::new(config.clone());

            let outcome = scan::run_scan(&config, &sources, &store, &notifier).await?;
            info!("done: {} new listings", outcome.new_notified);
        }
        Some("--loop") => {
            let store = SqliteDedupStore::open(&config.db_path)?;
            let sources = scrapers::all_sources(&config);
            let notifier = TelegramNotifier::new(config.clone());

            scan::run_loop(&config, &sources, &store, &notifier).await?;
        }
        Some("--stats") => {
            let store = SqliteDedupStore::open(&config.db_path)?;
            print_stats(&store)?;
        }
        Some("--test") => {
            let notifier = TelegramNotifier::new(config.clone());
            notifier.send_test().await?;
            info!("test notification sent, check your Telegram");
        }
        Some(other) => {
            eprintln!("unknown mode: {other} (expected --loop, --stats or --test)");
            std::process::exit(2);
        }
    }

    Ok(())
}

fn print_stats(store: &dyn DedupStore) -> Result<()> {
    let stats = store.stats()?;

    println!("Total listings seen: {}", stats.total);

    if !stats.by_source.is_empty() {
        println!("\nBy source:");
        for (source, count) in &stats.by_source {
            println!("  {source}: {count}");
        }
    }

    if let Some(oldest) = stats.oldest_first_seen {
        println!("\nOldest record: {oldest}");
    }

    let recent = store.recent(5)?;
    if !recent.is_empty() {
        println!("\nMost recent listings:");
        for row in recent {
            println!("  - {} (${}) [{}]", row.raw_address, row.price, row.source);
            println!("    First seen: {}", row.first_seen_at);
        }
    }

    Ok(())
}
