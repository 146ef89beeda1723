use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use log::{error, info, warn};
use rand::Rng;

use crate::address;
use crate::bot::notify::Notifier;
use crate::config::Config;
use crate::db::DedupStore;
use crate::errors::StoreError;
use crate::filter;
use crate::models::criteria::SearchCriteria;
use crate::models::listing::Listing;
use crate::scrapers::ListingSource;

#[derive(Debug, Default, Clone)]
pub struct ScanOutcome {
    pub sources_ok: usize,
    pub sources_failed: usize,
    pub fetched: usize,
    pub matched: usize,
    pub new_notified: usize,
}

/// One complete pass: fetch every source, filter, dedup against the store,
/// notify and record the genuinely new listings.
///
/// A failed source only costs that source for this pass. A store error aborts
/// before anything is notified: without durable dedup state every later run
/// would re-alert the whole result set.
pub async fn run_scan(
    config: &Arc<Config>,
    sources: &[Box<dyn ListingSource>],
    store: &dyn DedupStore,
    notifier: &dyn Notifier,
) -> Result<ScanOutcome, StoreError> {
    let criteria = SearchCriteria::from_config(config);
    let mut outcome = ScanOutcome::default();

    // All sources fetched together; join_all hands results back in
    // declaration order, so the rest of the pass stays deterministic.
    let fetches = join_all(sources.iter().map(|source| source.fetch_listings())).await;

    let mut fetched: Vec<Listing> = Vec::new();
    for (source, result) in sources.iter().zip(fetches) {
        match result {
            Ok(listings) => {
                info!("[{}] {} listings", source.name(), listings.len());
                outcome.sources_ok += 1;
                fetched.extend(listings);
            }
            Err(e) => {
                error!("[{}] fetch failed, skipping source: {}", source.name(), e);
                outcome.sources_failed += 1;
            }
        }
    }
    outcome.fetched = fetched.len();

    let survivors: Vec<Listing> = fetched
        .into_iter()
        .filter(|listing| filter::matches(listing, &criteria))
        .collect();
    outcome.matched = survivors.len();

    // The key set also collapses one physical address reported by several
    // sources within this same pass; the first source in order wins.
    let mut keys_this_pass: HashSet<String> = HashSet::new();
    let mut new_listings: Vec<(Listing, String)> = Vec::new();
    for listing in survivors {
        let key = address::normalize(&listing.full_address());
        if store.has(&key)? || !keys_this_pass.insert(key.clone()) {
            continue;
        }
        new_listings.push((listing, key));
    }

    for (listing, key) in &new_listings {
        info!(
            "NEW: {} (${}/mo) [{}]",
            listing.address, listing.price, listing.source
        );

        if let Err(e) = notifier.send_listing(listing).await {
            // Still recorded below. One alert can be lost this way, but a
            // flapping Telegram API can never re-spam the whole store.
            warn!("notification failed for {}: {}", listing.address, e);
        }

        let now = chrono::Utc::now().naive_utc();
        store.record(listing, key, now)?;
        outcome.new_notified += 1;
    }

    info!(
        "scan complete: {} fetched, {} matched, {} new ({} sources ok, {} failed)",
        outcome.fetched,
        outcome.matched,
        outcome.new_notified,
        outcome.sources_ok,
        outcome.sources_failed
    );

    Ok(outcome)
}

/// Continuous mode: scan, sleep, repeat until Ctrl-C. The interval gets a
/// little random jitter so runs do not hit the sites on an exact clock edge.
pub async fn run_loop(
    config: &Arc<Config>,
    sources: &[Box<dyn ListingSource>],
    store: &dyn DedupStore,
    notifier: &dyn Notifier,
) -> Result<(), StoreError> {
    info!(
        "starting continuous mode, polling every {}s",
        config.poll_interval_seconds
    );

    loop {
        run_scan(config, sources, store, notifier).await?;

        let jitter = rand::thread_rng().gen_range(0..=30);
        let sleep_for = Duration::from_secs(config.poll_interval_seconds + jitter);
        tokio::select! {
            _ = tokio::time::sleep(sleep_for) => {}
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down");
                return Ok(());
            }
        }
    }
}
