pub mod schema;
pub mod seen_listing;

use chrono::NaiveDateTime;

use crate::errors::StoreError;
use crate::models::listing::Listing;
use crate::models::seen_listing::SeenListing;

#[derive(Debug, Clone, Default)]
pub struct StoreStats {
    pub total: i64,
    pub by_source: Vec<(String, i64)>,
    pub oldest_first_seen: Option<NaiveDateTime>,
}

/// Durable record of every listing that has already triggered a notification,
/// keyed by canonical address. Injected into the scan rather than reached as
/// a global, so tests can run against `:memory:`.
pub trait DedupStore: Send + Sync {
    /// True iff a record with this canonical key exists. Must never produce a
    /// false negative across process restarts.
    fn has(&self, key: &str) -> Result<bool, StoreError>;

    /// Inserts a record for this key. On an existing key only `last_seen_at`
    /// and `price` are refreshed; the key stays unique.
    fn record(&self, listing: &Listing, key: &str, now: NaiveDateTime) -> Result<(), StoreError>;

    fn stats(&self) -> Result<StoreStats, StoreError>;

    fn recent(&self, limit: i64) -> Result<Vec<SeenListing>, StoreError>;
}
