use crate::db::schema::seen_listings;
use chrono::NaiveDateTime;
use diesel::{Insertable, Queryable, Selectable};

/// A persisted dedup record: proof that a listing at this canonical address
/// has already triggered a notification.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = seen_listings)]
pub struct SeenListing {
    pub id: i32,
    pub canonical_key: String,
    pub raw_address: String,
    pub source: String,
    pub price: i32,
    pub url: Option<String>,
    pub first_seen_at: NaiveDateTime,
    pub last_seen_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = seen_listings)]
pub struct InsertableSeenListing {
    pub canonical_key: String,
    pub raw_address: String,
    pub source: String,
    pub price: i32,
    pub url: Option<String>,
    pub first_seen_at: NaiveDateTime,
    pub last_seen_at: NaiveDateTime,
}
