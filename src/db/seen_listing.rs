use std::sync::Mutex;

use chrono::NaiveDateTime;
use diesel::connection::SimpleConnection;
use diesel::dsl::{count_star, min};
use diesel::prelude::*;
use diesel::SqliteConnection;

use super::schema::seen_listings;
use super::schema::seen_listings::dsl::*;
use super::{DedupStore, StoreStats};
use crate::errors::StoreError;
use crate::models::listing::Listing;
use crate::models::seen_listing::{InsertableSeenListing, SeenListing};

/// SQLite-backed dedup store. One connection for the process lifetime, behind
/// a mutex so overlapping callers serialize at the connection.
pub struct SqliteDedupStore {
    conn: Mutex<SqliteConnection>,
}

impl SqliteDedupStore {
    pub fn open(db_path: &str) -> Result<SqliteDedupStore, StoreError> {
        let mut conn = SqliteConnection::establish(db_path).map_err(|e| StoreError::Open {
            path: db_path.to_string(),
            source: e,
        })?;
        ensure_tables(&mut conn)?;

        Ok(SqliteDedupStore {
            conn: Mutex::new(conn),
        })
    }
}

fn ensure_tables(conn: &mut SqliteConnection) -> Result<(), StoreError> {
    conn.batch_execute(
        "CREATE TABLE IF NOT EXISTS seen_listings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            canonical_key TEXT UNIQUE NOT NULL,
            raw_address TEXT NOT NULL,
            source TEXT NOT NULL,
            price INTEGER NOT NULL,
            url TEXT,
            first_seen_at TIMESTAMP NOT NULL,
            last_seen_at TIMESTAMP NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_seen_listings_source ON seen_listings(source);",
    )?;
    Ok(())
}

impl DedupStore for SqliteDedupStore {
    fn has(&self, key: &str) -> Result<bool, StoreError> {
        let conn = &mut *self.conn.lock().unwrap();

        let found: i64 = seen_listings::table
            .filter(canonical_key.eq(key))
            .count()
            .get_result(conn)?;
        Ok(found > 0)
    }

    fn record(&self, listing: &Listing, key: &str, now: NaiveDateTime) -> Result<(), StoreError> {
        let conn = &mut *self.conn.lock().unwrap();

        let insertable = InsertableSeenListing {
            canonical_key: key.to_string(),
            raw_address: listing.address.clone(),
            source: listing.source.as_str().to_string(),
            price: listing.price,
            url: Some(listing.url.clone()),
            first_seen_at: now,
            last_seen_at: now,
        };

        // The UNIQUE column is the invariant; a conflicting insert only
        // refreshes the observational fields.
        diesel::insert_into(seen_listings::table)
            .values(&insertable)
            .on_conflict(canonical_key)
            .do_update()
            .set((last_seen_at.eq(now), price.eq(listing.price)))
            .execute(conn)?;
        Ok(())
    }

    fn stats(&self) -> Result<StoreStats, StoreError> {
        let conn = &mut *self.conn.lock().unwrap();

        let total: i64 = seen_listings::table.count().get_result(conn)?;

        let mut by_source: Vec<(String, i64)> = seen_listings::table
            .group_by(source)
            .select((source, count_star()))
            .load(conn)?;
        by_source.sort_by(|a, b| b.1.cmp(&a.1));

        let oldest_first_seen: Option<NaiveDateTime> = seen_listings::table
            .select(min(first_seen_at))
            .get_result(conn)?;

        Ok(StoreStats {
            total,
            by_source,
            oldest_first_seen,
        })
    }

    fn recent(&self, limit: i64) -> Result<Vec<SeenListing>, StoreError> {
        let conn = &mut *self.conn.lock().unwrap();

        let rows = seen_listings::table
            .order(first_seen_at.desc())
            .limit(limit)
            .select(SeenListing::as_select())
            .load(conn)?;
        Ok(rows)
    }
}
