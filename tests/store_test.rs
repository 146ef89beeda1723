#[cfg(test)]
mod dedup_store {
    use chrono::NaiveDate;
    use chrono::NaiveDateTime;
    use renthunt::db::seen_listing::SqliteDedupStore;
    use renthunt::db::DedupStore;
    use renthunt::models::listing::{Listing, PropertyType, Source};

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn listing(source: Source, address: &str, price: i32) -> Listing {
        Listing {
            source,
            address: address.to_string(),
            city: "St Petersburg".to_string(),
            state: "FL".to_string(),
            zip_code: "33701".to_string(),
            price,
            bedrooms: Some(3),
            bathrooms: Some(2.0),
            sqft: Some(1800),
            property_type: PropertyType::House,
            url: "https://example.com/listing".to_string(),
            listing_id: None,
            photo_url: None,
        }
    }

    #[test]
    fn has_is_false_until_recorded() {
        let store = SqliteDedupStore::open(":memory:").unwrap();

        assert!(!store.has("100 elm street").unwrap());

        store
            .record(&listing(Source::Realtor, "100 Elm St", 2500), "100 elm street", at(1, 9))
            .unwrap();

        assert!(store.has("100 elm street").unwrap());
        assert!(!store.has("200 oak avenue").unwrap());
    }

    #[test]
    fn repeated_record_keeps_a_single_row_per_key() {
        let store = SqliteDedupStore::open(":memory:").unwrap();

        store
            .record(&listing(Source::Realtor, "100 Elm St", 2500), "100 elm street", at(1, 9))
            .unwrap();
        store
            .record(&listing(Source::Zillow, "100 Elm Street", 2600), "100 elm street", at(2, 9))
            .unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.total, 1);
        // First reporter owns the record; only price/last_seen_at refresh
        assert_eq!(stats.by_source, vec![("realtor".to_string(), 1)]);

        let recent = store.recent(5).unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].price, 2600);
        assert_eq!(recent[0].first_seen_at, at(1, 9));
        assert_eq!(recent[0].last_seen_at, at(2, 9));
    }

    #[test]
    fn stats_aggregates_by_source_and_age() {
        let store = SqliteDedupStore::open(":memory:").unwrap();

        store
            .record(&listing(Source::Realtor, "100 Elm St", 2500), "100 elm street", at(3, 9))
            .unwrap();
        store
            .record(&listing(Source::Realtor, "200 Oak Ave", 3000), "200 oak avenue", at(1, 9))
            .unwrap();
        store
            .record(&listing(Source::Redfin, "300 Pine Dr", 4000), "300 pine drive", at(2, 9))
            .unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(
            stats.by_source,
            vec![("realtor".to_string(), 2), ("redfin".to_string(), 1)]
        );
        assert_eq!(stats.oldest_first_seen, Some(at(1, 9)));
    }

    #[test]
    fn recent_returns_newest_first() {
        let store = SqliteDedupStore::open(":memory:").unwrap();

        store
            .record(&listing(Source::Realtor, "100 Elm St", 2500), "100 elm street", at(1, 9))
            .unwrap();
        store
            .record(&listing(Source::Zillow, "200 Oak Ave", 3000), "200 oak avenue", at(2, 9))
            .unwrap();

        let recent = store.recent(1).unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].raw_address, "200 Oak Ave");
    }
}
