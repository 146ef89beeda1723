#[cfg(test)]
mod scan_pass {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use renthunt::address;
    use renthunt::bot::notify::Notifier;
    use renthunt::config::{create_test_config, Config};
    use renthunt::db::seen_listing::SqliteDedupStore;
    use renthunt::db::DedupStore;
    use renthunt::errors::{DeliveryError, FetchError};
    use renthunt::models::listing::{Listing, PropertyType, Source};
    use renthunt::scan::run_scan;
    use renthunt::scrapers::ListingSource;

    struct StubSource {
        name: &'static str,
        listings: Vec<Listing>,
        fail: bool,
    }

    impl StubSource {
        fn ok(name: &'static str, listings: Vec<Listing>) -> Box<StubSource> {
            Box::new(StubSource {
                name,
                listings,
                fail: false,
            })
        }

        fn down(name: &'static str) -> Box<StubSource> {
            Box::new(StubSource {
                name,
                listings: Vec::new(),
                fail: true,
            })
        }
    }

    #[async_trait]
    impl ListingSource for StubSource {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn fetch_listings(&self) -> Result<Vec<Listing>, FetchError> {
            if self.fail {
                return Err(FetchError::MissingData("stubbed outage"));
            }
            Ok(self.listings.clone())
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send_listing(&self, listing: &Listing) -> Result<(), DeliveryError> {
            if self.fail {
                return Err(DeliveryError::AllChatsFailed(1));
            }
            self.sent.lock().unwrap().push(listing.address.clone());
            Ok(())
        }
    }

    fn config() -> Arc<Config> {
        Arc::new(create_test_config())
    }

    fn house(source: Source, address: &str) -> Listing {
        Listing {
            source,
            address: address.to_string(),
            city: "St Petersburg".to_string(),
            state: "FL".to_string(),
            zip_code: "33701".to_string(),
            price: 2500,
            bedrooms: Some(3),
            bathrooms: Some(2.0),
            sqft: Some(1800),
            property_type: PropertyType::House,
            url: "https://example.com/listing".to_string(),
            listing_id: None,
            photo_url: None,
        }
    }

    fn condo(source: Source, address: &str) -> Listing {
        Listing {
            property_type: PropertyType::Condo,
            ..house(source, address)
        }
    }

    #[tokio::test]
    async fn cross_source_duplicate_notifies_once() {
        let config = config();
        let store = SqliteDedupStore::open(":memory:").unwrap();
        let notifier = RecordingNotifier::default();

        // Same physical house, spelled differently by each site
        let sources: Vec<Box<dyn ListingSource>> = vec![
            StubSource::ok("realtor", vec![house(Source::Realtor, "100 Elm St")]),
            StubSource::ok("zillow", vec![house(Source::Zillow, "100 Elm Street")]),
        ];

        let outcome = run_scan(&config, &sources, &store, &notifier).await.unwrap();

        assert_eq!(outcome.new_notified, 1);
        assert_eq!(store.stats().unwrap().total, 1);

        let sent = notifier.sent.lock().unwrap();
        // First source in deterministic order wins
        assert_eq!(*sent, vec!["100 Elm St".to_string()]);
    }

    #[tokio::test]
    async fn unchanged_second_pass_stays_quiet() {
        let config = config();
        let store = SqliteDedupStore::open(":memory:").unwrap();
        let notifier = RecordingNotifier::default();

        let sources: Vec<Box<dyn ListingSource>> = vec![StubSource::ok("realtor", vec![house(Source::Realtor, "100 Elm St")])];

        let first = run_scan(&config, &sources, &store, &notifier).await.unwrap();
        assert_eq!(first.new_notified, 1);

        let second = run_scan(&config, &sources, &store, &notifier).await.unwrap();
        assert_eq!(second.new_notified, 0);
        assert_eq!(store.stats().unwrap().total, 1);
        assert_eq!(notifier.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn failed_source_does_not_abort_the_pass() {
        let config = config();
        let store = SqliteDedupStore::open(":memory:").unwrap();
        let notifier = RecordingNotifier::default();

        let sources: Vec<Box<dyn ListingSource>> = vec![
            StubSource::down("realtor"),
            StubSource::ok("zillow", vec![house(Source::Zillow, "200 Oak Ave")]),
            StubSource::ok("redfin", vec![house(Source::Redfin, "300 Pine Dr")]),
        ];

        let outcome = run_scan(&config, &sources, &store, &notifier).await.unwrap();

        assert_eq!(outcome.sources_failed, 1);
        assert_eq!(outcome.sources_ok, 2);
        assert_eq!(outcome.new_notified, 2);
        assert_eq!(notifier.sent.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn filtered_listings_never_reach_the_store() {
        let config = config();
        let store = SqliteDedupStore::open(":memory:").unwrap();
        let notifier = RecordingNotifier::default();

        let sources: Vec<Box<dyn ListingSource>> = vec![StubSource::ok(
            "zillow",
            vec![
                condo(Source::Zillow, "400 Shore Blvd"),
                house(Source::Zillow, "200 Oak Ave"),
            ],
        )];

        let outcome = run_scan(&config, &sources, &store, &notifier).await.unwrap();

        assert_eq!(outcome.fetched, 2);
        assert_eq!(outcome.matched, 1);
        assert_eq!(outcome.new_notified, 1);
        assert_eq!(store.stats().unwrap().total, 1);
    }

    #[tokio::test]
    async fn delivery_failure_still_marks_listing_as_seen() {
        let config = config();
        let store = SqliteDedupStore::open(":memory:").unwrap();
        let notifier = RecordingNotifier {
            fail: true,
            ..RecordingNotifier::default()
        };

        let listing = house(Source::Realtor, "100 Elm St");
        let key = address::normalize(&listing.full_address());

        let sources: Vec<Box<dyn ListingSource>> =
            vec![StubSource::ok("realtor", vec![listing])];

        let outcome = run_scan(&config, &sources, &store, &notifier).await.unwrap();

        assert_eq!(outcome.new_notified, 1);
        assert!(notifier.sent.lock().unwrap().is_empty());
        // Recorded despite the failed delivery: no alert storm next pass
        assert!(store.has(&key).unwrap());
    }
}
