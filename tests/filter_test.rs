#[cfg(test)]
mod criteria_filter {
    use renthunt::config::create_test_config;
    use renthunt::filter::matches;
    use renthunt::models::criteria::SearchCriteria;
    use renthunt::models::listing::{Listing, PropertyType, Source};

    fn criteria() -> SearchCriteria {
        SearchCriteria::from_config(&create_test_config())
    }

    fn listing(property_type: PropertyType, sqft: Option<i32>, price: i32) -> Listing {
        Listing {
            source: Source::Realtor,
            address: "100 Elm St".to_string(),
            city: "St Petersburg".to_string(),
            state: "FL".to_string(),
            zip_code: "33701".to_string(),
            price,
            bedrooms: Some(3),
            bathrooms: Some(2.0),
            sqft,
            property_type,
            url: "https://example.com/listing".to_string(),
            listing_id: None,
            photo_url: None,
        }
    }

    #[test]
    fn rejects_condo_even_when_large_and_cheap() {
        assert!(!matches(
            &listing(PropertyType::Condo, Some(2000), 2000),
            &criteria()
        ));
    }

    #[test]
    fn rejects_apartment_townhouse_and_unknown() {
        for property_type in [
            PropertyType::Apartment,
            PropertyType::Townhouse,
            PropertyType::Unknown,
        ] {
            assert!(!matches(&listing(property_type, Some(2000), 2000), &criteria()));
        }
    }

    #[test]
    fn rejects_house_below_min_sqft() {
        assert!(!matches(
            &listing(PropertyType::House, Some(1499), 2000),
            &criteria()
        ));
    }

    #[test]
    fn accepts_house_at_both_boundaries() {
        assert!(matches(
            &listing(PropertyType::House, Some(1500), 7000),
            &criteria()
        ));
    }

    #[test]
    fn rejects_missing_sqft() {
        assert!(!matches(
            &listing(PropertyType::House, None, 2000),
            &criteria()
        ));
    }

    #[test]
    fn rejects_over_max_rent() {
        assert!(!matches(
            &listing(PropertyType::House, Some(2000), 7001),
            &criteria()
        ));
    }

    #[test]
    fn rejects_zero_or_negative_values_as_invalid_data() {
        assert!(!matches(
            &listing(PropertyType::House, Some(0), 2000),
            &criteria()
        ));
        assert!(!matches(
            &listing(PropertyType::House, Some(-100), 2000),
            &criteria()
        ));
        assert!(!matches(
            &listing(PropertyType::House, Some(2000), 0),
            &criteria()
        ));
        assert!(!matches(
            &listing(PropertyType::House, Some(2000), -50),
            &criteria()
        ));
    }
}
