diesel::table! {
    seen_listings (id) {
        id -> Integer,
        canonical_key -> Text,
        raw_address -> Text,
        source -> Text,
        price -> Integer,
        url -> Nullable<Text>,
        first_seen_at -> Timestamp,
        last_seen_at -> Timestamp,
    }
}
