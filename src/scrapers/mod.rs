pub mod realtor;
pub mod redfin;
pub mod zillow;

use std::time::Duration;

use async_trait::async_trait;
use serde::de;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::config::Config;
use crate::errors::FetchError;
use crate::models::listing::Listing;

pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// One listing site. Each adapter owns the site-specific URL shape and markup
/// parsing and hands back the common Listing shape, already scoped to the
/// configured city by the site query itself.
#[async_trait]
pub trait ListingSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch_listings(&self) -> Result<Vec<Listing>, FetchError>;
}

/// The three production adapters in the deterministic order the scan
/// processes them.
pub fn all_sources(config: &Config) -> Vec<Box<dyn ListingSource>> {
    vec![
        Box::new(realtor::RealtorScraper::new(config)),
        Box::new(zillow::ZillowScraper::new(config)),
        Box::new(redfin::RedfinScraper::new(config)),
    ]
}

pub(crate) fn build_client(timeout_seconds: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(timeout_seconds))
        .build()
        .expect("http client construction cannot fail with these options")
}

// Custom deserialization for price-ish fields the sites emit as a number, a
// numeric string, or a formatted string like "$4,400/mo".
pub(crate) fn price_num_or_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<i32>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => {
            let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
            digits.parse().ok()
        }
        Value::Number(num) => num.as_f64().map(|f| f as i32),
        Value::Null => None,
        _ => return Err(de::Error::custom("wrong type for price field")),
    })
}

// Source-native ids show up as either strings or bare numbers.
pub(crate) fn id_num_or_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Number(num) => Some(num.to_string()),
        _ => None,
    })
}
