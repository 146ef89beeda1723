use async_trait::async_trait;
use lazy_static::lazy_static;
use log::{info, warn};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use super::{build_client, id_num_or_string, ListingSource};
use crate::config::Config;
use crate::errors::{FetchError, ParseError};
use crate::models::listing::{Listing, PropertyType, Source};

lazy_static! {
    static ref NEXT_DATA_REGEX: Regex =
        Regex::new(r#"(?s)<script id="__NEXT_DATA__"[^>]*>(.*?)</script>"#).unwrap();
}

/// Realtor.com rental search. The search page is a Next.js app; the full
/// result set rides along in the `__NEXT_DATA__` script tag.
pub struct RealtorScraper {
    client: reqwest::Client,
    location_slug: String,
    min_sqft: i32,
    max_rent: i32,
}

impl RealtorScraper {
    pub fn new(config: &Config) -> RealtorScraper {
        RealtorScraper {
            client: build_client(config.request_timeout_seconds),
            location_slug: config.location_slug.clone(),
            min_sqft: config.min_sqft,
            max_rent: config.max_rent,
        }
    }

    fn search_url(&self) -> String {
        format!(
            "https://www.realtor.com/apartments/{}/type-single-family-home/price-na-{}/sqft-{}-na",
            self.location_slug, self.max_rent, self.min_sqft
        )
    }
}

#[derive(Debug, Deserialize)]
struct RealtorProperty {
    #[serde(default, deserialize_with = "id_num_or_string")]
    property_id: Option<String>,
    #[serde(default)]
    permalink: Option<String>,
    #[serde(default)]
    list_price: Option<f64>,
    #[serde(default)]
    list_price_min: Option<f64>,
    #[serde(default)]
    price: Option<f64>,
    #[serde(default)]
    location: Option<RealtorLocation>,
    #[serde(default)]
    description: Option<RealtorDescription>,
    #[serde(default)]
    primary_photo: Option<RealtorPhoto>,
    #[serde(default)]
    photos: Vec<RealtorPhoto>,
}

#[derive(Debug, Default, Deserialize)]
struct RealtorLocation {
    #[serde(default)]
    address: Option<RealtorAddress>,
}

#[derive(Debug, Default, Deserialize)]
struct RealtorAddress {
    #[serde(default)]
    line: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    state_code: Option<String>,
    #[serde(default)]
    postal_code: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RealtorDescription {
    #[serde(default)]
    beds: Option<i32>,
    #[serde(default)]
    baths: Option<f32>,
    #[serde(default)]
    sqft: Option<i32>,
    #[serde(default, rename = "type")]
    property_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RealtorPhoto {
    #[serde(default)]
    href: Option<String>,
}

#[async_trait]
impl ListingSource for RealtorScraper {
    fn name(&self) -> &'static str {
        "realtor"
    }

    async fn fetch_listings(&self) -> Result<Vec<Listing>, FetchError> {
        let url = self.search_url();
        info!("[realtor] fetching {}", url);

        let html = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let raw = NEXT_DATA_REGEX
            .captures(&html)
            .and_then(|caps| caps.get(1))
            .ok_or(FetchError::MissingData("__NEXT_DATA__ script tag"))?;
        let data: Value = serde_json::from_str(raw.as_str())?;

        let properties =
            extract_properties(&data).ok_or(FetchError::MissingData("properties array"))?;

        let mut listings = Vec::new();
        for prop in properties {
            match parse_property(prop) {
                Ok(listing) => listings.push(listing),
                Err(e) => warn!("[realtor] skipping listing: {}", e),
            }
        }
        Ok(listings)
    }
}

// The listings array has moved around between deploys; try the known paths.
fn extract_properties(data: &Value) -> Option<&Vec<Value>> {
    let page_props = data.get("props")?.get("pageProps")?;

    let candidates = [
        page_props.get("properties"),
        page_props
            .pointer("/searchResults/home_search/properties"),
        page_props.pointer("/searchResults/properties"),
        page_props.pointer("/pageData/searchResults/properties"),
    ];

    candidates
        .into_iter()
        .flatten()
        .find_map(|value| value.as_array())
        .filter(|array| !array.is_empty())
}

fn parse_property(value: &Value) -> Result<Listing, ParseError> {
    let prop: RealtorProperty = serde_json::from_value(value.clone())?;

    let address = prop
        .location
        .and_then(|location| location.address)
        .ok_or(ParseError::MissingField("location.address"))?;
    let street = address
        .line
        .filter(|line| !line.is_empty())
        .ok_or(ParseError::MissingField("location.address.line"))?;
    let city = address
        .city
        .filter(|city| !city.is_empty())
        .ok_or(ParseError::MissingField("location.address.city"))?;

    let price = prop
        .list_price
        .or(prop.price)
        .or(prop.list_price_min)
        .ok_or(ParseError::MissingField("list_price"))?;

    let description = prop.description.unwrap_or_default();

    let url = if let Some(permalink) = prop.permalink.filter(|p| !p.is_empty()) {
        format!("https://www.realtor.com/realestateandhomes-detail/{}", permalink)
    } else if let Some(property_id) = prop.property_id.as_ref() {
        format!("https://www.realtor.com/realestateandhomes-detail/{}", property_id)
    } else {
        return Err(ParseError::MissingField("permalink"));
    };

    let photo_url = prop
        .photos
        .into_iter()
        .find_map(|photo| photo.href)
        .or(prop.primary_photo.and_then(|photo| photo.href));

    // The search URL already restricts to single-family homes; a missing type
    // label still goes through the filter as House.
    let property_type = description
        .property_type
        .as_deref()
        .map(PropertyType::from_source_label)
        .unwrap_or(PropertyType::House);

    Ok(Listing {
        source: Source::Realtor,
        address: street,
        city,
        state: address.state_code.unwrap_or_default(),
        zip_code: address.postal_code.unwrap_or_default(),
        price: price as i32,
        bedrooms: description.beds,
        bathrooms: description.baths,
        sqft: description.sqft,
        property_type,
        url,
        listing_id: prop.property_id,
        photo_url,
    })
}
