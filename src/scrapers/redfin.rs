use async_trait::async_trait;
use log::{info, warn};
use serde::Deserialize;
use serde_json::Value;
use serde_this_or_that::as_u64;

use super::{build_client, id_num_or_string, ListingSource};
use crate::config::Config;
use crate::errors::{FetchError, ParseError};
use crate::models::listing::{Listing, PropertyType, Source};

const GIS_API_URL: &str = "https://www.redfin.com/stingray/api/gis";
const REGION_TYPE_CITY: u32 = 6;

/// Redfin rentals via the stingray GIS API. The response is JSON with a
/// `{}&&` prefix that has to be stripped before parsing.
pub struct RedfinScraper {
    client: reqwest::Client,
    region_id: u32,
    default_city: String,
    default_state: String,
}

impl RedfinScraper {
    pub fn new(config: &Config) -> RedfinScraper {
        let (default_city, default_state) = match config.location.split_once(',') {
            Some((city, state)) => (city.trim().replace('.', ""), state.trim().to_string()),
            None => (config.location.clone(), String::new()),
        };

        RedfinScraper {
            client: build_client(config.request_timeout_seconds),
            region_id: config.redfin_region_id,
            default_city,
            default_state,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GisResponse {
    #[serde(default)]
    homes: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RedfinHome {
    #[serde(default)]
    price_info: Option<RedfinAmount>,
    #[serde(default)]
    price: Option<RedfinNumberValue>,
    #[serde(default)]
    street_line: Option<RedfinStringValue>,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default, deserialize_with = "id_num_or_string")]
    zip: Option<String>,
    #[serde(default)]
    beds: Option<f32>,
    #[serde(default)]
    baths: Option<f32>,
    #[serde(default)]
    sq_ft: Option<RedfinNumberValue>,
    #[serde(default)]
    sqft_info: Option<RedfinAmount>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default, deserialize_with = "id_num_or_string")]
    listing_id: Option<String>,
    #[serde(default)]
    mls_id: Option<RedfinStringValue>,
    #[serde(default)]
    photos: Option<RedfinPhotos>,
    #[serde(default)]
    primary_photo_url: Option<String>,
}

// Redfin wraps most scalar fields in {"value": ...} and emits numbers as
// either numbers or numeric strings.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RedfinAmount {
    #[serde(deserialize_with = "as_u64")]
    amount: u64,
}

#[derive(Debug, Default, Deserialize)]
struct RedfinNumberValue {
    #[serde(default)]
    value: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct RedfinStringValue {
    #[serde(default)]
    value: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RedfinPhotos {
    #[serde(default)]
    primary_photo_url: Option<RedfinStringValue>,
}

#[async_trait]
impl ListingSource for RedfinScraper {
    fn name(&self) -> &'static str {
        "redfin"
    }

    async fn fetch_listings(&self) -> Result<Vec<Listing>, FetchError> {
        info!("[redfin] fetching listings");

        let region_id = self.region_id.to_string();
        let region_type = REGION_TYPE_CITY.to_string();
        let params = [
            ("al", "1"),
            ("include_nearby_homes", "true"),
            ("isRentals", "true"),
            ("num_homes", "100"),
            ("ord", "days-on-redfin-asc"),
            ("page_number", "1"),
            ("region_id", region_id.as_str()),
            ("region_type", region_type.as_str()),
            ("sf", "1,2,5,6,7"),
            ("status", "9"),
            ("uipt", "1"),
            ("v", "8"),
        ];

        let body = self
            .client
            .get(GIS_API_URL)
            .query(&params)
            .header("Accept", "application/json")
            .header("Referer", "https://www.redfin.com/")
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        // "{}&&{...}" -> "{...}"
        let json = body.strip_prefix("{}&&").unwrap_or(&body);
        let response: GisResponse = serde_json::from_str(json)?;

        let mut listings = Vec::new();
        for home in &response.homes {
            match self.parse_home(home) {
                Ok(listing) => listings.push(listing),
                Err(e) => warn!("[redfin] skipping listing: {}", e),
            }
        }
        Ok(listings)
    }
}

impl RedfinScraper {
    fn parse_home(&self, value: &Value) -> Result<Listing, ParseError> {
        let home: RedfinHome = serde_json::from_value(value.clone())?;

        let price = home
            .price_info
            .map(|info| info.amount as i32)
            .or(home.price.and_then(|p| p.value.map(|v| v as i32)))
            .ok_or(ParseError::MissingField("priceInfo.amount"))?;

        let street = home
            .street_line
            .and_then(|line| line.value)
            .or(home.address)
            .filter(|street| !street.is_empty())
            .ok_or(ParseError::MissingField("streetLine"))?;

        let sqft = home
            .sq_ft
            .and_then(|wrapper| wrapper.value)
            .map(|v| v as i32)
            .or(home.sqft_info.map(|info| info.amount as i32));

        let listing_id = home
            .listing_id
            .or(home.mls_id.and_then(|mls| mls.value));

        let url = match home.url {
            Some(path) if path.starts_with("http") => path,
            Some(path) => format!("https://www.redfin.com{}", path),
            None => "https://www.redfin.com".to_string(),
        };

        let photo_url = home
            .photos
            .and_then(|photos| photos.primary_photo_url)
            .and_then(|wrapper| wrapper.value)
            .or(home.primary_photo_url);

        Ok(Listing {
            source: Source::Redfin,
            address: street,
            city: home.city.unwrap_or_else(|| self.default_city.clone()),
            state: home.state.unwrap_or_else(|| self.default_state.clone()),
            zip_code: home.zip.unwrap_or_default(),
            price,
            bedrooms: home.beds.map(|beds| beds as i32),
            bathrooms: home.baths,
            sqft,
            // uipt=1 restricts the query to single-family homes
            property_type: PropertyType::House,
            url,
            listing_id,
            photo_url,
        })
    }
}
