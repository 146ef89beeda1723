use async_trait::async_trait;
use lazy_static::lazy_static;
use log::{info, warn};
use regex::Regex;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{build_client, id_num_or_string, price_num_or_string, ListingSource};
use crate::config::Config;
use crate::errors::{FetchError, ParseError};
use crate::models::listing::{Listing, PropertyType, Source};

lazy_static! {
    static ref NEXT_DATA_REGEX: Regex =
        Regex::new(r#"(?s)<script id="__NEXT_DATA__"[^>]*>(.*?)</script>"#).unwrap();
    // Fallbacks for when the result set is embedded outside __NEXT_DATA__.
    static ref LIST_RESULTS_REGEXES: [Regex; 2] = [
        Regex::new(r#"(?s)"listResults"\s*:\s*(\[.*?\])\s*,\s*""#).unwrap(),
        Regex::new(r#"(?s)"searchResults"\s*:\s*\{\s*"listResults"\s*:\s*(\[.*?\])"#).unwrap(),
    ];
    static ref ADDRESS_PARTS_REGEX: Regex =
        Regex::new(r"^(.+?),\s*(.+?),\s*([A-Z]{2})\s*(\d{5})?").unwrap();
}

/// Zillow rental search. Filters are carried in a JSON `searchQueryState`
/// query parameter; results are embedded JSON in the search page.
pub struct ZillowScraper {
    client: reqwest::Client,
    location_slug: String,
    default_city: String,
    default_state: String,
    min_sqft: i32,
    max_rent: i32,
}

impl ZillowScraper {
    pub fn new(config: &Config) -> ZillowScraper {
        // "St. Petersburg, FL" -> fallback city/state for address strings the
        // site reports without them.
        let (default_city, default_state) = match config.location.split_once(',') {
            Some((city, state)) => (city.trim().replace('.', ""), state.trim().to_string()),
            None => (config.location.clone(), String::new()),
        };

        ZillowScraper {
            client: build_client(config.request_timeout_seconds),
            location_slug: config.location_slug.clone(),
            default_city,
            default_state,
            min_sqft: config.min_sqft,
            max_rent: config.max_rent,
        }
    }

    fn search_url(&self) -> Result<reqwest::Url, FetchError> {
        let query_state = json!({
            "pagination": {},
            "isMapVisible": false,
            "filterState": {
                "isForRent": {"value": true},
                "isForSaleByAgent": {"value": false},
                "isForSaleByOwner": {"value": false},
                "isNewConstruction": {"value": false},
                "isComingSoon": {"value": false},
                "isAuction": {"value": false},
                "isForSaleForeclosure": {"value": false},
                "isAllHomes": {"value": true},
                "monthlyPayment": {"max": self.max_rent},
                "sqft": {"min": self.min_sqft},
                "isApartmentOrCondo": {"value": false},
                "isTownhouse": {"value": false},
                "isManufactured": {"value": false},
                "isApartment": {"value": false},
                "isCondo": {"value": false},
            },
            "isListVisible": true,
        });

        let base = format!("https://www.zillow.com/{}/rentals/", self.location_slug);
        let url = reqwest::Url::parse_with_params(
            &base,
            &[("searchQueryState", query_state.to_string())],
        )
        .map_err(|_| FetchError::MissingData("search url"))?;
        Ok(url)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ZillowItem {
    #[serde(default, deserialize_with = "id_num_or_string")]
    zpid: Option<String>,
    #[serde(default)]
    address: Option<String>,
    #[serde(default, deserialize_with = "price_num_or_string")]
    unformatted_price: Option<i32>,
    #[serde(default, deserialize_with = "price_num_or_string")]
    price: Option<i32>,
    #[serde(default)]
    beds: Option<f32>,
    #[serde(default)]
    baths: Option<f32>,
    #[serde(default)]
    area: Option<f64>,
    #[serde(default)]
    living_area: Option<f64>,
    #[serde(default)]
    detail_url: Option<String>,
    #[serde(default)]
    img_src: Option<String>,
    #[serde(default)]
    carousel_photos: Vec<ZillowPhoto>,
    #[serde(default)]
    hdp_data: Option<ZillowHdpData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ZillowHdpData {
    #[serde(default)]
    home_info: Option<ZillowHomeInfo>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ZillowHomeInfo {
    #[serde(default)]
    street_address: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default, deserialize_with = "id_num_or_string")]
    zipcode: Option<String>,
    #[serde(default)]
    home_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ZillowPhoto {
    #[serde(default)]
    url: Option<String>,
}

#[async_trait]
impl ListingSource for ZillowScraper {
    fn name(&self) -> &'static str {
        "zillow"
    }

    async fn fetch_listings(&self) -> Result<Vec<Listing>, FetchError> {
        let url = self.search_url()?;
        info!("[zillow] fetching listings");

        let html = self
            .client
            .get(url)
            .header("Accept", "text/html,application/xhtml+xml")
            .header("Accept-Language", "en-US,en;q=0.5")
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let items = extract_list_results(&html)
            .ok_or(FetchError::MissingData("listResults array"))?;

        let mut listings = Vec::new();
        for item in &items {
            match self.parse_item(item) {
                Ok(listing) => listings.push(listing),
                Err(e) => warn!("[zillow] skipping listing: {}", e),
            }
        }
        Ok(listings)
    }
}

impl ZillowScraper {
    fn parse_item(&self, value: &Value) -> Result<Listing, ParseError> {
        let item: ZillowItem = serde_json::from_value(value.clone())?;

        let home_info = item
            .hdp_data
            .unwrap_or_default()
            .home_info
            .unwrap_or_default();

        let (street, city, state, zip_code) = match item.address.filter(|a| !a.is_empty()) {
            Some(combined) => self.split_address(&combined),
            None => (
                home_info
                    .street_address
                    .clone()
                    .ok_or(ParseError::MissingField("streetAddress"))?,
                home_info
                    .city
                    .clone()
                    .unwrap_or_else(|| self.default_city.clone()),
                home_info
                    .state
                    .clone()
                    .unwrap_or_else(|| self.default_state.clone()),
                home_info.zipcode.clone().unwrap_or_default(),
            ),
        };

        let price = item
            .unformatted_price
            .or(item.price)
            .ok_or(ParseError::MissingField("price"))?;

        let sqft = item
            .area
            .or(item.living_area)
            .map(|area| area as i32);

        let url = match item.detail_url {
            Some(path) if path.starts_with("http") => path,
            Some(path) => format!("https://www.zillow.com{}", path),
            None => match item.zpid.as_ref() {
                Some(zpid) => format!("https://www.zillow.com/homedetails/{}_zpid/", zpid),
                None => return Err(ParseError::MissingField("detailUrl")),
            },
        };

        let photo_url = item
            .img_src
            .or_else(|| item.carousel_photos.into_iter().find_map(|photo| photo.url));

        // The query excludes condos/townhouses/apartments, so an item without
        // a homeType label is taken as a house.
        let property_type = home_info
            .home_type
            .as_deref()
            .map(PropertyType::from_source_label)
            .unwrap_or(PropertyType::House);

        Ok(Listing {
            source: Source::Zillow,
            address: street,
            city,
            state,
            zip_code,
            price,
            bedrooms: item.beds.map(|beds| beds as i32),
            bathrooms: item.baths,
            sqft,
            property_type,
            url,
            listing_id: item.zpid,
            photo_url,
        })
    }

    fn split_address(&self, combined: &str) -> (String, String, String, String) {
        if let Some(caps) = ADDRESS_PARTS_REGEX.captures(combined) {
            return (
                caps[1].to_string(),
                caps[2].to_string(),
                caps[3].to_string(),
                caps.get(4).map(|m| m.as_str().to_string()).unwrap_or_default(),
            );
        }
        (
            combined.to_string(),
            self.default_city.clone(),
            self.default_state.clone(),
            String::new(),
        )
    }
}

fn extract_list_results(html: &str) -> Option<Vec<Value>> {
    if let Some(caps) = NEXT_DATA_REGEX.captures(html) {
        if let Ok(data) = serde_json::from_str::<Value>(caps[1].trim()) {
            let paths = [
                "/props/pageProps/searchPageState/cat1/searchResults/listResults",
                "/props/pageProps/initialData/searchResults/listResults",
            ];
            for path in paths {
                if let Some(results) = data.pointer(path).and_then(|v| v.as_array()) {
                    if !results.is_empty() {
                        return Some(results.clone());
                    }
                }
            }
        }
    }

    for regex in LIST_RESULTS_REGEXES.iter() {
        if let Some(caps) = regex.captures(html) {
            if let Ok(Value::Array(results)) = serde_json::from_str::<Value>(&caps[1]) {
                if !results.is_empty() {
                    return Some(results);
                }
            }
        }
    }

    None
}
