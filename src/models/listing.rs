use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    Realtor,
    Zillow,
    Redfin,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Realtor => "realtor",
            Source::Zillow => "zillow",
            Source::Redfin => "redfin",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Source::Realtor => "Realtor.com",
            Source::Zillow => "Zillow",
            Source::Redfin => "Redfin",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyType {
    House,
    Condo,
    Apartment,
    Townhouse,
    Unknown,
}

impl PropertyType {
    /// Maps the type labels the three sites use onto our enum. Anything
    /// unrecognized stays Unknown and is rejected by the filter.
    pub fn from_source_label(label: &str) -> PropertyType {
        match label.to_lowercase().as_str() {
            "house" | "single_family" | "single family" | "single-family" => PropertyType::House,
            "condo" | "condos" | "condop" => PropertyType::Condo,
            "apartment" | "apartments" | "multi_family" | "multi family" => PropertyType::Apartment,
            "townhouse" | "townhomes" | "townhome" => PropertyType::Townhouse,
            _ => PropertyType::Unknown,
        }
    }
}

/// One rental advertisement as reported by a source during a single pass.
/// Built by a source adapter, never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Listing {
    pub source: Source,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub price: i32,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<f32>,
    pub sqft: Option<i32>,
    pub property_type: PropertyType,
    pub url: String,
    pub listing_id: Option<String>,
    pub photo_url: Option<String>,
}

impl Listing {
    /// The string the dedup key is computed from. Sources disagree on how
    /// much of the address lands in the street line, so the key always covers
    /// street, city, state and zip together.
    pub fn full_address(&self) -> String {
        format!(
            "{} {} {} {}",
            self.address, self.city, self.state, self.zip_code
        )
    }
}
