use crate::config::Config;
use crate::models::listing::PropertyType;

/// Static search criteria, fixed for the process lifetime. Location is not
/// part of this struct: each source adapter queries its site already scoped
/// to the configured city.
#[derive(Debug, Clone)]
pub struct SearchCriteria {
    pub property_types: Vec<PropertyType>,
    pub min_sqft: i32,
    pub max_rent: i32,
}

impl SearchCriteria {
    pub fn from_config(config: &Config) -> SearchCriteria {
        SearchCriteria {
            property_types: vec![PropertyType::House],
            min_sqft: config.min_sqft,
            max_rent: config.max_rent,
        }
    }
}
