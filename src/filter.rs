use crate::models::criteria::SearchCriteria;
use crate::models::listing::Listing;

/// Whether a fetched listing satisfies the static search criteria.
///
/// Missing square footage rejects: we cannot verify the bound, so we exclude
/// rather than alert on a possible miss. Zero or negative price/footage is
/// invalid scraped data and rejects the same way.
pub fn matches(listing: &Listing, criteria: &SearchCriteria) -> bool {
    if !criteria.property_types.contains(&listing.property_type) {
        return false;
    }

    match listing.sqft {
        Some(sqft) if sqft > 0 && sqft >= criteria.min_sqft => {}
        _ => return false,
    }

    listing.price > 0 && listing.price <= criteria.max_rent
}
