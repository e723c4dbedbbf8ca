use crate::models::{CategoryFilter, GeoPoint, Product};
use super::distance::is_within_radius;

/// Outcome of the location-radius stage for a single product
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadiusCheck {
    Inside,
    Outside,
    MissingLocation,
}

/// Stage 1: exact category match
#[inline]
pub fn matches_category(product: &Product, category: &CategoryFilter) -> bool {
    match category {
        CategoryFilter::All => true,
        CategoryFilter::Only(wanted) => product.category == *wanted,
    }
}

/// Stage 2: case-insensitive substring search over name, category and address
///
/// `query_lower` must already be lower-cased; an empty query matches everything.
#[inline]
pub fn matches_text_query(product: &Product, query_lower: &str) -> bool {
    if query_lower.is_empty() {
        return true;
    }

    product.name.to_lowercase().contains(query_lower)
        || product.category.as_str().to_lowercase().contains(query_lower)
        || product
            .address
            .as_deref()
            .unwrap_or("")
            .to_lowercase()
            .contains(query_lower)
}

/// Stage 3: great-circle radius check against a reference location
#[inline]
pub fn check_radius(product: &Product, center: &GeoPoint, radius_km: f64) -> RadiusCheck {
    let Some(location) = product.location() else {
        return RadiusCheck::MissingLocation;
    };

    // NaN distances compare false and land outside
    if is_within_radius(center.lat, center.lng, location.lat, location.lng, radius_km) {
        RadiusCheck::Inside
    } else {
        RadiusCheck::Outside
    }
}
