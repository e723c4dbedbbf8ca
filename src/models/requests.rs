use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};
use crate::models::domain::{CategoryFilter, FilterCriteria, GeoPoint, PriceOrder, Product};

/// Maximum accepted free-text query length
pub const MAX_QUERY_LEN: u64 = 200;

/// Request to filter a caller-supplied product list
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FilterProductsRequest {
    pub products: Vec<Product>,
    #[serde(default)]
    #[validate(custom(function = "validate_criteria"))]
    pub criteria: FilterCriteria,
}

/// Request to lay out map markers for a product list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkersRequest {
    pub products: Vec<Product>,
}

/// Query string for the backend-backed `nearby` and `map` endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_nearby_query"))]
pub struct NearbyQuery {
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: Option<f64>,
    #[serde(rename = "radiusKm")]
    pub radius_km: Option<f64>,
    pub category: Option<CategoryFilter>,
    pub q: Option<String>,
    #[serde(rename = "priceOrder")]
    pub price_order: Option<PriceOrder>,
}

impl NearbyQuery {
    /// Build filter criteria, falling back to `default_radius_km`
    ///
    /// A location is only set when both `lat` and `lng` are given; validation
    /// rejects a query carrying just one of them.
    pub fn into_criteria(self, default_radius_km: f64) -> FilterCriteria {
        let location = match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(GeoPoint::new(lat, lng)),
            _ => None,
        };

        FilterCriteria {
            category: self.category.unwrap_or_default(),
            name_query: self.q.unwrap_or_default(),
            price_order: self.price_order.unwrap_or_default(),
            location,
            radius_km: self.radius_km.unwrap_or(default_radius_km),
        }
    }
}

fn check_query_len(query: &str) -> Result<(), ValidationError> {
    if query.chars().count() as u64 > MAX_QUERY_LEN {
        return Err(ValidationError::new("name_query_too_long"));
    }
    Ok(())
}

fn check_radius_km(radius_km: f64) -> Result<(), ValidationError> {
    if radius_km.is_nan() {
        return Err(ValidationError::new("radius_not_a_number"));
    }
    Ok(())
}

fn validate_criteria(criteria: &FilterCriteria) -> Result<(), ValidationError> {
    check_query_len(&criteria.name_query)?;

    if let Some(location) = criteria.location {
        if !location.is_valid() {
            return Err(ValidationError::new("location_out_of_range"));
        }
    }

    check_radius_km(criteria.radius_km)
}

fn validate_nearby_query(query: &NearbyQuery) -> Result<(), ValidationError> {
    if query.lat.is_some() != query.lng.is_some() {
        return Err(ValidationError::new("lat_lng_must_be_paired"));
    }

    if let Some(q) = query.q.as_deref() {
        check_query_len(q)?;
    }

    match query.radius_km {
        Some(radius_km) => check_radius_km(radius_km),
        None => Ok(()),
    }
}
