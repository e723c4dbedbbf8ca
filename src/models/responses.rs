use serde::{Deserialize, Serialize};
use crate::models::domain::Product;
use crate::services::CacheStats;

/// Response for the filter, nearby and map endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterProductsResponse {
    pub products: Vec<Product>,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
    #[serde(rename = "excludedMissingLocation")]
    pub excluded_missing_location: usize,
}

/// Response for the markers endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkersResponse {
    pub products: Vec<Product>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub cache: CacheStats,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}
