// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Category, CategoryFilter, FilterCriteria, GeoPoint, PriceOrder, Product, SessionContext};
pub use requests::{FilterProductsRequest, MarkersRequest, NearbyQuery};
pub use responses::{FilterProductsResponse, MarkersResponse, HealthResponse, ErrorResponse};
