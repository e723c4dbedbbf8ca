// Core algorithm exports
pub mod catalog;
pub mod distance;
pub mod filters;
pub mod markers;

pub use catalog::{filter_products, Catalog, FilterResult};
pub use distance::{distance_meters, haversine_distance, is_within_radius};
pub use filters::{check_radius, matches_category, matches_text_query, RadiusCheck};
pub use markers::{adjust_overlapping_markers, MarkerLayout};
