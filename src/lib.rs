//! Harvest Map - product geofiltering and map marker layout for the Harvest
//! produce marketplace.
//!
//! The core is pure and synchronous: a haversine distance calculator, a
//! staged product filter (category, text, radius, price order) and a marker
//! deduplicator that spreads products sharing a location on a small circle.
//! The service layer wraps it in an HTTP API backed by the marketplace REST
//! backend.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{Catalog, FilterResult, MarkerLayout, adjust_overlapping_markers, distance_meters, filter_products};
pub use crate::models::{Category, CategoryFilter, FilterCriteria, GeoPoint, PriceOrder, Product, SessionContext};
