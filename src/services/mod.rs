// Service exports
pub mod backend;
pub mod cache;

pub use backend::{BackendError, MarketplaceClient};
pub use cache::{CacheError, CacheKey, CacheStats, ProductCache};
