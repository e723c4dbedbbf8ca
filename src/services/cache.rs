use crate::models::Product;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError<E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    /// The loader failed; nothing was cached
    #[error("Cache fill failed: {0}")]
    Fetch(Arc<E>),
}

/// In-memory product list cache
///
/// Product lists are fetched per view, so a short TTL keeps rapid refetches
/// (filter changes, map pans) from hammering the backend while staying fresh.
#[derive(Clone)]
pub struct ProductCache {
    inner: moka::future::Cache<String, Arc<Vec<Product>>>,
    ttl_secs: u64,
}

impl ProductCache {
    /// Create a new cache
    pub fn new(capacity: u64, ttl_secs: u64) -> Self {
        let inner = moka::future::CacheBuilder::new(capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { inner, ttl_secs }
    }

    /// Get a cached list, or run `fetch` and store its result
    ///
    /// Concurrent callers for the same key share a single fetch. Errors are
    /// returned to every waiting caller and are not cached.
    pub async fn get_or_fetch<F, Fut, E>(
        &self,
        key: &str,
        fetch: F,
    ) -> Result<Arc<Vec<Product>>, CacheError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Product>, E>>,
        E: std::error::Error + Send + Sync + 'static,
    {
        if let Some(products) = self.inner.get(key).await {
            tracing::trace!("Cache hit: {}", key);
            return Ok(products);
        }

        tracing::trace!("Cache miss: {}", key);

        self.inner
            .try_get_with(key.to_string(), async move { fetch().await.map(Arc::new) })
            .await
            .map_err(CacheError::Fetch)
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.inner.entry_count(),
            ttl_secs: self.ttl_secs,
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub entries: u64,
    pub ttl_secs: u64,
}

/// Cache key builder
///
/// Keys carry no caller identity; only anonymous fetches may be cached.
pub struct CacheKey;

impl CacheKey {
    /// Build a cache key for the full product listing
    pub fn products() -> String {
        "products:all".to_string()
    }

    /// Build a cache key for one farmer's listings
    pub fn farmer_products(farmer_id: &str) -> String {
        format!("products:farmer:{}", farmer_id)
    }
}
