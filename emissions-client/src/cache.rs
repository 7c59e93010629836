//! Caching layer for route responses.
//!
//! The emissions service recomputes a route on every call, so identical
//! resubmissions within a short window can be answered from cache without
//! touching the transport. Errors are never cached; a failed request is
//! retried only by an explicit resubmission.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache as MokaCache;

use crate::domain::{RouteQuery, RouteResult};
use crate::routes_api::{RouteService, RoutesApiError};

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60),
            max_capacity: 1000,
        }
    }
}

/// Route service with caching.
///
/// Wraps any [`RouteService`] and caches successful results keyed by the
/// full query (origin, destination, mode).
pub struct CachedRouteService<S> {
    inner: S,
    cache: MokaCache<RouteQuery, Arc<RouteResult>>,
}

impl<S: RouteService> CachedRouteService<S> {
    /// Create a new cached service.
    pub fn new(inner: S, config: &CacheConfig) -> Self {
        let cache = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { inner, cache }
    }

    /// Get cache statistics (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

#[async_trait]
impl<S: RouteService> RouteService for CachedRouteService<S> {
    async fn submit(&self, query: &RouteQuery) -> Result<RouteResult, RoutesApiError> {
        if let Some(cached) = self.cache.get(query).await {
            return Ok((*cached).clone());
        }

        let result = self.inner.submit(query).await?;
        self.cache
            .insert(query.clone(), Arc::new(result.clone()))
            .await;

        Ok(result)
    }
}
