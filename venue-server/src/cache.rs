//! Caching layer for candidate lookups.
//!
//! Directory lookups are slow and metered, and the same sport/location pair
//! is searched repeatedly while users adjust their date or time. Pages are
//! cached per query; the date and time do not affect what the directory
//! returns so they are not part of the key.
//!
//! Minimum ratings are bucketed to tenths so that widening steps which land
//! on the same value after floating point drift share an entry.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::search::{CandidatePage, CandidateProvider, ProviderError, SearchFilters};

/// Cache key: (sport, location, page token, min rating in tenths, limit).
/// Sport and location are trimmed and lowercased.
type PageKey = (String, String, Option<String>, Option<i64>, Option<usize>);

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
            ttl: Duration::from_secs(300),
            max_capacity: 1000,
        }
    }
}

/// Candidate provider with caching.
///
/// Wraps any provider and caches successful pages. Errors are never cached.
pub struct CachedProvider<P> {
    inner: P,
    pages: MokaCache<PageKey, Arc<CandidatePage>>,
}

impl<P> CachedProvider<P> {
    /// Create a new cached provider.
    pub fn new(inner: P, config: &CacheConfig) -> Self {
        let pages = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { inner, pages }
    }

    /// Access the underlying provider for operations that bypass cache.
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Invalidate all cached entries.
    pub fn invalidate_cache(&self) {
        self.pages.invalidate_all();
    }
}

fn page_key(sport: &str, location: &str, filters: &SearchFilters) -> PageKey {
    (
        sport.trim().to_lowercase(),
        location.trim().to_lowercase(),
        filters.page_token.clone(),
        filters.min_rating.map(|r| (r * 10.0).round() as i64),
        filters.limit,
    )
}

impl<P> CandidateProvider for CachedProvider<P>
where
    P: CandidateProvider + Sync,
{
    async fn search(
        &self,
        sport: &str,
        location: &str,
        filters: &SearchFilters,
    ) -> Result<CandidatePage, ProviderError> {
        let key = page_key(sport, location, filters);

        if let Some(cached) = self.pages.get(&key).await {
            debug!(sport, location, "candidate cache hit");
            return Ok(CandidatePage::clone(&cached));
        }

        let page = self.inner.search(sport, location, filters).await?;
        self.pages.insert(key, Arc::new(page.clone())).await;

        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::domain::{Candidate, PlaceId};

    /// Counts upstream calls; fails while `failing` is set.
    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
        failing: std::sync::atomic::AtomicBool,
    }

    impl CandidateProvider for Counting {
        async fn search(
            &self,
            sport: &str,
            _location: &str,
            _filters: &SearchFilters,
        ) -> Result<CandidatePage, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.load(Ordering::SeqCst) {
                return Err(ProviderError::RateLimited);
            }
            let candidate = Candidate::new(PlaceId::parse("p1").unwrap(), sport).with_rating(4.5);
            Ok(CandidatePage::new(vec![candidate]))
        }
    }

    fn calls(provider: &CachedProvider<Counting>) -> usize {
        provider.inner().calls.load(Ordering::SeqCst)
    }

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(300));
        assert_eq!(config.max_capacity, 1000);
    }

    #[test]
    fn key_normalises_query_and_buckets_rating() {
        let drifted = SearchFilters::default().with_min_rating(3.5 - 0.3);
        let exact = SearchFilters::default().with_min_rating(3.2);

        assert_eq!(
            page_key(" Futsal ", "JAKARTA", &drifted),
            page_key("futsal", "jakarta", &exact)
        );
        assert_ne!(
            page_key("futsal", "jakarta", &exact),
            page_key("futsal", "jakarta", &exact.clone().with_page_token("t"))
        );
        assert_ne!(
            page_key("futsal", "jakarta", &exact),
            page_key("futsal", "jakarta", &exact.clone().with_limit(5))
        );
    }

    #[tokio::test]
    async fn second_lookup_is_served_from_cache() {
        let provider = CachedProvider::new(Counting::default(), &CacheConfig::default());
        let filters = SearchFilters::default().with_min_rating(3.5);

        let first = provider.search("futsal", "Jakarta", &filters).await.unwrap();
        let second = provider.search("Futsal", "jakarta ", &filters).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(calls(&provider), 1);
    }

    #[tokio::test]
    async fn different_filters_miss() {
        let provider = CachedProvider::new(Counting::default(), &CacheConfig::default());

        provider
            .search("futsal", "Jakarta", &SearchFilters::default().with_min_rating(3.5))
            .await
            .unwrap();
        provider
            .search("futsal", "Jakarta", &SearchFilters::default().with_min_rating(3.2))
            .await
            .unwrap();

        assert_eq!(calls(&provider), 2);
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let provider = CachedProvider::new(Counting::default(), &CacheConfig::default());
        provider.inner().failing.store(true, Ordering::SeqCst);

        let filters = SearchFilters::default();
        assert!(provider.search("futsal", "Jakarta", &filters).await.is_err());

        provider.inner().failing.store(false, Ordering::SeqCst);
        assert!(provider.search("futsal", "Jakarta", &filters).await.is_ok());
        assert_eq!(calls(&provider), 2);
    }

    #[tokio::test]
    async fn invalidate_forces_refetch() {
        let provider = CachedProvider::new(Counting::default(), &CacheConfig::default());
        let filters = SearchFilters::default();

        provider.search("futsal", "Jakarta", &filters).await.unwrap();
        provider.invalidate_cache();
        provider.search("futsal", "Jakarta", &filters).await.unwrap();

        assert_eq!(calls(&provider), 2);
    }
}
