use crate::opensea::fetchers::{fetch_collection_listings, fetch_collection_stats};
use crate::opensea::OpenseaAPIClient;
use crate::storage::{CacheEntry, CollectionCache, ListingRecord, StatsRecord};
use crate::updater::UpdaterStatus;
use std::sync::Arc;

/// Read side of the cache, filling unknown collections on first request.
#[derive(Clone)]
pub struct OffersService {
    client: Arc<OpenseaAPIClient>,
    cache: Arc<CollectionCache>,
    status: UpdaterStatus,
}

impl OffersService {
    pub fn new(client: Arc<OpenseaAPIClient>, cache: Arc<CollectionCache>) -> Self {
        Self {
            client,
            cache,
            status: UpdaterStatus::default(),
        }
    }

    pub fn client(&self) -> &Arc<OpenseaAPIClient> {
        &self.client
    }

    pub fn cache(&self) -> &Arc<CollectionCache> {
        &self.cache
    }

    pub fn status(&self) -> &UpdaterStatus {
        &self.status
    }

    /// Cached entry for `collection_slug`, fetching it once if it was never cached.
    ///
    /// A cached entry is returned as is, however stale. A miss runs the fetch
    /// pipeline; only a non-empty listings result is stored, so an empty or failed
    /// fetch yields `None` and the next request tries again. Filled collections
    /// are not added to the scheduled refresh.
    pub async fn ensure(&self, collection_slug: &str) -> Option<Arc<CacheEntry>> {
        if collection_slug.is_empty() {
            return None;
        }
        if let Some(entry) = self.cache.get(collection_slug) {
            return Some(entry);
        }

        log::info!("{} is not cached, fetching on demand", collection_slug);
        let listings = match fetch_collection_listings(&self.client, collection_slug).await {
            Ok(listings) => listings,
            Err(e) => {
                log::warn!("On-demand fetch failed for {}: {}", collection_slug, e);
                return None;
            }
        };
        if listings.is_empty() {
            log::info!("{} has no usable listings", collection_slug);
            return None;
        }

        let stats = match fetch_collection_stats(&self.client, collection_slug).await {
            Ok(stats) => Some(stats),
            Err(e) => {
                log::warn!("On-demand stats fetch failed for {}: {}", collection_slug, e);
                None
            }
        };

        self.cache.replace_listings(collection_slug, listings);
        if let Some(stats) = stats {
            self.cache.replace_stats(collection_slug, stats);
        }
        self.cache.get(collection_slug)
    }

    pub async fn get_offers(&self, collection_slug: &str) -> Option<Vec<ListingRecord>> {
        self.ensure(collection_slug)
            .await
            .map(|entry| entry.listings.clone())
    }

    /// Stats of the cached entry. An entry that was filled without stats gets one
    /// more stats fetch per request until it succeeds.
    pub async fn get_stats(&self, collection_slug: &str) -> Option<StatsRecord> {
        let entry = self.ensure(collection_slug).await?;
        if let Some(stats) = entry.stats {
            return Some(stats);
        }

        match fetch_collection_stats(&self.client, collection_slug).await {
            Ok(stats) => {
                self.cache.replace_stats(collection_slug, stats);
                Some(stats)
            }
            Err(e) => {
                log::warn!("Stats fetch failed for {}: {}", collection_slug, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opensea::tests::{listing_json, test_client};
    use mockito::{Matcher, Server, ServerGuard};
    use rust_decimal::Decimal;
    use serde_json::json;

    fn service(server: &ServerGuard) -> OffersService {
        OffersService::new(Arc::new(test_client(server)), Arc::new(CollectionCache::new()))
    }

    #[tokio::test]
    async fn test_ensure_caches_non_empty_result() {
        let mut server = Server::new_async().await;
        let listings = server
            .mock("GET", "/v2/listings/collection/nakamigos/all")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                json!({ "listings": [listing_json("5", "1000000000000000000", "0x5")] })
                    .to_string(),
            )
            .expect(1)
            .create_async()
            .await;
        let stats = server
            .mock("GET", "/v1/collection/nakamigos/stats")
            .with_status(200)
            .with_body(json!({ "stats": { "floor_price": 0.9, "one_day_volume": 3 } }).to_string())
            .expect(1)
            .create_async()
            .await;

        let service = service(&server);
        let entry = service.ensure("nakamigos").await.unwrap();
        assert_eq!(entry.listings.len(), 1);
        assert_eq!(entry.stats.unwrap().one_day_volume, Some(Decimal::from(3)));

        // served from the cache from now on
        let cached = service.cache().get("nakamigos").unwrap();
        assert_eq!(cached, entry);
        let offers = service.get_offers("nakamigos").await.unwrap();
        assert_eq!(offers[0].token_id, "5");
        assert_eq!(
            service.get_stats("nakamigos").await.unwrap().floor_price,
            Some(Decimal::new(9, 1))
        );

        listings.assert_async().await;
        stats.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_result_is_not_cached() {
        let mut server = Server::new_async().await;
        let listings = server
            .mock("GET", "/v2/listings/collection/non_existent_collection/all")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!({ "listings": [] }).to_string())
            .expect(2)
            .create_async()
            .await;

        let service = service(&server);
        assert!(service.get_offers("non_existent_collection").await.is_none());
        assert!(!service.cache().has("non_existent_collection"));

        // nothing was cached, so the next request goes upstream again
        assert!(service.ensure("non_existent_collection").await.is_none());

        listings.assert_async().await;
    }

    #[tokio::test]
    async fn test_failed_fetch_is_not_found() {
        let mut server = Server::new_async().await;
        let listings = server
            .mock("GET", "/v2/listings/collection/nakamigos/all")
            .match_query(Matcher::Any)
            .with_status(500)
            .expect(3)
            .create_async()
            .await;

        let service = service(&server);
        assert!(service.get_stats("nakamigos").await.is_none());
        assert!(service.cache().is_empty());

        listings.assert_async().await;
    }

    #[tokio::test]
    async fn test_stats_failure_still_caches_listings() {
        let mut server = Server::new_async().await;
        let _listings = server
            .mock("GET", "/v2/listings/collection/nakamigos/all")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                json!({ "listings": [listing_json("5", "1000000000000000000", "0x5")] })
                    .to_string(),
            )
            .create_async()
            .await;
        let _stats = server
            .mock("GET", "/v1/collection/nakamigos/stats")
            .with_status(404)
            .create_async()
            .await;

        let service = service(&server);
        assert_eq!(service.get_offers("nakamigos").await.unwrap().len(), 1);
        assert!(service.get_stats("nakamigos").await.is_none());
        assert!(service.cache().has("nakamigos"));
    }

    #[tokio::test]
    async fn test_missing_stats_are_fetched_again() {
        let mut server = Server::new_async().await;
        let listings = server
            .mock("GET", "/v2/listings/collection/nakamigos/all")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                json!({ "listings": [listing_json("5", "1000000000000000000", "0x5")] })
                    .to_string(),
            )
            .expect(1)
            .create_async()
            .await;
        let failing = server
            .mock("GET", "/v1/collection/nakamigos/stats")
            .with_status(500)
            .expect(3)
            .create_async()
            .await;
        let succeeding = server
            .mock("GET", "/v1/collection/nakamigos/stats")
            .with_status(200)
            .with_body(json!({ "stats": { "floor_price": 0.4 } }).to_string())
            .expect(1)
            .create_async()
            .await;

        let service = service(&server);
        let entry = service.ensure("nakamigos").await.unwrap();
        assert_eq!(entry.stats, None);

        let stats = service.get_stats("nakamigos").await.unwrap();
        assert_eq!(stats.floor_price, Some(Decimal::new(4, 1)));
        // cached from now on
        assert_eq!(service.get_stats("nakamigos").await, Some(stats));

        listings.assert_async().await;
        failing.assert_async().await;
        succeeding.assert_async().await;
    }

    #[tokio::test]
    async fn test_cached_entry_skips_network() {
        let server = Server::new_async().await;
        let service = service(&server);
        service.cache().replace_listings("nakamigos", vec![]);

        // no mock registered: served from the cache without going upstream
        let entry = service.ensure("nakamigos").await.unwrap();
        assert!(entry.listings.is_empty());
        assert_eq!(service.get_offers("nakamigos").await, Some(vec![]));
    }

    #[tokio::test]
    async fn test_empty_slug_is_not_found() {
        let server = Server::new_async().await;
        assert!(service(&server).ensure("").await.is_none());
    }
}
