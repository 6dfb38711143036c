use super::*;
use crate::config::Config;
use crate::service::OffersService;
use futures::StreamExt;
use governor::{Quota, RateLimiter};
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub refreshed: Vec<String>,
    /// Slug and the reason its refresh failed.
    pub failed: Vec<(String, String)>,
}

/// Timer-driven refresh of the statically configured collections.
///
/// Collections filled on demand are never added here.
pub struct Updater {
    client: Arc<OpenseaAPIClient>,
    cache: Arc<CollectionCache>,
    status: UpdaterStatus,
    collections: Vec<String>,
    interval: Duration,
    concurrency: usize,
}

impl Updater {
    pub fn new(service: &OffersService, collections: Vec<String>, interval: Duration) -> Self {
        Self {
            client: service.client().clone(),
            cache: service.cache().clone(),
            status: service.status().clone(),
            collections,
            interval,
            concurrency: 1,
        }
    }

    pub fn from_config(service: &OffersService, config: &Config) -> Self {
        let mut updater = Self::new(service, config.collections.clone(), config.refresh_interval);
        updater.concurrency(config.refresh_concurrency);
        updater
    }

    pub fn concurrency(&mut self, arg: usize) -> &mut Self {
        self.concurrency = arg.max(1);
        self
    }

    pub fn collections(&self) -> &[String] {
        &self.collections
    }

    /// Refreshes every configured collection once. Failures are logged and reported, never raised.
    pub async fn run_cycle(&self) -> CycleReport {
        self.status.set(UpdaterState::Refreshing);
        log::info!("Refreshing {} collections", self.collections.len());

        let results = futures::stream::iter(self.collections.clone())
            .map(|slug| {
                let client = self.client.clone();
                let cache = self.cache.clone();
                async move {
                    let result = refresh_collection(&client, &cache, &slug).await;
                    (slug, result)
                }
            })
            .buffer_unordered(self.concurrency)
            .collect::<Vec<_>>()
            .await;

        let mut report = CycleReport::default();
        for (slug, result) in results {
            match result {
                Ok(()) => report.refreshed.push(slug),
                Err(e) => {
                    log::warn!("Refresh failed for {}: {}", slug, e);
                    report.failed.push((slug, e.to_string()));
                }
            }
        }
        report.refreshed.sort();
        report.failed.sort();

        log::info!(
            "Refresh cycle done: {} refreshed, {} failed",
            report.refreshed.len(),
            report.failed.len()
        );
        self.status.set(UpdaterState::Idle);
        report
    }

    /// Runs a cycle immediately, then once per interval. Cycles never overlap:
    /// the next one only waits on the limiter after the previous one has finished.
    pub async fn run(self) -> Result<()> {
        let quota = Quota::with_period(self.interval)
            .ok_or_else(|| anyhow!("refresh interval must be greater than zero"))?;
        let rate_limiter = RateLimiter::direct(quota);

        loop {
            rate_limiter.until_ready().await;
            self.run_cycle().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opensea::tests::{listing_json, test_client};
    use mockito::{Matcher, Server};
    use serde_json::json;

    #[tokio::test]
    async fn test_cycle_isolates_failures() {
        let mut server = Server::new_async().await;
        let mut mocks = vec![];
        for slug in ["azuki", "nakamigos"] {
            let listings = server
                .mock("GET", format!("/v2/listings/collection/{}/all", slug).as_str())
                .match_query(Matcher::Any)
                .with_status(200)
                .with_body(
                    json!({ "listings": [listing_json("1", "1000000000000000000", "0x1")] })
                        .to_string(),
                )
                .create_async()
                .await;
            let stats = server
                .mock("GET", format!("/v1/collection/{}/stats", slug).as_str())
                .with_status(200)
                .with_body(json!({ "stats": { "floor_price": 1 } }).to_string())
                .create_async()
                .await;
            mocks.push(listings);
            mocks.push(stats);
        }
        let broken = server
            .mock("GET", "/v2/listings/collection/broken/all")
            .match_query(Matcher::Any)
            .with_status(503)
            .expect(3)
            .create_async()
            .await;
        let _broken_stats = server
            .mock("GET", "/v1/collection/broken/stats")
            .with_status(503)
            .create_async()
            .await;

        let service = OffersService::new(
            Arc::new(test_client(&server)),
            Arc::new(CollectionCache::new()),
        );
        let mut updater = Updater::new(
            &service,
            vec!["azuki".into(), "broken".into(), "nakamigos".into()],
            Duration::from_secs(600),
        );
        updater.concurrency(2);

        let report = updater.run_cycle().await;

        assert_eq!(report.refreshed, vec!["azuki", "nakamigos"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "broken");
        assert!(service.cache().has("azuki"));
        assert!(service.cache().has("nakamigos"));
        assert!(!service.cache().has("broken"));
        assert_eq!(service.status().state(), UpdaterState::Idle);

        broken.assert_async().await;
    }

    #[tokio::test]
    async fn test_run_refreshes_immediately() {
        let mut server = Server::new_async().await;
        let listings = server
            .mock("GET", "/v2/listings/collection/nakamigos/all")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!({ "listings": [] }).to_string())
            .expect_at_least(1)
            .create_async()
            .await;
        let _stats = server
            .mock("GET", "/v1/collection/nakamigos/stats")
            .with_status(200)
            .with_body(json!({ "stats": {} }).to_string())
            .create_async()
            .await;

        let service = OffersService::new(
            Arc::new(test_client(&server)),
            Arc::new(CollectionCache::new()),
        );
        let updater = Updater::new(&service, vec!["nakamigos".into()], Duration::from_secs(3600));
        let handle = tokio::spawn(updater.run());

        for _ in 0..100 {
            if service.cache().has("nakamigos") {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        handle.abort();

        let entry = service.cache().get("nakamigos").unwrap();
        assert!(entry.listings.is_empty());
        assert!(entry.listings_updated_at.is_some());

        listings.assert_async().await;
    }

    #[tokio::test]
    async fn test_zero_interval_is_rejected() {
        let server = Server::new_async().await;
        let service = OffersService::new(
            Arc::new(test_client(&server)),
            Arc::new(CollectionCache::new()),
        );
        let updater = Updater::new(&service, vec![], Duration::ZERO);
        assert!(updater.run().await.is_err());
    }
}
