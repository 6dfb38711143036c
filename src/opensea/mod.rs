use self::errors::{is_retryable_status, FetchError, TransientCause};
use self::retry::{Retrier, RetryPolicy, SharedSleeper};
use self::types::*;

use crate::config::Config;
use anyhow::Result;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub mod errors;
pub mod fetchers;
pub mod retry;
pub mod types;

pub static API_BASE: &str = "https://api.opensea.io/api";

static LISTINGS_PATH: &str = "/v2/listings/collection/";
static STATS_PATH: &str = "/v1/collection/";

const DEFAULT_LISTINGS_LIMIT: usize = 10;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Listings,
    Stats,
}

/// Thin client for the two marketplace endpoints we poll. Holds no state between calls.
pub struct OpenseaAPIClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    listings_limit: usize,
    retrier: Retrier,
}

impl OpenseaAPIClient {
    pub fn builder(api_key: &str) -> OpenseaClientBuilder {
        OpenseaClientBuilder::new(api_key)
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::builder(&config.api_key)
            .base_url(&config.api_base)
            .listings_limit(config.listings_limit)
            .timeout(config.request_timeout)
            .retry_policy(config.retry)
            .build()
    }

    /// Issues one logical request, retrying transient failures per the retry policy.
    pub async fn fetch(
        &self,
        kind: RequestKind,
        collection_slug: &str,
    ) -> Result<RawPayload, FetchError> {
        match kind {
            RequestKind::Listings => self.fetch_listings(collection_slug).await.map(RawPayload::Listings),
            RequestKind::Stats => self.fetch_stats(collection_slug).await.map(RawPayload::Stats),
        }
    }

    pub async fn fetch_listings(&self, collection_slug: &str) -> Result<ListingsResponse, FetchError> {
        let path = format!("{}{}/all", LISTINGS_PATH, collection_slug);
        let query = [("limit", self.listings_limit.to_string())];
        self.fetch_page(&path, &query).await
    }

    pub async fn fetch_stats(&self, collection_slug: &str) -> Result<StatsResponse, FetchError> {
        let path = format!("{}{}/stats", STATS_PATH, collection_slug);
        self.fetch_page(&path, &[]).await
    }

    async fn fetch_page<R>(&self, path: &str, query: &[(&str, String)]) -> Result<R, FetchError>
    where
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let url = url.as_str();
        self.retrier
            .run(url, move || async move { self.attempt(url, query).await })
            .await
    }

    async fn attempt<R>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<R, backoff::Error<FetchError>>
    where
        R: DeserializeOwned,
    {
        let reqw = self
            .client
            .get(url)
            .query(query)
            .header("accept", "application/json")
            .header("x-api-key", &self.api_key)
            .build()
            .map_err(|e| backoff::Error::permanent(FetchError::InvalidRequest(e)))?;
        log::debug!("GET {}", reqw.url());

        let resp = self
            .client
            .execute(reqw)
            .await
            .map_err(|e| backoff::Error::transient(FetchError::transient(e.into())))?;
        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| backoff::Error::transient(FetchError::transient(e.into())))?;

        if !status.is_success() {
            return Err(if is_retryable_status(status) {
                backoff::Error::transient(FetchError::transient(TransientCause::Status {
                    status,
                    body: text,
                }))
            } else {
                backoff::Error::permanent(FetchError::MalformedResponse(format!(
                    "unexpected status {}: {}",
                    status, text
                )))
            });
        }

        serde_json::from_str(&text)
            .map_err(|e| backoff::Error::permanent(FetchError::MalformedResponse(e.to_string())))
    }
}

pub struct OpenseaClientBuilder {
    api_key: String,
    base_url: String,
    listings_limit: usize,
    timeout: Duration,
    retry_policy: RetryPolicy,
    sleeper: Option<SharedSleeper>,
}

impl OpenseaClientBuilder {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            base_url: API_BASE.to_string(),
            listings_limit: DEFAULT_LISTINGS_LIMIT,
            timeout: DEFAULT_TIMEOUT,
            retry_policy: RetryPolicy::default(),
            sleeper: None,
        }
    }

    pub fn base_url(&mut self, arg: &str) -> &mut Self {
        self.base_url = arg.trim_end_matches('/').to_string();
        self
    }

    pub fn listings_limit(&mut self, arg: usize) -> &mut Self {
        self.listings_limit = arg;
        self
    }

    pub fn timeout(&mut self, arg: Duration) -> &mut Self {
        self.timeout = arg;
        self
    }

    pub fn retry_policy(&mut self, arg: RetryPolicy) -> &mut Self {
        self.retry_policy = arg;
        self
    }

    pub fn sleeper(&mut self, arg: SharedSleeper) -> &mut Self {
        self.sleeper = Some(arg);
        self
    }

    pub fn build(&mut self) -> Result<OpenseaAPIClient> {
        let client = reqwest::Client::builder().timeout(self.timeout).build()?;
        let retrier = match &self.sleeper {
            Some(sleeper) => Retrier::with_sleeper(self.retry_policy, sleeper.clone()),
            None => Retrier::new(self.retry_policy),
        };
        Ok(OpenseaAPIClient {
            client,
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            listings_limit: self.listings_limit,
            retrier,
        })
    }
}
