use crate::opensea::fetchers::{fetch_collection_listings, fetch_collection_stats};
use crate::opensea::OpenseaAPIClient;
use crate::storage::CollectionCache;
use anyhow::{anyhow, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub mod update;

pub use update::{CycleReport, Updater};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdaterState {
    Idle,
    Refreshing,
}

/// Shared view of whether a refresh cycle is in progress.
#[derive(Debug, Clone, Default)]
pub struct UpdaterStatus(Arc<AtomicBool>);

impl UpdaterStatus {
    pub fn state(&self) -> UpdaterState {
        if self.0.load(Ordering::Acquire) {
            UpdaterState::Refreshing
        } else {
            UpdaterState::Idle
        }
    }

    pub(crate) fn set(&self, state: UpdaterState) {
        self.0
            .store(state == UpdaterState::Refreshing, Ordering::Release);
    }
}

/// Fetches listings and stats for one collection and commits whichever succeeded.
///
/// A failed half leaves the cached half untouched; the error names every failed half.
pub async fn refresh_collection(
    client: &OpenseaAPIClient,
    cache: &CollectionCache,
    collection_slug: &str,
) -> Result<()> {
    let (listings, stats) = futures::join!(
        fetch_collection_listings(client, collection_slug),
        fetch_collection_stats(client, collection_slug)
    );

    let mut failures = vec![];

    match listings {
        Ok(listings) => {
            log::debug!("{}: {} listings", collection_slug, listings.len());
            cache.replace_listings(collection_slug, listings);
        }
        Err(e) => failures.push(format!("listings: {}", e)),
    }

    match stats {
        Ok(stats) => cache.replace_stats(collection_slug, stats),
        Err(e) => failures.push(format!("stats: {}", e)),
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(anyhow!("{}", failures.join("; ")))
    }
}
